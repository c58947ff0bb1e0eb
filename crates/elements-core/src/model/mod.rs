pub mod container;
pub mod element;
pub mod holder;
pub mod stage;

pub use container::Container;
pub use element::Element;
pub use holder::{HasElementRelations, Holder};
pub use stage::{HolderRef, Stage};
