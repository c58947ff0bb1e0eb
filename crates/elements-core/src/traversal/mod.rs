//! Element tree traversal
//!
//! Upward walks follow each element's holder reference to the root
//! container; downward walks follow the has-many child edge. Both are
//! bounded by a depth limit and refuse to visit an element twice.

pub mod descendants;
pub mod holder_chain;

pub use descendants::{children_in_any_stage, descendant_ids, WalkGuard};
pub use holder_chain::{holder_of, holder_page};
