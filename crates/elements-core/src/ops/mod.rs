pub mod container_ops;
pub mod element_ops;
pub mod memory_store;
pub mod seeding;
pub mod sort_sequencer;
pub mod store;
pub mod url_segment;

pub use memory_store::MemoryStore;
pub use sort_sequencer::next_sort;
pub use store::{ElementStore, VersionState};
pub use url_segment::{filter_segment, generate_url_segment, SegmentLookupCache};
