//! Publish, delete and modified-status propagation over element trees
//!
//! All three operations walk the has-many child edge downward from a
//! container or element. None of them is transactional: a storage failure
//! partway leaves the tree partially applied, and re-running the cascade is
//! the recovery path since publishing is idempotent.

pub mod delete;
pub mod modified;
pub mod publish;

pub use delete::delete_cascade;
pub use modified::{has_modified_descendant, modified_descendants};
pub use publish::{publish_cascade, publish_container_page, PublishOutcome};

/// Deepest element tree a walk accepts before treating it as corrupt
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits applied to every tree walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeOptions {
    /// Levels below the root a walk may descend (direct children are level 1)
    pub max_depth: usize,
}

impl Default for CascadeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CascadeOptions {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

/// What a delete removes from each descendant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Remove live snapshots only; drafts stay editable
    UnpublishOnly,
    /// Remove live then draft snapshots
    FullDelete,
}

impl DeleteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteMode::UnpublishOnly => "unpublish_only",
            DeleteMode::FullDelete => "full_delete",
        }
    }
}

impl std::fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
