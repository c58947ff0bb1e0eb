use std::collections::BTreeSet;

use crate::errors::Result;
use crate::model::{Container, Element, HolderRef, Stage};

/// Version bookkeeping for one record, read from its version history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionState {
    /// Highest version ever written to draft (0 if never written)
    pub latest: u64,
    /// Highest version that was published, if any
    pub published: Option<u64>,
}

impl VersionState {
    /// A newer draft exists, or the record was never published
    pub fn is_modified(&self) -> bool {
        match self.published {
            None => self.latest > 0,
            Some(published) => self.latest > published,
        }
    }
}

/// Storage and versioning collaborator
///
/// Every record exists as up to two snapshots, one per [`Stage`]. Writes to
/// draft allocate the next version number; writes to live keep the version of
/// the snapshot being published and mark it published in the history.
///
/// Not thread-safe by contract: one request owns the store for the duration
/// of an operation.
pub trait ElementStore {
    // ----- containers -----

    /// Load a container snapshot
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing storage fails.
    fn container(&self, id: &str, stage: Stage) -> Result<Option<Container>>;

    /// Write a container snapshot, returning the version it was stored under
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing storage fails.
    fn write_container(&mut self, container: &Container, stage: Stage) -> Result<u64>;

    /// Remove one snapshot of a container (no-op when absent)
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing storage fails.
    fn delete_container_from_stage(&mut self, id: &str, stage: Stage) -> Result<()>;

    // ----- elements -----

    /// Load an element snapshot
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing storage fails.
    fn element(&self, id: &str, stage: Stage) -> Result<Option<Element>>;

    /// Write an element snapshot, returning the version it was stored under
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing storage fails.
    fn write_element(&mut self, element: &Element, stage: Stage) -> Result<u64>;

    /// Remove one snapshot of an element (no-op when absent)
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing storage fails.
    fn delete_element_from_stage(&mut self, id: &str, stage: Stage) -> Result<()>;

    /// Direct children of a holder in one stage, ordered by `sort` then id
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing storage fails.
    fn children(&self, holder: &HolderRef, stage: Stage) -> Result<Vec<Element>>;

    /// Highest draft `sort` among the holder's children
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing storage fails.
    fn max_sort(&self, holder: &HolderRef) -> Result<Option<u32>>;

    /// Whether another draft element of `type_tag` already uses `segment`
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing storage fails.
    fn url_segment_taken(
        &self,
        type_tag: &str,
        segment: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool>;

    /// Version history summary for one element
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing storage fails.
    fn version_state(&self, id: &str) -> Result<VersionState>;

    // ----- provided -----

    /// Copy one element snapshot onto another stage
    ///
    /// Returns `false` when the source snapshot does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing storage fails.
    fn copy_element_to_stage(&mut self, id: &str, from: Stage, to: Stage) -> Result<bool> {
        match self.element(id, from)? {
            Some(element) => {
                self.write_element(&element, to)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Copy one container snapshot onto another stage
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing storage fails.
    fn copy_container_to_stage(&mut self, id: &str, from: Stage, to: Stage) -> Result<bool> {
        match self.container(id, from)? {
            Some(container) => {
                self.write_container(&container, to)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Whether the draft and live snapshots of an element differ
    ///
    /// Exactly one snapshot existing counts as a difference.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing storage fails.
    fn stages_differ(&self, id: &str) -> Result<bool> {
        let draft = self.element(id, Stage::Draft)?;
        let live = self.element(id, Stage::Live)?;
        Ok(match (draft, live) {
            (Some(d), Some(l)) => d.version != l.version,
            (None, None) => false,
            _ => true,
        })
    }

    /// Subset of `ids` whose latest draft version was never published
    ///
    /// Implementations backed by a query engine should answer this with one
    /// set-based query.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing storage fails.
    fn modified_ids(&self, ids: &[String]) -> Result<BTreeSet<String>> {
        let mut modified = BTreeSet::new();
        for id in ids {
            if self.version_state(id)?.is_modified() {
                modified.insert(id.clone());
            }
        }
        Ok(modified)
    }
}
