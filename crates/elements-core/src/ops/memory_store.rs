use std::collections::HashMap;

use chrono::Utc;

use super::store::{ElementStore, VersionState};
use crate::errors::{ElementsError, Result};
use crate::model::{Container, Element, HolderRef, Stage};

/// One row of an element's version history
#[derive(Debug, Clone, PartialEq)]
struct VersionRecord {
    version: u64,
    was_published: bool,
}

/// In-memory store for containers, elements and their version history
///
/// HashMap-backed, one map per stage. Not thread-safe (no Arc/RwLock);
/// designed for single-threaded use in tests and tools.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    draft_containers: HashMap<String, Container>,
    live_containers: HashMap<String, Container>,
    draft_elements: HashMap<String, Element>,
    live_elements: HashMap<String, Element>,
    versions: HashMap<String, Vec<VersionRecord>>,
    /// Remaining writes before every write fails (test fault injection)
    write_budget: Option<usize>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write after the next `writes` fail with `Persistence`
    ///
    /// Used to exercise partially applied cascades.
    pub fn fail_writes_after(&mut self, writes: usize) {
        self.write_budget = Some(writes);
    }

    /// Number of element snapshots held in a stage
    pub fn element_count(&self, stage: Stage) -> usize {
        self.elements(stage).len()
    }

    /// Number of history rows recorded for an element
    pub fn version_count(&self, id: &str) -> usize {
        self.versions.get(id).map(Vec::len).unwrap_or(0)
    }

    fn elements(&self, stage: Stage) -> &HashMap<String, Element> {
        match stage {
            Stage::Draft => &self.draft_elements,
            Stage::Live => &self.live_elements,
        }
    }

    fn elements_mut(&mut self, stage: Stage) -> &mut HashMap<String, Element> {
        match stage {
            Stage::Draft => &mut self.draft_elements,
            Stage::Live => &mut self.live_elements,
        }
    }

    fn containers_mut(&mut self, stage: Stage) -> &mut HashMap<String, Container> {
        match stage {
            Stage::Draft => &mut self.draft_containers,
            Stage::Live => &mut self.live_containers,
        }
    }

    fn spend_write(&mut self, op: &str) -> Result<()> {
        match self.write_budget {
            Some(0) => Err(ElementsError::persistence(op, "write budget exhausted")),
            Some(n) => {
                self.write_budget = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl ElementStore for MemoryStore {
    fn container(&self, id: &str, stage: Stage) -> Result<Option<Container>> {
        let containers = match stage {
            Stage::Draft => &self.draft_containers,
            Stage::Live => &self.live_containers,
        };
        Ok(containers.get(id).cloned())
    }

    fn write_container(&mut self, container: &Container, stage: Stage) -> Result<u64> {
        self.spend_write("write_container")?;

        let mut stored = container.clone();
        if stage == Stage::Draft {
            let current = self
                .draft_containers
                .get(&container.id)
                .map(|c| c.version)
                .unwrap_or(0);
            stored.version = current.max(container.version) + 1;
            stored.updated_at = Utc::now();
        }
        let version = stored.version;
        self.containers_mut(stage).insert(stored.id.clone(), stored);
        Ok(version)
    }

    fn delete_container_from_stage(&mut self, id: &str, stage: Stage) -> Result<()> {
        self.spend_write("delete_container_from_stage")?;
        self.containers_mut(stage).remove(id);
        Ok(())
    }

    fn element(&self, id: &str, stage: Stage) -> Result<Option<Element>> {
        Ok(self.elements(stage).get(id).cloned())
    }

    fn write_element(&mut self, element: &Element, stage: Stage) -> Result<u64> {
        self.spend_write("write_element")?;

        let mut stored = element.clone();
        let history = self.versions.entry(element.id.clone()).or_default();
        match stage {
            Stage::Draft => {
                let latest = history.iter().map(|r| r.version).max().unwrap_or(0);
                stored.version = latest + 1;
                stored.updated_at = Utc::now();
                history.push(VersionRecord {
                    version: stored.version,
                    was_published: false,
                });
            }
            Stage::Live => match history.iter_mut().find(|r| r.version == stored.version) {
                Some(record) => record.was_published = true,
                None => history.push(VersionRecord {
                    version: stored.version,
                    was_published: true,
                }),
            },
        }

        let version = stored.version;
        self.elements_mut(stage).insert(stored.id.clone(), stored);
        Ok(version)
    }

    fn delete_element_from_stage(&mut self, id: &str, stage: Stage) -> Result<()> {
        self.spend_write("delete_element_from_stage")?;
        self.elements_mut(stage).remove(id);
        Ok(())
    }

    fn children(&self, holder: &HolderRef, stage: Stage) -> Result<Vec<Element>> {
        let mut children: Vec<Element> = self
            .elements(stage)
            .values()
            .filter(|e| e.holder.as_ref() == Some(holder))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.sort.cmp(&b.sort).then_with(|| a.id.cmp(&b.id)));
        Ok(children)
    }

    fn max_sort(&self, holder: &HolderRef) -> Result<Option<u32>> {
        Ok(self
            .draft_elements
            .values()
            .filter(|e| e.holder.as_ref() == Some(holder))
            .map(|e| e.sort)
            .max())
    }

    fn url_segment_taken(
        &self,
        type_tag: &str,
        segment: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool> {
        Ok(self.draft_elements.values().any(|e| {
            e.type_tag == type_tag && e.url_segment == segment && Some(e.id.as_str()) != exclude_id
        }))
    }

    fn version_state(&self, id: &str) -> Result<VersionState> {
        let history = match self.versions.get(id) {
            Some(history) => history,
            None => return Ok(VersionState::default()),
        };
        Ok(VersionState {
            latest: history.iter().map(|r| r.version).max().unwrap_or(0),
            published: history
                .iter()
                .filter(|r| r.was_published)
                .map(|r| r.version)
                .max(),
        })
    }
}
