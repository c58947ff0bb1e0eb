use std::collections::HashSet;

use crate::errors::{ElementsError, Result};
use crate::model::{Element, HolderRef, Stage};
use crate::ops::store::ElementStore;

/// Direct children of a holder present in either stage
///
/// Draft children come first in sort order, followed by live-only children
/// (deleted from draft but still published).
///
/// # Errors
///
/// Returns `Persistence` if a lookup fails.
pub fn children_in_any_stage<S: ElementStore + ?Sized>(
    store: &S,
    holder: &HolderRef,
) -> Result<Vec<Element>> {
    let mut children = store.children(holder, Stage::Draft)?;
    let draft_ids: HashSet<String> = children.iter().map(|e| e.id.clone()).collect();

    for live in store.children(holder, Stage::Live)? {
        if !draft_ids.contains(&live.id) {
            children.push(live);
        }
    }
    Ok(children)
}

/// Guard shared by every downward walk
///
/// Tracks visited ids and enforces the depth bound. Both limits indicate a
/// corrupted tree, so they are logged at error level and abort the walk.
#[derive(Debug)]
pub struct WalkGuard {
    root_id: String,
    max_depth: usize,
    visited: HashSet<String>,
}

impl WalkGuard {
    pub fn new(root: &HolderRef, max_depth: usize) -> Self {
        Self {
            root_id: root.id().to_string(),
            max_depth,
            visited: HashSet::new(),
        }
    }

    /// Check one element reached at `depth` (direct children are depth 1)
    ///
    /// # Errors
    ///
    /// * `CascadeDepthExceeded` - `depth` is past the bound
    /// * `CycleDetected` - the element was already visited in this walk
    pub fn enter(&mut self, element_id: &str, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            tracing::error!(
                root_id = %self.root_id,
                max_depth = self.max_depth,
                "element tree exceeds maximum depth"
            );
            return Err(ElementsError::CascadeDepthExceeded {
                root_id: self.root_id.clone(),
                max_depth: self.max_depth,
            });
        }
        if !self.visited.insert(element_id.to_string()) {
            tracing::error!(root_id = %self.root_id, element_id, "element reached twice");
            return Err(ElementsError::CycleDetected {
                element_id: element_id.to_string(),
            });
        }
        Ok(())
    }

    /// Number of elements entered so far
    pub fn visited(&self) -> usize {
        self.visited.len()
    }
}

/// Full transitive closure of element ids below `root`, breadth first
///
/// Children are gathered from both stages so live-only leftovers are part of
/// the closure.
///
/// # Errors
///
/// * `CascadeDepthExceeded` - the tree is deeper than `max_depth`
/// * `CycleDetected` - an element is reachable twice
/// * `Persistence` - a lookup fails
pub fn descendant_ids<S: ElementStore + ?Sized>(
    store: &S,
    root: &HolderRef,
    max_depth: usize,
) -> Result<Vec<String>> {
    let mut guard = WalkGuard::new(root, max_depth);
    let mut ids = Vec::new();
    let mut frontier = vec![root.clone()];
    let mut depth = 0usize;

    while !frontier.is_empty() {
        depth += 1;
        let mut next = Vec::new();
        for holder in &frontier {
            for child in children_in_any_stage(store, holder)? {
                guard.enter(&child.id, depth)?;
                next.push(child.as_holder());
                ids.push(child.id);
            }
        }
        frontier = next;
    }

    Ok(ids)
}
