use std::time::Instant;

use super::{CascadeOptions, DeleteMode};
use crate::errors::Result;
use crate::model::{HolderRef, Stage};
use crate::ops::store::ElementStore;
use crate::traversal::{children_in_any_stage, WalkGuard};
use crate::{log_op_end, log_op_error, log_op_start};

/// Remove the snapshots of every descendant of `root`
///
/// The walk is top-down: each child's snapshots are removed before its own
/// children are visited, and the caller removes the root's own snapshots
/// only after this returns. Children are gathered from both stages, so a
/// draft-deleted child that is still live gets unpublished too.
///
/// `UnpublishOnly` leaves every draft snapshot untouched.
///
/// Returns the number of descendants visited.
///
/// # Errors
///
/// * `CascadeDepthExceeded` / `CycleDetected` - the tree is corrupt
/// * `Persistence` - a delete failed; earlier removals stay applied
pub fn delete_cascade<S: ElementStore + ?Sized>(
    store: &mut S,
    root: &HolderRef,
    mode: DeleteMode,
    options: &CascadeOptions,
) -> Result<usize> {
    let start = Instant::now();
    log_op_start!("delete_cascade", root = %root, mode = mode.as_str());

    let mut guard = WalkGuard::new(root, options.max_depth);
    match delete_children(store, root, mode, 1, &mut guard) {
        Ok(()) => {
            log_op_end!(
                "delete_cascade",
                duration_ms = start.elapsed().as_millis() as u64,
                root = %root,
                mode = mode.as_str(),
                visited = guard.visited()
            );
            Ok(guard.visited())
        }
        Err(err) => {
            log_op_error!(
                "delete_cascade",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                root = %root,
                mode = mode.as_str()
            );
            Err(err)
        }
    }
}

fn delete_children<S: ElementStore + ?Sized>(
    store: &mut S,
    holder: &HolderRef,
    mode: DeleteMode,
    depth: usize,
    guard: &mut WalkGuard,
) -> Result<()> {
    for child in children_in_any_stage(&*store, holder)? {
        guard.enter(&child.id, depth)?;

        store.delete_element_from_stage(&child.id, Stage::Live)?;
        if mode == DeleteMode::FullDelete {
            store.delete_element_from_stage(&child.id, Stage::Draft)?;
        }
        tracing::debug!(element_id = %child.id, depth, mode = mode.as_str(), "element removed");

        delete_children(store, &child.as_holder(), mode, depth + 1, guard)?;
    }
    Ok(())
}
