use std::collections::BTreeSet;
use std::time::Instant;

use super::CascadeOptions;
use crate::errors::Result;
use crate::model::HolderRef;
use crate::ops::store::ElementStore;
use crate::traversal::{children_in_any_stage, descendant_ids, WalkGuard};
use crate::{log_op_end, log_op_error, log_op_start};

/// Whether any descendant's draft and live snapshots differ
///
/// Depth-first; stops at the first differing element.
///
/// # Errors
///
/// * `CascadeDepthExceeded` / `CycleDetected` - the tree is corrupt
/// * `Persistence` - a lookup failed
pub fn has_modified_descendant<S: ElementStore + ?Sized>(
    store: &S,
    root: &HolderRef,
    options: &CascadeOptions,
) -> Result<bool> {
    let mut guard = WalkGuard::new(root, options.max_depth);
    let found = find_modified(store, root, 1, &mut guard)?;
    tracing::debug!(root = %root, visited = guard.visited(), found, "modified check");
    Ok(found)
}

fn find_modified<S: ElementStore + ?Sized>(
    store: &S,
    holder: &HolderRef,
    depth: usize,
    guard: &mut WalkGuard,
) -> Result<bool> {
    for child in children_in_any_stage(store, holder)? {
        guard.enter(&child.id, depth)?;
        if store.stages_differ(&child.id)? {
            return Ok(true);
        }
        if find_modified(store, &child.as_holder(), depth + 1, guard)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Ids of every descendant with an unpublished draft version
///
/// Collects the full transitive closure below `root`, then asks the store
/// for the modified subset in one call, comparing latest draft version with
/// latest published version per record.
///
/// # Errors
///
/// * `CascadeDepthExceeded` / `CycleDetected` - the tree is corrupt
/// * `Persistence` - a lookup failed
pub fn modified_descendants<S: ElementStore + ?Sized>(
    store: &S,
    root: &HolderRef,
    options: &CascadeOptions,
) -> Result<BTreeSet<String>> {
    let start = Instant::now();
    log_op_start!("modified_descendants", root = %root);

    let result =
        descendant_ids(store, root, options.max_depth).and_then(|ids| store.modified_ids(&ids));
    match &result {
        Ok(modified) => log_op_end!(
            "modified_descendants",
            duration_ms = start.elapsed().as_millis() as u64,
            root = %root,
            modified = modified.len()
        ),
        Err(err) => log_op_error!(
            "modified_descendants",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            root = %root
        ),
    }
    result
}
