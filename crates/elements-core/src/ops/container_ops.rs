use std::time::Instant;

use super::store::ElementStore;
use crate::cascade::{delete_cascade, publish_cascade, CascadeOptions, DeleteMode};
use crate::errors::{ElementsError, Result};
use crate::model::{Container, Stage};
use crate::{log_op_end, log_op_error, log_op_start};

/// Create a container (page) and write its draft snapshot
///
/// # Errors
///
/// * `InvalidTitle` - title is empty or whitespace-only
/// * `Persistence` - the write fails
pub fn create_container<S: ElementStore + ?Sized>(
    store: &mut S,
    type_name: &str,
    title: &str,
) -> Result<Container> {
    if title.trim().is_empty() {
        return Err(ElementsError::InvalidTitle {
            reason: "Title cannot be empty or whitespace-only".to_string(),
        });
    }

    let mut container = Container::new(type_name, title);
    container.version = store.write_container(&container, Stage::Draft)?;
    Ok(container)
}

/// Load one snapshot of a container
///
/// # Errors
///
/// * `ContainerNotFound` - no snapshot in that stage
/// * `Persistence` - the lookup fails
pub fn read_container<S: ElementStore + ?Sized>(
    store: &S,
    id: &str,
    stage: Stage,
) -> Result<Container> {
    store
        .container(id, stage)?
        .ok_or_else(|| ElementsError::ContainerNotFound {
            container_id: id.to_string(),
        })
}

/// Publish a container and cascade over its element tree
///
/// Returns the number of elements published.
///
/// # Errors
///
/// * `ContainerNotFound` - no draft snapshot; nothing is written
/// * `CascadeDepthExceeded` / `CycleDetected` - the tree is corrupt
/// * `Persistence` - a write fails; the tree is left partially published
pub fn publish_container<S: ElementStore + ?Sized>(
    store: &mut S,
    id: &str,
    options: &CascadeOptions,
) -> Result<usize> {
    let start = Instant::now();
    log_op_start!("publish_container", container_id = id);

    let result = read_container(&*store, id, Stage::Draft).and_then(|container| {
        store.write_container(&container, Stage::Live)?;
        publish_cascade(store, &container.as_holder(), options)
    });
    match &result {
        Ok(published) => log_op_end!(
            "publish_container",
            duration_ms = start.elapsed().as_millis() as u64,
            container_id = id,
            visited = *published
        ),
        Err(err) => log_op_error!(
            "publish_container",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            container_id = id
        ),
    }
    result
}

/// Unpublish or delete a container with its whole element tree
///
/// Descendants are handled first, then the container's own snapshots.
/// Returns the number of descendants visited.
///
/// # Errors
///
/// * `ContainerNotFound` - no snapshot in either stage; nothing is removed
/// * `CascadeDepthExceeded` / `CycleDetected` - the tree is corrupt
/// * `Persistence` - a delete fails; the tree is left partially removed
pub fn delete_container<S: ElementStore + ?Sized>(
    store: &mut S,
    id: &str,
    mode: DeleteMode,
    options: &CascadeOptions,
) -> Result<usize> {
    let start = Instant::now();
    log_op_start!("delete_container", container_id = id, mode = mode.as_str());

    let result = delete_container_inner(store, id, mode, options);
    match &result {
        Ok(visited) => log_op_end!(
            "delete_container",
            duration_ms = start.elapsed().as_millis() as u64,
            container_id = id,
            visited = *visited
        ),
        Err(err) => log_op_error!(
            "delete_container",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            container_id = id
        ),
    }
    result
}

fn delete_container_inner<S: ElementStore + ?Sized>(
    store: &mut S,
    id: &str,
    mode: DeleteMode,
    options: &CascadeOptions,
) -> Result<usize> {
    let draft = store.container(id, Stage::Draft)?;
    let live = store.container(id, Stage::Live)?;
    let container = draft
        .or(live)
        .ok_or_else(|| ElementsError::ContainerNotFound {
            container_id: id.to_string(),
        })?;

    let visited = delete_cascade(store, &container.as_holder(), mode, options)?;
    store.delete_container_from_stage(id, Stage::Live)?;
    if mode == DeleteMode::FullDelete {
        store.delete_container_from_stage(id, Stage::Draft)?;
    }
    Ok(visited)
}
