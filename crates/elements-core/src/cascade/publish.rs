use std::time::Instant;

use super::CascadeOptions;
use crate::errors::{ElementsError, Result};
use crate::model::{HolderRef, Stage};
use crate::ops::container_ops::publish_container;
use crate::ops::store::ElementStore;
use crate::traversal::{holder_page, WalkGuard};
use crate::{log_op_end, log_op_error, log_op_start};

/// Message reported when a page and its elements were published
pub const PUBLISHED_MESSAGE: &str = "Page & elements published";

/// Message reported when no page could be found above an element
pub const UNREACHABLE_MESSAGE: &str = "There was an error publishing the page";

/// Result of publishing the page that owns an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published {
        container_id: String,
        /// Elements copied to live by the cascade
        published: usize,
        message: String,
    },
    /// No root container above the element; nothing was written
    TargetUnreachable { element_id: String, message: String },
}

impl PublishOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, PublishOutcome::Published { .. })
    }

    /// User-facing status message
    pub fn message(&self) -> &str {
        match self {
            PublishOutcome::Published { message, .. }
            | PublishOutcome::TargetUnreachable { message, .. } => message,
        }
    }
}

/// Copy every draft descendant of `root` onto live, top-down
///
/// The root itself is not copied. Re-running on a synced tree rewrites the
/// same live snapshots and changes nothing else.
///
/// Returns the number of elements published.
///
/// # Errors
///
/// * `CascadeDepthExceeded` / `CycleDetected` - the tree is corrupt
/// * `Persistence` - a write failed; earlier copies stay applied
pub fn publish_cascade<S: ElementStore + ?Sized>(
    store: &mut S,
    root: &HolderRef,
    options: &CascadeOptions,
) -> Result<usize> {
    let start = Instant::now();
    log_op_start!("publish_cascade", root = %root);

    let mut guard = WalkGuard::new(root, options.max_depth);
    match publish_children(store, root, 1, &mut guard) {
        Ok(()) => {
            log_op_end!(
                "publish_cascade",
                duration_ms = start.elapsed().as_millis() as u64,
                root = %root,
                visited = guard.visited()
            );
            Ok(guard.visited())
        }
        Err(err) => {
            log_op_error!(
                "publish_cascade",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                root = %root
            );
            Err(err)
        }
    }
}

fn publish_children<S: ElementStore + ?Sized>(
    store: &mut S,
    holder: &HolderRef,
    depth: usize,
    guard: &mut WalkGuard,
) -> Result<()> {
    for child in store.children(holder, Stage::Draft)? {
        guard.enter(&child.id, depth)?;
        store.write_element(&child, Stage::Live)?;
        tracing::debug!(element_id = %child.id, depth, "element published");
        publish_children(store, &child.as_holder(), depth + 1, guard)?;
    }
    Ok(())
}

/// Publish the page an element ultimately belongs to
///
/// Walks up the holder chain to the root container, then publishes that
/// container and cascades over its whole tree. An element with no reachable
/// container is a soft failure reported through
/// [`PublishOutcome::TargetUnreachable`].
///
/// # Errors
///
/// * `ElementNotFound` - no draft snapshot for `element_id`
/// * `CascadeDepthExceeded` / `CycleDetected` - the tree is corrupt
/// * `Persistence` - a write failed
pub fn publish_container_page<S: ElementStore + ?Sized>(
    store: &mut S,
    element_id: &str,
    options: &CascadeOptions,
) -> Result<PublishOutcome> {
    let start = Instant::now();
    log_op_start!("publish_container_page", element_id = element_id);

    let result = publish_page_inner(store, element_id, options);
    match &result {
        Ok(outcome) => log_op_end!(
            "publish_container_page",
            duration_ms = start.elapsed().as_millis() as u64,
            element_id = element_id,
            published = outcome.is_published()
        ),
        Err(err) => log_op_error!(
            "publish_container_page",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            element_id = element_id
        ),
    }
    result
}

fn publish_page_inner<S: ElementStore + ?Sized>(
    store: &mut S,
    element_id: &str,
    options: &CascadeOptions,
) -> Result<PublishOutcome> {
    let element =
        store
            .element(element_id, Stage::Draft)?
            .ok_or_else(|| ElementsError::ElementNotFound {
                element_id: element_id.to_string(),
            })?;

    let container = match holder_page(&*store, &element, options.max_depth)? {
        Some(container) => container,
        None => {
            tracing::warn!(element_id, "no page above element, nothing published");
            return Ok(PublishOutcome::TargetUnreachable {
                element_id: element_id.to_string(),
                message: UNREACHABLE_MESSAGE.to_string(),
            });
        }
    };

    let published = publish_container(store, &container.id, options)?;
    Ok(PublishOutcome::Published {
        container_id: container.id,
        published,
        message: PUBLISHED_MESSAGE.to_string(),
    })
}
