//! Editing-surface interface
//!
//! The calls a CMS editor (or the administrative CLI) makes into the
//! relation engine. Who is looking is passed explicitly as a
//! [`ViewerContext`]; nothing here inspects ambient request state.

use serde::Serialize;

use crate::cascade::{has_modified_descendant, CascadeOptions};
use crate::errors::{ElementsError, Result};
use crate::model::{Element, HasElementRelations, Stage};
use crate::ops::element_ops::{read_element, write_element};
use crate::ops::seeding::{defaults_created, seed_container_defaults};
use crate::ops::store::ElementStore;
use crate::ops::url_segment::SegmentLookupCache;
use crate::registry::RelationRegistry;

/// Name of the machine-readable status header
pub const STATUS_HEADER: &str = "X-Status";

/// Who a listing is produced for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerContext {
    /// CMS user: sees drafts, hidden elements included
    Editor,
    /// Public visitor: sees live, visible elements only
    Visitor,
}

impl ViewerContext {
    pub fn is_editor(&self) -> bool {
        matches!(self, ViewerContext::Editor)
    }
}

/// Elements under one relation of an owner, ordered by sort
///
/// # Errors
///
/// Returns `Persistence` if the children lookup fails.
pub fn elements_by_relation<S, O>(
    store: &S,
    owner: &O,
    relation_name: &str,
    viewer: ViewerContext,
) -> Result<Vec<Element>>
where
    S: ElementStore + ?Sized,
    O: HasElementRelations + ?Sized,
{
    let stage = if viewer.is_editor() {
        Stage::Draft
    } else {
        Stage::Live
    };
    Ok(store
        .children(&owner.holder_ref(), stage)?
        .into_iter()
        .filter(|e| e.relation_name == relation_name)
        .filter(|e| viewer.is_editor() || e.visible)
        .collect())
}

/// One entry of the "add element" menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddableType {
    pub type_tag: String,
    pub label: String,
}

/// Types an editor may add under a relation, sorted by tag
pub fn addable_types<O: HasElementRelations + ?Sized>(
    registry: &RelationRegistry,
    owner: &O,
    relation_name: &str,
) -> Vec<AddableType> {
    let mut types: Vec<AddableType> = registry
        .validate_classes(registry.permitted_types(owner.owner_type(), relation_name))
        .into_iter()
        .map(|tag| AddableType {
            label: registry.label_for(&tag).to_string(),
            type_tag: tag,
        })
        .collect();
    types.sort_by(|a, b| a.type_tag.cmp(&b.type_tag));
    types
}

/// Add a new element of `type_tag` under a relation of `owner`
///
/// # Errors
///
/// * `RelationNotPermitted` - the relation/type pair is not configured
/// * `UnknownElementType` - the tag is not an element type
/// * `Persistence` - a lookup or the write fails
pub fn add_element<S, O>(
    store: &mut S,
    registry: &RelationRegistry,
    cache: &mut SegmentLookupCache,
    owner: &O,
    relation_name: &str,
    type_tag: &str,
) -> Result<Element>
where
    S: ElementStore + ?Sized,
    O: HasElementRelations + ?Sized,
{
    if !registry.is_permitted(owner.owner_type(), relation_name, type_tag) {
        return Err(ElementsError::RelationNotPermitted {
            owner_type: owner.owner_type().to_string(),
            relation_name: relation_name.to_string(),
            type_tag: type_tag.to_string(),
        });
    }

    let mut element = registry.instantiate(type_tag)?;
    element.populate(registry.label_for(type_tag), owner.holder_ref(), relation_name);
    write_element(store, cache, &mut element)?;
    Ok(element)
}

/// Publication flags shown next to an element in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ElementStatus {
    /// A live snapshot exists
    pub published: bool,
    /// Only a draft snapshot exists
    pub draft_only: bool,
    /// The element or something below it has unpublished changes
    pub modified: bool,
    pub hidden: bool,
}

impl ElementStatus {
    /// Short flag names, in display order
    pub fn flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.published && !self.modified {
            flags.push("published");
        }
        if self.draft_only {
            flags.push("draft");
        }
        if self.modified && !self.draft_only {
            flags.push("modified");
        }
        if self.hidden {
            flags.push("hidden");
        }
        flags
    }
}

/// Publication status of one element
///
/// # Errors
///
/// * `ElementNotFound` - no draft snapshot
/// * `CascadeDepthExceeded` / `CycleDetected` - the tree below is corrupt
/// * `Persistence` - a lookup fails
pub fn element_status<S: ElementStore + ?Sized>(
    store: &S,
    element_id: &str,
    options: &CascadeOptions,
) -> Result<ElementStatus> {
    let element = read_element(store, element_id, Stage::Draft)?;
    let published = store.element(element_id, Stage::Live)?.is_some();
    let modified = store.stages_differ(element_id)?
        || has_modified_descendant(store, &element.as_holder(), options)?;

    Ok(ElementStatus {
        published,
        draft_only: !published,
        modified,
        hidden: !element.visible,
    })
}

/// Whether the "publish page" action should be offered for an element
///
/// # Errors
///
/// As [`element_status`].
pub fn offers_publish_page<S: ElementStore + ?Sized>(
    store: &S,
    element_id: &str,
    options: &CascadeOptions,
) -> Result<bool> {
    let element = read_element(store, element_id, Stage::Draft)?;
    Ok(store.stages_differ(element_id)?
        || has_modified_descendant(store, &element.as_holder(), options)?)
}

/// Whether the "create default elements" action should be offered
///
/// # Errors
///
/// Returns `Persistence` if the children lookup fails.
pub fn offers_default_seeding<S, O>(store: &S, registry: &RelationRegistry, owner: &O) -> Result<bool>
where
    S: ElementStore + ?Sized,
    O: HasElementRelations + ?Sized,
{
    if registry.defaults_for(owner.owner_type()).is_empty() {
        return Ok(false);
    }
    Ok(!defaults_created(store, registry, owner)?)
}

/// Outcome of the "create default elements" administrative action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub created: usize,
}

impl StatusReport {
    /// Value of the [`STATUS_HEADER`] header
    pub fn header_value(&self) -> String {
        format!("Created {} elements.", self.created)
    }

    /// Full header line, e.g. `X-Status: Created 2 elements.`
    pub fn header_line(&self) -> String {
        format!("{}: {}", STATUS_HEADER, self.header_value())
    }
}

/// Create the default elements for the container with `container_id`
///
/// Uses a fresh segment cache scoped to this call.
///
/// # Errors
///
/// * `ContainerNotFound` - the id does not resolve; nothing is created
/// * `UnknownElementType` / `Persistence` - as [`seed_container_defaults`]
pub fn create_default_elements<S: ElementStore + ?Sized>(
    store: &mut S,
    registry: &RelationRegistry,
    container_id: &str,
) -> Result<StatusReport> {
    let mut cache = SegmentLookupCache::new();
    let created = seed_container_defaults(store, registry, &mut cache, container_id)?;
    Ok(StatusReport { created })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_header_text() {
        let report = StatusReport { created: 3 };
        assert_eq!(report.header_value(), "Created 3 elements.");
        assert_eq!(report.header_line(), "X-Status: Created 3 elements.");
    }

    #[test]
    fn test_status_flags() {
        let draft = ElementStatus {
            draft_only: true,
            modified: true,
            ..ElementStatus::default()
        };
        assert_eq!(draft.flags(), vec!["draft"]);

        let changed = ElementStatus {
            published: true,
            modified: true,
            hidden: true,
            ..ElementStatus::default()
        };
        assert_eq!(changed.flags(), vec!["modified", "hidden"]);

        let clean = ElementStatus {
            published: true,
            ..ElementStatus::default()
        };
        assert_eq!(clean.flags(), vec!["published"]);
    }
}
