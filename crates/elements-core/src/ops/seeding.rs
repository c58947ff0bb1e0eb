//! Default element seeding
//!
//! Creates the configured default elements for an owner's relations,
//! skipping every (relation, type) pair that already has an element.

use std::time::Instant;

use super::element_ops::write_element;
use super::store::ElementStore;
use super::url_segment::SegmentLookupCache;
use crate::errors::{ElementsError, Result};
use crate::model::{Element, HasElementRelations, Stage};
use crate::registry::RelationRegistry;
use crate::{log_op_end, log_op_error, log_op_start};

/// (relation, type tag) pairs the owner should have, in declaration order
///
/// Defaults naming a relation the owner does not declare, or a type the
/// relation does not permit, are skipped with a warning.
fn default_pairs<'a, O: HasElementRelations + ?Sized>(
    registry: &'a RelationRegistry,
    owner: &O,
) -> Vec<(&'a str, &'a str)> {
    let owner_type = owner.owner_type();
    let mut pairs = Vec::new();
    for (relation, tags) in registry.defaults_for(owner_type).iter() {
        if !registry.relations_for(owner_type).contains(relation) {
            tracing::warn!(
                owner_type,
                relation_name = relation,
                "defaults name an undeclared relation, skipped"
            );
            continue;
        }
        for tag in tags {
            if registry.is_permitted(owner_type, relation, tag) {
                pairs.push((relation, tag.as_str()));
            } else {
                tracing::warn!(
                    owner_type,
                    relation_name = relation,
                    type_tag = %tag,
                    "default type not permitted in relation, skipped"
                );
            }
        }
    }
    pairs
}

fn has_pair(existing: &[Element], relation: &str, type_tag: &str) -> bool {
    existing
        .iter()
        .any(|e| e.relation_name == relation && e.type_tag == type_tag)
}

/// Create the owner's missing default elements
///
/// Returns how many elements were created. A second call right after the
/// first creates none.
///
/// # Errors
///
/// * `UnknownElementType` - a default tag cannot be instantiated
/// * `Persistence` - a lookup or write fails; earlier creations stay
pub fn seed_defaults<S, O>(
    store: &mut S,
    registry: &RelationRegistry,
    cache: &mut SegmentLookupCache,
    owner: &O,
) -> Result<usize>
where
    S: ElementStore + ?Sized,
    O: HasElementRelations + ?Sized,
{
    let start = Instant::now();
    let holder = owner.holder_ref();
    log_op_start!("seed_defaults", holder = %holder);

    let result = seed_inner(store, registry, cache, owner);
    match &result {
        Ok(created) => log_op_end!(
            "seed_defaults",
            duration_ms = start.elapsed().as_millis() as u64,
            holder = %holder,
            created = *created
        ),
        Err(err) => log_op_error!(
            "seed_defaults",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            holder = %holder
        ),
    }
    result
}

fn seed_inner<S, O>(
    store: &mut S,
    registry: &RelationRegistry,
    cache: &mut SegmentLookupCache,
    owner: &O,
) -> Result<usize>
where
    S: ElementStore + ?Sized,
    O: HasElementRelations + ?Sized,
{
    let holder = owner.holder_ref();
    let mut existing = store.children(&holder, Stage::Draft)?;
    let mut created = 0usize;

    for (relation, tag) in default_pairs(registry, owner) {
        if has_pair(&existing, relation, tag) {
            continue;
        }

        let mut element = registry.instantiate(tag)?;
        element.populate(registry.label_for(tag), holder.clone(), relation);
        write_element(store, cache, &mut element)?;
        tracing::debug!(element_id = %element.id, relation_name = relation, type_tag = tag, "default element created");

        existing.push(element);
        created += 1;
    }
    Ok(created)
}

/// Seed the defaults of a container looked up by id
///
/// # Errors
///
/// * `ContainerNotFound` - no draft snapshot; nothing is created
/// * otherwise as [`seed_defaults`]
pub fn seed_container_defaults<S: ElementStore + ?Sized>(
    store: &mut S,
    registry: &RelationRegistry,
    cache: &mut SegmentLookupCache,
    container_id: &str,
) -> Result<usize> {
    let container =
        store
            .container(container_id, Stage::Draft)?
            .ok_or_else(|| ElementsError::ContainerNotFound {
                container_id: container_id.to_string(),
            })?;
    seed_defaults(store, registry, cache, &container)
}

/// Whether every default (relation, type) pair already has an element
///
/// # Errors
///
/// Returns `Persistence` if the children lookup fails.
pub fn defaults_created<S, O>(store: &S, registry: &RelationRegistry, owner: &O) -> Result<bool>
where
    S: ElementStore + ?Sized,
    O: HasElementRelations + ?Sized,
{
    let existing = store.children(&owner.holder_ref(), Stage::Draft)?;
    Ok(default_pairs(registry, owner)
        .into_iter()
        .all(|(relation, tag)| has_pair(&existing, relation, tag)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Container;
    use crate::ops::MemoryStore;
    use crate::registry::{TypeConfig, TypeDefinition, TypeKind};

    fn registry() -> RelationRegistry {
        let config = TypeConfig::new()
            .with_type(TypeDefinition::new("ElementBase").kind(TypeKind::Element))
            .with_type(
                TypeDefinition::new("TextElement")
                    .extends("ElementBase")
                    .label("Text"),
            )
            .with_type(
                TypeDefinition::new("Page")
                    .kind(TypeKind::Container)
                    .relation("Elements", &["TextElement"])
                    .default_elements("Elements", &["TextElement"])
                    .default_elements("Sidebar", &["TextElement"]),
            );
        RelationRegistry::build(config).unwrap()
    }

    #[test]
    fn test_undeclared_default_relation_is_skipped() {
        let registry = registry();
        let mut store = MemoryStore::new();
        let mut cache = SegmentLookupCache::new();
        let page = Container::new("Page", "Home");
        store.write_container(&page, Stage::Draft).unwrap();

        let created = seed_defaults(&mut store, &registry, &mut cache, &page).unwrap();
        assert_eq!(created, 1);

        let children = store.children(&page.as_holder(), Stage::Draft).unwrap();
        assert_eq!(children[0].title, "Text title");
        assert_eq!(children[0].relation_name, "Elements");
        assert_eq!(children[0].sort, 1);
    }

    #[test]
    fn test_seed_unknown_container_creates_nothing() {
        let registry = registry();
        let mut store = MemoryStore::new();
        let mut cache = SegmentLookupCache::new();

        let result = seed_container_defaults(&mut store, &registry, &mut cache, "missing");
        assert!(matches!(result, Err(ElementsError::ContainerNotFound { .. })));
        assert_eq!(store.element_count(Stage::Draft), 0);
    }

    #[test]
    fn test_defaults_created_tracks_pairs() {
        let registry = registry();
        let mut store = MemoryStore::new();
        let mut cache = SegmentLookupCache::new();
        let page = Container::new("Page", "Home");

        assert!(!defaults_created(&store, &registry, &page).unwrap());
        seed_defaults(&mut store, &registry, &mut cache, &page).unwrap();
        assert!(defaults_created(&store, &registry, &page).unwrap());
    }
}
