use std::time::Instant;

use super::sort_sequencer::next_sort;
use super::store::ElementStore;
use super::url_segment::{generate_url_segment, SegmentLookupCache};
use crate::cascade::{delete_cascade, publish_cascade, CascadeOptions, DeleteMode};
use crate::errors::{ElementsError, Result};
use crate::model::{Element, HolderRef, Stage};
use crate::{log_op_end, log_op_error, log_op_start};

/// Fill in the fields computed just before an element's draft write
///
/// A missing URL segment is derived from the title. A segment set by the
/// caller is filtered and de-duplicated the same way, so a clean unique slug
/// comes back unchanged. A missing sort position is taken from the holder's
/// scope; unattached elements keep sort 0 until written with a holder.
///
/// # Errors
///
/// Returns `Persistence` if a lookup fails, or `SortExhausted` when the
/// holder has no sort position left.
pub fn prepare_for_write<S: ElementStore + ?Sized>(
    store: &S,
    cache: &mut SegmentLookupCache,
    element: &mut Element,
) -> Result<()> {
    let candidate = if element.has_url_segment() {
        &element.url_segment
    } else {
        &element.title
    };
    element.url_segment = generate_url_segment(
        store,
        cache,
        &element.type_tag,
        candidate,
        Some(&element.id),
    )?;
    if !element.has_sort() {
        if let Some(holder) = &element.holder {
            element.sort = next_sort(store, holder)?;
        }
    }
    Ok(())
}

/// Write an element's draft snapshot
///
/// Runs [`prepare_for_write`] first and updates `element.version` with the
/// version the store assigned.
///
/// # Errors
///
/// Returns `Persistence` if a lookup or the write fails.
pub fn write_element<S: ElementStore + ?Sized>(
    store: &mut S,
    cache: &mut SegmentLookupCache,
    element: &mut Element,
) -> Result<u64> {
    prepare_for_write(&*store, cache, element)?;
    let version = store.write_element(element, Stage::Draft)?;
    cache.record_write(&element.type_tag, &element.url_segment);
    element.version = version;
    Ok(version)
}

/// Create and write a new element under a holder
///
/// Does not check the relation against configuration; the editing surface
/// does that before calling in.
///
/// # Errors
///
/// Returns `Persistence` if a lookup or the write fails.
pub fn create_element<S: ElementStore + ?Sized>(
    store: &mut S,
    cache: &mut SegmentLookupCache,
    type_tag: &str,
    title: &str,
    holder: HolderRef,
    relation_name: &str,
) -> Result<Element> {
    let mut element = Element::new(type_tag);
    element.title = title.to_string();
    element.holder = Some(holder);
    element.relation_name = relation_name.to_string();

    write_element(store, cache, &mut element)?;
    tracing::debug!(
        element_id = %element.id,
        type_tag,
        relation_name,
        sort = element.sort,
        "element created"
    );
    Ok(element)
}

/// Load one snapshot of an element
///
/// # Errors
///
/// * `ElementNotFound` - no snapshot in that stage
/// * `Persistence` - the lookup fails
pub fn read_element<S: ElementStore + ?Sized>(
    store: &S,
    id: &str,
    stage: Stage,
) -> Result<Element> {
    store
        .element(id, stage)?
        .ok_or_else(|| ElementsError::ElementNotFound {
            element_id: id.to_string(),
        })
}

/// Change an element's title and regenerate its URL segment
///
/// The element's own current segment does not count as a collision.
///
/// # Errors
///
/// * `ElementNotFound` - no draft snapshot
/// * `Persistence` - a lookup or the write fails
pub fn rename_element<S: ElementStore + ?Sized>(
    store: &mut S,
    cache: &mut SegmentLookupCache,
    id: &str,
    title: &str,
) -> Result<Element> {
    let mut element = read_element(&*store, id, Stage::Draft)?;
    element.title = title.to_string();
    element.url_segment.clear();
    write_element(store, cache, &mut element)?;
    Ok(element)
}

/// Publish one element and everything below it
///
/// Returns the number of elements published, the element itself included.
///
/// # Errors
///
/// * `ElementNotFound` - no draft snapshot
/// * `CascadeDepthExceeded` / `CycleDetected` - the tree is corrupt
/// * `Persistence` - a write fails
pub fn publish_element<S: ElementStore + ?Sized>(
    store: &mut S,
    id: &str,
    options: &CascadeOptions,
) -> Result<usize> {
    let element = read_element(&*store, id, Stage::Draft)?;
    store.write_element(&element, Stage::Live)?;
    Ok(1 + publish_cascade(store, &element.as_holder(), options)?)
}

/// Delete or unpublish an element together with its descendants
///
/// Descendants go first; the element's own snapshots are removed last.
/// `UnpublishOnly` removes live snapshots and keeps every draft.
///
/// Returns the number of descendants visited.
///
/// # Errors
///
/// * `ElementNotFound` - the element has no snapshot in either stage
/// * `CascadeDepthExceeded` / `CycleDetected` - the tree is corrupt
/// * `Persistence` - a delete fails; the tree is left partially removed
pub fn delete_element<S: ElementStore + ?Sized>(
    store: &mut S,
    id: &str,
    mode: DeleteMode,
    options: &CascadeOptions,
) -> Result<usize> {
    let start = Instant::now();
    log_op_start!("delete_element", element_id = id, mode = mode.as_str());

    let result = delete_element_inner(store, id, mode, options);
    match &result {
        Ok(visited) => log_op_end!(
            "delete_element",
            duration_ms = start.elapsed().as_millis() as u64,
            element_id = id,
            visited = *visited
        ),
        Err(err) => log_op_error!(
            "delete_element",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            element_id = id
        ),
    }
    result
}

fn delete_element_inner<S: ElementStore + ?Sized>(
    store: &mut S,
    id: &str,
    mode: DeleteMode,
    options: &CascadeOptions,
) -> Result<usize> {
    let exists =
        store.element(id, Stage::Draft)?.is_some() || store.element(id, Stage::Live)?.is_some();
    if !exists {
        return Err(ElementsError::ElementNotFound {
            element_id: id.to_string(),
        });
    }

    let visited = delete_cascade(store, &HolderRef::Element(id.to_string()), mode, options)?;
    store.delete_element_from_stage(id, Stage::Live)?;
    if mode == DeleteMode::FullDelete {
        store.delete_element_from_stage(id, Stage::Draft)?;
    }
    Ok(visited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::MemoryStore;

    fn page() -> HolderRef {
        HolderRef::Container("page-1".to_string())
    }

    #[test]
    fn test_create_assigns_segment_sort_and_version() {
        let mut store = MemoryStore::new();
        let mut cache = SegmentLookupCache::new();

        let element = create_element(
            &mut store,
            &mut cache,
            "TextElement",
            "Hello World!",
            page(),
            "Elements",
        )
        .unwrap();

        assert_eq!(element.url_segment, "hello-world");
        assert_eq!(element.sort, 1);
        assert_eq!(element.version, 1);
        assert!(!element.is_transient());
    }

    #[test]
    fn test_explicit_sort_is_kept() {
        let mut store = MemoryStore::new();
        let mut cache = SegmentLookupCache::new();
        let mut element = Element::new("TextElement");
        element.holder = Some(page());
        element.sort = 40;

        write_element(&mut store, &mut cache, &mut element).unwrap();
        assert_eq!(element.sort, 40);
    }

    #[test]
    fn test_segment_not_recomputed_on_rewrite() {
        let mut store = MemoryStore::new();
        let mut cache = SegmentLookupCache::new();
        let mut element =
            create_element(&mut store, &mut cache, "TextElement", "First", page(), "Elements")
                .unwrap();

        element.title = "Second".to_string();
        write_element(&mut store, &mut cache, &mut element).unwrap();
        assert_eq!(element.url_segment, "first");
    }

    #[test]
    fn test_rename_regenerates_segment() {
        let mut store = MemoryStore::new();
        let mut cache = SegmentLookupCache::new();
        let element =
            create_element(&mut store, &mut cache, "TextElement", "First", page(), "Elements")
                .unwrap();

        let renamed = rename_element(&mut store, &mut cache, &element.id, "Second Take").unwrap();
        assert_eq!(renamed.url_segment, "second-take");
        assert_eq!(renamed.sort, element.sort);
    }

    #[test]
    fn test_rename_same_title_keeps_segment() {
        let mut store = MemoryStore::new();
        let mut cache = SegmentLookupCache::new();
        let element =
            create_element(&mut store, &mut cache, "TextElement", "Same", page(), "Elements")
                .unwrap();

        let renamed = rename_element(&mut store, &mut cache, &element.id, "Same").unwrap();
        assert_eq!(renamed.url_segment, "same");
    }

    #[test]
    fn test_delete_missing_element_is_not_found() {
        let mut store = MemoryStore::new();
        let result = delete_element(
            &mut store,
            "missing",
            DeleteMode::FullDelete,
            &CascadeOptions::default(),
        );
        assert!(matches!(result, Err(ElementsError::ElementNotFound { .. })));
    }

    #[test]
    fn test_publish_element_counts_itself_and_children() {
        let mut store = MemoryStore::new();
        let mut cache = SegmentLookupCache::new();
        let parent =
            create_element(&mut store, &mut cache, "ListElement", "List", page(), "Elements")
                .unwrap();
        create_element(
            &mut store,
            &mut cache,
            "TextElement",
            "Item",
            parent.as_holder(),
            "Items",
        )
        .unwrap();

        let published =
            publish_element(&mut store, &parent.id, &CascadeOptions::default()).unwrap();
        assert_eq!(published, 2);
        assert_eq!(store.element_count(Stage::Live), 2);
    }
}
