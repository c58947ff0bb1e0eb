use std::collections::HashSet;

use crate::errors::{ElementsError, Result};
use crate::model::{Container, Element, Holder, HolderRef, Stage};
use crate::ops::store::ElementStore;

/// Load the holder an element hangs off
///
/// Returns `None` for unattached elements and for holder references that do
/// not resolve in the given stage.
///
/// # Errors
///
/// Returns `Persistence` if a lookup fails.
pub fn holder_of<S: ElementStore + ?Sized>(
    store: &S,
    element: &Element,
    stage: Stage,
) -> Result<Option<Holder>> {
    match &element.holder {
        None => Ok(None),
        Some(HolderRef::Container(id)) => Ok(store.container(id, stage)?.map(Holder::Container)),
        Some(HolderRef::Element(id)) => Ok(store.element(id, stage)?.map(Holder::Element)),
    }
}

/// Walk up the holder chain to the root container (draft stage)
///
/// Follows parent references until a `Container` is reached. A broken or
/// missing link ends the walk with `None`.
///
/// # Errors
///
/// * `CascadeDepthExceeded` - more than `max_depth` element links above `element`
/// * `CycleDetected` - an element appears twice in its own chain
/// * `Persistence` - a lookup fails
pub fn holder_page<S: ElementStore + ?Sized>(
    store: &S,
    element: &Element,
    max_depth: usize,
) -> Result<Option<Container>> {
    let mut seen = HashSet::new();
    seen.insert(element.id.clone());

    let mut current = holder_of(store, element, Stage::Draft)?;
    let mut depth = 0usize;

    while let Some(holder) = current {
        let parent = match holder {
            Holder::Container(container) => return Ok(Some(container)),
            Holder::Element(parent) => parent,
        };

        depth += 1;
        if depth > max_depth {
            tracing::error!(
                element_id = %element.id,
                max_depth,
                "holder chain exceeds maximum depth"
            );
            return Err(ElementsError::CascadeDepthExceeded {
                root_id: element.id.clone(),
                max_depth,
            });
        }
        if !seen.insert(parent.id.clone()) {
            tracing::error!(element_id = %parent.id, "holder chain loops");
            return Err(ElementsError::CycleDetected {
                element_id: parent.id,
            });
        }

        current = holder_of(store, &parent, Stage::Draft)?;
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::MemoryStore;

    fn child_of(store: &mut MemoryStore, holder: HolderRef) -> Element {
        let mut element = Element::new("TextElement");
        element.holder = Some(holder);
        store.write_element(&element, Stage::Draft).unwrap();
        element
    }

    #[test]
    fn test_holder_page_walks_to_container() {
        let mut store = MemoryStore::new();
        let page = Container::new("Page", "Home");
        store.write_container(&page, Stage::Draft).unwrap();

        let top = child_of(&mut store, page.as_holder());
        let mid = child_of(&mut store, top.as_holder());
        let leaf = child_of(&mut store, mid.as_holder());

        let found = holder_page(&store, &leaf, 16).unwrap();
        assert_eq!(found.map(|c| c.id), Some(page.id));
    }

    #[test]
    fn test_holder_page_unattached_is_none() {
        let store = MemoryStore::new();
        let element = Element::new("TextElement");
        assert!(holder_page(&store, &element, 16).unwrap().is_none());
    }

    #[test]
    fn test_holder_page_broken_chain_is_none() {
        let mut store = MemoryStore::new();
        let orphan = child_of(&mut store, HolderRef::Element("gone".to_string()));
        assert!(holder_page(&store, &orphan, 16).unwrap().is_none());
    }

    #[test]
    fn test_holder_page_depth_bound() {
        let mut store = MemoryStore::new();
        let page = Container::new("Page", "Home");
        store.write_container(&page, Stage::Draft).unwrap();

        let mut current = child_of(&mut store, page.as_holder());
        for _ in 0..4 {
            current = child_of(&mut store, current.as_holder());
        }

        let result = holder_page(&store, &current, 2);
        assert!(matches!(
            result,
            Err(ElementsError::CascadeDepthExceeded { max_depth: 2, .. })
        ));
    }

    #[test]
    fn test_holder_page_detects_loop() {
        let mut store = MemoryStore::new();
        let mut a = Element::new("TextElement");
        let mut b = Element::new("TextElement");
        a.holder = Some(b.as_holder());
        b.holder = Some(a.as_holder());
        store.write_element(&a, Stage::Draft).unwrap();
        store.write_element(&b, Stage::Draft).unwrap();

        let result = holder_page(&store, &a, 16);
        assert!(matches!(result, Err(ElementsError::CycleDetected { .. })));
    }
}
