use super::store::ElementStore;
use crate::errors::{ElementsError, Result};
use crate::model::HolderRef;

/// Next sort position among the holder's draft children
///
/// `max(sort) + 1`, or `1` for an empty scope. Existing siblings are never
/// renumbered, so gaps left by deletion stay.
///
/// # Errors
///
/// Returns `Persistence` if the aggregate query fails, or `SortExhausted`
/// when a sibling already sits at `u32::MAX`.
pub fn next_sort<S: ElementStore + ?Sized>(store: &S, holder: &HolderRef) -> Result<u32> {
    match store.max_sort(holder)? {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or_else(|| ElementsError::SortExhausted {
            holder: holder.to_string(),
            max_sort: max,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, Stage};
    use crate::ops::MemoryStore;

    #[test]
    fn test_empty_scope_starts_at_one() {
        let store = MemoryStore::new();
        let holder = HolderRef::Container("page-1".to_string());
        assert_eq!(next_sort(&store, &holder).unwrap(), 1);
    }

    #[test]
    fn test_scopes_are_independent() {
        let mut store = MemoryStore::new();
        let page = HolderRef::Container("page-1".to_string());
        let parent = HolderRef::Element("el-1".to_string());

        let mut element = Element::new("TextElement");
        element.holder = Some(page.clone());
        element.sort = 7;
        store.write_element(&element, Stage::Draft).unwrap();

        assert_eq!(next_sort(&store, &page).unwrap(), 8);
        assert_eq!(next_sort(&store, &parent).unwrap(), 1);
    }

    #[test]
    fn test_sort_at_max_is_an_error_not_a_wrap() {
        let mut store = MemoryStore::new();
        let page = HolderRef::Container("page-1".to_string());

        let mut element = Element::new("TextElement");
        element.holder = Some(page.clone());
        element.sort = u32::MAX;
        store.write_element(&element, Stage::Draft).unwrap();

        let err = next_sort(&store, &page).unwrap_err();
        assert_eq!(
            err,
            ElementsError::SortExhausted {
                holder: page.to_string(),
                max_sort: u32::MAX,
            }
        );
    }
}
