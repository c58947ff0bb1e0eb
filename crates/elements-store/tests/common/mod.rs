use elements_core::model::{Container, Element, HolderRef};
use elements_core::ops::{container_ops, element_ops, SegmentLookupCache};
use elements_store::SqliteStore;
use std::path::PathBuf;

#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// A store backed by a real file in a fresh temporary directory
///
/// The directory guard must outlive the store.
#[allow(dead_code)]
pub fn file_store() -> (tempfile::TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let store = SqliteStore::open(dir.path().join("store.db")).expect("Should open store");
    (dir, store)
}

#[allow(dead_code)]
pub fn add_child(
    store: &mut SqliteStore,
    cache: &mut SegmentLookupCache,
    holder: HolderRef,
    type_tag: &str,
    title: &str,
) -> Element {
    let relation = match holder {
        HolderRef::Container(_) => "Elements",
        HolderRef::Element(_) => "Items",
    };
    element_ops::create_element(store, cache, type_tag, title, holder, relation)
        .expect("Should create element")
}

/// page > list > list > text
#[allow(dead_code)]
pub fn three_level_tree(store: &mut SqliteStore) -> (Container, Vec<Element>) {
    let mut cache = SegmentLookupCache::new();
    let page = container_ops::create_container(store, "Page", "Deep Page").expect("Should create page");
    let top = add_child(store, &mut cache, page.as_holder(), "ListElement", "Top");
    let middle = add_child(store, &mut cache, top.as_holder(), "ListElement", "Middle");
    let leaf = add_child(store, &mut cache, middle.as_holder(), "TextElement", "Leaf");
    (page, vec![top, middle, leaf])
}
