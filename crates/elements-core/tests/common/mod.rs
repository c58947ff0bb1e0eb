use elements_core::model::{Container, Element, HolderRef};
use elements_core::ops::{container_ops, element_ops, MemoryStore, SegmentLookupCache};
use elements_core::registry::{RelationRegistry, TypeConfig, TypeDefinition, TypeKind};

/// Relation configuration shared by the scenario tests
///
/// `Page` declares two defaults under `Elements`; `HomePage` inherits the
/// `Page` relations and adds `Downloads`; `ListElement` owns nested items.
#[allow(dead_code)]
pub fn sample_config() -> TypeConfig {
    TypeConfig::new()
        .with_type(
            TypeDefinition::new("ElementBase")
                .kind(TypeKind::Element)
                .label("Element"),
        )
        .with_type(
            TypeDefinition::new("TextElement")
                .extends("ElementBase")
                .label("Text"),
        )
        .with_type(
            TypeDefinition::new("DownloadElement")
                .extends("ElementBase")
                .label("Download"),
        )
        .with_type(
            TypeDefinition::new("ListElement")
                .extends("ElementBase")
                .label("List")
                .relation("Items", &["TextElement", "ListElement"]),
        )
        .with_type(
            TypeDefinition::new("Page")
                .kind(TypeKind::Container)
                .relation("Elements", &["TextElement", "DownloadElement", "ListElement"])
                .default_elements("Elements", &["TextElement", "DownloadElement"]),
        )
        .with_type(
            TypeDefinition::new("HomePage")
                .extends("Page")
                .inherit_from("Page")
                .relation("Downloads", &["DownloadElement"]),
        )
}

#[allow(dead_code)]
pub fn sample_registry() -> RelationRegistry {
    RelationRegistry::build(sample_config()).expect("sample config is valid")
}

#[allow(dead_code)]
pub fn new_page(store: &mut MemoryStore, title: &str) -> Container {
    container_ops::create_container(store, "Page", title).expect("Should create page")
}

/// Create a draft element under `holder` (bypasses relation checks)
#[allow(dead_code)]
pub fn add_child(
    store: &mut MemoryStore,
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

/// A page with one element on each of three levels: page > list > list > text
#[allow(dead_code)]
pub fn three_level_tree(store: &mut MemoryStore) -> (Container, Vec<Element>) {
    let mut cache = SegmentLookupCache::new();
    let page = new_page(store, "Deep Page");
    let top = add_child(store, &mut cache, page.as_holder(), "ListElement", "Top");
    let middle = add_child(store, &mut cache, top.as_holder(), "ListElement", "Middle");
    let leaf = add_child(store, &mut cache, middle.as_holder(), "TextElement", "Leaf");
    (page, vec![top, middle, leaf])
}
