/// Scenario 03: Default element seeding
///
/// Seeding creates each configured (relation, type) pair once.
mod common;

use common::{add_child, new_page, sample_registry};
use elements_core::editor::{create_default_elements, offers_default_seeding};
use elements_core::errors::ElementsError;
use elements_core::model::Stage;
use elements_core::ops::seeding::{defaults_created, seed_defaults};
use elements_core::ops::{container_ops, ElementStore, MemoryStore, SegmentLookupCache};

#[test]
fn test_scenario_03_happy_seed_twice_creates_once() {
    // GIVEN a page whose type declares two default pairs
    let registry = sample_registry();
    let mut store = MemoryStore::new();
    let mut cache = SegmentLookupCache::new();
    let page = new_page(&mut store, "Home");

    // WHEN seeding runs twice
    let first = seed_defaults(&mut store, &registry, &mut cache, &page).unwrap();
    let second = seed_defaults(&mut store, &registry, &mut cache, &page).unwrap();

    // THEN N elements are created the first time and none the second
    assert_eq!(first, 2);
    assert_eq!(second, 0);
    assert_eq!(store.children(&page.as_holder(), Stage::Draft).unwrap().len(), 2);
}

#[test]
fn test_scenario_03_happy_seeded_elements_are_populated() {
    let registry = sample_registry();
    let mut store = MemoryStore::new();
    let mut cache = SegmentLookupCache::new();
    let page = new_page(&mut store, "Home");

    seed_defaults(&mut store, &registry, &mut cache, &page).unwrap();

    let children = store.children(&page.as_holder(), Stage::Draft).unwrap();
    let summary: Vec<(&str, &str, u32)> = children
        .iter()
        .map(|e| (e.type_tag.as_str(), e.title.as_str(), e.sort))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("TextElement", "Text title", 1),
            ("DownloadElement", "Download title", 2),
        ]
    );
    assert!(children.iter().all(|e| e.relation_name == "Elements"));
}

#[test]
fn test_scenario_03_edge_existing_pair_is_skipped() {
    // GIVEN a page that already has a text element plus an unrelated list
    let registry = sample_registry();
    let mut store = MemoryStore::new();
    let mut cache = SegmentLookupCache::new();
    let page = new_page(&mut store, "Home");
    add_child(&mut store, &mut cache, page.as_holder(), "TextElement", "Intro");
    add_child(&mut store, &mut cache, page.as_holder(), "ListElement", "Links");

    // WHEN seeding runs
    let created = seed_defaults(&mut store, &registry, &mut cache, &page).unwrap();

    // THEN only the missing download default is created
    assert_eq!(created, 1);
    assert!(defaults_created(&store, &registry, &page).unwrap());
}

#[test]
fn test_scenario_03_happy_offer_disappears_after_seeding() {
    let registry = sample_registry();
    let mut store = MemoryStore::new();
    let page = new_page(&mut store, "Home");

    assert!(offers_default_seeding(&store, &registry, &page).unwrap());
    create_default_elements(&mut store, &registry, &page.id).unwrap();
    assert!(!offers_default_seeding(&store, &registry, &page).unwrap());
}

#[test]
fn test_scenario_03_edge_no_defaults_means_no_offer() {
    let registry = sample_registry();
    let mut store = MemoryStore::new();
    let page = container_ops::create_container(&mut store, "Landing", "Landing").unwrap();

    assert!(!offers_default_seeding(&store, &registry, &page).unwrap());
}

#[test]
fn test_scenario_03_happy_admin_action_reports_count() {
    let registry = sample_registry();
    let mut store = MemoryStore::new();
    let page = new_page(&mut store, "Home");

    let report = create_default_elements(&mut store, &registry, &page.id).unwrap();
    assert_eq!(report.header_line(), "X-Status: Created 2 elements.");

    let again = create_default_elements(&mut store, &registry, &page.id).unwrap();
    assert_eq!(again.header_value(), "Created 0 elements.");
}

#[test]
fn test_scenario_03_error_unknown_record_is_not_found() {
    // GIVEN no container with the requested id
    let registry = sample_registry();
    let mut store = MemoryStore::new();

    // WHEN the admin action runs
    let result = create_default_elements(&mut store, &registry, "404");

    // THEN it fails with a 404-class error and nothing is written
    let err = result.expect_err("Should fail for unknown id");
    assert!(matches!(err, ElementsError::ContainerNotFound { .. }));
    assert_eq!(err.kind().http_status(), 404);
    assert_eq!(store.element_count(Stage::Draft), 0);
}
