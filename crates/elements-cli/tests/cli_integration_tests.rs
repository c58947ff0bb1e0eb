//! CLI integration tests
//!
//! Drive the `elements` binary against a temporary database and
//! configuration file.

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const CONFIG: &str = r#"
schema_version: 1
types:
  ElementBase: { kind: element, label: Element }
  TextElement: { extends: ElementBase, label: Text }
  DownloadElement: { extends: ElementBase, label: Download }
  ListElement:
    extends: ElementBase
    label: List
    element_relations:
      Items: [TextElement]
  Page:
    kind: container
    element_relations:
      Elements: [TextElement, DownloadElement, ListElement]
    element_defaults:
      Elements: [TextElement, DownloadElement]
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("elements.yaml"), CONFIG).unwrap();
        Self { dir }
    }

    fn db_path(&self) -> PathBuf {
        self.dir.path().join(".elements").join("store.db")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_elements"))
            .current_dir(self.dir.path())
            .env_remove("ELEMENTS_DB")
            .env_remove("ELEMENTS_CONFIG")
            .env_remove("ELEMENTS_LOCALE")
            .env("RUST_LOG", "off")
            .args(args)
            .output()
            .expect("Failed to execute CLI")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "CLI {:?} should succeed. Stderr: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}

fn versions_in_locale(db: &Path, locale: &str) -> i64 {
    let conn = Connection::open(db).unwrap();
    conn.query_row(
        "SELECT COUNT(*) FROM element_versions WHERE locale = ?1",
        [locale],
        |row| row.get(0),
    )
    .unwrap()
}

fn count(db: &Path, table: &str) -> i64 {
    let conn = Connection::open(db).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn test_defaults_create_reports_status_header() {
    let ws = Workspace::new();
    let page_id = ws.run_ok(&["page", "create", "Home"]).trim().to_string();

    let stdout = ws.run_ok(&["defaults", "create", &page_id]);
    assert_eq!(stdout.trim(), "X-Status: Created 2 elements.");

    let stdout = ws.run_ok(&["defaults", "create", &page_id]);
    assert_eq!(stdout.trim(), "X-Status: Created 0 elements.");
    assert_eq!(count(&ws.db_path(), "elements"), 2);
}

#[test]
fn test_publish_page_from_nested_element() {
    // Given: a page > list > text tree
    let ws = Workspace::new();
    let page_id = ws.run_ok(&["page", "create", "Home"]).trim().to_string();
    let list_id = ws
        .run_ok(&["element", "add", &page_id, "Elements", "ListElement"])
        .trim()
        .to_string();
    let text_id = ws
        .run_ok(&["element", "add", &list_id, "Items", "TextElement"])
        .trim()
        .to_string();

    // When: publishing from the nested element
    let stdout = ws.run_ok(&["publish", "page", &text_id, "--atomic"]);

    // Then: the whole page is live
    assert!(stdout.starts_with("Page & elements published"));
    assert_eq!(count(&ws.db_path(), "elements_live"), 2);
    assert_eq!(count(&ws.db_path(), "containers_live"), 1);

    let status = ws.run_ok(&["status", &page_id]);
    assert!(status.contains("published"));
    assert!(!status.contains("modified"));
}

#[test]
fn test_status_lists_tree_with_flags() {
    let ws = Workspace::new();
    let page_id = ws.run_ok(&["page", "create", "Home"]).trim().to_string();
    ws.run_ok(&["element", "add", &page_id, "Elements", "TextElement"]);

    let stdout = ws.run_ok(&["status", &page_id]);

    assert!(stdout.contains("\"Home\" [Page] draft"));
    assert!(stdout.contains("[Elements/TextElement] /text-title sort=1 (draft)"));
    assert!(stdout.contains("Default elements missing"));
    assert!(stdout.contains("relation Elements: TextElement, DownloadElement, ListElement"));
}

#[test]
fn test_relation_not_permitted_exits_with_code() {
    let ws = Workspace::new();
    let page_id = ws.run_ok(&["page", "create", "Home"]).trim().to_string();

    let output = ws.run(&["element", "add", &page_id, "Items", "TextElement"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_RELATION_NOT_PERMITTED"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_page_is_not_found() {
    let ws = Workspace::new();

    let output = ws.run(&["defaults", "create", "no-such-page"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_NOT_FOUND"));
    assert!(stderr.contains("request_id"));
}

#[test]
fn test_config_check_reports_dropped_tags() {
    let ws = Workspace::new();
    let path = ws.dir.path().join("broken.yaml");
    fs::write(
        &path,
        "schema_version: 1\ntypes:\n  Page:\n    kind: container\n    element_relations:\n      Elements: [GhostElement]\n",
    )
    .unwrap();

    let stdout = ws.run_ok(&["config", "check", "--config", path.to_str().unwrap()]);

    assert!(stdout.contains("warning:"));
    assert!(stdout.contains("GhostElement"));
    assert!(stdout.contains("1 warnings"));
}

#[test]
fn test_unpublish_only_keeps_drafts() {
    let ws = Workspace::new();
    let page_id = ws.run_ok(&["page", "create", "Home"]).trim().to_string();
    let text_id = ws
        .run_ok(&["element", "add", &page_id, "Elements", "TextElement"])
        .trim()
        .to_string();
    ws.run_ok(&["publish", "page", &text_id]);

    ws.run_ok(&["page", "delete", &page_id, "--unpublish-only"]);

    assert_eq!(count(&ws.db_path(), "elements_live"), 0);
    assert_eq!(count(&ws.db_path(), "elements"), 1);
}

#[test]
fn test_locale_tags_version_history() {
    // Given: a page with one element published in the default locale
    let ws = Workspace::new();
    let page_id = ws.run_ok(&["page", "create", "Home"]).trim().to_string();
    let text_id = ws
        .run_ok(&["element", "add", &page_id, "Elements", "TextElement"])
        .trim()
        .to_string();
    ws.run_ok(&["publish", "page", &text_id]);

    // When: another element is added under --locale de
    ws.run_ok(&["element", "add", &page_id, "Elements", "TextElement", "--locale", "de"]);

    // Then: its history is tagged "de" and the default locale sees nothing new
    assert_eq!(versions_in_locale(&ws.db_path(), "de"), 1);
    assert_eq!(versions_in_locale(&ws.db_path(), ""), 1);
    let status = ws.run_ok(&["status", &page_id, "--locale", "de"]);
    assert!(status.contains("(published)"), "status: {}", status);
    assert!(status.contains("(draft)"), "status: {}", status);
}

#[test]
fn test_locale_read_from_environment() {
    let ws = Workspace::new();
    let page_id = ws.run_ok(&["page", "create", "Home"]).trim().to_string();

    let output = Command::new(env!("CARGO_BIN_EXE_elements"))
        .current_dir(ws.dir.path())
        .env_remove("ELEMENTS_DB")
        .env_remove("ELEMENTS_CONFIG")
        .env("ELEMENTS_LOCALE", "fr")
        .env("RUST_LOG", "off")
        .args(["element", "add", &page_id, "Elements", "TextElement"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(versions_in_locale(&ws.db_path(), "fr"), 1);
}
