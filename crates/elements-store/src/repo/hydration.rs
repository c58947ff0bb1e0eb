//! Row mapping between SQLite tables and domain models
//!
//! Draft and live snapshots share a column layout, so one mapper serves both
//! tables of each record kind.

use chrono::{DateTime, Utc};
use elements_core::model::{Container, Element, HolderRef, Stage};
use rusqlite::types::Type;
use rusqlite::Row;

pub(crate) const ELEMENT_COLUMNS: &str = "id, type_tag, title, url_segment, relation_name, \
     visible, sort, container_id, parent_element_id, version, created_at, updated_at";

pub(crate) const CONTAINER_COLUMNS: &str =
    "id, type_name, title, version, created_at, updated_at";

pub(crate) fn element_table(stage: Stage) -> &'static str {
    match stage {
        Stage::Draft => "elements",
        Stage::Live => "elements_live",
    }
}

pub(crate) fn container_table(stage: Stage) -> &'static str {
    match stage {
        Stage::Draft => "containers",
        Stage::Live => "containers_live",
    }
}

/// Map a row selected with [`ELEMENT_COLUMNS`]
pub(crate) fn element_from_row(row: &Row<'_>) -> rusqlite::Result<Element> {
    let visible: i64 = row.get(5)?;
    let version: i64 = row.get(9)?;
    Ok(Element {
        id: row.get(0)?,
        type_tag: row.get(1)?,
        title: row.get(2)?,
        url_segment: row.get(3)?,
        relation_name: row.get(4)?,
        visible: visible != 0,
        sort: row.get(6)?,
        holder: HolderRef::from_columns(row.get(7)?, row.get(8)?),
        version: version as u64,
        created_at: timestamp(row, 10)?,
        updated_at: timestamp(row, 11)?,
    })
}

/// Map a row selected with [`CONTAINER_COLUMNS`]
pub(crate) fn container_from_row(row: &Row<'_>) -> rusqlite::Result<Container> {
    let version: i64 = row.get(3)?;
    Ok(Container {
        id: row.get(0)?,
        type_name: row.get(1)?,
        title: row.get(2)?,
        version: version as u64,
        created_at: timestamp(row, 4)?,
        updated_at: timestamp(row, 5)?,
    })
}

/// Timestamps are stored as RFC 3339 text
pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339()
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_timestamp_survives_text_round_trip() {
        let conn = Connection::open_in_memory().unwrap();
        let now = Utc::now();
        let parsed = conn
            .query_row("SELECT ?1", [format_timestamp(&now)], |row| timestamp(row, 0))
            .unwrap();
        assert_eq!(parsed, now);
    }

    #[test]
    fn test_malformed_timestamp_is_conversion_failure() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn
            .query_row("SELECT 'yesterday'", [], |row| timestamp(row, 0))
            .unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(0, _, _)));
    }

    #[test]
    fn test_stage_tables() {
        assert_eq!(element_table(Stage::Draft), "elements");
        assert_eq!(element_table(Stage::Live), "elements_live");
        assert_eq!(container_table(Stage::Live), "containers_live");
    }
}
