//! SQLite-backed `ElementStore`
//!
//! Draft and live snapshots live in parallel tables (`elements` /
//! `elements_live`, `containers` / `containers_live`). Every draft element
//! write appends a row to `element_versions`; publishing marks the matching
//! row `was_published`.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::Utc;
use elements_core::model::{Container, Element, HolderRef, Stage};
use elements_core::ops::{ElementStore, VersionState};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::db;
use crate::errors::{sqlite_op, Result};
use crate::repo::hydration::{
    container_from_row, container_table, element_from_row, element_table, format_timestamp,
    CONTAINER_COLUMNS, ELEMENT_COLUMNS,
};

/// Ids per `modified_ids` query, well below SQLite's host parameter limit
const MODIFIED_IDS_CHUNK: usize = 500;

/// Persistent store over a single SQLite connection
///
/// Not thread-safe: one request owns the store for the duration of an
/// operation, like every `ElementStore`.
pub struct SqliteStore {
    conn: Connection,
    locale: String,
}

impl SqliteStore {
    /// Open (creating and migrating if needed) a store at `path`
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the database cannot be opened or migrated.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_connection(db::open(path)?))
    }

    /// Open a migrated in-memory store
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_connection(db::open_in_memory()?))
    }

    /// Wrap an already-migrated connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            locale: String::new(),
        }
    }

    /// Tag version history with a locale
    ///
    /// Modified detection compares per locale. Version numbers are allocated
    /// across all locales of a record.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside `BEGIN IMMEDIATE … COMMIT`, rolling back on error
    ///
    /// Cascades are not atomic on their own; callers that want all-or-nothing
    /// publishing wrap them here.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or `Persistence` if the transaction
    /// cannot be opened or committed.
    pub fn atomically<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(sqlite_op("begin"))?;

        match f(self) {
            Ok(value) => {
                self.conn
                    .execute_batch("COMMIT")
                    .map_err(sqlite_op("commit"))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = self.conn.execute_batch("ROLLBACK") {
                    tracing::error!(
                        component = "store",
                        error = %rollback,
                        "rollback failed after {}",
                        err
                    );
                } else {
                    tracing::debug!(component = "store", error = %err, "transaction rolled back");
                }
                Err(err)
            }
        }
    }

    /// Number of element snapshots held in a stage
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the query fails.
    pub fn element_count(&self, stage: Stage) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", element_table(stage));
        let count: i64 = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(sqlite_op("element_count"))?;
        Ok(count as usize)
    }

    /// Number of history rows recorded for an element in this store's locale
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the query fails.
    pub fn version_count(&self, id: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM element_versions WHERE record_id = ?1 AND locale = ?2",
                params![id, self.locale],
                |row| row.get(0),
            )
            .map_err(sqlite_op("version_count"))?;
        Ok(count as usize)
    }

    /// Highest version the record has reached in any locale or stage
    ///
    /// The draft and live rows are shared by every locale, so numbering must
    /// be too. Otherwise a draft write could land on live's version number.
    fn latest_version(&self, id: &str) -> Result<u64> {
        let latest: Option<i64> = self
            .conn
            .query_row(
                "SELECT MAX(version) FROM (
                    SELECT version FROM element_versions WHERE record_id = ?1
                    UNION ALL SELECT version FROM elements WHERE id = ?1
                    UNION ALL SELECT version FROM elements_live WHERE id = ?1
                 )",
                [id],
                |row| row.get(0),
            )
            .map_err(sqlite_op("write_element"))?;
        Ok(latest.unwrap_or(0) as u64)
    }
}

/// `WHERE` clause selecting the direct children of `holder`
fn holder_filter(holder: &HolderRef) -> &'static str {
    match holder {
        HolderRef::Container(_) => "container_id = ?1 AND parent_element_id IS NULL",
        HolderRef::Element(_) => "parent_element_id = ?1",
    }
}

impl ElementStore for SqliteStore {
    fn container(&self, id: &str, stage: Stage) -> Result<Option<Container>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            CONTAINER_COLUMNS,
            container_table(stage)
        );
        self.conn
            .query_row(&sql, [id], container_from_row)
            .optional()
            .map_err(sqlite_op("read_container"))
    }

    fn write_container(&mut self, container: &Container, stage: Stage) -> Result<u64> {
        let mut stored = container.clone();
        if stage == Stage::Draft {
            let current: Option<i64> = self
                .conn
                .query_row(
                    "SELECT version FROM containers WHERE id = ?1",
                    [&container.id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(sqlite_op("write_container"))?;
            stored.version = (current.unwrap_or(0) as u64).max(container.version) + 1;
            stored.updated_at = Utc::now();
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                type_name = excluded.type_name,
                title = excluded.title,
                version = excluded.version,
                updated_at = excluded.updated_at",
            container_table(stage),
            CONTAINER_COLUMNS
        );
        self.conn
            .execute(
                &sql,
                params![
                    stored.id,
                    stored.type_name,
                    stored.title,
                    stored.version as i64,
                    format_timestamp(&stored.created_at),
                    format_timestamp(&stored.updated_at),
                ],
            )
            .map_err(sqlite_op("write_container"))?;

        Ok(stored.version)
    }

    fn delete_container_from_stage(&mut self, id: &str, stage: Stage) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", container_table(stage));
        self.conn
            .execute(&sql, [id])
            .map_err(sqlite_op("delete_container_from_stage"))?;
        Ok(())
    }

    fn element(&self, id: &str, stage: Stage) -> Result<Option<Element>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            ELEMENT_COLUMNS,
            element_table(stage)
        );
        self.conn
            .query_row(&sql, [id], element_from_row)
            .optional()
            .map_err(sqlite_op("read_element"))
    }

    fn write_element(&mut self, element: &Element, stage: Stage) -> Result<u64> {
        let mut stored = element.clone();
        if stage == Stage::Draft {
            stored.version = self.latest_version(&element.id)? + 1;
            stored.updated_at = Utc::now();
        }
        let snapshot_json = serde_json::to_string(&stored)?;
        let now = format_timestamp(&Utc::now());
        let locale = self.locale.clone();

        // Snapshot and history row land together
        let sp = self.conn.savepoint().map_err(sqlite_op("write_element"))?;

        let (container_id, parent_element_id) = match &stored.holder {
            Some(holder) => holder.as_columns(),
            None => (None, None),
        };
        let sql = format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
             ON CONFLICT(id) DO UPDATE SET
                type_tag = excluded.type_tag,
                title = excluded.title,
                url_segment = excluded.url_segment,
                relation_name = excluded.relation_name,
                visible = excluded.visible,
                sort = excluded.sort,
                container_id = excluded.container_id,
                parent_element_id = excluded.parent_element_id,
                version = excluded.version,
                updated_at = excluded.updated_at",
            element_table(stage),
            ELEMENT_COLUMNS
        );
        sp.execute(
            &sql,
            params![
                stored.id,
                stored.type_tag,
                stored.title,
                stored.url_segment,
                stored.relation_name,
                stored.visible as i64,
                stored.sort,
                container_id,
                parent_element_id,
                stored.version as i64,
                format_timestamp(&stored.created_at),
                format_timestamp(&stored.updated_at),
            ],
        )
        .map_err(sqlite_op("write_element"))?;

        match stage {
            Stage::Draft => {
                sp.execute(
                    "INSERT INTO element_versions
                        (record_id, locale, version, was_published, snapshot_json, created_at)
                     VALUES (?1, ?2, ?3, 0, ?4, ?5)",
                    params![stored.id, locale, stored.version as i64, snapshot_json, now],
                )
                .map_err(sqlite_op("write_element"))?;
            }
            Stage::Live => {
                let marked = sp
                    .execute(
                        "UPDATE element_versions SET was_published = 1
                         WHERE record_id = ?1 AND locale = ?2 AND version = ?3",
                        params![stored.id, locale, stored.version as i64],
                    )
                    .map_err(sqlite_op("write_element"))?;
                if marked == 0 {
                    sp.execute(
                        "INSERT INTO element_versions
                            (record_id, locale, version, was_published, snapshot_json, created_at)
                         VALUES (?1, ?2, ?3, 1, ?4, ?5)",
                        params![stored.id, locale, stored.version as i64, snapshot_json, now],
                    )
                    .map_err(sqlite_op("write_element"))?;
                }
            }
        }

        sp.commit().map_err(sqlite_op("write_element"))?;
        Ok(stored.version)
    }

    fn delete_element_from_stage(&mut self, id: &str, stage: Stage) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", element_table(stage));
        self.conn
            .execute(&sql, [id])
            .map_err(sqlite_op("delete_element_from_stage"))?;
        Ok(())
    }

    fn children(&self, holder: &HolderRef, stage: Stage) -> Result<Vec<Element>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY sort, id",
            ELEMENT_COLUMNS,
            element_table(stage),
            holder_filter(holder)
        );
        let mut stmt = self.conn.prepare(&sql).map_err(sqlite_op("children"))?;
        let children = stmt
            .query_map([holder.id()], element_from_row)
            .map_err(sqlite_op("children"))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(sqlite_op("children"))?;
        Ok(children)
    }

    fn max_sort(&self, holder: &HolderRef) -> Result<Option<u32>> {
        let sql = format!(
            "SELECT MAX(sort) FROM elements WHERE {}",
            holder_filter(holder)
        );
        self.conn
            .query_row(&sql, [holder.id()], |row| row.get(0))
            .map_err(sqlite_op("max_sort"))
    }

    fn url_segment_taken(
        &self,
        type_tag: &str,
        segment: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool> {
        self.conn
            .query_row(
                "SELECT EXISTS(
                    SELECT 1 FROM elements
                    WHERE type_tag = ?1 AND url_segment = ?2 AND (?3 IS NULL OR id <> ?3)
                 )",
                params![type_tag, segment, exclude_id],
                |row| row.get(0),
            )
            .map_err(sqlite_op("url_segment_taken"))
    }

    fn version_state(&self, id: &str) -> Result<VersionState> {
        let (latest, published): (Option<i64>, Option<i64>) = self
            .conn
            .query_row(
                "SELECT MAX(version), MAX(CASE WHEN was_published = 1 THEN version END)
                 FROM element_versions WHERE record_id = ?1 AND locale = ?2",
                params![id, self.locale],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(sqlite_op("version_state"))?;
        Ok(VersionState {
            latest: latest.unwrap_or(0) as u64,
            published: published.map(|v| v as u64),
        })
    }

    fn modified_ids(&self, ids: &[String]) -> Result<BTreeSet<String>> {
        let mut modified = BTreeSet::new();
        for chunk in ids.chunks(MODIFIED_IDS_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT record_id FROM element_versions
                 WHERE locale = ? AND record_id IN ({})
                 GROUP BY record_id
                 HAVING MAX(version) >
                        COALESCE(MAX(CASE WHEN was_published = 1 THEN version END), 0)",
                placeholders
            );
            let mut stmt = self
                .conn
                .prepare(&sql)
                .map_err(sqlite_op("modified_ids"))?;
            let bound = std::iter::once(self.locale.as_str()).chain(chunk.iter().map(String::as_str));
            let rows = stmt
                .query_map(params_from_iter(bound), |row| row.get::<_, String>(0))
                .map_err(sqlite_op("modified_ids"))?;
            for row in rows {
                modified.insert(row.map_err(sqlite_op("modified_ids"))?);
            }
        }
        Ok(modified)
    }
}
