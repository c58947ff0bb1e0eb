//! Error handling for elements-store
//!
//! Store failures surface as `ElementsError` so `SqliteStore` can sit behind
//! the core `ElementStore` seam without a second error type.

use elements_core::errors::ElementsError;

pub use elements_core::errors::Result;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ElementsError {
    ElementsError::persistence(
        "migration",
        format!("Migration {} failed: {}", migration_id, reason),
    )
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ElementsError {
    ElementsError::persistence(
        "migration_checksum",
        format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ),
    )
}

/// Create a relation configuration error for the named type
pub fn config_validation(type_name: &str, reason: impl Into<String>) -> ElementsError {
    ElementsError::InvalidConfiguration {
        type_name: type_name.to_string(),
        reason: reason.into(),
    }
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ElementsError {
    ElementsError::persistence("sqlite", err.to_string())
}

/// Same as [`from_rusqlite`], tagged with the store operation that failed
pub fn sqlite_op(op: &'static str) -> impl Fn(rusqlite::Error) -> ElementsError {
    move |err| ElementsError::persistence(op, err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ElementsError {
    ElementsError::persistence(operation, err.to_string())
}
