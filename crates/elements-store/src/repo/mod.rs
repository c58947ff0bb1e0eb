//! Repository layer persisting containers and elements to SQLite

pub(crate) mod hydration;
pub mod sqlite_store;

pub use sqlite_store::SqliteStore;
