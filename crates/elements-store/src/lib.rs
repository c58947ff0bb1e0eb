//! Elements Store - SQLite persistence and relation configuration loading
//!
//! Provides:
//! - `SqliteStore`, an `ElementStore` over SQLite with per-stage tables and
//!   an append-only version history
//! - Embedded schema migrations with checksums
//! - YAML relation configuration parser

pub mod config;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteStore;
