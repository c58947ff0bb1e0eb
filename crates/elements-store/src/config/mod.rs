//! YAML relation configuration loader
//!
//! Provides:
//! - Format v1 schema (`schema_version: 1`)
//! - Parser with schema and `extends` validation
//! - Registry loading for the CLI

pub mod format_v1;
pub mod parser;

pub use parser::{load_registry, parse_config_file, parse_config_str};
