//! Subcommands and the options they share

use std::path::PathBuf;

use clap::Args;
use elements_core::cascade::{CascadeOptions, DEFAULT_MAX_DEPTH};
use elements_core::registry::RelationRegistry;
use elements_core::Result;
use elements_store::SqliteStore;

pub mod config;
pub mod defaults;
pub mod element;
pub mod page;
pub mod publish;
pub mod status;

/// Options accepted by every subcommand
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// SQLite database file
    #[arg(long, global = true, env = "ELEMENTS_DB", default_value = ".elements/store.db")]
    pub db: PathBuf,

    /// Relation configuration file
    #[arg(long, global = true, env = "ELEMENTS_CONFIG", default_value = "elements.yaml")]
    pub config: PathBuf,

    /// Emit JSON log events on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Locale recorded on version history and used for modified detection
    #[arg(long, global = true, env = "ELEMENTS_LOCALE", default_value = "")]
    pub locale: String,

    /// Depth at which a cascade treats the tree as corrupt
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

impl GlobalArgs {
    pub fn open_store(&self) -> Result<SqliteStore> {
        Ok(SqliteStore::open(&self.db)?.with_locale(self.locale.as_str()))
    }

    pub fn load_registry(&self) -> Result<RelationRegistry> {
        elements_store::config::load_registry(&self.config)
    }

    pub fn cascade_options(&self) -> CascadeOptions {
        CascadeOptions::with_max_depth(self.max_depth)
    }
}
