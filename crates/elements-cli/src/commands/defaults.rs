//! Default element creation
//!
//! Usage: elements defaults create <CONTAINER_ID>

use clap::{Args, Subcommand};
use elements_core::editor::create_default_elements;
use elements_core::Result;

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct DefaultsArgs {
    #[command(subcommand)]
    pub command: DefaultsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DefaultsCommand {
    /// Create the configured default elements a record is missing
    Create {
        /// Container (page) id
        container_id: String,
    },
}

pub fn execute(args: DefaultsArgs, global: &GlobalArgs) -> Result<()> {
    match args.command {
        DefaultsCommand::Create { container_id } => {
            let registry = global.load_registry()?;
            let mut store = global.open_store()?;
            let report = create_default_elements(&mut store, &registry, &container_id)?;
            println!("{}", report.header_line());
            Ok(())
        }
    }
}
