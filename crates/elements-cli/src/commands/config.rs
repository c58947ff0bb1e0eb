//! Relation configuration checks
//!
//! Usage: elements config check

use clap::{Args, Subcommand};
use elements_core::registry::TypeKind;
use elements_core::Result;

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Load the configuration and report dropped entries
    Check,
}

pub fn execute(args: ConfigArgs, global: &GlobalArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Check => {
            let registry = global.load_registry()?;
            let types = registry.config().types();
            let containers = types
                .iter()
                .filter(|t| registry.kind_of(&t.name) == Some(TypeKind::Container))
                .count();

            for diagnostic in registry.diagnostics() {
                println!("warning: {}", diagnostic);
            }
            println!(
                "OK: {} types ({} containers), {} warnings",
                types.len(),
                containers,
                registry.diagnostics().len()
            );
            Ok(())
        }
    }
}
