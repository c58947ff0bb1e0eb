//! Page (container) management
//!
//! Usage:
//!   elements page create <TITLE> [--type <TYPE>]
//!   elements page delete <CONTAINER_ID> [--unpublish-only]

use clap::{Args, Subcommand};
use elements_core::cascade::DeleteMode;
use elements_core::ops::container_ops;
use elements_core::registry::TypeKind;
use elements_core::{ElementsError, Result};

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct PageArgs {
    #[command(subcommand)]
    pub command: PageCommand,
}

#[derive(Debug, Subcommand)]
pub enum PageCommand {
    /// Create a draft page and print its id
    Create {
        title: String,

        /// Configured container type
        #[arg(long = "type", default_value = "Page")]
        type_name: String,
    },
    /// Unpublish or delete a page together with every element below it
    Delete {
        container_id: String,

        /// Remove the live snapshots only, keeping drafts
        #[arg(long)]
        unpublish_only: bool,
    },
}

pub fn execute(args: PageArgs, global: &GlobalArgs) -> Result<()> {
    match args.command {
        PageCommand::Create { title, type_name } => {
            let registry = global.load_registry()?;
            if registry.kind_of(&type_name) != Some(TypeKind::Container) {
                return Err(ElementsError::InvalidConfiguration {
                    type_name,
                    reason: "not a configured container type".to_string(),
                });
            }
            let mut store = global.open_store()?;
            let container = container_ops::create_container(&mut store, &type_name, &title)?;
            println!("{}", container.id);
            Ok(())
        }
        PageCommand::Delete {
            container_id,
            unpublish_only,
        } => {
            let mode = if unpublish_only {
                DeleteMode::UnpublishOnly
            } else {
                DeleteMode::FullDelete
            };
            let mut store = global.open_store()?;
            let removed = container_ops::delete_container(
                &mut store,
                &container_id,
                mode,
                &global.cascade_options(),
            )?;
            println!("{} {} ({} elements)", mode, container_id, removed);
            Ok(())
        }
    }
}
