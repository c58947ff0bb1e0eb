//! Publishing
//!
//! Usage: elements publish page <ELEMENT_ID> [--atomic]

use clap::{Args, Subcommand};
use elements_core::cascade::{publish_container_page, PublishOutcome};
use elements_core::Result;

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct PublishArgs {
    #[command(subcommand)]
    pub command: PublishCommand,
}

#[derive(Debug, Subcommand)]
pub enum PublishCommand {
    /// Publish the page an element belongs to, with all of its elements
    Page {
        /// Any element on the page
        element_id: String,

        /// Roll everything back if any write fails
        #[arg(long)]
        atomic: bool,
    },
}

pub fn execute(args: PublishArgs, global: &GlobalArgs) -> Result<()> {
    match args.command {
        PublishCommand::Page { element_id, atomic } => {
            let mut store = global.open_store()?;
            let options = global.cascade_options();
            let outcome = if atomic {
                store.atomically(|store| publish_container_page(store, &element_id, &options))?
            } else {
                publish_container_page(&mut store, &element_id, &options)?
            };

            match &outcome {
                PublishOutcome::Published {
                    container_id,
                    published,
                    message,
                } => println!("{} ({}: {} elements)", message, container_id, published),
                PublishOutcome::TargetUnreachable { message, .. } => println!("{}", message),
            }
            Ok(())
        }
    }
}
