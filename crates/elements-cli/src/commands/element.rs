//! Element creation through the editing surface
//!
//! Usage: elements element add <OWNER_ID> <RELATION> <TYPE>

use clap::{Args, Subcommand};
use elements_core::editor::add_element;
use elements_core::model::{Holder, Stage};
use elements_core::ops::{ElementStore, SegmentLookupCache};
use elements_core::{ElementsError, Result};

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct ElementArgs {
    #[command(subcommand)]
    pub command: ElementCommand,
}

#[derive(Debug, Subcommand)]
pub enum ElementCommand {
    /// Add a new element to a page or to another element
    Add {
        /// Page or element id
        owner_id: String,
        relation_name: String,
        type_tag: String,
    },
}

pub fn execute(args: ElementArgs, global: &GlobalArgs) -> Result<()> {
    match args.command {
        ElementCommand::Add {
            owner_id,
            relation_name,
            type_tag,
        } => {
            let registry = global.load_registry()?;
            let mut store = global.open_store()?;
            let owner = load_owner(&store, &owner_id)?;
            let mut cache = SegmentLookupCache::new();
            let element = add_element(
                &mut store,
                &registry,
                &mut cache,
                &owner,
                &relation_name,
                &type_tag,
            )?;
            println!("{}", element.id);
            Ok(())
        }
    }
}

/// Resolve an id to a draft page first, then to a draft element
fn load_owner<S: ElementStore + ?Sized>(store: &S, id: &str) -> Result<Holder> {
    if let Some(container) = store.container(id, Stage::Draft)? {
        return Ok(Holder::Container(container));
    }
    store
        .element(id, Stage::Draft)?
        .map(Holder::Element)
        .ok_or_else(|| ElementsError::ElementNotFound {
            element_id: id.to_string(),
        })
}
