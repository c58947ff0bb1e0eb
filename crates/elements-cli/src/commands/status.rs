//! Page status report
//!
//! Usage: elements status <CONTAINER_ID>
//!
//! Prints the draft element tree with each element's publish flags.

use clap::Args;
use elements_core::cascade::CascadeOptions;
use elements_core::editor::{element_status, offers_default_seeding};
use elements_core::model::{HolderRef, Stage};
use elements_core::ops::{container_ops, ElementStore};
use elements_core::registry::RelationRegistry;
use elements_core::{ElementsError, Result};

use super::GlobalArgs;

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Container (page) id
    pub container_id: String,
}

pub fn execute(args: StatusArgs, global: &GlobalArgs) -> Result<()> {
    let registry = global.load_registry()?;
    let store = global.open_store()?;
    let options = global.cascade_options();

    let container = container_ops::read_container(&store, &args.container_id, Stage::Draft)?;
    let live = store.container(&container.id, Stage::Live)?;
    let page_state = match live {
        Some(live) if live.version == container.version => "published",
        Some(_) => "modified",
        None => "draft",
    };
    println!(
        "{} \"{}\" [{}] {}",
        container.id, container.title, container.type_name, page_state
    );

    let mut lines = Vec::new();
    collect_tree(&store, &container.as_holder(), 1, &options, &mut lines)?;
    for line in lines {
        println!("{}", line);
    }

    if offers_default_seeding(&store, &registry, &container)? {
        println!("Default elements missing; run `elements defaults create {}`", container.id);
    }
    print_relations(&registry, &container.type_name);
    Ok(())
}

fn collect_tree<S: ElementStore + ?Sized>(
    store: &S,
    holder: &HolderRef,
    depth: usize,
    options: &CascadeOptions,
    lines: &mut Vec<String>,
) -> Result<()> {
    if depth > options.max_depth {
        return Err(ElementsError::CascadeDepthExceeded {
            root_id: holder.to_string(),
            max_depth: options.max_depth,
        });
    }
    for child in store.children(holder, Stage::Draft)? {
        let status = element_status(store, &child.id, options)?;
        lines.push(format!(
            "{}- {} \"{}\" [{}/{}] /{} sort={} ({})",
            "  ".repeat(depth),
            child.id,
            child.title,
            child.relation_name,
            child.type_tag,
            child.url_segment,
            child.sort,
            status.flags().join(", ")
        ));
        collect_tree(store, &child.as_holder(), depth + 1, options, lines)?;
    }
    Ok(())
}

fn print_relations(registry: &RelationRegistry, owner_type: &str) {
    for (relation, tags) in registry.relations_for(owner_type).iter() {
        println!("relation {}: {}", relation, tags.join(", "));
    }
}
