//! Elements CLI
//!
//! Administrative interface for page element relations and publishing

use clap::{Parser, Subcommand};
use elements_core::errors::ExError;
use elements_core::logging_facility::{init, Profile};
use elements_core_types::RequestContext;

mod commands;

use commands::GlobalArgs;

#[derive(Debug, Parser)]
#[command(name = "elements")]
#[command(about = "Elements - page element relations and publishing", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Default element operations
    Defaults(commands::defaults::DefaultsArgs),
    /// Publish operations
    Publish(commands::publish::PublishArgs),
    /// Show a page's element tree and publish state
    Status(commands::status::StatusArgs),
    /// Relation configuration operations
    Config(commands::config::ConfigArgs),
    /// Page operations
    Page(commands::page::PageArgs),
    /// Element operations
    Element(commands::element::ElementArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.global.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let ctx = RequestContext::new();
    let span = tracing::info_span!("request", request_id = %ctx.request_id);
    let _entered = span.enter();

    let global = &cli.global;
    let result = match cli.command {
        Commands::Defaults(args) => commands::defaults::execute(args, global),
        Commands::Publish(args) => commands::publish::execute(args, global),
        Commands::Status(args) => commands::status::execute(args, global),
        Commands::Config(args) => commands::config::execute(args, global),
        Commands::Page(args) => commands::page::execute(args, global),
        Commands::Element(args) => commands::element::execute(args, global),
    };

    if let Err(e) = result {
        let err = ExError::from(e).with_request_id(ctx.request_id.clone());
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
