//! APIWeave - Main Entry Point
//!
//! Loads configuration, sets up logging and the selected backend, then
//! runs one subcommand against the collection order editor.

mod backend;
mod cli;
mod commands;

use std::process::ExitCode;

use apiweave_infrastructure::{AppConfig, init_tracing};
use clap::Parser;

use cli::{Args, Command};
use commands::{AppContext, CliError};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let config = AppConfig::load(args.config.as_deref())?;
    init_tracing(&config.log_filter)?;
    tracing::debug!(?config, "configuration loaded");

    let ctx = AppContext::new(config)?;
    ctx.spawn_event_log();

    match args.command {
        Command::InitCollection { name, description } => {
            commands::init_collection(&ctx, &name, description.as_deref()).await
        }
        Command::AddWorkflow {
            collection_id,
            name,
            nodes,
        } => commands::add_workflow(&ctx, &collection_id, &name, nodes).await,
        Command::Show { collection_id } => commands::show(&ctx, &collection_id).await,
        Command::Edit {
            collection_id,
            ops,
            dry_run,
        } => commands::edit(&ctx, &collection_id, &ops, dry_run).await,
    }
}
