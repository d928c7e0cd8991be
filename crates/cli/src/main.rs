// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tj - Tenant Jobs CLI

mod client;
mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{daemon, emit, events, validate};

use crate::client::find_project_root;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "tj",
    version,
    about = "Tenant Jobs - Run tenant lifecycle scripts on lifecycle events"
)]
struct Cli {
    /// Project root directory
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit a lifecycle event
    Emit(emit::EmitArgs),
    /// Check the project's runbooks
    Validate,
    /// Show recorded events
    Events(events::EventsArgs),
    /// Daemon management
    Daemon(daemon::DaemonArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();
    let project_root = cli.project.map_or_else(find_project_root, Ok)?;
    tracing::debug!(project = %project_root.display(), "resolved project root");

    match cli.command {
        Commands::Emit(args) => emit::handle(args, &project_root, cli.output).await?,
        Commands::Validate => validate::handle(&project_root, cli.output)?,
        Commands::Events(args) => events::handle(&project_root, args, cli.output)?,
        Commands::Daemon(args) => daemon::handle(args, &project_root, cli.output).await?,
    }

    Ok(())
}

/// Diagnostics go to stderr, filtered by TJ_LOG (default: warn)
fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("TJ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
