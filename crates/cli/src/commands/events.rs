// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tj events` - Show the daemon's event log

use std::path::Path;

use anyhow::Result;
use clap::Args;
use tj_core::EventKind;
use tj_daemon::Config;
use tj_storage::{EventLog, LogEntry};

use crate::output::{inline_json, print_json, OutputFormat};

#[derive(Args)]
pub struct EventsArgs {
    /// Only show events of this kind
    #[arg(long)]
    pub kind: Option<EventKind>,

    /// Show at most the last N matching events
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Entries matching the filters, oldest first
pub fn select(entries: Vec<LogEntry>, args: &EventsArgs) -> Vec<LogEntry> {
    let mut selected: Vec<LogEntry> = entries
        .into_iter()
        .filter(|entry| args.kind.is_none_or(|kind| entry.event.kind == kind))
        .collect();
    if let Some(limit) = args.limit {
        let skip = selected.len().saturating_sub(limit);
        selected.drain(..skip);
    }
    selected
}

pub fn handle(project_root: &Path, args: EventsArgs, format: OutputFormat) -> Result<()> {
    let path = Config::for_project(project_root)?.events_path;
    let entries = select(EventLog::replay(&path)?, &args);

    match format {
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Text if entries.is_empty() => println!("No events"),
        OutputFormat::Text => {
            for entry in &entries {
                println!(
                    "{:>5} {:<9} {:<20} {} {}",
                    entry.seq,
                    entry.origin,
                    entry.event.kind,
                    entry.event.source,
                    inline_json(&entry.event.detail)
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
