// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tj emit <kind>` - Deliver a lifecycle event to the daemon

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tj_core::{Detail, EventEnvelope, EventKind, DEFAULT_CONTROL_PLANE_SOURCE};
use tj_daemon::Config;

use crate::client::DaemonClient;
use crate::output::{inline_json, print_json, OutputFormat};

#[derive(Args)]
pub struct EmitArgs {
    /// Event kind, e.g. onboardingRequest
    pub kind: EventKind,

    /// Event detail as a JSON object
    #[arg(short, long, default_value = "{}")]
    pub data: String,

    /// Source recorded on the event
    #[arg(long, default_value = DEFAULT_CONTROL_PLANE_SOURCE)]
    pub source: String,

    /// Wait until every subscribed job published its outcome
    #[arg(long)]
    pub wait: bool,
}

impl EmitArgs {
    pub fn event(&self) -> Result<EventEnvelope> {
        let detail: Detail =
            serde_json::from_str(&self.data).context("--data must be a JSON object")?;
        Ok(EventEnvelope::new(self.kind, self.source.clone(), detail))
    }
}

pub async fn handle(args: EmitArgs, project_root: &Path, format: OutputFormat) -> Result<()> {
    let event = args.event()?;
    let client = DaemonClient::connect_or_start(Config::for_project(project_root)?).await?;

    if !args.wait {
        let jobs = client.emit(event).await?;
        match format {
            OutputFormat::Json => print_json(&jobs)?,
            OutputFormat::Text if jobs.is_empty() => {
                println!("Event {} emitted, no job subscribed", args.kind)
            }
            OutputFormat::Text => println!("Event {} emitted to {}", args.kind, jobs.join(", ")),
        }
        return Ok(());
    }

    let outcomes = client.emit_and_wait(event).await?;
    match format {
        OutputFormat::Json => print_json(&outcomes)?,
        OutputFormat::Text if outcomes.is_empty() => {
            println!("Event {} emitted, no job subscribed", args.kind)
        }
        OutputFormat::Text => {
            for outcome in &outcomes {
                println!(
                    "{}: {} -> {} {}",
                    outcome.job,
                    outcome.completion,
                    outcome.event.kind,
                    inline_json(&outcome.event.detail)
                );
            }
        }
    }
    Ok(())
}
