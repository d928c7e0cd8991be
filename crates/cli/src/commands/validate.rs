// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tj validate` - Check the project's runbooks without a daemon

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tj_core::EventKind;
use tj_daemon::lifecycle::{build_dispatcher, runbook_dir};
use tj_runbook::load_runbooks;

use crate::output::{print_json, OutputFormat};

/// One registered job and its event wiring
#[derive(Debug, Serialize)]
struct JobSummary {
    name: String,
    trigger: EventKind,
    success: EventKind,
    failure: EventKind,
}

pub fn handle(project_root: &Path, format: OutputFormat) -> Result<()> {
    let runbook = load_runbooks(&runbook_dir(project_root))?;
    let (dispatcher, _published) = build_dispatcher(&runbook, project_root)?;
    let registry = dispatcher.registry();

    let jobs: Vec<JobSummary> = registry
        .names()
        .into_iter()
        .filter_map(|name| registry.get(name))
        .map(|job| {
            let spec = job.spec();
            let outgoing = spec.outgoing_events();
            JobSummary {
                name: spec.name().to_string(),
                trigger: spec.incoming_event(),
                success: outgoing.success,
                failure: outgoing.failure,
            }
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&jobs)?,
        OutputFormat::Text => {
            for job in &jobs {
                println!(
                    "{:<20} {} -> {} | {}",
                    job.name, job.trigger, job.success, job.failure
                );
            }
            match jobs.len() {
                0 => println!("No jobs defined"),
                1 => println!("1 job OK"),
                n => println!("{} jobs OK", n),
            }
        }
    }
    Ok(())
}
