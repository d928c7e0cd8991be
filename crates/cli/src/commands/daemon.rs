// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tj daemon` - Start, stop and inspect the project's daemon

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tj_daemon::Config;

use crate::client::{daemon_stop, DaemonClient};
use crate::output::{format_uptime, print_json, OutputFormat};

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon if it is not running
    Start,
    /// Stop the daemon
    Stop,
    /// Show whether the daemon is running
    Status,
    /// Show the daemon log
    Logs {
        /// Number of lines to show from the end
        #[arg(short = 'n', long, default_value = "50")]
        lines: usize,
    },
}

#[derive(Debug, Serialize)]
struct StatusReport {
    running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uptime_secs: Option<u64>,
    jobs: Vec<String>,
    events_handled: u64,
}

pub async fn handle(args: DaemonArgs, project_root: &Path, format: OutputFormat) -> Result<()> {
    let config = Config::for_project(project_root)?;
    match args.command {
        DaemonCommand::Start => {
            if DaemonClient::connect(config.clone()).is_ok() {
                println!("Daemon already running");
                return Ok(());
            }
            let client = DaemonClient::connect_or_start(config).await?;
            let version = client.hello().await?;
            println!("Daemon started (version {})", version);
        }

        DaemonCommand::Stop => {
            if daemon_stop(&config).await? {
                println!("Daemon stopped");
            } else {
                println!("Daemon not running");
            }
        }

        DaemonCommand::Status => status(&config, format).await?,

        DaemonCommand::Logs { lines } => {
            let log_path = &config.log_path;
            match std::fs::read_to_string(log_path) {
                Ok(content) => {
                    let all: Vec<&str> = content.lines().collect();
                    for line in &all[all.len().saturating_sub(lines)..] {
                        println!("{}", line);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    println!("No daemon log at {}", log_path.display());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}

async fn status(config: &Config, format: OutputFormat) -> Result<()> {
    let report = match DaemonClient::connect(config.clone()) {
        Ok(client) => {
            let version = client.hello().await?;
            let status = client.status().await?;
            StatusReport {
                running: true,
                pid: config.daemon_pid(),
                version: Some(version),
                uptime_secs: Some(status.uptime_secs),
                jobs: status.jobs,
                events_handled: status.events_handled,
            }
        }
        Err(_) => StatusReport {
            running: false,
            pid: None,
            version: None,
            uptime_secs: None,
            jobs: Vec::new(),
            events_handled: 0,
        },
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text if !report.running => println!("Daemon not running"),
        OutputFormat::Text => {
            println!("Status: running");
            if let Some(pid) = report.pid {
                println!("PID: {}", pid);
            }
            if let Some(version) = &report.version {
                println!("Version: {}", version);
            }
            if let Some(uptime) = report.uptime_secs {
                println!("Uptime: {}", format_uptime(uptime));
            }
            println!("Jobs: {}", report.jobs.join(", "));
            println!("Events handled: {}", report.events_handled);
        }
    }
    Ok(())
}
