// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tenant Jobs Daemon (tjd)
//!
//! Background process that owns the local event bus and runs the
//! project's lifecycle jobs. Usage: `tjd [PROJECT_ROOT]`.

use std::path::PathBuf;

use tj_daemon::{serve, startup, Config, LifecycleError};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let project_root = match std::env::args_os().nth(1) {
        Some(root) => PathBuf::from(root),
        None => std::env::current_dir()?,
    };
    let config = Config::for_project(&project_root)?;

    // Marker goes in before tracing so the CLI can find this attempt
    config.mark_startup()?;
    let _log_guard = setup_logging(&config)?;

    let mut daemon = match startup(&config).await {
        Ok(daemon) => daemon,
        Err(e) => {
            config.record_startup_error(&e);
            error!("Failed to start daemon: {}", e);
            return Err(e.into());
        }
    };

    info!(
        jobs = %daemon.job_names().join(","),
        socket = %config.socket_path.display(),
        "daemon ready"
    );
    // The CLI waits on the socket; READY is for supervisors reading stdout
    println!("READY");

    serve(&mut daemon).await?;
    info!("daemon stopped");
    Ok(())
}

/// Log to `daemon.log` in the project's state dir, filtered by `TJ_LOG`,
/// then `RUST_LOG`, then `info`
fn setup_logging(config: &Config) -> Result<WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let (Some(dir), Some(file)) = (config.log_path.parent(), config.log_path.file_name()) else {
        return Err(LifecycleError::NoStateDir);
    };
    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("TJ_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();

    Ok(guard)
}
