// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands
//!
//! Every path the client touches comes from [`tj_daemon::Config`], the same
//! value the daemon resolves for the project.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;
use tj_core::EventEnvelope;
use tj_daemon::protocol::{self, ProtocolError};
use tj_daemon::{Config, LifecycleError, Request, Response};
use tj_engine::JobOutcome;
use tokio::net::UnixStream;
use tokio::process::Command;

/// Client-side timeouts, each overridable in milliseconds through the
/// environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// `TJ_TIMEOUT_IPC_MS`: one request/response exchange
    pub ipc: Duration,
    /// `TJ_TIMEOUT_WAIT_MS`: `emit --wait`, which covers the scripts' run time
    pub wait: Duration,
    /// `TJ_TIMEOUT_CONNECT_MS`: a freshly spawned daemon binding its socket
    pub connect: Duration,
    /// `TJ_TIMEOUT_EXIT_MS`: a stopped daemon exiting
    pub exit: Duration,
    /// `TJ_POLL_INTERVAL_MS`
    pub poll: Duration,
}

impl Timeouts {
    pub fn from_env() -> Self {
        Self {
            ipc: env_ms("TJ_TIMEOUT_IPC_MS", Duration::from_secs(5)),
            wait: env_ms("TJ_TIMEOUT_WAIT_MS", Duration::from_secs(16 * 60)),
            connect: env_ms("TJ_TIMEOUT_CONNECT_MS", Duration::from_secs(5)),
            exit: env_ms("TJ_TIMEOUT_EXIT_MS", Duration::from_secs(2)),
            poll: env_ms("TJ_POLL_INTERVAL_MS", Duration::from_millis(50)),
        }
    }
}

fn env_ms(var: &str, default: Duration) -> Duration {
    std::env::var(var)
        .ok()
        .and_then(|ms| ms.parse().ok())
        .map_or(default, Duration::from_millis)
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Daemon not running")]
    DaemonNotRunning,

    #[error("Failed to start daemon: {0}")]
    DaemonStartFailed(String),

    #[error("Connection timeout waiting for daemon to start")]
    DaemonStartTimeout,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Event rejected: {0}")]
    Rejected(String),

    #[error("Unexpected response from daemon")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Daemon(#[from] LifecycleError),
}

/// Daemon status as reported by `Status`
#[derive(Debug, Clone, PartialEq)]
pub struct DaemonStatus {
    pub uptime_secs: u64,
    pub jobs: Vec<String>,
    pub events_handled: u64,
}

/// Client for one project's daemon
pub struct DaemonClient {
    config: Config,
    timeouts: Timeouts,
}

impl DaemonClient {
    /// Client for a daemon that is already listening
    pub fn connect(config: Config) -> Result<Self, ClientError> {
        if !config.socket_path.exists() {
            return Err(ClientError::DaemonNotRunning);
        }
        Ok(Self {
            config,
            timeouts: Timeouts::from_env(),
        })
    }

    /// Client for the project's daemon, starting one if none is running.
    /// A daemon left over from another `tj` version is stopped first.
    pub async fn connect_or_start(config: Config) -> Result<Self, ClientError> {
        let stale = config
            .daemon_version()
            .is_some_and(|version| version != env!("CARGO_PKG_VERSION"));
        if stale {
            tracing::info!("restarting daemon from another version");
            let _ = daemon_stop(&config).await;
        }

        match Self::connect(config.clone()) {
            Err(ClientError::DaemonNotRunning) => Self::start(config).await,
            connected => connected,
        }
    }

    /// Spawn `tjd` and wait for its socket, or for the error it logged
    async fn start(config: Config) -> Result<Self, ClientError> {
        let timeouts = Timeouts::from_env();
        let binary = tjd_binary();
        let mut child = Command::new(&binary)
            .arg(&config.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                ClientError::DaemonStartFailed(format!("{}: {}", binary.display(), e))
            })?;

        let deadline = Instant::now() + timeouts.connect;
        while Instant::now() < deadline {
            if let Some(status) = child.try_wait()? {
                return Err(early_exit(&config, status, timeouts).await);
            }
            if config.socket_path.exists() {
                return Ok(Self { config, timeouts });
            }
            tokio::time::sleep(timeouts.poll).await;
        }

        Err(config
            .startup_error()
            .map_or(ClientError::DaemonStartTimeout, ClientError::DaemonStartFailed))
    }

    async fn send(&self, request: &Request, wait: Duration) -> Result<Response, ClientError> {
        let mut stream = UnixStream::connect(&self.config.socket_path).await?;
        protocol::write_request(&mut stream, request, self.timeouts.ipc).await?;
        match protocol::read_response(&mut stream, wait).await? {
            Response::Error { message } => Err(ClientError::Rejected(message)),
            response => Ok(response),
        }
    }

    async fn call(&self, request: Request) -> Result<Response, ClientError> {
        self.send(&request, self.timeouts.ipc).await
    }

    /// Deliver an event; returns the jobs it was dispatched to
    pub async fn emit(&self, event: EventEnvelope) -> Result<Vec<String>, ClientError> {
        match self.call(Request::Emit { event, wait: false }).await? {
            Response::Accepted { jobs } => Ok(jobs),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Deliver an event and wait until every subscribed job published.
    /// A job that could not publish rejects the whole event.
    pub async fn emit_and_wait(
        &self,
        event: EventEnvelope,
    ) -> Result<Vec<JobOutcome>, ClientError> {
        let request = Request::Emit { event, wait: true };
        match self.send(&request, self.timeouts.wait).await? {
            Response::Completed { outcomes } => Ok(outcomes),
            Response::Rejected { errors } => Err(ClientError::Rejected(errors.join("; "))),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn status(&self) -> Result<DaemonStatus, ClientError> {
        match self.call(Request::Status).await? {
            Response::Status {
                uptime_secs,
                jobs,
                events_handled,
            } => Ok(DaemonStatus {
                uptime_secs,
                jobs,
                events_handled,
            }),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.call(Request::Shutdown).await? {
            Response::ShuttingDown => Ok(()),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Daemon version via the `Hello` handshake
    pub async fn hello(&self) -> Result<String, ClientError> {
        let request = Request::Hello {
            version: env!("CARGO_PKG_VERSION").to_string(),
        };
        match self.call(request).await? {
            Response::Hello { version } => Ok(version),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }
}

/// The daemon logs its startup error right before exiting; give that write
/// a moment to land before settling for the exit status
async fn early_exit(config: &Config, status: ExitStatus, timeouts: Timeouts) -> ClientError {
    let deadline = Instant::now() + timeouts.exit;
    loop {
        if let Some(message) = config.startup_error() {
            return ClientError::DaemonStartFailed(message);
        }
        if Instant::now() >= deadline {
            return ClientError::DaemonStartFailed(format!("tjd exited with {}", status));
        }
        tokio::time::sleep(timeouts.poll).await;
    }
}

/// Stop the project's daemon: ask first, kill if it does not exit.
/// Returns false if no daemon was listening.
pub async fn daemon_stop(config: &Config) -> Result<bool, ClientError> {
    let client = match DaemonClient::connect(config.clone()) {
        Ok(client) => client,
        Err(ClientError::DaemonNotRunning) => {
            // A live PID without a socket is a daemon still starting up
            if !config.daemon_pid().is_some_and(is_alive) {
                config.remove_runtime_files();
            }
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    let pid = config.daemon_pid();
    let asked = client.shutdown().await.is_ok();
    if let Some(pid) = pid {
        let exited = asked && exits_within(pid, client.timeouts).await;
        if !exited {
            tracing::warn!(pid, "daemon did not stop, killing");
            kill(pid, "-9");
            exits_within(pid, client.timeouts).await;
        }
    }

    config.remove_runtime_files();
    Ok(true)
}

async fn exits_within(pid: u32, timeouts: Timeouts) -> bool {
    let deadline = Instant::now() + timeouts.exit;
    while Instant::now() < deadline {
        if !is_alive(pid) {
            return true;
        }
        tokio::time::sleep(timeouts.poll).await;
    }
    false
}

fn is_alive(pid: u32) -> bool {
    kill(pid, "-0")
}

/// Run `kill <signal> <pid>`; true if it succeeded
fn kill(pid: u32, signal: &str) -> bool {
    std::process::Command::new("kill")
        .args([signal, &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// `TJ_DAEMON_BINARY`, else `tjd` next to this executable, else `tjd` on PATH
fn tjd_binary() -> PathBuf {
    if let Some(path) = std::env::var_os("TJ_DAEMON_BINARY") {
        return PathBuf::from(path);
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| Some(exe.parent()?.join("tjd")))
        .filter(|sibling| sibling.exists())
        .unwrap_or_else(|| PathBuf::from("tjd"))
}

/// `TJ_PROJECT_ROOT`, else the nearest ancestor holding a `.tj` directory,
/// else the current directory
pub fn find_project_root() -> Result<PathBuf, ClientError> {
    if let Some(root) = std::env::var_os("TJ_PROJECT_ROOT") {
        return Ok(PathBuf::from(root));
    }

    let cwd = std::env::current_dir()?;
    let root = cwd
        .ancestors()
        .find(|dir| dir.join(".tj").is_dir())
        .unwrap_or(&cwd)
        .to_path_buf();
    Ok(root)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
