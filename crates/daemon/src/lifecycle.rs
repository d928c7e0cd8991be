// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, event intake, shutdown.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use fs2::FileExt;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tj_adapters::{
    ChannelPublisher, EventReceiver, ShellConfig, ShellExecutionAdapter, TracedExecutionAdapter,
    TracedPublisher,
};
use tj_core::{ConfigError, EventEnvelope, SourceLookup, UuidIdGen};
use tj_engine::{Dispatched, Dispatcher, JobDeps, JobRegistry};
use tj_runbook::{load_runbooks, ParseError, Runbook};
use tj_storage::{EventLog, EventLogError, Origin};
use tokio::net::UnixListener;
use tracing::{info, warn};

/// Startup marker prefix written to the log before anything else.
/// The CLI reads startup errors from the last marker onwards.
/// Full format: "--- tjd: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- tjd: starting (pid: ";

/// Dispatcher with concrete adapter types (wrapped with tracing)
pub type DaemonDispatcher = Dispatcher<
    TracedExecutionAdapter<ShellExecutionAdapter>,
    TracedPublisher<ChannelPublisher>,
    UuidIdGen,
>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root directory
    pub project_root: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to version file
    pub version_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Path to the event log
    pub events_path: PathBuf,
}

impl Config {
    /// Create config for a project
    pub fn for_project(project_root: &Path) -> Result<Self, LifecycleError> {
        let canonical = project_root
            .canonicalize()
            .map_err(|e| LifecycleError::ProjectNotFound(project_root.to_path_buf(), e))?;

        let hash = project_hash(&canonical);
        let state_dir = state_dir()?.join("projects").join(&hash);
        let socket_path = socket_dir()?.join(format!("{}.sock", hash));

        Ok(Self::with_dirs(canonical, &state_dir, socket_path))
    }

    /// Config with explicit state directory and socket path
    pub fn with_dirs(project_root: PathBuf, state_dir: &Path, socket_path: PathBuf) -> Self {
        Self {
            project_root,
            socket_path,
            lock_path: state_dir.join("daemon.pid"),
            version_path: state_dir.join("daemon.version"),
            log_path: state_dir.join("daemon.log"),
            events_path: state_dir.join("events.jsonl"),
        }
    }

    /// Directory holding the project's runbooks
    pub fn runbook_dir(&self) -> PathBuf {
        runbook_dir(&self.project_root)
    }

    /// PID written by the daemon holding the lock
    pub fn daemon_pid(&self) -> Option<u32> {
        std::fs::read_to_string(&self.lock_path)
            .ok()?
            .trim()
            .parse()
            .ok()
    }

    /// Version written by the running daemon
    pub fn daemon_version(&self) -> Option<String> {
        let version = std::fs::read_to_string(&self.version_path).ok()?;
        Some(version.trim().to_string())
    }

    /// Append the startup marker for this process to the daemon log
    pub fn mark_startup(&self) -> Result<(), LifecycleError> {
        let mut log = self.open_log()?;
        writeln!(log, "{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id())?;
        Ok(())
    }

    /// Append a startup failure to the daemon log without going through tracing,
    /// whose writer may not flush before the process exits
    pub fn record_startup_error(&self, error: &LifecycleError) {
        if let Ok(mut log) = self.open_log() {
            let _ = writeln!(log, "ERROR Failed to start daemon: {}", error);
        }
    }

    /// Errors logged by the most recent startup attempt
    pub fn startup_error(&self) -> Option<String> {
        let content = std::fs::read_to_string(&self.log_path).ok()?;
        startup_error_in(&content)
    }

    /// Remove the socket, PID and version files
    pub fn remove_runtime_files(&self) {
        for path in [&self.socket_path, &self.lock_path, &self.version_path] {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove"),
            }
        }
    }

    fn open_log(&self) -> std::io::Result<File> {
        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
    }
}

/// Error lines logged since the last startup marker, without their
/// "timestamp LEVEL target:" prefix
fn startup_error_in(content: &str) -> Option<String> {
    let attempt = &content[content.rfind(STARTUP_MARKER_PREFIX)?..];
    let errors: Vec<&str> = attempt
        .lines()
        .filter(|line| line.contains(" ERROR ") || line.contains("Failed to start"))
        .map(|line| line.split_once(": ").map_or(line, |(_, message)| message))
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(errors.join("\n"))
    }
}

/// Daemon state during operation
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Unix socket listener
    pub listener: UnixListener,
    /// Routes events to the runbook's jobs
    pub dispatcher: DaemonDispatcher,
    /// Events published by jobs, fed back into dispatch
    pub published: EventReceiver,
    event_log: EventLog,
    /// When daemon started
    pub start_time: Instant,
    /// Events dispatched since startup, emitted or published
    pub events_handled: u64,
    /// Shutdown requested flag
    pub shutdown_requested: bool,
}

impl DaemonState {
    /// Record an event delivered by a client and dispatch it
    pub fn emit(&mut self, event: &EventEnvelope) -> Vec<Dispatched> {
        self.intake(Origin::Emitted, event)
    }

    /// Record an event published by a job and dispatch it to any
    /// job chained on it
    pub fn handle_published(&mut self, event: &EventEnvelope) {
        for dispatched in self.intake(Origin::Published, event) {
            dispatched.detach();
        }
    }

    fn intake(&mut self, origin: Origin, event: &EventEnvelope) -> Vec<Dispatched> {
        if let Err(e) = self.event_log.append(origin, event) {
            warn!(error = %e, kind = %event.kind, "failed to record event");
        }
        self.events_handled += 1;
        self.dispatcher.dispatch(event)
    }

    /// Names of the registered jobs
    pub fn job_names(&self) -> Vec<String> {
        self.dispatcher
            .registry()
            .names()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Remove the runtime files; the lock is released when the state drops
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!(
            events_handled = self.events_handled,
            "shutting down daemon"
        );
        self.config.remove_runtime_files();
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Project not found at {0}: {1}")]
    ProjectNotFound(PathBuf, std::io::Error),

    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("Event log error: {0}")]
    EventLog(#[from] EventLogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Runbook parse error: {0}")]
    Runbook(#[from] ParseError),

    #[error("Invalid job: {0}")]
    Config(#[from] ConfigError),
}

/// Start the daemon
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config).await {
        Ok(state) => Ok(state),
        // Files belong to the daemon holding the lock
        Err(e @ LifecycleError::LockFailed(_)) => Err(e),
        Err(e) => {
            config.remove_runtime_files();
            Err(e)
        }
    }
}

/// Startup steps; any failure after the lock is taken removes the runtime files
async fn startup_inner(config: &Config) -> Result<DaemonState, LifecycleError> {
    // 1. Create state and socket directories
    if let Some(parent) = config.lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if let Some(parent) = config.socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // 2. Acquire lock file FIRST - prevents races. Truncate only once held.
    let mut lock_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    // Write version file
    std::fs::write(&config.version_path, env!("CARGO_PKG_VERSION"))?;

    // 3. Load runbook BEFORE binding socket (fail fast, don't accept connections if invalid)
    let runbook = load_runbooks(&config.runbook_dir())?;
    let (dispatcher, published) = build_dispatcher(&runbook, &config.project_root)?;

    // 4. Open event log
    let event_log = EventLog::open(&config.events_path)?;
    info!(
        "Loaded {} jobs, {} events previously recorded",
        dispatcher.registry().len(),
        event_log.sequence()
    );

    // 5. Remove stale socket and bind (LAST - only after all validation passes)
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    info!(
        "Daemon started for project: {}",
        config.project_root.display()
    );

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        listener,
        dispatcher,
        published,
        event_log,
        start_time: Instant::now(),
        events_handled: 0,
        shutdown_requested: false,
    })
}

/// Runbooks live in `<project>/.tj/runbooks`
pub fn runbook_dir(project_root: &Path) -> PathBuf {
    project_root.join(".tj").join("runbooks")
}

/// Wire the runbook's jobs to the shell backend and the local bus
pub fn build_dispatcher(
    runbook: &Runbook,
    project_root: &Path,
) -> Result<(DaemonDispatcher, EventReceiver), LifecycleError> {
    let sources = runbook.event_registry()?;
    let executor = ShellExecutionAdapter::new(ShellConfig {
        shell: runbook.executor.shell.clone(),
        timeout: runbook.executor.timeout(),
        cwd: Some(match &runbook.executor.cwd {
            Some(cwd) => project_root.join(cwd),
            None => project_root.to_path_buf(),
        }),
    });
    let (publisher, published) = ChannelPublisher::new();

    info!(bus = sources.bus_name(), "using event bus");

    let mut registry = JobRegistry::new(JobDeps {
        executor: TracedExecutionAdapter::new(executor),
        publisher: TracedPublisher::new(publisher),
        sources: Arc::new(sources),
        id_gen: UuidIdGen,
    });
    registry.register_all(runbook.specs(project_root)?)?;

    Ok((Dispatcher::new(registry), published))
}

/// Get the state directory for tj
fn state_dir() -> Result<PathBuf, LifecycleError> {
    // Use XDG_STATE_HOME or default to ~/.local/state
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("tj"));
    }

    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/tj"))
}

/// Get the socket directory for tj
///
/// Uses /tmp/tj by default to keep paths short (macOS SUN_LEN = 104).
/// Can be overridden with TJ_SOCKET_DIR for testing.
fn socket_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("TJ_SOCKET_DIR") {
        return Ok(PathBuf::from(dir));
    }
    Ok(PathBuf::from("/tmp/tj"))
}

/// Compute project hash for unique daemon directory
pub fn project_hash(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let result = hasher.finalize();
    // Take first 16 chars of hex digest
    result[..8].iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
