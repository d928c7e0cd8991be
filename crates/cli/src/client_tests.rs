// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for daemon client behavior.

use super::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn config(state: &TempDir) -> Config {
    Config::with_dirs(
        state.path().join("project"),
        &state.path().join("state"),
        state.path().join("tjd.sock"),
    )
}

fn write_pid(config: &Config, pid: u32) {
    fs::create_dir_all(config.lock_path.parent().unwrap()).unwrap();
    fs::write(&config.lock_path, format!("{pid}\n")).unwrap();
    fs::write(&config.version_path, "0.0.0").unwrap();
}

fn exited_pid() -> u32 {
    let mut child = std::process::Command::new("true").spawn().unwrap();
    let pid = child.id();
    child.wait().unwrap();
    pid
}

/// connect() is polled while the daemon is still starting; touching the pid
/// file there would race the daemon's own initialization.
#[test]
fn connect_without_socket_leaves_pid_file() {
    let state = tempdir().unwrap();
    let config = config(&state);
    write_pid(&config, 12345);

    let result = DaemonClient::connect(config.clone());

    assert!(matches!(result, Err(ClientError::DaemonNotRunning)));
    assert!(config.lock_path.exists());
}

#[tokio::test]
async fn stop_without_daemon_clears_stale_files() {
    let state = tempdir().unwrap();
    let config = config(&state);
    write_pid(&config, exited_pid());

    assert!(!daemon_stop(&config).await.unwrap());

    assert!(!config.lock_path.exists());
    assert!(!config.version_path.exists());
}

#[tokio::test]
async fn stop_leaves_files_of_a_daemon_still_starting() {
    let state = tempdir().unwrap();
    let config = config(&state);
    write_pid(&config, std::process::id());

    assert!(!daemon_stop(&config).await.unwrap());

    assert!(config.lock_path.exists());
}

#[test]
fn liveness_follows_the_process() {
    assert!(is_alive(std::process::id()));
    assert!(!is_alive(exited_pid()));
}

#[test]
fn daemon_errors_keep_their_cause() {
    let err = ClientError::from(LifecycleError::Io(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "state dir is read-only",
    )));

    assert!(matches!(err, ClientError::Daemon(LifecycleError::Io(_))));
    assert_eq!(err.to_string(), "IO error: state dir is read-only");
}

#[test]
fn missing_project_is_reported_as_such() {
    let err: ClientError = Config::for_project(Path::new("/nonexistent/tj-project"))
        .unwrap_err()
        .into();

    assert!(
        matches!(err, ClientError::Daemon(LifecycleError::ProjectNotFound(..))),
        "got {err:?}"
    );
}

#[test]
fn unset_timeout_falls_back_to_default() {
    let fallback = Duration::from_millis(1234);
    assert_eq!(env_ms("TJ_TIMEOUT_NEVER_SET_MS", fallback), fallback);
}
