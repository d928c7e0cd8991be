// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const RUNBOOK: &str = r#"
[job.provision]
lifecycle = "provisioning"
script = 'echo "provisioning $tenantId" >&2; echo "dbEndpoint=$tier.db.example.com"'
string_vars = ["tier"]
output_vars = ["dbEndpoint"]

[job.deprovision]
lifecycle = "deprovisioning"
script = "echo cannot >&2; exit 2"
"#;

/// A project directory with isolated daemon state.
///
/// Stops its daemon on drop.
pub struct Project {
    root: TempDir,
    state: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            root: TempDir::new().expect("Failed to create project dir"),
            state: TempDir::new().expect("Failed to create state dir"),
        }
    }

    pub fn with_runbook(runbook: &str) -> Self {
        let project = Self::empty();
        project.file(".tj/runbooks/jobs.toml", runbook);
        project
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn state_dir(&self) -> PathBuf {
        self.state.path().join("state")
    }

    pub fn file(&self, relative: &str, content: &str) {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, content).expect("Failed to write file");
    }

    /// `tj` running in this project with isolated state and socket dirs
    pub fn tj(&self) -> Command {
        let tj = assert_cmd::cargo::cargo_bin("tj");
        let mut cmd = Command::new(&tj);
        cmd.current_dir(self.root.path())
            .env("XDG_STATE_HOME", self.state_dir())
            .env("TJ_SOCKET_DIR", self.state.path().join("sock"))
            .env("TJ_DAEMON_BINARY", tj.with_file_name("tjd"))
            .env("TJ_TIMEOUT_CONNECT_MS", "10000")
            .env_remove("TJ_PROJECT_ROOT");
        cmd
    }
}

impl Drop for Project {
    fn drop(&mut self) {
        let _ = self.tj().args(["daemon", "stop"]).output();
    }
}
