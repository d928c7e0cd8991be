// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution backend

use super::{ExecutionAdapter, ExecutionError, ExecutionOutput};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tj_core::DEFAULT_SCRIPT_TIMEOUT;
use tokio::process::Command;

/// How scripts are launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Shell invoked as `<shell> -c <script>`
    pub shell: String,
    pub timeout: Duration,
    /// Working directory; inherits the daemon's when unset
    pub cwd: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            shell: "sh".to_string(),
            timeout: DEFAULT_SCRIPT_TIMEOUT,
            cwd: None,
        }
    }
}

/// Runs scripts as child processes of the daemon
#[derive(Clone, Default)]
pub struct ShellExecutionAdapter {
    config: ShellConfig,
}

impl ShellExecutionAdapter {
    pub fn new(config: ShellConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }
}

#[async_trait]
impl ExecutionAdapter for ShellExecutionAdapter {
    async fn run(
        &self,
        script: &str,
        env: &BTreeMap<String, String>,
    ) -> Result<ExecutionOutput, ExecutionError> {
        let mut cmd = Command::new(&self.config.shell);
        cmd.arg("-c")
            .arg(script)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // The child must not outlive a timed-out run
            .kill_on_drop(true);
        if let Some(cwd) = &self.config.cwd {
            cmd.current_dir(cwd);
        }

        let output = tokio::time::timeout(self.config.timeout, cmd.output())
            .await
            .map_err(|_| ExecutionError::Timeout(self.config.timeout))?
            .map_err(|e| ExecutionError::Spawn(e.to_string()))?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !stderr.is_empty() {
            tracing::debug!(stderr = %stderr, "script stderr");
        }

        if output.status.success() {
            return Ok(ExecutionOutput::new(String::from_utf8_lossy(
                &output.stdout,
            )));
        }

        match output.status.code() {
            Some(code) => Err(ExecutionError::NonZeroExit { code, stderr }),
            None => Err(ExecutionError::Terminated { stderr }),
        }
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
