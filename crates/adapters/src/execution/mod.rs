// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script execution adapters

mod shell;

pub use shell::{ShellConfig, ShellExecutionAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ExecutionCall, FakeExecutionAdapter};

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Successful script run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutput {
    /// Raw stdout-equivalent, free-form
    pub output: String,
}

impl ExecutionOutput {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

/// Errors from script execution. Every variant is a job failure.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to start script: {0}")]
    Spawn(String),
    #[error("script exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
    #[error("script terminated by signal: {stderr}")]
    Terminated { stderr: String },
    #[error("script timed out after {0:?}")]
    Timeout(Duration),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Adapter for running job scripts out of process
#[async_trait]
pub trait ExecutionAdapter: Clone + Send + Sync + 'static {
    /// Run `script` with `env` injected, returning its output
    async fn run(
        &self,
        script: &str,
        env: &BTreeMap<String, String>,
    ) -> Result<ExecutionOutput, ExecutionError>;
}
