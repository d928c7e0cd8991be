// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake execution adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ExecutionAdapter, ExecutionError, ExecutionOutput};
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Recorded execution call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionCall {
    pub script: String,
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
enum Scripted {
    Output(String),
    Error(String),
}

/// Fake execution adapter for testing.
///
/// Outcomes are consumed in the order they were scripted. Once the queue is
/// empty the fallback outcome repeats (empty output unless changed).
#[derive(Clone, Default)]
pub struct FakeExecutionAdapter {
    outcomes: Arc<Mutex<VecDeque<Scripted>>>,
    fallback: Arc<Mutex<Option<Scripted>>>,
    calls: Arc<Mutex<Vec<ExecutionCall>>>,
}

impl FakeExecutionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful run producing `output`
    pub fn push_output(&self, output: impl Into<String>) {
        self.outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Scripted::Output(output.into()));
    }

    /// Queue a failed run with backend error text `message`
    pub fn push_error(&self, message: impl Into<String>) {
        self.outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Scripted::Error(message.into()));
    }

    /// Every run succeeds with `output` once the queue is drained
    pub fn always_output(&self, output: impl Into<String>) {
        *self.fallback.lock().unwrap_or_else(|e| e.into_inner()) =
            Some(Scripted::Output(output.into()));
    }

    /// Every run fails with `message` once the queue is drained
    pub fn always_error(&self, message: impl Into<String>) {
        *self.fallback.lock().unwrap_or_else(|e| e.into_inner()) =
            Some(Scripted::Error(message.into()));
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ExecutionCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ExecutionAdapter for FakeExecutionAdapter {
    async fn run(
        &self,
        script: &str,
        env: &BTreeMap<String, String>,
    ) -> Result<ExecutionOutput, ExecutionError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ExecutionCall {
                script: script.to_string(),
                env: env.clone(),
            });

        let next = self
            .outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        let scripted = match next {
            Some(scripted) => scripted,
            None => self
                .fallback
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
                .unwrap_or(Scripted::Output(String::new())),
        };

        match scripted {
            Scripted::Output(output) => Ok(ExecutionOutput::new(output)),
            Scripted::Error(message) => Err(ExecutionError::Backend(message)),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
