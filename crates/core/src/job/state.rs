// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-invocation job state machine
//!
//! ```text
//! Running ──BackendSucceeded──▶ Completed(Success)
//!    └─────BackendFailed──────▶ Completed(Failure)
//! ```
//!
//! Completed states are terminal and absorb every further signal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal result of one job invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Completion {
    Success,
    Failure,
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Success => f.write_str("success"),
            Completion::Failure => f.write_str("failure"),
        }
    }
}

/// Signals from the execution backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSignal {
    BackendSucceeded,
    BackendFailed,
}

impl JobSignal {
    /// Completion a running job reaches on this signal
    pub fn completion(self) -> Completion {
        match self {
            JobSignal::BackendSucceeded => Completion::Success,
            JobSignal::BackendFailed => Completion::Failure,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    /// Backend invoked, outcome pending
    #[default]
    Running,
    Completed(Completion),
}

impl JobState {
    pub fn transition(self, signal: JobSignal) -> JobState {
        match self {
            JobState::Running => JobState::Completed(signal.completion()),
            completed @ JobState::Completed(_) => {
                tracing::warn!(state = ?completed, ?signal, "signal after completion ignored");
                completed
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed(_))
    }

    pub fn completion(&self) -> Option<Completion> {
        match self {
            JobState::Running => None,
            JobState::Completed(completion) => Some(*completion),
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
