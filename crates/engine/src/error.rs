// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for job handling

use crate::JobOutcome;
use thiserror::Error;
use tj_adapters::PublishError;
use tj_core::{EventKind, MappingError};

/// Errors that end a job invocation without an externalized outcome.
///
/// Backend failures are not errors here: they become failure events.
#[derive(Debug, Error)]
pub enum JobError {
    /// Event routed to a job that does not subscribe to its kind
    #[error("job {job} expects {expected}, received {actual}")]
    UnexpectedKind {
        job: String,
        expected: EventKind,
        actual: EventKind,
    },
    /// Event lacks a declared field; nothing was executed or published
    #[error("job {job} rejected event: {source}")]
    Rejected {
        job: String,
        #[source]
        source: MappingError,
    },
    /// Job reached a terminal outcome but the bus did not accept it
    #[error("job {} reached {} but publishing failed: {source}", .outcome.job, .outcome.completion)]
    Publish {
        outcome: Box<JobOutcome>,
        #[source]
        source: PublishError,
    },
    /// Job task ended without producing a result
    #[error("job {job} aborted: {reason}")]
    Aborted { job: String, reason: String },
}

impl JobError {
    /// Name of the job that raised the error
    pub fn job(&self) -> &str {
        match self {
            JobError::UnexpectedKind { job, .. }
            | JobError::Rejected { job, .. }
            | JobError::Aborted { job, .. } => job,
            JobError::Publish { outcome, .. } => &outcome.job,
        }
    }

    /// Whether redelivering the same event could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, JobError::Publish { .. } | JobError::Aborted { .. })
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
