// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake publisher for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{EventPublisher, PublishError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tj_core::EventEnvelope;

/// Fake publisher for testing.
///
/// Records every accepted event. While rejecting, publishes fail and
/// nothing is recorded.
#[derive(Clone, Default)]
pub struct FakePublisher {
    published: Arc<Mutex<Vec<EventEnvelope>>>,
    reject: Arc<Mutex<Option<String>>>,
    attempts: Arc<Mutex<usize>>,
}

impl FakePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all accepted events
    pub fn published(&self) -> Vec<EventEnvelope> {
        self.published
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of publish calls, accepted or not
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reject every publish with `reason` until cleared
    pub fn reject_with(&self, reason: impl Into<String>) {
        *self.reject.lock().unwrap_or_else(|e| e.into_inner()) = Some(reason.into());
    }

    pub fn accept(&self) {
        *self.reject.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[async_trait]
impl EventPublisher for FakePublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), PublishError> {
        *self.attempts.lock().unwrap_or_else(|e| e.into_inner()) += 1;

        if let Some(reason) = self
            .reject
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(PublishError::Rejected(reason));
        }

        self.published
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
