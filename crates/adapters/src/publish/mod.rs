// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event publishing adapters

mod channel;

pub use channel::{ChannelPublisher, EventReceiver};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakePublisher;

use async_trait::async_trait;
use thiserror::Error;
use tj_core::EventEnvelope;

/// Errors from publishing to the bus
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("event bus closed")]
    Closed,
    #[error("publish rejected: {0}")]
    Rejected(String),
}

/// Publisher capability for outgoing events
#[async_trait]
pub trait EventPublisher: Clone + Send + Sync + 'static {
    async fn publish(&self, event: EventEnvelope) -> Result<(), PublishError>;
}
