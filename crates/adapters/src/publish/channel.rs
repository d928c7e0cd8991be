// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process bus backed by a tokio channel

use super::{EventPublisher, PublishError};
use async_trait::async_trait;
use tj_core::EventEnvelope;
use tokio::sync::mpsc;

/// Receiving end of a [`ChannelPublisher`]
pub type EventReceiver = mpsc::UnboundedReceiver<EventEnvelope>;

/// Publishes events into an unbounded channel drained by the bus owner
#[derive(Clone)]
pub struct ChannelPublisher {
    tx: mpsc::UnboundedSender<EventEnvelope>,
}

impl ChannelPublisher {
    pub fn new() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl EventPublisher for ChannelPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), PublishError> {
        self.tx.send(event).map_err(|_| PublishError::Closed)
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
