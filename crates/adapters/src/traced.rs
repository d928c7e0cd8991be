// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::execution::{ExecutionAdapter, ExecutionError, ExecutionOutput};
use crate::publish::{EventPublisher, PublishError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tj_core::EventEnvelope;
use tracing::Instrument;

/// Wrapper that adds tracing to any ExecutionAdapter
#[derive(Clone)]
pub struct TracedExecutionAdapter<E> {
    inner: E,
}

impl<E> TracedExecutionAdapter<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<E: ExecutionAdapter> ExecutionAdapter for TracedExecutionAdapter<E> {
    async fn run(
        &self,
        script: &str,
        env: &BTreeMap<String, String>,
    ) -> Result<ExecutionOutput, ExecutionError> {
        let span = tracing::info_span!("execution.run", script_len = script.len());

        async {
            // Values may be tenant data; only names are logged
            let names: Vec<&str> = env.keys().map(String::as_str).collect();
            tracing::info!(env = ?names, "starting");

            let start = std::time::Instant::now();
            let result = self.inner.run(script, env).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(out) => tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    output_len = out.output.len(),
                    "script completed"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "script failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any EventPublisher
#[derive(Clone)]
pub struct TracedPublisher<P> {
    inner: P,
}

impl<P> TracedPublisher<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: EventPublisher> EventPublisher for TracedPublisher<P> {
    async fn publish(&self, event: EventEnvelope) -> Result<(), PublishError> {
        let span = tracing::info_span!(
            "bus.publish",
            kind = %event.kind,
            source = %event.source
        );

        async {
            let result = self.inner.publish(event).await;
            match &result {
                Ok(()) => tracing::info!("published"),
                Err(e) => tracing::error!(error = %e, "publish failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
