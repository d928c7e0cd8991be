// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event dispatch: fan incoming events out to subscribed jobs

use crate::error::JobError;
use crate::job::JobOutcome;
use crate::registry::JobRegistry;
use std::sync::Arc;
use tj_adapters::{EventPublisher, EventReceiver, ExecutionAdapter};
use tj_core::{EventEnvelope, IdGen};
use tokio::task::JoinHandle;

/// Handle to one spawned job invocation
pub struct Dispatched {
    pub job: String,
    pub handle: JoinHandle<Result<JobOutcome, JobError>>,
}

impl Dispatched {
    /// Wait for the invocation; a panicked or cancelled task becomes `Aborted`
    pub async fn join(self) -> Result<JobOutcome, JobError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(JobError::Aborted {
                job: self.job,
                reason: e.to_string(),
            }),
        }
    }

    /// Let the invocation finish in the background; its result is logged
    pub fn detach(self) {
        tokio::spawn(async move {
            let job = self.job.clone();
            let result = self.join().await;
            log_result(&job, &result);
        });
    }
}

/// Routes events to every subscribed job, each on its own task
pub struct Dispatcher<E, P, I> {
    registry: Arc<JobRegistry<E, P, I>>,
}

impl<E, P, I> Clone for Dispatcher<E, P, I> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E, P, I> Dispatcher<E, P, I>
where
    E: ExecutionAdapter,
    P: EventPublisher,
    I: IdGen,
{
    pub fn new(registry: JobRegistry<E, P, I>) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &JobRegistry<E, P, I> {
        &self.registry
    }

    /// Spawn one invocation per subscribed job. Events nobody subscribes
    /// to are dropped.
    pub fn dispatch(&self, event: &EventEnvelope) -> Vec<Dispatched> {
        let dispatched: Vec<Dispatched> = self
            .registry
            .jobs_for(event.kind)
            .map(|job| {
                let job = job.clone();
                let event = event.clone();
                Dispatched {
                    job: job.name().to_string(),
                    handle: tokio::spawn(async move { job.handle(&event).await }),
                }
            })
            .collect();

        if dispatched.is_empty() {
            tracing::debug!(kind = %event.kind, "no job subscribed, dropping event");
        }
        dispatched
    }

    /// Dispatch and wait for every invocation to reach its outcome
    pub async fn dispatch_and_wait(
        &self,
        event: &EventEnvelope,
    ) -> Vec<Result<JobOutcome, JobError>> {
        let mut results = Vec::new();
        for dispatched in self.dispatch(event) {
            results.push(dispatched.join().await);
        }
        results
    }

    /// Consume events until the channel closes, logging every result
    pub async fn run(&self, mut events: EventReceiver) {
        while let Some(event) = events.recv().await {
            for dispatched in self.dispatch(&event) {
                dispatched.detach();
            }
        }
        tracing::info!("event channel closed, dispatcher stopping");
    }
}

/// Log the result of a finished invocation
pub fn log_result(job: &str, result: &Result<JobOutcome, JobError>) {
    match result {
        Ok(outcome) => tracing::info!(
            job,
            run_id = %outcome.run_id,
            completion = %outcome.completion,
            "job finished"
        ),
        Err(e) if e.is_retryable() => {
            tracing::error!(job, error = %e, "job did not complete, redelivery required")
        }
        Err(e) => tracing::warn!(job, error = %e, "job rejected event"),
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
