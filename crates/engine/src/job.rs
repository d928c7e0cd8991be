// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script job engine

use crate::error::JobError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tj_adapters::{EventPublisher, ExecutionAdapter};
use tj_core::{
    Completion, EventEnvelope, IdGen, JobSignal, JobState, MappingError, ScriptJobSpec,
    SourceLookup,
};
use tracing::Instrument;

/// Terminal result of one handled event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub job: String,
    pub run_id: String,
    pub completion: Completion,
    /// Event published (or attempted) for this outcome
    pub event: EventEnvelope,
}

/// Adapter dependencies shared by every job
pub struct JobDeps<E, P, I> {
    pub executor: E,
    pub publisher: P,
    pub sources: Arc<dyn SourceLookup>,
    pub id_gen: I,
}

impl<E: Clone, P: Clone, I: Clone> Clone for JobDeps<E, P, I> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            publisher: self.publisher.clone(),
            sources: Arc::clone(&self.sources),
            id_gen: self.id_gen.clone(),
        }
    }
}

/// A script job bound to its adapters.
///
/// Handles any number of events concurrently; nothing is shared between
/// invocations except the immutable spec.
pub struct ScriptJob<E, P, I> {
    spec: Arc<ScriptJobSpec>,
    deps: JobDeps<E, P, I>,
}

impl<E, P, I> ScriptJob<E, P, I>
where
    E: ExecutionAdapter,
    P: EventPublisher,
    I: IdGen,
{
    pub fn new(spec: ScriptJobSpec, deps: JobDeps<E, P, I>) -> Self {
        Self {
            spec: Arc::new(spec),
            deps,
        }
    }

    pub fn spec(&self) -> &ScriptJobSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// Handle one incoming event.
    ///
    /// Publishes exactly one outgoing event unless the event is rejected
    /// before execution or the publish itself fails.
    pub async fn handle(&self, event: &EventEnvelope) -> Result<JobOutcome, JobError> {
        let run_id = self.deps.id_gen.next();
        let span = tracing::info_span!(
            "job.handle",
            job = self.spec.name(),
            run_id = %run_id,
            kind = %event.kind
        );
        self.handle_inner(run_id, event).instrument(span).await
    }

    async fn handle_inner(
        &self,
        run_id: String,
        event: &EventEnvelope,
    ) -> Result<JobOutcome, JobError> {
        let spec = &self.spec;

        if event.kind != spec.incoming_event() {
            return Err(JobError::UnexpectedKind {
                job: spec.name().to_string(),
                expected: spec.incoming_event(),
                actual: event.kind,
            });
        }

        let rejected = |source: MappingError| {
            tracing::warn!(error = %source, "rejecting event");
            JobError::Rejected {
                job: spec.name().to_string(),
                source,
            }
        };
        let id = spec.identifier(&event.detail).map_err(rejected)?.clone();
        let env = spec.environment_for(&event.detail).map_err(rejected)?;

        tracing::info!(identifier = %id, env_count = env.len(), "running script");

        let state = JobState::Running;
        let (signal, detail) = match self.deps.executor.run(spec.script(), &env).await {
            Ok(out) => (
                JobSignal::BackendSucceeded,
                spec.success_detail(&id, &out.output),
            ),
            Err(e) => {
                // Backend text stays in the logs; the event carries the fixed payload
                tracing::warn!(error = %e, "script failed");
                (JobSignal::BackendFailed, spec.failure_detail(&id))
            }
        };
        let state = state.transition(signal);
        let completion = signal.completion();

        let kind = spec.outgoing_events().for_completion(completion);
        let outgoing = EventEnvelope::new(kind, self.deps.sources.source_for(kind), detail);
        let outcome = JobOutcome {
            job: spec.name().to_string(),
            run_id,
            completion,
            event: outgoing.clone(),
        };

        if let Err(source) = self.deps.publisher.publish(outgoing).await {
            tracing::error!(?state, error = %source, "outcome not published");
            return Err(JobError::Publish {
                outcome: Box::new(outcome),
                source,
            });
        }

        tracing::info!(?state, outgoing = %kind, "job completed");
        Ok(outcome)
    }
}

impl<E: Clone, P: Clone, I: Clone> Clone for ScriptJob<E, P, I> {
    fn clone(&self) -> Self {
        Self {
            spec: Arc::clone(&self.spec),
            deps: self.deps.clone(),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
