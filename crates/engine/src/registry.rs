// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job registry: which jobs subscribe to which event kinds

use crate::job::{JobDeps, ScriptJob};
use std::collections::BTreeSet;
use tj_adapters::{EventPublisher, ExecutionAdapter};
use tj_core::{ConfigError, EventKind, IdGen, OutgoingEvents, ScriptJobSpec};

/// Registered jobs, each bound to the shared adapters.
///
/// Job names are unique. Several jobs may subscribe to the same kind.
/// Outcomes feed back into dispatch, so no chain of jobs may lead back
/// to a kind it started from.
pub struct JobRegistry<E, P, I> {
    deps: JobDeps<E, P, I>,
    jobs: Vec<ScriptJob<E, P, I>>,
}

impl<E, P, I> JobRegistry<E, P, I>
where
    E: ExecutionAdapter,
    P: EventPublisher,
    I: IdGen,
{
    pub fn new(deps: JobDeps<E, P, I>) -> Self {
        Self {
            deps,
            jobs: Vec::new(),
        }
    }

    /// Register a job. Fails if a job with the same name already exists
    /// or if its outcomes would, through other jobs, retrigger it.
    pub fn register(&mut self, spec: ScriptJobSpec) -> Result<(), ConfigError> {
        spec.validate()?;
        if self.get(spec.name()).is_some() {
            return Err(ConfigError::DuplicateJob {
                name: spec.name().to_string(),
            });
        }
        if let Some(jobs) = self.cycle_through(&spec) {
            return Err(ConfigError::TriggerCycle { jobs });
        }

        tracing::debug!(
            job = spec.name(),
            incoming = %spec.incoming_event(),
            "registered job"
        );
        self.jobs.push(ScriptJob::new(spec, self.deps.clone()));
        Ok(())
    }

    /// Register every spec, stopping at the first error
    pub fn register_all(
        &mut self,
        specs: impl IntoIterator<Item = ScriptJobSpec>,
    ) -> Result<(), ConfigError> {
        for spec in specs {
            self.register(spec)?;
        }
        Ok(())
    }

    /// Chain of jobs leading from `spec`'s outcomes back to its trigger.
    ///
    /// The registered jobs are acyclic, so any new cycle passes through `spec`.
    fn cycle_through(&self, spec: &ScriptJobSpec) -> Option<Vec<String>> {
        let target = spec.incoming_event();
        let mut seen = BTreeSet::new();
        let mut pending: Vec<(EventKind, Vec<String>)> = outcomes(spec.outgoing_events())
            .map(|kind| (kind, vec![spec.name().to_string()]))
            .collect();

        while let Some((kind, path)) = pending.pop() {
            if kind == target {
                return Some(path);
            }
            if !seen.insert(kind) {
                continue;
            }
            for job in self.jobs_for(kind) {
                for next in outcomes(job.spec().outgoing_events()) {
                    let mut path = path.clone();
                    path.push(job.name().to_string());
                    pending.push((next, path));
                }
            }
        }
        None
    }

    pub fn get(&self, name: &str) -> Option<&ScriptJob<E, P, I>> {
        self.jobs.iter().find(|job| job.name() == name)
    }

    /// Jobs subscribed to `kind`, in registration order
    pub fn jobs_for(&self, kind: EventKind) -> impl Iterator<Item = &ScriptJob<E, P, I>> {
        self.jobs
            .iter()
            .filter(move |job| job.spec().incoming_event() == kind)
    }

    /// Event kinds at least one job subscribes to
    pub fn subscribed_kinds(&self) -> BTreeSet<EventKind> {
        self.jobs
            .iter()
            .map(|job| job.spec().incoming_event())
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.jobs.iter().map(|job| job.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

fn outcomes(events: OutgoingEvents) -> impl Iterator<Item = EventKind> {
    [events.success, events.failure].into_iter()
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
