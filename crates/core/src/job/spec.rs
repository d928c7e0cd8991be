// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script job specification
//!
//! A spec is built once at setup and never changes afterwards. The builder
//! validates it, so a `ScriptJobSpec` value is always well-formed.

use super::output::extract_outputs;
use super::state::Completion;
use super::vars::{build_environment, coerce_string, identifier_value, Environment, MappingError};
use crate::event::{Detail, EventKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use thiserror::Error;

/// Key under which job results travel in outgoing events
pub const JOB_OUTPUT_KEY: &str = "jobOutput";

/// Default ceiling for a single script run
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Kinds published when a job completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEvents {
    pub success: EventKind,
    pub failure: EventKind,
}

impl OutgoingEvents {
    pub fn new(success: EventKind, failure: EventKind) -> Self {
        Self { success, failure }
    }

    pub fn for_completion(&self, completion: Completion) -> EventKind {
        match completion {
            Completion::Success => self.success,
            Completion::Failure => self.failure,
        }
    }
}

/// Errors in a job specification, detected before any event is handled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("job name must not be empty")]
    EmptyName,
    #[error("job {job}: identifier key must not be empty")]
    EmptyIdentifierKey { job: String },
    #[error("job {job}: script must not be empty")]
    EmptyScript { job: String },
    #[error("job {job}: '{name}' is not a valid variable name")]
    InvalidVariableName { job: String, name: String },
    #[error("job {job}: variable '{name}' is declared more than once")]
    DuplicateVariable { job: String, name: String },
    #[error("job {job}: variable '{name}' is declared as both string and JSON")]
    OverlappingVariable { job: String, name: String },
    #[error("job {job}: identifier key '{key}' is reserved for job results")]
    ReservedIdentifierKey { job: String, key: String },
    #[error("job {job}: identifier '{key}' cannot be injected as JSON")]
    IdentifierAsJson { job: String, key: String },
    #[error("job {job}: success and failure both publish {kind}")]
    IndistinctOutcomes { job: String, kind: EventKind },
    #[error("job {job}: outcome {kind} would retrigger the job")]
    SelfTrigger { job: String, kind: EventKind },
    #[error("jobs retrigger each other: {}", jobs.join(" -> "))]
    TriggerCycle { jobs: Vec<String> },
    #[error("duplicate job name: {name}")]
    DuplicateJob { name: String },
}

/// Immutable configuration of one script job
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptJobSpec {
    name: String,
    job_identifier_key: String,
    script: String,
    incoming_event: EventKind,
    outgoing_events: OutgoingEvents,
    string_vars_from_event: Vec<String>,
    json_vars_from_event: Vec<String>,
    static_env_vars: BTreeMap<String, String>,
    output_vars_to_event: Vec<String>,
    failure_payload: Detail,
}

impl ScriptJobSpec {
    pub fn builder(
        name: impl Into<String>,
        incoming_event: EventKind,
        outgoing_events: OutgoingEvents,
    ) -> ScriptJobSpecBuilder {
        ScriptJobSpecBuilder {
            spec: ScriptJobSpec {
                name: name.into(),
                job_identifier_key: String::new(),
                script: String::new(),
                incoming_event,
                outgoing_events,
                string_vars_from_event: Vec::new(),
                json_vars_from_event: Vec::new(),
                static_env_vars: BTreeMap::new(),
                output_vars_to_event: Vec::new(),
                failure_payload: Detail::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn job_identifier_key(&self) -> &str {
        &self.job_identifier_key
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn incoming_event(&self) -> EventKind {
        self.incoming_event
    }

    pub fn outgoing_events(&self) -> OutgoingEvents {
        self.outgoing_events
    }

    pub fn string_vars_from_event(&self) -> &[String] {
        &self.string_vars_from_event
    }

    pub fn json_vars_from_event(&self) -> &[String] {
        &self.json_vars_from_event
    }

    pub fn static_env_vars(&self) -> &BTreeMap<String, String> {
        &self.static_env_vars
    }

    pub fn output_vars_to_event(&self) -> &[String] {
        &self.output_vars_to_event
    }

    pub fn failure_payload(&self) -> &Detail {
        &self.failure_payload
    }

    /// Identifier of the job subject carried by `detail`
    pub fn identifier<'a>(&self, detail: &'a Detail) -> Result<&'a Value, MappingError> {
        identifier_value(detail, &self.job_identifier_key)
    }

    /// Environment for one invocation.
    ///
    /// The identifier is always injected under its own key.
    pub fn environment_for(&self, detail: &Detail) -> Result<Environment, MappingError> {
        let id = self.identifier(detail)?;
        let mut env = build_environment(
            detail,
            &self.string_vars_from_event,
            &self.json_vars_from_event,
            &self.static_env_vars,
        )?;
        env.insert(
            self.job_identifier_key.clone(),
            coerce_string(&self.job_identifier_key, id)?,
        );
        Ok(env)
    }

    /// Detail of the success event: identifier plus the declared outputs
    /// present in `raw_output`
    pub fn success_detail(&self, id: &Value, raw_output: &str) -> Detail {
        let outputs = extract_outputs(raw_output, &self.output_vars_to_event);
        self.outgoing_detail(id, outputs)
    }

    /// Detail of the failure event: identifier plus the fixed failure payload
    pub fn failure_detail(&self, id: &Value) -> Detail {
        self.outgoing_detail(id, self.failure_payload.clone())
    }

    fn outgoing_detail(&self, id: &Value, job_output: Detail) -> Detail {
        let mut detail = Detail::new();
        detail.insert(self.job_identifier_key.clone(), id.clone());
        detail.insert(JOB_OUTPUT_KEY.to_string(), Value::Object(job_output));
        detail
    }

    /// Check every construction-time invariant
    pub fn validate(&self) -> Result<(), ConfigError> {
        let job = || self.name.clone();

        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.job_identifier_key.is_empty() {
            return Err(ConfigError::EmptyIdentifierKey { job: job() });
        }
        if self.job_identifier_key == JOB_OUTPUT_KEY {
            return Err(ConfigError::ReservedIdentifierKey {
                job: job(),
                key: self.job_identifier_key.clone(),
            });
        }
        if self.script.trim().is_empty() {
            return Err(ConfigError::EmptyScript { job: job() });
        }

        let env_names = std::iter::once(&self.job_identifier_key)
            .chain(&self.string_vars_from_event)
            .chain(&self.json_vars_from_event)
            .chain(self.static_env_vars.keys());
        for name in env_names {
            if !is_env_name(name) {
                return Err(ConfigError::InvalidVariableName {
                    job: job(),
                    name: name.clone(),
                });
            }
        }

        check_unique(&self.name, &self.string_vars_from_event)?;
        check_unique(&self.name, &self.json_vars_from_event)?;
        check_unique(&self.name, &self.output_vars_to_event)?;

        if let Some(name) = self
            .string_vars_from_event
            .iter()
            .find(|name| self.json_vars_from_event.contains(name))
        {
            return Err(ConfigError::OverlappingVariable {
                job: job(),
                name: name.clone(),
            });
        }
        if self.json_vars_from_event.contains(&self.job_identifier_key) {
            return Err(ConfigError::IdentifierAsJson {
                job: job(),
                key: self.job_identifier_key.clone(),
            });
        }
        if let Some(name) = self.output_vars_to_event.iter().find(|n| n.is_empty()) {
            return Err(ConfigError::InvalidVariableName {
                job: job(),
                name: name.clone(),
            });
        }

        let OutgoingEvents { success, failure } = self.outgoing_events;
        if success == failure {
            return Err(ConfigError::IndistinctOutcomes {
                job: job(),
                kind: success,
            });
        }
        if let Some(kind) = [success, failure]
            .into_iter()
            .find(|kind| *kind == self.incoming_event)
        {
            return Err(ConfigError::SelfTrigger { job: job(), kind });
        }

        Ok(())
    }
}

/// Builder for [`ScriptJobSpec`]; `build` validates
#[derive(Debug, Clone)]
pub struct ScriptJobSpecBuilder {
    spec: ScriptJobSpec,
}

impl ScriptJobSpecBuilder {
    pub fn identifier_key(mut self, key: impl Into<String>) -> Self {
        self.spec.job_identifier_key = key.into();
        self
    }

    pub fn script(mut self, script: impl Into<String>) -> Self {
        self.spec.script = script.into();
        self
    }

    pub fn string_vars<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec
            .string_vars_from_event
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn json_vars<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec
            .json_vars_from_event
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn static_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.static_env_vars.insert(name.into(), value.into());
        self
    }

    pub fn static_envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.spec
            .static_env_vars
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn output_vars<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec
            .output_vars_to_event
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn failure_payload(mut self, payload: Detail) -> Self {
        self.spec.failure_payload = payload;
        self
    }

    pub fn build(self) -> Result<ScriptJobSpec, ConfigError> {
        self.spec.validate()?;
        Ok(self.spec)
    }
}

fn check_unique(job: &str, names: &[String]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::DuplicateVariable {
                job: job.to_string(),
                name: name.clone(),
            });
        }
    }
    Ok(())
}

fn is_env_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
