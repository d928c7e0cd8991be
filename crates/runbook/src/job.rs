// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job definitions

use crate::parser::ParseError;
use crate::template::expand_env;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tj_core::{
    activation, deactivation, deprovisioning, provisioning, Detail, EventKind, OutgoingEvents,
    ScriptJobSettings, ScriptJobSpec, TENANT_ID_KEY,
};

/// Built-in tenant lifecycle jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Provisioning,
    Deprovisioning,
    Activation,
    Deactivation,
}

/// A `[job.<name>]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobDef {
    /// Job name (set from table key, not from TOML content)
    #[serde(skip)]
    pub name: String,
    /// Lifecycle job this definition configures; excludes explicit events
    #[serde(default)]
    pub lifecycle: Option<Lifecycle>,
    #[serde(default)]
    pub trigger: Option<EventKind>,
    #[serde(default)]
    pub on_success: Option<EventKind>,
    #[serde(default)]
    pub on_failure: Option<EventKind>,
    /// Identifier key; `tenantId` when unset
    #[serde(default)]
    pub identifier: Option<String>,
    /// Inline script body
    #[serde(default)]
    pub script: Option<String>,
    /// Script file, relative to the project root
    #[serde(default)]
    pub script_file: Option<PathBuf>,
    #[serde(default)]
    pub string_vars: Vec<String>,
    #[serde(default)]
    pub json_vars: Vec<String>,
    #[serde(default)]
    pub output_vars: Vec<String>,
    /// Static environment; values support `${VAR:-default}`
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Failure payload published as `jobOutput` when the script fails
    #[serde(default)]
    pub failure: Option<Detail>,
}

impl JobDef {
    /// Build the validated job spec. `project_root` resolves `script_file`.
    pub fn to_spec(&self, project_root: &Path) -> Result<ScriptJobSpec, ParseError> {
        let script = self.resolve_script(project_root)?;
        let static_env_vars = self
            .env
            .iter()
            .map(|(name, value)| (name.clone(), expand_env(value)))
            .collect();

        let Some(lifecycle) = self.lifecycle else {
            return self.to_generic_spec(script, static_env_vars);
        };

        if self.trigger.is_some() || self.on_success.is_some() || self.on_failure.is_some() {
            return Err(self.invalid("lifecycle jobs cannot set trigger, on_success or on_failure"));
        }

        let settings = ScriptJobSettings {
            name: Some(self.name.clone()),
            script,
            string_vars_from_event: self.string_vars.clone(),
            json_vars_from_event: self.json_vars.clone(),
            static_env_vars,
            output_vars_to_event: self.output_vars.clone(),
            failure_payload: self.failure.clone(),
            job_identifier_key: self.identifier.clone(),
        };
        let spec = match lifecycle {
            Lifecycle::Provisioning => provisioning(settings),
            Lifecycle::Deprovisioning => deprovisioning(settings),
            Lifecycle::Activation => activation(settings),
            Lifecycle::Deactivation => deactivation(settings),
        }?;
        Ok(spec)
    }

    fn to_generic_spec(
        &self,
        script: String,
        static_env_vars: BTreeMap<String, String>,
    ) -> Result<ScriptJobSpec, ParseError> {
        let (Some(trigger), Some(on_success), Some(on_failure)) =
            (self.trigger, self.on_success, self.on_failure)
        else {
            return Err(self.invalid("set lifecycle, or all of trigger, on_success and on_failure"));
        };

        let spec = ScriptJobSpec::builder(
            self.name.clone(),
            trigger,
            OutgoingEvents::new(on_success, on_failure),
        )
        .identifier_key(
            self.identifier
                .clone()
                .unwrap_or_else(|| TENANT_ID_KEY.to_string()),
        )
        .script(script)
        .string_vars(self.string_vars.iter().cloned())
        .json_vars(self.json_vars.iter().cloned())
        .static_envs(static_env_vars)
        .output_vars(self.output_vars.iter().cloned())
        .failure_payload(self.failure.clone().unwrap_or_default())
        .build()?;
        Ok(spec)
    }

    fn resolve_script(&self, project_root: &Path) -> Result<String, ParseError> {
        match (&self.script, &self.script_file) {
            (Some(script), None) => Ok(script.clone()),
            (None, Some(file)) => {
                let path = project_root.join(file);
                std::fs::read_to_string(&path).map_err(|source| ParseError::Io { path, source })
            }
            (Some(_), Some(_)) => Err(self.invalid("script and script_file are exclusive")),
            (None, None) => Err(self.invalid("missing script or script_file")),
        }
    }

    fn invalid(&self, reason: &str) -> ParseError {
        ParseError::InvalidJob {
            job: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
