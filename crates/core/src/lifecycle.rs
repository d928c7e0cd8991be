// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tenant lifecycle jobs
//!
//! Each factory fixes the trigger, the outcome kinds, the identifier key and a
//! default failure payload. Everything else comes from [`ScriptJobSettings`].

use crate::event::{Detail, EventKind};
use crate::job::{ConfigError, OutgoingEvents, ScriptJobSpec};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field identifying the tenant in every lifecycle event
pub const TENANT_ID_KEY: &str = "tenantId";

/// Configuration shared by all lifecycle jobs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptJobSettings {
    pub name: Option<String>,
    pub script: String,
    pub string_vars_from_event: Vec<String>,
    pub json_vars_from_event: Vec<String>,
    pub static_env_vars: BTreeMap<String, String>,
    pub output_vars_to_event: Vec<String>,
    /// Replaces the job's default failure payload when set
    pub failure_payload: Option<Detail>,
    /// Replaces `tenantId` as the identifier key when set
    pub job_identifier_key: Option<String>,
}

impl ScriptJobSettings {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }
}

/// Provision infrastructure for a newly onboarded tenant
pub fn provisioning(settings: ScriptJobSettings) -> Result<ScriptJobSpec, ConfigError> {
    lifecycle_job(
        "provisioning",
        EventKind::OnboardingRequest,
        OutgoingEvents::new(EventKind::ProvisionSuccess, EventKind::ProvisionFailure),
        "Failed to provision tenant.",
        settings,
    )
}

/// Tear down infrastructure for an offboarded tenant
pub fn deprovisioning(settings: ScriptJobSettings) -> Result<ScriptJobSpec, ConfigError> {
    lifecycle_job(
        "deprovisioning",
        EventKind::OffboardingRequest,
        OutgoingEvents::new(EventKind::DeprovisionSuccess, EventKind::DeprovisionFailure),
        "Failed to deprovision tenant.",
        settings,
    )
}

pub fn activation(settings: ScriptJobSettings) -> Result<ScriptJobSpec, ConfigError> {
    lifecycle_job(
        "activation",
        EventKind::ActivateRequest,
        OutgoingEvents::new(EventKind::ActivateSuccess, EventKind::ActivateFailure),
        "Failed to activate tenant.",
        settings,
    )
}

pub fn deactivation(settings: ScriptJobSettings) -> Result<ScriptJobSpec, ConfigError> {
    lifecycle_job(
        "deactivation",
        EventKind::DeactivateRequest,
        OutgoingEvents::new(EventKind::DeactivateSuccess, EventKind::DeactivateFailure),
        "Failed to deactivate tenant.",
        settings,
    )
}

fn lifecycle_job(
    default_name: &str,
    incoming: EventKind,
    outgoing: OutgoingEvents,
    failure_status: &str,
    settings: ScriptJobSettings,
) -> Result<ScriptJobSpec, ConfigError> {
    let failure_payload = settings.failure_payload.unwrap_or_else(|| {
        let mut payload = Detail::new();
        payload.insert(
            "tenantStatus".to_string(),
            Value::String(failure_status.to_string()),
        );
        payload
    });

    ScriptJobSpec::builder(
        settings.name.unwrap_or_else(|| default_name.to_string()),
        incoming,
        outgoing,
    )
    .identifier_key(
        settings
            .job_identifier_key
            .unwrap_or_else(|| TENANT_ID_KEY.to_string()),
    )
    .script(settings.script)
    .string_vars(settings.string_vars_from_event)
    .json_vars(settings.json_vars_from_event)
    .static_envs(settings.static_env_vars)
    .output_vars(settings.output_vars_to_event)
    .failure_payload(failure_payload)
    .build()
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
