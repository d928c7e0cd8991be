// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types for the Tenant Jobs system

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Untyped key-value payload carried by every event
pub type Detail = Map<String, Value>;

/// Side of the system that emits an event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    /// Tenant management: requests to change a tenant's lifecycle
    Control,
    /// Tenant infrastructure: outcomes of lifecycle jobs
    Application,
}

/// Category of a lifecycle event.
///
/// Serialized as the camelCase detail type carried on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    OnboardingRequest,
    ProvisionSuccess,
    ProvisionFailure,
    OffboardingRequest,
    DeprovisionSuccess,
    DeprovisionFailure,
    ActivateRequest,
    ActivateSuccess,
    ActivateFailure,
    DeactivateRequest,
    DeactivateSuccess,
    DeactivateFailure,
}

impl EventKind {
    pub const ALL: [EventKind; 12] = [
        EventKind::OnboardingRequest,
        EventKind::ProvisionSuccess,
        EventKind::ProvisionFailure,
        EventKind::OffboardingRequest,
        EventKind::DeprovisionSuccess,
        EventKind::DeprovisionFailure,
        EventKind::ActivateRequest,
        EventKind::ActivateSuccess,
        EventKind::ActivateFailure,
        EventKind::DeactivateRequest,
        EventKind::DeactivateSuccess,
        EventKind::DeactivateFailure,
    ];

    /// Detail type name as it appears on the bus
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::OnboardingRequest => "onboardingRequest",
            EventKind::ProvisionSuccess => "provisionSuccess",
            EventKind::ProvisionFailure => "provisionFailure",
            EventKind::OffboardingRequest => "offboardingRequest",
            EventKind::DeprovisionSuccess => "deprovisionSuccess",
            EventKind::DeprovisionFailure => "deprovisionFailure",
            EventKind::ActivateRequest => "activateRequest",
            EventKind::ActivateSuccess => "activateSuccess",
            EventKind::ActivateFailure => "activateFailure",
            EventKind::DeactivateRequest => "deactivateRequest",
            EventKind::DeactivateSuccess => "deactivateSuccess",
            EventKind::DeactivateFailure => "deactivateFailure",
        }
    }

    pub fn plane(&self) -> Plane {
        match self {
            EventKind::OnboardingRequest
            | EventKind::OffboardingRequest
            | EventKind::ActivateRequest
            | EventKind::DeactivateRequest => Plane::Control,
            _ => Plane::Application,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event kind: {0}")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

/// An event as delivered by, or published to, the bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub kind: EventKind,
    pub source: String,
    #[serde(default)]
    pub detail: Detail,
}

impl EventEnvelope {
    pub fn new(kind: EventKind, source: impl Into<String>, detail: Detail) -> Self {
        Self {
            kind,
            source: source.into(),
            detail,
        }
    }

    /// Look up a top-level field of the detail
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.detail.get(key)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
