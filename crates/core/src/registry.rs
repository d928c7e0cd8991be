// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event source registry
//!
//! The bus owner decides which source identifier each event kind is
//! published under. Jobs only look sources up; they never choose them.

use crate::event::{EventKind, Plane};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_BUS_NAME: &str = "tenant-lifecycle";
pub const DEFAULT_CONTROL_PLANE_SOURCE: &str = "tenant.control.plane";
pub const DEFAULT_APP_PLANE_SOURCE: &str = "tenant.app.plane";

/// Source lookup capability handed to jobs
pub trait SourceLookup: Send + Sync + 'static {
    /// Name of the bus the sources belong to
    fn bus_name(&self) -> &str;

    /// Source identifier to publish `kind` under
    fn source_for(&self, kind: EventKind) -> &str;
}

/// Registry mapping event kinds to their source identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRegistry {
    bus_name: String,
    control_plane_source: String,
    app_plane_source: String,
    /// Per-kind sources that take precedence over the plane defaults
    #[serde(default)]
    overrides: BTreeMap<EventKind, String>,
}

impl EventRegistry {
    pub fn new(
        bus_name: impl Into<String>,
        control_plane_source: impl Into<String>,
        app_plane_source: impl Into<String>,
    ) -> Self {
        Self {
            bus_name: bus_name.into(),
            control_plane_source: control_plane_source.into(),
            app_plane_source: app_plane_source.into(),
            overrides: BTreeMap::new(),
        }
    }

    /// Publish `kind` under `source` instead of its plane default
    pub fn with_source(mut self, kind: EventKind, source: impl Into<String>) -> Self {
        self.overrides.insert(kind, source.into());
        self
    }

    /// Source identifier for every kind emitted by `plane`
    pub fn plane_source(&self, plane: Plane) -> &str {
        match plane {
            Plane::Control => &self.control_plane_source,
            Plane::Application => &self.app_plane_source,
        }
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new(
            DEFAULT_BUS_NAME,
            DEFAULT_CONTROL_PLANE_SOURCE,
            DEFAULT_APP_PLANE_SOURCE,
        )
    }
}

impl SourceLookup for EventRegistry {
    fn bus_name(&self) -> &str {
        &self.bus_name
    }

    fn source_for(&self, kind: EventKind) -> &str {
        self.overrides
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| self.plane_source(kind.plane()))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
