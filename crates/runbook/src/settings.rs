// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus and executor settings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tj_core::{
    EventKind, EventRegistry, UnknownEventKind, DEFAULT_APP_PLANE_SOURCE, DEFAULT_BUS_NAME,
    DEFAULT_CONTROL_PLANE_SOURCE, DEFAULT_SCRIPT_TIMEOUT,
};

/// The `[bus]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BusDef {
    #[serde(default = "default_bus_name")]
    pub name: String,
    #[serde(default = "default_control_plane_source")]
    pub control_plane_source: String,
    #[serde(default = "default_app_plane_source")]
    pub app_plane_source: String,
    /// Per-kind source overrides, e.g. `provisionSuccess = "billing"`
    #[serde(default)]
    pub sources: BTreeMap<String, String>,
}

fn default_bus_name() -> String {
    DEFAULT_BUS_NAME.to_string()
}

fn default_control_plane_source() -> String {
    DEFAULT_CONTROL_PLANE_SOURCE.to_string()
}

fn default_app_plane_source() -> String {
    DEFAULT_APP_PLANE_SOURCE.to_string()
}

impl Default for BusDef {
    fn default() -> Self {
        Self {
            name: default_bus_name(),
            control_plane_source: default_control_plane_source(),
            app_plane_source: default_app_plane_source(),
            sources: BTreeMap::new(),
        }
    }
}

impl BusDef {
    /// Source registry for this bus. Fails on an unknown kind in `sources`.
    pub fn registry(&self) -> Result<EventRegistry, UnknownEventKind> {
        let mut registry = EventRegistry::new(
            &self.name,
            &self.control_plane_source,
            &self.app_plane_source,
        );
        for (kind, source) in &self.sources {
            registry = registry.with_source(kind.parse::<EventKind>()?, source);
        }
        Ok(registry)
    }
}

/// The `[executor]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutorDef {
    #[serde(default = "default_shell")]
    pub shell: String,
    /// e.g. `"90s"`, `"15m"`
    #[serde(with = "humantime_serde", default)]
    pub timeout: Option<Duration>,
    /// Working directory for scripts, relative to the project root
    #[serde(default)]
    pub cwd: Option<PathBuf>,
}

fn default_shell() -> String {
    "sh".to_string()
}

impl Default for ExecutorDef {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            timeout: None,
            cwd: None,
        }
    }
}

impl ExecutorDef {
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_SCRIPT_TIMEOUT)
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
