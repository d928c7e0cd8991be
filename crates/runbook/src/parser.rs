// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runbook TOML parsing

use crate::{BusDef, ExecutorDef, JobDef};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tj_core::{ConfigError, EventRegistry, ScriptJobSpec, UnknownEventKind};

/// Errors that can occur during runbook parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("job.{job}: {reason}")]
    InvalidJob { job: String, reason: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("bus.sources: {0}")]
    UnknownEventKind(#[from] UnknownEventKind),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A parsed runbook
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Runbook {
    pub bus: BusDef,
    pub executor: ExecutorDef,
    pub jobs: BTreeMap<String, JobDef>,
}

impl Runbook {
    /// Get a job definition by name
    pub fn get_job(&self, name: &str) -> Option<&JobDef> {
        self.jobs.get(name)
    }

    /// Source registry described by `[bus]`
    pub fn event_registry(&self) -> Result<EventRegistry, ParseError> {
        Ok(self.bus.registry()?)
    }

    /// Validated specs for every job, in name order
    pub fn specs(&self, project_root: &Path) -> Result<Vec<ScriptJobSpec>, ParseError> {
        self.jobs
            .values()
            .map(|job| job.to_spec(project_root))
            .collect()
    }
}

/// Parse a runbook from TOML content
pub fn parse_runbook(content: &str) -> Result<Runbook, ParseError> {
    let raw: toml::Value = toml::from_str(content)?;
    let table = raw
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat("root must be a table".to_string()))?;

    let mut runbook = Runbook::default();

    for key in table.keys() {
        if !matches!(key.as_str(), "bus" | "executor" | "job") {
            return Err(ParseError::InvalidFormat(format!("unknown table: {}", key)));
        }
    }

    if let Some(bus) = table.get("bus") {
        runbook.bus = bus
            .clone()
            .try_into()
            .map_err(|e: toml::de::Error| ParseError::InvalidFormat(format!("bus: {}", e)))?;
    }

    if let Some(executor) = table.get("executor") {
        runbook.executor = executor.clone().try_into().map_err(|e: toml::de::Error| {
            ParseError::InvalidFormat(format!("executor: {}", e))
        })?;
    }

    // Parse jobs
    if let Some(jobs) = table.get("job") {
        let jobs = jobs
            .as_table()
            .ok_or_else(|| ParseError::InvalidFormat("job must be a table".to_string()))?;
        for (name, value) in jobs {
            let job = parse_job(name, value)?;
            runbook.jobs.insert(name.clone(), job);
        }
    }

    Ok(runbook)
}

fn parse_job(name: &str, value: &toml::Value) -> Result<JobDef, ParseError> {
    let mut job: JobDef = value.clone().try_into().map_err(|e: toml::de::Error| {
        ParseError::InvalidFormat(format!("job.{}: {}", name, e))
    })?;
    job.name = name.to_string();
    Ok(job)
}

/// Load every `*.toml` file in `dir` as one runbook.
///
/// Files are read in name order. A missing directory is an empty runbook.
pub fn load_runbooks(dir: &Path) -> Result<Runbook, ParseError> {
    if !dir.exists() {
        return Ok(Runbook::default());
    }

    let io_err = |source| ParseError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(io_err)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|e| e == "toml"))
        .collect();
    paths.sort();

    // Concatenated, so a job or table defined twice is a TOML error
    let mut combined_content = String::new();
    for path in paths {
        tracing::debug!(path = %path.display(), "reading runbook");
        let content = std::fs::read_to_string(&path).map_err(|source| ParseError::Io {
            path: path.clone(),
            source,
        })?;
        combined_content.push_str(&content);
        combined_content.push('\n');
    }

    parse_runbook(&combined_content)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
