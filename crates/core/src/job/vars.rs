// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mapping event detail into a script environment

use crate::event::Detail;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Environment handed to the execution backend, ordered by name
pub type Environment = BTreeMap<String, String>;

/// Errors raised while reading declared fields from an event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("event detail is missing required field '{name}'")]
    MissingField { name: String },
    #[error("event field '{name}' is a {found}, expected a string, number or boolean")]
    NotStringCoercible { name: String, found: &'static str },
}

impl MappingError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            MappingError::MissingField { name } | MappingError::NotStringCoercible { name, .. } => {
                name
            }
        }
    }
}

/// Build the environment for one invocation.
///
/// Starts from `static_vars`, then copies each of `string_names` verbatim
/// and each of `json_names` serialized as JSON. Event-derived values
/// overwrite static values of the same name.
pub fn build_environment(
    detail: &Detail,
    string_names: &[String],
    json_names: &[String],
    static_vars: &BTreeMap<String, String>,
) -> Result<Environment, MappingError> {
    let mut env = static_vars.clone();

    for name in string_names {
        let value = require(detail, name)?;
        env.insert(name.clone(), coerce_string(name, value)?);
    }

    for name in json_names {
        let value = require(detail, name)?;
        env.insert(name.clone(), value.to_string());
    }

    Ok(env)
}

/// Read the job identifier from an event. `null` counts as absent.
pub fn identifier_value<'a>(detail: &'a Detail, key: &str) -> Result<&'a Value, MappingError> {
    match detail.get(key) {
        Some(Value::Null) | None => Err(MappingError::MissingField {
            name: key.to_string(),
        }),
        Some(value) => Ok(value),
    }
}

/// Coerce a scalar JSON value into its string form
pub(crate) fn coerce_string(name: &str, value: &Value) -> Result<String, MappingError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(MappingError::NotStringCoercible {
            name: name.to_string(),
            found: type_name(other),
        }),
    }
}

fn require<'a>(detail: &'a Detail, name: &str) -> Result<&'a Value, MappingError> {
    detail.get(name).ok_or_else(|| MappingError::MissingField {
        name: name.to_string(),
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "vars_tests.rs"]
mod tests;
