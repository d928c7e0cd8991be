// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extracting declared fields from script output
//!
//! Scripts report results on stdout in one of three shapes, tried in order:
//! 1. the whole output is a JSON object
//! 2. the last line that is a JSON object (logs may precede it)
//! 3. `KEY=VALUE` lines, optionally prefixed with `export`
//!
//! Anything else yields no fields. Absent fields are never an error.

use serde_json::{Map, Value};

/// Parse raw script output into a flat record
pub fn parse_output(raw: &str) -> Map<String, Value> {
    if let Some(object) = as_object(raw.trim()) {
        return object;
    }

    if let Some(object) = raw.lines().rev().find_map(|line| as_object(line.trim())) {
        return object;
    }

    parse_key_values(raw)
}

/// Pick the declared `names` out of raw script output, skipping absent ones
pub fn extract_outputs(raw: &str, names: &[String]) -> Map<String, Value> {
    let record = parse_output(raw);
    names
        .iter()
        .filter_map(|name| record.get(name).map(|v| (name.clone(), v.clone())))
        .collect()
}

fn as_object(text: &str) -> Option<Map<String, Value>> {
    if !text.starts_with('{') {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn parse_key_values(raw: &str) -> Map<String, Value> {
    let mut record = Map::new();
    for line in raw.lines() {
        let line = line.trim();
        let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            continue;
        }
        record.insert(key.to_string(), Value::String(unquote(value.trim()).to_string()));
    }
    record
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
