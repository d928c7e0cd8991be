// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment expansion for runbook values

use regex::Regex;
use std::sync::LazyLock;

// Regex pattern for ${VAR} and ${VAR:-default} environment variable expansion
#[allow(clippy::expect_used)]
static ENV_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
        .expect("constant regex pattern is valid")
});

/// Expand `${VAR}` and `${VAR:-default}` from the daemon's environment.
///
/// An unset or empty variable takes the default, or the empty string when
/// no default is given. Anything else is left as-is.
pub fn expand_env(template: &str) -> String {
    expand_with(template, |name| std::env::var(name).ok())
}

/// Expand against an arbitrary lookup
pub fn expand_with(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    ENV_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let default_value = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            lookup(&caps[1])
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default_value.to_string())
        })
        .to_string()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
