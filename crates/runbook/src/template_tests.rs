// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;
use yare::parameterized;

fn vars() -> HashMap<&'static str, &'static str> {
    HashMap::from([("REGION", "eu-west-1"), ("EMPTY", "")])
}

fn lookup(name: &str) -> Option<String> {
    vars().get(name).map(|v| v.to_string())
}

#[parameterized(
    set_with_default = { "${REGION:-us-east-1}", "eu-west-1" },
    unset_with_default = { "${ZONE:-a}", "a" },
    empty_takes_default = { "${EMPTY:-fallback}", "fallback" },
    set_without_default = { "${REGION}", "eu-west-1" },
    unset_without_default = { "x${ZONE}y", "xy" },
    embedded = { "db.${REGION:-x}.internal", "db.eu-west-1.internal" },
    multiple = { "${REGION}/${ZONE:-b}", "eu-west-1/b" },
    plain_text = { "no variables here", "no variables here" },
    bare_dollar_untouched = { "$REGION", "$REGION" },
    empty_default = { "${ZONE:-}", "" },
)]
fn expands(template: &str, expected: &str) {
    assert_eq!(expand_with(template, lookup), expected);
}

#[test]
fn expand_env_reads_process_environment() {
    std::env::set_var("TJ_TEMPLATE_TEST_VAR", "from_env");
    assert_eq!(expand_env("${TJ_TEMPLATE_TEST_VAR:-default}"), "from_env");
    std::env::remove_var("TJ_TEMPLATE_TEST_VAR");
}

#[test]
fn expand_env_falls_back_to_default() {
    std::env::remove_var("TJ_TEMPLATE_UNSET_VAR");
    assert_eq!(expand_env("${TJ_TEMPLATE_UNSET_VAR:-fallback}"), "fallback");
}
