// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn whole_output_json_object() {
    let out = extract_outputs(r#"{"dbEndpoint":"db.example.com"}"#, &names(&["dbEndpoint"]));
    assert_eq!(out.get("dbEndpoint"), Some(&json!("db.example.com")));
}

#[test]
fn json_values_keep_their_type() {
    let out = extract_outputs(
        r#"{"replicas": 3, "tags": ["a"], "ready": true}"#,
        &names(&["replicas", "tags", "ready"]),
    );
    assert_eq!(out.get("replicas"), Some(&json!(3)));
    assert_eq!(out.get("tags"), Some(&json!(["a"])));
    assert_eq!(out.get("ready"), Some(&json!(true)));
}

#[test]
fn last_json_line_after_logs() {
    let raw = "creating stack...\n{\"stage\":\"first\"}\ndone\n{\"dbEndpoint\":\"db.internal\"}\n";
    let out = extract_outputs(raw, &names(&["dbEndpoint", "stage"]));

    assert_eq!(out.get("dbEndpoint"), Some(&json!("db.internal")));
    assert!(!out.contains_key("stage"));
}

#[test]
fn key_value_lines() {
    let raw = "export DB_ENDPOINT=db.example.com\nBUCKET=\"tenant-t1\"\nnoise line\nQUEUE='jobs'\n";
    let out = extract_outputs(raw, &names(&["DB_ENDPOINT", "BUCKET", "QUEUE"]));

    assert_eq!(out.get("DB_ENDPOINT"), Some(&json!("db.example.com")));
    assert_eq!(out.get("BUCKET"), Some(&json!("tenant-t1")));
    assert_eq!(out.get("QUEUE"), Some(&json!("jobs")));
}

#[test]
fn later_key_value_lines_win() {
    let out = extract_outputs("STATUS=pending\nSTATUS=ready\n", &names(&["STATUS"]));
    assert_eq!(out.get("STATUS"), Some(&json!("ready")));
}

#[test]
fn value_may_contain_equals() {
    let out = extract_outputs("URL=https://h/?a=b\n", &names(&["URL"]));
    assert_eq!(out.get("URL"), Some(&json!("https://h/?a=b")));
}

#[test]
fn absent_fields_are_omitted() {
    let out = extract_outputs(r#"{"a":1}"#, &names(&["a", "b"]));

    assert_eq!(out.len(), 1);
    assert!(!out.contains_key("b"));
}

#[test]
fn undeclared_fields_are_dropped() {
    let out = extract_outputs(r#"{"a":1,"secret":"x"}"#, &names(&["a"]));
    assert_eq!(out.len(), 1);
    assert!(out.contains_key("a"));
}

#[test]
fn unstructured_output_yields_nothing() {
    assert!(parse_output("all done, nothing to report").is_empty());
    assert!(parse_output("").is_empty());
    assert!(parse_output("[1, 2, 3]").is_empty());
}
