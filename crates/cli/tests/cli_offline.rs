// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI commands that never talk to a daemon

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::{Project, RUNBOOK};
use predicates::prelude::*;

#[test]
fn help_lists_commands() {
    Project::empty()
        .tj()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("emit"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("events"))
        .stdout(predicate::str::contains("daemon"));
}

#[test]
fn validate_lists_job_wiring() {
    let project = Project::with_runbook(RUNBOOK);

    project
        .tj()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "onboardingRequest -> provisionSuccess | provisionFailure",
        ))
        .stdout(predicate::str::contains(
            "offboardingRequest -> deprovisionSuccess | deprovisionFailure",
        ))
        .stdout(predicate::str::contains("2 jobs OK"));
}

#[test]
fn validate_json_output() {
    let project = Project::with_runbook(RUNBOOK);

    let output = project
        .tj()
        .args(["validate", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let jobs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(jobs[0]["name"], "deprovision");
    assert_eq!(jobs[1]["name"], "provision");
    assert_eq!(jobs[1]["trigger"], "onboardingRequest");
    assert_eq!(jobs[1]["failure"], "provisionFailure");
}

#[test]
fn validate_without_runbooks() {
    Project::empty()
        .tj()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("No jobs defined"));
}

#[test]
fn validate_reports_invalid_job() {
    let project = Project::with_runbook(
        r#"
[job.provision]
lifecycle = "provisioning"
script = "true"
string_vars = ["tier", "tier"]
"#,
    );

    project
        .tj()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "variable 'tier' is declared more than once",
        ));
}

#[test]
fn validate_reports_unknown_trigger() {
    let project = Project::with_runbook(
        r#"
[job.notify]
trigger = "tenantCreated"
on_success = "activateRequest"
on_failure = "activateFailure"
script = "true"
"#,
    );

    project
        .tj()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("tenantCreated"));
}

#[test]
fn validate_reports_trigger_cycle() {
    let project = Project::with_runbook(
        r#"
[job.provision]
lifecycle = "provisioning"
script = "true"

[job.reonboard]
trigger = "provisionSuccess"
on_success = "onboardingRequest"
on_failure = "activateFailure"
script = "true"
"#,
    );

    project
        .tj()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("jobs retrigger each other"));
}

#[test]
fn events_without_log() {
    Project::empty()
        .tj()
        .arg("events")
        .assert()
        .success()
        .stdout(predicate::str::contains("No events"));
}

#[test]
fn emit_rejects_unknown_kind() {
    Project::empty()
        .tj()
        .args(["emit", "tenantCreated"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown event kind"));
}

#[test]
fn emit_rejects_non_object_data() {
    Project::empty()
        .tj()
        .args(["emit", "onboardingRequest", "--data", "[1, 2]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--data must be a JSON object"));
}
