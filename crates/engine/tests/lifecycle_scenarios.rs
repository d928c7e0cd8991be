// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end lifecycle scenarios through the dispatcher

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use serde_json::{json, Value};
use std::sync::Arc;
use tj_adapters::{
    ChannelPublisher, FakeExecutionAdapter, FakePublisher, ShellConfig, ShellExecutionAdapter,
};
use tj_core::{
    deprovisioning, provisioning, EventEnvelope, EventKind, EventRegistry, ScriptJobSettings,
    ScriptJobSpec, SequentialIdGen,
};
use tj_engine::{Dispatcher, JobDeps, JobError, JobRegistry};

fn envelope(kind: EventKind, detail: Value) -> EventEnvelope {
    match detail {
        Value::Object(detail) => EventEnvelope::new(kind, "tenant.control.plane", detail),
        other => panic!("expected object, got {other}"),
    }
}

fn onboarding_premium() -> EventEnvelope {
    envelope(
        EventKind::OnboardingRequest,
        json!({"tenantId": "t1", "tier": "premium"}),
    )
}

fn provisioning_spec(script: &str) -> ScriptJobSpec {
    let mut settings = ScriptJobSettings::new(script);
    settings.string_vars_from_event = vec!["tier".into()];
    settings.output_vars_to_event = vec!["dbEndpoint".into()];
    provisioning(settings).unwrap()
}

fn fake_dispatcher(
    specs: Vec<ScriptJobSpec>,
) -> (
    Dispatcher<FakeExecutionAdapter, FakePublisher, SequentialIdGen>,
    FakeExecutionAdapter,
    FakePublisher,
) {
    let executor = FakeExecutionAdapter::new();
    let publisher = FakePublisher::new();
    let mut registry = JobRegistry::new(JobDeps {
        executor: executor.clone(),
        publisher: publisher.clone(),
        sources: Arc::new(EventRegistry::default()),
        id_gen: SequentialIdGen::default(),
    });
    registry.register_all(specs).unwrap();
    (Dispatcher::new(registry), executor, publisher)
}

#[tokio::test]
async fn provisioning_success_publishes_outputs() {
    let (dispatcher, executor, publisher) =
        fake_dispatcher(vec![provisioning_spec("./provision.sh")]);
    executor.push_output(r#"{"dbEndpoint":"db.example.com"}"#);

    let results = dispatcher.dispatch_and_wait(&onboarding_premium()).await;

    assert!(results[0].is_ok());
    assert_eq!(executor.calls()[0].env["tier"], "premium");
    let published = publisher.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].kind, EventKind::ProvisionSuccess);
    assert_eq!(
        Value::Object(published[0].detail.clone()),
        json!({"tenantId": "t1", "jobOutput": {"dbEndpoint": "db.example.com"}})
    );
}

#[tokio::test]
async fn provisioning_failure_publishes_status() {
    let (dispatcher, executor, publisher) =
        fake_dispatcher(vec![provisioning_spec("./provision.sh")]);
    executor.push_error("permission denied");

    dispatcher.dispatch_and_wait(&onboarding_premium()).await;

    let published = publisher.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].kind, EventKind::ProvisionFailure);
    assert_eq!(
        Value::Object(published[0].detail.clone()),
        json!({"tenantId": "t1", "jobOutput": {"tenantStatus": "Failed to provision tenant."}})
    );
    assert!(!serde_json::to_string(&published[0])
        .unwrap()
        .contains("permission denied"));
}

#[tokio::test]
async fn missing_tenant_id_is_rejected_without_side_effects() {
    let (dispatcher, executor, publisher) =
        fake_dispatcher(vec![provisioning_spec("./provision.sh")]);

    let results = dispatcher
        .dispatch_and_wait(&envelope(
            EventKind::OnboardingRequest,
            json!({"tier": "premium"}),
        ))
        .await;

    assert!(matches!(results[0], Err(JobError::Rejected { .. })));
    assert!(executor.calls().is_empty());
    assert_eq!(publisher.attempts(), 0);
}

#[tokio::test]
async fn missing_string_var_skips_backend() {
    let (dispatcher, executor, publisher) =
        fake_dispatcher(vec![provisioning_spec("./provision.sh")]);

    let results = dispatcher
        .dispatch_and_wait(&envelope(
            EventKind::OnboardingRequest,
            json!({"tenantId": "t1"}),
        ))
        .await;

    assert!(matches!(results[0], Err(JobError::Rejected { .. })));
    assert!(executor.calls().is_empty());
    assert_eq!(publisher.attempts(), 0);
}

#[tokio::test]
async fn redelivery_reproduces_identical_event() {
    let mut events = Vec::new();
    for _ in 0..2 {
        let (dispatcher, executor, publisher) =
            fake_dispatcher(vec![provisioning_spec("./provision.sh")]);
        executor.push_output(r#"{"dbEndpoint":"db.example.com"}"#);
        dispatcher.dispatch_and_wait(&onboarding_premium()).await;
        events.extend(publisher.published());
    }

    assert_eq!(events.len(), 2);
    assert_eq!(events[0], events[1]);
}

#[tokio::test]
async fn exactly_one_event_per_handled_request() {
    let (dispatcher, executor, publisher) = fake_dispatcher(vec![
        provisioning_spec("./provision.sh"),
        deprovisioning(ScriptJobSettings::new("./deprovision.sh")).unwrap(),
    ]);
    executor.push_output("");
    executor.push_error("boom");

    dispatcher.dispatch_and_wait(&onboarding_premium()).await;
    dispatcher
        .dispatch_and_wait(&envelope(
            EventKind::OffboardingRequest,
            json!({"tenantId": "t1"}),
        ))
        .await;

    let kinds: Vec<EventKind> = publisher.published().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![EventKind::ProvisionSuccess, EventKind::DeprovisionFailure]
    );
}

#[tokio::test]
async fn publish_rejection_is_reported_for_redelivery() {
    let (dispatcher, _, publisher) = fake_dispatcher(vec![provisioning_spec("./provision.sh")]);
    publisher.reject_with("bus unavailable");

    let results = dispatcher.dispatch_and_wait(&onboarding_premium()).await;

    match &results[0] {
        Err(err @ JobError::Publish { .. }) => assert!(err.is_retryable()),
        other => panic!("expected publish error, got {other:?}"),
    }
    assert!(publisher.published().is_empty());
}

#[tokio::test]
async fn shell_backend_round_trip() {
    let (publisher, mut events) = ChannelPublisher::new();
    let mut registry = JobRegistry::new(JobDeps {
        executor: ShellExecutionAdapter::new(ShellConfig::default()),
        publisher,
        sources: Arc::new(EventRegistry::default()),
        id_gen: SequentialIdGen::default(),
    });
    registry
        .register(provisioning_spec(
            r#"echo "provisioning $tenantId" >&2; echo "dbEndpoint=$tier.db.example.com""#,
        ))
        .unwrap();
    let dispatcher = Dispatcher::new(registry);

    dispatcher.dispatch_and_wait(&onboarding_premium()).await;

    let event = events.recv().await.unwrap();
    assert_eq!(event.kind, EventKind::ProvisionSuccess);
    assert_eq!(event.source, "tenant.app.plane");
    assert_eq!(
        Value::Object(event.detail),
        json!({"tenantId": "t1", "jobOutput": {"dbEndpoint": "premium.db.example.com"}})
    );
}

#[tokio::test]
async fn shell_nonzero_exit_becomes_failure_event() {
    let (publisher, mut events) = ChannelPublisher::new();
    let mut registry = JobRegistry::new(JobDeps {
        executor: ShellExecutionAdapter::new(ShellConfig::default()),
        publisher,
        sources: Arc::new(EventRegistry::default()),
        id_gen: SequentialIdGen::default(),
    });
    registry
        .register(deprovisioning(ScriptJobSettings::new("echo nope >&2; exit 3")).unwrap())
        .unwrap();
    let dispatcher = Dispatcher::new(registry);

    dispatcher
        .dispatch_and_wait(&envelope(
            EventKind::OffboardingRequest,
            json!({"tenantId": "t9"}),
        ))
        .await;

    let event = events.recv().await.unwrap();
    assert_eq!(event.kind, EventKind::DeprovisionFailure);
    assert_eq!(
        Value::Object(event.detail),
        json!({"tenantId": "t9", "jobOutput": {"tenantStatus": "Failed to deprovision tenant."}})
    );
}
