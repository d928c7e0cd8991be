// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tj_core::{Detail, EventKind};

#[tokio::test]
async fn fake_publisher_records_events() {
    let publisher = FakePublisher::new();
    let event = EventEnvelope::new(EventKind::ProvisionSuccess, "app", Detail::new());

    publisher.publish(event.clone()).await.unwrap();

    assert_eq!(publisher.published(), vec![event]);
    assert_eq!(publisher.attempts(), 1);
}

#[tokio::test]
async fn fake_publisher_rejects_until_accepting() {
    let publisher = FakePublisher::new();
    let event = EventEnvelope::new(EventKind::ProvisionFailure, "app", Detail::new());

    publisher.reject_with("throttled");
    let err = publisher.publish(event.clone()).await.unwrap_err();
    assert_eq!(err, PublishError::Rejected("throttled".to_string()));
    assert!(publisher.published().is_empty());

    publisher.accept();
    publisher.publish(event).await.unwrap();
    assert_eq!(publisher.published().len(), 1);
    assert_eq!(publisher.attempts(), 2);
}
