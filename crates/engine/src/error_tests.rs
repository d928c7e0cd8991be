// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tj_core::{Completion, Detail, EventEnvelope};
use yare::parameterized;

fn outcome() -> JobOutcome {
    JobOutcome {
        job: "provisioning".to_string(),
        run_id: "run-1".to_string(),
        completion: Completion::Success,
        event: EventEnvelope::new(EventKind::ProvisionSuccess, "tenant.app.plane", Detail::new()),
    }
}

fn error(variant: &str) -> JobError {
    match variant {
        "unexpected_kind" => JobError::UnexpectedKind {
            job: "provisioning".to_string(),
            expected: EventKind::OnboardingRequest,
            actual: EventKind::OffboardingRequest,
        },
        "rejected" => JobError::Rejected {
            job: "provisioning".to_string(),
            source: MappingError::MissingField {
                name: "tenantId".to_string(),
            },
        },
        "publish" => JobError::Publish {
            outcome: Box::new(outcome()),
            source: PublishError::Closed,
        },
        "aborted" => JobError::Aborted {
            job: "provisioning".to_string(),
            reason: "task panicked".to_string(),
        },
        other => panic!("unknown variant {other}"),
    }
}

#[parameterized(
    unexpected_kind = { "unexpected_kind", false },
    rejected = { "rejected", false },
    publish = { "publish", true },
    aborted = { "aborted", true },
)]
fn retryable(variant: &str, expected: bool) {
    let err = error(variant);
    assert_eq!(err.is_retryable(), expected);
    assert_eq!(err.job(), "provisioning");
}

#[test]
fn messages_name_the_job() {
    assert_eq!(
        error("rejected").to_string(),
        "job provisioning rejected event: event detail is missing required field 'tenantId'"
    );
    assert_eq!(
        error("publish").to_string(),
        "job provisioning reached success but publishing failed: event bus closed"
    );
    assert_eq!(
        error("unexpected_kind").to_string(),
        "job provisioning expects onboardingRequest, received offboardingRequest"
    );
}
