// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use yare::parameterized;

type Factory = fn(ScriptJobSettings) -> Result<ScriptJobSpec, ConfigError>;

#[parameterized(
    provision = {
        provisioning as Factory, "provisioning", EventKind::OnboardingRequest,
        EventKind::ProvisionSuccess, EventKind::ProvisionFailure, "Failed to provision tenant."
    },
    deprovision = {
        deprovisioning as Factory, "deprovisioning", EventKind::OffboardingRequest,
        EventKind::DeprovisionSuccess, EventKind::DeprovisionFailure, "Failed to deprovision tenant."
    },
    activate = {
        activation as Factory, "activation", EventKind::ActivateRequest,
        EventKind::ActivateSuccess, EventKind::ActivateFailure, "Failed to activate tenant."
    },
    deactivate = {
        deactivation as Factory, "deactivation", EventKind::DeactivateRequest,
        EventKind::DeactivateSuccess, EventKind::DeactivateFailure, "Failed to deactivate tenant."
    },
)]
fn factory_fixes_wiring(
    factory: Factory,
    name: &str,
    incoming: EventKind,
    success: EventKind,
    failure: EventKind,
    status: &str,
) {
    let spec = factory(ScriptJobSettings::new("./run.sh")).unwrap();

    assert_eq!(spec.name(), name);
    assert_eq!(spec.job_identifier_key(), TENANT_ID_KEY);
    assert_eq!(spec.incoming_event(), incoming);
    assert_eq!(spec.outgoing_events(), OutgoingEvents::new(success, failure));
    assert_eq!(
        Value::Object(spec.failure_payload().clone()),
        json!({ "tenantStatus": status })
    );
}

#[test]
fn settings_flow_into_spec() {
    let settings = ScriptJobSettings {
        name: Some("provision-db".to_string()),
        script: "./provision.sh".to_string(),
        string_vars_from_event: vec!["tier".to_string()],
        json_vars_from_event: vec!["settings".to_string()],
        static_env_vars: BTreeMap::from([("STAGE".to_string(), "prod".to_string())]),
        output_vars_to_event: vec!["dbEndpoint".to_string()],
        failure_payload: None,
        job_identifier_key: None,
    };

    let spec = provisioning(settings).unwrap();

    assert_eq!(spec.name(), "provision-db");
    assert_eq!(spec.script(), "./provision.sh");
    assert_eq!(spec.string_vars_from_event(), ["tier".to_string()]);
    assert_eq!(spec.json_vars_from_event(), ["settings".to_string()]);
    assert_eq!(spec.static_env_vars()["STAGE"], "prod");
    assert_eq!(spec.output_vars_to_event(), ["dbEndpoint".to_string()]);
}

#[test]
fn custom_failure_payload_replaces_default() {
    let mut payload = Detail::new();
    payload.insert("tenantStatus".to_string(), json!("Provisioning halted."));
    let settings = ScriptJobSettings {
        failure_payload: Some(payload.clone()),
        ..ScriptJobSettings::new("./run.sh")
    };

    let spec = provisioning(settings).unwrap();

    assert_eq!(spec.failure_payload(), &payload);
}

#[test]
fn identifier_key_can_be_overridden() {
    let settings = ScriptJobSettings {
        job_identifier_key: Some("tenantRegistrationId".to_string()),
        ..ScriptJobSettings::new("./run.sh")
    };

    let spec = deprovisioning(settings).unwrap();

    assert_eq!(spec.job_identifier_key(), "tenantRegistrationId");
}

#[test]
fn factories_still_validate() {
    let err = provisioning(ScriptJobSettings::new("")).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyScript { .. }));
}
