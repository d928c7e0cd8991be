// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tj-core: Core library for Tenant Jobs (tj)
//!
//! This crate provides:
//! - Lifecycle event kinds, envelopes and the source registry
//! - Script job specifications and their construction-time validation
//! - Pure variable mapping and output extraction
//! - The per-invocation job state machine
//! - Factories for the tenant lifecycle jobs

pub mod event;
pub mod id;
pub mod job;
pub mod lifecycle;
pub mod registry;

pub use event::{Detail, EventEnvelope, EventKind, Plane, UnknownEventKind};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use job::{
    build_environment, extract_outputs, parse_output, Completion, ConfigError, Environment,
    JobSignal, JobState, MappingError, OutgoingEvents, ScriptJobSpec, ScriptJobSpecBuilder,
    DEFAULT_SCRIPT_TIMEOUT, JOB_OUTPUT_KEY,
};
pub use lifecycle::{
    activation, deactivation, deprovisioning, provisioning, ScriptJobSettings, TENANT_ID_KEY,
};
pub use registry::{
    EventRegistry, SourceLookup, DEFAULT_APP_PLANE_SOURCE, DEFAULT_BUS_NAME,
    DEFAULT_CONTROL_PLANE_SOURCE,
};
