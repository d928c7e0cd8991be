// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script job definitions
//!
//! Everything here is pure: specs, environment construction, output
//! extraction and the per-invocation state machine. The engine crate
//! supplies the I/O.

mod output;
mod spec;
mod state;
mod vars;

pub use output::{extract_outputs, parse_output};
pub use spec::{
    ConfigError, OutgoingEvents, ScriptJobSpec, ScriptJobSpecBuilder, DEFAULT_SCRIPT_TIMEOUT,
    JOB_OUTPUT_KEY,
};
pub use state::{Completion, JobSignal, JobState};
pub use vars::{build_environment, identifier_value, Environment, MappingError};
