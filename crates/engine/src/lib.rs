// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Tenant Jobs execution engine

mod dispatcher;
mod error;
mod job;
mod registry;

pub use dispatcher::{log_result, Dispatched, Dispatcher};
pub use error::JobError;
pub use job::{JobDeps, JobOutcome, ScriptJob};
pub use registry::JobRegistry;
