// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Runbook parsing and definition

mod job;
mod parser;
mod settings;
mod template;

pub use job::{JobDef, Lifecycle};
pub use parser::{load_runbooks, parse_runbook, ParseError, Runbook};
pub use settings::{BusDef, ExecutorDef};
pub use template::{expand_env, expand_with};
