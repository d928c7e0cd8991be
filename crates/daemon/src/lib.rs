// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tenant Jobs daemon library: lifecycle, wire protocol and socket server
//! shared by `tjd` and the `tj` client.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod lifecycle;
pub mod protocol;
pub mod server;

pub use lifecycle::{
    project_hash, startup, Config, DaemonState, LifecycleError, STARTUP_MARKER_PREFIX,
};
pub use protocol::{Request, Response, PROTOCOL_VERSION};
pub use server::serve;
