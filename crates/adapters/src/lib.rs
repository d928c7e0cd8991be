// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: script execution and event publishing

pub mod execution;
pub mod publish;
pub mod traced;

pub use execution::{
    ExecutionAdapter, ExecutionError, ExecutionOutput, ShellConfig, ShellExecutionAdapter,
};
pub use publish::{ChannelPublisher, EventPublisher, EventReceiver, PublishError};
pub use traced::{TracedExecutionAdapter, TracedPublisher};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use execution::{ExecutionCall, FakeExecutionAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use publish::FakePublisher;
