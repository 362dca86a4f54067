// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ward-exec: the check executor and reaper (L2/M1, spec.md §4.2).
//!
//! Two `CommandExecutor` flavors run already macro-expanded command
//! lines: [`RawExecutor`] forks a fresh `sh -c` per check, while
//! [`ConnectorExecutor`] frames requests over a single long-lived child
//! process's pipes. Neither touches the entity registry (L4) — workers
//! only ever produce a `CheckResult` and hand it to the [`Reaper`], which
//! the main loop drains at its own pace.

pub mod connector;
pub mod error;
pub mod raw;
pub mod reaper;

pub use connector::ConnectorExecutor;
pub use error::ExecError;
pub use raw::RawExecutor;
pub use reaper::{CheckTarget, PreparedResult, Reaper};

use std::time::Duration;

use async_trait::async_trait;
use ward_core::CheckResult;

/// A probe runner (spec.md §4.2): given an already macro-expanded
/// command line, produce exactly one `CheckResult`. Never returns an
/// `Err` — every failure mode (spawn error, timeout, connector death) is
/// folded into the result itself so the reaper always has something to
/// deliver.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run_sync(&self, line: &str, timeout: Duration) -> CheckResult;
}
