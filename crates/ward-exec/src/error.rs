// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors internal to connector management (L2, spec.md §4.2). Per
//! spec.md §7, probe failures themselves are never an `Err` — they are
//! folded into a `CheckResult` with `exit_code: None` so the reaper
//! always has exactly one outcome to deliver. `ExecError` only covers the
//! connector child process's own lifecycle.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn connector process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("connector stdin/stdout pipe unavailable")]
    NoPipe,

    #[error("connector write failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("connector read failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("connector framing error: {0}")]
    Framing(String),

    #[error("connector process exited")]
    Died,
}
