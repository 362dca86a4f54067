// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the event loop (T, spec.md §4.5). Per spec.md §7,
//! the loop itself logs-and-drops a missing-entity error for a single
//! event rather than propagating it; `DaemonError` exists for startup
//! (config/seed loading) and the handful of operations that still need a
//! `Result` to bubble out of `main`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Registry(#[from] ward_registry::RegistryError),

    #[error(transparent)]
    Engine(#[from] ward_engine::EngineError),

    #[error(transparent)]
    Apply(#[from] ward_router::ApplyError),

    #[error(transparent)]
    Timeperiod(#[from] ward_time::TimeperiodError),

    #[error(transparent)]
    Seed(#[from] ward_registry::SeedError),

    #[error(transparent)]
    Macro(#[from] ward_macros::MacroError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
