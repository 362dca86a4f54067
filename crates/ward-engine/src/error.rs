// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised by the state machine, notification engine, and event
//! loop (M2/M3/T, spec.md §4.3-§4.5). Per spec.md §7, a missing
//! registry entity referenced from a live event is logged and the event
//! dropped rather than propagated — `EngineError` exists for the
//! narrower set of failures that genuinely abort the operation in hand
//! (a malformed timeperiod graph, a channel that's gone away).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("registry error: {0}")]
    Registry(#[from] ward_registry::RegistryError),

    #[error("timeperiod evaluation error: {0}")]
    Timeperiod(#[from] ward_time::TimeperiodError),

    #[error("host not found for check result: {0}")]
    UnknownHost(String),

    #[error("service not found for check result: {host}/{description}")]
    UnknownService { host: String, description: String },

    #[error("external command channel closed")]
    CommandChannelClosed,

    #[error("service notification request for {host} carries no service description")]
    MissingServiceDescription { host: String },
}
