// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Per spec.md §4.7: malformed records are logged and ignored rather than
/// aborting the stream, so this error is only ever surfaced by
/// [`crate::parse_line`] for the caller to decide what "ignored" means —
/// [`crate::CommandReader`] itself never returns it, it logs and moves on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("record missing '[' timestamp prefix")]
    MissingTimestampPrefix,

    #[error("record missing closing ']' after timestamp")]
    MissingTimestampSuffix,

    #[error("timestamp is not a valid integer: {0}")]
    BadTimestamp(String),

    #[error("record has no VERB after the timestamp")]
    MissingVerb,

    #[error("unknown verb: {0}")]
    UnknownVerb(String),

    #[error("verb {verb} expected {expected} args, got {got}")]
    WrongArgCount {
        verb: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{field} is not a valid integer: {value}")]
    BadInteger { field: &'static str, value: String },

    #[error("{field} is not 0 or 1: {value}")]
    BadBool { field: &'static str, value: String },
}

/// Errors from applying an already-parsed command to the registry.
/// Per spec.md §7, a reference to a missing entity is logged and the
/// command dropped by the caller, not propagated as a fatal error — this
/// type only exists so `CommandRouter::apply` has something to log.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Registry(#[from] ward_registry::RegistryError),

    #[error(transparent)]
    Engine(#[from] ward_engine::EngineError),
}
