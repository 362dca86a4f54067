// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised by the entity registry (L4, spec.md §3). Per spec.md §7,
//! a missing referenced entity is a configuration error: fatal at
//! load/reload time, but at steady-state runtime the caller is expected to
//! skip the offending event and log one line rather than propagate a
//! crash.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("host not found: {0}")]
    HostNotFound(String),

    #[error("service not found: {host}/{description}")]
    ServiceNotFound { host: String, description: String },

    #[error("contact not found: {0}")]
    ContactNotFound(String),

    #[error("contact group not found: {0}")]
    ContactGroupNotFound(String),

    #[error("host group not found: {0}")]
    HostGroupNotFound(String),

    #[error("service group not found: {0}")]
    ServiceGroupNotFound(String),

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("connector not found: {0}")]
    ConnectorNotFound(String),

    #[error("timeperiod not found: {0}")]
    TimePeriodNotFound(String),

    #[error("downtime not found: {0}")]
    DowntimeNotFound(u64),

    #[error("comment not found: {0}")]
    CommentNotFound(u64),

    #[error("host already exists: {0}")]
    DuplicateHost(String),

    #[error("service already exists: {host}/{description}")]
    DuplicateService { host: String, description: String },
}
