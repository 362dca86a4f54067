// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type for timeperiod evaluation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimeperiodError {
    #[error("exclusion graph cycle detected starting at {0}")]
    ExclusionCycle(String),
    #[error("referenced timeperiod not found: {0}")]
    NotFound(String),
    #[error("no valid time found within the search horizon")]
    HorizonExceeded,
}
