// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The outcome of running a check, and the problem-id correlating a
//! host/service's consecutive hard-state problem occurrences (spec.md §3,
//! §4.2/§4.3).

use serde::{Deserialize, Serialize};

crate::define_numeric_id! {
    /// Correlates every check/notification belonging to the same hard-state
    /// problem occurrence, assigned when a host/service first goes hard-bad
    /// and cleared on recovery (spec.md §3).
    pub struct ProblemId;
}

/// Whether a check result came from the active checker or was injected via
/// `PROCESS_{HOST,SERVICE}_CHECK_RESULT` (spec.md §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckSource {
    Active,
    Passive,
}

/// Raw output of a single check execution, before it is folded into the
/// host/service state machine (spec.md §4.2/§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub source: CheckSource,
    pub exit_code: Option<i32>,
    pub plugin_output: String,
    pub long_plugin_output: String,
    pub perfdata: String,
    pub start_time: i64,
    pub finish_time: i64,
    pub early_timeout: bool,
}

impl CheckResult {
    pub fn timed_out(source: CheckSource, start_time: i64, finish_time: i64) -> Self {
        Self {
            source,
            exit_code: None,
            plugin_output: "(Service check timed out)".to_string(),
            long_plugin_output: String::new(),
            perfdata: String::new(),
            start_time,
            finish_time,
            early_timeout: true,
        }
    }

    pub fn latency_sec(&self) -> i64 {
        (self.finish_time - self.start_time).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_out_result_has_no_exit_code() {
        let res = CheckResult::timed_out(CheckSource::Active, 100, 160);
        assert!(res.exit_code.is_none());
        assert!(res.early_timeout);
        assert_eq!(res.latency_sec(), 60);
    }
}
