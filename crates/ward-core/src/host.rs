// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host entity (spec.md §3).

use crate::custom_vars::CustomVars;
use crate::{Acknowledgement, ProblemId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

crate::define_id! {
    /// Stable textual identifier for a host (its unique `name`).
    pub struct HostId;
}

/// Current up/down/unreachable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostState {
    Up,
    Down,
    Unreachable,
}

impl HostState {
    /// Maps a probe exit code to a host state per spec.md §6: 0 -> up,
    /// everything else collapses to down unless the probe distinguishes
    /// unreachable explicitly (via `from_probe_with_topology`).
    pub fn from_exit_code(code: i32) -> Self {
        if code == 0 {
            HostState::Up
        } else {
            HostState::Down
        }
    }

    pub fn is_problem(self) -> bool {
        !matches!(self, HostState::Up)
    }
}

/// Soft vs. hard state, tracked alongside `current_attempt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStateType {
    Soft,
    Hard,
}

/// Which notification reasons a host/service has opted into. Spec.md §3:
/// "set of {up, down, unreachable, flapping-start/stop/disabled,
/// downtime-start/end/cancelled, recovery}".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostNotifyOptions {
    pub down: bool,
    pub unreachable: bool,
    pub recovery: bool,
    pub flapping: bool,
    pub downtime: bool,
}

/// A ring buffer of the last `CHECK_STATS_BUCKETS` (20) results, used for
/// flap-detection weighting (spec.md §4.3 step 5, §9 Open Question 3).
pub const CHECK_STATS_BUCKETS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHistory {
    /// `true` = state differed from the previous check (a "change" bucket).
    buckets: Vec<bool>,
}

impl Default for StateHistory {
    fn default() -> Self {
        Self {
            buckets: Vec::with_capacity(CHECK_STATS_BUCKETS),
        }
    }
}

impl StateHistory {
    pub fn push(&mut self, changed: bool) {
        if self.buckets.len() == CHECK_STATS_BUCKETS {
            self.buckets.remove(0);
        }
        self.buckets.push(changed);
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Oldest-first iteration, matching the order checks were recorded.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.buckets.iter().copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    pub id: HostId,
    pub name: String,
    pub display_name: String,
    pub address: String,
    pub parents: Vec<HostId>,
    pub children: Vec<HostId>,
    pub check_command: CommandRef,
    pub check_interval_min: f64,
    pub retry_interval_min: f64,
    pub max_attempts: u32,
    pub notify_options: HostNotifyOptions,
    pub notification_interval_min: f64,
    pub first_notification_delay_min: f64,
    pub high_flap_threshold: f64,
    pub low_flap_threshold: f64,
    pub flap_detection_enabled: bool,
    pub check_period: String,
    pub notification_period: String,
    pub contacts: Vec<String>,
    pub contact_groups: Vec<String>,
    pub custom_vars: CustomVars,
    pub stalk_on: HashSet<HostState>,

    // runtime state
    pub current_state: HostState,
    pub state_type: HostStateType,
    pub current_attempt: u32,
    pub last_state: Option<HostState>,
    pub last_hard_state: Option<HostState>,
    pub last_hard_state_change: i64,
    pub last_notification: i64,
    pub next_notification: i64,
    pub notification_number: u32,
    pub next_check: i64,
    pub last_check: i64,
    pub plugin_output: String,
    pub long_plugin_output: String,
    pub perfdata: String,
    pub has_been_checked: bool,
    pub acknowledgement: Option<Acknowledgement>,
    pub is_flapping: bool,
    pub percent_state_change: f64,
    pub state_history: StateHistory,
    pub scheduled_downtime_depth: u32,
    pub problem_id: Option<ProblemId>,
    pub last_problem_id: Option<ProblemId>,
    pub checks_enabled: bool,
    pub notifications_enabled: bool,
    pub accept_passive_checks: bool,
}

impl Host {
    pub fn new(id: impl Into<String>, check_command: CommandRef) -> Self {
        let id = HostId::new(id);
        let name = id.as_str().to_string();
        Self {
            display_name: name.clone(),
            id,
            name,
            address: String::new(),
            parents: Vec::new(),
            children: Vec::new(),
            check_command,
            check_interval_min: 5.0,
            retry_interval_min: 1.0,
            max_attempts: 3,
            notify_options: HostNotifyOptions {
                down: true,
                unreachable: true,
                recovery: true,
                flapping: true,
                downtime: true,
            },
            notification_interval_min: 60.0,
            first_notification_delay_min: 0.0,
            high_flap_threshold: 20.0,
            low_flap_threshold: 5.0,
            flap_detection_enabled: true,
            check_period: "24x7".to_string(),
            notification_period: "24x7".to_string(),
            contacts: Vec::new(),
            contact_groups: Vec::new(),
            custom_vars: CustomVars::new(),
            stalk_on: HashSet::new(),
            current_state: HostState::Up,
            state_type: HostStateType::Hard,
            current_attempt: 1,
            last_state: None,
            last_hard_state: None,
            last_hard_state_change: 0,
            last_notification: 0,
            next_notification: 0,
            notification_number: 0,
            next_check: 0,
            last_check: 0,
            plugin_output: String::new(),
            long_plugin_output: String::new(),
            perfdata: String::new(),
            has_been_checked: false,
            acknowledgement: None,
            is_flapping: false,
            percent_state_change: 0.0,
            state_history: StateHistory::default(),
            scheduled_downtime_depth: 0,
            problem_id: None,
            last_problem_id: None,
            checks_enabled: true,
            notifications_enabled: true,
            accept_passive_checks: true,
        }
    }

    pub fn is_in_downtime(&self) -> bool {
        self.scheduled_downtime_depth > 0
    }

    /// Invariant from spec.md §3: `state_type = hard OR current_attempt <
    /// max_attempts`, except during the transition step itself.
    pub fn check_state_invariant(&self) -> bool {
        matches!(self.state_type, HostStateType::Hard) || self.current_attempt < self.max_attempts
    }
}

/// A non-owning reference to a configured command by name, plus any
/// `!arg1!arg2` arguments (parsed by `ward-macros`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRef {
    pub command_name: String,
    pub raw: String,
}

impl CommandRef {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let command_name = raw.split('!').next().unwrap_or(&raw).to_string();
        Self { command_name, raw }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_host_defaults_are_hard_up() {
        let host = Host::new("web1", CommandRef::new("check_ping"));
        assert_eq!(host.current_state, HostState::Up);
        assert_eq!(host.state_type, HostStateType::Hard);
        assert!(host.check_state_invariant());
    }

    #[test]
    fn command_ref_splits_args() {
        let cmd = CommandRef::new("check_ping!100!20%!500!60%");
        assert_eq!(cmd.command_name, "check_ping");
    }

    #[test]
    fn state_history_ring_caps_at_20() {
        let mut hist = StateHistory::default();
        for i in 0..25 {
            hist.push(i % 2 == 0);
        }
        assert_eq!(hist.len(), CHECK_STATS_BUCKETS);
    }
}
