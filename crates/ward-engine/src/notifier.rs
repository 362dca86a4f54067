// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The notifier state machine (M2, spec.md §4.3): folds a completed check
//! result into a host/service's soft/hard attempt bookkeeping, updates the
//! flap-detection history ring, and decides which notification reasons (if
//! any) the result should hand to M3.
//!
//! The soft/hard algorithm matches spec.md §8 scenario S1 rather than the
//! more terse §4.3 prose: `current_attempt` resets to 1 on the *first*
//! failing check after a hard OK/UP (not incremented from whatever it was
//! before), then increments on each subsequent still-failing check up to
//! `max_attempts`. This is the historical Nagios behavior the concrete
//! scenarios pin down; see DESIGN.md.

use ward_core::host::{HostStateType, CHECK_STATS_BUCKETS};
use ward_core::{
    AckType, CheckResult, HostId, HostState, NotificationReason, ServiceState,
};
use ward_registry::Registry;

use crate::error::EngineError;
use crate::flap::{self, FlapTransition};

/// Failure semantics (spec.md §4.3): a probe that didn't exit cleanly
/// produces a synthetic state rather than participating in the normal
/// exit-code mapping.
pub fn classify_host_state(result: &CheckResult, parent_down: bool) -> HostState {
    match result.exit_code {
        None => HostState::Down,
        Some(code) => {
            let base = HostState::from_exit_code(code);
            if base == HostState::Down && parent_down {
                HostState::Unreachable
            } else {
                base
            }
        }
    }
}

pub fn classify_service_state(result: &CheckResult) -> ServiceState {
    match result.exit_code {
        None => ServiceState::Unknown,
        Some(code) => ServiceState::from_exit_code(code),
    }
}

fn host_state_label(state: HostState) -> &'static str {
    match state {
        HostState::Up => "UP",
        HostState::Down => "DOWN",
        HostState::Unreachable => "UNREACHABLE",
    }
}

fn service_state_label(state: ServiceState) -> &'static str {
    match state {
        ServiceState::Ok => "OK",
        ServiceState::Warning => "WARNING",
        ServiceState::Critical => "CRITICAL",
        ServiceState::Unknown => "UNKNOWN",
    }
}

/// The pure soft/hard decision, state-agnostic: callers pass in only the
/// booleans/equality a transition needs, so the same logic serves both
/// `HostState` and `ServiceState` without a generic parameter.
struct TransitionDecision {
    attempt: u32,
    state_type: HostStateType,
    hard_state_change: bool,
    assign_problem: bool,
    clear_problem: bool,
    reasons: Vec<NotificationReason>,
}

fn decide_transition(
    new_is_problem: bool,
    prev_is_problem: bool,
    same_state_value: bool,
    prev_state_type: HostStateType,
    prev_attempt: u32,
    max_attempts: u32,
) -> TransitionDecision {
    if new_is_problem {
        let attempt = if !prev_is_problem {
            1
        } else {
            (prev_attempt + 1).min(max_attempts)
        };
        let state_type = if attempt >= max_attempts {
            HostStateType::Hard
        } else {
            HostStateType::Soft
        };
        let already_hard_same =
            state_type == HostStateType::Hard && prev_state_type == HostStateType::Hard && same_state_value;
        let hard_state_change = state_type == HostStateType::Hard && !already_hard_same;
        let mut reasons = Vec::new();
        if state_type == HostStateType::Hard {
            reasons.push(NotificationReason::Normal);
        }
        TransitionDecision {
            attempt,
            state_type,
            hard_state_change,
            assign_problem: hard_state_change,
            clear_problem: false,
            reasons,
        }
    } else {
        let recovering = prev_is_problem || prev_state_type == HostStateType::Soft;
        if recovering {
            TransitionDecision {
                attempt: 1,
                state_type: HostStateType::Hard,
                hard_state_change: true,
                assign_problem: false,
                clear_problem: true,
                reasons: vec![NotificationReason::Recovery],
            }
        } else {
            TransitionDecision {
                attempt: prev_attempt,
                state_type: prev_state_type,
                hard_state_change: false,
                assign_problem: false,
                clear_problem: false,
                reasons: Vec::new(),
            }
        }
    }
}

/// What happened when a check result was folded into a host/service,
/// handed onward to the event loop (which forwards `notification_reasons`
/// to M3 and `recheck_children` as fresh check events).
#[derive(Debug, Default)]
pub struct UpdateOutcome {
    pub notification_reasons: Vec<NotificationReason>,
    pub log_lines: Vec<String>,
    pub state_changed: bool,
    pub hard_state_change: bool,
    pub recheck_children: Vec<HostId>,
    pub is_flapping: bool,
}

pub fn process_host_result(
    registry: &mut Registry,
    host_name: &str,
    result: CheckResult,
    now: i64,
    parent_down: bool,
) -> Result<UpdateOutcome, EngineError> {
    let new_state = classify_host_state(&result, parent_down);

    let (prev_state, prev_state_type, prev_attempt, max_attempts, prev_output, is_flapping, low, high, flap_enabled, mut history, children, stalk_now, prev_problem_id) = {
        let host = registry.require_host(host_name)?;
        (
            host.current_state,
            host.state_type,
            host.current_attempt,
            host.max_attempts,
            host.plugin_output.clone(),
            host.is_flapping,
            host.low_flap_threshold,
            host.high_flap_threshold,
            host.flap_detection_enabled,
            host.state_history.clone(),
            host.children.clone(),
            host.stalk_on.contains(&new_state),
            host.problem_id,
        )
    };

    let changed = prev_state != new_state;
    history.push(changed);
    debug_assert!(history.len() <= CHECK_STATS_BUCKETS);

    let decision = decide_transition(
        new_state.is_problem(),
        prev_state.is_problem(),
        prev_state == new_state,
        prev_state_type,
        prev_attempt,
        max_attempts,
    );

    let new_problem_id = if decision.assign_problem {
        Some(registry.next_problem_id())
    } else {
        None
    };

    let (pct, flap_transition) = if flap_enabled {
        flap::evaluate(&history, is_flapping, low, high)
    } else {
        (0.0, FlapTransition::None)
    };

    let mut reasons = decision.reasons;
    let mut log_lines = Vec::new();

    let host = registry.require_host_mut(host_name)?;
    host.last_state = Some(prev_state);
    host.current_state = new_state;
    host.state_type = decision.state_type;
    host.current_attempt = decision.attempt;
    host.plugin_output = result.plugin_output;
    host.long_plugin_output = result.long_plugin_output;
    host.perfdata = result.perfdata;
    host.last_check = result.finish_time;
    host.has_been_checked = true;
    host.state_history = history;

    if decision.hard_state_change {
        host.last_hard_state_change = now;
    }
    if decision.state_type == HostStateType::Hard {
        host.last_hard_state = Some(new_state);
    }
    if decision.assign_problem {
        host.problem_id = new_problem_id;
    }
    if decision.clear_problem {
        host.last_problem_id = host.problem_id.or(prev_problem_id);
        host.problem_id = None;
        // `notification_number` is left untouched here: M3 still needs the
        // pre-recovery count to match escalations for the recovery
        // notification itself, and resets it once that notification has
        // actually been dispatched (spec.md §8 P4, see `ward-engine::notify`).
    }

    if reasons.contains(&NotificationReason::Recovery) {
        host.acknowledgement = None;
    } else if changed && new_state.is_problem() {
        if matches!(&host.acknowledgement, Some(ack) if ack.ack_type == AckType::Normal) {
            host.acknowledgement = None;
        }
    }

    if flap_enabled {
        host.percent_state_change = pct;
        match flap_transition {
            FlapTransition::Started => {
                host.is_flapping = true;
                reasons.push(NotificationReason::FlappingStart);
                log_lines.push(format!(
                    "HOST FLAPPING ALERT: {};STARTED;{pct:.1};{low:.1};{high:.1}",
                    host.name
                ));
            }
            FlapTransition::Stopped => {
                host.is_flapping = false;
                reasons.push(NotificationReason::FlappingStop);
                log_lines.push(format!(
                    "HOST FLAPPING ALERT: {};STOPPED;{pct:.1};{low:.1};{high:.1}",
                    host.name
                ));
            }
            FlapTransition::None => {}
        }
    }

    let alert_signature_changed =
        changed || decision.attempt != prev_attempt || decision.state_type != prev_state_type;
    if alert_signature_changed {
        log_lines.push(format!(
            "HOST ALERT: {};{};{};{};{}",
            host.name,
            host_state_label(new_state),
            if decision.state_type == HostStateType::Hard { "HARD" } else { "SOFT" },
            host.current_attempt,
            host.plugin_output
        ));
    }

    if stalk_now && !changed && prev_output != host.plugin_output {
        log_lines.push(format!(
            "HOST STALKING ALERT: {};{};{}",
            host.name,
            host_state_label(new_state),
            host.plugin_output
        ));
    }

    let recheck_children = if decision.hard_state_change && new_state != HostState::Up {
        children
    } else {
        Vec::new()
    };
    let is_flapping = host.is_flapping;

    Ok(UpdateOutcome {
        notification_reasons: reasons,
        log_lines,
        state_changed: changed,
        hard_state_change: decision.hard_state_change,
        recheck_children,
        is_flapping,
    })
}

pub fn process_service_result(
    registry: &mut Registry,
    host_name: &str,
    description: &str,
    result: CheckResult,
    now: i64,
) -> Result<UpdateOutcome, EngineError> {
    let new_state = classify_service_state(&result);

    let (prev_state, prev_state_type, prev_attempt, max_attempts, prev_output, is_flapping, low, high, flap_enabled, mut history, stalk_now, prev_problem_id) = {
        let svc = registry.require_service(host_name, description)?;
        (
            svc.current_state,
            svc.state_type,
            svc.current_attempt,
            svc.max_attempts,
            svc.plugin_output.clone(),
            svc.is_flapping,
            svc.low_flap_threshold,
            svc.high_flap_threshold,
            svc.flap_detection_enabled,
            svc.state_history.clone(),
            svc.stalk_on.contains(&new_state),
            svc.problem_id,
        )
    };

    let changed = prev_state != new_state;
    history.push(changed);

    let decision = decide_transition(
        new_state.is_problem(),
        prev_state.is_problem(),
        prev_state == new_state,
        prev_state_type,
        prev_attempt,
        max_attempts,
    );

    let new_problem_id = if decision.assign_problem {
        Some(registry.next_problem_id())
    } else {
        None
    };

    let (pct, flap_transition) = if flap_enabled {
        flap::evaluate(&history, is_flapping, low, high)
    } else {
        (0.0, FlapTransition::None)
    };

    let mut reasons = decision.reasons;
    let mut log_lines = Vec::new();

    let svc = registry.require_service_mut(host_name, description)?;
    svc.last_state = Some(prev_state);
    svc.current_state = new_state;
    svc.state_type = decision.state_type;
    svc.current_attempt = decision.attempt;
    svc.plugin_output = result.plugin_output;
    svc.long_plugin_output = result.long_plugin_output;
    svc.perfdata = result.perfdata;
    svc.last_check = result.finish_time;
    svc.has_been_checked = true;
    svc.state_history = history;

    if decision.hard_state_change {
        svc.last_hard_state_change = now;
    }
    if decision.state_type == HostStateType::Hard {
        svc.last_hard_state = Some(new_state);
    }
    if decision.assign_problem {
        svc.problem_id = new_problem_id;
    }
    if decision.clear_problem {
        svc.last_problem_id = svc.problem_id.or(prev_problem_id);
        svc.problem_id = None;
        // See the equivalent comment in `process_host_result`: the reset
        // happens in `ward-engine::notify` once the recovery notification
        // has actually gone out, not here.
    }

    if reasons.contains(&NotificationReason::Recovery) {
        svc.acknowledgement = None;
    } else if changed && new_state.is_problem() {
        if matches!(&svc.acknowledgement, Some(ack) if ack.ack_type == AckType::Normal) {
            svc.acknowledgement = None;
        }
    }

    if flap_enabled {
        svc.percent_state_change = pct;
        match flap_transition {
            FlapTransition::Started => {
                svc.is_flapping = true;
                reasons.push(NotificationReason::FlappingStart);
                log_lines.push(format!(
                    "SERVICE FLAPPING ALERT: {};{};STARTED;{pct:.1};{low:.1};{high:.1}",
                    host_name, svc.description
                ));
            }
            FlapTransition::Stopped => {
                svc.is_flapping = false;
                reasons.push(NotificationReason::FlappingStop);
                log_lines.push(format!(
                    "SERVICE FLAPPING ALERT: {};{};STOPPED;{pct:.1};{low:.1};{high:.1}",
                    host_name, svc.description
                ));
            }
            FlapTransition::None => {}
        }
    }

    let alert_signature_changed =
        changed || decision.attempt != prev_attempt || decision.state_type != prev_state_type;
    if alert_signature_changed {
        log_lines.push(format!(
            "SERVICE ALERT: {};{};{};{};{};{}",
            host_name,
            svc.description,
            service_state_label(new_state),
            if decision.state_type == HostStateType::Hard { "HARD" } else { "SOFT" },
            svc.current_attempt,
            svc.plugin_output
        ));
    }

    if stalk_now && !changed && prev_output != svc.plugin_output {
        log_lines.push(format!(
            "SERVICE STALKING ALERT: {};{};{};{}",
            host_name,
            svc.description,
            service_state_label(new_state),
            svc.plugin_output
        ));
    }
    let is_flapping = svc.is_flapping;

    Ok(UpdateOutcome {
        notification_reasons: reasons,
        log_lines,
        state_changed: changed,
        hard_state_change: decision.hard_state_change,
        recheck_children: Vec::new(),
        is_flapping,
    })
}

/// `ACKNOWLEDGE_HOST_PROBLEM` (spec.md §4.4/§4.7). Only meaningful while
/// the host is in a problem state; acking an already-OK host is a no-op.
pub fn acknowledge_host(
    registry: &mut Registry,
    host_name: &str,
    ack_type: AckType,
    author: impl Into<String>,
    comment: impl Into<String>,
    now: i64,
) -> Result<bool, EngineError> {
    let host = registry.require_host_mut(host_name)?;
    if !host.current_state.is_problem() {
        return Ok(false);
    }
    host.acknowledgement = Some(ward_core::Acknowledgement {
        ack_type,
        author: author.into(),
        comment: comment.into(),
        entry_time: now,
    });
    Ok(true)
}

pub fn acknowledge_service(
    registry: &mut Registry,
    host_name: &str,
    description: &str,
    ack_type: AckType,
    author: impl Into<String>,
    comment: impl Into<String>,
    now: i64,
) -> Result<bool, EngineError> {
    let svc = registry.require_service_mut(host_name, description)?;
    if !svc.current_state.is_problem() {
        return Ok(false);
    }
    svc.acknowledgement = Some(ward_core::Acknowledgement {
        ack_type,
        author: author.into(),
        comment: comment.into(),
        entry_time: now,
    });
    Ok(true)
}

/// `REMOVE_HOST_ACKNOWLEDGEMENT` / `REMOVE_SVC_ACKNOWLEDGEMENT`.
pub fn remove_host_acknowledgement(registry: &mut Registry, host_name: &str) -> Result<(), EngineError> {
    registry.require_host_mut(host_name)?.acknowledgement = None;
    Ok(())
}

pub fn remove_service_acknowledgement(
    registry: &mut Registry,
    host_name: &str,
    description: &str,
) -> Result<(), EngineError> {
    registry.require_service_mut(host_name, description)?.acknowledgement = None;
    Ok(())
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
