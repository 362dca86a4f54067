// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service entity and the anomaly-detection subtype (spec.md §3).

use crate::custom_vars::CustomVars;
use crate::host::{CommandRef, HostStateType, StateHistory};
use crate::{Acknowledgement, HostId, ProblemId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

crate::define_id! {
    /// Stable textual identifier for a service (scoped to its host).
    pub struct ServiceId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl ServiceState {
    /// spec.md §6: 0 -> ok, 1 -> warning, 2 -> critical, 3 -> unknown,
    /// anything else -> unknown with a synthetic message.
    pub fn from_exit_code(code: i32) -> Self {
        match code {
            0 => ServiceState::Ok,
            1 => ServiceState::Warning,
            2 => ServiceState::Critical,
            _ => ServiceState::Unknown,
        }
    }

    pub fn is_problem(self) -> bool {
        !matches!(self, ServiceState::Ok)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceNotifyOptions {
    pub warning: bool,
    pub critical: bool,
    pub unknown: bool,
    pub recovery: bool,
    pub flapping: bool,
    pub downtime: bool,
}

/// A single `(timestamp -> lower, upper, fit)` point of the piecewise-linear
/// prediction curve (spec.md §3/§6 thresholds file).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictPoint {
    pub timestamp: i64,
    pub lower: f64,
    pub upper: f64,
    pub fit: f64,
}

/// The anomaly-detection subtype's threshold curve, loaded from the
/// thresholds JSON file (spec.md §6). Interpolation is piecewise linear; a
/// timestamp outside the curve extrapolates from the nearest segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyThresholds {
    pub metric_name: String,
    pub predict: Vec<PredictPoint>,
}

impl AnomalyThresholds {
    /// Interpolates `(lower, upper)` at `t`, per spec.md §6.
    pub fn interpolate(&self, t: i64) -> Option<(f64, f64)> {
        if self.predict.is_empty() {
            return None;
        }
        let mut sorted = self.predict.clone();
        sorted.sort_by_key(|p| p.timestamp);

        if t <= sorted[0].timestamp {
            return extrapolate_segment(&sorted, 0, 1, t);
        }
        if t >= sorted[sorted.len() - 1].timestamp {
            let n = sorted.len();
            return extrapolate_segment(&sorted, n.saturating_sub(2), n - 1, t);
        }
        for w in sorted.windows(2) {
            let (a, b) = (&w[0], &w[1]);
            if t >= a.timestamp && t <= b.timestamp {
                return Some(lerp_pair(a, b, t));
            }
        }
        None
    }

    /// Decides the dependent service's state by comparing `value` against
    /// the interpolated thresholds at `t`.
    pub fn classify(&self, t: i64, value: f64) -> Option<ServiceState> {
        let (lower, upper) = self.interpolate(t)?;
        if value < lower || value > upper {
            Some(ServiceState::Critical)
        } else {
            Some(ServiceState::Ok)
        }
    }
}

fn lerp_pair(a: &PredictPoint, b: &PredictPoint, t: i64) -> (f64, f64) {
    if b.timestamp == a.timestamp {
        return (a.lower, a.upper);
    }
    let frac = (t - a.timestamp) as f64 / (b.timestamp - a.timestamp) as f64;
    (
        a.lower + frac * (b.lower - a.lower),
        a.upper + frac * (b.upper - a.upper),
    )
}

fn extrapolate_segment(
    points: &[PredictPoint],
    i: usize,
    j: usize,
    t: i64,
) -> Option<(f64, f64)> {
    if points.len() == 1 {
        let p = &points[0];
        return Some((p.lower, p.upper));
    }
    let (a, b) = (points.get(i)?, points.get(j)?);
    Some(lerp_pair(a, b, t))
}

/// Extra fields present only on anomaly-detection services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyDetectionConfig {
    pub metric_name: String,
    pub thresholds_file: PathBuf,
    pub status_change: bool,
    pub dependent_service: Option<ServiceId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub host_id: HostId,
    pub description: String,
    pub display_name: String,
    pub check_command: CommandRef,
    pub check_interval_min: f64,
    pub retry_interval_min: f64,
    pub max_attempts: u32,
    pub notify_options: ServiceNotifyOptions,
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
    pub stalk_on: HashSet<ServiceState>,
    pub dependent_services: Vec<ServiceId>,
    pub anomaly_detection: Option<AnomalyDetectionConfig>,

    // runtime state
    pub current_state: ServiceState,
    pub state_type: HostStateType,
    pub current_attempt: u32,
    pub last_state: Option<ServiceState>,
    pub last_hard_state: Option<ServiceState>,
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

impl Service {
    pub fn new(
        host_id: HostId,
        description: impl Into<String>,
        check_command: CommandRef,
    ) -> Self {
        let description = description.into();
        let id = ServiceId::new(format!("{}/{}", host_id, description));
        Self {
            id,
            host_id,
            display_name: description.clone(),
            description,
            check_command,
            check_interval_min: 5.0,
            retry_interval_min: 1.0,
            max_attempts: 3,
            notify_options: ServiceNotifyOptions {
                warning: true,
                critical: true,
                unknown: true,
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
            dependent_services: Vec::new(),
            anomaly_detection: None,
            current_state: ServiceState::Ok,
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

    pub fn check_state_invariant(&self) -> bool {
        matches!(self.state_type, HostStateType::Hard) || self.current_attempt < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_maps_to_state() {
        assert_eq!(ServiceState::from_exit_code(0), ServiceState::Ok);
        assert_eq!(ServiceState::from_exit_code(1), ServiceState::Warning);
        assert_eq!(ServiceState::from_exit_code(2), ServiceState::Critical);
        assert_eq!(ServiceState::from_exit_code(7), ServiceState::Unknown);
    }

    fn curve() -> AnomalyThresholds {
        AnomalyThresholds {
            metric_name: "latency_ms".to_string(),
            predict: vec![
                PredictPoint {
                    timestamp: 0,
                    lower: 10.0,
                    upper: 20.0,
                    fit: 15.0,
                },
                PredictPoint {
                    timestamp: 100,
                    lower: 20.0,
                    upper: 40.0,
                    fit: 30.0,
                },
            ],
        }
    }

    #[test]
    fn interpolation_is_linear_mid_segment() {
        let c = curve();
        let (lower, upper) = c.interpolate(50).unwrap();
        assert!((lower - 15.0).abs() < 1e-9);
        assert!((upper - 30.0).abs() < 1e-9);
    }

    #[test]
    fn extrapolates_before_and_after_curve() {
        let c = curve();
        let (lower_before, _) = c.interpolate(-50).unwrap();
        assert!(lower_before < 10.0);
        let (_, upper_after) = c.interpolate(150).unwrap();
        assert!(upper_after > 40.0);
    }

    #[test]
    fn classify_flags_out_of_band_value() {
        let c = curve();
        assert_eq!(c.classify(0, 15.0), Some(ServiceState::Ok));
        assert_eq!(c.classify(0, 99.0), Some(ServiceState::Critical));
    }
}
