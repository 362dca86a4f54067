// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event-loop's event type (T, spec.md §4.5) — what actually flows
//! through the priority queue L5 describes. Distinct from a host/service
//! *state* transition: these are the scheduler's own wakeups (a check is
//! due, a result was reaped, a notification should fire, ...).

use crate::host::HostId;
use crate::result::{CheckResult, ProblemId};
use crate::service::ServiceId;
use crate::NotificationReason;
use serde::{Deserialize, Serialize};

/// spec.md §4.5: events run on one of two lanes; within a lane, ties break
/// on insertion sequence (FIFO).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLane {
    High,
    Low,
}

/// Event-specific payload, split out from `Event` so the queue entry
/// (timestamp, lane, sequence) stays uniform regardless of what it
/// carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventPayload {
    #[serde(rename = "host_check")]
    HostCheck { host_id: HostId },

    #[serde(rename = "service_check")]
    ServiceCheck { service_id: ServiceId },

    #[serde(rename = "host_check_reaped")]
    HostCheckReaped {
        host_id: HostId,
        result: CheckResult,
    },

    #[serde(rename = "service_check_reaped")]
    ServiceCheckReaped {
        service_id: ServiceId,
        result: CheckResult,
    },

    #[serde(rename = "host_notification")]
    HostNotification {
        host_id: HostId,
        reason: NotificationReason,
        problem_id: Option<ProblemId>,
    },

    #[serde(rename = "service_notification")]
    ServiceNotification {
        service_id: ServiceId,
        reason: NotificationReason,
        problem_id: Option<ProblemId>,
    },

    #[serde(rename = "downtime_start")]
    DowntimeStart { downtime_id: u64 },

    #[serde(rename = "downtime_end")]
    DowntimeEnd { downtime_id: u64 },

    #[serde(rename = "external_command")]
    ExternalCommand { raw: String, submitted_at: i64 },

    #[serde(rename = "orphan_check_sweep")]
    OrphanCheckSweep,

    #[serde(rename = "status_save")]
    StatusSave,

    #[serde(rename = "reload_config")]
    ReloadConfig,

    #[serde(rename = "program_shutdown")]
    ProgramShutdown,
}

impl EventPayload {
    pub fn name(&self) -> &'static str {
        match self {
            EventPayload::HostCheck { .. } => "host_check",
            EventPayload::ServiceCheck { .. } => "service_check",
            EventPayload::HostCheckReaped { .. } => "host_check_reaped",
            EventPayload::ServiceCheckReaped { .. } => "service_check_reaped",
            EventPayload::HostNotification { .. } => "host_notification",
            EventPayload::ServiceNotification { .. } => "service_notification",
            EventPayload::DowntimeStart { .. } => "downtime_start",
            EventPayload::DowntimeEnd { .. } => "downtime_end",
            EventPayload::ExternalCommand { .. } => "external_command",
            EventPayload::OrphanCheckSweep => "orphan_check_sweep",
            EventPayload::StatusSave => "status_save",
            EventPayload::ReloadConfig => "reload_config",
            EventPayload::ProgramShutdown => "program_shutdown",
        }
    }
}

/// Discriminant used for queue bookkeeping (counting pending events by
/// kind, deduping rescheduled checks) without cloning the full payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    HostCheck,
    ServiceCheck,
    HostCheckReaped,
    ServiceCheckReaped,
    HostNotification,
    ServiceNotification,
    DowntimeStart,
    DowntimeEnd,
    ExternalCommand,
    OrphanCheckSweep,
    StatusSave,
    ReloadConfig,
    ProgramShutdown,
}

impl From<&EventPayload> for EventKind {
    fn from(payload: &EventPayload) -> Self {
        match payload {
            EventPayload::HostCheck { .. } => EventKind::HostCheck,
            EventPayload::ServiceCheck { .. } => EventKind::ServiceCheck,
            EventPayload::HostCheckReaped { .. } => EventKind::HostCheckReaped,
            EventPayload::ServiceCheckReaped { .. } => EventKind::ServiceCheckReaped,
            EventPayload::HostNotification { .. } => EventKind::HostNotification,
            EventPayload::ServiceNotification { .. } => EventKind::ServiceNotification,
            EventPayload::DowntimeStart { .. } => EventKind::DowntimeStart,
            EventPayload::DowntimeEnd { .. } => EventKind::DowntimeEnd,
            EventPayload::ExternalCommand { .. } => EventKind::ExternalCommand,
            EventPayload::OrphanCheckSweep => EventKind::OrphanCheckSweep,
            EventPayload::StatusSave => EventKind::StatusSave,
            EventPayload::ReloadConfig => EventKind::ReloadConfig,
            EventPayload::ProgramShutdown => EventKind::ProgramShutdown,
        }
    }
}

/// A scheduled event-loop entry: due at `run_at`, ordered within its lane
/// by insertion `sequence` (spec.md §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub run_at: i64,
    pub lane: PriorityLane,
    pub sequence: u64,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(run_at: i64, lane: PriorityLane, sequence: u64, payload: EventPayload) -> Self {
        Self {
            run_at,
            lane,
            sequence,
            payload,
        }
    }

    pub fn kind(&self) -> EventKind {
        EventKind::from(&self.payload)
    }

    pub fn log_summary(&self) -> String {
        format!(
            "{} run_at={} lane={:?} seq={}",
            self.payload.name(),
            self.run_at,
            self.lane,
            self.sequence
        )
    }
}

/// Ordering for the binary-heap-backed priority queue in `ward-engine`:
/// earlier `run_at` first, then `High` lane before `Low`, then lower
/// `sequence` first (FIFO within a tie). `std::cmp::Reverse` is applied by
/// the queue itself since `BinaryHeap` is a max-heap.
impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.run_at
            .cmp(&other.run_at)
            .then_with(|| self.lane.cmp(&other.lane))
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_order_by_run_at_then_lane_then_sequence() {
        let a = Event::new(100, PriorityLane::Low, 1, EventPayload::OrphanCheckSweep);
        let b = Event::new(100, PriorityLane::High, 2, EventPayload::OrphanCheckSweep);
        let c = Event::new(50, PriorityLane::Low, 0, EventPayload::OrphanCheckSweep);
        assert!(c < a);
        assert!(b < a);
    }

    #[test]
    fn kind_matches_payload_discriminant() {
        let ev = Event::new(
            0,
            PriorityLane::High,
            0,
            EventPayload::HostCheck {
                host_id: HostId::new("web1"),
            },
        );
        assert_eq!(ev.kind(), EventKind::HostCheck);
    }
}
