// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ward-core: shared data model for the monitoring scheduler core.
//!
//! Owns the entity shapes (host, service, contact, timeperiod, command,
//! downtime, comment, ...) and the clock/id abstractions every other crate
//! builds on. This crate defines *shapes*, not behavior: the timeperiod
//! evaluator lives in `ward-time`, the notifier state machine and
//! notification engine live in `ward-engine`.

pub mod clock;
pub mod command;
pub mod comment;
pub mod contact;
pub mod custom_vars;
pub mod dependency;
pub mod downtime;
pub mod escalation;
pub mod event;
pub mod group;
pub mod host;
pub mod id;
pub mod result;
pub mod service;
pub mod timeperiod;

pub use clock::{Clock, FakeClock, SystemClock};
pub use command::{Command, CommandId, Connector, ConnectorId};
pub use comment::{Comment, CommentId, CommentSource, EntryType};
pub use contact::{Contact, ContactGroup, ContactGroupId, ContactId};
pub use custom_vars::CustomVars;
pub use dependency::{Dependency, DependencyKind, FailureOptions};
pub use downtime::{Downtime, DowntimeId, DowntimeStatus};
pub use escalation::Escalation;
pub use event::{Event, EventKind, EventPayload, PriorityLane};
pub use group::{HostGroup, HostGroupId, ServiceGroup, ServiceGroupId};
pub use host::{Host, HostId, HostState, HostStateType};
pub use id::{IdGen, SequentialIdGen, ShortId, UuidIdGen};
pub use result::{CheckResult, CheckSource, ProblemId};
pub use service::{AnomalyThresholds, Service, ServiceId, ServiceState};
pub use timeperiod::{DateRange, DateRangeKind, TimePeriod, TimeRange};

/// Reason a notification is being evaluated — the trigger passed into the
/// notification decision engine (M3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationReason {
    Normal,
    Recovery,
    Acknowledgement,
    FlappingStart,
    FlappingStop,
    FlappingDisabled,
    DowntimeStart,
    DowntimeEnd,
    DowntimeCancelled,
    Custom,
}

impl NotificationReason {
    /// Reasons that bypass downtime/flapping/soft-state suppression.
    pub fn always_allowed_in_downtime(self) -> bool {
        matches!(
            self,
            NotificationReason::DowntimeStart
                | NotificationReason::DowntimeEnd
                | NotificationReason::DowntimeCancelled
                | NotificationReason::Acknowledgement
        )
    }

    pub fn is_downtime_lifecycle(self) -> bool {
        matches!(
            self,
            NotificationReason::DowntimeStart
                | NotificationReason::DowntimeEnd
                | NotificationReason::DowntimeCancelled
        )
    }
}

/// Sticky vs. normal acknowledgement, per spec.md §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckType {
    Normal,
    Sticky,
}

/// An active problem acknowledgement on a host or service.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Acknowledgement {
    pub ack_type: AckType,
    pub author: String,
    pub comment: String,
    pub entry_time: i64,
}
