// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduled downtime entity and its lifecycle (spec.md §3/§4.4 downtime
//! suppression and start/end/cancel notifications).

use serde::{Deserialize, Serialize};

crate::define_numeric_id! {
    pub struct DowntimeId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DowntimeStatus {
    /// Scheduled but `start_time` hasn't arrived yet.
    Pending,
    /// Between `start_time` and `end_time`, actively suppressing.
    InEffect,
    /// Past `end_time`, or cancelled before expiry.
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Downtime {
    pub id: DowntimeId,
    pub host_name: String,
    pub service_description: Option<String>,
    pub author: String,
    pub comment: String,
    pub entry_time: i64,
    pub start_time: i64,
    pub end_time: i64,
    /// Fixed downtime covers exactly `[start_time, end_time]`. Flexible
    /// downtime starts when a problem is actually detected within that
    /// window and runs for `duration_sec` from that point.
    pub fixed: bool,
    pub duration_sec: i64,
    pub triggered_by: Option<DowntimeId>,
    pub status: DowntimeStatus,
    /// Set once a flexible downtime has actually started.
    pub actual_start_time: Option<i64>,
}

impl Downtime {
    pub fn new(
        id: DowntimeId,
        host_name: impl Into<String>,
        start_time: i64,
        end_time: i64,
        fixed: bool,
        duration_sec: i64,
    ) -> Self {
        Self {
            id,
            host_name: host_name.into(),
            service_description: None,
            author: String::new(),
            comment: String::new(),
            entry_time: start_time,
            start_time,
            end_time,
            fixed,
            duration_sec,
            triggered_by: None,
            status: DowntimeStatus::Pending,
            actual_start_time: None,
        }
    }

    /// Whether this downtime is actively suppressing at `now`, per
    /// spec.md §4.4: fixed downtime is active within its window; flexible
    /// downtime only becomes active once triggered, then runs for
    /// `duration_sec`.
    pub fn is_active_at(&self, now: i64) -> bool {
        match self.status {
            DowntimeStatus::Cancelled | DowntimeStatus::Expired => false,
            _ => {
                if self.fixed {
                    now >= self.start_time && now <= self.end_time
                } else {
                    match self.actual_start_time {
                        Some(actual) => now >= actual && now <= actual + self.duration_sec,
                        None => false,
                    }
                }
            }
        }
    }

    pub fn trigger_flexible(&mut self, now: i64) {
        if !self.fixed && self.actual_start_time.is_none() {
            self.actual_start_time = Some(now);
            self.status = DowntimeStatus::InEffect;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_downtime_is_active_within_its_window() {
        let dt = Downtime::new(DowntimeId::new(1), "web1", 1000, 2000, true, 0);
        assert!(dt.is_active_at(1500));
        assert!(!dt.is_active_at(2500));
    }

    #[test]
    fn flexible_downtime_requires_trigger() {
        let mut dt = Downtime::new(DowntimeId::new(2), "web1", 1000, 5000, false, 600);
        assert!(!dt.is_active_at(1200));
        dt.trigger_flexible(1200);
        assert!(dt.is_active_at(1200));
        assert!(dt.is_active_at(1799));
        assert!(!dt.is_active_at(1801));
    }
}
