// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification escalation entity (spec.md §3/§4.4 step on escalation
//! contact substitution).

use serde::{Deserialize, Serialize};

/// Escalates notifications for a host or (host, service) pair once the
/// notification number falls within `[first_notification, last_notification]`
/// (`last_notification == 0` means "no upper bound").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Escalation {
    pub host_name: String,
    pub service_description: Option<String>,
    pub first_notification: u32,
    pub last_notification: u32,
    pub notification_interval_min: f64,
    pub escalation_period: Option<String>,
    pub contacts: Vec<String>,
    pub contact_groups: Vec<String>,
}

impl Escalation {
    pub fn new(host_name: impl Into<String>, first_notification: u32, last_notification: u32) -> Self {
        Self {
            host_name: host_name.into(),
            service_description: None,
            first_notification,
            last_notification,
            notification_interval_min: 0.0,
            escalation_period: None,
            contacts: Vec::new(),
            contact_groups: Vec::new(),
        }
    }

    /// Whether `notification_number` falls within this escalation's range.
    pub fn applies_to(&self, notification_number: u32) -> bool {
        notification_number >= self.first_notification
            && (self.last_notification == 0 || notification_number <= self.last_notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_escalation_applies_past_last() {
        let esc = Escalation::new("web1", 3, 0);
        assert!(!esc.applies_to(2));
        assert!(esc.applies_to(3));
        assert!(esc.applies_to(100));
    }

    #[test]
    fn bounded_escalation_has_an_upper_edge() {
        let esc = Escalation::new("web1", 2, 4);
        assert!(!esc.applies_to(1));
        assert!(esc.applies_to(3));
        assert!(!esc.applies_to(5));
    }
}
