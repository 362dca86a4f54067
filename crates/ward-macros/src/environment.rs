// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The macro environment: everything `expand()` needs to resolve a
//! template's tokens (spec.md §4.6) — the notifier(s) in scope, the
//! triggering notification (if any), `$ARGn$`/`$USERn$` tables, and a
//! registry lookup for on-demand macros (`$HOSTSTATE:host$`, …).

use chrono_tz::Tz;
use ward_core::{Contact, Host, NotificationReason, Service, TimePeriod};

/// `$ARG1$` .. `$ARG32$`, parsed from the `command!arg1!arg2!…` syntax a
/// `CommandRef` carries.
#[derive(Debug, Clone, Default)]
pub struct ArgMacros(pub Vec<String>);

impl ArgMacros {
    /// Parses everything after the first `!` in a raw command reference
    /// string into positional arguments.
    pub fn from_raw(raw: &str) -> Self {
        let mut parts = raw.split('!');
        parts.next(); // command name
        Self(parts.map(str::to_string).collect())
    }

    /// 1-indexed, matching `$ARG1$`.
    pub fn get(&self, n: usize) -> &str {
        self.0.get(n.wrapping_sub(1)).map(String::as_str).unwrap_or("")
    }
}

/// `$USER1$` .. `$USER256$`, loaded from a resource file at startup.
#[derive(Debug, Clone, Default)]
pub struct UserMacros(pub Vec<String>);

impl UserMacros {
    pub fn get(&self, n: usize) -> &str {
        self.0.get(n.wrapping_sub(1)).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, n: usize, value: impl Into<String>) {
        if self.0.len() < n {
            self.0.resize(n, String::new());
        }
        self.0[n - 1] = value.into();
    }
}

/// Fields describing the notification that triggered this expansion, for
/// `$NOTIFICATIONTYPE$`, `$NOTIFICATIONNUMBER$`, `$NOTIFICATIONAUTHOR$`, …
#[derive(Debug, Clone)]
pub struct NotificationMacros {
    pub reason: NotificationReason,
    pub number: u32,
    pub author: String,
    pub comment: String,
    pub is_escalated: bool,
}

impl NotificationMacros {
    /// The historical uppercase token (`PROBLEM`, `RECOVERY`, `ACKNOWLEDGEMENT`, …).
    pub fn type_str(&self) -> &'static str {
        match self.reason {
            NotificationReason::Normal => "PROBLEM",
            NotificationReason::Recovery => "RECOVERY",
            NotificationReason::Acknowledgement => "ACKNOWLEDGEMENT",
            NotificationReason::FlappingStart => "FLAPPINGSTART",
            NotificationReason::FlappingStop => "FLAPPINGSTOP",
            NotificationReason::FlappingDisabled => "FLAPPINGDISABLED",
            NotificationReason::DowntimeStart => "DOWNTIMESTART",
            NotificationReason::DowntimeEnd => "DOWNTIMEEND",
            NotificationReason::DowntimeCancelled => "DOWNTIMECANCELLED",
            NotificationReason::Custom => "CUSTOM",
        }
    }
}

/// Summary counters backing the `$TOTALHOSTS*$`/`$TOTALSERVICES*$` macros.
/// Optional: when absent, those macros resolve to empty strings rather than
/// forcing every expansion to pay for a full registry scan.
#[derive(Debug, Clone, Default)]
pub struct StatusSummary {
    pub hosts_up: u32,
    pub hosts_down: u32,
    pub hosts_unreachable: u32,
    pub services_ok: u32,
    pub services_warning: u32,
    pub services_critical: u32,
    pub services_unknown: u32,
}

/// Registry boundary the on-demand macro forms (`$HOSTSTATE:host$`,
/// `$HOSTGROUPMEMBERS:grp$`, `$ISVALIDTIME:tp:t$`, …) resolve through.
/// Implemented by `ward-registry`'s `Registry`; kept as a trait here so
/// `ward-macros` never depends on it directly.
pub trait MacroLookup {
    fn host(&self, name: &str) -> Option<&Host>;
    fn service(&self, host_name: &str, description: &str) -> Option<&Service>;
    fn contact(&self, name: &str) -> Option<&Contact>;
    fn timeperiod(&self, name: &str) -> Option<&TimePeriod>;
    fn hostgroup_members(&self, name: &str) -> Option<Vec<String>>;
    fn servicegroup_members(&self, name: &str) -> Option<Vec<(String, String)>>;
    fn contactgroup_members(&self, name: &str) -> Option<Vec<String>>;
}

/// Everything `expand()` needs for one template. Built fresh per
/// command/notification dispatch rather than threaded through as global
/// state (spec.md §9's design note on explicit context structs).
pub struct MacroContext<'a> {
    pub host: Option<&'a Host>,
    pub service: Option<&'a Service>,
    pub contact: Option<&'a Contact>,
    pub notification: Option<&'a NotificationMacros>,
    pub status: Option<&'a StatusSummary>,
    pub args: &'a ArgMacros,
    pub user_macros: &'a UserMacros,
    pub now: i64,
    pub tz: Tz,
    pub main_config_file: &'a str,
    pub log_file: &'a str,
}

impl<'a> MacroContext<'a> {
    pub fn new(args: &'a ArgMacros, user_macros: &'a UserMacros, now: i64, tz: Tz) -> Self {
        Self {
            host: None,
            service: None,
            contact: None,
            notification: None,
            status: None,
            args,
            user_macros,
            now,
            tz,
            main_config_file: "",
            log_file: "",
        }
    }

    pub fn with_host(mut self, host: &'a Host) -> Self {
        self.host = Some(host);
        self
    }

    pub fn with_service(mut self, service: &'a Service) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_contact(mut self, contact: &'a Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    pub fn with_notification(mut self, notification: &'a NotificationMacros) -> Self {
        self.notification = Some(notification);
        self
    }

    pub fn with_status(mut self, status: &'a StatusSummary) -> Self {
        self.status = Some(status);
        self
    }
}
