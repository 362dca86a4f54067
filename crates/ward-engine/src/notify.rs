// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The notification decision engine (M3, spec.md §4.4): an ordered,
//! short-circuiting pipeline from "a state machine update produced a
//! reason" to "these contacts' commands ran with these macros expanded".
//!
//! Every `reject_*` step returns early with a reason string (surfaced in
//! `NotifyOutcome::rejected` and logged at debug level by the caller);
//! nothing past a short-circuit runs, matching the historical Nagios
//! `check_service_notification_viability` structure this is grounded on.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use tracing::{info, warn};
use ward_core::host::CommandRef;
use ward_core::{
    AckType, Contact, Dependency, DependencyKind, Escalation, HostState, NotificationReason,
    ServiceState,
};
use ward_exec::CommandExecutor;
use ward_macros::{ArgMacros, MacroContext, NotificationMacros, UserMacros};
use ward_registry::Registry;

use crate::error::EngineError;

/// What triggered this pass through the pipeline.
#[derive(Debug, Clone)]
pub struct NotifyRequest {
    pub host_name: String,
    pub service_description: Option<String>,
    pub reason: NotificationReason,
    pub author: String,
    pub comment: String,
    /// Bypasses every suppression step except recipient filtering and
    /// dependency checks (spec.md §4.4: `NOTIFY_HOST`/`NOTIFY_SVC` via
    /// the external command router pass `forced = true`).
    pub forced: bool,
    pub now: i64,
}

#[derive(Debug, Clone, Default)]
pub struct NotifyOutcome {
    pub sent: bool,
    pub recipients: Vec<String>,
    pub log_lines: Vec<String>,
    /// Set to the short-circuiting step's reason when `sent` is false.
    pub rejected: Option<&'static str>,
}

impl NotifyOutcome {
    fn rejected(reason: &'static str) -> Self {
        Self { rejected: Some(reason), ..Default::default() }
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

fn reason_log_label(reason: NotificationReason, state_label: &str) -> String {
    match reason {
        NotificationReason::Normal => state_label.to_string(),
        NotificationReason::Recovery => format!("RECOVERY ({state_label})"),
        other => NotificationMacros {
            reason: other,
            number: 0,
            author: String::new(),
            comment: String::new(),
            is_escalated: false,
        }
        .type_str()
        .to_string(),
    }
}

fn host_reason_allowed(opts: &ward_core::host::HostNotifyOptions, reason: NotificationReason, state: HostState) -> bool {
    match reason {
        NotificationReason::Recovery => opts.recovery,
        NotificationReason::FlappingStart | NotificationReason::FlappingStop | NotificationReason::FlappingDisabled => {
            opts.flapping
        }
        NotificationReason::DowntimeStart | NotificationReason::DowntimeEnd | NotificationReason::DowntimeCancelled => {
            opts.downtime
        }
        NotificationReason::Custom => true,
        NotificationReason::Normal | NotificationReason::Acknowledgement => match state {
            HostState::Down => opts.down,
            HostState::Unreachable => opts.unreachable,
            HostState::Up => true,
        },
    }
}

fn service_reason_allowed(
    opts: &ward_core::service::ServiceNotifyOptions,
    reason: NotificationReason,
    state: ServiceState,
) -> bool {
    match reason {
        NotificationReason::Recovery => opts.recovery,
        NotificationReason::FlappingStart | NotificationReason::FlappingStop | NotificationReason::FlappingDisabled => {
            opts.flapping
        }
        NotificationReason::DowntimeStart | NotificationReason::DowntimeEnd | NotificationReason::DowntimeCancelled => {
            opts.downtime
        }
        NotificationReason::Custom => true,
        NotificationReason::Normal | NotificationReason::Acknowledgement => match state {
            ServiceState::Warning => opts.warning,
            ServiceState::Critical => opts.critical,
            ServiceState::Unknown => opts.unknown,
            ServiceState::Ok => true,
        },
    }
}

fn timeperiod_allows(registry: &Registry, tz: Tz, period_name: &str, t: i64) -> Result<bool, EngineError> {
    let tp = registry.require_timeperiod(period_name)?;
    Ok(ward_time::is_valid_time(t, tp, tz, registry)?)
}

/// Step 10: does a notification dependency on another host/service
/// suppress this one right now?
fn dependency_blocks(
    registry: &Registry,
    tz: Tz,
    host_name: &str,
    service_description: Option<&str>,
    now: i64,
) -> Result<bool, EngineError> {
    for dep in registry.dependencies_for(host_name, service_description) {
        if dep.kind != DependencyKind::Notification {
            continue;
        }
        if let Some(period) = &dep.dependency_period {
            if !timeperiod_allows(registry, tz, period, now)? {
                continue;
            }
        }
        if master_in_failure_state(registry, dep) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn master_in_failure_state(registry: &Registry, dep: &Dependency) -> bool {
    match &dep.master_service_description {
        Some(desc) => match registry.service(&dep.master_host_name, desc) {
            Some(svc) if !svc.has_been_checked => dep.failure_options.on_pending,
            Some(svc) => match svc.current_state {
                ServiceState::Ok => dep.failure_options.on_up_or_ok,
                ServiceState::Warning => dep.failure_options.on_down_or_warning,
                ServiceState::Critical => dep.failure_options.on_unreachable_or_critical,
                ServiceState::Unknown => dep.failure_options.on_unknown,
            },
            None => false,
        },
        None => match registry.host(&dep.master_host_name) {
            Some(host) if !host.has_been_checked => dep.failure_options.on_pending,
            Some(host) => match host.current_state {
                HostState::Up => dep.failure_options.on_up_or_ok,
                HostState::Down => dep.failure_options.on_down_or_warning,
                HostState::Unreachable => dep.failure_options.on_unreachable_or_critical,
            },
            None => false,
        },
    }
}

/// Escalations applicable to this notification, already filtered by
/// notification number and escalation period.
fn matching_escalations<'a>(
    registry: &'a Registry,
    tz: Tz,
    host_name: &'a str,
    service_description: Option<&'a str>,
    candidate_number: u32,
    now: i64,
) -> Result<Vec<&'a Escalation>, EngineError> {
    let mut matches = Vec::new();
    for esc in registry.escalations_for(host_name, service_description) {
        if !esc.applies_to(candidate_number) {
            continue;
        }
        if let Some(period) = &esc.escalation_period {
            if !timeperiod_allows(registry, tz, period, now)? {
                continue;
            }
        }
        matches.push(esc);
    }
    Ok(matches)
}

fn expand_contacts(registry: &Registry, names: &[String], groups: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        if seen.insert(name.clone()) {
            out.push(name.clone());
        }
    }
    for group in groups {
        if let Some(members) = registry.contactgroup_member_names(group) {
            for member in members {
                if seen.insert(member.clone()) {
                    out.push(member);
                }
            }
        }
    }
    out
}

/// Drives macro expansion + dispatch for one notification. Shared by the
/// host and service pipelines; the target-specific `MacroContext` is
/// built by the caller.
pub struct NotificationEngine<E: CommandExecutor> {
    executor: Arc<E>,
    user_macros: UserMacros,
    tz: Tz,
    command_timeout: Duration,
    notifications_enabled: Arc<AtomicBool>,
    main_config_file: String,
    log_file: String,
}

impl<E: CommandExecutor + 'static> NotificationEngine<E> {
    pub fn new(executor: Arc<E>, user_macros: UserMacros, tz: Tz) -> Self {
        Self {
            executor,
            user_macros,
            tz,
            command_timeout: Duration::from_secs(30),
            notifications_enabled: Arc::new(AtomicBool::new(true)),
            main_config_file: String::new(),
            log_file: String::new(),
        }
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// `ENABLE_NOTIFICATIONS` / `DISABLE_NOTIFICATIONS` (global toggle).
    pub fn set_global_enabled(&self, enabled: bool) {
        self.notifications_enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn global_enabled(&self) -> bool {
        self.notifications_enabled.load(Ordering::SeqCst)
    }

    pub fn evaluate_and_dispatch(
        &self,
        registry: &mut Registry,
        req: NotifyRequest,
    ) -> Result<NotifyOutcome, EngineError> {
        match &req.service_description {
            Some(_) => self.evaluate_service(registry, req),
            None => self.evaluate_host(registry, req),
        }
    }

    fn evaluate_host(&self, registry: &mut Registry, req: NotifyRequest) -> Result<NotifyOutcome, EngineError> {
        // Step 1: global toggle.
        if !self.global_enabled() && !req.forced {
            return Ok(NotifyOutcome::rejected("notifications globally disabled"));
        }

        let host = registry.require_host(&req.host_name)?;
        // Step 2: per-object toggle.
        if !host.notifications_enabled && !req.forced {
            return Ok(NotifyOutcome::rejected("notifications disabled for host"));
        }
        // Step 3: reason vs. notify_on gate.
        if !host_reason_allowed(&host.notify_options, req.reason, host.current_state) {
            return Ok(NotifyOutcome::rejected("reason not in notify_on set"));
        }
        // Step 3 (cont.): a recovery requires a prior problem notification
        // (spec.md §4.4 step 3) — nothing was ever announced to recover from.
        if req.reason == NotificationReason::Recovery && host.notification_number == 0 {
            return Ok(NotifyOutcome::rejected("recovery without a prior problem notification"));
        }
        // Step 4: downtime suppression.
        if host.is_in_downtime() && !req.reason.always_allowed_in_downtime() && !req.forced {
            return Ok(NotifyOutcome::rejected("host is in scheduled downtime"));
        }
        // Step 5: flapping suppression (only the steady-state Normal reason is gated).
        if host.is_flapping && req.reason == NotificationReason::Normal {
            return Ok(NotifyOutcome::rejected("host is flapping"));
        }
        // Step 6: soft-state suppression.
        if host.state_type == ward_core::HostStateType::Soft && req.reason == NotificationReason::Normal && !req.forced {
            return Ok(NotifyOutcome::rejected("host problem is still soft"));
        }
        // Step 7: notification timeperiod gate.
        if !req.forced && !timeperiod_allows(registry, self.tz, &host.notification_period, req.now)? {
            return Ok(NotifyOutcome::rejected("outside notification_period"));
        }
        // Step 8: first-notification delay.
        if req.reason == NotificationReason::Normal
            && host.notification_number == 0
            && !req.forced
            && req.now < host.last_hard_state_change + (host.first_notification_delay_min * 60.0) as i64
        {
            return Ok(NotifyOutcome::rejected("first_notification_delay not yet elapsed"));
        }

        let candidate_number = match req.reason {
            NotificationReason::Normal => host.notification_number + 1,
            // A recovery matches escalations against the count the problem's
            // own notifications already reached, not a further increment —
            // it isn't part of that counting sequence (spec.md §8 S5).
            _ => host.notification_number.max(1),
        };
        let escalations = matching_escalations(registry, self.tz, &req.host_name, None, candidate_number, req.now)?;
        let interval_min = escalations
            .first()
            .map(|e| e.notification_interval_min)
            .unwrap_or(host.notification_interval_min);

        // Step 9: re-notification interval (send-once when interval is 0).
        if req.reason == NotificationReason::Normal && host.notification_number > 0 {
            if interval_min <= 0.0 {
                return Ok(NotifyOutcome::rejected("notification_interval is zero, already sent once"));
            }
            if req.now < host.last_notification + (interval_min * 60.0) as i64 {
                return Ok(NotifyOutcome::rejected("re-notification interval not yet elapsed"));
            }
        }

        // Step 10: dependency check.
        if dependency_blocks(registry, self.tz, &req.host_name, None, req.now)? {
            return Ok(NotifyOutcome::rejected("blocked by notification dependency"));
        }

        // Step 11: recipient set (escalations override the base contact list).
        let base_names = if escalations.is_empty() {
            expand_contacts(registry, &host.contacts, &host.contact_groups)
        } else {
            let mut names = Vec::new();
            let mut groups = Vec::new();
            for esc in &escalations {
                names.extend(esc.contacts.clone());
                groups.extend(esc.contact_groups.clone());
            }
            expand_contacts(registry, &names, &groups)
        };

        let state_label = host_state_label(host.current_state).to_string();
        let host_name = req.host_name.clone();
        let notification = NotificationMacros {
            reason: req.reason,
            number: candidate_number,
            author: req.author.clone(),
            comment: req.comment.clone(),
            is_escalated: !escalations.is_empty(),
        };

        // Step 12: per-contact filtering and step 13: dispatch.
        let mut recipients = Vec::new();
        let mut log_lines = Vec::new();
        for name in &base_names {
            let Some(contact) = registry.contact(name) else {
                warn!(contact = %name, "notification recipient not found in registry");
                continue;
            };
            if !host_reason_allowed(&contact.host_notify_options, req.reason, host.current_state) {
                continue;
            }
            if !timeperiod_allows(registry, self.tz, &contact.host_notification_period, req.now)? {
                continue;
            }
            recipients.push(name.clone());
            for raw_cmd in &contact.host_notification_commands {
                let line = self.expand_and_dispatch_host(registry, raw_cmd, contact, &notification, &host_name, req.now)?;
                log_lines.push(format!(
                    "HOST NOTIFICATION: {};{};{};{};{}",
                    contact.name,
                    host_name,
                    reason_log_label(req.reason, &state_label),
                    raw_cmd,
                    line
                ));
            }
        }

        if recipients.is_empty() {
            return Ok(NotifyOutcome { sent: false, recipients, log_lines, rejected: Some("no eligible recipients") });
        }

        let host = registry.require_host_mut(&req.host_name)?;
        match req.reason {
            NotificationReason::Normal => host.notification_number = candidate_number,
            // P4: the recovery resets the counter only now that it has
            // actually been dispatched — escalation matching above still
            // saw the pre-recovery count.
            NotificationReason::Recovery => host.notification_number = 0,
            _ => {}
        }
        host.last_notification = req.now;
        host.next_notification = req.now + (interval_min.max(0.0) * 60.0) as i64;
        if req.reason == NotificationReason::Acknowledgement {
            host.acknowledgement = host.acknowledgement.clone().or(Some(ward_core::Acknowledgement {
                ack_type: AckType::Normal,
                author: req.author,
                comment: req.comment,
                entry_time: req.now,
            }));
        }

        info!(host = %req.host_name, recipients = recipients.len(), reason = ?req.reason, "host notification sent");
        Ok(NotifyOutcome { sent: true, recipients, log_lines, rejected: None })
    }

    fn evaluate_service(&self, registry: &mut Registry, req: NotifyRequest) -> Result<NotifyOutcome, EngineError> {
        let description = req.service_description.clone().ok_or_else(|| EngineError::MissingServiceDescription {
            host: req.host_name.clone(),
        })?;

        if !self.global_enabled() && !req.forced {
            return Ok(NotifyOutcome::rejected("notifications globally disabled"));
        }

        let svc = registry.require_service(&req.host_name, &description)?;
        if !svc.notifications_enabled && !req.forced {
            return Ok(NotifyOutcome::rejected("notifications disabled for service"));
        }
        if !service_reason_allowed(&svc.notify_options, req.reason, svc.current_state) {
            return Ok(NotifyOutcome::rejected("reason not in notify_on set"));
        }
        if req.reason == NotificationReason::Recovery && svc.notification_number == 0 {
            return Ok(NotifyOutcome::rejected("recovery without a prior problem notification"));
        }
        if svc.scheduled_downtime_depth > 0 && !req.reason.always_allowed_in_downtime() && !req.forced {
            return Ok(NotifyOutcome::rejected("service is in scheduled downtime"));
        }
        if svc.is_flapping && req.reason == NotificationReason::Normal {
            return Ok(NotifyOutcome::rejected("service is flapping"));
        }
        if svc.state_type == ward_core::HostStateType::Soft && req.reason == NotificationReason::Normal && !req.forced {
            return Ok(NotifyOutcome::rejected("service problem is still soft"));
        }
        if !req.forced && !timeperiod_allows(registry, self.tz, &svc.notification_period, req.now)? {
            return Ok(NotifyOutcome::rejected("outside notification_period"));
        }
        if req.reason == NotificationReason::Normal
            && svc.notification_number == 0
            && !req.forced
            && req.now < svc.last_hard_state_change + (svc.first_notification_delay_min * 60.0) as i64
        {
            return Ok(NotifyOutcome::rejected("first_notification_delay not yet elapsed"));
        }

        let candidate_number = match req.reason {
            NotificationReason::Normal => svc.notification_number + 1,
            _ => svc.notification_number.max(1),
        };
        let escalations = matching_escalations(
            registry,
            self.tz,
            &req.host_name,
            Some(description.as_str()),
            candidate_number,
            req.now,
        )?;
        let interval_min = escalations
            .first()
            .map(|e| e.notification_interval_min)
            .unwrap_or(svc.notification_interval_min);

        if req.reason == NotificationReason::Normal && svc.notification_number > 0 {
            if interval_min <= 0.0 {
                return Ok(NotifyOutcome::rejected("notification_interval is zero, already sent once"));
            }
            if req.now < svc.last_notification + (interval_min * 60.0) as i64 {
                return Ok(NotifyOutcome::rejected("re-notification interval not yet elapsed"));
            }
        }

        if dependency_blocks(registry, self.tz, &req.host_name, Some(description.as_str()), req.now)? {
            return Ok(NotifyOutcome::rejected("blocked by notification dependency"));
        }

        let base_names = if escalations.is_empty() {
            expand_contacts(registry, &svc.contacts, &svc.contact_groups)
        } else {
            let mut names = Vec::new();
            let mut groups = Vec::new();
            for esc in &escalations {
                names.extend(esc.contacts.clone());
                groups.extend(esc.contact_groups.clone());
            }
            expand_contacts(registry, &names, &groups)
        };

        let state_label = service_state_label(svc.current_state).to_string();
        let host_name = req.host_name.clone();
        let notification = NotificationMacros {
            reason: req.reason,
            number: candidate_number,
            author: req.author.clone(),
            comment: req.comment.clone(),
            is_escalated: !escalations.is_empty(),
        };

        let mut recipients = Vec::new();
        let mut log_lines = Vec::new();
        for name in &base_names {
            let Some(contact) = registry.contact(name) else {
                warn!(contact = %name, "notification recipient not found in registry");
                continue;
            };
            if !service_reason_allowed(&contact.service_notify_options, req.reason, svc.current_state) {
                continue;
            }
            if !timeperiod_allows(registry, self.tz, &contact.service_notification_period, req.now)? {
                continue;
            }
            recipients.push(name.clone());
            for raw_cmd in &contact.service_notification_commands {
                let line = self.expand_and_dispatch_service(
                    registry,
                    raw_cmd,
                    contact,
                    &notification,
                    &host_name,
                    &description,
                    req.now,
                )?;
                log_lines.push(format!(
                    "SERVICE NOTIFICATION: {};{};{};{};{};{}",
                    contact.name,
                    host_name,
                    description,
                    reason_log_label(req.reason, &state_label),
                    raw_cmd,
                    line
                ));
            }
        }

        if recipients.is_empty() {
            return Ok(NotifyOutcome { sent: false, recipients, log_lines, rejected: Some("no eligible recipients") });
        }

        let svc = registry.require_service_mut(&req.host_name, &description)?;
        match req.reason {
            NotificationReason::Normal => svc.notification_number = candidate_number,
            NotificationReason::Recovery => svc.notification_number = 0,
            _ => {}
        }
        svc.last_notification = req.now;
        svc.next_notification = req.now + (interval_min.max(0.0) * 60.0) as i64;
        if req.reason == NotificationReason::Acknowledgement {
            svc.acknowledgement = svc.acknowledgement.clone().or(Some(ward_core::Acknowledgement {
                ack_type: AckType::Normal,
                author: req.author,
                comment: req.comment,
                entry_time: req.now,
            }));
        }

        info!(host = %req.host_name, service = %description, recipients = recipients.len(), reason = ?req.reason, "service notification sent");
        Ok(NotifyOutcome { sent: true, recipients, log_lines, rejected: None })
    }

    fn expand_and_dispatch_host(
        &self,
        registry: &Registry,
        raw_cmd: &str,
        contact: &Contact,
        notification: &NotificationMacros,
        host_name: &str,
        now: i64,
    ) -> Result<String, EngineError> {
        let host = registry.require_host(host_name)?;
        let cmd_ref = CommandRef::new(raw_cmd);
        let command = registry.require_command(&cmd_ref.command_name)?;
        let args = ArgMacros::from_raw(raw_cmd);
        let mut ctx = MacroContext::new(&args, &self.user_macros, now, self.tz)
            .with_host(host)
            .with_contact(contact)
            .with_notification(notification);
        ctx.main_config_file = &self.main_config_file;
        ctx.log_file = &self.log_file;
        let line = ward_macros::expand(&command.line, &ctx, registry);
        self.spawn_dispatch(line);
        Ok(format!("{} notified via {}", contact.name, cmd_ref.command_name))
    }

    #[allow(clippy::too_many_arguments)]
    fn expand_and_dispatch_service(
        &self,
        registry: &Registry,
        raw_cmd: &str,
        contact: &Contact,
        notification: &NotificationMacros,
        host_name: &str,
        description: &str,
        now: i64,
    ) -> Result<String, EngineError> {
        let host = registry.require_host(host_name)?;
        let svc = registry.require_service(host_name, description)?;
        let cmd_ref = CommandRef::new(raw_cmd);
        let command = registry.require_command(&cmd_ref.command_name)?;
        let args = ArgMacros::from_raw(raw_cmd);
        let mut ctx = MacroContext::new(&args, &self.user_macros, now, self.tz)
            .with_host(host)
            .with_service(svc)
            .with_contact(contact)
            .with_notification(notification);
        ctx.main_config_file = &self.main_config_file;
        ctx.log_file = &self.log_file;
        let line = ward_macros::expand(&command.line, &ctx, registry);
        self.spawn_dispatch(line);
        Ok(format!("{} notified via {}", contact.name, cmd_ref.command_name))
    }

    /// Fire-and-forget: notification commands never feed back into the
    /// state machine, so there's nothing for the reaper to do with the
    /// result beyond logging it.
    fn spawn_dispatch(&self, line: String) {
        let executor = Arc::clone(&self.executor);
        let timeout = self.command_timeout;
        tokio::spawn(async move {
            let result = executor.run_sync(&line, timeout).await;
            if result.exit_code != Some(0) {
                warn!(command = %line, exit_code = ?result.exit_code, "notification command exited non-zero");
            }
        });
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
