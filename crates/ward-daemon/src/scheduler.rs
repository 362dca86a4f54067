// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event loop (T, spec.md §4.5): the only piece of the workspace that
//! actually drives `ward-engine::EventQueue`, drains `ward-exec::Reaper`,
//! and calls into `ward-engine::notifier`/`notify` as events come due.
//! Every other crate is a library this one wires together.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono_tz::Tz;
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use ward_core::{
    DowntimeId, DowntimeStatus, Event, EventPayload, HostId, HostStateType, NotificationReason,
    PriorityLane, ServiceId,
};
use ward_core::Clock;
use ward_engine::{EventQueue, NotificationEngine, NotifyRequest};
use ward_exec::{CheckTarget, Reaper};
use ward_macros::{ArgMacros, MacroContext, UserMacros};
use ward_registry::{Registry, SharedRegistry};
use ward_router::{apply, CommandReader, RouterEffect};

use crate::config::{SchedulerConfig, ORPHAN_STALENESS_MULTIPLIER};
use crate::executor::{AnyExecutor, ExecutorRegistry};

/// Everything the event loop needs in one place. Generic over `Clock` so
/// tests can drive it with a `FakeClock` instead of wall time.
pub struct Scheduler<C: Clock + 'static> {
    registry: SharedRegistry,
    queue: Mutex<EventQueue>,
    reaper: Arc<Reaper>,
    executors: ExecutorRegistry,
    notifier: NotificationEngine<AnyExecutor>,
    clock: C,
    user_macros: UserMacros,
    config: SchedulerConfig,
    command_reader: Mutex<CommandReader>,
    shutdown: AtomicBool,
}

impl<C: Clock + 'static> Scheduler<C> {
    pub fn new(
        registry: SharedRegistry,
        clock: C,
        config: SchedulerConfig,
        executors: ExecutorRegistry,
        notify_executor: Arc<AnyExecutor>,
        user_macros: UserMacros,
    ) -> Arc<Self> {
        let notifier = NotificationEngine::new(notify_executor, user_macros.clone(), config.tz)
            .with_command_timeout(config.command_timeout);
        Arc::new(Self {
            registry,
            queue: Mutex::new(EventQueue::new()),
            reaper: Reaper::new(),
            executors,
            notifier,
            clock,
            user_macros,
            config,
            command_reader: Mutex::new(CommandReader::new()),
            shutdown: AtomicBool::new(false),
        })
    }

    pub fn tz(&self) -> Tz {
        self.config.tz
    }

    pub fn set_notifications_enabled(&self, enabled: bool) {
        self.notifier.set_global_enabled(enabled);
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Seeds the queue with one initial check per enabled host/service and
    /// the recurring sweep events (spec.md §4.5 step 1 and the "Supplemented
    /// features" orphan sweep).
    pub fn bootstrap(&self) {
        let now = self.clock.now();
        let registry = self.registry.read();
        let host_ids: Vec<HostId> = registry
            .hosts()
            .filter(|h| h.checks_enabled)
            .map(|h| h.id.clone())
            .collect();
        let service_ids: Vec<ServiceId> = registry
            .services()
            .filter(|s| s.checks_enabled)
            .map(|s| s.id.clone())
            .collect();
        drop(registry);

        let mut queue = self.queue.lock();
        for host_id in host_ids {
            queue.push(now, PriorityLane::Low, EventPayload::HostCheck { host_id });
        }
        for service_id in service_ids {
            queue.push(now, PriorityLane::Low, EventPayload::ServiceCheck { service_id });
        }
        queue.push(now + self.config.orphan_check_interval.as_secs() as i64, PriorityLane::Low, EventPayload::OrphanCheckSweep);
        queue.push(now + self.config.status_save_interval.as_secs() as i64, PriorityLane::Low, EventPayload::StatusSave);
    }

    /// The `run_at` of the earliest pending event, used to size the next
    /// sleep in the daemon's `tokio::select!` loop.
    pub fn next_deadline(&self) -> Option<i64> {
        self.queue.lock().next_deadline()
    }

    /// Drains every prepared result out of the reaper and re-injects it
    /// into the queue as a `HostCheckReaped`/`ServiceCheckReaped` event, so
    /// it is processed in the same FIFO order as everything else due at
    /// this instant (spec.md §4.2 step 2, §4.5's single ordered queue).
    pub fn drain_reaper(&self) {
        let now = self.clock.now();
        let reaped = self.reaper.reap();
        if reaped.is_empty() {
            return;
        }
        let mut queue = self.queue.lock();
        for prepared in reaped {
            let Some(result) = prepared.result else {
                warn!(command_id = prepared.command_id, "reaped entry missing its result");
                continue;
            };
            match prepared.target {
                CheckTarget::Host(host_id) => {
                    queue.push(now, PriorityLane::High, EventPayload::HostCheckReaped { host_id, result });
                }
                CheckTarget::Service(service_id) => {
                    queue.push(now, PriorityLane::High, EventPayload::ServiceCheckReaped { service_id, result });
                }
            }
        }
    }

    /// Pops and handles every event due at or before now.
    pub async fn process_due_events(&self) {
        let now = self.clock.now();
        let due = self.queue.lock().drain_due(now);
        for event in due {
            self.dispatch_event(event).await;
        }
    }

    async fn dispatch_event(&self, event: Event) {
        debug!(event = %event.log_summary(), "dispatching event");
        match event.payload {
            EventPayload::HostCheck { host_id } => self.dispatch_host_check(&host_id),
            EventPayload::ServiceCheck { service_id } => self.dispatch_service_check(&service_id),
            EventPayload::HostCheckReaped { host_id, result } => self.handle_host_check_reaped(host_id, result),
            EventPayload::ServiceCheckReaped { service_id, result } => self.handle_service_check_reaped(service_id, result),
            EventPayload::HostNotification { host_id, reason, problem_id } => {
                self.handle_host_notification(host_id, reason, problem_id)
            }
            EventPayload::ServiceNotification { service_id, reason, problem_id } => {
                self.handle_service_notification(service_id, reason, problem_id)
            }
            EventPayload::DowntimeStart { downtime_id } => self.handle_downtime_start(downtime_id),
            EventPayload::DowntimeEnd { downtime_id } => self.handle_downtime_end(downtime_id),
            EventPayload::ExternalCommand { raw, .. } => self.apply_external_command_line(&raw),
            EventPayload::OrphanCheckSweep => self.orphan_check_sweep(),
            EventPayload::StatusSave => self.status_save(),
            EventPayload::ReloadConfig => info!("reload requested; ward-daemon reloads only its own log/runtime settings, not object configuration"),
            EventPayload::ProgramShutdown => self.request_shutdown(),
        }
    }

    // -- active checks ----------------------------------------------------

    fn dispatch_host_check(&self, host_id: &HostId) {
        let now = self.clock.now();
        let registry = self.registry.read();
        let Some(host) = registry.host(host_id.as_str()) else { return };
        if !host.checks_enabled {
            return;
        }
        let Ok(command) = registry.require_command(&host.check_command.command_name) else {
            warn!(host = %host_id, command = %host.check_command.command_name, "check command not found");
            return;
        };
        let args = ArgMacros::from_raw(&host.check_command.raw);
        let ctx = MacroContext::new(&args, &self.user_macros, now, self.config.tz).with_host(host);
        let line = ward_macros::expand(&command.line, &ctx, &*registry);
        let executor = self.executors.resolve(command);
        let target = CheckTarget::Host(host_id.clone());
        drop(registry);
        self.reaper.dispatch(executor, target, ward_core::CheckSource::Active, line, self.config.command_timeout, now);
    }

    fn dispatch_service_check(&self, service_id: &ServiceId) {
        let now = self.clock.now();
        let registry = self.registry.read();
        let Some(service) = registry.service(service_id.as_str(), "") .or_else(|| registry.services().find(|s| &s.id == service_id)) else { return };
        if !service.checks_enabled {
            return;
        }
        let Some(host) = registry.host(service.host_id.as_str()) else {
            warn!(service = %service_id, "service's host not found");
            return;
        };
        let Ok(command) = registry.require_command(&service.check_command.command_name) else {
            warn!(service = %service_id, command = %service.check_command.command_name, "check command not found");
            return;
        };
        let args = ArgMacros::from_raw(&service.check_command.raw);
        let ctx = MacroContext::new(&args, &self.user_macros, now, self.config.tz)
            .with_host(host)
            .with_service(service);
        let line = ward_macros::expand(&command.line, &ctx, &*registry);
        let executor = self.executors.resolve(command);
        let target = CheckTarget::Service(service_id.clone());
        drop(registry);
        self.reaper.dispatch(executor, target, ward_core::CheckSource::Active, line, self.config.command_timeout, now);
    }

    // -- reaped results -----------------------------------------------------

    fn handle_host_check_reaped(&self, host_id: HostId, result: ward_core::CheckResult) {
        let now = self.clock.now();
        let mut registry = self.registry.write();
        let parent_down = parent_is_down(&registry, host_id.as_str());
        let outcome = match ward_engine::process_host_result(&mut registry, host_id.as_str(), result, now, parent_down) {
            Ok(o) => o,
            Err(err) => {
                warn!(host = %host_id, error = %err, "failed to process host check result");
                return;
            }
        };
        for line in &outcome.log_lines {
            info!(target: "ward::alert", "{line}");
        }
        let is_problem = registry.host(host_id.as_str()).map(|h| h.current_state.is_problem()).unwrap_or(false);
        self.trigger_flexible_downtimes(&mut registry, host_id.as_str(), None, now, is_problem);
        let problem_id = registry.host(host_id.as_str()).and_then(|h| h.problem_id);
        drop(registry);

        {
            let mut queue = self.queue.lock();
            for reason in outcome.notification_reasons {
                queue.push(now, PriorityLane::High, EventPayload::HostNotification { host_id: host_id.clone(), reason, problem_id });
            }
            for child in outcome.recheck_children {
                queue.push(now, PriorityLane::High, EventPayload::HostCheck { host_id: child });
            }
        }
        self.reschedule_host_check(&host_id, now);
    }

    fn handle_service_check_reaped(&self, service_id: ServiceId, result: ward_core::CheckResult) {
        let now = self.clock.now();
        let mut registry = self.registry.write();
        let Some((host_name, description)) = registry
            .services()
            .find(|s| s.id == service_id)
            .map(|s| (s.host_id.as_str().to_string(), s.description.clone()))
        else {
            warn!(service = %service_id, "reaped service no longer in registry");
            return;
        };
        let outcome = match ward_engine::process_service_result(&mut registry, &host_name, &description, result, now) {
            Ok(o) => o,
            Err(err) => {
                warn!(service = %service_id, error = %err, "failed to process service check result");
                return;
            }
        };
        for line in &outcome.log_lines {
            info!(target: "ward::alert", "{line}");
        }
        let is_problem = registry.service(&host_name, &description).map(|s| s.current_state.is_problem()).unwrap_or(false);
        self.trigger_flexible_downtimes(&mut registry, &host_name, Some(&description), now, is_problem);
        let problem_id = registry.service(&host_name, &description).and_then(|s| s.problem_id);
        drop(registry);

        {
            let mut queue = self.queue.lock();
            for reason in outcome.notification_reasons {
                queue.push(now, PriorityLane::High, EventPayload::ServiceNotification { service_id: service_id.clone(), reason, problem_id });
            }
            for child in outcome.recheck_children {
                queue.push(now, PriorityLane::High, EventPayload::HostCheck { host_id: child });
            }
        }
        self.reschedule_service_check(&service_id, now);
    }

    // -- rescheduling -------------------------------------------------------

    /// spec.md §4.5 step 6: retry_interval while soft, check_interval once
    /// hard, clamped into the check_period (spec.md §4.1).
    fn reschedule_host_check(&self, host_id: &HostId, now: i64) {
        let (interval_sec, period, checks_enabled) = {
            let registry = self.registry.read();
            let Some(host) = registry.host(host_id.as_str()) else { return };
            let interval_min = if host.state_type == HostStateType::Soft { host.retry_interval_min } else { host.check_interval_min };
            (interval_seconds(interval_min), host.check_period.clone(), host.checks_enabled)
        };
        if !checks_enabled {
            return;
        }
        let run_at = self.clamp_to_period(now + interval_sec, &period).unwrap_or(now + interval_sec);
        self.queue.lock().push(run_at, PriorityLane::Low, EventPayload::HostCheck { host_id: host_id.clone() });
    }

    fn reschedule_service_check(&self, service_id: &ServiceId, now: i64) {
        let (interval_sec, period, checks_enabled) = {
            let registry = self.registry.read();
            let Some(service) = registry.services().find(|s| &s.id == service_id) else { return };
            let interval_min = if service.state_type == HostStateType::Soft { service.retry_interval_min } else { service.check_interval_min };
            (interval_seconds(interval_min), service.check_period.clone(), service.checks_enabled)
        };
        if !checks_enabled {
            return;
        }
        let run_at = self.clamp_to_period(now + interval_sec, &period).unwrap_or(now + interval_sec);
        self.queue.lock().push(run_at, PriorityLane::Low, EventPayload::ServiceCheck { service_id: service_id.clone() });
    }

    fn clamp_to_period(&self, t: i64, period_name: &str) -> Result<i64, crate::error::DaemonError> {
        let registry = self.registry.read();
        let tp = registry.require_timeperiod(period_name)?;
        if ward_time::is_valid_time(t, tp, self.config.tz, &*registry)? {
            return Ok(t);
        }
        match ward_time::next_valid_time(t, tp, self.config.tz, &*registry)? {
            Some(valid) => Ok(valid),
            None => {
                warn!(period = %period_name, "timeperiod has no valid time within the search horizon; scheduling unclamped");
                Ok(t)
            }
        }
    }

    // -- notifications ------------------------------------------------------

    fn handle_host_notification(&self, host_id: HostId, reason: NotificationReason, problem_id: Option<ward_core::ProblemId>) {
        let now = self.clock.now();
        let mut registry = self.registry.write();
        let req = NotifyRequest {
            host_name: host_id.as_str().to_string(),
            service_description: None,
            reason,
            author: "ward".to_string(),
            comment: String::new(),
            forced: false,
            now,
        };
        match self.notifier.evaluate_and_dispatch(&mut registry, req) {
            Ok(outcome) => {
                for line in outcome.log_lines {
                    info!(target: "ward::alert", "{line}");
                }
                if let Some(reason) = outcome.rejected {
                    debug!(host = %host_id, ?problem_id, reason, "host notification not sent");
                }
            }
            Err(err) => warn!(host = %host_id, error = %err, "host notification evaluation failed"),
        }
    }

    fn handle_service_notification(&self, service_id: ServiceId, reason: NotificationReason, problem_id: Option<ward_core::ProblemId>) {
        let now = self.clock.now();
        let mut registry = self.registry.write();
        let Some(service) = registry.services().find(|s| s.id == service_id) else { return };
        let req = NotifyRequest {
            host_name: service.host_id.as_str().to_string(),
            service_description: Some(service.description.clone()),
            reason,
            author: "ward".to_string(),
            comment: String::new(),
            forced: false,
            now,
        };
        match self.notifier.evaluate_and_dispatch(&mut registry, req) {
            Ok(outcome) => {
                for line in outcome.log_lines {
                    info!(target: "ward::alert", "{line}");
                }
                if let Some(reason) = outcome.rejected {
                    debug!(service = %service_id, ?problem_id, reason, "service notification not sent");
                }
            }
            Err(err) => warn!(service = %service_id, error = %err, "service notification evaluation failed"),
        }
    }

    // -- downtime lifecycle ---------------------------------------------------

    /// Called right after `ward_router::apply` returns a `DowntimeScheduled`
    /// effect, for both the immediate and deferred (future-timestamped)
    /// external-command paths.
    pub fn handle_downtime_scheduled(&self, downtime_id: u64, start_time: i64, end_time: i64, fixed: bool) {
        let now = self.clock.now();
        let mut queue = self.queue.lock();
        if fixed {
            let start_at = start_time.max(now);
            queue.push(start_at, PriorityLane::High, EventPayload::DowntimeStart { downtime_id });
            queue.push(end_time.max(start_at), PriorityLane::High, EventPayload::DowntimeEnd { downtime_id });
        } else {
            // Flexible downtime is triggered inline once a problem check
            // lands inside its window (`trigger_flexible_downtimes`); this
            // entry only expires it if it never triggers.
            queue.push(end_time.max(now), PriorityLane::Low, EventPayload::DowntimeEnd { downtime_id });
        }
    }

    pub fn handle_downtime_cancelled(&self, downtime_id: u64, host_name: String, service_description: Option<String>, was_active: bool) {
        let now = self.clock.now();
        self.queue.lock().cancel_matching(|p| {
            matches!(
                p,
                EventPayload::DowntimeStart { downtime_id: d } | EventPayload::DowntimeEnd { downtime_id: d }
                    if *d == downtime_id
            )
        });
        if !was_active {
            return;
        }
        let mut registry = self.registry.write();
        decrement_downtime_depth(&mut registry, &host_name, service_description.as_deref());
        log_downtime_alert(&host_name, service_description.as_deref(), "CANCELLED", "");
        let req = NotifyRequest {
            host_name: host_name.clone(),
            service_description: service_description.clone(),
            reason: NotificationReason::DowntimeCancelled,
            author: "ward".to_string(),
            comment: String::new(),
            forced: true,
            now,
        };
        if let Err(err) = self.notifier.evaluate_and_dispatch(&mut registry, req) {
            warn!(downtime_id, error = %err, "downtime-cancel notification failed");
        }
    }

    fn handle_downtime_start(&self, downtime_id: u64) {
        let now = self.clock.now();
        let mut registry = self.registry.write();
        let id = DowntimeId::new(downtime_id);
        let Some(dt) = registry.downtime(id).cloned() else { return };
        if matches!(dt.status, DowntimeStatus::Cancelled | DowntimeStatus::Expired) {
            return;
        }
        if let Some(d) = registry.downtime_mut(id) {
            d.status = DowntimeStatus::InEffect;
        }
        increment_downtime_depth(&mut registry, &dt.host_name, dt.service_description.as_deref());
        log_downtime_alert(&dt.host_name, dt.service_description.as_deref(), "STARTED", &dt.comment);
        let req = NotifyRequest {
            host_name: dt.host_name.clone(),
            service_description: dt.service_description.clone(),
            reason: NotificationReason::DowntimeStart,
            author: dt.author.clone(),
            comment: dt.comment.clone(),
            forced: true,
            now,
        };
        if let Err(err) = self.notifier.evaluate_and_dispatch(&mut registry, req) {
            warn!(downtime_id, error = %err, "downtime-start notification failed");
        }
    }

    fn handle_downtime_end(&self, downtime_id: u64) {
        let now = self.clock.now();
        let mut registry = self.registry.write();
        let id = DowntimeId::new(downtime_id);
        let Some(dt) = registry.downtime(id).cloned() else { return };
        let was_in_effect = dt.status == DowntimeStatus::InEffect;
        if was_in_effect {
            decrement_downtime_depth(&mut registry, &dt.host_name, dt.service_description.as_deref());
            log_downtime_alert(&dt.host_name, dt.service_description.as_deref(), "STOPPED", &dt.comment);
            let req = NotifyRequest {
                host_name: dt.host_name.clone(),
                service_description: dt.service_description.clone(),
                reason: NotificationReason::DowntimeEnd,
                author: dt.author.clone(),
                comment: dt.comment.clone(),
                forced: true,
                now,
            };
            if let Err(err) = self.notifier.evaluate_and_dispatch(&mut registry, req) {
                warn!(downtime_id, error = %err, "downtime-end notification failed");
            }
        }
        registry.remove_downtime(id);
    }

    /// A flexible (non-fixed) downtime only starts suppressing once a
    /// problem is actually observed inside its `[start_time, end_time]`
    /// window (spec.md §3 `Downtime.fixed`). Scanned after every result is
    /// folded in, rather than polled, since the transition can only
    /// happen right here.
    fn trigger_flexible_downtimes(&self, registry: &mut Registry, host_name: &str, service_description: Option<&str>, now: i64, is_problem: bool) {
        if !is_problem {
            return;
        }
        let candidates: Vec<(DowntimeId, i64)> = registry
            .downtimes_for(host_name, service_description)
            .filter(|d| !d.fixed && d.status == DowntimeStatus::Pending && now >= d.start_time && now <= d.end_time)
            .map(|d| (d.id, d.duration_sec))
            .collect();
        for (id, duration_sec) in candidates {
            if let Some(d) = registry.downtime_mut(id) {
                d.trigger_flexible(now);
            }
            increment_downtime_depth(registry, host_name, service_description);
            log_downtime_alert(host_name, service_description, "STARTED", "");
            let req = NotifyRequest {
                host_name: host_name.to_string(),
                service_description: service_description.map(str::to_string),
                reason: NotificationReason::DowntimeStart,
                author: "ward".to_string(),
                comment: String::new(),
                forced: true,
                now,
            };
            if let Err(err) = self.notifier.evaluate_and_dispatch(registry, req) {
                warn!(downtime_id = id.get(), error = %err, "flexible downtime-start notification failed");
            }
            self.queue.lock().push(now + duration_sec, PriorityLane::High, EventPayload::DowntimeEnd { downtime_id: id.get() });
        }
    }

    // -- external commands ---------------------------------------------------

    /// Feeds raw bytes from the command channel through the buffering
    /// reader, applying whichever complete records it yields (spec.md
    /// §4.7). Future-timestamped records are queued as `ExternalCommand`
    /// events instead of applied immediately.
    pub fn feed_external_commands(&self, chunk: &str) {
        let now = self.clock.now();
        let parsed = self.command_reader.lock().feed(chunk);
        for (ts, cmd) in parsed {
            if ts > now {
                self.queue.lock().push(ts, PriorityLane::Low, EventPayload::ExternalCommand {
                    raw: reencode(&cmd, ts),
                    submitted_at: ts,
                });
            } else {
                self.apply_command(cmd, now);
            }
        }
    }

    fn apply_external_command_line(&self, raw: &str) {
        let now = self.clock.now();
        match CommandReader::parse_one(raw) {
            Ok((_, cmd)) => self.apply_command(cmd, now),
            Err(err) => warn!(%raw, error = %err, "dropping malformed deferred external command"),
        }
    }

    fn apply_command(&self, cmd: ward_router::ExternalCommand, now: i64) {
        let effect = {
            let mut registry = self.registry.write();
            apply(&mut registry, cmd, now)
        };
        match effect {
            Ok(Some(effect)) => self.handle_router_effect(effect, now),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "external command application failed"),
        }
    }

    fn handle_router_effect(&self, effect: RouterEffect, now: i64) {
        match effect {
            RouterEffect::HostCheckProcessed { host_name, outcome } => {
                self.apply_passive_outcome(HostId::new(host_name), None, outcome, now);
            }
            RouterEffect::ServiceCheckProcessed { host_name, service_description, outcome } => {
                let registry = self.registry.read();
                let service_id = registry.services().find(|s| s.host_id.as_str() == host_name && s.description == service_description).map(|s| s.id.clone());
                drop(registry);
                if let Some(service_id) = service_id {
                    self.apply_passive_outcome(HostId::new(host_name), Some(service_id), outcome, now);
                }
            }
            RouterEffect::DowntimeScheduled { downtime_id, start_time, end_time, fixed, .. } => {
                self.handle_downtime_scheduled(downtime_id, start_time, end_time, fixed);
            }
            RouterEffect::DowntimeCancelled { downtime_id, host_name, service_description, was_active } => {
                self.handle_downtime_cancelled(downtime_id, host_name, service_description, was_active);
            }
            RouterEffect::NotificationsToggled { enabled } => self.set_notifications_enabled(enabled),
            RouterEffect::CheckScheduled { host_name, service_description, at } => {
                self.queue.lock().cancel_matching(|p| match (p, &service_description) {
                    (EventPayload::HostCheck { host_id }, None) => host_id.as_str() == host_name,
                    (EventPayload::ServiceCheck { service_id }, Some(_)) => service_id.as_str().starts_with(&format!("{host_name}/")),
                    _ => false,
                });
                match service_description {
                    None => self.queue.lock().push(at, PriorityLane::High, EventPayload::HostCheck { host_id: HostId::new(host_name) }),
                    Some(desc) => {
                        let service_id = ward_core::ServiceId::new(format!("{host_name}/{desc}"));
                        self.queue.lock().push(at, PriorityLane::High, EventPayload::ServiceCheck { service_id })
                    }
                };
            }
            RouterEffect::Restart => {
                info!("RESTART_PROGRAM received; ward-daemon does not re-read object configuration, treating as a no-op reload");
            }
            RouterEffect::Shutdown => self.request_shutdown(),
        }
    }

    /// A `PROCESS_{HOST,SERVICE}_CHECK_RESULT` already folded the passive
    /// result into the registry (router.rs calls `process_host_result`
    /// itself so the log lines can be returned alongside the effect); the
    /// loop still owns queuing the notifications and rescheduling.
    fn apply_passive_outcome(&self, host_id: HostId, service_id: Option<ServiceId>, outcome: ward_engine::UpdateOutcome, now: i64) {
        for line in &outcome.log_lines {
            info!(target: "ward::alert", "{line}");
        }
        let mut queue = self.queue.lock();
        match &service_id {
            Some(service_id) => {
                for reason in &outcome.notification_reasons {
                    queue.push(now, PriorityLane::High, EventPayload::ServiceNotification { service_id: service_id.clone(), reason: *reason, problem_id: None });
                }
            }
            None => {
                for reason in &outcome.notification_reasons {
                    queue.push(now, PriorityLane::High, EventPayload::HostNotification { host_id: host_id.clone(), reason: *reason, problem_id: None });
                }
            }
        }
        for child in &outcome.recheck_children {
            queue.push(now, PriorityLane::High, EventPayload::HostCheck { host_id: child.clone() });
        }
        drop(queue);
        match service_id {
            Some(service_id) => self.reschedule_service_check(&service_id, now),
            None => self.reschedule_host_check(&host_id, now),
        }
    }

    // -- periodic sweeps ------------------------------------------------------

    /// spec.md "Supplemented features": a check whose `next_check` fell
    /// more than `2x(check_interval+latency)` behind has no live queue
    /// entry (lost to a bug, a reload race, a clock jump) and is
    /// rescheduled immediately rather than left to starve forever.
    fn orphan_check_sweep(&self) {
        let now = self.clock.now();
        let registry = self.registry.read();
        let mut orphaned_hosts = Vec::new();
        for host in registry.hosts() {
            if !host.checks_enabled || !host.has_been_checked {
                continue;
            }
            let staleness = (interval_seconds(host.check_interval_min) + latency_allowance()) * ORPHAN_STALENESS_MULTIPLIER;
            if now - host.last_check > staleness {
                orphaned_hosts.push(host.id.clone());
            }
        }
        let mut orphaned_services = Vec::new();
        for service in registry.services() {
            if !service.checks_enabled || !service.has_been_checked {
                continue;
            }
            let staleness = (interval_seconds(service.check_interval_min) + latency_allowance()) * ORPHAN_STALENESS_MULTIPLIER;
            if now - service.last_check > staleness {
                orphaned_services.push(service.id.clone());
            }
        }
        drop(registry);

        if !orphaned_hosts.is_empty() || !orphaned_services.is_empty() {
            warn!(hosts = orphaned_hosts.len(), services = orphaned_services.len(), "orphan check sweep rescheduling stale checks");
        }
        let mut queue = self.queue.lock();
        for host_id in orphaned_hosts {
            queue.push(now, PriorityLane::High, EventPayload::HostCheck { host_id });
        }
        for service_id in orphaned_services {
            queue.push(now, PriorityLane::High, EventPayload::ServiceCheck { service_id });
        }
        queue.push(now + self.config.orphan_check_interval.as_secs() as i64, PriorityLane::Low, EventPayload::OrphanCheckSweep);
    }

    fn status_save(&self) {
        let now = self.clock.now();
        debug!("status save tick (persistence handled by the caller's snapshot path)");
        self.queue.lock().push(now + self.config.status_save_interval.as_secs() as i64, PriorityLane::Low, EventPayload::StatusSave);
    }
}

fn interval_seconds(interval_min: f64) -> i64 {
    ((interval_min * 60.0) as i64).max(1)
}

/// A fixed check-latency allowance folded into the orphan staleness bound,
/// since a check that's merely slow to return shouldn't be mistaken for one
/// that never got scheduled.
fn latency_allowance() -> i64 {
    60
}

fn parent_is_down(registry: &Registry, host_name: &str) -> bool {
    let Some(host) = registry.host(host_name) else { return false };
    host.parents.iter().any(|p| {
        registry
            .host(p.as_str())
            .map(|parent| parent.current_state != ward_core::HostState::Up)
            .unwrap_or(false)
    })
}

fn increment_downtime_depth(registry: &mut Registry, host_name: &str, service_description: Option<&str>) {
    match service_description {
        Some(desc) => {
            if let Some(svc) = registry.service_mut(host_name, desc) {
                svc.scheduled_downtime_depth += 1;
            }
        }
        None => {
            if let Some(host) = registry.host_mut(host_name) {
                host.scheduled_downtime_depth += 1;
            }
        }
    }
}

fn decrement_downtime_depth(registry: &mut Registry, host_name: &str, service_description: Option<&str>) {
    match service_description {
        Some(desc) => {
            if let Some(svc) = registry.service_mut(host_name, desc) {
                svc.scheduled_downtime_depth = svc.scheduled_downtime_depth.saturating_sub(1);
            }
        }
        None => {
            if let Some(host) = registry.host_mut(host_name) {
                host.scheduled_downtime_depth = host.scheduled_downtime_depth.saturating_sub(1);
            }
        }
    }
}

fn log_downtime_alert(host_name: &str, service_description: Option<&str>, verb: &str, comment: &str) {
    match service_description {
        Some(desc) => info!(target: "ward::alert", "SERVICE DOWNTIME ALERT: {host_name};{desc};{verb};{comment}"),
        None => info!(target: "ward::alert", "HOST DOWNTIME ALERT: {host_name};{verb};{comment}"),
    }
}

/// Re-renders a parsed command back into the `[<ts>] VERB;...` wire form
/// so a future-timestamped one can be replayed through the same parser
/// when its `ExternalCommand` queue event comes due, rather than keeping a
/// second representation of "pending deferred command" around.
fn reencode(cmd: &ward_router::ExternalCommand, ts: i64) -> String {
    format!("[{ts}] {}", cmd.to_command_line())
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
