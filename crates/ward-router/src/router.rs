// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Applying a parsed [`ExternalCommand`] to the registry (X, spec.md
//! §4.7). State mutations that are purely L4 bookkeeping (custom vars,
//! global notification toggle is owned by the caller) happen here
//! directly; anything that also needs to touch the event queue or the
//! notification engine is handed back as a [`RouterEffect`] for
//! `ward-daemon`'s event loop to act on, since this crate has no
//! dependency on the queue or the executor.

use ward_core::custom_vars::CustomVar;
use ward_core::result::CheckSource;
use ward_core::{AckType, CheckResult};
use ward_engine::{
    acknowledge_host, acknowledge_service, process_host_result, process_service_result,
    remove_host_acknowledgement, remove_service_acknowledgement, UpdateOutcome,
};
use ward_registry::Registry;

use crate::command::ExternalCommand;
use crate::error::ApplyError;

/// What the event loop needs to do after a command was applied, beyond
/// the registry mutation `apply` already made.
#[derive(Debug)]
pub enum RouterEffect {
    HostCheckProcessed { host_name: String, outcome: UpdateOutcome },
    ServiceCheckProcessed { host_name: String, service_description: String, outcome: UpdateOutcome },
    DowntimeScheduled {
        downtime_id: u64,
        host_name: String,
        service_description: Option<String>,
        start_time: i64,
        end_time: i64,
        fixed: bool,
    },
    DowntimeCancelled {
        downtime_id: u64,
        host_name: String,
        service_description: Option<String>,
        was_active: bool,
    },
    NotificationsToggled { enabled: bool },
    CheckScheduled { host_name: String, service_description: Option<String>, at: i64 },
    Restart,
    Shutdown,
}

/// Applies `cmd` to `registry`, returning a [`RouterEffect`] when the
/// event loop has follow-up work (rescheduling, notifying, toggling the
/// notifier, or a lifecycle request). Commands referencing an unknown
/// host/service/contact return `Err` so the caller can log-and-drop per
/// spec.md §7's "Logic" error kind, rather than silently doing nothing.
pub fn apply(
    registry: &mut Registry,
    cmd: ExternalCommand,
    now: i64,
) -> Result<Option<RouterEffect>, ApplyError> {
    match cmd {
        ExternalCommand::ProcessHostCheckResult { host_name, exit_code, output } => {
            let parent_down = parent_is_down(registry, &host_name);
            let result = passive_result(exit_code, output, now);
            let outcome = process_host_result(registry, &host_name, result, now, parent_down)?;
            Ok(Some(RouterEffect::HostCheckProcessed { host_name, outcome }))
        }
        ExternalCommand::ProcessServiceCheckResult { host_name, service_description, exit_code, output } => {
            let result = passive_result(exit_code, output, now);
            let outcome = process_service_result(registry, &host_name, &service_description, result, now)?;
            Ok(Some(RouterEffect::ServiceCheckProcessed { host_name, service_description, outcome }))
        }
        ExternalCommand::AcknowledgeHostProblem { host_name, sticky, author, comment, .. } => {
            acknowledge_host(registry, &host_name, ack_kind(sticky), &author, &comment, now)?;
            Ok(None)
        }
        ExternalCommand::AcknowledgeSvcProblem { host_name, service_description, sticky, author, comment, .. } => {
            acknowledge_service(registry, &host_name, &service_description, ack_kind(sticky), &author, &comment, now)?;
            Ok(None)
        }
        ExternalCommand::RemoveHostAcknowledgement { host_name } => {
            remove_host_acknowledgement(registry, &host_name)?;
            Ok(None)
        }
        ExternalCommand::RemoveSvcAcknowledgement { host_name, service_description } => {
            remove_service_acknowledgement(registry, &host_name, &service_description)?;
            Ok(None)
        }
        ExternalCommand::ScheduleHostDowntime {
            host_name, start_time, end_time, fixed, trigger_id, duration_sec, author, comment,
        } => {
            registry.require_host(&host_name)?;
            let mut downtime = ward_core::Downtime::new(
                ward_core::DowntimeId::new(0),
                host_name.clone(),
                start_time,
                end_time,
                fixed,
                duration_sec,
            );
            downtime.author = author;
            downtime.comment = comment;
            downtime.entry_time = now;
            downtime.triggered_by = (trigger_id != 0).then(|| ward_core::DowntimeId::new(trigger_id));
            let id = registry.create_downtime(downtime);
            Ok(Some(RouterEffect::DowntimeScheduled {
                downtime_id: id.get(),
                host_name,
                service_description: None,
                start_time,
                end_time,
                fixed,
            }))
        }
        ExternalCommand::ScheduleSvcDowntime {
            host_name, service_description, start_time, end_time, fixed, trigger_id, duration_sec, author, comment,
        } => {
            registry.require_service(&host_name, &service_description)?;
            let mut downtime = ward_core::Downtime::new(
                ward_core::DowntimeId::new(0),
                host_name.clone(),
                start_time,
                end_time,
                fixed,
                duration_sec,
            );
            downtime.service_description = Some(service_description.clone());
            downtime.author = author;
            downtime.comment = comment;
            downtime.entry_time = now;
            downtime.triggered_by = (trigger_id != 0).then(|| ward_core::DowntimeId::new(trigger_id));
            let id = registry.create_downtime(downtime);
            Ok(Some(RouterEffect::DowntimeScheduled {
                downtime_id: id.get(),
                host_name,
                service_description: Some(service_description),
                start_time,
                end_time,
                fixed,
            }))
        }
        ExternalCommand::DelHostDowntime { downtime_id } => Ok(cancel_downtime(registry, downtime_id, now)),
        ExternalCommand::DelSvcDowntime { downtime_id } => Ok(cancel_downtime(registry, downtime_id, now)),
        ExternalCommand::ChangeCustomHostVar { host_name, var_name, value } => {
            let host = registry.require_host_mut(&host_name)?;
            host.custom_vars.insert(var_name, CustomVar::new(value, false));
            Ok(None)
        }
        ExternalCommand::ChangeCustomSvcVar { host_name, service_description, var_name, value } => {
            let svc = registry.require_service_mut(&host_name, &service_description)?;
            svc.custom_vars.insert(var_name, CustomVar::new(value, false));
            Ok(None)
        }
        ExternalCommand::ChangeCustomContactVar { contact_name, var_name, value } => {
            let contact = registry.require_contact_mut(&contact_name)?;
            contact.custom_vars.insert(var_name, CustomVar::new(value, false));
            Ok(None)
        }
        ExternalCommand::EnableNotifications => Ok(Some(RouterEffect::NotificationsToggled { enabled: true })),
        ExternalCommand::DisableNotifications => Ok(Some(RouterEffect::NotificationsToggled { enabled: false })),
        ExternalCommand::ScheduleHostCheck { host_name, check_time } => {
            registry.require_host(&host_name)?;
            Ok(Some(RouterEffect::CheckScheduled { host_name, service_description: None, at: check_time }))
        }
        ExternalCommand::ScheduleSvcCheck { host_name, service_description, check_time } => {
            registry.require_service(&host_name, &service_description)?;
            Ok(Some(RouterEffect::CheckScheduled { host_name, service_description: Some(service_description), at: check_time }))
        }
        ExternalCommand::RestartProgram => Ok(Some(RouterEffect::Restart)),
        ExternalCommand::ShutdownProgram => Ok(Some(RouterEffect::Shutdown)),
    }
}

fn cancel_downtime(registry: &mut Registry, downtime_id: u64, now: i64) -> Option<RouterEffect> {
    let id = ward_core::DowntimeId::new(downtime_id);
    let was_active = registry.downtime(id).map(|d| d.is_active_at(now)).unwrap_or(false);
    registry.remove_downtime(id).map(|d| RouterEffect::DowntimeCancelled {
        downtime_id,
        host_name: d.host_name,
        service_description: d.service_description,
        was_active,
    })
}

fn ack_kind(sticky: bool) -> AckType {
    crate::command::ack_type(sticky)
}

fn passive_result(exit_code: i32, output: String, now: i64) -> CheckResult {
    CheckResult {
        source: CheckSource::Passive,
        exit_code: Some(exit_code),
        plugin_output: output,
        long_plugin_output: String::new(),
        perfdata: String::new(),
        start_time: now,
        finish_time: now,
        early_timeout: false,
    }
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

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
