// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ward_core::host::CommandRef;
use ward_core::{Host, HostId, Service};
use ward_registry::Registry;

fn registry_with_host() -> Registry {
    let mut reg = Registry::new();
    reg.insert_host(Host::new("web1", CommandRef::new("check_ping"))).unwrap();
    reg
}

fn registry_with_service() -> Registry {
    let mut reg = registry_with_host();
    reg.insert_service(Service::new(HostId::new("web1"), "http", CommandRef::new("check_http")))
        .unwrap();
    reg
}

#[test]
fn process_host_check_result_applies_to_host_state() {
    let mut reg = registry_with_host();
    let outcome = apply(
        &mut reg,
        ExternalCommand::ProcessHostCheckResult {
            host_name: "web1".to_string(),
            exit_code: 2,
            output: "CRITICAL".to_string(),
        },
        1_000,
    )
    .unwrap();
    assert!(matches!(outcome, Some(RouterEffect::HostCheckProcessed { .. })));
    assert_eq!(reg.host("web1").unwrap().current_state, ward_core::HostState::Down);
}

#[test]
fn process_service_check_result_applies_to_service_state() {
    let mut reg = registry_with_service();
    apply(
        &mut reg,
        ExternalCommand::ProcessServiceCheckResult {
            host_name: "web1".to_string(),
            service_description: "http".to_string(),
            exit_code: 2,
            output: "CRITICAL".to_string(),
        },
        1_000,
    )
    .unwrap();
    assert_eq!(reg.service("web1", "http").unwrap().current_state, ward_core::ServiceState::Critical);
}

#[test]
fn unknown_host_in_check_result_is_an_error() {
    let mut reg = Registry::new();
    let result = apply(
        &mut reg,
        ExternalCommand::ProcessHostCheckResult {
            host_name: "ghost".to_string(),
            exit_code: 0,
            output: "OK".to_string(),
        },
        1_000,
    );
    assert!(result.is_err());
}

#[test]
fn acknowledge_host_problem_is_a_noop_without_an_error_when_host_is_up() {
    let mut reg = registry_with_host();
    let outcome = apply(
        &mut reg,
        ExternalCommand::AcknowledgeHostProblem {
            host_name: "web1".to_string(),
            sticky: true,
            notify: true,
            persistent: false,
            author: "op".to_string(),
            comment: "investigating".to_string(),
        },
        1_000,
    )
    .unwrap();
    assert!(outcome.is_none());
    assert!(reg.host("web1").unwrap().acknowledgement.is_none());
}

#[test]
fn acknowledge_host_problem_records_ack_when_host_is_down() {
    let mut reg = registry_with_host();
    reg.host_mut("web1").unwrap().current_state = ward_core::HostState::Down;
    apply(
        &mut reg,
        ExternalCommand::AcknowledgeHostProblem {
            host_name: "web1".to_string(),
            sticky: true,
            notify: true,
            persistent: false,
            author: "op".to_string(),
            comment: "investigating".to_string(),
        },
        1_000,
    )
    .unwrap();
    assert!(reg.host("web1").unwrap().acknowledgement.is_some());
}

#[test]
fn remove_host_acknowledgement_clears_it() {
    let mut reg = registry_with_host();
    reg.host_mut("web1").unwrap().acknowledgement = Some(ward_core::Acknowledgement {
        ack_type: ward_core::AckType::Sticky,
        author: "op".to_string(),
        comment: "x".to_string(),
        entry_time: 1,
    });
    apply(&mut reg, ExternalCommand::RemoveHostAcknowledgement { host_name: "web1".to_string() }, 1_000).unwrap();
    assert!(reg.host("web1").unwrap().acknowledgement.is_none());
}

#[test]
fn schedule_host_downtime_creates_and_returns_effect() {
    let mut reg = registry_with_host();
    let effect = apply(
        &mut reg,
        ExternalCommand::ScheduleHostDowntime {
            host_name: "web1".to_string(),
            start_time: 1_000,
            end_time: 2_000,
            fixed: true,
            trigger_id: 0,
            duration_sec: 0,
            author: "op".to_string(),
            comment: "maintenance".to_string(),
        },
        500,
    )
    .unwrap();
    let Some(RouterEffect::DowntimeScheduled { downtime_id, host_name, start_time, end_time, .. }) = effect else {
        panic!("expected DowntimeScheduled");
    };
    assert_eq!(host_name, "web1");
    assert_eq!(start_time, 1_000);
    assert_eq!(end_time, 2_000);
    assert!(reg.downtime(ward_core::DowntimeId::new(downtime_id)).is_some());
}

#[test]
fn del_host_downtime_removes_it_and_reports_which_one() {
    let mut reg = registry_with_host();
    let mut downtime = ward_core::Downtime::new(ward_core::DowntimeId::new(0), "web1", 1_000, 2_000, true, 0);
    downtime.host_name = "web1".to_string();
    let id = reg.create_downtime(downtime);

    let effect = apply(&mut reg, ExternalCommand::DelHostDowntime { downtime_id: id.get() }, 1_000).unwrap();
    assert!(matches!(effect, Some(RouterEffect::DowntimeCancelled { .. })));
    assert!(reg.downtime(id).is_none());
}

#[test]
fn del_unknown_downtime_is_not_an_error_just_no_effect() {
    let mut reg = registry_with_host();
    let effect = apply(&mut reg, ExternalCommand::DelHostDowntime { downtime_id: 999 }, 1_000).unwrap();
    assert!(effect.is_none());
}

#[test]
fn change_custom_host_var_updates_the_registry() {
    let mut reg = registry_with_host();
    apply(
        &mut reg,
        ExternalCommand::ChangeCustomHostVar {
            host_name: "web1".to_string(),
            var_name: "REGION".to_string(),
            value: "us-east".to_string(),
        },
        1_000,
    )
    .unwrap();
    assert_eq!(reg.host("web1").unwrap().custom_vars.get("REGION").unwrap().value, "us-east");
}

#[test]
fn change_custom_var_on_unknown_host_is_an_error() {
    let mut reg = Registry::new();
    let result = apply(
        &mut reg,
        ExternalCommand::ChangeCustomHostVar {
            host_name: "ghost".to_string(),
            var_name: "REGION".to_string(),
            value: "us-east".to_string(),
        },
        1_000,
    );
    assert!(result.is_err());
}

#[test]
fn enable_and_disable_notifications_surface_as_an_effect_only() {
    let mut reg = registry_with_host();
    let on = apply(&mut reg, ExternalCommand::EnableNotifications, 1_000).unwrap();
    assert!(matches!(on, Some(RouterEffect::NotificationsToggled { enabled: true })));
    let off = apply(&mut reg, ExternalCommand::DisableNotifications, 1_000).unwrap();
    assert!(matches!(off, Some(RouterEffect::NotificationsToggled { enabled: false })));
}

#[test]
fn schedule_host_check_on_unknown_host_is_an_error() {
    let mut reg = Registry::new();
    let result = apply(&mut reg, ExternalCommand::ScheduleHostCheck { host_name: "ghost".to_string(), check_time: 1_000 }, 500);
    assert!(result.is_err());
}

#[test]
fn restart_and_shutdown_surface_as_lifecycle_effects() {
    let mut reg = registry_with_host();
    assert!(matches!(apply(&mut reg, ExternalCommand::RestartProgram, 1_000).unwrap(), Some(RouterEffect::Restart)));
    assert!(matches!(apply(&mut reg, ExternalCommand::ShutdownProgram, 1_000).unwrap(), Some(RouterEffect::Shutdown)));
}

#[test]
fn host_down_via_down_parent_is_classified_unreachable() {
    let mut reg = registry_with_host();
    reg.insert_host(Host::new("router1", CommandRef::new("check_ping"))).unwrap();
    reg.host_mut("router1").unwrap().current_state = ward_core::HostState::Down;
    reg.host_mut("web1").unwrap().parents.push(HostId::new("router1"));

    apply(
        &mut reg,
        ExternalCommand::ProcessHostCheckResult {
            host_name: "web1".to_string(),
            exit_code: 2,
            output: "CRITICAL".to_string(),
        },
        1_000,
    )
    .unwrap();
    assert_eq!(reg.host("web1").unwrap().current_state, ward_core::HostState::Unreachable);
}
