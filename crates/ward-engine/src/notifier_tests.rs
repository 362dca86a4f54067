// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ward_core::{CheckSource, CommandRef, HostId, Host, Service};
use ward_registry::Registry;

fn registry_with_host(max_attempts: u32) -> Registry {
    let mut reg = Registry::new();
    let mut host = Host::new("web1", CommandRef::new("check_ping"));
    host.max_attempts = max_attempts;
    reg.insert_host(host).unwrap();
    reg
}

fn registry_with_service(max_attempts: u32) -> Registry {
    let mut reg = Registry::new();
    reg.insert_host(Host::new("web1", CommandRef::new("check_ping"))).unwrap();
    let mut svc = Service::new(HostId::new("web1"), "http", CommandRef::new("check_http"));
    svc.max_attempts = max_attempts;
    reg.insert_service(svc).unwrap();
    reg
}

fn ok(now: i64) -> CheckResult {
    CheckResult {
        source: CheckSource::Active,
        exit_code: Some(0),
        plugin_output: "OK".to_string(),
        long_plugin_output: String::new(),
        perfdata: String::new(),
        start_time: now,
        finish_time: now,
        early_timeout: false,
    }
}

fn critical(now: i64) -> CheckResult {
    CheckResult {
        source: CheckSource::Active,
        exit_code: Some(2),
        plugin_output: "CRITICAL".to_string(),
        long_plugin_output: String::new(),
        perfdata: String::new(),
        start_time: now,
        finish_time: now,
        early_timeout: false,
    }
}

/// Spec.md §8 scenario S1: three consecutive CRITICAL results walk the
/// service through SOFT attempts 1 and 2 before going HARD on the third.
#[test]
fn s1_service_soft_to_hard_transition() {
    let mut reg = registry_with_service(3);

    let out1 = process_service_result(&mut reg, "web1", "http", critical(50_500), 50_500).unwrap();
    let svc = reg.require_service("web1", "http").unwrap();
    assert_eq!(svc.current_state, ServiceState::Critical);
    assert_eq!(svc.state_type, HostStateType::Soft);
    assert_eq!(svc.current_attempt, 1);
    assert!(out1.notification_reasons.is_empty());

    process_service_result(&mut reg, "web1", "http", critical(51_000), 51_000).unwrap();
    let svc = reg.require_service("web1", "http").unwrap();
    assert_eq!(svc.state_type, HostStateType::Soft);
    assert_eq!(svc.current_attempt, 2);

    let out3 = process_service_result(&mut reg, "web1", "http", critical(51_500), 51_500).unwrap();
    let svc = reg.require_service("web1", "http").unwrap();
    assert_eq!(svc.state_type, HostStateType::Hard);
    assert_eq!(svc.current_attempt, 3);
    assert!(svc.problem_id.is_some());
    assert_eq!(out3.notification_reasons, vec![NotificationReason::Normal]);
    assert!(out3.hard_state_change);
}

/// Spec.md §8 scenario S2: recovery after a hard problem resets the
/// attempt counter and fires exactly one recovery reason.
#[test]
fn s2_recovery_cycle() {
    let mut reg = registry_with_service(3);
    process_service_result(&mut reg, "web1", "http", critical(50_500), 50_500).unwrap();
    process_service_result(&mut reg, "web1", "http", critical(51_000), 51_000).unwrap();
    process_service_result(&mut reg, "web1", "http", critical(51_500), 51_500).unwrap();

    let out = process_service_result(&mut reg, "web1", "http", ok(53_000), 53_000).unwrap();
    let svc = reg.require_service("web1", "http").unwrap();
    assert_eq!(svc.current_state, ServiceState::Ok);
    assert_eq!(svc.state_type, HostStateType::Hard);
    assert_eq!(svc.current_attempt, 1);
    assert_eq!(svc.last_hard_state_change, 53_000);
    assert!(svc.problem_id.is_none());
    assert_eq!(out.notification_reasons, vec![NotificationReason::Recovery]);
}

#[test]
fn p3_problem_id_strictly_increases_across_hard_problems() {
    let mut reg = registry_with_service(1);
    process_service_result(&mut reg, "web1", "http", critical(100), 100).unwrap();
    let first_id = reg.require_service("web1", "http").unwrap().problem_id.unwrap();

    process_service_result(&mut reg, "web1", "http", ok(200), 200).unwrap();
    process_service_result(&mut reg, "web1", "http", critical(300), 300).unwrap();
    let second_id = reg.require_service("web1", "http").unwrap().problem_id.unwrap();

    assert!(second_id.get() > first_id.get());
}

#[test]
fn host_unreachable_when_parent_already_down() {
    let result = critical(0);
    assert_eq!(classify_host_state(&result, true), HostState::Unreachable);
    assert_eq!(classify_host_state(&result, false), HostState::Down);
}

#[test]
fn host_recheck_children_scheduled_on_hard_down() {
    let mut reg = registry_with_host(1);
    reg.require_host_mut("web1").unwrap().children.push(HostId::new("leaf1"));

    let out = process_host_result(&mut reg, "web1", critical(100), 100, false).unwrap();
    assert_eq!(out.recheck_children, vec![HostId::new("leaf1")]);
}

#[test]
fn host_no_recheck_children_when_still_up() {
    let mut reg = registry_with_host(1);
    reg.require_host_mut("web1").unwrap().children.push(HostId::new("leaf1"));

    let out = process_host_result(&mut reg, "web1", ok(100), 100, false).unwrap();
    assert!(out.recheck_children.is_empty());
}

#[test]
fn timed_out_result_produces_unknown_service_state() {
    let timeout = CheckResult::timed_out(CheckSource::Active, 100, 160);
    assert_eq!(classify_service_state(&timeout), ServiceState::Unknown);
}

#[test]
fn acknowledge_host_is_noop_when_not_a_problem() {
    let mut reg = registry_with_host(3);
    let acked = acknowledge_host(&mut reg, "web1", AckType::Normal, "op", "looking", 10).unwrap();
    assert!(!acked);
    assert!(reg.require_host("web1").unwrap().acknowledgement.is_none());
}

#[test]
fn acknowledge_host_records_when_in_problem_state() {
    let mut reg = registry_with_host(1);
    process_host_result(&mut reg, "web1", critical(100), 100, false).unwrap();
    let acked = acknowledge_host(&mut reg, "web1", AckType::Sticky, "op", "on it", 101).unwrap();
    assert!(acked);
    let host = reg.require_host("web1").unwrap();
    assert_eq!(host.acknowledgement.as_ref().unwrap().ack_type, AckType::Sticky);
}

/// Per DESIGN.md's resolution of the sticky/normal acknowledgement open
/// question: a normal ack clears on any subsequent state change, sticky
/// survives until the object returns to OK/UP.
#[test]
fn normal_ack_clears_on_any_state_change_sticky_does_not() {
    let mut reg = registry_with_service(1);
    process_service_result(&mut reg, "web1", "http", critical(100), 100).unwrap();
    acknowledge_service(&mut reg, "web1", "http", AckType::Normal, "op", "ok", 101).unwrap();
    assert!(reg.require_service("web1", "http").unwrap().acknowledgement.is_some());

    // A different non-OK state clears a *normal* ack.
    let warn_result = CheckResult {
        source: CheckSource::Active,
        exit_code: Some(1),
        plugin_output: "WARN".to_string(),
        long_plugin_output: String::new(),
        perfdata: String::new(),
        start_time: 200,
        finish_time: 200,
        early_timeout: false,
    };
    process_service_result(&mut reg, "web1", "http", warn_result, 200).unwrap();
    assert!(reg.require_service("web1", "http").unwrap().acknowledgement.is_none());
}

#[test]
fn remove_acknowledgement_clears_it_unconditionally() {
    let mut reg = registry_with_host(1);
    process_host_result(&mut reg, "web1", critical(100), 100, false).unwrap();
    acknowledge_host(&mut reg, "web1", AckType::Sticky, "op", "ok", 101).unwrap();
    remove_host_acknowledgement(&mut reg, "web1").unwrap();
    assert!(reg.require_host("web1").unwrap().acknowledgement.is_none());
}
