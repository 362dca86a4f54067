// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use chrono_tz::UTC;
use parking_lot::Mutex;
use std::sync::Arc;
use ward_core::{
    Command, CommandRef, Contact, Dependency, DependencyKind, Escalation, Host, HostId, Service,
};
use ward_macros::UserMacros;
use ward_registry::Registry;

/// Records every dispatched command line instead of actually spawning a
/// process; `run_sync` always reports success so dispatch outcomes never
/// depend on process scheduling.
#[derive(Clone, Default)]
struct FakeExecutor {
    dispatched: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl CommandExecutor for FakeExecutor {
    async fn run_sync(&self, line: &str, _timeout: Duration) -> ward_core::CheckResult {
        self.dispatched.lock().push(line.to_string());
        ward_core::CheckResult {
            source: ward_core::CheckSource::Active,
            exit_code: Some(0),
            plugin_output: "notified".to_string(),
            long_plugin_output: String::new(),
            perfdata: String::new(),
            start_time: 0,
            finish_time: 0,
            early_timeout: false,
        }
    }
}

fn engine() -> NotificationEngine<FakeExecutor> {
    NotificationEngine::new(Arc::new(FakeExecutor::default()), UserMacros::default(), UTC)
}

fn registry_with_contact(host_name: &str, in_problem: bool) -> Registry {
    let mut reg = Registry::new();
    let mut host = Host::new(host_name, CommandRef::new("check_ping"));
    if in_problem {
        host.current_state = ward_core::HostState::Down;
        host.state_type = ward_core::HostStateType::Hard;
        host.last_hard_state_change = 0;
    }
    host.contacts.push("admin".to_string());
    reg.insert_host(host).unwrap();

    let mut contact = Contact::new("admin");
    contact.host_notify_options.down = true;
    contact.host_notify_options.recovery = true;
    contact.host_notification_commands.push("notify-host".to_string());
    reg.insert_contact(contact);
    reg.insert_command(Command::new("notify-host", "/bin/notify $HOSTNAME$"));
    reg
}

fn req(host: &str, reason: NotificationReason, now: i64) -> NotifyRequest {
    NotifyRequest {
        host_name: host.to_string(),
        service_description: None,
        reason,
        author: "op".to_string(),
        comment: String::new(),
        forced: false,
        now,
    }
}

#[tokio::test]
async fn sends_hard_problem_notification_to_base_contact() {
    let mut reg = registry_with_contact("web1", true);
    let out = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Normal, 1000)).unwrap();
    assert!(out.sent);
    assert_eq!(out.recipients, vec!["admin".to_string()]);
    assert_eq!(reg.require_host("web1").unwrap().notification_number, 1);
}

/// `spawn_dispatch` is fire-and-forget, so notify outcomes never wait on
/// it; exercise the executor directly to confirm dispatched lines are
/// recorded once the task is actually polled.
#[tokio::test]
async fn fake_executor_records_dispatched_lines() {
    let executor = FakeExecutor::default();
    let result = executor.run_sync("/bin/notify host1", Duration::from_secs(1)).await;
    assert_eq!(result.exit_code, Some(0));
    assert_eq!(executor.dispatched.lock().as_slice(), ["/bin/notify host1".to_string()]);
}

#[test]
fn soft_state_suppresses_normal_notification() {
    let mut reg = registry_with_contact("web1", true);
    reg.require_host_mut("web1").unwrap().state_type = ward_core::HostStateType::Soft;
    let out = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Normal, 1000)).unwrap();
    assert!(!out.sent);
    assert_eq!(out.rejected, Some("host problem is still soft"));
}

#[test]
fn forced_bypasses_soft_state_suppression() {
    let mut reg = registry_with_contact("web1", true);
    reg.require_host_mut("web1").unwrap().state_type = ward_core::HostStateType::Soft;
    let mut request = req("web1", NotificationReason::Normal, 1000);
    request.forced = true;
    let out = engine().evaluate_and_dispatch(&mut reg, request).unwrap();
    assert!(out.sent);
}

/// Spec.md §8 P5: between a downtimestart and the matching downtimeend,
/// no `normal` notification is delivered, but acknowledgement still is.
#[test]
fn downtime_suppresses_normal_but_allows_acknowledgement() {
    let mut reg = registry_with_contact("web1", true);
    reg.require_host_mut("web1").unwrap().scheduled_downtime_depth = 1;

    let blocked = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Normal, 1000)).unwrap();
    assert!(!blocked.sent);
    assert_eq!(blocked.rejected, Some("host is in scheduled downtime"));

    let allowed = engine()
        .evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Acknowledgement, 1000))
        .unwrap();
    assert!(allowed.sent);
}

#[test]
fn flapping_suppresses_normal_reason_only() {
    let mut reg = registry_with_contact("web1", true);
    // A recovery requires a prior problem notification to recover from
    // (spec.md §4.4 step 3); send one before flapping kicks in.
    engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Normal, 500)).unwrap();
    reg.require_host_mut("web1").unwrap().is_flapping = true;

    let normal = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Normal, 1000)).unwrap();
    assert!(!normal.sent);
    assert_eq!(normal.rejected, Some("host is flapping"));

    let recovery = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Recovery, 1000)).unwrap();
    assert!(recovery.sent);
}

#[test]
fn first_notification_delay_blocks_early_normal() {
    let mut reg = registry_with_contact("web1", true);
    reg.require_host_mut("web1").unwrap().first_notification_delay_min = 10.0;
    reg.require_host_mut("web1").unwrap().last_hard_state_change = 1000;

    let too_early = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Normal, 1100)).unwrap();
    assert!(!too_early.sent);
    assert_eq!(too_early.rejected, Some("first_notification_delay not yet elapsed"));

    let on_time = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Normal, 1600)).unwrap();
    assert!(on_time.sent);
}

#[test]
fn zero_notification_interval_means_send_once() {
    let mut reg = registry_with_contact("web1", true);
    reg.require_host_mut("web1").unwrap().notification_interval_min = 0.0;

    let first = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Normal, 1000)).unwrap();
    assert!(first.sent);

    let second = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Normal, 5000)).unwrap();
    assert!(!second.sent);
    assert_eq!(second.rejected, Some("notification_interval is zero, already sent once"));
}

/// Spec.md §8 scenario S4: a notification dependency on a failing master
/// suppresses the dependent's normal notification.
#[test]
fn notification_dependency_blocks_until_master_recovers() {
    let mut reg = Registry::new();
    reg.insert_host(Host::new("host1", CommandRef::new("check_ping"))).unwrap();

    let mut svc_a = Service::new(HostId::new("host1"), "svc-a", CommandRef::new("check_a"));
    svc_a.current_state = ward_core::ServiceState::Critical;
    svc_a.has_been_checked = true;
    reg.insert_service(svc_a).unwrap();

    let mut svc_b = Service::new(HostId::new("host1"), "svc-b", CommandRef::new("check_b"));
    svc_b.current_state = ward_core::ServiceState::Critical;
    svc_b.state_type = ward_core::HostStateType::Hard;
    svc_b.contacts.push("admin".to_string());
    reg.insert_service(svc_b).unwrap();

    let mut contact = Contact::new("admin");
    contact.service_notify_options.critical = true;
    contact.service_notification_commands.push("notify-svc".to_string());
    reg.insert_contact(contact);
    reg.insert_command(Command::new("notify-svc", "/bin/notify"));

    let mut dep = Dependency::new(DependencyKind::Notification, "host1", "host1");
    dep.dependent_service_description = Some("svc-b".to_string());
    dep.master_service_description = Some("svc-a".to_string());
    dep.failure_options.on_unreachable_or_critical = true;
    reg.add_dependency(dep);

    let request = NotifyRequest {
        host_name: "host1".to_string(),
        service_description: Some("svc-b".to_string()),
        reason: NotificationReason::Normal,
        author: "op".to_string(),
        comment: String::new(),
        forced: false,
        now: 1000,
    };
    let blocked = engine().evaluate_and_dispatch(&mut reg, request.clone()).unwrap();
    assert!(!blocked.sent);
    assert_eq!(blocked.rejected, Some("blocked by notification dependency"));

    // Master recovers: dependency no longer applies.
    reg.require_service_mut("host1", "svc-a").unwrap().current_state = ward_core::ServiceState::Ok;
    let allowed = engine().evaluate_and_dispatch(&mut reg, request).unwrap();
    assert!(allowed.sent);
}

/// Spec.md §8 scenario S5: an escalation window replaces the base
/// recipient set for notification numbers 2..6.
#[test]
fn escalation_replaces_recipients_inside_its_window() {
    let mut reg = registry_with_contact("web1", true);
    let mut escalated = Contact::new("test_contact");
    escalated.host_notify_options.down = true;
    escalated.host_notify_options.recovery = true;
    escalated.host_notification_commands.push("notify-host".to_string());
    reg.insert_contact(escalated);
    let mut esc = Escalation::new("web1", 2, 6);
    esc.notification_interval_min = 5.0;
    esc.contacts.push("test_contact".to_string());
    reg.add_escalation(esc);

    // Notification #1: base contact only.
    let first = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Normal, 1000)).unwrap();
    assert_eq!(first.recipients, vec!["admin".to_string()]);

    // Notification #2 falls in the escalation window: only test_contact.
    let second = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Normal, 5000)).unwrap();
    assert_eq!(second.recipients, vec!["test_contact".to_string()]);

    // Spec.md §8 S5's final clause: a recovery while still inside the
    // escalation window (notification_number == 2) notifies the escalated
    // recipient, not the base contact — it must match escalations against
    // the count already reached, before that count is reset to 0.
    let recovery = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Recovery, 5500)).unwrap();
    assert_eq!(recovery.recipients, vec!["test_contact".to_string()]);
    assert_eq!(reg.require_host("web1").unwrap().notification_number, 0);

    // Notification #7 (number 3 feels off) is past the window: back to admin.
    reg.require_host_mut("web1").unwrap().notification_number = 6;
    reg.require_host_mut("web1").unwrap().last_notification = 9000;
    let seventh = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Normal, 13_000)).unwrap();
    assert_eq!(seventh.recipients, vec!["admin".to_string()]);
}

/// Spec.md §8 P4: a recovery resets `notification_number` to 0, but only
/// once the recovery notification itself has actually gone out — not
/// when `process_host_result` first clears the problem (see
/// `ward-engine::notifier`, which leaves the counter untouched).
#[test]
fn recovery_notification_resets_counter_after_it_is_dispatched() {
    let mut reg = registry_with_contact("web1", true);
    engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Normal, 1000)).unwrap();
    assert_eq!(reg.require_host("web1").unwrap().notification_number, 1);

    let out = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Recovery, 2000)).unwrap();
    assert!(out.sent);
    assert_eq!(reg.require_host("web1").unwrap().notification_number, 0);
}

/// Spec.md §4.4 step 3: "recoveries require a prior notification of the
/// problem" — a recovery with no problem notification ever sent (e.g. the
/// problem notification itself was suppressed) is rejected rather than
/// dispatched.
#[test]
fn recovery_without_a_prior_notification_is_rejected() {
    let mut reg = registry_with_contact("web1", true);
    let out = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Recovery, 1000)).unwrap();
    assert!(!out.sent);
    assert_eq!(out.rejected, Some("recovery without a prior problem notification"));
}

#[test]
fn acknowledgement_reason_records_an_ack_when_none_exists() {
    let mut reg = registry_with_contact("web1", true);
    let out = engine()
        .evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Acknowledgement, 1000))
        .unwrap();
    assert!(out.sent);
    assert!(reg.require_host("web1").unwrap().acknowledgement.is_some());
}

#[test]
fn missing_recipient_is_skipped_with_a_warning_not_a_failure() {
    let mut reg = Registry::new();
    let mut host = Host::new("web1", CommandRef::new("check_ping"));
    host.current_state = ward_core::HostState::Down;
    host.state_type = ward_core::HostStateType::Hard;
    host.contacts.push("ghost".to_string());
    reg.insert_host(host).unwrap();

    let out = engine().evaluate_and_dispatch(&mut reg, req("web1", NotificationReason::Normal, 1000)).unwrap();
    assert!(!out.sent);
    assert_eq!(out.rejected, Some("no eligible recipients"));
}
