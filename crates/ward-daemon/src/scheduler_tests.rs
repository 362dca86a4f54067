use std::sync::Arc;
use std::time::Duration;

use ward_core::host::CommandRef;
use ward_core::{Command, Contact, FakeClock, Host, HostState, HostStateType, Service, ServiceState};
use ward_registry::Registry;

use super::*;

fn make_scheduler(registry: Registry, clock: FakeClock) -> Arc<Scheduler<FakeClock>> {
    let registry = registry.shared();
    let executors = ExecutorRegistry::new(clock.clone());
    let notify_executor = executors.resolve(&Command::new("__notify__", "true"));
    Scheduler::new(
        registry,
        clock,
        SchedulerConfig::default(),
        executors,
        notify_executor,
        ward_macros::UserMacros::default(),
    )
}

/// Waits up to a couple seconds for `drain_reaper` to have something to
/// hand back, polling rather than sleeping a fixed guess since the probe
/// runs a real child process.
async fn wait_for_reap<C: Clock + 'static>(scheduler: &Scheduler<C>) {
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.drain_reaper();
        if scheduler.next_deadline().is_some() {
            return;
        }
    }
}

#[test]
fn bootstrap_seeds_one_check_per_enabled_host_and_service() {
    let mut registry = Registry::new();
    registry.insert_host(Host::new("web1", CommandRef::new("check_ping"))).unwrap();
    registry.insert_command(Command::new("check_ping", "true"));
    let mut web_http = Service::new(ward_core::HostId::new("web1"), "http", CommandRef::new("check_http"));
    web_http.checks_enabled = false;
    registry.insert_service(web_http).unwrap();
    registry.insert_command(Command::new("check_http", "true"));

    let clock = FakeClock::new(1_000);
    let scheduler = make_scheduler(registry, clock.clone());
    scheduler.bootstrap();

    // The host check is due now; the disabled service never got queued, so
    // the only earlier-or-equal deadline is the host's.
    assert_eq!(scheduler.next_deadline(), Some(1_000));
}

#[tokio::test]
async fn host_check_runs_real_command_and_goes_hard_down_at_max_attempts() {
    let mut registry = Registry::new();
    let mut host = Host::new("web1", CommandRef::new("check_fail"));
    host.max_attempts = 1;
    registry.insert_host(host).unwrap();
    registry.insert_command(Command::new("check_fail", "echo CRITICAL; exit 2"));

    let clock = FakeClock::new(10_000);
    let scheduler = make_scheduler(registry, clock.clone());
    scheduler.bootstrap();
    scheduler.process_due_events().await;

    wait_for_reap(&scheduler).await;
    scheduler.process_due_events().await;

    let registry = scheduler_registry(&scheduler);
    let host = registry.read().require_host("web1").unwrap().clone();
    assert_eq!(host.current_state, HostState::Down);
    assert_eq!(host.state_type, HostStateType::Hard);
    assert!(host.has_been_checked);
    assert_eq!(host.plugin_output, "CRITICAL");
}

#[tokio::test]
async fn host_check_staying_up_reschedules_without_notification() {
    let mut registry = Registry::new();
    registry.insert_host(Host::new("web1", CommandRef::new("check_ok"))).unwrap();
    registry.insert_command(Command::new("check_ok", "echo OK; exit 0"));

    let clock = FakeClock::new(10_000);
    let scheduler = make_scheduler(registry, clock.clone());
    scheduler.bootstrap();
    scheduler.process_due_events().await;

    wait_for_reap(&scheduler).await;
    scheduler.process_due_events().await;

    let registry = scheduler_registry(&scheduler);
    let host = registry.read().require_host("web1").unwrap().clone();
    assert_eq!(host.current_state, HostState::Up);
    assert!(host.has_been_checked);
    // retry_interval_min=1 while soft is irrelevant once hard-up; the next
    // check should have been rescheduled at check_interval_min (5min).
    assert!(scheduler.next_deadline().unwrap() > 10_000);
}

#[tokio::test]
async fn passive_service_check_result_applies_immediately_and_notifies() {
    let mut registry = Registry::new();
    registry.insert_host(Host::new("web1", CommandRef::new("check_ping"))).unwrap();
    registry.insert_command(Command::new("check_ping", "true"));
    let mut svc = Service::new(ward_core::HostId::new("web1"), "http", CommandRef::new("check_http"));
    svc.max_attempts = 1;
    registry.insert_service(svc).unwrap();
    registry.insert_command(Command::new("check_http", "true"));
    let mut contact = Contact::new("oncall");
    contact.service_notify_options.critical = true;
    contact.service_notification_commands = vec!["notify-service".to_string()];
    registry.insert_contact(contact);
    registry.insert_command(Command::new("notify-service", "true"));

    let clock = FakeClock::new(20_000);
    let scheduler = make_scheduler(registry, clock.clone());
    scheduler.bootstrap();

    scheduler.feed_external_commands("[20000] PROCESS_SERVICE_CHECK_RESULT;web1;http;2;disk at 99%\n");
    scheduler.process_due_events().await;

    let registry = scheduler_registry(&scheduler);
    let service = registry
        .read()
        .services()
        .find(|s| s.description == "http")
        .cloned()
        .unwrap();
    assert_eq!(service.current_state, ServiceState::Critical);
    assert_eq!(service.state_type, HostStateType::Hard);
    assert_eq!(service.plugin_output, "disk at 99%");
}

#[tokio::test]
async fn fixed_downtime_lifecycle_tracks_depth_and_logs_alerts() {
    let mut registry = Registry::new();
    registry.insert_host(Host::new("web1", CommandRef::new("check_ping"))).unwrap();
    registry.insert_command(Command::new("check_ping", "true"));

    let clock = FakeClock::new(100_000);
    let scheduler = make_scheduler(registry, clock.clone());
    scheduler.bootstrap();

    scheduler.feed_external_commands(
        "[100000] SCHEDULE_HOST_DOWNTIME;web1;100100;100200;1;0;100;alice;planned maintenance\n",
    );

    let registry = scheduler_registry(&scheduler);
    assert_eq!(registry.read().require_host("web1").unwrap().scheduled_downtime_depth, 0);
    // DowntimeStart/DowntimeEnd were queued for start_time/end_time, not now.
    assert_eq!(scheduler.next_deadline(), Some(100_100));

    clock.set(100_100);
    scheduler.process_due_events().await;
    assert_eq!(registry.read().require_host("web1").unwrap().scheduled_downtime_depth, 1);

    clock.set(100_200);
    scheduler.process_due_events().await;
    assert_eq!(registry.read().require_host("web1").unwrap().scheduled_downtime_depth, 0);
}

#[tokio::test]
async fn del_host_downtime_before_start_never_increments_depth() {
    let mut registry = Registry::new();
    registry.insert_host(Host::new("web1", CommandRef::new("check_ping"))).unwrap();
    registry.insert_command(Command::new("check_ping", "true"));

    let clock = FakeClock::new(200_000);
    let scheduler = make_scheduler(registry, clock.clone());
    scheduler.bootstrap();

    scheduler.feed_external_commands(
        "[200000] SCHEDULE_HOST_DOWNTIME;web1;200100;200200;1;0;100;alice;planned\n",
    );
    scheduler.feed_external_commands("[200000] DEL_HOST_DOWNTIME;1\n");

    clock.set(200_100);
    scheduler.process_due_events().await;
    let registry = scheduler_registry(&scheduler);
    assert_eq!(registry.read().require_host("web1").unwrap().scheduled_downtime_depth, 0);
}

/// `Scheduler` doesn't expose its `SharedRegistry` publicly outside the
/// crate; the tests live in the same module so they can reach past the
/// private field directly.
fn scheduler_registry<C: Clock + 'static>(scheduler: &Scheduler<C>) -> ward_registry::SharedRegistry {
    scheduler.registry.clone()
}
