// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_timestamp_and_verb_with_no_args() {
    let (ts, cmd) = parse_line("[1234567890] ENABLE_NOTIFICATIONS").unwrap();
    assert_eq!(ts, 1_234_567_890);
    assert_eq!(cmd, ExternalCommand::EnableNotifications);
}

#[test]
fn parses_process_host_check_result() {
    let (ts, cmd) = parse_line("[100] PROCESS_HOST_CHECK_RESULT;web1;2;CRITICAL - down").unwrap();
    assert_eq!(ts, 100);
    assert_eq!(
        cmd,
        ExternalCommand::ProcessHostCheckResult {
            host_name: "web1".to_string(),
            exit_code: 2,
            output: "CRITICAL - down".to_string(),
        }
    );
}

#[test]
fn parses_process_service_check_result() {
    let (_, cmd) = parse_line("[100] PROCESS_SERVICE_CHECK_RESULT;web1;http;0;OK").unwrap();
    assert_eq!(
        cmd,
        ExternalCommand::ProcessServiceCheckResult {
            host_name: "web1".to_string(),
            service_description: "http".to_string(),
            exit_code: 0,
            output: "OK".to_string(),
        }
    );
}

#[test]
fn parses_acknowledge_host_problem() {
    let (_, cmd) = parse_line("[100] ACKNOWLEDGE_HOST_PROBLEM;web1;1;1;0;op;looking into it").unwrap();
    assert_eq!(
        cmd,
        ExternalCommand::AcknowledgeHostProblem {
            host_name: "web1".to_string(),
            sticky: true,
            notify: true,
            persistent: false,
            author: "op".to_string(),
            comment: "looking into it".to_string(),
        }
    );
}

#[test]
fn parses_schedule_host_downtime() {
    let (_, cmd) = parse_line("[100] SCHEDULE_HOST_DOWNTIME;web1;1000;2000;1;0;0;op;maintenance").unwrap();
    assert_eq!(
        cmd,
        ExternalCommand::ScheduleHostDowntime {
            host_name: "web1".to_string(),
            start_time: 1000,
            end_time: 2000,
            fixed: true,
            trigger_id: 0,
            duration_sec: 0,
            author: "op".to_string(),
            comment: "maintenance".to_string(),
        }
    );
}

#[test]
fn parses_change_custom_host_var() {
    let (_, cmd) = parse_line("[100] CHANGE_CUSTOM_HOST_VAR;web1;REGION;us-east").unwrap();
    assert_eq!(
        cmd,
        ExternalCommand::ChangeCustomHostVar {
            host_name: "web1".to_string(),
            var_name: "REGION".to_string(),
            value: "us-east".to_string(),
        }
    );
}

#[test]
fn missing_opening_bracket_is_an_error() {
    assert_eq!(parse_line("100] ENABLE_NOTIFICATIONS"), Err(RouterError::MissingTimestampPrefix));
}

#[test]
fn missing_closing_bracket_is_an_error() {
    assert_eq!(parse_line("[100 ENABLE_NOTIFICATIONS"), Err(RouterError::MissingTimestampSuffix));
}

#[test]
fn non_numeric_timestamp_is_an_error() {
    assert_eq!(
        parse_line("[soon] ENABLE_NOTIFICATIONS"),
        Err(RouterError::BadTimestamp("soon".to_string()))
    );
}

#[test]
fn unknown_verb_is_an_error_but_does_not_panic() {
    assert_eq!(
        parse_line("[100] FLUX_CAPACITOR;1.21;gigawatts"),
        Err(RouterError::UnknownVerb("FLUX_CAPACITOR".to_string()))
    );
}

#[test]
fn wrong_arg_count_is_an_error() {
    assert_eq!(
        parse_line("[100] PROCESS_HOST_CHECK_RESULT;web1;2"),
        Err(RouterError::WrongArgCount {
            verb: "PROCESS_HOST_CHECK_RESULT",
            expected: 3,
            got: 2,
        })
    );
}

#[test]
fn bad_bool_field_is_an_error() {
    assert_eq!(
        parse_line("[100] ACKNOWLEDGE_HOST_PROBLEM;web1;yes;1;0;op;x"),
        Err(RouterError::BadBool { field: "sticky", value: "yes".to_string() })
    );
}

#[test]
fn trailing_whitespace_and_newline_are_tolerated() {
    let (ts, cmd) = parse_line("[100] ENABLE_NOTIFICATIONS\n").unwrap();
    assert_eq!(ts, 100);
    assert_eq!(cmd, ExternalCommand::EnableNotifications);
}
