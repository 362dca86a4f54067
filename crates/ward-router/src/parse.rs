// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-format parsing: `[<unix_timestamp>] <VERB>;<arg>;<arg>…` (spec.md
//! §6). One line in, one `(timestamp, ExternalCommand)` out.

use crate::command::ExternalCommand;
use crate::error::RouterError;

/// Parses a single external-command line. Does not trim a trailing `\n` —
/// callers that split on newlines (e.g. `CommandReader`) already strip it.
pub fn parse_line(line: &str) -> Result<(i64, ExternalCommand), RouterError> {
    let line = line.trim();
    let rest = line
        .strip_prefix('[')
        .ok_or(RouterError::MissingTimestampPrefix)?;
    let (ts_str, rest) = rest
        .split_once(']')
        .ok_or(RouterError::MissingTimestampSuffix)?;
    let timestamp: i64 = ts_str
        .trim()
        .parse()
        .map_err(|_| RouterError::BadTimestamp(ts_str.to_string()))?;

    let rest = rest.trim_start();
    let mut parts = rest.split(';');
    let verb = parts.next().filter(|v| !v.is_empty()).ok_or(RouterError::MissingVerb)?;
    let args: Vec<&str> = parts.collect();

    let command = parse_command(verb, &args)?;
    Ok((timestamp, command))
}

fn expect_args(verb: &'static str, args: &[&str], n: usize) -> Result<(), RouterError> {
    if args.len() != n {
        return Err(RouterError::WrongArgCount { verb, expected: n, got: args.len() });
    }
    Ok(())
}

fn parse_i64(field: &'static str, value: &str) -> Result<i64, RouterError> {
    value.trim().parse().map_err(|_| RouterError::BadInteger { field, value: value.to_string() })
}

fn parse_u64(field: &'static str, value: &str) -> Result<u64, RouterError> {
    value.trim().parse().map_err(|_| RouterError::BadInteger { field, value: value.to_string() })
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool, RouterError> {
    match value.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(RouterError::BadBool { field, value: other.to_string() }),
    }
}

fn parse_command(verb: &str, args: &[&str]) -> Result<ExternalCommand, RouterError> {
    match verb {
        "PROCESS_HOST_CHECK_RESULT" => {
            expect_args(verb_name(verb), args, 3)?;
            Ok(ExternalCommand::ProcessHostCheckResult {
                host_name: args[0].to_string(),
                exit_code: parse_i64("status", args[1])? as i32,
                output: args[2].to_string(),
            })
        }
        "PROCESS_SERVICE_CHECK_RESULT" => {
            expect_args(verb_name(verb), args, 4)?;
            Ok(ExternalCommand::ProcessServiceCheckResult {
                host_name: args[0].to_string(),
                service_description: args[1].to_string(),
                exit_code: parse_i64("status", args[2])? as i32,
                output: args[3].to_string(),
            })
        }
        "ACKNOWLEDGE_HOST_PROBLEM" => {
            expect_args(verb_name(verb), args, 6)?;
            Ok(ExternalCommand::AcknowledgeHostProblem {
                host_name: args[0].to_string(),
                sticky: parse_bool("sticky", args[1])?,
                notify: parse_bool("notify", args[2])?,
                persistent: parse_bool("persistent", args[3])?,
                author: args[4].to_string(),
                comment: args[5].to_string(),
            })
        }
        "ACKNOWLEDGE_SVC_PROBLEM" => {
            expect_args(verb_name(verb), args, 7)?;
            Ok(ExternalCommand::AcknowledgeSvcProblem {
                host_name: args[0].to_string(),
                service_description: args[1].to_string(),
                sticky: parse_bool("sticky", args[2])?,
                notify: parse_bool("notify", args[3])?,
                persistent: parse_bool("persistent", args[4])?,
                author: args[5].to_string(),
                comment: args[6].to_string(),
            })
        }
        "REMOVE_HOST_ACKNOWLEDGEMENT" => {
            expect_args(verb_name(verb), args, 1)?;
            Ok(ExternalCommand::RemoveHostAcknowledgement { host_name: args[0].to_string() })
        }
        "REMOVE_SVC_ACKNOWLEDGEMENT" => {
            expect_args(verb_name(verb), args, 2)?;
            Ok(ExternalCommand::RemoveSvcAcknowledgement {
                host_name: args[0].to_string(),
                service_description: args[1].to_string(),
            })
        }
        "SCHEDULE_HOST_DOWNTIME" => {
            expect_args(verb_name(verb), args, 8)?;
            Ok(ExternalCommand::ScheduleHostDowntime {
                host_name: args[0].to_string(),
                start_time: parse_i64("start_time", args[1])?,
                end_time: parse_i64("end_time", args[2])?,
                fixed: parse_bool("fixed", args[3])?,
                trigger_id: parse_u64("trigger_id", args[4])?,
                duration_sec: parse_i64("duration", args[5])?,
                author: args[6].to_string(),
                comment: args[7].to_string(),
            })
        }
        "SCHEDULE_SVC_DOWNTIME" => {
            expect_args(verb_name(verb), args, 9)?;
            Ok(ExternalCommand::ScheduleSvcDowntime {
                host_name: args[0].to_string(),
                service_description: args[1].to_string(),
                start_time: parse_i64("start_time", args[2])?,
                end_time: parse_i64("end_time", args[3])?,
                fixed: parse_bool("fixed", args[4])?,
                trigger_id: parse_u64("trigger_id", args[5])?,
                duration_sec: parse_i64("duration", args[6])?,
                author: args[7].to_string(),
                comment: args[8].to_string(),
            })
        }
        "DEL_HOST_DOWNTIME" => {
            expect_args(verb_name(verb), args, 1)?;
            Ok(ExternalCommand::DelHostDowntime { downtime_id: parse_u64("downtime_id", args[0])? })
        }
        "DEL_SVC_DOWNTIME" => {
            expect_args(verb_name(verb), args, 1)?;
            Ok(ExternalCommand::DelSvcDowntime { downtime_id: parse_u64("downtime_id", args[0])? })
        }
        "CHANGE_CUSTOM_HOST_VAR" => {
            expect_args(verb_name(verb), args, 3)?;
            Ok(ExternalCommand::ChangeCustomHostVar {
                host_name: args[0].to_string(),
                var_name: args[1].to_string(),
                value: args[2].to_string(),
            })
        }
        "CHANGE_CUSTOM_SVC_VAR" => {
            expect_args(verb_name(verb), args, 4)?;
            Ok(ExternalCommand::ChangeCustomSvcVar {
                host_name: args[0].to_string(),
                service_description: args[1].to_string(),
                var_name: args[2].to_string(),
                value: args[3].to_string(),
            })
        }
        "CHANGE_CUSTOM_CONTACT_VAR" => {
            expect_args(verb_name(verb), args, 3)?;
            Ok(ExternalCommand::ChangeCustomContactVar {
                contact_name: args[0].to_string(),
                var_name: args[1].to_string(),
                value: args[2].to_string(),
            })
        }
        "ENABLE_NOTIFICATIONS" => {
            expect_args(verb_name(verb), args, 0)?;
            Ok(ExternalCommand::EnableNotifications)
        }
        "DISABLE_NOTIFICATIONS" => {
            expect_args(verb_name(verb), args, 0)?;
            Ok(ExternalCommand::DisableNotifications)
        }
        "SCHEDULE_HOST_CHECK" => {
            expect_args(verb_name(verb), args, 2)?;
            Ok(ExternalCommand::ScheduleHostCheck {
                host_name: args[0].to_string(),
                check_time: parse_i64("check_time", args[1])?,
            })
        }
        "SCHEDULE_SVC_CHECK" => {
            expect_args(verb_name(verb), args, 3)?;
            Ok(ExternalCommand::ScheduleSvcCheck {
                host_name: args[0].to_string(),
                service_description: args[1].to_string(),
                check_time: parse_i64("check_time", args[2])?,
            })
        }
        "RESTART_PROGRAM" => {
            expect_args(verb_name(verb), args, 0)?;
            Ok(ExternalCommand::RestartProgram)
        }
        "SHUTDOWN_PROGRAM" => {
            expect_args(verb_name(verb), args, 0)?;
            Ok(ExternalCommand::ShutdownProgram)
        }
        other => Err(RouterError::UnknownVerb(other.to_string())),
    }
}

/// The closed verb list is small enough to just echo the match arm back
/// as the `&'static str` `WrongArgCount` wants, rather than threading a
/// second copy of the string table through `parse_command`.
fn verb_name(verb: &str) -> &'static str {
    match verb {
        "PROCESS_HOST_CHECK_RESULT" => "PROCESS_HOST_CHECK_RESULT",
        "PROCESS_SERVICE_CHECK_RESULT" => "PROCESS_SERVICE_CHECK_RESULT",
        "ACKNOWLEDGE_HOST_PROBLEM" => "ACKNOWLEDGE_HOST_PROBLEM",
        "ACKNOWLEDGE_SVC_PROBLEM" => "ACKNOWLEDGE_SVC_PROBLEM",
        "REMOVE_HOST_ACKNOWLEDGEMENT" => "REMOVE_HOST_ACKNOWLEDGEMENT",
        "REMOVE_SVC_ACKNOWLEDGEMENT" => "REMOVE_SVC_ACKNOWLEDGEMENT",
        "SCHEDULE_HOST_DOWNTIME" => "SCHEDULE_HOST_DOWNTIME",
        "SCHEDULE_SVC_DOWNTIME" => "SCHEDULE_SVC_DOWNTIME",
        "DEL_HOST_DOWNTIME" => "DEL_HOST_DOWNTIME",
        "DEL_SVC_DOWNTIME" => "DEL_SVC_DOWNTIME",
        "CHANGE_CUSTOM_HOST_VAR" => "CHANGE_CUSTOM_HOST_VAR",
        "CHANGE_CUSTOM_SVC_VAR" => "CHANGE_CUSTOM_SVC_VAR",
        "CHANGE_CUSTOM_CONTACT_VAR" => "CHANGE_CUSTOM_CONTACT_VAR",
        "ENABLE_NOTIFICATIONS" => "ENABLE_NOTIFICATIONS",
        "DISABLE_NOTIFICATIONS" => "DISABLE_NOTIFICATIONS",
        "SCHEDULE_HOST_CHECK" => "SCHEDULE_HOST_CHECK",
        "SCHEDULE_SVC_CHECK" => "SCHEDULE_SVC_CHECK",
        "RESTART_PROGRAM" => "RESTART_PROGRAM",
        "SHUTDOWN_PROGRAM" => "SHUTDOWN_PROGRAM",
        _ => "UNKNOWN",
    }
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
