// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The external-command verb set (X, spec.md §4.7/§6): a closed list of
//! `VERB;arg;arg;…` records. Args containing `;` aren't supported — a
//! historical restriction this format inherits rather than one we chose.

use ward_core::AckType;

/// One parsed external-command record, with its args already typed and
/// validated. Applying it to the registry/queue is the caller's job
/// (`ward-daemon`'s event loop) — this crate only knows how to read the
/// wire format.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalCommand {
    ProcessHostCheckResult {
        host_name: String,
        exit_code: i32,
        output: String,
    },
    ProcessServiceCheckResult {
        host_name: String,
        service_description: String,
        exit_code: i32,
        output: String,
    },
    AcknowledgeHostProblem {
        host_name: String,
        sticky: bool,
        notify: bool,
        persistent: bool,
        author: String,
        comment: String,
    },
    AcknowledgeSvcProblem {
        host_name: String,
        service_description: String,
        sticky: bool,
        notify: bool,
        persistent: bool,
        author: String,
        comment: String,
    },
    RemoveHostAcknowledgement {
        host_name: String,
    },
    RemoveSvcAcknowledgement {
        host_name: String,
        service_description: String,
    },
    ScheduleHostDowntime {
        host_name: String,
        start_time: i64,
        end_time: i64,
        fixed: bool,
        trigger_id: u64,
        duration_sec: i64,
        author: String,
        comment: String,
    },
    ScheduleSvcDowntime {
        host_name: String,
        service_description: String,
        start_time: i64,
        end_time: i64,
        fixed: bool,
        trigger_id: u64,
        duration_sec: i64,
        author: String,
        comment: String,
    },
    DelHostDowntime {
        downtime_id: u64,
    },
    DelSvcDowntime {
        downtime_id: u64,
    },
    ChangeCustomHostVar {
        host_name: String,
        var_name: String,
        value: String,
    },
    ChangeCustomSvcVar {
        host_name: String,
        service_description: String,
        var_name: String,
        value: String,
    },
    ChangeCustomContactVar {
        contact_name: String,
        var_name: String,
        value: String,
    },
    EnableNotifications,
    DisableNotifications,
    ScheduleHostCheck {
        host_name: String,
        check_time: i64,
    },
    ScheduleSvcCheck {
        host_name: String,
        service_description: String,
        check_time: i64,
    },
    RestartProgram,
    ShutdownProgram,
}

impl ExternalCommand {
    pub fn verb(&self) -> &'static str {
        match self {
            ExternalCommand::ProcessHostCheckResult { .. } => "PROCESS_HOST_CHECK_RESULT",
            ExternalCommand::ProcessServiceCheckResult { .. } => "PROCESS_SERVICE_CHECK_RESULT",
            ExternalCommand::AcknowledgeHostProblem { .. } => "ACKNOWLEDGE_HOST_PROBLEM",
            ExternalCommand::AcknowledgeSvcProblem { .. } => "ACKNOWLEDGE_SVC_PROBLEM",
            ExternalCommand::RemoveHostAcknowledgement { .. } => "REMOVE_HOST_ACKNOWLEDGEMENT",
            ExternalCommand::RemoveSvcAcknowledgement { .. } => "REMOVE_SVC_ACKNOWLEDGEMENT",
            ExternalCommand::ScheduleHostDowntime { .. } => "SCHEDULE_HOST_DOWNTIME",
            ExternalCommand::ScheduleSvcDowntime { .. } => "SCHEDULE_SVC_DOWNTIME",
            ExternalCommand::DelHostDowntime { .. } => "DEL_HOST_DOWNTIME",
            ExternalCommand::DelSvcDowntime { .. } => "DEL_SVC_DOWNTIME",
            ExternalCommand::ChangeCustomHostVar { .. } => "CHANGE_CUSTOM_HOST_VAR",
            ExternalCommand::ChangeCustomSvcVar { .. } => "CHANGE_CUSTOM_SVC_VAR",
            ExternalCommand::ChangeCustomContactVar { .. } => "CHANGE_CUSTOM_CONTACT_VAR",
            ExternalCommand::EnableNotifications => "ENABLE_NOTIFICATIONS",
            ExternalCommand::DisableNotifications => "DISABLE_NOTIFICATIONS",
            ExternalCommand::ScheduleHostCheck { .. } => "SCHEDULE_HOST_CHECK",
            ExternalCommand::ScheduleSvcCheck { .. } => "SCHEDULE_SVC_CHECK",
            ExternalCommand::RestartProgram => "RESTART_PROGRAM",
            ExternalCommand::ShutdownProgram => "SHUTDOWN_PROGRAM",
        }
    }

    /// Renders back to `VERB;arg;arg;…` (no `[<ts>] ` prefix — callers that
    /// need the full wire record, e.g. a future-timestamped deferred
    /// command, prepend that themselves). The inverse of [`crate::parse::parse_line`]'s
    /// argument ordering.
    pub fn to_command_line(&self) -> String {
        fn bit(b: bool) -> &'static str {
            if b {
                "1"
            } else {
                "0"
            }
        }
        let verb = self.verb();
        match self {
            ExternalCommand::ProcessHostCheckResult { host_name, exit_code, output } => {
                format!("{verb};{host_name};{exit_code};{output}")
            }
            ExternalCommand::ProcessServiceCheckResult { host_name, service_description, exit_code, output } => {
                format!("{verb};{host_name};{service_description};{exit_code};{output}")
            }
            ExternalCommand::AcknowledgeHostProblem { host_name, sticky, notify, persistent, author, comment } => {
                format!("{verb};{host_name};{};{};{};{author};{comment}", bit(*sticky), bit(*notify), bit(*persistent))
            }
            ExternalCommand::AcknowledgeSvcProblem { host_name, service_description, sticky, notify, persistent, author, comment } => {
                format!(
                    "{verb};{host_name};{service_description};{};{};{};{author};{comment}",
                    bit(*sticky), bit(*notify), bit(*persistent)
                )
            }
            ExternalCommand::RemoveHostAcknowledgement { host_name } => format!("{verb};{host_name}"),
            ExternalCommand::RemoveSvcAcknowledgement { host_name, service_description } => {
                format!("{verb};{host_name};{service_description}")
            }
            ExternalCommand::ScheduleHostDowntime {
                host_name, start_time, end_time, fixed, trigger_id, duration_sec, author, comment,
            } => {
                format!(
                    "{verb};{host_name};{start_time};{end_time};{};{trigger_id};{duration_sec};{author};{comment}",
                    bit(*fixed)
                )
            }
            ExternalCommand::ScheduleSvcDowntime {
                host_name, service_description, start_time, end_time, fixed, trigger_id, duration_sec, author, comment,
            } => {
                format!(
                    "{verb};{host_name};{service_description};{start_time};{end_time};{};{trigger_id};{duration_sec};{author};{comment}",
                    bit(*fixed)
                )
            }
            ExternalCommand::DelHostDowntime { downtime_id } => format!("{verb};{downtime_id}"),
            ExternalCommand::DelSvcDowntime { downtime_id } => format!("{verb};{downtime_id}"),
            ExternalCommand::ChangeCustomHostVar { host_name, var_name, value } => {
                format!("{verb};{host_name};{var_name};{value}")
            }
            ExternalCommand::ChangeCustomSvcVar { host_name, service_description, var_name, value } => {
                format!("{verb};{host_name};{service_description};{var_name};{value}")
            }
            ExternalCommand::ChangeCustomContactVar { contact_name, var_name, value } => {
                format!("{verb};{contact_name};{var_name};{value}")
            }
            ExternalCommand::EnableNotifications | ExternalCommand::DisableNotifications => verb.to_string(),
            ExternalCommand::ScheduleHostCheck { host_name, check_time } => format!("{verb};{host_name};{check_time}"),
            ExternalCommand::ScheduleSvcCheck { host_name, service_description, check_time } => {
                format!("{verb};{host_name};{service_description};{check_time}")
            }
            ExternalCommand::RestartProgram | ExternalCommand::ShutdownProgram => verb.to_string(),
        }
    }
}

/// `ACKNOWLEDGE_*` sticky flag, shared between the host and service forms.
pub(crate) fn ack_type(sticky: bool) -> AckType {
    if sticky {
        AckType::Sticky
    } else {
        AckType::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_line;

    fn roundtrip(cmd: ExternalCommand) {
        let line = format!("[1700000000] {}", cmd.to_command_line());
        let (ts, parsed) = parse_line(&line).unwrap();
        assert_eq!(ts, 1_700_000_000);
        assert_eq!(parsed, cmd);
    }

    #[test]
    fn process_service_check_result_roundtrips() {
        roundtrip(ExternalCommand::ProcessServiceCheckResult {
            host_name: "web1".to_string(),
            service_description: "http".to_string(),
            exit_code: 2,
            output: "disk at 99%".to_string(),
        });
    }

    #[test]
    fn schedule_host_downtime_roundtrips() {
        roundtrip(ExternalCommand::ScheduleHostDowntime {
            host_name: "web1".to_string(),
            start_time: 100,
            end_time: 200,
            fixed: true,
            trigger_id: 0,
            duration_sec: 100,
            author: "alice".to_string(),
            comment: "maintenance".to_string(),
        });
    }

    #[test]
    fn zero_arity_verbs_roundtrip() {
        roundtrip(ExternalCommand::EnableNotifications);
        roundtrip(ExternalCommand::DisableNotifications);
        roundtrip(ExternalCommand::RestartProgram);
        roundtrip(ExternalCommand::ShutdownProgram);
    }
}
