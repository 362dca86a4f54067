// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wardctl downtime schedule|cancel` — SCHEDULE_{HOST,SVC}_DOWNTIME and
//! DEL_{HOST,SVC}_DOWNTIME (spec.md §6).

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};
use ward_router::ExternalCommand;

use crate::command_file;

#[derive(Args)]
pub struct DowntimeArgs {
    #[command(subcommand)]
    pub command: DowntimeCommand,
}

#[derive(Subcommand)]
pub enum DowntimeCommand {
    /// Schedule a downtime window for a host or one of its services
    Schedule {
        host: String,
        /// Service description; omit to downtime the host itself
        #[arg(long)]
        service: Option<String>,
        #[arg(long)]
        start: i64,
        #[arg(long)]
        end: i64,
        /// Flexible downtime triggers only once a problem is observed in
        /// the window instead of covering it unconditionally
        #[arg(long)]
        flexible: bool,
        /// Downtime id that must start first before this one takes effect
        #[arg(long, default_value_t = 0)]
        trigger: u64,
        #[arg(long = "duration", default_value_t = 0)]
        duration_sec: i64,
        #[arg(long, default_value = "wardctl")]
        author: String,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Cancel a pending or in-effect downtime by id
    Cancel {
        id: u64,
        /// Must be set for a service downtime id; the router distinguishes
        /// host vs. service downtimes by which verb submitted them
        #[arg(long)]
        service: bool,
    },
}

pub fn handle(command: DowntimeCommand, command_file: &Path) -> Result<()> {
    let cmd = match command {
        DowntimeCommand::Schedule { host, service, start, end, flexible, trigger, duration_sec, author, comment } => {
            match service {
                Some(service_description) => ExternalCommand::ScheduleSvcDowntime {
                    host_name: host,
                    service_description,
                    start_time: start,
                    end_time: end,
                    fixed: !flexible,
                    trigger_id: trigger,
                    duration_sec,
                    author,
                    comment,
                },
                None => ExternalCommand::ScheduleHostDowntime {
                    host_name: host,
                    start_time: start,
                    end_time: end,
                    fixed: !flexible,
                    trigger_id: trigger,
                    duration_sec,
                    author,
                    comment,
                },
            }
        }
        DowntimeCommand::Cancel { id, service } => {
            if service {
                ExternalCommand::DelSvcDowntime { downtime_id: id }
            } else {
                ExternalCommand::DelHostDowntime { downtime_id: id }
            }
        }
    };
    command_file::submit(command_file, &cmd)
}
