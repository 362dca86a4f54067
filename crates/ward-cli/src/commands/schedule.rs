// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wardctl schedule-check` — SCHEDULE_{HOST,SVC}_CHECK (spec.md §6): force
//! a check to run at a specific time instead of waiting for its normal
//! interval.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use ward_router::ExternalCommand;

use crate::command_file;

#[derive(Args)]
pub struct ScheduleCheckArgs {
    pub host: String,
    #[arg(long)]
    pub service: Option<String>,
    #[arg(long)]
    pub at: i64,
}

pub fn handle(args: ScheduleCheckArgs, command_file: &Path) -> Result<()> {
    let cmd = match args.service {
        Some(service_description) => ExternalCommand::ScheduleSvcCheck {
            host_name: args.host,
            service_description,
            check_time: args.at,
        },
        None => ExternalCommand::ScheduleHostCheck { host_name: args.host, check_time: args.at },
    };
    command_file::submit(command_file, &cmd)
}
