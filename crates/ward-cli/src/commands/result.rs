// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wardctl submit-result` — PROCESS_{HOST,SERVICE}_CHECK_RESULT, the
//! passive-check injection path (spec.md §4.7/§6).

use std::path::Path;

use anyhow::Result;
use clap::Args;
use ward_router::ExternalCommand;

use crate::command_file;

#[derive(Args)]
pub struct SubmitResultArgs {
    pub host: String,
    #[arg(long)]
    pub service: Option<String>,
    /// 0/1/2/3 for a service (ok/warning/critical/unknown); any nonzero
    /// value means down for a host
    #[arg(long = "exit-code")]
    pub exit_code: i32,
    pub output: String,
}

pub fn handle(args: SubmitResultArgs, command_file: &Path) -> Result<()> {
    let cmd = match args.service {
        Some(service_description) => ExternalCommand::ProcessServiceCheckResult {
            host_name: args.host,
            service_description,
            exit_code: args.exit_code,
            output: args.output,
        },
        None => ExternalCommand::ProcessHostCheckResult {
            host_name: args.host,
            exit_code: args.exit_code,
            output: args.output,
        },
    };
    command_file::submit(command_file, &cmd)
}
