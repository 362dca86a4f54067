// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wardctl acknowledge` / `wardctl unacknowledge` — ACKNOWLEDGE_*_PROBLEM
//! and REMOVE_*_ACKNOWLEDGEMENT (spec.md §6).

use std::path::Path;

use anyhow::Result;
use clap::Args;
use ward_router::ExternalCommand;

use crate::command_file;

#[derive(Args)]
pub struct AcknowledgeArgs {
    pub host: String,
    /// Service description; omit to acknowledge the host problem itself
    #[arg(long)]
    pub service: Option<String>,
    /// Acknowledgement persists through the next hard-state change
    #[arg(long)]
    pub sticky: bool,
    /// Suppress the ACKNOWLEDGEMENT notification this would otherwise send
    #[arg(long)]
    pub no_notify: bool,
    #[arg(long)]
    pub persistent: bool,
    #[arg(long, default_value = "wardctl")]
    pub author: String,
    #[arg(long, default_value = "")]
    pub comment: String,
}

#[derive(Args)]
pub struct UnacknowledgeArgs {
    pub host: String,
    #[arg(long)]
    pub service: Option<String>,
}

pub fn handle_acknowledge(args: AcknowledgeArgs, command_file: &Path) -> Result<()> {
    let cmd = match args.service {
        Some(service_description) => ExternalCommand::AcknowledgeSvcProblem {
            host_name: args.host,
            service_description,
            sticky: args.sticky,
            notify: !args.no_notify,
            persistent: args.persistent,
            author: args.author,
            comment: args.comment,
        },
        None => ExternalCommand::AcknowledgeHostProblem {
            host_name: args.host,
            sticky: args.sticky,
            notify: !args.no_notify,
            persistent: args.persistent,
            author: args.author,
            comment: args.comment,
        },
    };
    command_file::submit(command_file, &cmd)
}

pub fn handle_unacknowledge(args: UnacknowledgeArgs, command_file: &Path) -> Result<()> {
    let cmd = match args.service {
        Some(service_description) => ExternalCommand::RemoveSvcAcknowledgement {
            host_name: args.host,
            service_description,
        },
        None => ExternalCommand::RemoveHostAcknowledgement { host_name: args.host },
    };
    command_file::submit(command_file, &cmd)
}
