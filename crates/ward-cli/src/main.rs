// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! wardctl - submits external commands (spec.md §4.7/§6) to a running
//! `wardd` by appending `[<ts>] VERB;…` records to its command file.

mod command_file;
mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::acknowledge::{self, AcknowledgeArgs, UnacknowledgeArgs};
use commands::downtime::{self, DowntimeArgs};
use commands::notifications::{self, NotificationsCommand};
use commands::result::{self, SubmitResultArgs};
use commands::schedule::{self, ScheduleCheckArgs};

#[derive(Parser)]
#[command(name = "wardctl", version, about = "Control a running wardd monitoring daemon")]
struct Cli {
    /// Path to wardd's external command file (defaults to $WARD_COMMAND_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    command_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inject a passive check result
    SubmitResult(SubmitResultArgs),
    /// Acknowledge a current problem
    Acknowledge(AcknowledgeArgs),
    /// Remove an existing acknowledgement
    Unacknowledge(UnacknowledgeArgs),
    /// Schedule or cancel a downtime window
    Downtime(DowntimeArgs),
    /// Force a check to run at a specific time
    ScheduleCheck(ScheduleCheckArgs),
    /// Toggle the global notification switch
    Notifications {
        #[command(subcommand)]
        command: NotificationsCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command_file = cli
        .command_file
        .or_else(|| std::env::var_os("WARD_COMMAND_FILE").map(PathBuf::from))
        .context("no command file given: pass --command-file or set WARD_COMMAND_FILE")?;

    match cli.command {
        Commands::SubmitResult(args) => result::handle(args, &command_file),
        Commands::Acknowledge(args) => acknowledge::handle_acknowledge(args, &command_file),
        Commands::Unacknowledge(args) => acknowledge::handle_unacknowledge(args, &command_file),
        Commands::Downtime(args) => downtime::handle(args.command, &command_file),
        Commands::ScheduleCheck(args) => schedule::handle(args, &command_file),
        Commands::Notifications { command } => notifications::handle(command, &command_file),
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
