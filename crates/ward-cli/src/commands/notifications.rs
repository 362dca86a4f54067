// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wardctl notifications enable|disable` — the global notification
//! toggle (spec.md §4.4 step 1, §6 ENABLE/DISABLE_NOTIFICATIONS).

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;
use ward_router::ExternalCommand;

use crate::command_file;

#[derive(Subcommand)]
pub enum NotificationsCommand {
    Enable,
    Disable,
}

pub fn handle(command: NotificationsCommand, command_file: &Path) -> Result<()> {
    let cmd = match command {
        NotificationsCommand::Enable => ExternalCommand::EnableNotifications,
        NotificationsCommand::Disable => ExternalCommand::DisableNotifications,
    };
    command_file::submit(command_file, &cmd)
}
