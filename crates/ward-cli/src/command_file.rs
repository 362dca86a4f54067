// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Writes one `[<ts>] VERB;arg;…` record (spec.md §4.7/§6) to the external
//! command file `wardd` tails. A real deployment points both sides at the
//! same named pipe; tests point them at a plain file instead, since a FIFO
//! write would block without a reader attached.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use ward_router::ExternalCommand;

pub fn submit(path: &Path, cmd: &ExternalCommand) -> Result<()> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    submit_at(path, cmd, now)
}

fn submit_at(path: &Path, cmd: &ExternalCommand, now: i64) -> Result<()> {
    let line = format!("[{now}] {}\n", cmd.to_command_line());
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("opening command file {}", path.display()))?;
    file.write_all(line.as_bytes())
        .with_context(|| format!("writing to command file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn submit_at_writes_one_bracketed_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commands.cmd");
        fs::write(&path, "").unwrap();

        submit_at(
            &path,
            &ExternalCommand::EnableNotifications,
            1_700_000_000,
        )
        .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "[1700000000] ENABLE_NOTIFICATIONS\n");
    }

    #[test]
    fn submit_at_appends_rather_than_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commands.cmd");
        fs::write(&path, "").unwrap();

        submit_at(&path, &ExternalCommand::EnableNotifications, 1).unwrap();
        submit_at(&path, &ExternalCommand::DisableNotifications, 2).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "[1] ENABLE_NOTIFICATIONS\n[2] DISABLE_NOTIFICATIONS\n");
    }
}
