// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! wardd: the host/service monitoring scheduler daemon.
//!
//! Architecture (spec.md §4.5, §5):
//! - `Scheduler` owns the event queue, the reaper, and the notification
//!   engine; every tick of this loop either sleeps until the next due
//!   event, drains a finished probe out of the reaper, or applies an
//!   external command.
//! - External commands arrive on a FIFO (spec.md §6) tailed by a
//!   background task and fed to the scheduler over a channel so the FIFO
//!   read never blocks the main loop.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ward_core::{Clock, SystemClock};
use ward_daemon::{DaemonError, ExecutorRegistry, Scheduler, SchedulerConfig};
use ward_macros::UserMacros;
use ward_registry::RegistrySeed;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("wardd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {}
        }
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run())
}

fn print_help() {
    println!("wardd {}", env!("CARGO_PKG_VERSION"));
    println!("Host/service monitoring scheduler daemon.");
    println!();
    println!("USAGE:");
    println!("    wardd [--seed <path>] [--command-file <path>] [--tz <name>]");
    println!();
    println!("ENV:");
    println!("    WARD_SEED          path to the registry seed JSON (default: ward-seed.json)");
    println!("    WARD_COMMAND_FILE  path to the external-command FIFO (spec.md §6)");
    println!("    WARD_TZ            IANA timezone name (default: UTC)");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // SIGPIPE defaults to terminating the process in a plain tokio
    // binary; spec.md §6 requires it be ignored so a dead connector pipe
    // surfaces as an `ExecError`, not a killed daemon. Registering (and
    // simply never polling) a tokio signal handle overrides the default
    // disposition without reaching for raw libc.
    let _sigpipe_guard = signal(SignalKind::pipe())?;

    let seed_path = std::env::var("WARD_SEED").unwrap_or_else(|_| "ward-seed.json".to_string());
    let command_file = std::env::var("WARD_COMMAND_FILE").ok().map(PathBuf::from);
    let tz = std::env::var("WARD_TZ")
        .ok()
        .and_then(|s| Tz::from_str(&s).ok())
        .unwrap_or(Tz::UTC);

    info!(seed = %seed_path, ?command_file, %tz, "starting wardd");

    let registry = RegistrySeed::load(&seed_path)
        .map_err(DaemonError::from)?
        .into_registry()
        .map_err(DaemonError::from)?
        .shared();

    let user_macros = match std::env::var("WARD_RESOURCE_FILE") {
        Ok(path) => ward_macros::load_resource_file(&path).map_err(DaemonError::from)?,
        Err(_) => UserMacros::default(),
    };

    let clock = SystemClock;
    let mut config = SchedulerConfig::default();
    config.tz = tz;
    let executors = ExecutorRegistry::new(clock.clone());
    let notify_executor = executors.resolve(&ward_core::Command::new("__notify__", "true"));

    let scheduler = Scheduler::new(registry, clock.clone(), config, executors, notify_executor, user_macros);
    scheduler.bootstrap();

    // `_tx` is kept alive for the whole loop even when no command file is
    // configured, so `rx.recv()` parks instead of immediately observing a
    // closed channel and busy-looping the `select!` below.
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let _tx = tx.clone();
    if let Some(path) = command_file {
        tokio::spawn(tail_command_file(path, tx));
    }

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sighup = signal(SignalKind::hangup())?;

    info!("wardd ready");
    println!("READY");

    loop {
        if scheduler.is_shutting_down() {
            info!("shutdown requested; draining remaining in-flight checks");
            break;
        }

        let sleep_for = match scheduler.next_deadline() {
            Some(deadline) => {
                let now = clock.now();
                Duration::from_secs(deadline.saturating_sub(now).max(0) as u64)
            }
            None => Duration::from_secs(3600),
        }
        .min(Duration::from_secs(5));

        tokio::select! {
            _ = tokio::time::sleep(sleep_for) => {}
            line = rx.recv() => {
                if let Some(line) = line {
                    scheduler.feed_external_commands(&line);
                }
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received");
                scheduler.request_shutdown();
            }
            _ = sigint.recv() => {
                info!("SIGINT received");
                scheduler.request_shutdown();
            }
            _ = sighup.recv() => {
                info!("SIGHUP received; ward-daemon reloads only its own runtime settings (spec.md §1)");
            }
        }

        scheduler.drain_reaper();
        scheduler.process_due_events().await;
    }

    info!("wardd shut down cleanly");
    Ok(())
}

/// Tails an external-command FIFO (spec.md §4.7/§6) line by line, handing
/// complete `[<ts>] VERB;...` records to the scheduler over `tx`. A FIFO
/// reopens after every writer closes it, the way a named pipe behaves
/// under repeated `ecm` invocations, so EOF just means "reopen and keep
/// tailing" rather than "stop".
async fn tail_command_file(path: PathBuf, tx: tokio::sync::mpsc::UnboundedSender<String>) {
    loop {
        let file = match tokio::fs::File::open(&path).await {
            Ok(f) => f,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to open external command file; retrying");
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };
        let mut lines = BufReader::new(file).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(format!("{line}\n")).is_err() {
                        return;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    error!(path = %path.display(), error = %err, "error tailing external command file");
                    break;
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}
