// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The connector-backed executor (spec.md §4.2): keeps one long-lived
//! child process per configured connector and frames requests/responses
//! on its stdin/stdout instead of paying fork-exec cost per check.
//!
//! Framing is a 4-byte big-endian length prefix followed by a JSON body
//! — a minimal wire format, not the historical Merlin/NEB binary one,
//! since no external reader depends on byte-for-byte compatibility here.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin};
use tokio::sync::oneshot;
use ward_core::{CheckResult, CheckSource, Clock};

use crate::error::ExecError;
use crate::CommandExecutor;

#[derive(Debug, Serialize)]
struct ConnectorRequest<'a> {
    id: u64,
    line: &'a str,
}

#[derive(Debug, Deserialize)]
struct ConnectorResponse {
    id: u64,
    exit_code: Option<i32>,
    stdout: String,
    early_timeout: bool,
}

struct RunningChild {
    child: Child,
    stdin: ChildStdin,
}

/// One in-flight request's completion channel, keyed by request id.
type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<ConnectorResponse>>>>;

/// Owns the connector's child process. A single instance is shared
/// across every command dispatched to that connector — "Connector
/// process pipes are owned by the single worker assigned to that
/// connector" (spec.md §5).
pub struct ConnectorExecutor<C: Clock> {
    exec_line: String,
    startup_timeout: Duration,
    clock: C,
    running: tokio::sync::Mutex<Option<RunningChild>>,
    pending: PendingMap,
    next_request_id: AtomicU64,
}

impl<C: Clock + 'static> ConnectorExecutor<C> {
    pub fn new(exec_line: impl Into<String>, startup_timeout: Duration, clock: C) -> Arc<Self> {
        Arc::new(Self {
            exec_line: exec_line.into(),
            startup_timeout,
            clock,
            running: tokio::sync::Mutex::new(None),
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_request_id: AtomicU64::new(1),
        })
    }

    /// Spawns the child and starts its reader task if not already running.
    /// Lazily respawns after a prior death, per spec.md §4.2.
    async fn ensure_running(&self) -> Result<(), ExecError> {
        let mut guard = self.running.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        tracing::info!(exec_line = %self.exec_line, "spawning connector process");
        let mut child = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&self.exec_line)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(ExecError::Spawn)?;

        let stdin = child.stdin.take().ok_or(ExecError::NoPipe)?;
        let stdout = child.stdout.take().ok_or(ExecError::NoPipe)?;

        let pending = Arc::clone(&self.pending);
        tokio::spawn(read_loop(stdout, pending));

        *guard = Some(RunningChild { child, stdin });
        Ok(())
    }

    /// Fails every outstanding request and drops the child handle, so the
    /// next dispatch respawns from scratch.
    async fn mark_dead(&self) {
        let mut guard = self.running.lock().await;
        if let Some(mut running) = guard.take() {
            let _ = running.child.start_kill();
        }
        for (_, tx) in self.pending.lock().drain() {
            let _ = tx.send(ConnectorResponse {
                id: 0,
                exit_code: None,
                stdout: String::new(),
                early_timeout: false,
            });
        }
    }

    async fn send_request(&self, request_id: u64, line: &str) -> Result<(), ExecError> {
        let payload = serde_json::to_vec(&ConnectorRequest { id: request_id, line })
            .map_err(|e| ExecError::Framing(e.to_string()))?;
        let len = (payload.len() as u32).to_be_bytes();

        let mut guard = self.running.lock().await;
        let running = guard.as_mut().ok_or(ExecError::Died)?;
        running.stdin.write_all(&len).await.map_err(ExecError::Write)?;
        running.stdin.write_all(&payload).await.map_err(ExecError::Write)?;
        running.stdin.flush().await.map_err(ExecError::Write)
    }
}

async fn read_loop(mut stdout: tokio::process::ChildStdout, pending: PendingMap) {
    loop {
        let mut len_buf = [0u8; 4];
        if stdout.read_exact(&mut len_buf).await.is_err() {
            break;
        }
        let len = u32::from_be_bytes(len_buf) as usize;
        let mut body = vec![0u8; len];
        if stdout.read_exact(&mut body).await.is_err() {
            break;
        }
        let response: ConnectorResponse = match serde_json::from_slice(&body) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "malformed connector response frame, dropping");
                continue;
            }
        };
        if let Some(tx) = pending.lock().remove(&response.id) {
            let _ = tx.send(response);
        }
    }
    tracing::warn!("connector stdout closed, failing outstanding requests");
    for (_, tx) in pending.lock().drain() {
        let _ = tx.send(ConnectorResponse {
            id: 0,
            exit_code: None,
            stdout: String::new(),
            early_timeout: false,
        });
    }
}

#[async_trait]
impl<C: Clock + 'static> CommandExecutor for ConnectorExecutor<C> {
    async fn run_sync(&self, line: &str, timeout: Duration) -> CheckResult {
        let start_time = self.clock.now();

        if let Err(e) = self.ensure_running().await {
            tracing::error!(error = %e, "connector failed to start, request fails open");
            return dead_result(start_time, self.clock.now());
        }

        let request_id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(request_id, tx);

        if let Err(e) = self.send_request(request_id, line).await {
            tracing::error!(error = %e, "connector write failed");
            self.pending.lock().remove(&request_id);
            self.mark_dead().await;
            return dead_result(start_time, self.clock.now());
        }

        match tokio::time::timeout(timeout.max(self.startup_timeout), rx).await {
            Ok(Ok(response)) if response.id == request_id => {
                let finish_time = self.clock.now();
                let (plugin_output, long_plugin_output, perfdata) = crate::raw::parse_plugin_output(&response.stdout);
                if response.early_timeout {
                    CheckResult::timed_out(CheckSource::Active, start_time, finish_time)
                } else {
                    CheckResult {
                        source: CheckSource::Active,
                        exit_code: response.exit_code,
                        plugin_output,
                        long_plugin_output,
                        perfdata,
                        start_time,
                        finish_time,
                        early_timeout: false,
                    }
                }
            }
            Ok(Ok(_stale_or_dead)) => {
                // id == 0 sentinel from mark_dead/read_loop drain.
                self.mark_dead().await;
                dead_result(start_time, self.clock.now())
            }
            Ok(Err(_recv_dropped)) => {
                self.mark_dead().await;
                dead_result(start_time, self.clock.now())
            }
            Err(_elapsed) => {
                self.pending.lock().remove(&request_id);
                tracing::warn!(%line, "connector request timed out");
                CheckResult::timed_out(CheckSource::Active, start_time, self.clock.now())
            }
        }
    }
}

fn dead_result(start_time: i64, finish_time: i64) -> CheckResult {
    CheckResult {
        source: CheckSource::Active,
        exit_code: None,
        plugin_output: "(Connector process is not running)".to_string(),
        long_plugin_output: String::new(),
        perfdata: String::new(),
        start_time,
        finish_time,
        early_timeout: false,
    }
}
