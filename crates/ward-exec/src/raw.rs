// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The raw fork-exec executor (spec.md §4.2): runs an already
//! macro-expanded command line under `sh -c`, collecting output until
//! exit or timeout.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use ward_core::{CheckResult, CheckSource, Clock};

use crate::CommandExecutor;

/// Executes commands via a fresh `sh -c` fork-exec per call. No shell
/// wrapping beyond that: plugin exit codes 1/2/3 are meaningful states,
/// not shell errors, so this deliberately skips `set -euo pipefail`.
#[derive(Clone)]
pub struct RawExecutor<C: Clock> {
    clock: C,
}

impl<C: Clock> RawExecutor<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl<C: Clock + 'static> CommandExecutor for RawExecutor<C> {
    async fn run_sync(&self, line: &str, timeout: Duration) -> CheckResult {
        let start_time = self.clock.now();
        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c").arg(line).stdin(Stdio::null());

        let outcome = tokio::time::timeout(timeout, cmd.output()).await;
        let finish_time = self.clock.now();

        match outcome {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                let (plugin_output, long_plugin_output, perfdata) = parse_plugin_output(&stdout);
                let plugin_output = if plugin_output.is_empty() && !stderr.is_empty() {
                    stderr.trim().to_string()
                } else {
                    plugin_output
                };
                CheckResult {
                    source: CheckSource::Active,
                    exit_code: output.status.code(),
                    plugin_output,
                    long_plugin_output,
                    perfdata,
                    start_time,
                    finish_time,
                    early_timeout: false,
                }
            }
            Ok(Err(io_err)) => {
                tracing::error!(%line, error = %io_err, "probe execution failed");
                CheckResult {
                    source: CheckSource::Active,
                    exit_code: None,
                    plugin_output: format!("(Unable to execute command: {io_err})"),
                    long_plugin_output: String::new(),
                    perfdata: String::new(),
                    start_time,
                    finish_time,
                    early_timeout: false,
                }
            }
            Err(_elapsed) => {
                tracing::warn!(%line, timeout_sec = timeout.as_secs(), "probe timed out");
                CheckResult::timed_out(CheckSource::Active, start_time, finish_time)
            }
        }
    }
}

/// Splits Nagios-plugin-style output into `(short, long, perfdata)`. The
/// first line's text before `|` is the short output; any further lines
/// are long output; perfdata segments after `|` on any line are
/// concatenated in order.
pub(crate) fn parse_plugin_output(stdout: &str) -> (String, String, String) {
    let mut lines = stdout.lines();
    let (first_text, first_perf) = split_perfdata(lines.next().unwrap_or(""));

    let mut long_lines = Vec::new();
    let mut perf_parts = Vec::new();
    if !first_perf.is_empty() {
        perf_parts.push(first_perf);
    }
    for line in lines {
        let (text, perf) = split_perfdata(line);
        if !text.is_empty() {
            long_lines.push(text);
        }
        if !perf.is_empty() {
            perf_parts.push(perf);
        }
    }

    (first_text.trim().to_string(), long_lines.join("\n"), perf_parts.join(" "))
}

fn split_perfdata(line: &str) -> (String, String) {
    match line.split_once('|') {
        Some((text, perf)) => (text.trim().to_string(), perf.trim().to_string()),
        None => (line.trim().to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_core::FakeClock;

    #[tokio::test]
    async fn exit_code_zero_with_perfdata_is_parsed() {
        let executor = RawExecutor::new(FakeClock::new(1000));
        let result = executor.run_sync("echo 'PING OK | rta=0.5ms'", Duration::from_secs(5)).await;
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.plugin_output, "PING OK");
        assert_eq!(result.perfdata, "rta=0.5ms");
        assert!(!result.early_timeout);
    }

    #[tokio::test]
    async fn long_output_lines_are_joined() {
        let executor = RawExecutor::new(FakeClock::new(1000));
        let result = executor
            .run_sync("printf 'short\\nline one\\nline two | x=1'", Duration::from_secs(5))
            .await;
        assert_eq!(result.plugin_output, "short");
        assert_eq!(result.long_plugin_output, "line one\nline two");
        assert_eq!(result.perfdata, "x=1");
    }

    #[tokio::test]
    async fn slow_command_times_out() {
        let executor = RawExecutor::new(FakeClock::new(1000));
        let result = executor.run_sync("sleep 2", Duration::from_millis(50)).await;
        assert!(result.early_timeout);
        assert!(result.exit_code.is_none());
    }

    #[tokio::test]
    async fn nonzero_exit_is_preserved_not_treated_as_error() {
        let executor = RawExecutor::new(FakeClock::new(1000));
        let result = executor.run_sync("echo CRITICAL; exit 2", Duration::from_secs(5)).await;
        assert_eq!(result.exit_code, Some(2));
    }
}
