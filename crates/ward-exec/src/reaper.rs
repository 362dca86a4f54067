// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The reaper (M1, spec.md §4.2): bridges the worker pool back to the
//! single-threaded event loop. Workers never touch L4 directly — they
//! fill in a `PreparedResult` shell and hand it back through here.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use ward_core::{CheckResult, CheckSource, HostId, ServiceId};

use crate::CommandExecutor;

/// What a prepared result will eventually be delivered to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CheckTarget {
    Host(HostId),
    Service(ServiceId),
}

/// A check in flight: allocated when `run_async` is called, filled in
/// once the probe finishes. Spec.md §4.2: "a `PreparedResult` shell
/// (latency, start time, owner reference) is placed in `waiting`".
#[derive(Debug, Clone)]
pub struct PreparedResult {
    pub command_id: u64,
    pub target: CheckTarget,
    pub source: CheckSource,
    pub start_time: i64,
    pub result: Option<CheckResult>,
}

/// Holds in-flight and completed-but-undelivered probe results. `waiting`
/// is written by `prepare`/`finished` (called from worker tasks);
/// `to_reap` is drained by the main loop via `reap()`.
#[derive(Default)]
pub struct Reaper {
    waiting: Mutex<HashMap<u64, PreparedResult>>,
    to_reap: Mutex<VecDeque<PreparedResult>>,
    next_id: AtomicU64,
    discarded: AtomicU64,
}

impl Reaper {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Allocates a command id and stashes a shell entry in `waiting`.
    pub fn prepare(&self, target: CheckTarget, source: CheckSource, start_time: i64) -> u64 {
        let command_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.waiting.lock().insert(
            command_id,
            PreparedResult {
                command_id,
                target,
                source,
                start_time,
                result: None,
            },
        );
        command_id
    }

    /// Moves a waiting entry to `to_reap` once its probe finishes.
    /// A missing entry means `forget` already discarded it (reload raced
    /// with the probe) — counted, not treated as an error.
    pub fn finished(&self, command_id: u64, result: CheckResult) {
        let prepared = self.waiting.lock().remove(&command_id);
        match prepared {
            Some(mut prepared) => {
                prepared.result = Some(result);
                self.to_reap.lock().push_back(prepared);
            }
            None => {
                self.discarded.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(command_id, "finished() for an unknown/forgotten command id");
            }
        }
    }

    /// Atomically swaps out the completed-result queue, per spec.md §4.2
    /// step 2, so producers can keep pushing while the main loop drains.
    pub fn reap(&self) -> Vec<PreparedResult> {
        let mut scratch = VecDeque::new();
        std::mem::swap(&mut *self.to_reap.lock(), &mut scratch);
        scratch.into_iter().collect()
    }

    /// Drops any waiting or unreaped entries referencing `target`, so a
    /// reload-time deletion never hands a result to a dead object.
    pub fn forget(&self, target: &CheckTarget) {
        self.waiting.lock().retain(|_, p| &p.target != target);
        self.to_reap.lock().retain(|p| &p.target != target);
    }

    /// Count of `finished()` calls that arrived for an id no longer
    /// tracked (spec.md §4.2's "discarded, warning counter incremented").
    pub fn discarded_count(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.lock().len()
    }

    /// Dispatches `line` through `executor` on the tokio runtime, wiring
    /// its outcome back into this reaper. Returns the allocated command
    /// id immediately, matching `run_async`'s contract (spec.md §4.2).
    pub fn dispatch<E>(
        self: &Arc<Self>,
        executor: Arc<E>,
        target: CheckTarget,
        source: CheckSource,
        line: String,
        timeout: std::time::Duration,
        now: i64,
    ) -> u64
    where
        E: CommandExecutor + 'static,
    {
        let command_id = self.prepare(target, source, now);
        let reaper = Arc::clone(self);
        tokio::spawn(async move {
            let result = executor.run_sync(&line, timeout).await;
            reaper.finished(command_id, result);
        });
        command_id
    }
}
