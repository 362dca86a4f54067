// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime knobs for the event loop. Deliberately narrow: spec.md §1
//! excludes configuration-file parsing and the applier layer that would
//! turn an object-config directory into a `Registry` — this crate only
//! consumes that output (a JSON registry seed) and the handful of
//! scheduler-level intervals below.

use std::time::Duration;

use chrono_tz::Tz;

/// How stale a check's `next_check` must be before the orphan sweep
/// (spec.md "Supplemented features": 2x(check_interval+latency)) gives up
/// waiting on it and reschedules a fresh one.
pub const ORPHAN_STALENESS_MULTIPLIER: i64 = 2;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Upper bound on how long the loop sleeps with nothing due, so an
    /// external command arriving via the channel is never starved.
    pub max_poll_interval: Duration,
    /// Timeout applied to every dispatched check/notification command.
    pub command_timeout: Duration,
    /// How often `OrphanCheckSweep` re-fires (spec.md supplemented
    /// feature: a dedicated periodic sweep, not folded into every tick).
    pub orphan_check_interval: Duration,
    /// How often `StatusSave` re-fires.
    pub status_save_interval: Duration,
    /// How often `ReloadConfig`'s log-rotation companion re-fires (the
    /// daemon doesn't reload config, per spec.md §1, but it does rotate
    /// its own log file on the same cadence the teacher's daemon checks
    /// log size at startup).
    pub log_rotation_interval: Duration,
    /// Timezone the timeperiod evaluator and macro expander run in.
    pub tz: Tz,
    /// How far past `now` `next_valid_time` is allowed to search before
    /// the loop gives up and logs instead of looping forever on a
    /// timeperiod with no valid time ever (mirrors `ward-time`'s own
    /// internal search horizon).
    pub timeperiod_search_horizon: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_poll_interval: Duration::from_secs(5),
            command_timeout: Duration::from_secs(60),
            orphan_check_interval: Duration::from_secs(15 * 60),
            status_save_interval: Duration::from_secs(60),
            log_rotation_interval: Duration::from_secs(60 * 60),
            tz: Tz::UTC,
            timeperiod_search_horizon: Duration::from_secs(370 * 24 * 60 * 60),
        }
    }
}
