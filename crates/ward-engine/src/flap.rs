// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flap detection (spec.md §4.3 step 5). Weighting is the historical
//! Nagios exponential scheme: each bucket's contribution is weighted by
//! its recency, so the most recent checks dominate the percentage even
//! though the full `CHECK_STATS_BUCKETS`-wide history contributes.

use ward_core::host::{StateHistory, CHECK_STATS_BUCKETS};

/// Most recent entries are weighted most heavily; `1.0` would weight
/// every bucket identically, `0.0` would count only the newest one.
pub const WEIGHTING_FACTOR: f64 = 0.8;

/// Result of re-evaluating flap state after appending a new check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlapTransition {
    /// No change to the flapping flag.
    None,
    /// Crossed `high_flap_threshold` while not previously flapping.
    Started,
    /// Fell to or below `low_flap_threshold` while flapping.
    Stopped,
}

/// The weighted state-change percentage over `history`, per spec.md
/// §4.3/§9: entries toward the end of the (oldest-first) ring count for
/// more than entries toward the start.
pub fn weighted_percent_change(history: &StateHistory) -> f64 {
    let n = history.len();
    if n < 2 {
        return 0.0;
    }
    let mut curved_changes = 0.0;
    for (x, changed) in history.iter().enumerate() {
        if changed {
            let recency = (x as f64 + 1.0) / n as f64;
            curved_changes += recency * WEIGHTING_FACTOR + (1.0 - WEIGHTING_FACTOR);
        }
    }
    (curved_changes * 100.0) / (n as f64 - 1.0)
}

/// Computes the current percentage and decides whether this check
/// flips the flapping flag, given the object's configured thresholds
/// and its flag before this check.
pub fn evaluate(history: &StateHistory, is_flapping: bool, low_threshold: f64, high_threshold: f64) -> (f64, FlapTransition) {
    let pct = weighted_percent_change(history);
    let transition = if !is_flapping && pct >= high_threshold {
        FlapTransition::Started
    } else if is_flapping && pct <= low_threshold {
        FlapTransition::Stopped
    } else {
        FlapTransition::None
    };
    (pct, transition)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(pattern: &[bool]) -> StateHistory {
        let mut h = StateHistory::default();
        for &changed in pattern {
            h.push(changed);
        }
        h
    }

    #[test]
    fn stable_history_has_zero_percent_change() {
        let history = history_of(&[false; CHECK_STATS_BUCKETS]);
        assert_eq!(weighted_percent_change(&history), 0.0);
    }

    #[test]
    fn constantly_alternating_history_crosses_high_threshold() {
        let pattern: Vec<bool> = (0..CHECK_STATS_BUCKETS).map(|i| i % 2 == 0).collect();
        let history = history_of(&pattern);
        let pct = weighted_percent_change(&history);
        assert!(pct > 20.0, "expected flapping-level percentage, got {pct}");
    }

    #[test]
    fn recent_changes_weigh_more_than_old_ones() {
        let mut early_changes = vec![false; CHECK_STATS_BUCKETS];
        early_changes[1] = true;
        early_changes[2] = true;
        let mut late_changes = vec![false; CHECK_STATS_BUCKETS];
        late_changes[CHECK_STATS_BUCKETS - 1] = true;
        late_changes[CHECK_STATS_BUCKETS - 2] = true;

        let early_pct = weighted_percent_change(&history_of(&early_changes));
        let late_pct = weighted_percent_change(&history_of(&late_changes));
        assert!(late_pct > early_pct);
    }

    #[test]
    fn evaluate_starts_flapping_once_high_threshold_crossed() {
        let pattern: Vec<bool> = (0..CHECK_STATS_BUCKETS).map(|i| i % 2 == 0).collect();
        let history = history_of(&pattern);
        let (_, transition) = evaluate(&history, false, 5.0, 20.0);
        assert_eq!(transition, FlapTransition::Started);
    }

    #[test]
    fn evaluate_stops_flapping_once_low_threshold_reached() {
        let history = history_of(&[false; CHECK_STATS_BUCKETS]);
        let (_, transition) = evaluate(&history, true, 5.0, 20.0);
        assert_eq!(transition, FlapTransition::Stopped);
    }
}
