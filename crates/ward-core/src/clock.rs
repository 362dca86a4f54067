// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction so the event loop and timeperiod evaluator never call
//! `SystemTime::now()` / `Utc::now()` directly — tests drive a `FakeClock`
//! instead, per the spec's requirement that contexts be instantiated fresh
//! per test case rather than touching global state.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of the current wallclock time, expressed as unix seconds.
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> i64;

    fn now_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.now(), 0).unwrap_or_else(Utc::now)
    }
}

/// Real wallclock.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// A clock a test can set and advance deterministically.
#[derive(Debug, Clone)]
pub struct FakeClock {
    inner: Arc<Mutex<i64>>,
}

impl FakeClock {
    pub fn new(start: i64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, t: i64) {
        *self.inner.lock() = t;
    }

    pub fn advance(&self, secs: i64) {
        *self.inner.lock() += secs;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> i64 {
        *self.inner.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_clock_advances() {
        let clock = FakeClock::new(1000);
        assert_eq!(clock.now(), 1000);
        clock.advance(500);
        assert_eq!(clock.now(), 1500);
        clock.set(0);
        assert_eq!(clock.now(), 0);
    }
}
