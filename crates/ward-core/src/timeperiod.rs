// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timeperiod data shapes (L1, spec.md §3/§4.1). The evaluator algorithms
//! (`is_valid_time`, `next_valid_time`, `next_invalid_time`) live in the
//! `ward-time` crate, dispatched over the tagged `DateRangeKind` union
//! defined here — per spec.md §9's design note, the per-kind evaluator is
//! dispatched once in a single place rather than scattered across helpers.

use serde::{Deserialize, Serialize};

/// A `[start_sec, end_sec)` window within a day, `0 <= start <= end <= 86400`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_sec: u32,
    pub end_sec: u32,
}

impl TimeRange {
    pub fn new(start_sec: u32, end_sec: u32) -> Self {
        debug_assert!(start_sec <= end_sec && end_sec <= 86400);
        Self { start_sec, end_sec }
    }

    pub fn contains(&self, sec_of_day: u32) -> bool {
        sec_of_day >= self.start_sec && sec_of_day < self.end_sec
    }
}

/// The tagged union of date-range exception kinds, in the precedence order
/// spec.md §3 defines (calendar date highest, plain weekday lowest — weekday
/// is represented separately on `TimePeriod::weekdays`, not as a
/// `DateRangeKind` variant, since it has no date span of its own).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateRangeKind {
    /// `(y1,m1,d1) .. (y2,m2,d2)` inclusive, absolute calendar dates.
    CalendarDate {
        y1: i32,
        m1: u32,
        d1: u32,
        y2: i32,
        m2: u32,
        d2: u32,
    },
    /// `(m1,d1) .. (m2,d2)`, a specific day range within named months,
    /// recurring every year.
    SpecificMonthDate {
        m1: u32,
        d1: u32,
        m2: u32,
        d2: u32,
    },
    /// `(d1) .. (d2)`, a day-of-month range applying to every month.
    GenericMonthDate { d1: u32, d2: u32 },
    /// The `off1`th occurrence of `wd1` in month `m1` through the `off2`th
    /// occurrence of `wd2` in month `m2`. `off == -1` means "last weekday
    /// of the month".
    OffsetWeekdayOfSpecificMonth {
        m1: u32,
        wd1: u32,
        off1: i32,
        m2: u32,
        wd2: u32,
        off2: i32,
    },
    /// As above but the month is unspecified — applies to every month.
    OffsetWeekdayOfGenericMonth {
        wd1: u32,
        off1: i32,
        wd2: u32,
        off2: i32,
    },
}

impl DateRangeKind {
    /// Precedence rank; lower sorts first. Mirrors spec.md §3's ordering:
    /// calendar date > specific-month-date > generic-month-date >
    /// offset-weekday-of-specific-month > offset-weekday-of-generic-month.
    pub fn precedence(&self) -> u8 {
        match self {
            DateRangeKind::CalendarDate { .. } => 0,
            DateRangeKind::SpecificMonthDate { .. } => 1,
            DateRangeKind::GenericMonthDate { .. } => 2,
            DateRangeKind::OffsetWeekdayOfSpecificMonth { .. } => 3,
            DateRangeKind::OffsetWeekdayOfGenericMonth { .. } => 4,
        }
    }
}

/// A date-range exception: its kind, the timeranges it grants on matching
/// days, and an optional skip interval (days between effective
/// occurrences; `0` or `1` means every matching day is effective).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub kind: DateRangeKind,
    pub timeranges: Vec<TimeRange>,
    #[serde(default)]
    pub skip_interval: u32,
}

impl DateRange {
    pub fn new(kind: DateRangeKind, timeranges: Vec<TimeRange>) -> Self {
        Self {
            kind,
            timeranges,
            skip_interval: 0,
        }
    }

    pub fn with_skip(mut self, skip_interval: u32) -> Self {
        self.skip_interval = skip_interval;
        self
    }
}

/// ISO weekday index, 0 = Sunday .. 6 = Saturday (Nagios/Centreon
/// convention, not `chrono::Weekday`'s Monday-first numbering — the
/// evaluator converts at the boundary).
pub type WeekdaySlot = [Vec<TimeRange>; 7];

/// A named calendar predicate mapping a wallclock second to valid/invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub name: String,
    pub alias: String,
    /// Per-weekday timerange templates, Sunday-first.
    pub weekdays: WeekdaySlot,
    pub exceptions: Vec<DateRange>,
    /// Names of timeperiods whose valid times exclude this one's.
    pub exclusions: Vec<String>,
}

impl TimePeriod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: String::new(),
            weekdays: Default::default(),
            exceptions: Vec::new(),
            exclusions: Vec::new(),
        }
    }

    pub fn with_weekday(mut self, weekday: u8, ranges: Vec<TimeRange>) -> Self {
        self.weekdays[weekday as usize] = ranges;
        self
    }

    pub fn with_exception(mut self, range: DateRange) -> Self {
        self.exceptions.push(range);
        self
    }

    pub fn with_exclusion(mut self, name: impl Into<String>) -> Self {
        self.exclusions.push(name.into());
        self
    }

    /// A timeperiod valid at every second of every day (the common
    /// "24x7" default used when no check/notification period is
    /// configured).
    pub fn always() -> Self {
        let full_day = vec![TimeRange::new(0, 86400)];
        let mut tp = Self::new("24x7");
        tp.alias = "24 Hours A Day, 7 Days A Week".to_string();
        for d in 0..7 {
            tp.weekdays[d] = full_day.clone();
        }
        tp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_order_matches_spec() {
        let ranks = [
            DateRangeKind::CalendarDate {
                y1: 2024,
                m1: 1,
                d1: 1,
                y2: 2024,
                m2: 1,
                d2: 1,
            }
            .precedence(),
            DateRangeKind::SpecificMonthDate {
                m1: 1,
                d1: 1,
                m2: 1,
                d2: 1,
            }
            .precedence(),
            DateRangeKind::GenericMonthDate { d1: 1, d2: 1 }.precedence(),
            DateRangeKind::OffsetWeekdayOfSpecificMonth {
                m1: 1,
                wd1: 0,
                off1: 1,
                m2: 1,
                wd2: 0,
                off2: 1,
            }
            .precedence(),
            DateRangeKind::OffsetWeekdayOfGenericMonth {
                wd1: 0,
                off1: 1,
                wd2: 0,
                off2: 1,
            }
            .precedence(),
        ];
        assert!(ranks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn always_covers_full_day() {
        let tp = TimePeriod::always();
        for d in 0..7 {
            assert_eq!(tp.weekdays[d], vec![TimeRange::new(0, 86400)]);
        }
    }
}
