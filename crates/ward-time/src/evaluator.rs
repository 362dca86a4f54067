// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar arithmetic over `TimePeriod` (L1, spec.md §4.1): `is_valid_time`,
//! `next_valid_time`, `next_invalid_time`. All arithmetic happens in the
//! caller-supplied `chrono_tz::Tz` so DST transitions resolve the way the
//! local wallclock would, never by subtracting raw unix seconds.

use crate::error::TimeperiodError;
use chrono::{Datelike, Duration, LocalResult, NaiveDate, Timelike, TimeZone};
use chrono_tz::Tz;
use std::collections::HashSet;
use ward_core::{DateRange, DateRangeKind, TimePeriod, TimeRange};

/// Days to search forward before giving up and reporting "never". A
/// yearly-recurring exception needs at least one full year of lookahead;
/// three years covers leap-year and multi-year calendar-date spans
/// comfortably.
const SEARCH_HORIZON_DAYS: i64 = 3 * 366;

/// Bound on recursive exclusion-chain hops, guarding against an exclusion
/// cycle (spec.md §4.1 step 4 requires rejecting such configurations).
const MAX_EXCLUSION_HOPS: usize = 16;

/// Resolves a timeperiod name to its definition — the registry boundary
/// (L4) that the evaluator never owns directly.
pub trait TimePeriodLookup {
    fn resolve(&self, name: &str) -> Option<&TimePeriod>;
}

impl TimePeriodLookup for std::collections::HashMap<String, TimePeriod> {
    fn resolve(&self, name: &str) -> Option<&TimePeriod> {
        self.get(name)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Nagios weekday convention is 0 = Sunday .. 6 = Saturday;
/// `chrono::Weekday` is Monday-first. Converts at this single boundary.
fn nagios_weekday_to_chrono(wd: u32) -> chrono::Weekday {
    match wd % 7 {
        0 => chrono::Weekday::Sun,
        1 => chrono::Weekday::Mon,
        2 => chrono::Weekday::Tue,
        3 => chrono::Weekday::Wed,
        4 => chrono::Weekday::Thu,
        5 => chrono::Weekday::Fri,
        _ => chrono::Weekday::Sat,
    }
}

/// The `offset`th occurrence of `wd` within `year`/`month`. `offset == -1`
/// means "last occurrence"; `offset >= 1` counts from the start of the
/// month.
fn nth_weekday_of_month(year: i32, month: u32, wd: u32, offset: i32) -> Option<NaiveDate> {
    let target = nagios_weekday_to_chrono(wd);
    let last_day = days_in_month(year, month);
    if offset == -1 {
        (1..=last_day)
            .rev()
            .filter_map(|d| NaiveDate::from_ymd_opt(year, month, d))
            .find(|d| d.weekday() == target)
    } else if offset >= 1 {
        let mut count = 0u32;
        (1..=last_day)
            .filter_map(|d| NaiveDate::from_ymd_opt(year, month, d))
            .find(|d| {
                if d.weekday() == target {
                    count += 1;
                    count == offset as u32
                } else {
                    false
                }
            })
    } else {
        None
    }
}

/// The concrete `[start, end]` date span the occurrence of `kind`
/// containing (or nearest before) `date` resolves to, used both for
/// span-membership checks and for skip-interval day counting.
fn resolved_span(kind: &DateRangeKind, date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    match kind.clone() {
        DateRangeKind::CalendarDate { y1, m1, d1, y2, m2, d2 } => {
            let start = NaiveDate::from_ymd_opt(y1, m1, d1)?;
            let end = NaiveDate::from_ymd_opt(y2, m2, d2)?;
            Some((start, end))
        }
        DateRangeKind::SpecificMonthDate { m1, d1, m2, d2 } => {
            let year = date.year();
            for y in [year, year - 1] {
                let start = NaiveDate::from_ymd_opt(y, m1, d1)?;
                let end_year = if (m2, d2) >= (m1, d1) { y } else { y + 1 };
                let end = NaiveDate::from_ymd_opt(end_year, m2, d2)?;
                if date >= start && date <= end {
                    return Some((start, end));
                }
            }
            let start = NaiveDate::from_ymd_opt(year, m1, d1)?;
            let end_year = if (m2, d2) >= (m1, d1) { year } else { year + 1 };
            let end = NaiveDate::from_ymd_opt(end_year, m2, d2)?;
            Some((start, end))
        }
        DateRangeKind::GenericMonthDate { d1, d2 } => {
            for (y, m) in [
                (date.year(), date.month()),
                prev_month(date.year(), date.month()),
            ] {
                let d1c = d1.min(days_in_month(y, m)).max(1);
                let d2c = d2.min(days_in_month(y, m)).max(1);
                let start = NaiveDate::from_ymd_opt(y, m, d1c)?;
                let end = if d2c >= d1c {
                    NaiveDate::from_ymd_opt(y, m, d2c)?
                } else {
                    let (ny, nm) = next_month(y, m);
                    NaiveDate::from_ymd_opt(ny, nm, d2c.min(days_in_month(ny, nm)))?
                };
                if date >= start && date <= end {
                    return Some((start, end));
                }
            }
            let (y, m) = (date.year(), date.month());
            let d1c = d1.min(days_in_month(y, m)).max(1);
            let d2c = d2.min(days_in_month(y, m)).max(1);
            let start = NaiveDate::from_ymd_opt(y, m, d1c)?;
            let end = NaiveDate::from_ymd_opt(y, m, d2c)?;
            Some((start, end))
        }
        DateRangeKind::OffsetWeekdayOfSpecificMonth {
            m1,
            wd1,
            off1,
            m2,
            wd2,
            off2,
        } => {
            let year = date.year();
            for y in [year, year - 1] {
                let start = nth_weekday_of_month(y, m1, wd1, off1)?;
                let end_year = if m2 >= m1 { y } else { y + 1 };
                let end = nth_weekday_of_month(end_year, m2, wd2, off2)?;
                if date >= start && date <= end {
                    return Some((start, end));
                }
            }
            let start = nth_weekday_of_month(year, m1, wd1, off1)?;
            let end_year = if m2 >= m1 { year } else { year + 1 };
            let end = nth_weekday_of_month(end_year, m2, wd2, off2)?;
            Some((start, end))
        }
        DateRangeKind::OffsetWeekdayOfGenericMonth {
            wd1,
            off1,
            wd2,
            off2,
        } => {
            let (y, m) = (date.year(), date.month());
            let start = nth_weekday_of_month(y, m, wd1, off1)?;
            let end = nth_weekday_of_month(y, m, wd2, off2)?;
            if start <= end {
                Some((start, end))
            } else {
                None
            }
        }
    }
}

fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// The timerange list effective on `date`: the first matching exception in
/// precedence order (subject to its skip interval), or the weekday
/// template.
fn effective_ranges(tp: &TimePeriod, date: NaiveDate) -> Vec<TimeRange> {
    let mut candidates: Vec<&DateRange> = tp.exceptions.iter().collect();
    candidates.sort_by_key(|dr| dr.kind.precedence());

    for dr in candidates {
        let Some((span_start, span_end)) = resolved_span(&dr.kind, date) else {
            continue;
        };
        if date < span_start || date > span_end {
            continue;
        }
        if dr.skip_interval > 1 {
            let offset_days = (date - span_start).num_days();
            if offset_days % dr.skip_interval as i64 != 0 {
                continue;
            }
        }
        return dr.timeranges.clone();
    }

    let idx = date.weekday().num_days_from_sunday() as usize;
    tp.weekdays[idx].clone()
}

/// Resolves a local wallclock `(date, second-of-day)` to its unix
/// timestamp, applying spec.md §4.1 step 5's DST policy: a skipped second
/// (forward jump) resolves to the next real second; a repeated second
/// (backward jump) resolves to the first occurrence.
#[allow(clippy::expect_used)]
fn resolve_local_second(tz: Tz, date: NaiveDate, sec_of_day: u32) -> i64 {
    let naive = date.and_hms_opt(0, 0, 0).expect("midnight is always a valid naive time") + Duration::seconds(sec_of_day as i64);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.timestamp(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp(),
        LocalResult::None => {
            let mut n = naive;
            loop {
                n += Duration::seconds(1);
                if let LocalResult::Single(dt) = tz.from_local_datetime(&n) {
                    return dt.timestamp();
                }
            }
        }
    }
}

#[allow(clippy::expect_used)]
fn sec_of_day_local(tz: Tz, t: i64) -> (NaiveDate, u32) {
    let dt = tz
        .timestamp_opt(t, 0)
        .single()
        .unwrap_or_else(|| tz.timestamp_opt(t, 0).earliest().expect("a valid unix timestamp always resolves to some local wallclock"));
    let naive = dt.naive_local();
    let sec = naive.num_seconds_from_midnight();
    (naive.date(), sec)
}

/// `is_valid_time(t, tp) -> bool` (spec.md §4.1).
pub fn is_valid_time<L: TimePeriodLookup>(
    t: i64,
    tp: &TimePeriod,
    tz: Tz,
    lookup: &L,
) -> Result<bool, TimeperiodError> {
    is_valid_time_guarded(t, tp, tz, lookup, &mut HashSet::new(), 0)
}

fn is_valid_time_guarded<L: TimePeriodLookup>(
    t: i64,
    tp: &TimePeriod,
    tz: Tz,
    lookup: &L,
    visited: &mut HashSet<String>,
    depth: usize,
) -> Result<bool, TimeperiodError> {
    if depth > MAX_EXCLUSION_HOPS {
        return Err(TimeperiodError::ExclusionCycle(tp.name.clone()));
    }
    if !visited.insert(tp.name.clone()) {
        return Err(TimeperiodError::ExclusionCycle(tp.name.clone()));
    }

    let (date, sec) = sec_of_day_local(tz, t);
    let ranges = effective_ranges(tp, date);
    let base_valid = ranges.iter().any(|r| r.contains(sec));

    if !base_valid {
        visited.remove(&tp.name);
        return Ok(false);
    }

    for excl_name in &tp.exclusions {
        let Some(excl) = lookup.resolve(excl_name) else {
            continue;
        };
        if is_valid_time_guarded(t, excl, tz, lookup, visited, depth + 1)? {
            visited.remove(&tp.name);
            return Ok(false);
        }
    }

    visited.remove(&tp.name);
    Ok(true)
}

/// `next_valid_time(t, tp) -> t'` (spec.md §4.1).
pub fn next_valid_time<L: TimePeriodLookup>(
    t: i64,
    tp: &TimePeriod,
    tz: Tz,
    lookup: &L,
) -> Result<Option<i64>, TimeperiodError> {
    next_valid_time_guarded(t, tp, tz, lookup, 0)
}

fn next_valid_time_guarded<L: TimePeriodLookup>(
    t: i64,
    tp: &TimePeriod,
    tz: Tz,
    lookup: &L,
    hop: usize,
) -> Result<Option<i64>, TimeperiodError> {
    if hop > MAX_EXCLUSION_HOPS {
        return Err(TimeperiodError::ExclusionCycle(tp.name.clone()));
    }

    let (start_date, start_sec) = sec_of_day_local(tz, t);

    for day_offset in 0..SEARCH_HORIZON_DAYS {
        let date = start_date + Duration::days(day_offset);
        let ranges = effective_ranges(tp, date);
        let mut sorted = ranges.clone();
        sorted.sort();

        for range in &sorted {
            let candidate_sec = if day_offset == 0 {
                if range.contains(start_sec) {
                    start_sec
                } else if range.start_sec > start_sec {
                    range.start_sec
                } else {
                    continue;
                }
            } else {
                range.start_sec
            };

            let candidate = resolve_local_second(tz, date, candidate_sec);
            if candidate < t {
                continue;
            }

            let excluded_until = excluded_end(candidate, tp, tz, lookup)?;
            match excluded_until {
                None => return Ok(Some(candidate)),
                Some(resume_at) => {
                    return next_valid_time_guarded(resume_at, tp, tz, lookup, hop + 1);
                }
            }
        }
    }

    Ok(None)
}

/// If `t` falls inside one of `tp`'s excluded timeperiods, returns the
/// first moment after the exclusion ends; otherwise `None`.
fn excluded_end<L: TimePeriodLookup>(
    t: i64,
    tp: &TimePeriod,
    tz: Tz,
    lookup: &L,
) -> Result<Option<i64>, TimeperiodError> {
    for excl_name in &tp.exclusions {
        let Some(excl) = lookup.resolve(excl_name) else {
            continue;
        };
        if is_valid_time(t, excl, tz, lookup)? {
            let end = next_invalid_time(t, excl, tz, lookup)?;
            return Ok(end);
        }
    }
    Ok(None)
}

/// `next_invalid_time(t, tp) -> t'`, mirror of `next_valid_time`
/// (spec.md §4.1).
pub fn next_invalid_time<L: TimePeriodLookup>(
    t: i64,
    tp: &TimePeriod,
    tz: Tz,
    lookup: &L,
) -> Result<Option<i64>, TimeperiodError> {
    let (start_date, start_sec) = sec_of_day_local(tz, t);

    for day_offset in 0..SEARCH_HORIZON_DAYS {
        let date = start_date + Duration::days(day_offset);
        let ranges = effective_ranges(tp, date);
        let mut sorted = ranges.clone();
        sorted.sort();

        let probe_start = if day_offset == 0 { start_sec } else { 0 };
        let mut cursor = probe_start;

        loop {
            match sorted.iter().find(|r| r.contains(cursor)) {
                Some(r) => {
                    if r.end_sec >= 86400 {
                        break; // whole rest of day covered, move to next day
                    }
                    cursor = r.end_sec;
                }
                None => {
                    let candidate = resolve_local_second(tz, date, cursor);
                    if candidate < t {
                        break;
                    }
                    if !is_valid_time(candidate, tp, tz, lookup)? {
                        return Ok(Some(candidate));
                    }
                    cursor += 1;
                    if cursor >= 86400 {
                        break;
                    }
                }
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
