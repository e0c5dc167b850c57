//! Leave duration math: hours, equivalent days and return-to-work dates.
//!
//! Two computation regimes exist, mirroring how requests are submitted:
//!
//! - **Single-day requests** may carry explicit clock times, validated
//!   against the allowed working window; without times, the day type
//!   (full/am/pm) decides the hours.
//! - **Multi-day requests** are computed in whole-day units: every weekday
//!   in the span that is not a holiday contributes the full per-day working
//!   hours, regardless of any clock times supplied. This is a deliberate
//!   legacy rule, not a bug; whether first/last days should be prorated
//!   instead is an open product question (see DESIGN.md).

use crate::libs::config::LedgerConfig;
use crate::libs::error::LedgerError;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How much of a calendar day a request covers when no clock times are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayType {
    #[default]
    Full,
    Am,
    Pm,
}

impl DayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Full => "full",
            DayType::Am => "am",
            DayType::Pm => "pm",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" | "" => Ok(DayType::Full),
            "am" => Ok(DayType::Am),
            "pm" => Ok(DayType::Pm),
            other => Err(LedgerError::Validation(format!("Invalid day type: {}", other))),
        }
    }
}

/// Date/time range of a leave request, as submitted.
#[derive(Debug, Clone)]
pub struct LeaveSpan {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub start_day_type: DayType,
    pub end_day_type: DayType,
}

/// Total working hours covered by the span. Fails with a validation error
/// on an inverted range or clock times outside the allowed window; never
/// silently clamps an impossible request.
pub fn compute_total_hours(cfg: &LedgerConfig, span: &LeaveSpan, holidays: &HashSet<NaiveDate>) -> Result<f64, LedgerError> {
    if span.end_date < span.start_date {
        return Err(LedgerError::EndBeforeStart);
    }

    if span.start_date == span.end_date {
        return single_day_hours(cfg, span, holidays);
    }

    // Multi-day: whole-day units, clock times deliberately ignored.
    let mut hours = 0.0;
    let mut day = span.start_date;
    while day <= span.end_date {
        if is_workday(day, holidays) {
            hours += cfg.work_hours_per_day;
        }
        day = day + Duration::days(1);
    }
    Ok(hours)
}

fn single_day_hours(cfg: &LedgerConfig, span: &LeaveSpan, holidays: &HashSet<NaiveDate>) -> Result<f64, LedgerError> {
    match (span.start_time, span.end_time) {
        (Some(start), Some(end)) => {
            if start < cfg.earliest_start || end > cfg.latest_end {
                let (earliest, latest) = cfg.window_labels();
                return Err(LedgerError::OutsideWorkWindow { earliest, latest });
            }
            if end <= start {
                return Err(LedgerError::EndTimeBeforeStart);
            }
            let hours = (end - start).num_minutes() as f64 / 60.0;
            Ok(hours.min(cfg.work_hours_per_day))
        }
        (None, None) => {
            if !is_workday(span.start_date, holidays) {
                return Ok(0.0);
            }
            Ok(match span.start_day_type {
                DayType::Full => cfg.work_hours_per_day,
                DayType::Am | DayType::Pm => cfg.work_hours_per_day / 2.0,
            })
        }
        _ => Err(LedgerError::IncompleteTimeRange),
    }
}

/// Hours converted to equivalent working days, rounded to four decimal
/// places so repeated balance arithmetic stays stable.
pub fn compute_total_days(cfg: &LedgerConfig, total_hours: f64) -> f64 {
    round_days(total_hours / cfg.work_hours_per_day)
}

pub fn round_days(days: f64) -> f64 {
    (days * 10_000.0).round() / 10_000.0
}

pub fn is_workday(date: NaiveDate, holidays: &HashSet<NaiveDate>) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !holidays.contains(&date)
}

/// First date strictly after `date` that is neither a weekend nor a holiday.
pub fn next_workday(date: NaiveDate, holidays: &HashSet<NaiveDate>) -> NaiveDate {
    let mut day = date + Duration::days(1);
    while !is_workday(day, holidays) {
        day = day + Duration::days(1);
    }
    day
}

/// Date the employee is expected back at work.
///
/// A partial-day request whose final exit time is before business close
/// returns the same day; anything consuming a full day, or ending at or
/// after close, returns the next workday.
pub fn compute_return_date(cfg: &LedgerConfig, end_date: NaiveDate, total_hours: f64, end_time: Option<NaiveTime>, holidays: &HashSet<NaiveDate>) -> NaiveDate {
    if let Some(end) = end_time {
        if end < cfg.latest_end && total_hours + f64::EPSILON < cfg.work_hours_per_day {
            return end_date;
        }
    }
    next_workday(end_date, holidays)
}

/// Parses an ISO `YYYY-MM-DD` date from user input.
pub fn parse_date(raw: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| LedgerError::InvalidDate(raw.to_string()))
}

/// Parses an `HH:MM` clock time from user input.
pub fn parse_time(raw: &str) -> Result<NaiveTime, LedgerError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| LedgerError::InvalidTime(raw.to_string()))
}
