use chrono::{NaiveDate, NaiveTime};
use leavedesk::libs::config::LedgerConfig;
use leavedesk::libs::duration::{
    compute_return_date, compute_total_days, compute_total_hours, next_workday, DayType, LeaveSpan,
};
use leavedesk::libs::error::LedgerError;
use std::collections::HashSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn span(start: NaiveDate, end: NaiveDate, start_time: Option<NaiveTime>, end_time: Option<NaiveTime>) -> LeaveSpan {
    LeaveSpan {
        start_date: start,
        end_date: end,
        start_time,
        end_time,
        start_day_type: DayType::Full,
        end_day_type: DayType::Full,
    }
}

#[test]
fn single_day_at_exact_window_boundaries_yields_full_day() {
    let cfg = LedgerConfig::default();
    // 06:30-15:00 is 8.5 wall-clock hours, capped at the per-day constant.
    let s = span(date(2025, 12, 17), date(2025, 12, 17), Some(time(6, 30)), Some(time(15, 0)));
    let hours = compute_total_hours(&cfg, &s, &HashSet::new()).unwrap();
    assert_eq!(hours, cfg.work_hours_per_day);
    assert_eq!(compute_total_days(&cfg, hours), 1.0);
}

#[test]
fn one_minute_outside_window_fails_validation() {
    let cfg = LedgerConfig::default();
    let holidays = HashSet::new();

    let early = span(date(2025, 12, 17), date(2025, 12, 17), Some(time(6, 29)), Some(time(12, 0)));
    assert!(matches!(
        compute_total_hours(&cfg, &early, &holidays),
        Err(LedgerError::OutsideWorkWindow { .. })
    ));

    let late = span(date(2025, 12, 17), date(2025, 12, 17), Some(time(8, 0)), Some(time(15, 1)));
    assert!(matches!(
        compute_total_hours(&cfg, &late, &holidays),
        Err(LedgerError::OutsideWorkWindow { .. })
    ));
}

#[test]
fn single_day_partial_hours_are_wall_clock() {
    let cfg = LedgerConfig::default();
    let s = span(date(2025, 12, 17), date(2025, 12, 17), Some(time(10, 0)), Some(time(14, 0)));
    let hours = compute_total_hours(&cfg, &s, &HashSet::new()).unwrap();
    assert_eq!(hours, 4.0);
    assert_eq!(compute_total_days(&cfg, hours), 0.5);
}

#[test]
fn inverted_times_fail_validation() {
    let cfg = LedgerConfig::default();
    let s = span(date(2025, 12, 17), date(2025, 12, 17), Some(time(12, 0)), Some(time(9, 0)));
    assert!(matches!(
        compute_total_hours(&cfg, &s, &HashSet::new()),
        Err(LedgerError::EndTimeBeforeStart)
    ));
}

#[test]
fn one_missing_time_fails_validation() {
    let cfg = LedgerConfig::default();
    let s = span(date(2025, 12, 17), date(2025, 12, 17), Some(time(9, 0)), None);
    assert!(matches!(
        compute_total_hours(&cfg, &s, &HashSet::new()),
        Err(LedgerError::IncompleteTimeRange)
    ));
}

#[test]
fn end_before_start_fails_validation() {
    let cfg = LedgerConfig::default();
    let s = span(date(2025, 12, 18), date(2025, 12, 17), None, None);
    assert!(matches!(compute_total_hours(&cfg, &s, &HashSet::new()), Err(LedgerError::EndBeforeStart)));
}

#[test]
fn multi_day_request_counts_whole_days() {
    let cfg = LedgerConfig::default();
    // Monday through Thursday with explicit 08:00-17:00 times: four full
    // working days regardless of the clock values.
    let s = span(date(2025, 9, 29), date(2025, 10, 2), Some(time(8, 0)), Some(time(17, 0)));
    let hours = compute_total_hours(&cfg, &s, &HashSet::new()).unwrap();
    assert!((hours - 32.0).abs() < 1e-6);
    assert!((compute_total_days(&cfg, hours) - 4.0).abs() < 1e-6);
}

#[test]
fn multi_day_request_ignores_time_offsets() {
    let cfg = LedgerConfig::default();
    let s = span(date(2025, 9, 29), date(2025, 9, 30), Some(time(15, 0)), Some(time(9, 0)));
    let hours = compute_total_hours(&cfg, &s, &HashSet::new()).unwrap();
    assert!((hours - cfg.work_hours_per_day * 2.0).abs() < 1e-6);
}

#[test]
fn multi_day_request_skips_weekends_and_holidays() {
    let cfg = LedgerConfig::default();
    // Friday 2025-10-03 through Monday 2025-10-06 spans a weekend.
    let s = span(date(2025, 10, 3), date(2025, 10, 6), None, None);
    let hours = compute_total_hours(&cfg, &s, &HashSet::new()).unwrap();
    assert_eq!(hours, 16.0);

    let holidays: HashSet<NaiveDate> = [date(2025, 10, 6)].into_iter().collect();
    let hours = compute_total_hours(&cfg, &s, &holidays).unwrap();
    assert_eq!(hours, 8.0);
}

#[test]
fn half_day_types_apply_without_times() {
    let cfg = LedgerConfig::default();
    let mut s = span(date(2025, 12, 17), date(2025, 12, 17), None, None);
    s.start_day_type = DayType::Am;
    let hours = compute_total_hours(&cfg, &s, &HashSet::new()).unwrap();
    assert_eq!(hours, 4.0);
    assert_eq!(compute_total_days(&cfg, hours), 0.5);
}

#[test]
fn weekend_single_day_contributes_nothing() {
    let cfg = LedgerConfig::default();
    // 2025-12-20 is a Saturday.
    let s = span(date(2025, 12, 20), date(2025, 12, 20), None, None);
    assert_eq!(compute_total_hours(&cfg, &s, &HashSet::new()).unwrap(), 0.0);
}

#[test]
fn days_round_to_four_decimal_places() {
    let cfg = LedgerConfig::default();
    // 50 minutes = 0.8333... hours = 0.10416... days.
    let s = span(date(2025, 12, 17), date(2025, 12, 17), Some(time(7, 0)), Some(time(7, 50)));
    let hours = compute_total_hours(&cfg, &s, &HashSet::new()).unwrap();
    let days = compute_total_days(&cfg, hours);
    assert!((days - 0.1042).abs() < 1e-9);
}

#[test]
fn next_workday_skips_weekends() {
    // Friday -> following Monday
    assert_eq!(next_workday(date(2023, 7, 14), &HashSet::new()), date(2023, 7, 17));
}

#[test]
fn next_workday_respects_holidays() {
    // Monday with Tuesday holiday -> Wednesday
    let holidays: HashSet<NaiveDate> = [date(2023, 7, 18)].into_iter().collect();
    assert_eq!(next_workday(date(2023, 7, 17), &holidays), date(2023, 7, 19));
}

#[test]
fn partial_day_before_close_returns_same_day() {
    let cfg = LedgerConfig::default();
    let holidays = HashSet::new();
    let same_day = compute_return_date(&cfg, date(2025, 12, 17), cfg.work_hours_per_day / 2.0, Some(time(10, 0)), &holidays);
    assert_eq!(same_day, date(2025, 12, 17));
}

#[test]
fn partial_day_ending_at_close_returns_next_workday() {
    let cfg = LedgerConfig::default();
    let holidays = HashSet::new();
    let next = compute_return_date(&cfg, date(2025, 12, 17), 1.5, Some(cfg.latest_end), &holidays);
    assert_eq!(next, date(2025, 12, 18));
}

#[test]
fn return_date_skips_holidays() {
    let cfg = LedgerConfig::default();
    let holidays: HashSet<NaiveDate> = [date(2025, 12, 18)].into_iter().collect();
    let next = compute_return_date(&cfg, date(2025, 12, 17), 1.5, Some(cfg.latest_end), &holidays);
    assert_eq!(next, date(2025, 12, 19));
}

#[test]
fn full_day_leave_ending_friday_returns_monday() {
    let cfg = LedgerConfig::default();
    let holidays = HashSet::new();
    // 2025-10-03 is a Friday; a full-day leave returns the next Monday.
    let next = compute_return_date(&cfg, date(2025, 10, 3), cfg.work_hours_per_day, None, &holidays);
    assert_eq!(next, date(2025, 10, 6));

    // Unless Monday is itself a holiday.
    let holidays: HashSet<NaiveDate> = [date(2025, 10, 6)].into_iter().collect();
    let next = compute_return_date(&cfg, date(2025, 10, 3), cfg.work_hours_per_day, None, &holidays);
    assert_eq!(next, date(2025, 10, 7));
}
