//! Contribution Calendar — daily activity grid over a trailing window.
//!
//! The grid starts on the Sunday on/before the window start, so the first
//! column is always a full week; days before the window are padding cells
//! (`in_range = false`). The grid ends on `today`, so the last column may be
//! partial.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::history::models::VersionRecord;

/// Default trailing window (one year).
pub const DEFAULT_WINDOW_DAYS: u32 = 365;
/// Accepted window bounds, inclusive.
pub const MIN_WINDOW_DAYS: u32 = 1;
pub const MAX_WINDOW_DAYS: u32 = 3700;

/// Event count per local calendar day.
pub type CountsByDate = BTreeMap<NaiveDate, u32>;

/// The trailing window a calendar covers, ending on `today`.
/// Only constructible through [`new`](Self::new), so `days` is always in
/// `MIN_WINDOW_DAYS..=MAX_WINDOW_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWindow {
    days: u32,
    today: NaiveDate,
}

impl CalendarWindow {
    pub fn new(days: u32, today: NaiveDate) -> Self {
        Self {
            days: days.clamp(MIN_WINDOW_DAYS, MAX_WINDOW_DAYS),
            today,
        }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Window ending on the server's local calendar day.
    pub fn ending_today(days: u32) -> Self {
        Self::new(days, Local::now().date_naive())
    }

    /// First in-range day: `today - (days - 1)`.
    pub fn start(&self) -> NaiveDate {
        self.today
            .checked_sub_days(Days::new(u64::from(self.days.saturating_sub(1))))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Sunday on or before [`start`](Self::start).
    pub fn grid_start(&self) -> NaiveDate {
        let start = self.start();
        let back = start.weekday().num_days_from_sunday();
        start
            .checked_sub_days(Days::new(u64::from(back)))
            .unwrap_or(start)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start() && day <= self.today
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCell {
    /// Serialized as `YYYY-MM-DD`.
    pub date_key: NaiveDate,
    pub count: u32,
    pub in_range: bool,
    /// Intensity bucket 0-4.
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionData {
    pub cells: Vec<ContributionCell>,
    pub total_commits: u32,
    pub active_days: u32,
    pub max_commits: u32,
    pub streak: u32,
}

/// Buckets `count` against the busiest day in range.
///
/// A single-commit maximum makes every active day level 4; otherwise the
/// 25% / 50% / 75% ratio thresholds select levels 1-4.
pub fn contribution_level(count: u32, max_count: u32) -> u8 {
    if count == 0 || max_count == 0 {
        return 0;
    }
    if max_count == 1 {
        return 4;
    }

    let ratio = f64::from(count) / f64::from(max_count);
    match ratio {
        r if r < 0.25 => 1,
        r if r < 0.5 => 2,
        r if r < 0.75 => 3,
        _ => 4,
    }
}

/// Consecutive active days ending `today`, never reaching before the
/// window start.
pub fn current_streak(counts: &CountsByDate, window: &CalendarWindow) -> u32 {
    let start = window.start();
    let mut streak = 0;
    let mut cursor = Some(window.today());

    while let Some(day) = cursor.filter(|d| *d >= start) {
        match counts.get(&day) {
            Some(&n) if n > 0 => streak += 1,
            _ => break,
        }
        cursor = day.pred_opt();
    }

    streak
}

/// Builds the calendar grid and summary stats for `counts`.
///
/// The grid runs from the Sunday on/before the window start through
/// `today` inclusive. Its length is a multiple of 7 only when `today` is a
/// Saturday; in general `cells.len() - (today's weekday from Sunday + 1)`
/// is. Every cell carries a real date, so `date_key` is never null.
pub fn build_contribution_data(counts: &CountsByDate, window: &CalendarWindow) -> ContributionData {
    let mut total_commits = 0u32;
    let mut active_days = 0u32;
    let mut max_commits = 0u32;

    let mut cells: Vec<ContributionCell> = window
        .grid_start()
        .iter_days()
        .take_while(|day| *day <= window.today())
        .map(|day| {
            let in_range = window.contains(day);
            let count = if in_range {
                counts.get(&day).copied().unwrap_or(0)
            } else {
                0
            };

            if in_range {
                total_commits = total_commits.saturating_add(count);
                if count > 0 {
                    active_days += 1;
                }
                max_commits = max_commits.max(count);
            }

            ContributionCell {
                date_key: day,
                count,
                in_range,
                level: 0,
            }
        })
        .collect();

    for cell in cells.iter_mut().filter(|c| c.in_range) {
        cell.level = contribution_level(cell.count, max_commits);
    }

    let streak = current_streak(counts, window);
    debug!(
        "Contribution grid: {} cells, {total_commits} commits over {active_days} days, streak {streak}",
        cells.len()
    );

    ContributionData {
        cells,
        total_commits,
        active_days,
        max_commits,
        streak,
    }
}

/// Calendar day of `timestamp` in `tz`.
pub fn date_key<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    timestamp.with_timezone(tz).date_naive()
}

/// Adds one event per version, keyed by its `created_at` day in `tz`.
/// Versions without a timestamp are skipped.
pub fn tally_versions<'a, Tz, I>(versions: I, tz: &Tz, counts: &mut CountsByDate)
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a VersionRecord>,
{
    for created_at in versions.into_iter().filter_map(|v| v.created_at.as_ref()) {
        *counts.entry(date_key(created_at, tz)).or_insert(0) += 1;
    }
}

/// Calendar for one resume's versions.
pub fn build_contribution_data_from_versions<Tz: TimeZone>(
    versions: &[VersionRecord],
    window: &CalendarWindow,
    tz: &Tz,
) -> ContributionData {
    let mut counts = CountsByDate::new();
    tally_versions(versions, tz, &mut counts);
    build_contribution_data(&counts, window)
}

/// Calendar across several resumes; per-day counts are summed.
pub fn build_contribution_data_from_version_lists<Tz: TimeZone>(
    version_lists: &[Vec<VersionRecord>],
    window: &CalendarWindow,
    tz: &Tz,
) -> ContributionData {
    let mut counts = CountsByDate::new();
    for versions in version_lists {
        tally_versions(versions, tz, &mut counts);
    }
    build_contribution_data(&counts, window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Weekday};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn counts(pairs: &[(NaiveDate, u32)]) -> CountsByDate {
        pairs.iter().copied().collect()
    }

    fn version_at(ts: &str) -> VersionRecord {
        VersionRecord {
            created_at: Some(ts.parse::<DateTime<Utc>>().unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_two_day_window_totals_and_streak() {
        let window = CalendarWindow::new(2, day(2024, 1, 2));
        let data = build_contribution_data(
            &counts(&[(day(2024, 1, 1), 3), (day(2024, 1, 2), 1)]),
            &window,
        );

        assert_eq!(data.total_commits, 4);
        assert_eq!(data.active_days, 2);
        assert_eq!(data.max_commits, 3);
        assert_eq!(data.streak, 2);

        // 2024-01-01 is a Monday, so one Sunday padding cell leads the grid.
        assert_eq!(data.cells.len(), 3);
        assert_eq!(data.cells[0].date_key, day(2023, 12, 31));
        assert!(!data.cells[0].in_range);
        assert_eq!(data.cells[1].level, 4);
        assert_eq!(data.cells[2].level, 2);
    }

    #[test]
    fn test_grid_starts_on_sunday_and_ends_today() {
        for offset in 0..7 {
            let today = day(2024, 6, 10 + offset);
            let data = build_contribution_data(&CountsByDate::new(), &CalendarWindow::new(365, today));
            assert_eq!(data.cells[0].date_key.weekday(), Weekday::Sun);
            assert_eq!(data.cells.last().unwrap().date_key, today);

            let trailing = today.weekday().num_days_from_sunday() as usize + 1;
            assert_eq!((data.cells.len() - trailing) % 7, 0);
            assert_eq!(data.cells.iter().filter(|c| c.in_range).count(), 365);
        }
    }

    #[test]
    fn test_full_weeks_when_today_is_saturday() {
        let today = day(2024, 6, 15);
        assert_eq!(today.weekday(), Weekday::Sat);
        let data = build_contribution_data(&CountsByDate::new(), &CalendarWindow::new(371, today));
        assert_eq!(data.cells.len(), 371);
        assert!(data.cells.iter().all(|c| c.in_range));
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let data = build_contribution_data(&CountsByDate::new(), &CalendarWindow::new(140, day(2024, 3, 5)));
        assert_eq!(data.total_commits, 0);
        assert_eq!(data.active_days, 0);
        assert_eq!(data.max_commits, 0);
        assert_eq!(data.streak, 0);
        assert!(data.cells.iter().all(|c| c.count == 0 && c.level == 0));
    }

    #[test]
    fn test_streak_stops_at_first_gap() {
        let today = day(2024, 5, 20);
        let window = CalendarWindow::new(30, today);

        let only_today = counts(&[(today, 2), (day(2024, 5, 18), 5)]);
        assert_eq!(current_streak(&only_today, &window), 1);

        let none_today = counts(&[(day(2024, 5, 19), 1)]);
        assert_eq!(current_streak(&none_today, &window), 0);
    }

    #[test]
    fn test_streak_is_bounded_by_window() {
        let today = day(2024, 5, 20);
        let every_day: CountsByDate = day(2024, 1, 1)
            .iter_days()
            .take_while(|d| *d <= today)
            .map(|d| (d, 1))
            .collect();
        assert_eq!(current_streak(&every_day, &CalendarWindow::new(10, today)), 10);
    }

    #[test]
    fn test_counts_outside_window_are_ignored() {
        let today = day(2024, 5, 20);
        let data = build_contribution_data(
            &counts(&[(day(2024, 5, 1), 9), (day(2024, 5, 19), 1)]),
            &CalendarWindow::new(7, today),
        );
        assert_eq!(data.total_commits, 1);
        assert_eq!(data.max_commits, 1);
        assert!(data.cells.iter().filter(|c| !c.in_range).all(|c| c.count == 0));
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(contribution_level(0, 10), 0);
        assert_eq!(contribution_level(3, 0), 0);
        assert_eq!(contribution_level(1, 1), 4);
        assert_eq!(contribution_level(2, 10), 1);
        assert_eq!(contribution_level(3, 10), 2);
        assert_eq!(contribution_level(5, 10), 3);
        assert_eq!(contribution_level(7, 10), 3);
        assert_eq!(contribution_level(8, 10), 4);
        assert_eq!(contribution_level(10, 10), 4);
    }

    #[test]
    fn test_window_is_clamped() {
        assert_eq!(CalendarWindow::new(0, day(2024, 1, 1)).days(), MIN_WINDOW_DAYS);
        assert_eq!(CalendarWindow::new(100_000, day(2024, 1, 1)).days(), MAX_WINDOW_DAYS);
    }

    #[test]
    fn test_oversized_window_grid_stays_bounded() {
        let today = day(2024, 1, 2);
        let window = CalendarWindow::new(u32::MAX, today);
        assert_eq!(window.today(), today);
        assert_eq!(
            window.start(),
            today - Days::new(u64::from(MAX_WINDOW_DAYS - 1))
        );

        let data = build_contribution_data(&CountsByDate::new(), &window);
        assert!(data.cells.len() < MAX_WINDOW_DAYS as usize + 7);
        assert_eq!(data.cells.last().map(|c| c.date_key), Some(today));
    }

    #[test]
    fn test_mid_week_today_leaves_partial_last_column() {
        // 2024-01-02 is a Tuesday: two cells past the last full week.
        let today = day(2024, 1, 2);
        let data = build_contribution_data(&CountsByDate::new(), &CalendarWindow::new(365, today));
        assert_eq!(data.cells.len(), 367);
        assert_eq!(data.cells.len() % 7, 3);
        assert_eq!(data.cells.last().map(|c| c.date_key), Some(today));
    }

    #[test]
    fn test_versions_keyed_by_local_day() {
        let versions = vec![
            version_at("2024-01-01T23:30:00Z"),
            version_at("2024-01-02T08:00:00Z"),
            VersionRecord::default(),
        ];
        let window = CalendarWindow::new(7, day(2024, 1, 2));

        let in_utc = build_contribution_data_from_versions(&versions, &window, &Utc);
        assert_eq!(in_utc.active_days, 2);

        // UTC+2 pushes the late-evening commit into Jan 2.
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let shifted = build_contribution_data_from_versions(&versions, &window, &plus_two);
        assert_eq!(shifted.active_days, 1);
        assert_eq!(shifted.max_commits, 2);
        assert_eq!(shifted.total_commits, 2);
    }

    #[test]
    fn test_version_lists_merge_by_summing() {
        let lists = vec![
            vec![version_at("2024-01-02T10:00:00Z")],
            vec![],
            vec![version_at("2024-01-02T11:00:00Z"), version_at("2024-01-01T11:00:00Z")],
        ];
        let data = build_contribution_data_from_version_lists(&lists, &CalendarWindow::new(2, day(2024, 1, 2)), &Utc);
        assert_eq!(data.total_commits, 3);
        assert_eq!(data.max_commits, 2);
        assert_eq!(data.streak, 2);
    }
}
