//! Consistency analysis over a sparse calendar
//!
//! A streak is a maximal run of consecutive dates; a gap is the number of
//! missing days between two streaks. The current streak only counts while
//! the last active date is today or yesterday.

use crate::stats::{mean, percentage, round_to};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Shape of the activity calendar
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConsistencyPatterns {
    pub total_streaks: usize,
    pub average_streak_length: f64,
    pub longest_gap: i64,
    pub most_active_weekday: Option<String>,
}

/// Result of the consistency analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConsistencyReport {
    pub study_days: usize,
    pub consistency_rate: i64,
    pub longest_streak: usize,
    pub current_streak: usize,
    pub average_gap_between_sessions: f64,
    pub patterns: ConsistencyPatterns,
}

/// Analyze active dates over a window of `total_window_days` days
pub fn calculate_streaks(
    dates: &[NaiveDate],
    total_window_days: i64,
    today: NaiveDate,
) -> ConsistencyReport {
    let mut dates = dates.to_vec();
    dates.sort();
    dates.dedup();

    let Some(&last) = dates.last() else {
        return ConsistencyReport::default();
    };

    let mut runs: Vec<usize> = Vec::new();
    let mut gaps: Vec<i64> = Vec::new();
    let mut run = 1usize;

    for pair in dates.windows(2) {
        let delta = (pair[1] - pair[0]).num_days();
        if delta == 1 {
            run += 1;
        } else {
            runs.push(run);
            gaps.push(delta - 1);
            run = 1;
        }
    }
    runs.push(run);

    let trailing_run = run;
    let current_streak = if (today - last).num_days() <= 1 {
        trailing_run
    } else {
        0
    };

    let gap_values: Vec<f64> = gaps.iter().map(|g| *g as f64).collect();
    let run_values: Vec<f64> = runs.iter().map(|r| *r as f64).collect();

    ConsistencyReport {
        study_days: dates.len(),
        consistency_rate: percentage(dates.len() as f64, total_window_days.max(0) as f64),
        longest_streak: runs.iter().copied().max().unwrap_or(0),
        current_streak,
        average_gap_between_sessions: round_to(mean(&gap_values), 1),
        patterns: ConsistencyPatterns {
            total_streaks: runs.len(),
            average_streak_length: round_to(mean(&run_values), 1),
            longest_gap: gaps.iter().copied().max().unwrap_or(0),
            most_active_weekday: most_active_weekday(&dates),
        },
    }
}

fn most_active_weekday(dates: &[NaiveDate]) -> Option<String> {
    let mut counts = [0usize; 7];
    for date in dates {
        counts[date.weekday().num_days_from_monday() as usize] += 1;
    }

    let (index, count) = counts
        .iter()
        .enumerate()
        .fold((0, 0), |best, (i, c)| if *c > best.1 { (i, *c) } else { best });

    if count == 0 {
        return None;
    }

    let weekday = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ][index];
    Some(weekday_name(weekday).to_string())
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_empty_series_is_all_zero() {
        let report = calculate_streaks(&[], 30, d(30));
        assert_eq!(report, ConsistencyReport::default());
        assert_eq!(report.patterns.total_streaks, 0);
    }

    #[test]
    fn test_single_gap_calendar() {
        let dates = [d(1), d(2), d(3), d(5), d(6)];
        let report = calculate_streaks(&dates, 6, d(6));

        assert_eq!(report.study_days, 5);
        assert_eq!(report.longest_streak, 3);
        assert_eq!(report.current_streak, 2);
        assert_eq!(report.average_gap_between_sessions, 1.0);
        assert_eq!(report.patterns.total_streaks, 2);
        assert_eq!(report.patterns.longest_gap, 1);
        assert_eq!(report.consistency_rate, 83);
    }

    #[test]
    fn test_current_streak_grace_of_one_day() {
        let dates = [d(1), d(2), d(3)];
        assert_eq!(calculate_streaks(&dates, 10, d(4)).current_streak, 3);
        let lapsed = calculate_streaks(&dates, 10, d(5));
        assert_eq!(lapsed.current_streak, 0);
        assert_eq!(lapsed.longest_streak, 3);
    }

    #[test]
    fn test_zero_window_rate_is_zero() {
        let report = calculate_streaks(&[d(1)], 0, d(1));
        assert_eq!(report.consistency_rate, 0);
    }

    #[test]
    fn test_most_active_weekday() {
        // Jan 1, 8 and 15 2024 are Mondays
        let report = calculate_streaks(&[d(1), d(3), d(8), d(15)], 30, d(30));
        assert_eq!(report.patterns.most_active_weekday.as_deref(), Some("Monday"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_current_never_exceeds_longest(offsets in prop::collection::btree_set(0i64..60, 1..40)) {
            let dates: Vec<NaiveDate> = offsets.iter().map(|o| d(1) + Duration::days(*o)).collect();
            let today = *dates.last().unwrap();
            let report = calculate_streaks(&dates, 60, today);
            prop_assert!(report.current_streak <= report.longest_streak);
            prop_assert!(report.longest_streak <= report.study_days);
            prop_assert!(report.consistency_rate <= 100);
        }

        #[test]
        fn prop_runs_and_gaps_cover_span(offsets in prop::collection::btree_set(0i64..60, 1..40)) {
            let dates: Vec<NaiveDate> = offsets.iter().map(|o| d(1) + Duration::days(*o)).collect();
            let report = calculate_streaks(&dates, 60, d(1));
            let span = (*dates.last().unwrap() - dates[0]).num_days() + 1;
            let missing = span - dates.len() as i64;
            prop_assert!(report.patterns.total_streaks as i64 - 1 <= missing);
        }
    }
}
