//! Period aggregation
//!
//! One generic pipeline turns any per-day row type into a `PeriodAggregate`:
//! the caller supplies the date and value extractors, the pipeline produces
//! totals, averages, trend, Sunday-aligned weekly buckets and the comparison
//! against the equally long window immediately before the current one.

use crate::goals::GoalProgress;
use crate::metrics::{DateRange, MetricPoint};
use crate::stats::{mean, round_half_up, round_to};
use crate::trend::{calculate_trend, Trend};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current analytics window plus the comparison window preceding it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregationWindow {
    pub today: NaiveDate,
    pub current: DateRange,
    pub previous: DateRange,
}

impl AggregationWindow {
    /// Window of `days` days ending on `today`
    pub fn ending_on(today: NaiveDate, days: u32) -> Self {
        let current = DateRange::trailing(today, days);
        Self::from_start(current.start, today)
    }

    /// Window from `start` to `today`; the previous window ends the day before
    /// `start` and spans the same number of days back.
    pub fn from_start(start: NaiveDate, today: NaiveDate) -> Self {
        let span = (today - start).num_days();
        let previous_end = start - Duration::days(1);
        let previous_start = previous_end - Duration::days(span);
        Self {
            today,
            current: DateRange::new(start, today),
            previous: DateRange::new(previous_start, previous_end),
        }
    }

    /// Range a store must be queried for to serve both windows
    pub fn fetch_range(&self) -> DateRange {
        DateRange::new(self.previous.start, self.current.end)
    }

    pub fn days(&self) -> i64 {
        self.current.len_days()
    }
}

/// Values falling into one Sunday-aligned week
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeekBucket {
    pub week_start: NaiveDate,
    pub values: Vec<f64>,
    pub total: f64,
    pub count: usize,
    pub average: f64,
}

/// Statistics of the comparison window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviousPeriodStats {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub average: f64,
    pub count: usize,
    /// Change of the current average relative to this window's average
    pub change_percentage: i64,
}

/// Per-metric snapshot over the current window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodAggregate {
    pub daily: Vec<MetricPoint>,
    pub average: f64,
    pub total: f64,
    pub trend: Trend,
    pub trend_percentage: i64,
    pub days_tracked: usize,
    pub weekly_breakdown: Vec<WeekBucket>,
    pub comparison: PreviousPeriodStats,
    pub goal_progress: Option<GoalProgress>,
}

impl PeriodAggregate {
    pub fn values(&self) -> Vec<f64> {
        self.daily.iter().map(|p| p.value).collect()
    }

    pub fn with_goal_progress(mut self, progress: Option<GoalProgress>) -> Self {
        self.goal_progress = progress;
        self
    }
}

/// Build a series from arbitrary rows, sorted ascending by date
pub fn series_from<R>(
    rows: &[R],
    date: impl Fn(&R) -> NaiveDate,
    value: impl Fn(&R) -> f64,
) -> Vec<MetricPoint> {
    let mut points: Vec<MetricPoint> = rows
        .iter()
        .map(|r| MetricPoint::new(date(r), value(r)))
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Aggregate a series over `window`; points outside both windows are ignored
pub fn aggregate(points: &[MetricPoint], window: &AggregationWindow) -> PeriodAggregate {
    let mut daily: Vec<MetricPoint> = points
        .iter()
        .filter(|p| window.current.contains(p.date))
        .copied()
        .collect();
    daily.sort_by_key(|p| p.date);

    let values: Vec<f64> = daily.iter().map(|p| p.value).collect();
    let total: f64 = values.iter().sum();
    let average = mean(&values);
    let trend = calculate_trend(&values);

    let previous: Vec<f64> = points
        .iter()
        .filter(|p| window.previous.contains(p.date))
        .map(|p| p.value)
        .collect();
    let previous_average = mean(&previous);
    let change_percentage = if previous_average == 0.0 {
        0
    } else {
        round_half_up((average - previous_average) / previous_average * 100.0)
    };

    PeriodAggregate {
        weekly_breakdown: group_by_week(&daily),
        days_tracked: daily.len(),
        average: round_to(average, 2),
        total: round_to(total, 2),
        trend: trend.trend,
        trend_percentage: trend.percentage,
        comparison: PreviousPeriodStats {
            start: window.previous.start,
            end: window.previous.end,
            average: round_to(previous_average, 2),
            count: previous.len(),
            change_percentage,
        },
        daily,
        goal_progress: None,
    }
}

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Bucket points by the Sunday-aligned week containing them, ascending
pub fn group_by_week(points: &[MetricPoint]) -> Vec<WeekBucket> {
    let mut weeks: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for point in points {
        weeks.entry(week_start(point.date)).or_default().push(point.value);
    }

    weeks
        .into_iter()
        .map(|(week_start, values)| {
            let total: f64 = values.iter().sum();
            let count = values.len();
            WeekBucket {
                week_start,
                total: round_to(total, 2),
                average: round_to(mean(&values), 2),
                count,
                values,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use proptest::prelude::*;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[test]
    fn test_week_start_is_sunday() {
        // 2024-01-03 is a Wednesday
        assert_eq!(week_start(d(1, 3)), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(week_start(d(1, 7)), d(1, 7));
        assert_eq!(week_start(d(1, 13)), d(1, 7));
    }

    #[test]
    fn test_previous_window_has_same_span() {
        let window = AggregationWindow::from_start(d(1, 11), d(1, 20));
        assert_eq!(window.previous.end, d(1, 10));
        assert_eq!(window.previous.start, d(1, 1));
        assert_eq!(window.fetch_range(), DateRange::new(d(1, 1), d(1, 20)));
    }

    #[test]
    fn test_ending_on_thirty_days() {
        let window = AggregationWindow::ending_on(d(1, 30), 30);
        assert_eq!(window.current.start, d(1, 1));
        assert_eq!(window.days(), 30);
    }

    #[test]
    fn test_aggregate_splits_current_and_previous() {
        let window = AggregationWindow::from_start(d(1, 11), d(1, 20));
        let points = vec![
            MetricPoint::new(d(1, 2), 1000.0),
            MetricPoint::new(d(1, 5), 1000.0),
            MetricPoint::new(d(1, 12), 1500.0),
            MetricPoint::new(d(1, 14), 1500.0),
            MetricPoint::new(d(1, 19), 2100.0),
        ];

        let agg = aggregate(&points, &window);
        assert_eq!(agg.days_tracked, 3);
        assert_eq!(agg.total, 5100.0);
        assert_eq!(agg.average, 1700.0);
        assert_eq!(agg.comparison.count, 2);
        assert_eq!(agg.comparison.average, 1000.0);
        assert_eq!(agg.comparison.change_percentage, 70);
        assert!(agg.goal_progress.is_none());
    }

    #[test]
    fn test_aggregate_empty_series() {
        let window = AggregationWindow::ending_on(d(1, 30), 30);
        let agg = aggregate(&[], &window);
        assert_eq!(agg.days_tracked, 0);
        assert_eq!(agg.average, 0.0);
        assert_eq!(agg.trend, Trend::InsufficientData);
        assert!(agg.weekly_breakdown.is_empty());
        assert_eq!(agg.comparison.change_percentage, 0);
    }

    #[test]
    fn test_weekly_buckets_sorted_and_averaged() {
        let points = vec![
            MetricPoint::new(d(1, 15), 4.0),
            MetricPoint::new(d(1, 1), 2.0),
            MetricPoint::new(d(1, 2), 4.0),
            MetricPoint::new(d(1, 8), 6.0),
        ];
        let weeks = group_by_week(&points);
        assert_eq!(weeks.len(), 3);
        assert!(weeks.windows(2).all(|w| w[0].week_start < w[1].week_start));
        assert_eq!(weeks[0].count, 2);
        assert_eq!(weeks[0].average, 3.0);
        assert_eq!(weeks[0].total, 6.0);
    }

    #[test]
    fn test_series_from_sorts_rows() {
        let rows = vec![(d(1, 3), 3), (d(1, 1), 1)];
        let series = series_from(&rows, |r| r.0, |r| f64::from(r.1));
        assert_eq!(series[0].date, d(1, 1));
        assert_eq!(series[1].value, 3.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_week_start_always_sunday(offset in 0i64..3650) {
            let date = d(1, 1) + Duration::days(offset);
            let start = week_start(date);
            prop_assert_eq!(start.weekday(), Weekday::Sun);
            prop_assert!(date - start < Duration::days(7));
        }

        #[test]
        fn prop_weekly_counts_sum_to_points(offsets in prop::collection::btree_set(0i64..120, 0..60)) {
            let points: Vec<MetricPoint> = offsets
                .iter()
                .map(|o| MetricPoint::new(d(1, 1) + Duration::days(*o), 1.0))
                .collect();
            let weeks = group_by_week(&points);
            let counted: usize = weeks.iter().map(|w| w.count).sum();
            prop_assert_eq!(counted, points.len());
        }
    }
}
