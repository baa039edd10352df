//! Trend detection over a numeric series
//!
//! The series is split in two halves at `floor(n / 2)` and the averages are
//! compared. With an odd length the midpoint belongs to the second half.

use crate::stats::{mean, round_half_up};
use serde::{Deserialize, Serialize};

/// Percentage change above which a series is considered increasing
pub const TREND_THRESHOLD_PERCENT: i64 = 10;

/// Direction of a series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

/// Trend direction plus signed percentage change between halves
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendResult {
    pub trend: Trend,
    pub percentage: i64,
}

impl TrendResult {
    pub const INSUFFICIENT: TrendResult = TrendResult {
        trend: Trend::InsufficientData,
        percentage: 0,
    };
}

impl Default for TrendResult {
    fn default() -> Self {
        Self::INSUFFICIENT
    }
}

/// Classify a series by comparing the average of its two halves
///
/// A zero first-half average reports 0% (stable) instead of dividing by zero.
pub fn calculate_trend(values: &[f64]) -> TrendResult {
    if values.len() < 2 {
        return TrendResult::INSUFFICIENT;
    }

    let (first, second) = values.split_at(values.len() / 2);
    let first_avg = mean(first);
    let second_avg = mean(second);

    let percentage = if first_avg == 0.0 {
        0
    } else {
        round_half_up((second_avg - first_avg) / first_avg * 100.0)
    };

    TrendResult {
        trend: classify(percentage),
        percentage,
    }
}

fn classify(percentage: i64) -> Trend {
    if percentage > TREND_THRESHOLD_PERCENT {
        Trend::Increasing
    } else if percentage < -TREND_THRESHOLD_PERCENT {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}
