//! Cross-domain rules
//!
//! These only run when both the health and the education snapshot carry data.

use super::{InsightKind, InsightSet, Level, Severity};
use crate::scoring::WellnessScores;
use crate::trend::Trend;
use chrono::{DateTime, Utc};

const KIND: InsightKind = InsightKind::Correlation;

const STRONG_SCORE: i64 = 70;
const WEAK_SCORE: i64 = 50;

/// Compare the direction of one health metric against one education metric
pub fn analyze_correlation(
    health_label: &str,
    health_trend: Trend,
    education_label: &str,
    education_trend: Trend,
    now: DateTime<Utc>,
) -> Option<InsightSet> {
    let mut set = InsightSet::at(now);

    match (health_trend, education_trend) {
        (Trend::Increasing, Trend::Increasing) => {
            set.insight(
                KIND,
                "correlation",
                Severity::Positive,
                false,
                "link",
                format!(
                    "Your {} and {} are both improving together",
                    health_label, education_label
                ),
            );
            set.encourage(
                KIND,
                "correlation",
                Level::Low,
                Level::Medium,
                "thumbs-up",
                format!(
                    "Keep it up: your {} routine seems to support your {}",
                    health_label, education_label
                ),
            );
        }
        (Trend::Decreasing, Trend::Decreasing) => {
            set.insight(
                KIND,
                "correlation",
                Severity::Warning,
                true,
                "link",
                format!(
                    "Your {} and {} are both declining",
                    health_label, education_label
                ),
            );
            set.recommend(
                KIND,
                "correlation",
                Level::High,
                Level::High,
                "refresh-cw",
                format!(
                    "Restoring your {} may help your {} recover",
                    health_label, education_label
                ),
            );
        }
        _ => return None,
    }

    Some(set)
}

/// Overall balance between the two composite scores
pub fn analyze_overall_wellness(
    scores: &WellnessScores,
    now: DateTime<Utc>,
) -> Option<InsightSet> {
    let mut set = InsightSet::at(now);
    let WellnessScores {
        health_score,
        productivity_score,
    } = *scores;

    if health_score >= STRONG_SCORE && productivity_score >= STRONG_SCORE {
        set.insight(
            KIND,
            "wellness",
            Severity::Positive,
            false,
            "star",
            format!(
                "Great balance: health score {} and productivity score {}",
                health_score, productivity_score
            ),
        );
    } else if health_score < WEAK_SCORE && productivity_score < WEAK_SCORE {
        set.insight(
            KIND,
            "wellness",
            Severity::Warning,
            true,
            "alert-triangle",
            format!(
                "Health score {} and productivity score {} are both low",
                health_score, productivity_score
            ),
        );
        set.recommend(
            KIND,
            "wellness",
            Level::High,
            Level::High,
            "heart",
            "Start with sleep, water and a short daily study block before adding more",
        );
    } else {
        return None;
    }

    Some(set)
}
