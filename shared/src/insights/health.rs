//! Health domain analyzers

use super::{InsightKind, InsightSet, Level, MilestoneKind, Severity};
use crate::metrics::{RECOMMENDED_STEPS, RECOMMENDED_WATER_ML};
use crate::trend::Trend;
use crate::types::{
    ConstipationAnalytics, ExerciseAnalytics, KriyaAnalytics, TypingAnalytics, WaterAnalytics,
};
use chrono::{DateTime, Utc};

const KIND: InsightKind = InsightKind::Health;

/// Share of the recommended amount below which intake is critical
const LOW_WATER_RATIO: f64 = 0.7;
/// Days tracked below which we ask for more consistent logging
const MIN_TRACKED_DAYS: usize = 20;
/// Share of the recommended steps below which activity is low
const LOW_STEPS_RATIO: f64 = 0.6;
/// Trend change (percent) that is worth reporting
const NOTABLE_CHANGE: i64 = 15;
const TYPING_NOTABLE_CHANGE: i64 = 20;

pub fn analyze_water_intake(water: &WaterAnalytics, now: DateTime<Utc>) -> InsightSet {
    let agg = &water.aggregate;
    let mut set = InsightSet::at(now);

    if agg.average < RECOMMENDED_WATER_ML * LOW_WATER_RATIO {
        set.insight(
            KIND,
            "hydration",
            Severity::Critical,
            true,
            "droplet",
            format!(
                "Your average water intake is {:.0}ml, well below the recommended {:.0}ml per day",
                agg.average, RECOMMENDED_WATER_ML
            ),
        );
        set.recommend(
            KIND,
            "hydration",
            Level::High,
            Level::High,
            "glass-water",
            "Keep a bottle within reach and drink a glass of water with every meal",
        );
    }

    if agg.trend == Trend::Increasing && agg.trend_percentage > NOTABLE_CHANGE {
        set.insight(
            KIND,
            "hydration",
            Severity::Positive,
            false,
            "trending-up",
            format!("Water intake is up {}% over the period", agg.trend_percentage),
        );
    }

    if agg.trend == Trend::Decreasing && agg.trend_percentage < -NOTABLE_CHANGE {
        set.insight(
            KIND,
            "hydration",
            Severity::Warning,
            true,
            "trending-down",
            format!(
                "Water intake dropped {}% over the period",
                agg.trend_percentage.abs()
            ),
        );
        set.recommend(
            KIND,
            "hydration",
            Level::Medium,
            Level::Medium,
            "bell",
            "Set hourly hydration reminders to get back on track",
        );
    }

    if agg.average >= RECOMMENDED_WATER_ML {
        set.milestone(
            MilestoneKind::Milestone,
            "hydration",
            "trophy",
            format!(
                "Hydration goal reached: averaging {:.0}ml per day",
                agg.average
            ),
        );
    }

    if agg.days_tracked < MIN_TRACKED_DAYS {
        set.recommend(
            KIND,
            "hydration",
            Level::Low,
            Level::Medium,
            "calendar",
            format!(
                "Water was logged on {} days; log it daily for more accurate insights",
                agg.days_tracked
            ),
        );
    }

    set
}

pub fn analyze_exercise(exercise: &ExerciseAnalytics, now: DateTime<Utc>) -> InsightSet {
    let mut set = InsightSet::at(now);
    let steps = exercise.average_steps;

    if steps >= RECOMMENDED_STEPS {
        set.insight(
            KIND,
            "exercise",
            Severity::Positive,
            false,
            "footprints",
            format!("Great job averaging {:.0} steps per day", steps),
        );
        set.milestone(
            MilestoneKind::Achievement,
            "exercise",
            "medal",
            format!("Step goal of {:.0} per day reached", RECOMMENDED_STEPS),
        );
    } else if steps < RECOMMENDED_STEPS * LOW_STEPS_RATIO {
        set.insight(
            KIND,
            "exercise",
            Severity::Warning,
            true,
            "footprints",
            format!(
                "You are averaging {:.0} steps per day, below {:.0}% of the {:.0} step target",
                steps,
                LOW_STEPS_RATIO * 100.0,
                RECOMMENDED_STEPS
            ),
        );
        set.recommend(
            KIND,
            "exercise",
            Level::High,
            Level::High,
            "walking",
            "Add a 20 minute walk after lunch or dinner",
        );
    }

    match exercise.activity_types.len() {
        1 => {
            set.recommend(
                KIND,
                "exercise",
                Level::Low,
                Level::Medium,
                "shuffle",
                "Mix in a different activity such as yoga, cycling or strength work",
            );
        }
        n if n >= 3 => {
            set.insight(
                KIND,
                "exercise",
                Severity::Positive,
                false,
                "sparkles",
                format!("Nice variety: you practiced {} different activity types", n),
            );
        }
        _ => {}
    }

    set
}

pub fn analyze_constipation(
    constipation: &ConstipationAnalytics,
    now: DateTime<Utc>,
) -> InsightSet {
    let agg = &constipation.aggregate;
    let rate = constipation.positive_rate;
    let mut set = InsightSet::at(now);

    if rate > 80 {
        set.insight(
            KIND,
            "digestion",
            Severity::Positive,
            false,
            "leaf",
            format!("Digestion looks regular on {}% of tracked days", rate),
        );
    } else if rate < 50 {
        set.insight(
            KIND,
            "digestion",
            Severity::Warning,
            true,
            "alert-triangle",
            format!("Digestion was regular on only {}% of tracked days", rate),
        );
        set.recommend(
            KIND,
            "digestion",
            Level::High,
            Level::High,
            "salad",
            "Increase fiber with fruit, vegetables and whole grains, and keep up water intake",
        );
    }

    if agg.trend == Trend::Increasing && agg.trend_percentage > NOTABLE_CHANGE {
        set.insight(
            KIND,
            "digestion",
            Severity::Positive,
            false,
            "trending-up",
            format!("Digestive regularity improved {}%", agg.trend_percentage),
        );
    }

    if agg.trend == Trend::Decreasing && agg.trend_percentage < -NOTABLE_CHANGE {
        set.insight(
            KIND,
            "digestion",
            Severity::Warning,
            true,
            "trending-down",
            format!(
                "Digestive regularity declined {}%",
                agg.trend_percentage.abs()
            ),
        );
        set.recommend(
            KIND,
            "digestion",
            Level::Medium,
            Level::Medium,
            "clock",
            "Keep regular meal times and add light movement after meals",
        );
    }

    set
}

pub fn analyze_kriya(kriya: &KriyaAnalytics, now: DateTime<Utc>) -> InsightSet {
    let mut set = InsightSet::at(now);
    let rate = kriya.consistency_rate;

    if rate >= 80 {
        set.insight(
            KIND,
            "kriya",
            Severity::Positive,
            false,
            "lotus",
            format!("Kriya practice was consistent on {}% of days", rate),
        );
        set.milestone(
            MilestoneKind::Milestone,
            "kriya",
            "star",
            "Consistent kriya practitioner",
        );
    } else if rate < 50 {
        set.insight(
            KIND,
            "kriya",
            Severity::Warning,
            true,
            "lotus",
            format!("Kriya practice happened on only {}% of days", rate),
        );
        set.recommend(
            KIND,
            "kriya",
            Level::Medium,
            Level::High,
            "sunrise",
            "Anchor kriya to a fixed time, for example right after waking up",
        );
    }

    if kriya.total_sessions >= 30 {
        set.milestone(
            MilestoneKind::Achievement,
            "kriya",
            "trophy",
            format!("{} kriya sessions completed", kriya.total_sessions),
        );
    }

    set
}

pub fn analyze_typing(typing: &TypingAnalytics, now: DateTime<Utc>) -> InsightSet {
    let agg = &typing.aggregate;
    let rate = typing.completion_rate;
    let mut set = InsightSet::at(now);

    if rate >= 80 {
        set.insight(
            KIND,
            "typing",
            Severity::Positive,
            false,
            "keyboard",
            format!("Typing practice completed on {}% of days", rate),
        );
        set.milestone(
            MilestoneKind::Milestone,
            "typing",
            "star",
            "Typing practice habit established",
        );
    } else if rate < 50 {
        set.insight(
            KIND,
            "typing",
            Severity::Warning,
            true,
            "keyboard",
            format!("Typing practice completed on only {}% of days", rate),
        );
        set.recommend(
            KIND,
            "typing",
            Level::Medium,
            Level::Medium,
            "timer",
            "Schedule a short 15 minute typing session every day",
        );
    }

    if agg.trend_percentage > TYPING_NOTABLE_CHANGE {
        set.insight(
            KIND,
            "typing",
            Severity::Positive,
            false,
            "trending-up",
            format!("Typing practice is up {}%", agg.trend_percentage),
        );
    }

    if typing.completed_count >= 20 {
        set.milestone(
            MilestoneKind::Achievement,
            "typing",
            "trophy",
            format!("{} typing sessions completed", typing.completed_count),
        );
    }

    set
}
