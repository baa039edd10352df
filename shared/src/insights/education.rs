//! Education domain analyzers

use super::{InsightKind, InsightSet, Level, MilestoneKind, Severity};
use crate::metrics::RECOMMENDED_STUDY_HOURS;
use crate::stats::mean;
use crate::trend::Trend;
use crate::types::{StudyHoursAnalytics, SubjectProgress, TaskCompletionAnalytics};
use chrono::{DateTime, Utc};

const KIND: InsightKind = InsightKind::Education;

const LOW_STUDY_RATIO: f64 = 0.7;
const NOTABLE_CHANGE: i64 = 15;
const SCHEDULE_CONSISTENCY: i64 = 60;
const TOTAL_HOURS_MILESTONE: f64 = 100.0;
/// Gap between regular and NPTEL completion worth pointing out
const TASK_TYPE_GAP: i64 = 20;

pub fn analyze_study_hours(study: &StudyHoursAnalytics, now: DateTime<Utc>) -> InsightSet {
    let agg = &study.aggregate;
    let mut set = InsightSet::at(now);

    if study.average_hours >= RECOMMENDED_STUDY_HOURS {
        set.insight(
            KIND,
            "study",
            Severity::Positive,
            false,
            "book-open",
            format!(
                "You are studying {:.1} hours per day on average",
                study.average_hours
            ),
        );
        set.milestone(
            MilestoneKind::Milestone,
            "study",
            "graduation-cap",
            format!("Daily study target of {:.0} hours reached", RECOMMENDED_STUDY_HOURS),
        );
    } else if study.average_hours < RECOMMENDED_STUDY_HOURS * LOW_STUDY_RATIO {
        set.insight(
            KIND,
            "study",
            Severity::Warning,
            true,
            "book-open",
            format!(
                "Average study time is {:.1} hours per day, below the {:.0} hour target",
                study.average_hours, RECOMMENDED_STUDY_HOURS
            ),
        );
        set.recommend(
            KIND,
            "study",
            Level::High,
            Level::High,
            "timer",
            "Plan focused study blocks of 50 minutes with short breaks",
        );
    }

    if agg.trend == Trend::Increasing && agg.trend_percentage > NOTABLE_CHANGE {
        set.insight(
            KIND,
            "study",
            Severity::Positive,
            false,
            "trending-up",
            format!("Study time increased {}%", agg.trend_percentage),
        );
    }

    if agg.trend == Trend::Decreasing && agg.trend_percentage < -NOTABLE_CHANGE {
        set.insight(
            KIND,
            "study",
            Severity::Warning,
            true,
            "trending-down",
            format!("Study time decreased {}%", agg.trend_percentage.abs()),
        );
        set.recommend(
            KIND,
            "study",
            Level::Medium,
            Level::Medium,
            "list-checks",
            "Review your weekly plan and protect study time from other commitments",
        );
    }

    if study.consistency.consistency_rate < SCHEDULE_CONSISTENCY {
        set.recommend(
            KIND,
            "study",
            Level::Medium,
            Level::High,
            "calendar-clock",
            format!(
                "You studied on {}% of days; a fixed daily study schedule builds consistency",
                study.consistency.consistency_rate
            ),
        );
    }

    if study.total_hours >= TOTAL_HOURS_MILESTONE {
        set.milestone(
            MilestoneKind::Achievement,
            "study",
            "trophy",
            format!("{:.0} hours of study logged", study.total_hours),
        );
    }

    set
}

pub fn analyze_subject_progress(subjects: &[SubjectProgress], now: DateTime<Utc>) -> InsightSet {
    let mut set = InsightSet::at(now);

    let Some(best) = subjects.iter().max_by_key(|s| s.completion_rate) else {
        return set;
    };

    if best.completion_rate >= 80 {
        set.insight(
            KIND,
            "subjects",
            Severity::Positive,
            false,
            "check-circle",
            format!(
                "{} is {}% complete",
                best.subject_name, best.completion_rate
            ),
        );
        set.milestone(
            MilestoneKind::Milestone,
            "subjects",
            "flag",
            format!("{} nearly finished", best.subject_name),
        );
    }

    if subjects.len() > 1 {
        if let Some(worst) = subjects.iter().min_by_key(|s| s.completion_rate) {
            if worst.completion_rate < 40 {
                set.insight(
                    KIND,
                    "subjects",
                    Severity::Warning,
                    true,
                    "alert-circle",
                    format!(
                        "{} is only {}% complete",
                        worst.subject_name, worst.completion_rate
                    ),
                );
                set.recommend(
                    KIND,
                    "subjects",
                    Level::High,
                    Level::High,
                    "target",
                    format!("Dedicate extra sessions this week to {}", worst.subject_name),
                );
            }
        }
    }

    let rates: Vec<f64> = subjects.iter().map(|s| s.completion_rate as f64).collect();
    let overall = mean(&rates);
    if overall >= 70.0 {
        set.insight(
            KIND,
            "subjects",
            Severity::Positive,
            false,
            "bar-chart",
            format!("Overall subject completion is {:.0}%", overall),
        );
    } else if overall < 50.0 {
        set.insight(
            KIND,
            "subjects",
            Severity::Warning,
            true,
            "bar-chart",
            format!("Overall subject completion is only {:.0}%", overall),
        );
        set.recommend(
            KIND,
            "subjects",
            Level::Medium,
            Level::High,
            "list-checks",
            "Break remaining units into weekly targets per subject",
        );
    }

    set
}

pub fn analyze_task_completion(
    tasks: &TaskCompletionAnalytics,
    now: DateTime<Utc>,
) -> InsightSet {
    let mut set = InsightSet::at(now);
    let rate = tasks.overall_completion_rate;

    if rate >= 75 {
        set.insight(
            KIND,
            "tasks",
            Severity::Positive,
            false,
            "check-square",
            format!("{}% of tasks completed", rate),
        );
    } else if rate < 50 {
        set.insight(
            KIND,
            "tasks",
            Severity::Warning,
            true,
            "check-square",
            format!("Only {}% of tasks completed", rate),
        );
        set.recommend(
            KIND,
            "tasks",
            Level::High,
            Level::Medium,
            "list-todo",
            "Start each day by picking the three most important tasks",
        );
    }

    if tasks.regular.total > 0 && tasks.nptel.total > 0 {
        let gap = tasks.regular.completion_rate - tasks.nptel.completion_rate;
        if gap.abs() > TASK_TYPE_GAP {
            let (ahead, behind) = if gap > 0 {
                ("regular", "NPTEL")
            } else {
                ("NPTEL", "regular")
            };
            set.insight(
                KIND,
                "tasks",
                Severity::Info,
                false,
                "scale",
                format!(
                    "You complete {} tasks more reliably than {} tasks ({}% vs {}%)",
                    ahead,
                    behind,
                    tasks.regular.completion_rate.max(tasks.nptel.completion_rate),
                    tasks.regular.completion_rate.min(tasks.nptel.completion_rate)
                ),
            );
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::ConsistencyReport;
    use crate::insights::fixtures::{aggregate, now};
    use crate::types::TaskTypeStats;

    fn study(average: f64, total: f64, consistency_rate: i64) -> StudyHoursAnalytics {
        StudyHoursAnalytics {
            aggregate: aggregate(average, Trend::Stable, 0, 20),
            average_hours: average,
            total_hours: total,
            consistency: ConsistencyReport {
                consistency_rate,
                ..Default::default()
            },
        }
    }

    fn subject(code: &str, rate: i64) -> SubjectProgress {
        SubjectProgress {
            subject_code: code.to_string(),
            subject_name: code.to_uppercase(),
            total_tasks: 10,
            completed_tasks: (rate / 10) as usize,
            task_completion_rate: rate,
            total_units: 0,
            completed_units: 0,
            unit_completion_rate: 0,
            completion_rate: rate,
        }
    }

    fn stats(total: usize, completed: usize, rate: i64) -> TaskTypeStats {
        TaskTypeStats {
            total,
            completed,
            completion_rate: rate,
        }
    }

    #[test]
    fn test_strong_study_habits() {
        let set = analyze_study_hours(&study(4.5, 120.0, 90), now());
        assert_eq!(set.insights.len(), 1);
        assert_eq!(set.milestones.len(), 2);
        assert!(set.recommendations.is_empty());
    }

    #[test]
    fn test_weak_study_habits() {
        let set = analyze_study_hours(&study(2.0, 20.0, 40), now());
        assert_eq!(set.insights.len(), 1);
        assert_eq!(set.insights[0].severity, Severity::Warning);
        // low average + fixed schedule
        assert_eq!(set.recommendations.len(), 2);
    }

    #[test]
    fn test_subject_progress_rules() {
        let set = analyze_subject_progress(&[subject("ma101", 90), subject("cs102", 30)], now());
        // best positive, worst warning, overall 60 neither
        assert_eq!(set.insights.len(), 2);
        assert_eq!(set.milestones.len(), 1);
        assert_eq!(set.recommendations.len(), 1);
    }

    #[test]
    fn test_single_subject_skips_worst_rule() {
        let set = analyze_subject_progress(&[subject("ph101", 30)], now());
        assert_eq!(set.insights.len(), 1);
        assert_eq!(set.recommendations.len(), 1);
        assert_eq!(set.recommendations[0].category, "subjects");
    }

    #[test]
    fn test_no_subjects_no_insights() {
        assert!(analyze_subject_progress(&[], now()).is_empty());
    }

    #[test]
    fn test_task_type_gap() {
        let tasks = TaskCompletionAnalytics {
            total_tasks: 20,
            completed_tasks: 12,
            overall_completion_rate: 60,
            regular: stats(10, 9, 90),
            nptel: stats(10, 3, 30),
        };
        let set = analyze_task_completion(&tasks, now());
        assert_eq!(set.insights.len(), 1);
        assert_eq!(set.insights[0].severity, Severity::Info);
        assert!(set.insights[0].message.contains("regular tasks more reliably"));
    }

    #[test]
    fn test_task_gap_needs_both_types() {
        let tasks = TaskCompletionAnalytics {
            total_tasks: 10,
            completed_tasks: 3,
            overall_completion_rate: 30,
            regular: stats(10, 3, 30),
            nptel: TaskTypeStats::default(),
        };
        let set = analyze_task_completion(&tasks, now());
        assert_eq!(set.insights.len(), 1);
        assert_eq!(set.insights[0].severity, Severity::Warning);
        assert_eq!(set.recommendations.len(), 1);
    }
}
