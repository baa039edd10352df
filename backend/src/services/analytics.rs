//! Analytics service - per-metric period aggregates for health and education
//!
//! Every metric goes through the same pipeline: fetch rows for the current
//! and comparison windows, extract a daily series, aggregate, then add the
//! metric-specific extras and the linked goal's progress.

use crate::config::AnalyticsConfig;
use crate::error::ApiError;
use crate::repositories::{
    ConstipationLog, ExerciseLog, KriyaLog, PeriodLog, Store, StudyLog, SubjectRecord, TaskRecord,
    TypingLog, WaterLog, TASK_TYPE_NPTEL, TASK_TYPE_REGULAR,
};
use crate::services::goals::GoalTracker;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;
use uuid::Uuid;
use vitality_shared::aggregation::{aggregate, series_from};
use vitality_shared::consistency::calculate_streaks;
use vitality_shared::metrics::RECOMMENDED_WATER_ML;
use vitality_shared::scoring::{health_score, productivity_score};
use vitality_shared::stats::{mean, percentage, round_half_up, round_to};
use vitality_shared::types::{
    ConstipationAnalytics, EducationAnalytics, EducationSummary, ExerciseAnalytics,
    HealthAnalytics, HealthSummary, KriyaAnalytics, PeriodAnalytics, StudyHoursAnalytics,
    SubjectProgress, TaskCompletionAnalytics, TaskTypeStats, TypingAnalytics, WaterAnalytics,
};
use vitality_shared::validation::SubjectFilter;
use vitality_shared::{AggregationWindow, Goal, MetricKey, PeriodAggregate};

/// Analytics service
pub struct AnalyticsService;

impl AnalyticsService {
    /// Health analytics over the `days`-day window ending today
    pub async fn health_analytics(
        store: &dyn Store,
        user_id: Uuid,
        days: u32,
        now: DateTime<Utc>,
        settings: &AnalyticsConfig,
    ) -> Result<HealthAnalytics, ApiError> {
        let window = AggregationWindow::ending_on(now.date_naive(), days);
        let range = window.fetch_range();
        debug!(%user_id, days, "Aggregating health metrics");

        let (water, exercise, period, constipation, kriya, typing, goals) = tokio::try_join!(
            store.water_logs(user_id, range),
            store.exercise_logs(user_id, range),
            store.period_logs(user_id, range),
            store.constipation_logs(user_id, range),
            store.kriya_logs(user_id, range),
            store.typing_logs(user_id, range),
            store.goals(user_id, Some(vitality_shared::GoalStatus::Active)),
        )
        .map_err(ApiError::Internal)?;

        let mut water = water_analytics(&water, &window);
        let mut exercise = exercise_analytics(&exercise, &window);
        let period = period_analytics(&period, &window);
        let mut constipation = constipation_analytics(&constipation, &window);
        let mut kriya = kriya_analytics(&kriya, &window);
        let mut typing = typing_analytics(&typing, &window);

        let linked = GoalLink {
            store,
            user_id,
            goals: &goals,
            now,
            lookback: settings.goal_lookback_days,
        };
        if let Some(w) = water.as_mut() {
            linked.attach(&[MetricKey::WaterIntake], &mut w.aggregate).await?;
        }
        if let Some(e) = exercise.as_mut() {
            linked.attach(&[MetricKey::ExerciseSteps], &mut e.aggregate).await?;
        }
        if let Some(c) = constipation.as_mut() {
            linked
                .attach(&[MetricKey::ConstipationPositiveRate], &mut c.aggregate)
                .await?;
        }
        if let Some(k) = kriya.as_mut() {
            linked.attach(&[MetricKey::KriyaSessions], &mut k.aggregate).await?;
        }
        if let Some(t) = typing.as_mut() {
            linked
                .attach(&[MetricKey::TypingCompletionRate], &mut t.aggregate)
                .await?;
        }

        let mut analytics = HealthAnalytics {
            water,
            exercise,
            period,
            constipation,
            kriya,
            typing,
            summary: HealthSummary {
                start_date: window.current.start,
                end_date: window.current.end,
                window_days: window.days(),
                metrics_tracked: 0,
                health_score: 0,
            },
        };
        analytics.summary.metrics_tracked = analytics.metrics_tracked();
        analytics.summary.health_score = health_score(&analytics);

        Ok(analytics)
    }

    /// Education analytics over the `days`-day window ending today
    pub async fn education_analytics(
        store: &dyn Store,
        user_id: Uuid,
        days: u32,
        subjects: &SubjectFilter,
        now: DateTime<Utc>,
        settings: &AnalyticsConfig,
    ) -> Result<EducationAnalytics, ApiError> {
        let window = AggregationWindow::ending_on(now.date_naive(), days);
        debug!(%user_id, days, ?subjects, "Aggregating education metrics");

        let (study, tasks, subject_rows, goals) = tokio::try_join!(
            store.study_logs(user_id, window.fetch_range()),
            store.tasks(user_id, window.current),
            store.subjects(user_id),
            store.goals(user_id, Some(vitality_shared::GoalStatus::Active)),
        )
        .map_err(ApiError::Internal)?;

        let tasks: Vec<TaskRecord> = tasks
            .into_iter()
            .filter(|t| subjects.includes(&t.subject_code))
            .collect();

        let mut study_hours = study_hours_analytics(&study, &window);
        if let Some(s) = study_hours.as_mut() {
            GoalLink {
                store,
                user_id,
                goals: &goals,
                now,
                lookback: settings.goal_lookback_days,
            }
            .attach(&[MetricKey::StudyHours, MetricKey::DailyStudyHours], &mut s.aggregate)
            .await?;
        }

        let subject_progress = subject_progress(&subject_rows, &tasks, subjects);
        let task_completion = task_completion(&tasks);

        let mut analytics = EducationAnalytics {
            summary: EducationSummary {
                start_date: window.current.start,
                end_date: window.current.end,
                window_days: window.days(),
                subjects_tracked: subject_progress.len(),
                total_study_hours: study_hours.as_ref().map_or(0.0, |s| s.total_hours),
                productivity_score: 0,
            },
            study_hours,
            subject_progress,
            task_completion,
        };
        analytics.summary.productivity_score = productivity_score(&analytics);

        Ok(analytics)
    }
}

/// Goal linkage for the aggregates of one request
struct GoalLink<'a> {
    store: &'a dyn Store,
    user_id: Uuid,
    /// Active goals, newest first
    goals: &'a [Goal],
    now: DateTime<Utc>,
    lookback: u32,
}

impl GoalLink<'_> {
    /// Attach the progress of the newest active goal on any of `metrics`, if any
    async fn attach(
        &self,
        metrics: &[MetricKey],
        aggregate: &mut PeriodAggregate,
    ) -> Result<(), ApiError> {
        let Some(goal) = self.goals.iter().find(|g| metrics.contains(&g.metric)) else {
            return Ok(());
        };
        let progress = GoalTracker::evaluate_progress(self.store, goal, self.now, self.lookback).await?;
        aggregate.goal_progress = Some(progress);
        Ok(())
    }
}

// ============================================================================
// Per-metric builders
// ============================================================================

/// Aggregate rows over the window; `None` when the current window has no rows
fn aggregate_rows<R>(
    rows: &[R],
    window: &AggregationWindow,
    date: impl Fn(&R) -> NaiveDate,
    value: impl Fn(&R) -> f64,
) -> Option<PeriodAggregate> {
    let series = series_from(rows, date, value);
    let aggregate = aggregate(&series, window);
    (aggregate.days_tracked > 0).then_some(aggregate)
}

fn in_current<'a, R>(
    rows: &'a [R],
    window: &'a AggregationWindow,
    date: impl Fn(&R) -> NaiveDate + 'a,
) -> impl Iterator<Item = &'a R> + 'a {
    rows.iter().filter(move |r| window.current.contains(date(*r)))
}

fn flag(set: bool) -> f64 {
    if set {
        1.0
    } else {
        0.0
    }
}

fn water_analytics(rows: &[WaterLog], window: &AggregationWindow) -> Option<WaterAnalytics> {
    let aggregate = aggregate_rows(rows, window, |r| r.date, |r| f64::from(r.amount_ml))?;
    Some(WaterAnalytics {
        aggregate,
        recommended_daily_ml: RECOMMENDED_WATER_ML,
    })
}

fn exercise_analytics(rows: &[ExerciseLog], window: &AggregationWindow) -> Option<ExerciseAnalytics> {
    let aggregate = aggregate_rows(rows, window, |r| r.date, |r| f64::from(r.steps))?;

    let mut total_duration_minutes = 0i64;
    let mut activity_types = BTreeMap::new();
    for row in in_current(rows, window, |r| r.date) {
        total_duration_minutes += i64::from(row.duration_minutes);
        *activity_types.entry(row.activity_type.to_lowercase()).or_insert(0) += 1;
    }

    Some(ExerciseAnalytics {
        average_steps: aggregate.average,
        aggregate,
        total_duration_minutes,
        activity_types,
    })
}

fn period_analytics(rows: &[PeriodLog], window: &AggregationWindow) -> Option<PeriodAnalytics> {
    let aggregate = aggregate_rows(rows, window, |r| r.date, |r| flag(r.is_period_day))?;

    // Includes the comparison window so a cycle running into the window
    // is not mistaken for a new one on its first day
    let period_dates: HashSet<NaiveDate> = rows
        .iter()
        .filter(|r| r.is_period_day)
        .map(|r| r.date)
        .collect();

    let mut current: Vec<NaiveDate> = in_current(rows, window, |r| r.date)
        .filter(|r| r.is_period_day)
        .map(|r| r.date)
        .collect();
    current.sort();

    let cycle_starts: Vec<NaiveDate> = current
        .iter()
        .copied()
        .filter(|d| !period_dates.contains(&(*d - Duration::days(1))))
        .collect();

    let cycle_lengths: Vec<f64> = cycle_starts
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days() as f64)
        .collect();
    let average_cycle_length = (!cycle_lengths.is_empty()).then(|| round_to(mean(&cycle_lengths), 1));

    Some(PeriodAnalytics {
        aggregate,
        period_days: current.len(),
        cycle_starts,
        average_cycle_length,
    })
}

fn constipation_analytics(
    rows: &[ConstipationLog],
    window: &AggregationWindow,
) -> Option<ConstipationAnalytics> {
    let aggregate = aggregate_rows(rows, window, |r| r.date, |r| flag(r.had_bowel_movement))?;
    let positive = in_current(rows, window, |r| r.date)
        .filter(|r| r.had_bowel_movement)
        .count();

    Some(ConstipationAnalytics {
        positive_rate: percentage(positive as f64, aggregate.days_tracked as f64),
        aggregate,
    })
}

fn kriya_analytics(rows: &[KriyaLog], window: &AggregationWindow) -> Option<KriyaAnalytics> {
    let aggregate = aggregate_rows(rows, window, |r| r.date, |r| flag(r.completed))?;
    let completed: Vec<NaiveDate> = in_current(rows, window, |r| r.date)
        .filter(|r| r.completed)
        .map(|r| r.date)
        .collect();
    let consistency = calculate_streaks(&completed, window.days(), window.today);

    Some(KriyaAnalytics {
        aggregate,
        total_sessions: completed.len(),
        consistency_rate: consistency.consistency_rate,
        consistency,
    })
}

fn typing_analytics(rows: &[TypingLog], window: &AggregationWindow) -> Option<TypingAnalytics> {
    let aggregate = aggregate_rows(rows, window, |r| r.date, |r| flag(r.completed))?;
    let current: Vec<&TypingLog> = in_current(rows, window, |r| r.date).collect();
    let completed_count = current.iter().filter(|r| r.completed).count();
    let wpm: Vec<f64> = current.iter().filter_map(|r| r.wpm).collect();

    Some(TypingAnalytics {
        completion_rate: percentage(completed_count as f64, current.len() as f64),
        completed_count,
        average_wpm: (!wpm.is_empty()).then(|| round_to(mean(&wpm), 1)),
        aggregate,
    })
}

fn study_hours_analytics(rows: &[StudyLog], window: &AggregationWindow) -> Option<StudyHoursAnalytics> {
    let aggregate = aggregate_rows(rows, window, |r| r.date, |r| r.hours)?;
    let study_dates: Vec<NaiveDate> = in_current(rows, window, |r| r.date)
        .filter(|r| r.hours > 0.0)
        .map(|r| r.date)
        .collect();

    Some(StudyHoursAnalytics {
        average_hours: aggregate.average,
        total_hours: aggregate.total,
        consistency: calculate_streaks(&study_dates, window.days(), window.today),
        aggregate,
    })
}

fn task_stats<'a>(tasks: impl Iterator<Item = &'a TaskRecord>) -> TaskTypeStats {
    let (total, completed) = tasks.fold((0usize, 0usize), |(t, c), task| {
        (t + 1, c + usize::from(task.completed))
    });
    TaskTypeStats {
        total,
        completed,
        completion_rate: percentage(completed as f64, total as f64),
    }
}

/// Subjects with tasks in the window or unit tracking, ordered by code
fn subject_progress(
    subjects: &[SubjectRecord],
    tasks: &[TaskRecord],
    filter: &SubjectFilter,
) -> Vec<SubjectProgress> {
    subjects
        .iter()
        .filter(|s| filter.includes(&s.code))
        .filter_map(|subject| {
            let stats = task_stats(
                tasks
                    .iter()
                    .filter(|t| t.subject_code.eq_ignore_ascii_case(&subject.code)),
            );
            if stats.total == 0 && subject.total_units <= 0 {
                return None;
            }

            let unit_completion_rate = percentage(
                f64::from(subject.completed_units),
                f64::from(subject.total_units.max(0)),
            );
            let completion_rate = match (stats.total > 0, subject.total_units > 0) {
                (true, true) => round_half_up(
                    (stats.completion_rate + unit_completion_rate) as f64 / 2.0,
                ),
                (true, false) => stats.completion_rate,
                (false, _) => unit_completion_rate,
            };

            Some(SubjectProgress {
                subject_code: subject.code.clone(),
                subject_name: subject.name.clone(),
                total_tasks: stats.total,
                completed_tasks: stats.completed,
                task_completion_rate: stats.completion_rate,
                total_units: subject.total_units,
                completed_units: subject.completed_units,
                unit_completion_rate,
                completion_rate,
            })
        })
        .collect()
}

fn task_completion(tasks: &[TaskRecord]) -> Option<TaskCompletionAnalytics> {
    if tasks.is_empty() {
        return None;
    }
    let overall = task_stats(tasks.iter());
    Some(TaskCompletionAnalytics {
        total_tasks: overall.total,
        completed_tasks: overall.completed,
        overall_completion_rate: overall.completion_rate,
        regular: task_stats(
            tasks
                .iter()
                .filter(|t| t.task_type.eq_ignore_ascii_case(TASK_TYPE_REGULAR)),
        ),
        nptel: task_stats(
            tasks
                .iter()
                .filter(|t| t.task_type.eq_ignore_ascii_case(TASK_TYPE_NPTEL)),
        ),
    })
}
