//! Insight service - rule-based insights over the 30-day snapshots

use crate::config::AnalyticsConfig;
use crate::error::ApiError;
use crate::repositories::Store;
use crate::services::analytics::AnalyticsService;
use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use once_cell::sync::Lazy;
use tracing::{debug, info};
use uuid::Uuid;
use vitality_shared::insights::{
    achievement_milestones, analyze_constipation, analyze_correlation, analyze_exercise,
    analyze_kriya, analyze_overall_wellness, analyze_study_hours, analyze_subject_progress,
    analyze_task_completion, analyze_typing, analyze_water_intake, streak_milestones,
    InsightFilter, InsightRanker, InsightReport, InsightSet,
};
use vitality_shared::types::{EducationAnalytics, HealthAnalytics, InsightsResponse};
use vitality_shared::validation::SubjectFilter;
use vitality_shared::WellnessScores;

static RANKER: Lazy<InsightRanker> = Lazy::new(InsightRanker::default);

/// Insight service
pub struct InsightService;

impl InsightService {
    /// Ranked insights, recommendations and milestones for a user
    pub async fn generate_insights(
        store: &dyn Store,
        user_id: Uuid,
        now: DateTime<Utc>,
        settings: &AnalyticsConfig,
    ) -> Result<InsightsResponse, ApiError> {
        let days = settings.default_window_days;
        let recent_since = now - Duration::days(i64::from(settings.recent_achievement_days));

        let (health, education, streaks, achievements, goals) = tokio::try_join!(
            AnalyticsService::health_analytics(store, user_id, days, now, settings),
            AnalyticsService::education_analytics(
                store,
                user_id,
                days,
                &SubjectFilter::All,
                now,
                settings
            ),
            async { store.streaks(user_id).await.map_err(ApiError::Internal) },
            async {
                store
                    .achievements(user_id, Some(recent_since))
                    .await
                    .map_err(ApiError::Internal)
            },
            async { store.goals(user_id, None).await.map_err(ApiError::Internal) },
        )?;

        let scores = WellnessScores::compute(&health, &education);
        let mut set = Self::analyze(&health, &education, &scores, now);
        set.merge(streak_milestones(&streaks, now.date_naive(), now));
        set.merge(achievement_milestones(&achievements, &goals, now));

        let response = Self::respond(set, scores, now);
        info!(
            %user_id,
            insights = response.total_insights,
            recommendations = response.recommendations.len(),
            milestones = response.milestones.len(),
            "Generated insights"
        );
        Ok(response)
    }

    /// Insight report grouped by category and severity after filtering
    pub async fn report(
        store: &dyn Store,
        user_id: Uuid,
        filter: &InsightFilter,
        now: DateTime<Utc>,
        settings: &AnalyticsConfig,
    ) -> Result<InsightReport, ApiError> {
        let response = Self::generate_insights(store, user_id, now, settings).await?;
        Ok(InsightReport::build(response.insights, filter))
    }

    /// Run every analyzer whose input carries data
    ///
    /// Cross-domain rules only run when both snapshots are non-empty.
    pub fn analyze(
        health: &HealthAnalytics,
        education: &EducationAnalytics,
        scores: &WellnessScores,
        now: DateTime<Utc>,
    ) -> InsightSet {
        let mut set = InsightSet::at(now);

        if let Some(water) = &health.water {
            set.merge(analyze_water_intake(water, now));
        }
        if let Some(exercise) = &health.exercise {
            set.merge(analyze_exercise(exercise, now));
        }
        if let Some(constipation) = &health.constipation {
            set.merge(analyze_constipation(constipation, now));
        }
        if let Some(kriya) = &health.kriya {
            set.merge(analyze_kriya(kriya, now));
        }
        if let Some(typing) = &health.typing {
            set.merge(analyze_typing(typing, now));
        }

        if let Some(study) = &education.study_hours {
            set.merge(analyze_study_hours(study, now));
        }
        if !education.subject_progress.is_empty() {
            set.merge(analyze_subject_progress(&education.subject_progress, now));
        }
        if let Some(tasks) = &education.task_completion {
            set.merge(analyze_task_completion(tasks, now));
        }

        if health.is_empty() || education.is_empty() {
            debug!("Skipping cross-domain rules, one domain has no data");
            return set;
        }

        if let Some(study) = &education.study_hours {
            let study_trend = study.aggregate.trend;
            if let Some(exercise) = &health.exercise {
                if let Some(found) = analyze_correlation(
                    "exercise",
                    exercise.aggregate.trend,
                    "study hours",
                    study_trend,
                    now,
                ) {
                    set.merge(found);
                }
            }
            if let Some(kriya) = &health.kriya {
                if let Some(found) = analyze_correlation(
                    "kriya practice",
                    kriya.aggregate.trend,
                    "study hours",
                    study_trend,
                    now,
                ) {
                    set.merge(found);
                }
            }
        }
        if let Some(found) = analyze_overall_wellness(scores, now) {
            set.merge(found);
        }

        set
    }

    fn respond(set: InsightSet, scores: WellnessScores, now: DateTime<Utc>) -> InsightsResponse {
        let insights = RANKER.rank_insights(set.insights);
        let recommendations = RANKER.prioritize_recommendations(set.recommendations);

        for insight in &insights {
            counter!("vitality_insights_generated_total", "severity" => insight.severity.as_str())
                .increment(1);
        }

        InsightsResponse {
            total_insights: insights.len(),
            actionable_recommendations: recommendations.iter().filter(|r| r.actionable).count(),
            insights,
            recommendations,
            milestones: set.milestones,
            scores,
            generated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{ExerciseLog, InMemoryStore, StudyLog, WaterLog};
    use chrono::NaiveDate;
    use vitality_shared::insights::Severity;

    fn days_ago(now: DateTime<Utc>, n: i64) -> NaiveDate {
        now.date_naive() - Duration::days(n)
    }

    #[tokio::test]
    async fn test_no_data_yields_empty_response() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let response =
            InsightService::generate_insights(&store, Uuid::new_v4(), now, &AnalyticsConfig::default())
                .await
                .unwrap();

        assert!(response.insights.is_empty());
        assert!(response.recommendations.is_empty());
        assert!(response.milestones.is_empty());
        assert_eq!(response.scores, WellnessScores::default());
        assert_eq!(response.generated_at, now);
    }

    #[tokio::test]
    async fn test_single_domain_skips_cross_domain_rules() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        let now = Utc::now();
        for n in 0..10 {
            store
                .upsert_water(user, WaterLog { date: days_ago(now, n), amount_ml: 1000 })
                .await;
        }

        let response =
            InsightService::generate_insights(&store, user, now, &AnalyticsConfig::default())
                .await
                .unwrap();

        assert_eq!(response.insights[0].severity, Severity::Critical);
        assert_eq!(response.insights[0].category, "hydration");
        assert!(response
            .insights
            .iter()
            .all(|i| i.category != "correlation" && i.category != "wellness"));
        assert_eq!(response.total_insights, response.insights.len());
    }

    #[tokio::test]
    async fn test_rising_exercise_and_study_correlate() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        let now = Utc::now();
        for n in 0..10 {
            let late = n < 5;
            store
                .upsert_exercise(
                    user,
                    ExerciseLog {
                        date: days_ago(now, n),
                        steps: if late { 9000 } else { 4000 },
                        activity_type: "walking".to_string(),
                        duration_minutes: 30,
                    },
                )
                .await;
            store
                .upsert_study(
                    user,
                    StudyLog {
                        date: days_ago(now, n),
                        hours: if late { 4.0 } else { 2.0 },
                    },
                )
                .await;
        }

        let response =
            InsightService::generate_insights(&store, user, now, &AnalyticsConfig::default())
                .await
                .unwrap();

        let correlation: Vec<_> = response
            .insights
            .iter()
            .filter(|i| i.category == "correlation")
            .collect();
        assert_eq!(correlation.len(), 1);
        assert_eq!(correlation[0].severity, Severity::Positive);
    }

    #[tokio::test]
    async fn test_report_filters_by_category() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        let now = Utc::now();
        for n in 0..10 {
            store
                .upsert_water(user, WaterLog { date: days_ago(now, n), amount_ml: 1000 })
                .await;
            store
                .upsert_study(user, StudyLog { date: days_ago(now, n), hours: 1.0 })
                .await;
        }

        let filter = InsightFilter {
            category: Some("hydration".to_string()),
            ..InsightFilter::default()
        };
        let report =
            InsightService::report(&store, user, &filter, now, &AnalyticsConfig::default())
                .await
                .unwrap();

        assert!(report.total > 0);
        assert_eq!(report.by_category.len(), 1);
        assert!(report.items.iter().all(|i| i.category == "hydration"));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);
        let result = InsightService::generate_insights(
            &store,
            Uuid::new_v4(),
            Utc::now(),
            &AnalyticsConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Internal(_))));
    }
}
