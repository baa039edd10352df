//! Ordering of insights and recommendations

use super::{Insight, Level, Recommendation, Severity};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};

/// Rank tables, earliest entry sorts first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankingConfig {
    pub severity_order: Vec<Severity>,
    pub priority_order: Vec<Level>,
    pub impact_order: Vec<Level>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            severity_order: vec![
                Severity::Critical,
                Severity::Warning,
                Severity::Info,
                Severity::Positive,
            ],
            priority_order: vec![Level::High, Level::Medium, Level::Low],
            impact_order: vec![Level::High, Level::Medium, Level::Low],
        }
    }
}

/// Position in a rank table; values missing from the table sort last
fn rank_of<T: PartialEq>(order: &[T], value: &T) -> usize {
    order
        .iter()
        .position(|candidate| candidate == value)
        .unwrap_or(order.len())
}

#[derive(Debug, Clone, Default)]
pub struct InsightRanker {
    config: RankingConfig,
}

impl InsightRanker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Severity, then actionable first, then newest first
    pub fn rank_insights(&self, mut insights: Vec<Insight>) -> Vec<Insight> {
        insights.sort_by(|a, b| self.compare_insights(a, b));
        insights
    }

    /// Priority, then estimated impact, then actionable first
    pub fn prioritize_recommendations(
        &self,
        mut recommendations: Vec<Recommendation>,
    ) -> Vec<Recommendation> {
        recommendations.sort_by(|a, b| self.compare_recommendations(a, b));
        recommendations
    }

    fn compare_insights(&self, a: &Insight, b: &Insight) -> Ordering {
        let order = &self.config.severity_order;
        rank_of(order, &a.severity)
            .cmp(&rank_of(order, &b.severity))
            .then_with(|| Reverse(a.actionable).cmp(&Reverse(b.actionable)))
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    }

    fn compare_recommendations(&self, a: &Recommendation, b: &Recommendation) -> Ordering {
        let priority = &self.config.priority_order;
        let impact = &self.config.impact_order;
        rank_of(priority, &a.priority)
            .cmp(&rank_of(priority, &b.priority))
            .then_with(|| rank_of(impact, &a.estimated_impact).cmp(&rank_of(impact, &b.estimated_impact)))
            .then_with(|| Reverse(a.actionable).cmp(&Reverse(b.actionable)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::fixtures::now;
    use crate::insights::{InsightKind, InsightSet};
    use chrono::Duration;
    use proptest::prelude::*;

    fn insight(severity: Severity, actionable: bool, minutes_ago: i64, message: &str) -> Insight {
        Insight {
            kind: InsightKind::Health,
            category: "test".to_string(),
            message: message.to_string(),
            severity,
            actionable,
            icon: "info".to_string(),
            timestamp: now() - Duration::minutes(minutes_ago),
        }
    }

    fn recommendation(priority: Level, impact: Level, actionable: bool, message: &str) -> Recommendation {
        Recommendation {
            kind: InsightKind::Education,
            category: "test".to_string(),
            message: message.to_string(),
            actionable,
            priority,
            estimated_impact: impact,
            icon: "info".to_string(),
        }
    }

    #[test]
    fn test_rank_insights_order() {
        let ranker = InsightRanker::default();
        let ranked = ranker.rank_insights(vec![
            insight(Severity::Positive, false, 0, "positive"),
            insight(Severity::Warning, false, 0, "warning passive"),
            insight(Severity::Warning, true, 10, "warning old"),
            insight(Severity::Warning, true, 0, "warning new"),
            insight(Severity::Critical, false, 5, "critical"),
        ]);
        let messages: Vec<&str> = ranked.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["critical", "warning new", "warning old", "warning passive", "positive"]
        );
    }

    #[test]
    fn test_prioritize_recommendations_order() {
        let ranker = InsightRanker::default();
        let ranked = ranker.prioritize_recommendations(vec![
            recommendation(Level::Low, Level::High, true, "low"),
            recommendation(Level::High, Level::Medium, true, "high medium"),
            recommendation(Level::High, Level::High, false, "high high passive"),
            recommendation(Level::High, Level::High, true, "high high"),
        ]);
        let messages: Vec<&str> = ranked.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["high high", "high high passive", "high medium", "low"]
        );
    }

    #[test]
    fn test_encouragement_ranks_after_action_at_same_level() {
        let mut set = InsightSet::at(now());
        set.encourage(
            InsightKind::Correlation,
            "correlation",
            Level::Low,
            Level::Medium,
            "thumbs-up",
            "keep going",
        )
        .recommend(
            InsightKind::Health,
            "hydration",
            Level::Low,
            Level::Medium,
            "calendar",
            "log daily",
        );

        let ranked = InsightRanker::default().prioritize_recommendations(set.recommendations);
        assert_eq!(ranked[0].message, "log daily");
        assert!(ranked[0].actionable);
        assert!(!ranked[1].actionable);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranker = InsightRanker::default();
        let ranked = ranker.rank_insights(vec![
            insight(Severity::Info, false, 0, "first"),
            insight(Severity::Info, false, 0, "second"),
        ]);
        assert_eq!(ranked[0].message, "first");
        assert_eq!(ranked[1].message, "second");
    }

    #[test]
    fn test_custom_severity_order() {
        let ranker = InsightRanker::new(RankingConfig {
            severity_order: vec![Severity::Positive, Severity::Critical],
            ..Default::default()
        });
        let ranked = ranker.rank_insights(vec![
            insight(Severity::Info, false, 0, "info"),
            insight(Severity::Critical, false, 0, "critical"),
            insight(Severity::Positive, false, 0, "positive"),
        ]);
        let messages: Vec<&str> = ranked.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(messages, vec!["positive", "critical", "info"]);
    }

    fn severity_strategy() -> impl Strategy<Value = Severity> {
        prop_oneof![
            Just(Severity::Critical),
            Just(Severity::Warning),
            Just(Severity::Info),
            Just(Severity::Positive),
        ]
    }

    fn level_strategy() -> impl Strategy<Value = Level> {
        prop_oneof![Just(Level::High), Just(Level::Medium), Just(Level::Low)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn ranking_sorted_list_is_noop(
            items in prop::collection::vec((severity_strategy(), any::<bool>(), 0i64..60), 0..20)
        ) {
            let ranker = InsightRanker::default();
            let insights: Vec<Insight> = items
                .iter()
                .enumerate()
                .map(|(idx, (s, a, m))| insight(*s, *a, *m, &idx.to_string()))
                .collect();
            let once = ranker.rank_insights(insights);
            let twice = ranker.rank_insights(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn ranking_severity_never_inverts(
            items in prop::collection::vec((severity_strategy(), any::<bool>(), 0i64..60), 0..20)
        ) {
            let ranker = InsightRanker::default();
            let insights: Vec<Insight> = items
                .iter()
                .map(|(s, a, m)| insight(*s, *a, *m, "x"))
                .collect();
            let ranked = ranker.rank_insights(insights);
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].severity <= pair[1].severity);
            }
        }

        #[test]
        fn prioritizing_sorted_list_is_noop(
            items in prop::collection::vec((level_strategy(), level_strategy(), any::<bool>()), 0..20)
        ) {
            let ranker = InsightRanker::default();
            let recommendations: Vec<Recommendation> = items
                .iter()
                .enumerate()
                .map(|(idx, (p, i, a))| recommendation(*p, *i, *a, &idx.to_string()))
                .collect();
            let once = ranker.prioritize_recommendations(recommendations);
            let twice = ranker.prioritize_recommendations(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
