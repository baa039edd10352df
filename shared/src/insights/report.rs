//! Grouped view over a ranked insight list

use super::{Insight, Severity};
use crate::errors::DomainError;
use crate::types::InsightFilterQuery;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Post-hoc filter; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsightFilter {
    pub category: Option<String>,
    pub severity: Option<Severity>,
    pub actionable: Option<bool>,
}

impl InsightFilter {
    pub fn from_query(query: &InsightFilterQuery) -> Result<Self, DomainError> {
        let severity = query
            .severity
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().parse::<Severity>())
            .transpose()?;

        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase);

        Ok(Self {
            category,
            severity,
            actionable: query.actionable,
        })
    }

    pub fn matches(&self, insight: &Insight) -> bool {
        self.category
            .as_deref()
            .map_or(true, |c| insight.category.eq_ignore_ascii_case(c))
            && self.severity.map_or(true, |s| insight.severity == s)
            && self.actionable.map_or(true, |a| insight.actionable == a)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightReport {
    pub total: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
    pub items: Vec<Insight>,
}

impl InsightReport {
    /// Filters first, then counts what is left; item order is preserved
    pub fn build(insights: Vec<Insight>, filter: &InsightFilter) -> Self {
        let items: Vec<Insight> = insights.into_iter().filter(|i| filter.matches(i)).collect();

        let mut by_category = BTreeMap::new();
        let mut by_severity = BTreeMap::new();
        for insight in &items {
            *by_category.entry(insight.category.clone()).or_insert(0) += 1;
            *by_severity.entry(insight.severity).or_insert(0) += 1;
        }

        Self {
            total: items.len(),
            by_category,
            by_severity,
            items,
        }
    }
}
