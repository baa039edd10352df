//! Integration tests for the insights endpoints

mod common;

use axum::http::StatusCode;
use common::{days_ago, TestApp};
use vitality_backend::repositories::{StudyLog, WaterLog};

async fn seed_low_water_and_study(app: &TestApp) {
    for n in 0..10 {
        app.store
            .upsert_water(app.user_id, WaterLog { date: days_ago(n), amount_ml: 900 })
            .await;
        app.store
            .upsert_study(app.user_id, StudyLog { date: days_ago(n), hours: 1.0 })
            .await;
    }
}

#[tokio::test]
async fn test_insights_without_data_are_empty() {
    let app = TestApp::new();

    let body = app.get_json(&app.user_path("/insights")).await;

    assert_eq!(body["insights"].as_array().unwrap().len(), 0);
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 0);
    assert_eq!(body["milestones"].as_array().unwrap().len(), 0);
    assert_eq!(body["total_insights"], 0);
    assert_eq!(body["scores"]["health_score"], 0);
}

#[tokio::test]
async fn test_insights_are_ranked_by_severity() {
    let app = TestApp::new();
    seed_low_water_and_study(&app).await;

    let body = app.get_json(&app.user_path("/insights")).await;

    let rank = |severity: &str| match severity {
        "critical" => 0,
        "warning" => 1,
        "info" => 2,
        _ => 3,
    };
    let severities: Vec<i32> = body["insights"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| rank(i["severity"].as_str().unwrap()))
        .collect();
    assert!(!severities.is_empty());
    assert!(severities.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(body["insights"][0]["severity"], "critical");
    assert_eq!(body["total_insights"], severities.len());

    // Both domains are weak, so the overall wellness rule fires
    assert!(body["insights"]
        .as_array()
        .unwrap()
        .iter()
        .any(|i| i["category"] == "wellness"));
}

#[tokio::test]
async fn test_streak_milestone_appears() {
    let app = TestApp::new();
    for n in (0..7).rev() {
        let body = format!(r#"{{"date":"{}"}}"#, days_ago(n));
        app.post(&app.user_path("/streaks/study"), &body).await;
    }

    let body = app.get_json(&app.user_path("/insights")).await;

    let milestones = body["milestones"].as_array().unwrap();
    assert_eq!(milestones.len(), 1);
    assert_eq!(milestones[0]["type"], "achievement");
    assert_eq!(milestones[0]["message"], "7 day study streak");
}

#[tokio::test]
async fn test_report_filters_and_groups() {
    let app = TestApp::new();
    seed_low_water_and_study(&app).await;

    let body = app
        .get_json(&app.user_path("/insights/report?category=Hydration"))
        .await;

    let items = body["items"].as_array().unwrap();
    assert!(!items.is_empty());
    assert!(items.iter().all(|i| i["category"] == "hydration"));
    assert_eq!(body["total"], items.len());
    assert_eq!(body["by_category"]["hydration"], items.len());

    let (status, body) = app
        .get(&app.user_path("/insights/report?severity=urgent"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("VALIDATION_ERROR"));
}
