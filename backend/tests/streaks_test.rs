//! Integration tests for activity streak endpoints

mod common;

use axum::http::StatusCode;
use common::{days_ago, TestApp};

#[tokio::test]
async fn test_record_and_list_streaks() {
    let app = TestApp::new();
    let path = app.user_path("/streaks/study");

    for n in [2, 1, 1] {
        let body = format!(r#"{{"date":"{}"}}"#, days_ago(n));
        let (status, _) = app.post(&path, &body).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = app.post(&path, "{}").await;
    assert_eq!(status, StatusCode::OK);
    let streak: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(streak["current_streak"], 3);
    assert_eq!(streak["longest_streak"], 3);

    let body = app.get_json(&app.user_path("/streaks")).await;
    let streaks = body["streaks"].as_array().unwrap();
    assert_eq!(streaks.len(), 1);
    assert_eq!(streaks[0]["activity_type"], "study");
}

#[tokio::test]
async fn test_lapsed_streak_reports_zero() {
    let app = TestApp::new();
    let body = format!(r#"{{"date":"{}"}}"#, days_ago(5));
    app.post(&app.user_path("/streaks/kriya"), &body).await;

    let body = app.get_json(&app.user_path("/streaks")).await;

    assert_eq!(body["streaks"][0]["current_streak"], 0);
    assert_eq!(body["streaks"][0]["longest_streak"], 1);
}

#[tokio::test]
async fn test_invalid_activity_rejected() {
    let app = TestApp::new();

    let (status, _) = app.post(&app.user_path("/streaks/Deep%20Work"), "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let future = format!(r#"{{"date":"{}"}}"#, days_ago(-1));
    let (status, _) = app.post(&app.user_path("/streaks/study"), &future).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_backfilled_date_restarts_streak() {
    let app = TestApp::new();
    let path = app.user_path("/streaks/typing");

    for n in [2, 1, 0] {
        let body = format!(r#"{{"date":"{}"}}"#, days_ago(n));
        app.post(&path, &body).await;
    }
    let body = format!(r#"{{"date":"{}"}}"#, days_ago(1));
    let (status, body) = app.post(&path, &body).await;
    assert_eq!(status, StatusCode::OK);

    let streak: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(streak["current_streak"], 1);
    assert_eq!(streak["longest_streak"], 3);
    assert_eq!(streak["last_activity_date"], days_ago(1).to_string());
}
