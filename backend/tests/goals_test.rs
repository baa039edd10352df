//! Integration tests for goal tracking endpoints

mod common;

use axum::http::StatusCode;
use common::{days_ago, TestApp};
use vitality_backend::repositories::{GoalStore, StudyLog, WaterLog};
use vitality_shared::{Goal, GoalType, MetricKey, NewGoal};

async fn create_goal(app: &TestApp, goal_type: GoalType, metric: MetricKey, target: f64) -> Goal {
    app.store
        .create_goal(NewGoal {
            user_id: app.user_id,
            goal_type,
            metric,
            target,
            description: Some("integration test goal".to_string()),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_progress_lists_active_goals() {
    let app = TestApp::new();
    create_goal(&app, GoalType::Health, MetricKey::WaterIntake, 2000.0).await;
    for n in 0..3 {
        app.store
            .upsert_water(app.user_id, WaterLog { date: days_ago(n), amount_ml: 1500 })
            .await;
    }

    let body = app.get_json(&app.user_path("/goals/progress")).await;

    let goals = body["goals"].as_array().unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0]["metric"], "water_intake");
    assert_eq!(goals[0]["status"], "active");
    assert_eq!(goals[0]["progress"]["current_value"], 1500.0);
    assert_eq!(goals[0]["progress"]["progress"], 75);
    assert_eq!(goals[0]["progress"]["progress_status"], "behind");
}

#[tokio::test]
async fn test_achievement_check_is_idempotent() {
    let app = TestApp::new();
    let goal = create_goal(&app, GoalType::Education, MetricKey::StudyHours, 3.0).await;
    for n in 0..4 {
        app.store
            .upsert_study(app.user_id, StudyLog { date: days_ago(n), hours: 3.5 })
            .await;
    }

    let path = app.user_path("/goals/achievements/check");
    let (status, body) = app.post(&path, "{}").await;
    assert_eq!(status, StatusCode::OK);
    let first: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(first["count"], 1);
    assert_eq!(first["achieved"][0]["id"], goal.id.to_string());
    assert_eq!(first["achieved"][0]["status"], "completed");
    assert_eq!(first["achieved"][0]["achievement"]["achieved_value"], 3.5);

    let (_, body) = app.post(&path, "{}").await;
    let second: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(second["count"], 0);

    let stats = app.get_json(&app.user_path("/goals/stats")).await;
    assert_eq!(stats["overall"]["total"], 1);
    assert_eq!(stats["overall"]["completed"], 1);
    assert_eq!(stats["recent_achievements"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_goal_streak_endpoint() {
    let app = TestApp::new();
    create_goal(&app, GoalType::Health, MetricKey::ExerciseSteps, 8000.0).await;

    let empty = app.get_json(&app.user_path("/goals/streaks/study_hours")).await;
    assert_eq!(empty["current_streak"], 0);
    assert!(empty["goal_id"].is_null());

    let body = app
        .get_json(&app.user_path("/goals/streaks/exercise_steps?goal_type=health"))
        .await;
    assert_eq!(body["target"], 8000.0);
    assert_eq!(body["current_streak"], 0);

    let (status, _) = app.get(&app.user_path("/goals/streaks/sleep_hours")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_transitions() {
    let app = TestApp::new();
    let goal = create_goal(&app, GoalType::Health, MetricKey::KriyaSessions, 20.0).await;
    let path = app.user_path(&format!("/goals/{}/status", goal.id));

    let (status, body) = app.put(&path, r#"{"status":"paused"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"paused\""));

    let (status, body) = app.put(&path, r#"{"status":"completed"}"#).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("CONFLICT"));

    let (status, _) = app.put(&path, r#"{"status":"active"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.put(&path, r#"{"status":"archived"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = app.user_path(&format!("/goals/{}/status", uuid::Uuid::new_v4()));
    let (status, _) = app.put(&missing, r#"{"status":"paused"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
