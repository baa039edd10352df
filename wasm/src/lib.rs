//! Vitality WASM Module
//!
//! WebAssembly bindings for the analytics calculations the dashboard runs
//! in the browser. Structured results cross the boundary as JSON strings.

use chrono::NaiveDate;
use vitality_shared::consistency::calculate_streaks;
use vitality_shared::goals::{calculate_progress, classify_progress};
use vitality_shared::scoring::capped_ratio;
use vitality_shared::trend::calculate_trend;
use wasm_bindgen::prelude::*;

/// Trend of a series as `{"trend": ..., "percentage": ...}`
#[wasm_bindgen]
pub fn trend(values: &[f64]) -> Result<String, JsError> {
    Ok(serde_json::to_string(&calculate_trend(values))?)
}

/// Goal progress percentage, capped to 0..=100
#[wasm_bindgen]
pub fn goal_progress(current_value: f64, target: f64) -> i32 {
    // always within 0..=100
    calculate_progress(current_value, target) as i32
}

/// Progress classification: achieved, on_track, behind or needs_attention
#[wasm_bindgen]
pub fn progress_status(progress: i32) -> Result<String, JsError> {
    let status = classify_progress(i64::from(progress));
    Ok(serde_json::to_value(status)?
        .as_str()
        .unwrap_or_default()
        .to_string())
}

/// Share of a target reached, capped at 100
#[wasm_bindgen]
pub fn target_ratio(value: f64, target: f64) -> f64 {
    capped_ratio(value, target)
}

/// Consistency report for a JSON array of ISO dates over `window_days`
/// days ending on `today` (ISO date)
#[wasm_bindgen]
pub fn consistency(dates_json: &str, window_days: u32, today: &str) -> Result<String, JsError> {
    let dates: Vec<NaiveDate> = serde_json::from_str(dates_json)?;
    let today: NaiveDate = today.parse()?;
    let report = calculate_streaks(&dates, i64::from(window_days), today);
    Ok(serde_json::to_string(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_progress_is_capped() {
        assert_eq!(goal_progress(1500.0, 2000.0), 75);
        assert_eq!(goal_progress(5000.0, 2000.0), 100);
        assert_eq!(goal_progress(10.0, 0.0), 0);
    }

    #[test]
    fn test_target_ratio() {
        assert_eq!(target_ratio(4000.0, 8000.0), 50.0);
        assert_eq!(target_ratio(9000.0, 8000.0), 100.0);
    }
}
