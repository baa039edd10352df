//! Small numeric helpers shared by the analytics modules

/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Round to the nearest integer with halves going up (2.5 → 3, -2.5 → -2)
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Round to `places` decimal places for display
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Percentage `part / whole * 100`, rounded; 0 when `whole` is 0
pub fn percentage(part: f64, whole: f64) -> i64 {
    if whole == 0.0 {
        return 0;
    }
    round_half_up(part / whole * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(149.9), 150);
        assert_eq!(round_half_up(-0.4), 0);
    }

    #[test]
    fn test_percentage_guards_zero() {
        assert_eq!(percentage(5.0, 0.0), 0);
        assert_eq!(percentage(1.0, 3.0), 33);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.2345, 2), 1.23);
        assert_eq!(round_to(2.0 / 3.0, 1), 0.7);
    }
}
