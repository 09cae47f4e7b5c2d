//! Test assertion helpers
//!
//! Provides utilities for robust test assertions, particularly for
//! floating-point comparisons of sizes and percentages read back from JSON
//! output.

use serde_json::Value;

/// Assert that two floating-point values are approximately equal
///
/// Use this instead of `assert_eq!` for f64/f32 comparisons to avoid
/// floating-point precision issues.
#[allow(dead_code)]
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff < epsilon,
        "Float values not approximately equal:\n  actual: {}\n  expected: {}\n  diff: {} (epsilon: {})",
        actual, expected, diff, epsilon
    );
}

/// Assert that a JSON field holds a number close to `expected`
#[allow(dead_code)]
pub fn assert_json_number(value: &Value, expected: f64) {
    let actual = value
        .as_f64()
        .unwrap_or_else(|| panic!("expected a number, got {}", value));
    assert_approx_eq(actual, expected, 1e-9);
}

/// Parse command output as JSON, failing with the raw text
#[allow(dead_code)]
pub fn parse_json(stdout: &[u8]) -> Value {
    let text = String::from_utf8_lossy(stdout);
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("output is not valid JSON ({}):\n{}", e, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq_pass() {
        assert_approx_eq(0.75, 0.75, 0.01);
        assert_approx_eq(0.75, 0.7501, 0.01);
    }

    #[test]
    #[should_panic(expected = "Float values not approximately equal")]
    fn test_assert_approx_eq_fail() {
        assert_approx_eq(0.75, 0.80, 0.01);
    }

    #[test]
    fn test_assert_json_number_accepts_integers() {
        assert_json_number(&serde_json::json!(20), 20.0);
    }
}
