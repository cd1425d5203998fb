//! Absolute, relative and percentage error between a true and an
//! approximate value.

use serde::Serialize;

pub const ABSOLUTE_FORMULA: &str = "|true - approximate|";
pub const RELATIVE_FORMULA: &str = "|true - approximate| / |true|";
pub const PERCENTAGE_FORMULA: &str = "relative_error × 100%";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorMetrics {
    pub absolute_error: f64,
    pub relative_error: f64,
    pub percentage_error: f64,
}

/// Never fails. A zero `true_value` gives infinite relative and percentage
/// errors, NaN in either input comes out as NaN.
pub fn error_metrics(true_value: f64, approximate: f64) -> ErrorMetrics {
    let absolute_error = (true_value - approximate).abs();
    let relative_error = if true_value == 0.0 && !absolute_error.is_nan() {
        f64::INFINITY
    } else {
        absolute_error / true_value.abs()
    };
    ErrorMetrics { absolute_error, relative_error, percentage_error: relative_error * 100.0 }
}
