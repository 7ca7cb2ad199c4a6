//! Query parameter parsing shared by the handlers
//!
//! Parameters arrive as optional strings so that malformed values can fall
//! back to defaults or produce the handler's own error message, instead of
//! a framework rejection.

use super::error::ApiError;

/// The value when present and non-blank.
pub fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

/// A positive integer, or `default` when absent, malformed, or not positive.
pub fn positive_u32_or(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

/// A positive finite float, or `default` when absent, malformed, or not positive.
pub fn positive_f64_or(raw: Option<&str>, default: f64) -> f64 {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(default)
}

/// A float that must parse; `name` appears in the error message.
pub fn coordinate(raw: Option<&str>, name: &str) -> Result<f64, ApiError> {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| ApiError::bad_request(format!("invalid {name} parameter")))
}

/// Whether the flag is exactly `"true"`; `default` stands in when absent.
pub fn flag(raw: Option<&str>, default: &str) -> bool {
    raw.unwrap_or(default) == "true"
}

/// `"<lat>,<lng>"` with each number in its shortest exact form.
pub fn lat_lng(lat: f64, lng: f64) -> String {
    format!("{lat},{lng}")
}
