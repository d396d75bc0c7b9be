//! Time conversion and formatting helpers.

/// Converts minutes to seconds.
#[must_use]
pub fn minutes_to_seconds(minutes: u32) -> u32 {
    minutes.saturating_mul(60)
}

/// Converts seconds to whole minutes (rounded down).
#[must_use]
pub fn seconds_to_minutes(seconds: u32) -> u32 {
    seconds / 60
}

/// Formats seconds as `MM:SS`.
///
/// Minutes are not wrapped at 60, so 90 minutes renders as `90:00`.
#[must_use]
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Parses an `MM:SS` string into total seconds.
///
/// Returns 0 for anything that is not exactly two `:`-separated integers.
#[must_use]
pub fn parse_time(input: &str) -> u32 {
    let Some((minutes, seconds)) = input.trim().split_once(':') else {
        return 0;
    };
    match (minutes.parse::<u32>(), seconds.parse::<u32>()) {
        (Ok(m), Ok(s)) => m.saturating_mul(60).saturating_add(s),
        _ => 0,
    }
}

/// Calculates progress through an interval as a fraction in `[0.0, 1.0]`.
///
/// Returns 0.0 when `total` is zero.
#[must_use]
pub fn calculate_progress(elapsed: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (f64::from(elapsed) / f64::from(total)).clamp(0.0, 1.0)
}
