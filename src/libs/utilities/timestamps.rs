use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// The on-disk timestamp format of the settings file, e.g. `2024-03-01 12:00:00.000000`.
/// Values are always UTC; the format itself carries no offset.
pub const SETTINGS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Converts a Chrono `Duration` object into a human-readable string representation.
///
/// The most appropriate time unit (days, hours, minutes or seconds) is picked
/// based on the duration's magnitude. Negative durations are rendered by
/// their absolute value.
///
/// # Arguments
/// * `duration` - A reference to a Chrono `Duration` object to be formatted
///
/// # Returns
/// A `String` such as `"3 days"`, `"5 hours"`, `"12 minutes"` or `"40 seconds"`.
pub fn format_duration(duration: &Duration) -> String {
    let duration = duration.abs();
    if duration.num_days() > 0 {
        format!("{} days", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{} hours", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{} minutes", duration.num_minutes())
    } else {
        format!("{} seconds", duration.num_seconds())
    }
}

/// Formats a UTC instant in the settings file format.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use xinstall::libs::utilities::timestamps::format_settings_timestamp;
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
/// assert_eq!(format_settings_timestamp(&at), "2024-03-01 12:00:00.000000");
/// ```
pub fn format_settings_timestamp(at: &DateTime<Utc>) -> String {
    at.format(SETTINGS_TIME_FORMAT).to_string()
}

/// Parses a timestamp read from the settings file.
///
/// The native format is tried first. RFC 3339 strings (with any offset) are
/// accepted as a fallback and converted to UTC, so a hand-edited file using
/// `2024-03-01T12:00:00Z` still works.
///
/// # Returns
/// * `Some(DateTime<Utc>)` - If either format matched
/// * `None` - If the value is not a recognizable timestamp
pub fn parse_settings_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, SETTINGS_TIME_FORMAT) {
        return Some(naive.and_utc());
    }
    // Same layout with any (or no) fractional part.
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Returns the signed time elapsed between `then` and `now`, in seconds,
/// with microsecond precision.
///
/// Falls back to whole seconds if the microsecond count would overflow
/// (differences of roughly 290,000 years).
pub fn elapsed_seconds(then: &DateTime<Utc>, now: &DateTime<Utc>) -> f64 {
    let delta = now.signed_duration_since(*then);
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_seconds() as f64,
    }
}

/// Converts a number of seconds into a Chrono `Duration` at microsecond precision.
/// Returns `None` for values that are not finite or do not fit.
pub fn duration_from_seconds(seconds: f64) -> Option<Duration> {
    if !seconds.is_finite() {
        return None;
    }
    let micros = (seconds * 1_000_000.0).round();
    if micros.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(Duration::microseconds(micros as i64))
}

/// Converts a timestamp into a human-readable relative time string
/// measured against `now`, such as `"2 days ago"` or `"just now"`.
///
/// Timestamps in the future (clock skew between machines sharing a home
/// directory) are reported as `"in the future"`.
pub fn time_since(then: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(*then);
    if duration < Duration::zero() {
        "in the future".to_string()
    } else if duration.num_days() > 0 {
        format!("{} days ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{} hours ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{} minutes ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}
