//! Human-readable duration labels.

/// Format a number of seconds as an `"Nh Nm Ns"` label.
///
/// Each unit is emitted only when the remaining amount is strictly greater
/// than one unit, so exact boundaries fall through to the next segment:
///
/// ```
/// use usagemap_core::format_duration;
///
/// assert_eq!(format_duration(0), "");
/// assert_eq!(format_duration(60), "60s");
/// assert_eq!(format_duration(3600), "60m ");
/// assert_eq!(format_duration(3661), "1h 1m 1s");
/// ```
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let mut label = String::new();
    let mut length = seconds;
    if length > 3600 {
        label.push_str(&format!("{}h ", length / 3600));
        length %= 3600;
    }
    if length > 60 {
        label.push_str(&format!("{}m ", length / 60));
        length %= 60;
    }
    if length != 0 {
        label.push_str(&format!("{length}s"));
    }
    label
}

/// Document title for a day view, e.g. `"2h 5m 10s on 2014-04-06 - AppUsage"`.
#[must_use]
pub fn window_title(total_seconds: u64, date: &str) -> String {
    format!("{} on {date} - AppUsage", format_duration(total_seconds))
}
