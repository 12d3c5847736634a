//! Formatting helpers shared by widget renderers and pages.

use chrono::{DateTime, Utc};

const BINARY_UNITS: &[&str] = &[" kB", " MB", " GB", " TB", " PB", " EB", " ZB", " YB"];
const DECIMAL_UNITS: &[&str] = &[" kB", " MB", " GB", " TB", " PB"];
const SPEED_UNITS: &[&str] = &[" Kb", " Mb", " Gb", " Tb", " Pb"];

/// Divide by `base` at least once, then until the value fits under `base`.
/// Returns the scaled value and the unit index (clamped to `units`).
fn scale(mut value: f64, base: f64, units: usize) -> (f64, usize) {
    let mut i = 0;
    value /= base;
    while value > base && i + 1 < units {
        value /= base;
        i += 1;
    }
    (value, i)
}

/// Human-readable byte count in binary steps: `420000000` → `"400.5 MB"`.
pub fn readable_file_size(bytes: f64) -> String {
    let (value, i) = scale(bytes, 1024.0, BINARY_UNITS.len());
    format!("{:.1}{}", value.max(0.1), BINARY_UNITS[i])
}

/// Human-readable byte count in decimal steps, as drive vendors count.
pub fn readable_file_size_hdd(bytes: f64) -> String {
    let (value, i) = scale(bytes, 1000.0, DECIMAL_UNITS.len());
    format!("{:.1}{}", value, DECIMAL_UNITS[i])
}

/// Transfer rate from bytes per second.
pub fn bytes_to_speed(bytes: f64) -> String {
    let (value, i) = scale(bytes, 1024.0, SPEED_UNITS.len());
    format!("{:.2}{}/s", value, SPEED_UNITS[i])
}

/// Runtime in seconds as `MM:SS`, or `H:MM:SS` past the hour.
pub fn parse_sec(seconds: Option<f64>) -> String {
    let Some(total) = seconds.filter(|s| s.is_finite() && *s >= 0.0) else {
        return "0.00".to_string();
    };
    let total = total.floor() as u64;
    let (hours, minutes, secs) = (total / 3600, (total / 60) % 60, total % 60);
    if hours == 0 {
        format!("{:02}:{:02}", minutes, secs)
    } else {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    }
}

/// Zero-pad a number to `width` digits.
pub fn pad(n: i64, width: usize) -> String {
    format!("{:0width$}", n, width = width)
}

/// Relative description of `when` as seen from `now`: "in 2 days", "3 hours ago".
pub fn from_now(when: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = when.signed_duration_since(now);
    let future = delta.num_seconds() >= 0;
    let secs = delta.num_seconds().unsigned_abs() as f64;

    let minutes = (secs / 60.0).round();
    let hours = (secs / 3600.0).round();
    let days = (secs / 86400.0).round();
    let months = (secs / (86400.0 * 30.44)).round();
    let years = (secs / (86400.0 * 365.25)).round();

    let span = if secs < 45.0 {
        "a few seconds".to_string()
    } else if secs < 90.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{} minutes", minutes)
    } else if minutes < 90.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{} hours", hours)
    } else if hours < 36.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{} days", days)
    } else if days < 45.0 {
        "a month".to_string()
    } else if days < 320.0 {
        format!("{} months", months.max(2.0))
    } else if days < 548.0 {
        "a year".to_string()
    } else {
        format!("{} years", years.max(2.0))
    };

    if future {
        format!("in {}", span)
    } else {
        format!("{} ago", span)
    }
}

/// Normalise a base path to `/segment/` form; empty becomes `/`.
pub fn fix_basepath(s: &str) -> String {
    let trimmed = s.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// Format a percentage the way the progress bars expect it (`42`, `57.5`).
pub fn percent(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    format!("{}", rounded)
}

// =============================================================================
// Status labels
// =============================================================================

/// Colour class of a scheduler status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Default,
    Success,
    Info,
    Important,
    Warning,
}

impl LabelKind {
    pub fn css_class(self) -> &'static str {
        match self {
            LabelKind::Default => "label",
            LabelKind::Success => "label label-success",
            LabelKind::Info => "label label-info",
            LabelKind::Important => "label label-important",
            LabelKind::Warning => "label label-warning",
        }
    }
}

/// Styled status label (e.g. "Continuing", "Snatched") with an optional icon.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLabel {
    pub text: String,
    pub kind: LabelKind,
    pub icon: Option<&'static str>,
}

pub fn status_label(text: &str) -> StatusLabel {
    let kind = match text {
        "Continuing" | "Downloaded" | "HD" => LabelKind::Success,
        "Snatched" | "Unaired" => LabelKind::Info,
        "Ended" => LabelKind::Important,
        "Skipped" => LabelKind::Warning,
        _ => LabelKind::Default,
    };
    StatusLabel {
        text: text.to_string(),
        kind,
        icon: status_icon(text),
    }
}

/// Icon class for a status, if it has one.
pub fn status_icon(text: &str) -> Option<&'static str> {
    match text {
        "Downloaded" => Some("fa fa-download"),
        "Continuing" => Some("fa fa-repeat"),
        "Snatched" => Some("fa fa-share"),
        "Unaired" => Some("fa fa-clock-o"),
        "Archived" => Some("fa fa-lock"),
        "Skipped" => Some("fa fa-fast-forward"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_readable_file_size() {
        assert_eq!(readable_file_size(420_000_000.0), "400.5 MB");
        assert_eq!(readable_file_size(580_000_000.0), "553.1 MB");
        assert_eq!(readable_file_size(2048.0), "2.0 kB");
        assert_eq!(readable_file_size(10.0), "0.1 kB");
    }

    #[test]
    fn test_readable_file_size_hdd() {
        assert_eq!(readable_file_size_hdd(500_000_000_000.0), "500.0 GB");
        assert_eq!(readable_file_size_hdd(1_500_000.0), "1.5 MB");
    }

    #[test]
    fn test_bytes_to_speed() {
        assert_eq!(bytes_to_speed(1536.0), "1.50 Kb/s");
        assert_eq!(bytes_to_speed(3.0 * 1024.0 * 1024.0), "3.00 Mb/s");
    }

    #[test]
    fn test_parse_sec() {
        assert_eq!(parse_sec(Some(59.0)), "00:59");
        assert_eq!(parse_sec(Some(5400.0)), "1:30:00");
        assert_eq!(parse_sec(Some(3725.9)), "1:02:05");
        assert_eq!(parse_sec(None), "0.00");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad(3, 2), "03");
        assert_eq!(pad(12, 2), "12");
    }

    #[test]
    fn test_from_now() {
        let now = Utc::now();
        assert_eq!(from_now(now + Duration::days(2), now), "in 2 days");
        assert_eq!(from_now(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(from_now(now + Duration::seconds(10), now), "in a few seconds");
        assert_eq!(from_now(now + Duration::hours(25), now), "in a day");
    }

    #[test]
    fn test_fix_basepath() {
        assert_eq!(fix_basepath(""), "/");
        assert_eq!(fix_basepath("/"), "/");
        assert_eq!(fix_basepath(" htpc "), "/htpc/");
        assert_eq!(fix_basepath("/htpc/"), "/htpc/");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(42.0), "42");
        assert_eq!(percent(100.0 - 42.0), "58");
        assert_eq!(percent(12.345), "12.3");
    }

    #[test]
    fn test_status_label() {
        let label = status_label("Continuing");
        assert_eq!(label.kind, LabelKind::Success);
        assert_eq!(label.icon, Some("fa fa-repeat"));

        assert_eq!(status_label("Ended").kind, LabelKind::Important);
        assert_eq!(status_label("Skipped").kind, LabelKind::Warning);
        assert_eq!(status_label("Wanted").kind, LabelKind::Default);
        assert_eq!(status_label("Archived").icon, Some("fa fa-lock"));
    }
}
