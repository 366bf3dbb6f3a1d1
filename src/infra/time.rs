use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub fn format_epoch_ms(ms: i64, zone: &Tz) -> String {
    let dt_utc: DateTime<Utc> = Utc
        .timestamp_millis_opt(ms)
        .single()
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp_millis(0).unwrap_or_default());
    let dt_local = dt_utc.with_timezone(zone);
    dt_local.format("%Y-%m-%d %H:%M:%S%.3f %Z").to_string()
}

/// Relative age string, coarsening with distance: "just now", "5 min ago",
/// "3 hrs ago", "2 days ago", "a year ago", ...
pub fn format_age(now_ms: i64, then_ms: i64) -> String {
    let minutes = (now_ms - then_ms) as f64 / 60_000.0;
    if minutes < 1.0 {
        return "just now".to_string();
    }
    if minutes < 2.0 {
        return "a minute ago".to_string();
    }
    if minutes < 60.0 {
        return format!("{} min ago", minutes.floor() as i64);
    }
    let hours = minutes / 60.0;
    if hours < 2.0 {
        return "an hour ago".to_string();
    }
    if hours < 24.0 {
        return format!("{} hrs ago", hours.floor() as i64);
    }
    let days = hours / 24.0;
    if days < 2.0 {
        return "a day ago".to_string();
    }
    if days < 365.0 {
        return format!("{} days ago", days.floor() as i64);
    }
    let years = days / 365.0;
    if years < 2.0 {
        return "a year ago".to_string();
    }
    format!("{} years ago", years.floor() as i64)
}

/// Compact duration: "42s", "3m 5s", "1h 2m 3s".
pub fn format_duration(ms: i64) -> String {
    let total_seconds = ms.max(0) / 1000;
    let seconds = total_seconds % 60;
    let minutes = total_seconds / 60;
    if minutes == 0 {
        return format!("{total_seconds}s");
    }
    if minutes < 60 {
        return format!("{minutes}m {seconds}s");
    }
    let hours = minutes / 60;
    let minutes = minutes % 60;
    format!("{hours}h {minutes}m {seconds}s")
}
