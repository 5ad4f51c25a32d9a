use chrono::{DateTime, Utc};

const HOURS_PER_DAY: i64 = 24;

/// Coarse relative label for how long ago `ts` was, measured from `now`.
///
/// Whole hours are counted by floor division:
/// under 1 hour is `"just now"`, 1-23 hours `"{n}h ago"`, 24-47 hours
/// `"yesterday"`, anything older `"{n}d ago"` in whole days.
/// Timestamps in the future read as `"just now"`.
pub fn format_relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - ts).num_seconds().div_euclid(3600);

    if hours < 1 {
        "just now".to_string()
    } else if hours < HOURS_PER_DAY {
        format!("{hours}h ago")
    } else if hours < 2 * HOURS_PER_DAY {
        "yesterday".to_string()
    } else {
        format!("{}d ago", hours / HOURS_PER_DAY)
    }
}

/// [`format_relative`] against the current time.
pub fn format_relative_now(ts: DateTime<Utc>) -> String {
    format_relative(ts, Utc::now())
}
