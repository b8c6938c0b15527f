//! Human-relative timestamp rendering for digest lines.

use chrono::{DateTime, Datelike, Local, Utc};

/// Parses a Slack message timestamp (`1700000000.123456`) into local time.
///
/// Only the whole-second part matters for digest rendering, so the
/// fractional suffix is dropped rather than parsed as a float.
#[must_use]
pub fn parse_slack_timestamp(ts: &str) -> Option<DateTime<Local>> {
    let seconds_part = ts.split('.').next()?;
    let seconds: i64 = seconds_part.parse().ok()?;
    let utc = DateTime::<Utc>::from_timestamp(seconds, 0)?;
    Some(utc.with_timezone(&Local))
}

/// Renders `moment` relative to `now`.
///
/// Bands, evaluated in order: under a minute, under an hour, same calendar
/// day, previous calendar day, under seven days, full date. Hours render
/// without a leading zero and am/pm is lowercase.
#[must_use]
pub fn format_relative(moment: DateTime<Local>, now: DateTime<Local>) -> String {
    let elapsed = now.signed_duration_since(moment);

    if elapsed.num_seconds() < 60 {
        return "just now".to_owned();
    }

    if elapsed.num_seconds() < 3600 {
        let minutes = elapsed.num_minutes();
        let unit = if minutes == 1 { "minute" } else { "minutes" };
        return format!("{minutes} {unit} ago");
    }

    let clock = clock_label(moment);

    if moment.date_naive() == now.date_naive() {
        return format!("today at {clock}");
    }

    let day_gap = now
        .date_naive()
        .signed_duration_since(moment.date_naive())
        .num_days();
    if day_gap == 1 {
        return format!("yesterday at {clock}");
    }

    if elapsed.num_days() < 7 {
        return format!("{} at {clock}", moment.format("%A"));
    }

    format!("{} {} at {clock}", moment.format("%B"), moment.day())
}

/// `2:05pm`-style clock label.
fn clock_label(moment: DateTime<Local>) -> String {
    moment.format("%-I:%M%P").to_string()
}
