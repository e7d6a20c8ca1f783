//! Free-text moments and human-readable durations for `timeUntil`,
//! `timeSince` and `uptime`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

use crate::value::Value;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

fn unit_seconds(unit: &str) -> Option<i64> {
    let seconds = match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => MINUTE,
        "h" | "hr" | "hrs" | "hour" | "hours" => HOUR,
        "d" | "day" | "days" => DAY,
        "w" | "week" | "weeks" => 7 * DAY,
        "mo" | "month" | "months" => 30 * DAY,
        "y" | "yr" | "yrs" | "year" | "years" => 365 * DAY,
        _ => return None,
    };
    Some(seconds)
}

fn midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

/// `in 5 minutes`, `5m`, `3 hours ago`, `2 d ago`
fn parse_relative(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let mut words: Vec<&str> = text.split_whitespace().collect();
    let future = words.first() == Some(&"in");
    if future {
        words.remove(0);
    }
    let past = words.last() == Some(&"ago");
    if past {
        words.pop();
    }
    if future && past {
        return None;
    }

    let (amount, unit) = match words.as_slice() {
        [amount, unit] => (*amount, *unit),
        [combined] => {
            let split = combined.find(|c: char| !c.is_ascii_digit())?;
            combined.split_at(split)
        }
        _ => return None,
    };
    let amount: i64 = amount.parse().ok()?;
    let delta = TimeDelta::try_seconds(amount.checked_mul(unit_seconds(unit)?)?)?;

    if past {
        now.checked_sub_signed(delta)
    } else {
        now.checked_add_signed(delta)
    }
}

/// Interpret a free-text time description relative to `now` (UTC).
pub fn parse_moment(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    let lower = trimmed.to_ascii_lowercase();

    match lower.as_str() {
        "now" => return Some(now),
        "today" => return midnight(now.date_naive()),
        "tomorrow" => return midnight(now.date_naive().succ_opt()?),
        "yesterday" => return midnight(now.date_naive().pred_opt()?),
        _ => {}
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return midnight(date);
    }
    if let Ok(time) = NaiveTime::parse_from_str(trimmed, "%H:%M") {
        return Some(now.date_naive().and_time(time).and_utc());
    }
    if trimmed.len() >= 9 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return DateTime::from_timestamp(trimmed.parse().ok()?, 0);
    }

    parse_relative(&lower, now)
}

/// `1d 2h 3m 4s`, or `1 day, 2 hours, 3 minutes, 4 seconds` when `long`.
/// Zero components are left out; negative input counts as zero.
pub fn format_duration(seconds: i64, long: bool) -> String {
    let seconds = seconds.max(0);
    let parts = [
        (seconds / DAY, "d", "day"),
        (seconds % DAY / HOUR, "h", "hour"),
        (seconds % HOUR / MINUTE, "m", "minute"),
        (seconds % MINUTE, "s", "second"),
    ];

    let rendered: Vec<String> = parts
        .iter()
        .filter(|(amount, _, _)| *amount > 0)
        .map(|(amount, short, name)| match (long, *amount) {
            (false, n) => format!("{}{}", n, short),
            (true, 1) => format!("1 {}", name),
            (true, n) => format!("{} {}s", n, name),
        })
        .collect();

    match (rendered.is_empty(), long) {
        (true, false) => "0s".to_string(),
        (true, true) => "0 seconds".to_string(),
        (false, false) => rendered.join(" "),
        (false, true) => rendered.join(", "),
    }
}

fn relative(
    args: &[Value],
    name: &str,
    diff: impl Fn(DateTime<Utc>) -> i64,
    now: DateTime<Utc>,
) -> Value {
    let Some(text) = args.first().and_then(Value::as_str) else {
        return Value::String(format!("{} expects a time description", name));
    };
    let long = args.get(1).is_some_and(Value::is_truthy);

    match parse_moment(text, now) {
        Some(moment) => Value::String(format_duration(diff(moment), long)),
        None => Value::String(format!("Could not understand the time '{}'", text)),
    }
}

/// `timeUntil(text, long?)`
pub fn time_until(args: &[Value], now: DateTime<Utc>) -> Value {
    relative(args, "timeUntil", |moment| (moment - now).num_seconds(), now)
}

/// `timeSince(text, long?)`
pub fn time_since(args: &[Value], now: DateTime<Utc>) -> Value {
    relative(args, "timeSince", |moment| (now - moment).num_seconds(), now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-10T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_format_duration_short_and_long() {
        assert_eq!(format_duration(0, false), "0s");
        assert_eq!(format_duration(0, true), "0 seconds");
        assert_eq!(format_duration(93_784, false), "1d 2h 3m 4s");
        assert_eq!(
            format_duration(93_784, true),
            "1 day, 2 hours, 3 minutes, 4 seconds"
        );
        assert_eq!(format_duration(3_600, true), "1 hour");
        assert_eq!(format_duration(-5, false), "0s");
    }

    #[test]
    fn test_parse_relative_moments() {
        let now = fixed_now();
        assert_eq!(
            parse_moment("in 5 minutes", now),
            Some(now + TimeDelta::minutes(5))
        );
        assert_eq!(parse_moment("2h", now), Some(now + TimeDelta::hours(2)));
        assert_eq!(
            parse_moment("3 days ago", now),
            Some(now - TimeDelta::days(3))
        );
        assert_eq!(parse_moment("in 3 days ago", now), None);
        assert_eq!(parse_moment("5 parsecs", now), None);
    }

    #[test]
    fn test_parse_absolute_moments() {
        let now = fixed_now();
        let expected = DateTime::parse_from_rfc3339("2024-12-24T18:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parse_moment("2024-12-24 18:30", now), Some(expected));
        assert_eq!(parse_moment("2024-12-24T18:30:00Z", now), Some(expected));
        assert_eq!(
            parse_moment("tomorrow", now),
            DateTime::parse_from_rfc3339("2024-03-11T00:00:00Z")
                .ok()
                .map(|d| d.with_timezone(&Utc))
        );
        assert_eq!(
            parse_moment("18:00", now),
            Some(now + TimeDelta::hours(6))
        );
        assert_eq!(parse_moment("1710072000", now), Some(now));
    }

    #[test]
    fn test_time_until_and_since() {
        let now = fixed_now();
        assert_eq!(
            time_until(&[Value::from("in 90 minutes")], now),
            Value::from("1h 30m")
        );
        assert_eq!(
            time_since(&[Value::from("2024-03-09 12:00"), Value::Boolean(true)], now),
            Value::from("1 day")
        );
        assert_eq!(time_until(&[Value::from("yesterday")], now), Value::from("0s"));
        assert_eq!(
            time_since(&[Value::from("whenever")], now),
            Value::from("Could not understand the time 'whenever'")
        );
        assert_eq!(
            time_until(&[], now),
            Value::from("timeUntil expects a time description")
        );
    }
}
