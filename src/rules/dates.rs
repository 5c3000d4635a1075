//! Date parsing shared by the locator, the date rules and `:date`
//!
//! Structured input covers RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD` and
//! unix timestamps. Relative phrases ("tomorrow", "3 days", "next friday")
//! are evaluated against a caller-supplied `now`.

use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};

/// Interprets a unix timestamp by magnitude
///
/// Seconds, milliseconds, microseconds and nanoseconds are told apart by
/// their number of digits. Values below 100,000,000 are rejected.
pub fn from_unix(stamp: i64) -> Option<DateTime<Utc>> {
    if stamp < 100_000_000 {
        return None;
    }
    if stamp < 10_000_000_000 {
        return Utc.timestamp_opt(stamp, 0).single();
    }
    if stamp < 10_000_000_000_000 {
        return Utc.timestamp_millis_opt(stamp).single();
    }
    if stamp < 10_000_000_000_000_000 {
        return DateTime::from_timestamp(
            stamp.div_euclid(1_000_000),
            (stamp.rem_euclid(1_000_000) * 1_000) as u32,
        );
    }
    Some(Utc.timestamp_nanos(stamp))
}

/// Parses the structured date formats
pub fn parse_structured(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Some(date.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    input.parse::<i64>().ok().and_then(from_unix)
}

/// Parses a date expression: a relative phrase or a structured date
pub fn parse_expression(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    parse_relative(input, now).or_else(|| parse_structured(input))
}

pub fn weekday(input: &str) -> Option<Weekday> {
    match input.to_lowercase().as_str() {
        "sunday" | "sun" => Some(Weekday::Sun),
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn month(input: &str) -> Option<u32> {
    let number = match input.to_lowercase().as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(number)
}

/// Hour of day from `7`, `7am` or `7pm`; 24 is allowed
pub fn hour(input: &str) -> Option<u32> {
    let lower = input.to_lowercase();
    let (digits, pm) = if lower.len() > 2 && lower.ends_with("pm") {
        (&lower[..lower.len() - 2], true)
    } else if lower.len() > 2 && lower.ends_with("am") {
        (&lower[..lower.len() - 2], false)
    } else {
        (lower.as_str(), false)
    };
    let hour = digits.parse::<u32>().ok()? + if pm { 12 } else { 0 };
    (hour <= 24).then_some(hour)
}

fn year(input: &str) -> Option<i32> {
    input.parse::<i32>().ok().filter(|year| (1000..=3000).contains(year))
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    date.and_hms_opt(hour, minute, 0).map(|stamp| stamp.and_utc())
}

fn days_until(from: Weekday, to: Weekday) -> i64 {
    (to.num_days_from_sunday() as i64 - from.num_days_from_sunday() as i64).rem_euclid(7)
}

fn parse_relative(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let words: Vec<String> = input.split_whitespace().map(str::to_lowercase).collect();
    let today = now.date_naive();

    match words.as_slice() {
        [word] => match word.as_str() {
            "now" => Some(now),
            "today" | "midnight" => at(today, 0, 0),
            "noon" => at(today, 12, 0),
            "tomorrow" => at(today + Duration::days(1), 0, 0),
            "yesterday" => at(today - Duration::days(1), 0, 0),
            other => {
                let day = weekday(other)?;
                at(today + Duration::days(days_until(today.weekday(), day)), 0, 0)
            }
        },
        [count, unit] => {
            let offset = count.parse::<i64>().ok().filter(|offset| *offset != 0)?;
            match unit.as_str() {
                "second" | "seconds" => Some(now + Duration::seconds(offset)),
                "minute" | "minutes" => Some(now + Duration::minutes(offset)),
                "hour" | "hours" => Some(now + Duration::hours(offset)),
                "day" | "days" => Some(now + Duration::days(offset)),
                "week" | "weeks" => Some(now + Duration::weeks(offset)),
                "weekday" | "weekdays" => Some(add_weekdays(now, offset)),
                "month" | "months" => shift_months(now, offset),
                "year" | "years" => shift_months(now, offset.checked_mul(12)?),
                _ => None,
            }
        }
        [first, second, third] => {
            if let Some(hour) = hour(third) {
                match (first.as_str(), second.as_str()) {
                    ("back", "of") => {
                        return if hour == 24 {
                            at(today + Duration::days(1), 0, 15)
                        } else {
                            at(today, hour, 15)
                        };
                    }
                    ("front", "of") => {
                        return if hour == 0 {
                            at(today - Duration::days(1), 23, 45)
                        } else {
                            at(today, hour - 1, 45)
                        };
                    }
                    _ => {}
                }
            }

            let day = weekday(first)?;
            if third != "week" {
                return None;
            }
            let week_start = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
            let in_week = week_start + Duration::days(day.num_days_from_sunday() as i64);
            match second.as_str() {
                "last" | "previous" | "prev" => at(in_week - Duration::days(7), 0, 0),
                "this" => at(in_week, 0, 0),
                "next" => at(in_week + Duration::days(7), 0, 0),
                _ => None,
            }
        }
        [position, kind, of, month_word, year_word] if of == "of" => {
            let (year, month) = if year_word == "month" {
                let shifted = match month_word.as_str() {
                    "next" => shift_months(now, 1)?,
                    "previous" | "prev" | "last" => shift_months(now, -1)?,
                    _ => return None,
                };
                (shifted.year(), shifted.month())
            } else {
                (year(year_word)?, month(month_word)?)
            };

            let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;
            let last_day = first_day.checked_add_months(Months::new(1))? - Duration::days(1);
            match (position.as_str(), kind.as_str()) {
                ("first", "day") => at(first_day, 0, 0),
                ("last", "day") => at(last_day, 0, 0),
                ("first", other) => {
                    let day = weekday(other)?;
                    at(first_day + Duration::days(days_until(first_day.weekday(), day)), 0, 0)
                }
                ("last", other) => {
                    let day = weekday(other)?;
                    at(last_day - Duration::days(days_until(day, last_day.weekday())), 0, 0)
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn shift_months(date: DateTime<Utc>, months: i64) -> Option<DateTime<Utc>> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

/// Moves `count` business days, skipping weekends
fn add_weekdays(mut date: DateTime<Utc>, count: i64) -> DateTime<Utc> {
    let step = if count > 0 { 1 } else { -1 };
    let mut remaining = count.abs();
    while remaining > 0 {
        date += Duration::days(step);
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            remaining -= 1;
        }
    }
    date
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        // A Wednesday
        Utc.with_ymd_and_hms(2024, 5, 15, 10, 30, 0).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_structured_formats() {
        assert_eq!(parse_structured("2024-05-15"), Some(ymd(2024, 5, 15)));
        assert_eq!(
            parse_structured("2024-05-15 10:30:00"),
            Some(now())
        );
        assert_eq!(
            parse_structured("2024-05-15T12:30:00+02:00"),
            Some(now())
        );
        assert_eq!(parse_structured("1715769000"), Some(now()));
        assert_eq!(parse_structured("1715769000000"), Some(now()));
        assert_eq!(parse_structured("12345"), None);
        assert_eq!(parse_structured("not a date"), None);
    }

    #[test]
    fn test_single_word_phrases() {
        assert_eq!(parse_expression("now", now()), Some(now()));
        assert_eq!(parse_expression("today", now()), Some(ymd(2024, 5, 15)));
        assert_eq!(parse_expression("Tomorrow", now()), Some(ymd(2024, 5, 16)));
        assert_eq!(parse_expression("yesterday", now()), Some(ymd(2024, 5, 14)));
        assert_eq!(
            parse_expression("noon", now()),
            Some(Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap())
        );
        assert_eq!(parse_expression("friday", now()), Some(ymd(2024, 5, 17)));
        assert_eq!(parse_expression("wednesday", now()), Some(ymd(2024, 5, 15)));
    }

    #[test]
    fn test_offsets() {
        assert_eq!(parse_expression("3 days", now()), Some(now() + Duration::days(3)));
        assert_eq!(parse_expression("-2 hours", now()), Some(now() - Duration::hours(2)));
        assert_eq!(
            parse_expression("1 month", now()),
            Some(Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap())
        );
        assert_eq!(parse_expression("0 days", now()), None);
        // Wednesday + 3 business days lands on Monday
        assert_eq!(
            parse_expression("3 weekdays", now()).map(|d| d.weekday()),
            Some(Weekday::Mon)
        );
    }

    #[test]
    fn test_week_phrases() {
        assert_eq!(parse_expression("monday this week", now()), Some(ymd(2024, 5, 13)));
        assert_eq!(parse_expression("monday next week", now()), Some(ymd(2024, 5, 20)));
        assert_eq!(parse_expression("monday last week", now()), Some(ymd(2024, 5, 6)));
    }

    #[test]
    fn test_month_phrases() {
        assert_eq!(
            parse_expression("first day of february 2024", now()),
            Some(ymd(2024, 2, 1))
        );
        assert_eq!(
            parse_expression("last day of february 2024", now()),
            Some(ymd(2024, 2, 29))
        );
        assert_eq!(
            parse_expression("first monday of july 2024", now()),
            Some(ymd(2024, 7, 1))
        );
        assert_eq!(
            parse_expression("last friday of may 2024", now()),
            Some(ymd(2024, 5, 31))
        );
        assert_eq!(
            parse_expression("first day of next month", now()),
            Some(ymd(2024, 6, 1))
        );
    }

    #[test]
    fn test_hour_helper() {
        assert_eq!(hour("7"), Some(7));
        assert_eq!(hour("7pm"), Some(19));
        assert_eq!(hour("25"), None);
        assert_eq!(
            parse_expression("back of 7pm", now()),
            Some(Utc.with_ymd_and_hms(2024, 5, 15, 19, 15, 0).unwrap())
        );
        assert_eq!(
            parse_expression("front of 7", now()),
            Some(Utc.with_ymd_and_hms(2024, 5, 15, 6, 45, 0).unwrap())
        );
    }
}
