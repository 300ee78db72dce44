// src/view/dates.rs
// =============================================================================
// Date formatting for pages.
//
// - short_date: "Jan 5, 2024"
// - short_day: same format for a calendar day
// - distance_to_now: "3 days ago", "about 1 hour ago", "over 2 years ago"
//
// distance_to_now follows the wording of date-fns' formatDistanceToNow with
// { addSuffix: true }, since that's what people are used to reading on
// GitHub-like pages. Under a year the month count is the rounded number of
// 30-day months; from a year on, whole calendar months pick the
// about/over/almost prefix.
// =============================================================================

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;

pub fn short_date(date: DateTime<Utc>) -> String {
    short_day(date.date_naive())
}

pub fn short_day(day: NaiveDate) -> String {
    day.format("%b %-d, %Y").to_string()
}

pub fn distance_to_now(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let (earlier, later) = if seconds < 0 { (now, then) } else { (then, now) };
    let distance = distance_words(seconds.abs(), calendar_months(earlier, later));

    if seconds < 0 {
        format!("in {}", distance)
    } else {
        format!("{} ago", distance)
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

// Whole calendar months from `earlier` to `later`
fn calendar_months(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month()) - i64::from(earlier.month());
    let reached = u32::try_from(months)
        .ok()
        .and_then(|m| earlier.checked_add_months(Months::new(m)))
        .is_some_and(|date| date <= later);
    if !reached {
        months -= 1;
    }
    months.max(0)
}

fn distance_words(seconds: i64, months: i64) -> String {
    let minutes = (seconds as f64 / 60.0).round() as i64;

    if minutes < 1 && seconds < 30 {
        return "less than a minute".to_string();
    }
    if minutes < 2 {
        return "1 minute".to_string();
    }
    if minutes < 45 {
        return plural(minutes, "minute");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        let hours = (minutes as f64 / 60.0).round() as i64;
        return format!("about {}", plural(hours, "hour"));
    }
    if minutes < 2520 {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        let days = (minutes as f64 / MINUTES_IN_DAY as f64).round() as i64;
        return plural(days, "day");
    }
    if minutes < MINUTES_IN_TWO_MONTHS {
        let nearest = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
        return format!("about {}", plural(nearest, "month"));
    }

    if months < 12 {
        let nearest = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
        return plural(nearest, "month");
    }

    let years = months / 12;
    match months % 12 {
        0..=2 => format!("about {}", plural(years, "year")),
        3..=8 => format!("over {}", plural(years, "year")),
        _ => format!("almost {}", plural(years + 1, "year")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_short_date() {
        assert_eq!(short_date(at(2024, 1, 5)), "Jan 5, 2024");
        assert_eq!(short_date(at(2011, 12, 25)), "Dec 25, 2011");
    }

    #[test]
    fn test_distance_wording() {
        let now = at(2024, 6, 1);
        let ago = |d: Duration| distance_to_now(now - d, now);

        assert_eq!(ago(Duration::seconds(10)), "less than a minute ago");
        assert_eq!(ago(Duration::minutes(5)), "5 minutes ago");
        assert_eq!(ago(Duration::minutes(60)), "about 1 hour ago");
        assert_eq!(ago(Duration::hours(5)), "about 5 hours ago");
        assert_eq!(ago(Duration::hours(30)), "1 day ago");
        assert_eq!(ago(Duration::days(3)), "3 days ago");
        assert_eq!(ago(Duration::days(40)), "about 1 month ago");
        assert_eq!(ago(Duration::days(75)), "3 months ago");
        assert_eq!(ago(Duration::days(150)), "5 months ago");
        assert_eq!(ago(Duration::days(165)), "6 months ago");
        assert_eq!(ago(Duration::days(366)), "about 1 year ago");
        assert_eq!(ago(Duration::days(365 * 2 + 150)), "over 2 years ago");
        assert_eq!(ago(Duration::days(365 * 2 + 330)), "almost 3 years ago");
    }

    #[test]
    fn test_calendar_months() {
        assert_eq!(calendar_months(at(2024, 1, 31), at(2024, 2, 28)), 0);
        assert_eq!(calendar_months(at(2024, 1, 31), at(2024, 2, 29)), 1);
        assert_eq!(calendar_months(at(2024, 1, 31), at(2024, 3, 1)), 1);
        assert_eq!(calendar_months(at(2022, 6, 1), at(2024, 6, 1)), 24);
        assert_eq!(calendar_months(at(2022, 6, 2), at(2024, 6, 1)), 23);
    }

    #[test]
    fn test_future_dates() {
        let now = at(2024, 6, 1);
        assert_eq!(distance_to_now(now + Duration::days(3), now), "in 3 days");
    }
}
