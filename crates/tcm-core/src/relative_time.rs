//! Human-readable "N units ago" formatting for the dashboard.

use chrono::{DateTime, Duration, Utc};

/// Format `then` relative to the current time.
#[must_use]
pub fn relative_time(then: DateTime<Utc>) -> String {
    relative_to(then, Utc::now())
}

/// Format `then` relative to `now`. Future instants read as "just now".
#[must_use]
pub fn relative_to(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now - then;
    if delta < Duration::minutes(1) {
        return "just now".to_string();
    }
    let (n, unit) = if delta < Duration::hours(1) {
        (delta.num_minutes(), "minute")
    } else if delta < Duration::days(1) {
        (delta.num_hours(), "hour")
    } else if delta < Duration::days(7) {
        (delta.num_days(), "day")
    } else if delta < Duration::days(30) {
        (delta.num_days() / 7, "week")
    } else {
        (delta.num_days() / 30, "month")
    };
    let plural = if n == 1 { "" } else { "s" };
    format!("{n} {unit}{plural} ago")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Duration::seconds(0), "just now")]
    #[case(Duration::seconds(59), "just now")]
    #[case(Duration::seconds(60), "1 minute ago")]
    #[case(Duration::minutes(59), "59 minutes ago")]
    #[case(Duration::hours(1), "1 hour ago")]
    #[case(Duration::hours(23), "23 hours ago")]
    #[case(Duration::days(1), "1 day ago")]
    #[case(Duration::days(6), "6 days ago")]
    #[case(Duration::days(7), "1 week ago")]
    #[case(Duration::days(29), "4 weeks ago")]
    #[case(Duration::days(30), "1 month ago")]
    #[case(Duration::days(95), "3 months ago")]
    fn formats_buckets(#[case] ago: Duration, #[case] expected: &str) {
        let now = Utc::now();
        assert_eq!(relative_to(now - ago, now), expected);
    }

    #[test]
    fn future_is_just_now() {
        let now = Utc::now();
        assert_eq!(relative_to(now + Duration::hours(2), now), "just now");
    }
}
