//! Relative timestamps for list rows, detail headers and comment threads.

use chrono::{DateTime, Utc};

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Number of seconds in one day.
const SECONDS_PER_DAY: f64 = 86400.0;

/// Slack applied around unit boundaries so "59 seconds" reads as "a minute".
const FUDGE: f64 = 1.25;

/// Returns a human-readable string describing how long before `now` the
/// timestamp `then` lies.
///
/// The format varies based on the time elapsed:
/// - Under ~1s: "a second ago"
/// - Under ~48s: "N seconds ago"
/// - Under ~75s: "a minute ago"
/// - Under ~48m: "N minutes ago"
/// - Under ~75m: "an hour ago"
/// - Under ~19h: "N hours ago"
/// - Under ~30h: "a day ago"
/// - Otherwise: "N days ago"
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use issuedeck::domain::time_since;
///
/// let now = Utc::now();
/// assert_eq!(time_since(now - Duration::minutes(5), now), "5 minutes ago");
/// assert_eq!(time_since(now - Duration::days(3), now), "3 days ago");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn time_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = (now - then).num_milliseconds().max(0) as f64 / 1000.0;

    if delta < FUDGE {
        "a second ago".to_string()
    } else if delta < SECONDS_PER_MINUTE / FUDGE {
        format!("{} seconds ago", delta as i64)
    } else if delta < SECONDS_PER_MINUTE * FUDGE {
        "a minute ago".to_string()
    } else if delta < SECONDS_PER_HOUR / FUDGE {
        format!("{} minutes ago", (delta / SECONDS_PER_MINUTE) as i64)
    } else if delta < SECONDS_PER_HOUR * FUDGE {
        "an hour ago".to_string()
    } else if delta < SECONDS_PER_DAY / FUDGE {
        format!("{} hours ago", (delta / SECONDS_PER_HOUR) as i64)
    } else if delta < SECONDS_PER_DAY * FUDGE {
        "a day ago".to_string()
    } else {
        format!("{} days ago", (delta / SECONDS_PER_DAY) as i64)
    }
}

/// [`time_since`] measured against the current wall clock.
#[must_use]
pub fn time_since_now(then: DateTime<Utc>) -> String {
    time_since(then, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn boundaries_use_the_fudge_factor() {
        let now = Utc::now();
        assert_eq!(time_since(now, now), "a second ago");
        assert_eq!(time_since(now - Duration::seconds(30), now), "30 seconds ago");
        assert_eq!(time_since(now - Duration::seconds(59), now), "a minute ago");
        assert_eq!(time_since(now - Duration::minutes(47), now), "47 minutes ago");
        assert_eq!(time_since(now - Duration::minutes(70), now), "an hour ago");
        assert_eq!(time_since(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(time_since(now - Duration::hours(26), now), "a day ago");
        assert_eq!(time_since(now - Duration::days(10), now), "10 days ago");
    }

    #[test]
    fn future_timestamps_clamp_to_now() {
        let now = Utc::now();
        assert_eq!(time_since(now + Duration::minutes(3), now), "a second ago");
    }
}
