//! Temporal urgency bucketing for callbacks and consultations.
//!
//! Pure functions over an injected `now` so every bucket boundary can be
//! pinned in tests. Used by the classifier's date filters indirectly and
//! by the presentation layer for badges and day labels.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Window ahead of `now` that counts as "soon".
const SOON_WINDOW_HOURS: i64 = 2;

/// How urgent a booked timestamp is, relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// The timestamp has already passed.
    Past,
    /// Within the next two hours.
    Soon,
    /// Later today.
    Today,
    /// Tomorrow or later.
    Upcoming,
}

/// Classify `ts` relative to `now`.
pub fn urgency(ts: DateTime<Utc>, now: DateTime<Utc>) -> Urgency {
    if ts < now {
        return Urgency::Past;
    }
    let until = ts - now;
    if until <= Duration::hours(SOON_WINDOW_HOURS) {
        Urgency::Soon
    } else if ts.date_naive() == now.date_naive() && until < Duration::hours(24) {
        Urgency::Today
    } else {
        Urgency::Upcoming
    }
}

/// Day-granularity display label: "Today", "Tomorrow", or a weekday date
/// like "Mon, Jan 5". Compares calendar-day-truncated dates only.
pub fn day_label(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let day = ts.date_naive();
    let today = now.date_naive();
    if day == today {
        "Today".to_string()
    } else if Some(day) == today.succ_opt() {
        "Tomorrow".to_string()
    } else {
        ts.format("%a, %b %-d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_urgency_buckets_against_fixed_now() {
        let now = at(2026, 1, 23, 10, 0);
        assert_eq!(urgency(at(2026, 1, 23, 11, 30), now), Urgency::Soon);
        assert_eq!(urgency(at(2026, 1, 23, 20, 0), now), Urgency::Today);
        assert_eq!(urgency(at(2026, 1, 22, 9, 0), now), Urgency::Past);
        assert_eq!(urgency(at(2026, 1, 25, 9, 0), now), Urgency::Upcoming);
    }

    #[test]
    fn test_soon_boundary_is_inclusive() {
        let now = at(2026, 1, 23, 10, 0);
        // Exactly two hours out is still soon
        assert_eq!(urgency(at(2026, 1, 23, 12, 0), now), Urgency::Soon);
        // One minute past the window is today
        assert_eq!(urgency(at(2026, 1, 23, 12, 1), now), Urgency::Today);
    }

    #[test]
    fn test_now_itself_is_soon_not_past() {
        let now = at(2026, 1, 23, 10, 0);
        assert_eq!(urgency(now, now), Urgency::Soon);
    }

    #[test]
    fn test_late_evening_tomorrow_morning_is_upcoming() {
        // Same <24h window but different calendar day
        let now = at(2026, 1, 23, 22, 0);
        assert_eq!(urgency(at(2026, 1, 24, 8, 0), now), Urgency::Upcoming);
    }

    #[test]
    fn test_day_labels() {
        let now = at(2026, 1, 23, 10, 0);
        assert_eq!(day_label(at(2026, 1, 23, 23, 0), now), "Today");
        assert_eq!(day_label(at(2026, 1, 24, 0, 30), now), "Tomorrow");
        assert_eq!(day_label(at(2026, 1, 26, 9, 0), now), "Mon, Jan 26");
        // Past days also fall through to the weekday form
        assert_eq!(day_label(at(2026, 1, 19, 9, 0), now), "Mon, Jan 19");
    }
}
