//! Interval overlap predicates shared by every conflict check.
//!
//! Ranges are half-open: a class ending at 10:00 and one starting at 10:00
//! do not collide.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::models::TimeSlot;

pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// `[s1, e1)` and `[s2, e2)` intersect.
pub fn ranges_overlap<T: PartialOrd>(s1: T, e1: T, s2: T, e2: T) -> bool {
    s1 < e2 && s2 < e1
}

pub fn times_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    ranges_overlap(
        minutes_since_midnight(a_start),
        minutes_since_midnight(a_end),
        minutes_since_midnight(b_start),
        minutes_since_midnight(b_end),
    )
}

/// Date ranges are stored inclusive, so each end is moved one day forward
/// before applying the half-open test.
pub fn dates_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    ranges_overlap(a_start, day_after(a_end), b_start, day_after(b_end))
}

fn day_after(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(NaiveDate::MAX)
}

/// Same day of week, overlapping hours and overlapping terms.
pub fn slots_overlap(a: &TimeSlot, b: &TimeSlot) -> bool {
    a.day_of_week == b.day_of_week
        && times_overlap(a.start_time, a.end_time, b.start_time, b.end_time)
        && dates_overlap(a.start_date, a.end_date, b.start_date, b.end_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn touching_time_ranges_do_not_overlap() {
        assert!(!times_overlap(t(9, 0), t(10, 0), t(10, 0), t(11, 0)));
        assert!(!times_overlap(t(10, 0), t(11, 0), t(9, 0), t(10, 0)));
    }

    #[test]
    fn one_minute_past_the_boundary_overlaps() {
        assert!(times_overlap(t(9, 0), t(10, 1), t(10, 0), t(11, 0)));
    }

    #[test]
    fn containment_overlaps() {
        assert!(times_overlap(t(8, 0), t(12, 0), t(9, 30), t(10, 0)));
    }

    #[test]
    fn time_overlap_is_symmetric() {
        let ranges = [
            (t(8, 0), t(9, 0)),
            (t(8, 30), t(9, 30)),
            (t(9, 0), t(10, 0)),
            (t(7, 0), t(12, 0)),
            (t(13, 0), t(14, 15)),
        ];
        for &(s1, e1) in &ranges {
            for &(s2, e2) in &ranges {
                assert_eq!(
                    times_overlap(s1, e1, s2, e2),
                    times_overlap(s2, e2, s1, e1),
                    "{s1}-{e1} vs {s2}-{e2}"
                );
            }
        }
    }

    #[test]
    fn date_overlap_is_symmetric() {
        let ranges = [
            (d(2026, 1, 5), d(2026, 3, 1)),
            (d(2026, 3, 1), d(2026, 6, 30)),
            (d(2026, 7, 1), d(2026, 7, 1)),
            (d(2025, 9, 1), d(2026, 12, 31)),
        ];
        for &(s1, e1) in &ranges {
            for &(s2, e2) in &ranges {
                assert_eq!(dates_overlap(s1, e1, s2, e2), dates_overlap(s2, e2, s1, e1));
            }
        }
    }

    #[test]
    fn dates_are_inclusive_calendar_days() {
        // shared last/first day
        assert!(dates_overlap(d(2026, 1, 5), d(2026, 3, 1), d(2026, 3, 1), d(2026, 6, 30)));
        // consecutive terms
        assert!(!dates_overlap(d(2026, 1, 5), d(2026, 2, 28), d(2026, 3, 1), d(2026, 6, 30)));
        // single-day schedule against itself
        assert!(dates_overlap(d(2026, 7, 1), d(2026, 7, 1), d(2026, 7, 1), d(2026, 7, 1)));
    }

    #[test]
    fn slots_on_different_days_never_overlap() {
        let a = TimeSlot {
            day_of_week: 1,
            start_time: t(9, 0),
            end_time: t(10, 0),
            start_date: d(2026, 3, 2),
            end_date: d(2026, 6, 26),
        };
        let b = TimeSlot { day_of_week: 2, ..a };
        assert!(slots_overlap(&a, &a));
        assert!(!slots_overlap(&a, &b));
    }
}
