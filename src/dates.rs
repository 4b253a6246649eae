//! Calendar logic and the moving "not yet published" boundary.
//!
//! The archive for a day is only assumed to exist once that whole day has
//! elapsed in the publisher's timezone. The publisher runs on Indian Standard
//! Time, so the boundary is current UTC shifted forward by 5h30m. It is
//! recomputed from the [`Clock`] on every call and never cached.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Hours component of the publisher's fixed UTC offset (IST, UTC+05:30).
pub const PUBLISH_OFFSET_HOURS: i64 = 5;
/// Minutes component of the publisher's fixed UTC offset.
pub const PUBLISH_OFFSET_MINUTES: i64 = 30;

/// Source of "now" in UTC, injectable so tests never depend on wall-clock time.
pub trait Clock {
    fn now_utc(&self) -> NaiveDateTime;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Parse a `YYYY-MM-DD` date, `None` if it is not a real Gregorian date
/// (e.g. 2019-02-30).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// The day after `date`, rolling over month and year ends.
///
/// Saturates at the last representable date.
pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}

/// Validity checks against the publish boundary and the crawl's lower bound.
#[derive(Debug, Clone)]
pub struct DateBoundary<C> {
    /// Exclusive lower bound: the crawl's declared start date.
    lower_bound: NaiveDate,
    clock: C,
}

impl<C: Clock> DateBoundary<C> {
    pub fn new(lower_bound: NaiveDate, clock: C) -> Self {
        Self { lower_bound, clock }
    }

    /// Current UTC shifted by the publisher's offset. Fresh on every call.
    pub fn publish_boundary_now(&self) -> NaiveDateTime {
        self.clock.now_utc()
            + Duration::hours(PUBLISH_OFFSET_HOURS)
            + Duration::minutes(PUBLISH_OFFSET_MINUTES)
    }

    /// True iff the whole of `date` has passed in the publisher's timezone and
    /// `date` is strictly after the lower bound.
    pub fn is_valid_date(&self, date: NaiveDate) -> bool {
        let Some(following) = date.succ_opt() else {
            return false;
        };
        following.and_time(NaiveTime::MIN) < self.publish_boundary_now() && date > self.lower_bound
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// A clock frozen at one instant.
    #[derive(Debug, Clone, Copy)]
    pub(crate) struct FixedClock(pub NaiveDateTime);

    impl Clock for FixedClock {
        fn now_utc(&self) -> NaiveDateTime {
            self.0
        }
    }

    /// A clock shared with whatever moves it forward.
    #[derive(Debug, Clone)]
    pub(crate) struct MovingClock(pub Rc<Cell<NaiveDateTime>>);

    impl MovingClock {
        pub(crate) fn starting_at(now: NaiveDateTime) -> Self {
            Self(Rc::new(Cell::new(now)))
        }
    }

    impl Clock for MovingClock {
        fn now_utc(&self) -> NaiveDateTime {
            self.0.get()
        }
    }

    pub(crate) fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_day_full_year_lands_on_next_jan_first() {
        for (year, days) in [(2019, 365), (2020, 366), (1900, 365), (2000, 366)] {
            let mut d = ymd(year, 1, 1);
            for _ in 0..days {
                d = next_day(d);
            }
            assert_eq!(d, ymd(year + 1, 1, 1), "year {year}");
        }
    }

    #[test]
    fn test_next_day_rolls_month_and_year() {
        assert_eq!(next_day(ymd(2019, 2, 28)), ymd(2019, 3, 1));
        assert_eq!(next_day(ymd(2020, 2, 28)), ymd(2020, 2, 29));
        assert_eq!(next_day(ymd(2019, 12, 31)), ymd(2020, 1, 1));
    }

    #[test]
    fn test_publish_boundary_is_utc_plus_five_thirty() {
        let boundary = DateBoundary::new(ymd(2000, 1, 1), FixedClock(at(2022, 8, 10, 20, 0, 0)));
        assert_eq!(boundary.publish_boundary_now(), at(2022, 8, 11, 1, 30, 0));
    }

    #[test]
    fn test_tomorrow_is_invalid_and_yesterday_is_valid() {
        let now = at(2022, 8, 10, 12, 0, 0);
        let boundary = DateBoundary::new(ymd(2022, 8, 1), FixedClock(now));
        assert!(!boundary.is_valid_date(ymd(2022, 8, 11)));
        assert!(!boundary.is_valid_date(ymd(2022, 8, 10)));
        assert!(boundary.is_valid_date(ymd(2022, 8, 9)));
    }

    #[test]
    fn test_today_becomes_valid_after_ist_midnight() {
        // 18:30 UTC is midnight IST, so 2022-08-10 has fully elapsed there.
        let before = DateBoundary::new(ymd(2022, 8, 1), FixedClock(at(2022, 8, 10, 18, 30, 0)));
        assert!(!before.is_valid_date(ymd(2022, 8, 10)));
        let after = DateBoundary::new(ymd(2022, 8, 1), FixedClock(at(2022, 8, 10, 18, 30, 1)));
        assert!(after.is_valid_date(ymd(2022, 8, 10)));
    }

    #[test]
    fn test_boundary_rereads_clock_on_every_check() {
        let clock = MovingClock::starting_at(at(2022, 8, 10, 18, 29, 59));
        let boundary = DateBoundary::new(ymd(2022, 8, 1), clock.clone());
        assert!(!boundary.is_valid_date(ymd(2022, 8, 10)));

        clock.0.set(at(2022, 8, 10, 18, 30, 1));
        assert_eq!(boundary.publish_boundary_now(), at(2022, 8, 11, 0, 0, 1));
        assert!(boundary.is_valid_date(ymd(2022, 8, 10)));
    }

    #[test]
    fn test_lower_bound_is_exclusive() {
        let boundary = DateBoundary::new(ymd(2022, 8, 1), FixedClock(at(2023, 1, 1, 0, 0, 0)));
        assert!(!boundary.is_valid_date(ymd(2022, 8, 1)));
        assert!(!boundary.is_valid_date(ymd(2022, 7, 31)));
        assert!(boundary.is_valid_date(ymd(2022, 8, 2)));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2019-02-07"), Some(ymd(2019, 2, 7)));
        assert_eq!(parse_date(" 2022-08-01 "), Some(ymd(2022, 8, 1)));
        assert_eq!(parse_date("2019-02-30"), None);
        assert_eq!(parse_date("2019-02-29"), None);
        assert_eq!(parse_date("2020-02-29"), Some(ymd(2020, 2, 29)));
        assert_eq!(parse_date("yesterday"), None);
    }
}
