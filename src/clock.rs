//! Calendar-day source shared by the leveling engine and the daily reset.
//!
//! Every "today" in the application is a local calendar date. The clock
//! decides which local time zone that date is taken in.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// System local time zone
    Local,
    /// Fixed UTC offset from configuration
    Offset(FixedOffset),
    /// Pinned instant (tests)
    Fixed(DateTime<FixedOffset>),
}

impl Clock {
    /// Build the clock from an optional offset in minutes east of UTC.
    /// Falls back to the system time zone when unset or out of range.
    pub fn from_offset_minutes(minutes: Option<i32>) -> Self {
        let Some(minutes) = minutes else {
            return Self::Local;
        };
        match minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
        {
            Some(offset) => Self::Offset(offset),
            None => {
                tracing::warn!(
                    "Ignoring invalid UTC offset of {} minutes, using local time",
                    minutes
                );
                Self::Local
            }
        }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        match self {
            Self::Local => Local::now().fixed_offset(),
            Self::Offset(offset) => Utc::now().with_timezone(offset),
            Self::Fixed(instant) => *instant,
        }
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }

    /// Local calendar date
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_today_uses_local_date() {
        // 23:30 at UTC+7 is still the 19th locally but already 16:30 UTC
        let instant = DateTime::parse_from_rfc3339("2026-10-19T23:30:00+07:00").unwrap();
        let clock = Clock::Fixed(instant);

        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(clock.now_utc().to_rfc3339(), "2026-10-19T16:30:00+00:00");
    }

    #[test]
    fn test_from_offset_minutes() {
        match Clock::from_offset_minutes(Some(420)) {
            Clock::Offset(offset) => assert_eq!(offset.local_minus_utc(), 7 * 3600),
            other => panic!("expected offset clock, got {:?}", other),
        }
        assert!(matches!(Clock::from_offset_minutes(None), Clock::Local));
        // Out of range offsets fall back to local time
        assert!(matches!(Clock::from_offset_minutes(Some(100_000)), Clock::Local));
    }
}
