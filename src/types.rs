use crate::consts::{DAYS_IN_WEEK, DECEMBER, FEBRUARY, FEBRUARY_DAYS_LEAP, LAST_DAY_OF_DECEMBER};
use crate::prelude::*;
use crate::{CalendarConfig, Clock, DateError, DateValue, ParseError};
use chrono::{Datelike, Month, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A day of the week, carrying the conventional calendar code
/// (`Sunday` = 1 through `Saturday` = 7).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum DayOfWeek {
    #[display(fmt = "SUNDAY")]
    Sunday = 1,
    #[display(fmt = "MONDAY")]
    Monday = 2,
    #[display(fmt = "TUESDAY")]
    Tuesday = 3,
    #[display(fmt = "WEDNESDAY")]
    Wednesday = 4,
    #[display(fmt = "THURSDAY")]
    Thursday = 5,
    #[display(fmt = "FRIDAY")]
    Friday = 6,
    #[display(fmt = "SATURDAY")]
    Saturday = 7,
}

impl DayOfWeek {
    /// All days in code order, starting with Sunday.
    pub const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Returns the calendar code of this day (`Sunday` = 1 .. `Saturday` = 7)
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a day by its calendar code
    ///
    /// # Errors
    /// Returns `DateError::InvalidDayCode` if the code is outside `1..=7`.
    pub fn from_code(code: i32) -> Result<Self, DateError> {
        usize::try_from(code)
            .ok()
            .and_then(|c| c.checked_sub(1))
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(DateError::InvalidDayCode(code))
    }

    /// Zero-based position, Sunday first
    #[inline]
    const fn index(self) -> i64 {
        self as i64 - 1
    }

    /// Returns the day `days` positions away, wrapping around the week.
    pub(crate) fn shifted(self, days: i64) -> Self {
        let index = (self.index() + days).rem_euclid(DAYS_IN_WEEK);
        // rem_euclid keeps the index inside 0..7
        Self::ALL[usize::try_from(index).unwrap_or_default()]
    }

    /// Number of days from `first` forward to this day (`0..7`).
    pub(crate) const fn days_from(self, first: Self) -> i64 {
        (self.index() - first.index()).rem_euclid(DAYS_IN_WEEK)
    }

    /// The following day (Saturday wraps to Sunday)
    pub fn succ(self) -> Self {
        self.shifted(1)
    }

    /// The preceding day (Sunday wraps to Saturday)
    pub fn pred(self) -> Self {
        self.shifted(-1)
    }

    /// The last day of a week that starts on `first`
    pub fn last_of_week_starting(first: Self) -> Self {
        first.shifted(DAYS_IN_WEEK - 1)
    }

    /// Whether today, as seen by `clock` under `config`, falls on this day.
    pub fn is_today<C: Clock + ?Sized>(self, clock: &C, config: CalendarConfig) -> bool {
        DateValue::now_from(clock, config).is_ok_and(|today| today.is_day_of_week(self))
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => Self::Sunday,
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
        }
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Sunday => Self::Sun,
            DayOfWeek::Monday => Self::Mon,
            DayOfWeek::Tuesday => Self::Tue,
            DayOfWeek::Wednesday => Self::Wed,
            DayOfWeek::Thursday => Self::Thu,
            DayOfWeek::Friday => Self::Fri,
            DayOfWeek::Saturday => Self::Sat,
        }
    }
}

impl TryFrom<i32> for DayOfWeek {
    type Error = DateError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<DayOfWeek> for u8 {
    fn from(day: DayOfWeek) -> Self {
        day.code()
    }
}

impl FromStr for DayOfWeek {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        Self::ALL
            .into_iter()
            .find(|day| day.to_string().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseError::InvalidWeekday(trimmed.to_owned()))
    }
}

// Helper functions

pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, FEBRUARY, FEBRUARY_DAYS_LEAP).is_some()
}

/// Days in `month` (1-indexed) of `year`, or 0 for a month outside `1..=12`
pub fn days_in_month(year: i32, month: u32) -> u32 {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .and_then(|m| m.num_days(year))
        .map_or(0, u32::from)
}

/// Days in `year`, taken from the ordinal of December 31st
pub fn days_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, DECEMBER, LAST_DAY_OF_DECEMBER).map_or(0, |date| date.ordinal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedClock;

    #[test]
    fn test_codes_follow_calendar_convention() {
        let expected = [1, 2, 3, 4, 5, 6, 7];
        for (day, code) in DayOfWeek::ALL.iter().zip(expected) {
            assert_eq!(day.code(), code, "{day} has wrong code");
        }
    }

    #[test]
    fn test_from_code() {
        assert_eq!(DayOfWeek::from_code(1).expect("failed to build test value"), DayOfWeek::Sunday);
        assert_eq!(DayOfWeek::from_code(7).expect("failed to build test value"), DayOfWeek::Saturday);
        assert!(matches!(DayOfWeek::from_code(0), Err(DateError::InvalidDayCode(0))));
        assert!(matches!(DayOfWeek::from_code(8), Err(DateError::InvalidDayCode(8))));
        assert!(matches!(DayOfWeek::from_code(-1), Err(DateError::InvalidDayCode(-1))));
    }

    #[test]
    fn test_try_from_i32() {
        let day: DayOfWeek = 4.try_into().expect("failed to build test value");
        assert_eq!(day, DayOfWeek::Wednesday);

        let result: Result<DayOfWeek, _> = 9.try_into();
        assert!(result.is_err());
    }

    #[test]
    fn test_succ_and_pred_wrap() {
        assert_eq!(DayOfWeek::Saturday.succ(), DayOfWeek::Sunday);
        assert_eq!(DayOfWeek::Sunday.pred(), DayOfWeek::Saturday);
        assert_eq!(DayOfWeek::Monday.succ(), DayOfWeek::Tuesday);
        assert_eq!(DayOfWeek::Monday.pred(), DayOfWeek::Sunday);
    }

    #[test]
    fn test_last_of_week_cases() {
        struct TestCase {
            first:       DayOfWeek,
            last:        DayOfWeek,
            description: &'static str,
        }

        let cases = [
            TestCase {
                first:       DayOfWeek::Sunday,
                last:        DayOfWeek::Saturday,
                description: "US week",
            },
            TestCase {
                first:       DayOfWeek::Monday,
                last:        DayOfWeek::Sunday,
                description: "ISO week",
            },
            TestCase {
                first:       DayOfWeek::Saturday,
                last:        DayOfWeek::Friday,
                description: "week starting Saturday",
            },
        ];

        for case in &cases {
            assert_eq!(
                DayOfWeek::last_of_week_starting(case.first),
                case.last,
                "Unexpected last day for {}",
                case.description
            );
        }
    }

    #[test]
    fn test_days_from() {
        assert_eq!(DayOfWeek::Monday.days_from(DayOfWeek::Monday), 0);
        assert_eq!(DayOfWeek::Sunday.days_from(DayOfWeek::Monday), 6);
        assert_eq!(DayOfWeek::Monday.days_from(DayOfWeek::Sunday), 1);
        assert_eq!(DayOfWeek::Saturday.days_from(DayOfWeek::Sunday), 6);
    }

    #[test]
    fn test_chrono_weekday_conversion() {
        for day in DayOfWeek::ALL {
            let weekday: Weekday = day.into();
            assert_eq!(DayOfWeek::from(weekday), day);
        }
        assert_eq!(DayOfWeek::from(Weekday::Sun), DayOfWeek::Sunday);
    }

    #[test]
    fn test_display_and_from_str() {
        assert_eq!(DayOfWeek::Wednesday.to_string(), "WEDNESDAY");
        assert_eq!("wednesday".parse::<DayOfWeek>().expect("failed to build test value"), DayOfWeek::Wednesday);
        assert_eq!(" Friday ".parse::<DayOfWeek>().expect("failed to build test value"), DayOfWeek::Friday);
        assert!(matches!("Funday".parse::<DayOfWeek>(), Err(ParseError::InvalidWeekday(_))));
        assert!(matches!("".parse::<DayOfWeek>(), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&DayOfWeek::Thursday).expect("failed to build test value");
        assert_eq!(json, r#""THURSDAY""#);

        let parsed: DayOfWeek = serde_json::from_str(&json).expect("failed to build test value");
        assert_eq!(parsed, DayOfWeek::Thursday);
    }

    #[test]
    fn test_is_today() {
        // 2024-01-10 was a Wednesday
        let clock = FixedClock::at_millis(1_704_880_800_000).expect("failed to build test value");
        assert!(DayOfWeek::Wednesday.is_today(&clock, CalendarConfig::default()));
        assert!(!DayOfWeek::Thursday.is_today(&clock, CalendarConfig::default()));
    }

    #[test]
    fn test_is_leap_year_cases() {
        struct TestCase {
            year: i32,
            is_leap: bool,
            description: &'static str,
        }

        let cases = [
            TestCase {
                year: 2020,
                is_leap: true,
                description: "divisible by 4",
            },
            TestCase {
                year: 2024,
                is_leap: true,
                description: "divisible by 4",
            },
            TestCase {
                year: 2023,
                is_leap: false,
                description: "not divisible by 4",
            },
            TestCase {
                year: 1900,
                is_leap: false,
                description: "century not divisible by 400",
            },
            TestCase {
                year: 2100,
                is_leap: false,
                description: "century not divisible by 400",
            },
            TestCase {
                year: 2000,
                is_leap: true,
                description: "divisible by 400",
            },
            TestCase {
                year: 2400,
                is_leap: true,
                description: "divisible by 400",
            },
        ];

        for case in &cases {
            assert_eq!(
                is_leap_year(case.year),
                case.is_leap,
                "Year {} ({}): expected {}",
                case.year,
                case.description,
                if case.is_leap {
                    "leap year"
                } else {
                    "not leap year"
                }
            );
        }
    }

    #[test]
    fn test_days_in_month_31_day_months() {
        for month in [1, 3, 5, 7, 8, 10, 12] {
            assert_eq!(
                days_in_month(2024, month),
                31,
                "Month {month} should have 31 days"
            );
        }
    }

    #[test]
    fn test_days_in_month_30_day_months() {
        for month in [4, 6, 9, 11] {
            assert_eq!(
                days_in_month(2024, month),
                30,
                "Month {month} should have 30 days"
            );
        }
    }

    #[test]
    fn test_days_in_month_february() {
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28, "Century year not divisible by 400");
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2000, 2), 29, "Century year divisible by 400");
    }

    #[test]
    fn test_days_in_month_out_of_range() {
        assert_eq!(days_in_month(2024, 0), 0);
        assert_eq!(days_in_month(2024, 13), 0);
    }

    #[test]
    fn test_days_in_year() {
        assert_eq!(days_in_year(2023), 365);
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(1900), 365);
        assert_eq!(days_in_year(2000), 366);
    }

    #[test]
    fn test_month_lengths_sum_to_year_length() {
        for year in [1, 4, 100, 400, 1582, 1900, 1999, 2000, 2023, 2024, 2100, 9999] {
            let total: u32 = (1..=12).map(|month| days_in_month(year, month)).sum();
            assert_eq!(total, days_in_year(year), "Month lengths of {year} disagree with the year");
            let expected = if is_leap_year(year) { 366 } else { 365 };
            assert_eq!(days_in_year(year), expected, "Unexpected length of {year}");
        }
    }
}
