//! Calendar policy applied when resolving an instant into fields.
//!
//! Week boundaries and week numbering depend on which day starts a week and on
//! how many days of a new year (or month) the first week must hold. Both are
//! explicit values here rather than ambient locale state, alongside the fixed
//! UTC offset used to resolve local fields.

use crate::DayOfWeek;
use crate::DateError;
use crate::consts::{DAYS_IN_WEEK, DEFAULT_MINIMAL_DAYS_IN_FIRST_WEEK, MAX_OFFSET_SECONDS};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCalendarConfig", into = "RawCalendarConfig")]
pub struct CalendarConfig {
    offset:                     FixedOffset,
    first_day_of_week:          DayOfWeek,
    minimal_days_in_first_week: u8,
}

/// Serialized form; the offset travels as seconds east of UTC.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawCalendarConfig {
    #[serde(default)]
    offset_seconds:             i32,
    #[serde(default = "default_first_day_of_week")]
    first_day_of_week:          DayOfWeek,
    #[serde(default = "default_minimal_days")]
    minimal_days_in_first_week: u8,
}

const fn default_first_day_of_week() -> DayOfWeek {
    DayOfWeek::Monday
}

const fn default_minimal_days() -> u8 {
    DEFAULT_MINIMAL_DAYS_IN_FIRST_WEEK
}

impl CalendarConfig {
    /// Creates a validated configuration
    ///
    /// # Errors
    /// Returns `DateError::InvalidConfig` if `minimal_days_in_first_week` is not in `1..=7`.
    pub fn new(
        offset: FixedOffset,
        first_day_of_week: DayOfWeek,
        minimal_days_in_first_week: u8,
    ) -> Result<Self, DateError> {
        validate_minimal_days(minimal_days_in_first_week)?;
        Ok(Self {
            offset,
            first_day_of_week,
            minimal_days_in_first_week,
        })
    }

    /// ISO 8601 weeks: Monday first, at least four days in week 1, UTC
    pub fn iso() -> Self {
        Self {
            offset:                     Utc.fix(),
            first_day_of_week:          DayOfWeek::Monday,
            minimal_days_in_first_week: DEFAULT_MINIMAL_DAYS_IN_FIRST_WEEK,
        }
    }

    /// US weeks: Sunday first, any partial week counts as week 1, UTC
    pub fn us() -> Self {
        Self {
            offset:                     Utc.fix(),
            first_day_of_week:          DayOfWeek::Sunday,
            minimal_days_in_first_week: 1,
        }
    }

    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub const fn first_day_of_week(&self) -> DayOfWeek {
        self.first_day_of_week
    }

    pub const fn minimal_days_in_first_week(&self) -> u8 {
        self.minimal_days_in_first_week
    }

    /// Last day of the week implied by `first_day_of_week`
    pub fn last_day_of_week(&self) -> DayOfWeek {
        DayOfWeek::last_of_week_starting(self.first_day_of_week)
    }

    #[must_use]
    pub const fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Replaces the offset, given in seconds east of UTC
    ///
    /// # Errors
    /// Returns `DateError::InvalidConfig` if the offset is a full day or more.
    pub fn with_offset_seconds(self, seconds: i32) -> Result<Self, DateError> {
        Ok(self.with_offset(offset_from_seconds(seconds)?))
    }

    #[must_use]
    pub const fn with_first_day_of_week(mut self, first_day_of_week: DayOfWeek) -> Self {
        self.first_day_of_week = first_day_of_week;
        self
    }

    /// # Errors
    /// Returns `DateError::InvalidConfig` if `days` is not in `1..=7`.
    pub fn with_minimal_days_in_first_week(mut self, days: u8) -> Result<Self, DateError> {
        validate_minimal_days(days)?;
        self.minimal_days_in_first_week = days;
        Ok(self)
    }

    /// Offset in days from the first day of a period (year or month) to the
    /// start of its week 1. Negative when week 1 starts in the previous period.
    pub(crate) fn first_week_offset(&self, period_start: DayOfWeek) -> i64 {
        let lead = period_start.days_from(self.first_day_of_week);
        if DAYS_IN_WEEK - lead >= i64::from(self.minimal_days_in_first_week) {
            -lead
        } else {
            DAYS_IN_WEEK - lead
        }
    }

    /// Tie-breaker used to keep `Ord` on dates consistent with equality
    pub(crate) fn sort_key(&self) -> (i32, DayOfWeek, u8) {
        (
            self.offset.local_minus_utc(),
            self.first_day_of_week,
            self.minimal_days_in_first_week,
        )
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self::iso()
    }
}

impl TryFrom<RawCalendarConfig> for CalendarConfig {
    type Error = DateError;

    fn try_from(raw: RawCalendarConfig) -> Result<Self, Self::Error> {
        Self::new(
            offset_from_seconds(raw.offset_seconds)?,
            raw.first_day_of_week,
            raw.minimal_days_in_first_week,
        )
    }
}

impl From<CalendarConfig> for RawCalendarConfig {
    fn from(config: CalendarConfig) -> Self {
        Self {
            offset_seconds:             config.offset.local_minus_utc(),
            first_day_of_week:          config.first_day_of_week,
            minimal_days_in_first_week: config.minimal_days_in_first_week,
        }
    }
}

fn offset_from_seconds(seconds: i32) -> Result<FixedOffset, DateError> {
    if !(-MAX_OFFSET_SECONDS..=MAX_OFFSET_SECONDS).contains(&seconds) {
        return Err(DateError::InvalidConfig(format!(
            "offset {seconds}s must be within ±{MAX_OFFSET_SECONDS}s"
        )));
    }
    FixedOffset::east_opt(seconds)
        .ok_or_else(|| DateError::InvalidConfig(format!("offset {seconds}s is not representable")))
}

fn validate_minimal_days(days: u8) -> Result<(), DateError> {
    if days == 0 || i64::from(days) > DAYS_IN_WEEK {
        return Err(DateError::InvalidConfig(format!(
            "minimal days in first week must be 1-{DAYS_IN_WEEK}, got {days}"
        )));
    }
    Ok(())
}
