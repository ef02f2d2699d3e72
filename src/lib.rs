//! A calendar date value with field access, calendar arithmetic, period
//! boundaries, comparisons and age calculation.
//!
//! [`DateValue`] is an immutable `Copy` type: every setter and every arithmetic
//! or boundary operation returns a new value and leaves the receiver untouched,
//! so values may be shared across threads freely. Callers that keep a value in
//! a mutable binding shared between threads must synchronize that binding
//! themselves.

mod clock;
mod config;
mod consts;
mod prelude;
mod range;
mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CalendarConfig;
pub use consts::*;
pub use range::DateRange;
pub use types::{DayOfWeek, days_in_month, days_in_year, is_leap_year};

use crate::prelude::*;
use chrono::format::{ParseErrorKind, ParseResult, Parsed, StrftimeItems};
use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    SecondsFormat, SubsecRound, TimeDelta, TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Write as _};
use std::str::FromStr;

/// Pattern name reported for RFC 3339 parse failures
const RFC_3339: &str = "RFC 3339";

/// A point in time resolved to calendar fields under a [`CalendarConfig`].
///
/// Months are 0-based (`0` = January), matching the field encoding used by
/// [`DateValue::month`] and [`DateValue::with_month`]. All other fields use
/// their natural numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateValue", into = "RawDateValue")]
pub struct DateValue {
    instant: DateTime<Utc>,
    config:  CalendarConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date {:?} for pattern {:?}: {}", input, pattern, reason)]
    InvalidFormat {
        input:   String,
        pattern: String,
        reason:  String,
    },
    #[display(fmt = "Invalid weekday: {}", _0)]
    InvalidWeekday(String),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// Error type for date construction, arithmetic and formatting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// Text did not match the expected pattern.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The result falls outside the supported years.
    #[error("{operation} with {value} leaves the supported range")]
    OutOfRange { operation: &'static str, value: i64 },

    /// A format pattern contains unknown specifiers.
    #[error("Invalid format pattern: {0:?}")]
    InvalidPattern(String),

    /// Start date is after end date.
    #[error("Invalid date range: start ({start}) is after end ({end})")]
    InvalidRange { start: DateValue, end: DateValue },

    #[error("Invalid calendar configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid day-of-week code: {0} (must be 1-7)")]
    InvalidDayCode(i32),
}

/// Parses text whose pattern leaves date or time fields unset, filling the
/// gaps from 1970-01-01T00:00:00.000. Returns the local date-time and the
/// parsed offset in seconds, if the pattern had one.
fn parse_with_defaults(text: &str, pattern: &str) -> ParseResult<(NaiveDateTime, Option<i32>)> {
    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, text, StrftimeItems::new(pattern))?;

    if parsed.year().is_none()
        && parsed.year_div_100().is_none()
        && parsed.year_mod_100().is_none()
        && parsed.isoyear().is_none()
    {
        parsed.set_year(EPOCH_YEAR)?;
    }

    let has_week = parsed.isoweek().is_some() || parsed.week_from_sun().is_some() || parsed.week_from_mon().is_some();
    if parsed.ordinal().is_none() && !has_week {
        if parsed.month().is_none() {
            parsed.set_month(1)?;
        }
        if parsed.day().is_none() {
            parsed.set_day(1)?;
        }
    }

    match (parsed.hour_div_12(), parsed.hour_mod_12()) {
        (None, None) => parsed.set_hour(0)?,
        // 12-hour clock without a meridiem reads as AM
        (None, Some(_)) => parsed.set_ampm(false)?,
        _ => {},
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }

    let local = parsed.to_naive_date()?.and_time(parsed.to_naive_time()?);
    Ok((local, parsed.offset()))
}

fn out_of_range(operation: &'static str, value: i64) -> DateError {
    tracing::debug!(operation, value, "date left the supported range");
    DateError::OutOfRange { operation, value }
}

/// Local calendar fields, allowed to hold out-of-range values until resolved.
#[derive(Debug, Clone, Copy)]
struct Fields {
    year:   i64,
    month0: i64,
    day:    i64,
    hour:   i64,
    minute: i64,
    second: i64,
    millis: i64,
}

impl Fields {
    fn of(local: NaiveDateTime) -> Self {
        Self {
            year:   i64::from(local.year()),
            month0: i64::from(local.month0()),
            day:    i64::from(local.day()),
            hour:   i64::from(local.hour()),
            minute: i64::from(local.minute()),
            second: i64::from(local.second()),
            millis: i64::from(local.nanosecond() / NANOS_PER_MILLI),
        }
    }

    /// Normalizes the fields the way a lenient calendar does: surplus months
    /// carry into years, surplus days into months and so on.
    fn resolve(self) -> Option<NaiveDateTime> {
        let total_months = self.year.checked_mul(MONTHS_PER_YEAR)?.checked_add(self.month0)?;
        let year = i32::try_from(total_months.div_euclid(MONTHS_PER_YEAR)).ok()?;
        let month = u32::try_from(total_months.rem_euclid(MONTHS_PER_YEAR)).ok()? + 1;
        let date = NaiveDate::from_ymd_opt(year, month, 1)?
            .checked_add_signed(TimeDelta::try_days(self.day.checked_sub(1)?)?)?;

        let millis = self
            .hour
            .checked_mul(MILLIS_PER_HOUR)?
            .checked_add(self.minute.checked_mul(MILLIS_PER_MINUTE)?)?
            .checked_add(self.second.checked_mul(MILLIS_PER_SECOND)?)?
            .checked_add(self.millis)?;
        date.and_time(NaiveTime::MIN)
            .checked_add_signed(TimeDelta::try_milliseconds(millis)?)
    }
}

impl DateValue {
    /// Current instant under the default configuration
    pub fn now() -> Self {
        Self::now_with(CalendarConfig::default())
    }

    /// Current instant under `config`
    pub fn now_with(config: CalendarConfig) -> Self {
        // The system clock always sits inside the supported years.
        Self {
            instant: Utc::now().trunc_subsecs(3),
            config,
        }
    }

    /// Current instant as reported by `clock`
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the clock reports an unsupported year.
    pub fn now_from<C: Clock + ?Sized>(clock: &C, config: CalendarConfig) -> Result<Self, DateError> {
        let now = clock.now();
        Self::checked(now, config, "clock", now.timestamp_millis())
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if `millis` lies outside the supported years.
    pub fn from_timestamp_millis(millis: i64) -> Result<Self, DateError> {
        Self::from_timestamp_millis_with(millis, CalendarConfig::default())
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if `millis` lies outside the supported years.
    pub fn from_timestamp_millis_with(millis: i64, config: CalendarConfig) -> Result<Self, DateError> {
        let instant = DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| out_of_range("from timestamp", millis))?;
        Self::checked(instant, config, "from timestamp", millis)
    }

    /// Adopts the instant and the offset of any chrono date-time.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the date lies outside the supported years.
    pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Result<Self, DateError> {
        let config = CalendarConfig::default().with_offset(datetime.offset().fix());
        let instant = datetime.with_timezone(&Utc);
        Self::checked(instant, config, "from datetime", instant.timestamp_millis())
    }

    /// Parses `text` with a strftime `pattern` under the default configuration.
    ///
    /// # Errors
    /// Returns `DateError::Parse` if `text` does not match `pattern`.
    pub fn parse(text: &str, pattern: &str) -> Result<Self, DateError> {
        Self::parse_with(text, pattern, CalendarConfig::default())
    }

    /// Parses `text` with a strftime `pattern`.
    ///
    /// The pattern is tried as a zoned date-time first (adopting the parsed
    /// offset), then as a local date-time resolved in the offset of `config`.
    /// Fields the pattern leaves out default to `1970-01-01T00:00:00.000`, so
    /// `%Y-%m` lands on the first of the month and `%H:%M` on 1970-01-01.
    ///
    /// # Errors
    /// Returns `DateError::Parse` if `text` does not match `pattern`.
    pub fn parse_with(text: &str, pattern: &str, config: CalendarConfig) -> Result<Self, DateError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput.into());
        }

        let invalid = |err: chrono::ParseError| {
            tracing::debug!(input = trimmed, pattern, error = %err, "failed to parse date");
            ParseError::InvalidFormat {
                input:   trimmed.to_owned(),
                pattern: pattern.to_owned(),
                reason:  err.to_string(),
            }
        };

        if let Ok(zoned) = DateTime::parse_from_str(trimmed, pattern) {
            tracing::trace!(input = trimmed, pattern, "parsed zoned date");
            let config = config.with_offset(zoned.offset().fix());
            let instant = zoned.with_timezone(&Utc);
            return Self::checked(instant, config, "parse", instant.timestamp_millis());
        }

        let (local, offset) = match NaiveDateTime::parse_from_str(trimmed, pattern) {
            Ok(local) => (local, None),
            Err(err) if err.kind() == ParseErrorKind::NotEnough => {
                parse_with_defaults(trimmed, pattern).map_err(invalid)?
            },
            Err(err) => return Err(invalid(err).into()),
        };
        tracing::trace!(input = trimmed, pattern, "parsed local date");

        let config = offset
            .and_then(FixedOffset::east_opt)
            .map_or(config, |offset| config.with_offset(offset));

        Self::from_parts(local, config, "parse", 0)
    }

    /// Returns a copy of `date` with the time of day cleared.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if midnight lies outside the supported years.
    pub fn clear_time(date: &Self) -> Result<Self, DateError> {
        date.start_of_day()
    }

    fn checked(
        instant: DateTime<Utc>,
        config: CalendarConfig,
        operation: &'static str,
        value: i64,
    ) -> Result<Self, DateError> {
        let date = Self {
            instant: instant.trunc_subsecs(3),
            config,
        };
        if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
            Ok(date)
        } else {
            Err(out_of_range(operation, value))
        }
    }

    fn from_parts(
        local: NaiveDateTime,
        config: CalendarConfig,
        operation: &'static str,
        value: i64,
    ) -> Result<Self, DateError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&local.year()) {
            return Err(out_of_range(operation, value));
        }
        let instant = config
            .offset()
            .from_local_datetime(&local)
            .single()
            .ok_or_else(|| out_of_range(operation, value))?
            .with_timezone(&Utc);
        Self::checked(instant, config, operation, value)
    }

    /// Replaces local fields and renormalizes.
    fn with_fields(
        &self,
        operation: &'static str,
        value: i64,
        update: impl FnOnce(&mut Fields),
    ) -> Result<Self, DateError> {
        let mut fields = Fields::of(self.local());
        update(&mut fields);
        let local = fields.resolve().ok_or_else(|| out_of_range(operation, value))?;
        Self::from_parts(local, self.config, operation, value)
    }

    fn with_local(&self, local: Option<NaiveDateTime>, operation: &'static str, value: i64) -> Result<Self, DateError> {
        let local = local.ok_or_else(|| out_of_range(operation, value))?;
        Self::from_parts(local, self.config, operation, value)
    }

    fn with_instant(&self, instant: Option<DateTime<Utc>>, operation: &'static str, value: i64) -> Result<Self, DateError> {
        let instant = instant.ok_or_else(|| out_of_range(operation, value))?;
        Self::checked(instant, self.config, operation, value)
    }

    fn local(&self) -> NaiveDateTime {
        self.datetime().naive_local()
    }
}

// --- accessors ---
impl DateValue {
    /// The wrapped instant, viewed in the configured offset
    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.instant.with_timezone(&self.config.offset())
    }

    /// The wrapped instant in UTC
    pub const fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub const fn config(&self) -> CalendarConfig {
        self.config
    }

    pub const fn timezone(&self) -> FixedOffset {
        self.config.offset()
    }

    /// Milliseconds since 1970-01-01T00:00:00Z
    pub fn timestamp_millis(&self) -> i64 {
        self.instant.timestamp_millis()
    }

    pub fn year(&self) -> i32 {
        self.local().year()
    }

    /// Month of the year, 0-based (`0` = January)
    pub fn month(&self) -> u32 {
        self.local().month0()
    }

    pub fn day_of_month(&self) -> u32 {
        self.local().day()
    }

    /// Day of the year, 1-based
    pub fn day_of_year(&self) -> u32 {
        self.local().ordinal()
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        self.local().weekday().into()
    }

    pub fn hour_of_day(&self) -> u32 {
        self.local().hour()
    }

    pub fn minute(&self) -> u32 {
        self.local().minute()
    }

    pub fn second(&self) -> u32 {
        self.local().second()
    }

    pub fn millisecond(&self) -> u32 {
        self.local().nanosecond() / NANOS_PER_MILLI
    }

    /// Week of the month. Days before the month's first full week (as defined
    /// by the configured first day and minimal days) are week 0.
    pub fn week_of_month(&self) -> u32 {
        let date = self.local().date();
        let day0 = i64::from(date.day0());
        let first_of_month = self.day_of_week().shifted(-day0);
        let offset = self.config.first_week_offset(first_of_month);
        to_week_number((day0 - offset).div_euclid(DAYS_IN_WEEK) + 1)
    }

    /// Week of the year. Days before week 1 belong to the last week of the
    /// previous year; days on or after next year's week 1 report week 1.
    pub fn week_of_year(&self) -> u32 {
        let date = self.local().date();
        let year = date.year();
        let ordinal0 = i64::from(date.ordinal0());
        let jan_first = self.day_of_week().shifted(-ordinal0);
        let offset = self.config.first_week_offset(jan_first);
        let week = (ordinal0 - offset).div_euclid(DAYS_IN_WEEK) + 1;

        if week == 0 {
            let previous_len = i64::from(days_in_year(year - 1));
            let previous_offset = self
                .config
                .first_week_offset(jan_first.shifted(-previous_len));
            return to_week_number((ordinal0 + previous_len - previous_offset).div_euclid(DAYS_IN_WEEK) + 1);
        }

        let len = i64::from(days_in_year(year));
        let next_offset = self.config.first_week_offset(jan_first.shifted(len));
        if ordinal0 - len >= next_offset {
            1
        } else {
            to_week_number(week)
        }
    }

    /// Number of days in the current month (28-31)
    pub fn actual_maximum_day_of_month(&self) -> u32 {
        let local = self.local();
        days_in_month(local.year(), local.month())
    }

    /// Number of days in the current year (365 or 366)
    pub fn actual_maximum_day_of_year(&self) -> u32 {
        days_in_year(self.year())
    }

    /// RFC 3339 rendering with millisecond precision
    pub fn to_rfc3339(&self) -> String {
        self.datetime().to_rfc3339_opts(SecondsFormat::Millis, false)
    }
}

fn to_week_number(week: i64) -> u32 {
    u32::try_from(week).unwrap_or_default()
}

// --- setters ---
impl DateValue {
    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn with_year(&self, year: i32) -> Result<Self, DateError> {
        self.with_fields("set year", year.into(), |f| f.year = year.into())
    }

    /// Sets the 0-based month; values outside `0..12` carry into the year.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn with_month(&self, month: i32) -> Result<Self, DateError> {
        self.with_fields("set month", month.into(), |f| f.month0 = month.into())
    }

    /// Sets the day of the month; day 0 is the last day of the previous month
    /// and days past the month's end roll into the next.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn with_day_of_month(&self, day: i32) -> Result<Self, DateError> {
        self.with_fields("set day of month", day.into(), |f| f.day = day.into())
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn with_day_of_year(&self, day: i32) -> Result<Self, DateError> {
        self.with_fields("set day of year", day.into(), |f| {
            f.month0 = 0;
            f.day = day.into();
        })
    }

    /// Moves to `day` within the current week, where weeks start on the
    /// configured first day of week. The time of day is kept.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn with_day_of_week(&self, day: DayOfWeek) -> Result<Self, DateError> {
        let first = self.config.first_day_of_week();
        let delta = day.days_from(first) - self.day_of_week().days_from(first);
        self.with_fields("set day of week", day.code().into(), |f| f.day += delta)
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn with_hour_of_day(&self, hour: i32) -> Result<Self, DateError> {
        self.with_fields("set hour of day", hour.into(), |f| f.hour = hour.into())
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn with_minute(&self, minute: i32) -> Result<Self, DateError> {
        self.with_fields("set minute", minute.into(), |f| f.minute = minute.into())
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn with_second(&self, second: i32) -> Result<Self, DateError> {
        self.with_fields("set second", second.into(), |f| f.second = second.into())
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn with_millisecond(&self, millis: i32) -> Result<Self, DateError> {
        self.with_fields("set millisecond", millis.into(), |f| f.millis = millis.into())
    }

    /// Sets year, 0-based month and day together, normalizing once.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn with_date(&self, year: i32, month: i32, day: i32) -> Result<Self, DateError> {
        self.with_fields("set date", year.into(), |f| {
            f.year = year.into();
            f.month0 = month.into();
            f.day = day.into();
        })
    }

    /// Sets the four time-of-day fields together, normalizing once.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn with_time_of_day(&self, hour: i32, minute: i32, second: i32, millis: i32) -> Result<Self, DateError> {
        self.with_fields("set time of day", hour.into(), |f| {
            f.hour = hour.into();
            f.minute = minute.into();
            f.second = second.into();
            f.millis = millis.into();
        })
    }

    /// Keeps the instant and resolves fields in `offset` from now on.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the local year leaves the supported years.
    pub fn with_timezone(&self, offset: FixedOffset) -> Result<Self, DateError> {
        self.with_config(self.config.with_offset(offset))
    }

    /// Keeps the instant and resolves fields under `config` from now on.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the local year leaves the supported years.
    pub fn with_config(&self, config: CalendarConfig) -> Result<Self, DateError> {
        Self::checked(self.instant, config, "set config", self.timestamp_millis())
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if `millis` lies outside the supported years.
    pub fn with_timestamp_millis(&self, millis: i64) -> Result<Self, DateError> {
        Self::from_timestamp_millis_with(millis, self.config)
    }

    /// Replaces the instant with one parsed from `text`, keeping the week rules.
    ///
    /// # Errors
    /// Returns `DateError::Parse` if `text` does not match `pattern`.
    pub fn with_parsed(&self, text: &str, pattern: &str) -> Result<Self, DateError> {
        Self::parse_with(text, pattern, self.config)
    }
}

// --- arithmetic ---
impl DateValue {
    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn add_millis(&self, millis: i64) -> Result<Self, DateError> {
        let instant = TimeDelta::try_milliseconds(millis).and_then(|d| self.instant.checked_add_signed(d));
        self.with_instant(instant, "add millis", millis)
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn add_seconds(&self, seconds: i64) -> Result<Self, DateError> {
        let instant = TimeDelta::try_seconds(seconds).and_then(|d| self.instant.checked_add_signed(d));
        self.with_instant(instant, "add seconds", seconds)
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn add_minutes(&self, minutes: i64) -> Result<Self, DateError> {
        let instant = TimeDelta::try_minutes(minutes).and_then(|d| self.instant.checked_add_signed(d));
        self.with_instant(instant, "add minutes", minutes)
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn add_hours(&self, hours: i64) -> Result<Self, DateError> {
        let instant = TimeDelta::try_hours(hours).and_then(|d| self.instant.checked_add_signed(d));
        self.with_instant(instant, "add hours", hours)
    }

    /// Adds calendar days, keeping the wall-clock time.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn add_days(&self, days: i64) -> Result<Self, DateError> {
        let local = TimeDelta::try_days(days).and_then(|d| self.local().checked_add_signed(d));
        self.with_local(local, "add days", days)
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn add_weeks(&self, weeks: i64) -> Result<Self, DateError> {
        let local = TimeDelta::try_weeks(weeks).and_then(|d| self.local().checked_add_signed(d));
        self.with_local(local, "add weeks", weeks)
    }

    /// Adds calendar months, clamping the day to the length of the target month
    /// (January 31st plus one month is the last day of February).
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn add_months(&self, months: i64) -> Result<Self, DateError> {
        self.shift_months(Some(months), "add months", months)
    }

    /// Adds calendar years; February 29th lands on February 28th in common years.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn add_years(&self, years: i64) -> Result<Self, DateError> {
        self.shift_months(years.checked_mul(MONTHS_PER_YEAR), "add years", years)
    }

    fn shift_months(&self, months: Option<i64>, operation: &'static str, value: i64) -> Result<Self, DateError> {
        let local = months.and_then(|months| {
            let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
            if months >= 0 {
                self.local().checked_add_months(magnitude)
            } else {
                self.local().checked_sub_months(magnitude)
            }
        });
        self.with_local(local, operation, value)
    }
}

// --- period boundaries ---
impl DateValue {
    /// Same day at 00:00:00.000
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn start_of_day(&self) -> Result<Self, DateError> {
        self.with_time_of_day(0, 0, 0, 0)
    }

    /// Same day at 23:59:59.999
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn end_of_day(&self) -> Result<Self, DateError> {
        self.with_time_of_day(LAST_HOUR, LAST_MINUTE, LAST_SECOND, LAST_MILLISECOND)
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn start_of_week(&self) -> Result<Self, DateError> {
        self.start_of_day()?
            .with_day_of_week(self.config.first_day_of_week())
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn end_of_week(&self) -> Result<Self, DateError> {
        self.end_of_day()?
            .with_day_of_week(self.config.first_day_of_week())?
            .add_days(DAYS_IN_WEEK - 1)
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn start_of_month(&self) -> Result<Self, DateError> {
        self.start_of_day()?.with_day_of_month(1)
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn end_of_month(&self) -> Result<Self, DateError> {
        let last = i32::try_from(self.actual_maximum_day_of_month()).unwrap_or(1);
        self.end_of_day()?.with_day_of_month(last)
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn start_of_year(&self) -> Result<Self, DateError> {
        self.start_of_day()?.with_day_of_year(1)
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if the result leaves the supported years.
    pub fn end_of_year(&self) -> Result<Self, DateError> {
        let last = i32::try_from(self.actual_maximum_day_of_year()).unwrap_or(1);
        self.end_of_day()?.with_day_of_year(last)
    }
}

// --- formatting ---
impl DateValue {
    /// Renders with a strftime pattern.
    ///
    /// # Errors
    /// Returns `DateError::InvalidPattern` if the pattern cannot be rendered.
    pub fn format(&self, pattern: &str) -> Result<String, DateError> {
        let mut rendered = String::new();
        write!(rendered, "{}", self.datetime().format(pattern))
            .map_err(|_| DateError::InvalidPattern(pattern.to_owned()))?;
        Ok(rendered)
    }

    /// Renders with [`DEFAULT_FORMAT`] (`yyyy-MM-dd`)
    pub fn format_default(&self) -> String {
        self.datetime().format(DEFAULT_FORMAT).to_string()
    }
}

// --- comparison and predicates ---
impl DateValue {
    /// Chronological comparison of the represented moments, ignoring offsets
    /// and week rules.
    pub fn compare_instant(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }

    pub fn after(&self, other: &Self) -> bool {
        self.compare_instant(other) == Ordering::Greater
    }

    pub fn before(&self, other: &Self) -> bool {
        self.compare_instant(other) == Ordering::Less
    }

    /// Whether both values represent the same moment
    pub fn is_same_date(&self, other: &Self) -> bool {
        self.compare_instant(other) == Ordering::Equal
    }

    /// Inclusive containment: `min <= self <= max`
    pub fn is_in_range(&self, min: &Self, max: &Self) -> bool {
        !min.after(self) && !max.before(self)
    }

    pub fn is_day_of_week(&self, day: DayOfWeek) -> bool {
        self.day_of_week().code() == day.code()
    }

    pub fn is_start_of_week(&self) -> bool {
        self.is_day_of_week(self.config.first_day_of_week())
    }

    pub fn is_end_of_week(&self) -> bool {
        self.is_day_of_week(self.config.last_day_of_week())
    }

    pub fn is_start_of_month(&self) -> bool {
        self.day_of_month() == 1
    }

    pub fn is_end_of_month(&self) -> bool {
        self.day_of_month() == self.actual_maximum_day_of_month()
    }

    /// Whether this date falls on the day before today
    pub fn is_yesterday(&self) -> bool {
        self.is_yesterday_relative_to(&Self::now_with(self.config))
    }

    /// Whether the start of this day lies exactly one whole day before the
    /// start of `current`'s day.
    pub fn is_yesterday_relative_to(&self, current: &Self) -> bool {
        (self.midnight_millis() - current.midnight_millis()) / MILLIS_PER_DAY == -1
    }

    fn midnight_millis(&self) -> i64 {
        let midnight = self.local().date().and_time(NaiveTime::MIN);
        midnight.and_utc().timestamp_millis()
            - i64::from(self.config.offset().local_minus_utc()) * MILLIS_PER_SECOND
    }
}

// --- age ---
impl DateValue {
    /// Completed years between this date and today
    pub fn ages(&self) -> i32 {
        self.ages_at(&Self::now_with(self.config))
    }

    /// Completed years between this date and `current`. A birthday counts as
    /// reached once `current`'s month and day are at or past this date's.
    pub fn ages_at(&self, current: &Self) -> i32 {
        let age = current.year() - self.year();
        if (current.month(), current.day_of_month()) < (self.month(), self.day_of_month()) {
            age - 1
        } else {
            age
        }
    }

    pub fn is_allowable_age(&self, min_age: i32, max_age: i32) -> bool {
        self.is_allowable_age_at(min_age, max_age, &Self::now_with(self.config))
    }

    pub fn is_allowable_age_at(&self, min_age: i32, max_age: i32, current: &Self) -> bool {
        (min_age..=max_age).contains(&self.ages_at(current))
    }
}

// --- differences ---
impl DateValue {
    /// `self - compare` in milliseconds
    pub fn difference_in_millis(&self, compare: &Self) -> i64 {
        self.timestamp_millis() - compare.timestamp_millis()
    }

    /// `self - compare` in whole seconds, truncated toward zero
    pub fn difference_in_seconds(&self, compare: &Self) -> i64 {
        self.difference_in_millis(compare) / MILLIS_PER_SECOND
    }

    pub fn difference_in_minutes(&self, compare: &Self) -> i64 {
        self.difference_in_millis(compare) / MILLIS_PER_MINUTE
    }

    pub fn difference_in_hours(&self, compare: &Self) -> i64 {
        self.difference_in_millis(compare) / MILLIS_PER_HOUR
    }

    pub fn difference_in_days(&self, compare: &Self) -> i64 {
        self.difference_in_millis(compare) / MILLIS_PER_DAY
    }
}

impl Default for DateValue {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.datetime())
    }
}

impl PartialOrd for DateValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateValue {
    fn cmp(&self, other: &Self) -> Ordering {
        // Chronological first, then configuration so that equal values are
        // exactly those comparing Equal.
        match self.compare_instant(other) {
            Ordering::Equal => self.config.sort_key().cmp(&other.config.sort_key()),
            ord => ord,
        }
    }
}

impl TryFrom<DateTime<FixedOffset>> for DateValue {
    type Error = DateError;

    fn try_from(datetime: DateTime<FixedOffset>) -> Result<Self, Self::Error> {
        Self::from_datetime(&datetime)
    }
}

impl TryFrom<DateTime<Utc>> for DateValue {
    type Error = DateError;

    fn try_from(datetime: DateTime<Utc>) -> Result<Self, Self::Error> {
        Self::from_datetime(&datetime)
    }
}

impl From<DateValue> for DateTime<FixedOffset> {
    fn from(date: DateValue) -> Self {
        date.datetime()
    }
}

/// Parses RFC 3339 text such as `2024-01-10T08:30:00.000+02:00`.
impl FromStr for DateValue {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput.into());
        }
        let datetime = DateTime::parse_from_rfc3339(trimmed).map_err(|err| ParseError::InvalidFormat {
            input:   trimmed.to_owned(),
            pattern: RFC_3339.to_owned(),
            reason:  err.to_string(),
        })?;
        Self::from_datetime(&datetime)
    }
}

/// Serialized form: the RFC 3339 instant plus the calendar rules. Without a
/// config the default rules apply, keeping the offset written in the instant.
#[derive(Serialize, Deserialize)]
struct RawDateValue {
    instant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config:  Option<CalendarConfig>,
}

impl From<DateValue> for RawDateValue {
    fn from(date: DateValue) -> Self {
        Self {
            instant: date.to_rfc3339(),
            config:  Some(date.config),
        }
    }
}

impl TryFrom<RawDateValue> for DateValue {
    type Error = DateError;

    fn try_from(raw: RawDateValue) -> Result<Self, Self::Error> {
        let date: Self = raw.instant.parse()?;
        match raw.config {
            Some(config) => date.with_config(config),
            None => Ok(date),
        }
    }
}
