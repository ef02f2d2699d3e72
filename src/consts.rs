/// Minimum supported year (inclusive)
pub const MIN_YEAR: i32 = 1;
/// Maximum supported year (inclusive)
pub const MAX_YEAR: i32 = 9999;

/// Number of months in a year
pub const MONTHS_PER_YEAR: i64 = 12;
/// Days in a week
pub const DAYS_IN_WEEK: i64 = 7;

/// February and its leap day, probed to detect leap years
pub(crate) const FEBRUARY: u32 = 2;
pub(crate) const FEBRUARY_DAYS_LEAP: u32 = 29;
/// December 31st carries the length of its year as its ordinal
pub(crate) const DECEMBER: u32 = 12;
pub(crate) const LAST_DAY_OF_DECEMBER: u32 = 31;

/// Year assumed when a parse pattern carries no year
pub const EPOCH_YEAR: i64 = 1970;

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
pub(crate) const NANOS_PER_MILLI: u32 = 1_000_000;

/// Last representable value of each time-of-day field, used by end-of-period queries
pub const LAST_HOUR: i32 = 23;
pub const LAST_MINUTE: i32 = 59;
pub const LAST_SECOND: i32 = 59;
pub const LAST_MILLISECOND: i32 = 999;

/// Default rendering pattern (strftime spelling of `yyyy-MM-dd`)
pub const DEFAULT_FORMAT: &str = "%Y-%m-%d";

/// Range separator (ISO 8601 time interval)
pub const RANGE_SEPARATOR: char = '/';

/// ISO 8601 requires the first week of a year to hold at least four days
pub const DEFAULT_MINIMAL_DAYS_IN_FIRST_WEEK: u8 = 4;

/// Largest magnitude of a fixed UTC offset, in seconds (exclusive of a full day)
pub const MAX_OFFSET_SECONDS: i32 = 86_399;
