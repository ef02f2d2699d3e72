use crate::{DateError, DateValue};
use chrono::{DateTime, Utc};

/// Source of the current instant.
///
/// Operations whose reference point defaults to "now" read it from a clock,
/// so tests can pin time with [`FixedClock`].
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the operating system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    /// # Errors
    /// Returns `DateError::OutOfRange` if `millis` is not a representable instant.
    pub fn at_millis(millis: i64) -> Result<Self, DateError> {
        DateTime::from_timestamp_millis(millis)
            .map(Self::new)
            .ok_or(DateError::OutOfRange {
                operation: "fixed clock",
                value:     millis,
            })
    }
}

impl From<DateValue> for FixedClock {
    fn from(date: DateValue) -> Self {
        Self::new(date.instant())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}
