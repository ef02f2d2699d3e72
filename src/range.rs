use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{DateError, DateValue, MILLIS_PER_DAY, ParseError, RANGE_SEPARATOR};

/// An inclusive span between two dates.
/// The start must not be after the end. The `/`-separated text form
/// (`Display`/`FromStr`) carries offsets only; serde keeps the full values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange", into = "RawDateRange")]
pub struct DateRange {
    start: DateValue,
    end:   DateValue,
}

impl DateRange {
    /// # Errors
    /// Returns `DateError::InvalidRange` if `start` is after `end`.
    pub fn new(start: DateValue, end: DateValue) -> Result<Self, DateError> {
        if start.after(&end) {
            return Err(DateError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> DateValue {
        self.start
    }

    pub const fn end(&self) -> DateValue {
        self.end
    }

    pub const fn dates(&self) -> (DateValue, DateValue) {
        (self.start, self.end)
    }

    /// Whether `date` lies between start and end, both inclusive
    pub fn contains(&self, date: &DateValue) -> bool {
        date.is_in_range(&self.start, &self.end)
    }

    /// Whether the two ranges share at least one instant
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.start.after(&other.end) && !other.start.after(&self.end)
    }

    /// Whether this range lies completely inside `other`
    pub fn is_within(&self, other: &Self) -> bool {
        other.contains(&self.start) && other.contains(&self.end)
    }

    /// Whole days from start to end, truncated
    pub fn duration_in_days(&self) -> i64 {
        self.end.difference_in_millis(&self.start) / MILLIS_PER_DAY
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{RANGE_SEPARATOR}{}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

impl FromStr for DateRange {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let separator_count = trimmed.matches(RANGE_SEPARATOR).count();

        let invalid = |reason: String| {
            DateError::Parse(ParseError::InvalidFormat {
                input:   trimmed.to_owned(),
                pattern: format!("<start>{RANGE_SEPARATOR}<end>"),
                reason,
            })
        };

        match separator_count {
            0 => Err(invalid(format!("No range separator found (expected '{RANGE_SEPARATOR}')"))),
            1 => {
                let (start, end) = trimmed
                    .split_once(RANGE_SEPARATOR)
                    .ok_or_else(|| invalid(format!("Separator '{RANGE_SEPARATOR}' not found")))?;
                Self::new(start.trim().parse()?, end.trim().parse()?)
            },
            _ => Err(invalid(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl PartialOrd for DateRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateRange {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.end.cmp(&other.end),
            ord => ord,
        }
    }
}

/// Serialized form; both ends carry their own calendar rules.
#[derive(Serialize, Deserialize)]
struct RawDateRange {
    start: DateValue,
    end:   DateValue,
}

impl From<DateRange> for RawDateRange {
    fn from(range: DateRange) -> Self {
        Self {
            start: range.start,
            end:   range.end,
        }
    }
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = DateError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CalendarConfig;
    use crate::test_utils::{date, date_with, instant};

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(date(start), date(end)).expect("failed to construct test range")
    }

    #[test]
    fn test_new_range_cases() {
        struct TestCase {
            start:          &'static str,
            end:            &'static str,
            should_succeed: bool,
            description:    &'static str,
        }

        let cases = [
            TestCase {
                start:          "2024-01-01",
                end:            "2024-01-10",
                should_succeed: true,
                description:    "valid range (start < end)",
            },
            TestCase {
                start:          "2024-01-10",
                end:            "2024-01-01",
                should_succeed: false,
                description:    "invalid range (start > end)",
            },
            TestCase {
                start:          "2024-01-10",
                end:            "2024-01-10",
                should_succeed: true,
                description:    "equal dates (start == end)",
            },
        ];

        for case in &cases {
            let result = DateRange::new(date(case.start), date(case.end));

            if case.should_succeed {
                assert!(result.is_ok(), "Expected success for: {}", case.description);
            } else {
                assert!(
                    matches!(result, Err(DateError::InvalidRange { .. })),
                    "Expected failure for: {}",
                    case.description
                );
            }
        }
    }

    #[test]
    fn test_accessors() {
        let r = range("2024-01-01", "2024-01-10");
        assert_eq!(r.start(), date("2024-01-01"));
        assert_eq!(r.end(), date("2024-01-10"));
        assert_eq!(r.dates(), (date("2024-01-01"), date("2024-01-10")));
    }

    #[test]
    fn test_contains() {
        let r = range("2024-01-01", "2024-01-10");

        assert!(r.contains(&date("2024-01-01")));
        assert!(r.contains(&date("2024-01-10")));
        assert!(r.contains(&date("2024-01-05")));
        assert!(!r.contains(&date("2023-12-31")));
        assert!(!r.contains(&instant("2024-01-10T00:00:00.001Z")));
    }

    #[test]
    fn test_overlaps() {
        let first = range("2024-01-01", "2024-01-10");
        let second = range("2024-01-05", "2024-01-20");
        let touching = range("2024-01-10", "2024-01-12");
        let apart = range("2024-02-01", "2024-02-10");

        assert!(first.overlaps(&second));
        assert!(second.overlaps(&first));
        assert!(first.overlaps(&touching), "shared end point counts");
        assert!(!first.overlaps(&apart));
        assert!(!apart.overlaps(&first));
    }

    #[test]
    fn test_is_within() {
        let outer = range("2024-01-01", "2024-12-31");
        let inner = range("2024-03-01", "2024-03-31");
        let straddling = range("2023-12-01", "2024-01-31");

        assert!(inner.is_within(&outer));
        assert!(outer.is_within(&outer));
        assert!(!outer.is_within(&inner));
        assert!(!straddling.is_within(&outer));
    }

    #[test]
    fn test_duration_in_days() {
        assert_eq!(range("2024-01-01", "2024-01-10").duration_in_days(), 9);
        assert_eq!(range("2024-02-01", "2024-03-01").duration_in_days(), 29);
        assert_eq!(range("2024-01-10", "2024-01-10").duration_in_days(), 0);
    }

    #[test]
    fn test_display() {
        let r = range("2024-01-01", "2024-01-10");
        assert_eq!(r.to_string(), "2024-01-01T00:00:00.000+00:00/2024-01-10T00:00:00.000+00:00");
    }

    #[test]
    fn test_from_str() {
        let r = "2024-01-01T00:00:00Z / 2024-01-10T12:00:00+02:00"
            .parse::<DateRange>()
            .expect("failed to parse range");
        assert_eq!(r.start(), instant("2024-01-01T00:00:00Z"));
        assert_eq!(r.end().hour_of_day(), 12);
        assert_eq!(r.end().timezone().local_minus_utc(), 7200);
    }

    #[test]
    fn test_from_str_invalid_order() {
        let result = "2024-01-10T00:00:00Z/2024-01-01T00:00:00Z".parse::<DateRange>();
        assert!(matches!(result, Err(DateError::InvalidRange { .. })));
    }

    #[test]
    fn test_from_str_rejects_other_delimiters() {
        for text in [
            "2024-01-01T00:00:00Z to 2024-01-10T00:00:00Z",
            "2024-01-01T00:00:00Z..2024-01-10T00:00:00Z",
        ] {
            assert!(text.parse::<DateRange>().is_err(), "Expected failure for: {text}");
        }
    }

    #[test]
    fn test_too_many_range_separators() {
        let err = "2024-01-01T00:00:00Z/2024-01-02T00:00:00Z/2024-01-03T00:00:00Z"
            .parse::<DateRange>()
            .expect_err("expected error for too many range separators");
        assert!(err.to_string().contains("Too many '/' separators"));
        assert!(err.to_string().contains("expected 1, found 2"));
    }

    #[test]
    fn test_no_range_separator() {
        let err = "2024-01-01T00:00:00Z"
            .parse::<DateRange>()
            .expect_err("expected error for missing range separator");
        assert!(err.to_string().contains("No range separator found"));
    }

    #[test]
    fn test_from_str_bad_component() {
        let result = "2024-01-01/2024-01-10T00:00:00Z".parse::<DateRange>();
        assert!(matches!(result, Err(DateError::Parse(ParseError::InvalidFormat { .. }))));
    }

    #[test]
    fn test_ordering() {
        let first = range("2024-01-01", "2024-01-10");
        let later_start = range("2024-01-05", "2024-01-06");
        let later_end = range("2024-01-01", "2024-01-20");

        assert!(first < later_start);
        assert!(first < later_end);
        assert!(later_end < later_start);
    }

    #[test]
    fn test_serde_format() {
        let r = range("2024-01-01", "2024-01-10");

        let json = serde_json::to_string(&r).expect("failed to serialize range to JSON");
        let value: serde_json::Value = serde_json::from_str(&json).expect("range JSON is valid");
        assert_eq!(value["start"]["instant"], "2024-01-01T00:00:00.000+00:00");
        assert_eq!(value["end"]["instant"], "2024-01-10T00:00:00.000+00:00");

        let parsed: DateRange = serde_json::from_str(&json).expect("failed to deserialize range from JSON");
        assert_eq!(r, parsed);
    }

    #[test]
    fn test_serde_keeps_week_rules() {
        let r = DateRange::new(date_with("2024-01-01", CalendarConfig::us()), date_with("2024-01-10", CalendarConfig::us()))
            .expect("failed to construct range");
        let json = serde_json::to_string(&r).expect("failed to serialize range to JSON");
        let parsed: DateRange = serde_json::from_str(&json).expect("failed to deserialize range from JSON");

        assert_eq!(parsed, r);
        assert_eq!(parsed.start().config(), CalendarConfig::us());
    }

    #[test]
    fn test_serde_rejects_inverted_range() {
        let result: Result<DateRange, _> = serde_json::from_str(
            r#"{"start":{"instant":"2024-01-10T00:00:00Z"},"end":{"instant":"2024-01-01T00:00:00Z"}}"#,
        );
        assert!(result.is_err());
    }
}
