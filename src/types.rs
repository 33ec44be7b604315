use crate::ParseError;
use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_LEAP_YEAR, DAYS_IN_MONTH, DAYS_IN_MONTH_LEAP, DAYS_IN_NORMAL_YEAR, GREGORIAN_CYCLE,
    JANUARY, LEAP_YEAR_CYCLE, MAX_DAY, MAX_MONTH_SLOTS,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;

/// A month slot guaranteed to be in the range `1..=MAX_MONTH_SLOTS` (1..=13).
/// The 13th slot only exists in years with a shifted start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH_SLOTS`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the value is 0 or > `MAX_MONTH_SLOTS`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidMonth(value))?;
        if value > MAX_MONTH_SLOTS {
            return Err(ParseError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day of month in the range `1..=MAX_DAY`. Whether the day exists in a
/// given month is decided by the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating that it's non-zero and <= `MAX_DAY`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the value is 0 or > `MAX_DAY`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidDay(value))?;
        if value > MAX_DAY {
            return Err(ParseError::InvalidDay(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which day-in-month table a year uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearType {
    Normal,
    Leap,
}

impl YearType {
    pub const fn of(leap: bool) -> Self {
        if leap { Self::Leap } else { Self::Normal }
    }

    pub const fn days(self) -> i64 {
        match self {
            Self::Normal => DAYS_IN_NORMAL_YEAR,
            Self::Leap => DAYS_IN_LEAP_YEAR,
        }
    }

    /// The canonical (January-start) day-in-month table.
    pub const fn canonical_days_in_month(self) -> [u8; 13] {
        match self {
            Self::Normal => DAYS_IN_MONTH,
            Self::Leap => DAYS_IN_MONTH_LEAP,
        }
    }
}

/// A month slot and day of month, optionally tagged with the year they were
/// resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthDay {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub year:  Option<i64>,
    pub month: u8,
    pub day:   u8,
}

/// How a month or day component is rendered.
///
/// Months: `2`, `Feb`, `February`. Days: `9`, `09`, `9th`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFormat {
    #[default]
    Numeric,
    Abbreviated,
    Full,
}

// Helper functions

pub const fn is_leap_year(year: i64) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

/// Days in a canonical month, `None` for a month outside `1..=12`.
pub const fn days_in_month(year: i64, month: u8) -> Option<u8> {
    if month < JANUARY || month as usize >= DAYS_IN_MONTH.len() {
        return None;
    }
    Some(YearType::of(is_leap_year(year)).canonical_days_in_month()[month as usize])
}

pub(crate) fn ordinal_suffix(day: u8) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_new_valid() {
        for m in 1..=13 {
            assert!(Month::new(m).is_ok(), "Month {m} should be valid");
        }
    }

    #[test]
    fn test_month_new_invalid() {
        assert!(matches!(Month::new(0), Err(ParseError::InvalidMonth(0))));
        assert!(matches!(Month::new(14), Err(ParseError::InvalidMonth(14))));
    }

    #[test]
    fn test_month_serde() {
        let month = Month::new(8).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "8");

        let parsed: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(month, parsed);
        assert!(serde_json::from_str::<Month>("0").is_err());
    }

    #[test]
    fn test_day_new() {
        assert!(Day::new(1).is_ok());
        assert!(Day::new(31).is_ok());
        assert!(matches!(Day::new(0), Err(ParseError::InvalidDay(0))));
        assert!(matches!(Day::new(32), Err(ParseError::InvalidDay(32))));
        assert_eq!(Day::new(15).unwrap().to_string(), "15");
    }

    #[test]
    fn test_is_leap_year_cases() {
        struct TestCase {
            year:        i64,
            is_leap:     bool,
            description: &'static str,
        }

        let cases = [
            TestCase {
                year:        2024,
                is_leap:     true,
                description: "divisible by 4",
            },
            TestCase {
                year:        2023,
                is_leap:     false,
                description: "not divisible by 4",
            },
            TestCase {
                year:        1900,
                is_leap:     false,
                description: "century not divisible by 400",
            },
            TestCase {
                year:        2000,
                is_leap:     true,
                description: "divisible by 400",
            },
            TestCase {
                year:        0,
                is_leap:     true,
                description: "year zero (1 BC)",
            },
            TestCase {
                year:        -4,
                is_leap:     true,
                description: "negative divisible by 4",
            },
            TestCase {
                year:        -100,
                is_leap:     false,
                description: "negative century",
            },
        ];

        for case in &cases {
            assert_eq!(
                is_leap_year(case.year),
                case.is_leap,
                "Year {} ({})",
                case.year,
                case.description
            );
        }
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 0), None);
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn test_year_type() {
        assert_eq!(YearType::of(true), YearType::Leap);
        assert_eq!(YearType::Normal.days(), 365);
        assert_eq!(YearType::Leap.days(), 366);
    }

    #[test]
    fn test_ordinal_suffix() {
        let expected = [(1, "st"), (2, "nd"), (3, "rd"), (4, "th"), (11, "th"), (12, "th"), (21, "st"), (23, "rd")];
        for (day, suffix) in expected {
            assert_eq!(ordinal_suffix(day), suffix, "day {day}");
        }
    }
}
