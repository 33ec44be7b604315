mod boundary;
mod boundary_set;
mod compare;
mod config;
mod consts;
mod era;
mod error;
mod field;
mod gregorian;
mod ids;
mod prelude;
mod source;
mod types;

pub use boundary::{Boundary, BoundaryValue, Difference, Union, comparison_comparator};
pub use boundary_set::{BoundarySet, binary_search_by, encode_search_index};
pub use compare::{Comparator, ComparisonResult, Nullable, Outcome};
pub use config::{CalendarConfig, StartOfYear};
pub use consts::*;
pub use era::{AD, BC, BCE, CE, CalendarEra, EraStyle};
pub use error::{Error, Result};
pub use field::{
    DateField, DateFieldMap, DerivationRegistry, FieldDefinition, FieldDerivation, FieldLookup, get_some_field,
    get_some_fields, has_every_field, has_some_field,
};
pub use gregorian::{
    DayOfYearQuery, EraDisplay, FormatOptions, GregorianCalendar, MAX_EPOCH_DAY, MIN_EPOCH_DAY, canonical_day_of_year,
    canonical_epoch_day, civil_from_epoch_day,
};
pub use ids::IdGenerator;
pub use source::{CalendarDate, DateSource, PlainDate, create_date_map};
pub use types::{Day, FieldFormat, Month, MonthDay, YearType, days_in_month, is_leap_year};

use crate::prelude::*;
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::str::FromStr;

/// A canonical Gregorian date known to year, month or day precision.
///
/// Only the known components are stored; a `Month` value stands for every
/// day of that month. Years run continuously through zero (`0` is 1 BC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DateValue {
    /// Full date with day, month, and year
    #[display(fmt = "{year}.{month}.{day}")]
    Day {
        year:  i64,
        month: types::Month,
        day:   types::Day,
    },
    /// Month and year only
    #[display(fmt = "{year}.{month}")]
    Month { year: i64, month: types::Month },
    /// Year only
    #[display(fmt = "{year}")]
    Year { year: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Year out of range: {_0}")]
    InvalidYear(i64),
    #[display(fmt = "Invalid month: {_0}")]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day: {_0}")]
    InvalidDay(u8),
    #[display(fmt = "Unknown era: {_0}")]
    UnknownEra(String),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl ParseError {
    /// True when the text was well formed but named a year, month or day
    /// that does not exist.
    pub const fn is_range(&self) -> bool {
        matches!(self, Self::InvalidYear(_) | Self::InvalidMonth(_) | Self::InvalidDay(_))
    }
}

fn parse_i64(s: &str) -> Result<i64, ParseError> {
    s.parse::<i64>()
        .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

fn parse_u8(s: &str) -> Result<u8, ParseError> {
    s.parse::<u8>()
        .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

/// Splits `year[.month[.day]] [era]` into a canonical year and the raw
/// month slot and day. Only the shape is checked here: months up to 13 and
/// days up to 31 pass, whether or not the calendar has them.
pub(crate) fn parse_components(s: &str) -> Result<(i64, Option<u8>, Option<u8>), ParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let (date, era) = match trimmed.rsplit_once(char::is_whitespace) {
        Some((date, suffix)) if suffix.chars().any(char::is_alphabetic) => {
            let era = CalendarEra::by_abbreviation(suffix).ok_or_else(|| ParseError::UnknownEra(suffix.to_owned()))?;
            (date.trim(), Some(era))
        },
        _ => (trimmed, None),
    };

    let parts: Vec<&str> = date.split(DATE_SEPARATOR).map(str::trim).collect();
    let (year, month, day) = match parts.as_slice() {
        [year] => (*year, None, None),
        [year, month] => (*year, Some(*month), None),
        [year, month, day] => (*year, Some(*month), Some(*day)),
        _ => {
            return Err(ParseError::InvalidFormat(format!(
                "Too many {} separators: expected 0-2, found {}",
                DATE_SEPARATOR,
                parts.len() - 1
            )));
        },
    };

    let year = parse_i64(year)?;
    let year = match era {
        Some(era) if year >= 1 => era.from_era_year(year),
        Some(era) => {
            return Err(ParseError::InvalidFormat(format!("{year} {era} (era years start at 1)")));
        },
        None => year,
    };
    let year = DateValue::validate_year(year)?;
    let month = month
        .map(|m| parse_u8(m).and_then(types::Month::new))
        .transpose()?
        .map(types::Month::get);
    let day = day
        .map(|d| parse_u8(d).and_then(types::Day::new))
        .transpose()?
        .map(types::Day::get);
    Ok((year, month, day))
}

impl DateValue {
    /// # Errors
    /// `ParseError::InvalidYear` outside `MIN_YEAR..=MAX_YEAR`.
    pub fn new_year(year: i64) -> Result<Self, ParseError> {
        Ok(Self::Year {
            year: Self::validate_year(year)?,
        })
    }

    /// # Errors
    /// `ParseError::InvalidYear` as for [`DateValue::new_year`],
    /// `ParseError::InvalidMonth` unless `month` is 1-12.
    pub fn new_month(year: i64, month: u8) -> Result<Self, ParseError> {
        Ok(Self::Month {
            year:  Self::validate_year(year)?,
            month: Self::validate_month(month)?,
        })
    }

    /// # Errors
    /// `ParseError::InvalidYear`, `ParseError::InvalidMonth` or
    /// `ParseError::InvalidDay` for a date that does not exist.
    pub fn new_day(year: i64, month: u8, day: u8) -> Result<Self, ParseError> {
        Ok(Self::Day {
            year:  Self::validate_year(year)?,
            month: Self::validate_month(month)?,
            day:   Self::validate_day(year, month, day)?,
        })
    }

    const fn validate_year(year: i64) -> Result<i64, ParseError> {
        if MIN_YEAR <= year && year <= MAX_YEAR {
            Ok(year)
        } else {
            Err(ParseError::InvalidYear(year))
        }
    }

    fn validate_month(month: u8) -> Result<types::Month, ParseError> {
        if month > MONTHS_PER_YEAR {
            return Err(ParseError::InvalidMonth(month));
        }
        types::Month::new(month)
    }

    fn validate_day(year: i64, month: u8, day: u8) -> Result<types::Day, ParseError> {
        match days_in_month(year, month) {
            Some(length) if day <= length => types::Day::new(day),
            _ => Err(ParseError::InvalidDay(day)),
        }
    }

    /// Returns the year component (always present)
    pub const fn year(&self) -> i64 {
        match *self {
            Self::Day { year, .. } | Self::Month { year, .. } | Self::Year { year } => year,
        }
    }

    /// Returns the month component if present (as u8 for convenience)
    pub const fn month(&self) -> Option<u8> {
        match self {
            Self::Day { month, .. } | Self::Month { month, .. } => Some(month.get()),
            Self::Year { .. } => None,
        }
    }

    /// Returns the day component if present (as u8 for convenience)
    pub const fn day(&self) -> Option<u8> {
        match self {
            Self::Day { day, .. } => Some(day.get()),
            Self::Month { .. } | Self::Year { .. } => None,
        }
    }

    /// `(year, month, day)` with the unknown components left out.
    pub const fn to_parts(&self) -> (i64, Option<u8>, Option<u8>) {
        (self.year(), self.month(), self.day())
    }

    /// # Errors
    /// As for the constructors, plus `ParseError::InvalidFormat` for a day
    /// without a month.
    pub fn from_parts(year: i64, month: Option<u8>, day: Option<u8>) -> Result<Self, ParseError> {
        match (month, day) {
            (Some(m), Some(d)) => Self::new_day(year, m, d),
            (Some(m), None) => Self::new_month(year, m),
            (None, None) => Self::new_year(year),
            (None, Some(d)) => Err(ParseError::InvalidFormat(format!("Cannot have day {d} without month"))),
        }
    }

    /// Earliest concrete (year, month, day) represented by this value.
    pub const fn lower_bound(&self) -> (i64, u8, u8) {
        match *self {
            Self::Day { year, month, day } => (year, month.get(), day.get()),
            Self::Month { year, month } => (year, month.get(), MIN_DAY),
            Self::Year { year } => (year, JANUARY, MIN_DAY),
        }
    }

    /// Latest concrete (year, month, day) represented by this value (inclusive).
    pub fn upper_bound_inclusive(&self) -> (i64, u8, u8) {
        match *self {
            Self::Day { year, month, day } => (year, month.get(), day.get()),
            Self::Month { year, month } => (
                year,
                month.get(),
                days_in_month(year, month.get()).unwrap_or(MAX_DAY),
            ),
            Self::Year { year } => (year, DECEMBER, DAYS_IN_MONTH[DECEMBER as usize]),
        }
    }

    /// Every epoch day this value covers.
    pub fn epoch_days(&self) -> Boundary<i64> {
        let epoch_day = |(year, month, day): (i64, u8, u8)| canonical_epoch_day(year, month, day);
        Boundary::from_edges(
            epoch_day(self.lower_bound()),
            epoch_day(self.upper_bound_inclusive()),
            None,
        )
    }

    /// The known components as `Year`, `MonthOfYear` and `DayOfMonth`.
    pub fn to_field_map(&self) -> DateFieldMap {
        let (year, month, day) = self.to_parts();
        [
            Some((DateField::Year, year)),
            month.map(|m| (DateField::MonthOfYear, i64::from(m))),
            day.map(|d| (DateField::DayOfMonth, i64::from(d))),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Reads `Year` (or `CanonicalYear`) and the optional month and day.
    ///
    /// # Errors
    /// `Error::MissingField` without a year, `Error::Parse` for components
    /// outside their range.
    pub fn from_field_map(map: &DateFieldMap) -> Result<Self> {
        let (_, year) = get_some_field(map, &[DateField::Year, DateField::CanonicalYear])
            .ok_or(Error::MissingField(DateField::Year))?;
        // out-of-range values saturate so the constructors report them
        let component = |field: DateField| map.get(field).map(|value| u8::try_from(value.max(0)).unwrap_or(u8::MAX));
        Ok(Self::from_parts(
            year,
            component(DateField::MonthOfYear),
            component(DateField::DayOfMonth),
        )?)
    }

    /// Formats through `calendar`, honouring its era names.
    ///
    /// # Errors
    /// See [`GregorianCalendar::format_date_map`].
    pub fn format(&self, calendar: &GregorianCalendar, options: FormatOptions) -> Result<String> {
        calendar.format_date_map(&self.to_field_map(), options)
    }

    /// Rank used for ordering ties on the same `lower_bound`:
    /// less precise comes first: Year < Month < Day.
    #[inline]
    const fn precision_rank(&self) -> u8 {
        match *self {
            Self::Year { .. } => 0,
            Self::Month { .. } => 1,
            Self::Day { .. } => 2,
        }
    }
}

impl FromStr for DateValue {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month, day) = parse_components(s)?;
        Self::from_parts(year, month, day)
    }
}

impl PartialOrd for DateValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lower_bound()
            .cmp(&other.lower_bound())
            .then_with(|| self.precision_rank().cmp(&other.precision_rank()))
    }
}

impl TryFrom<(i64, Option<u8>, Option<u8>)> for DateValue {
    type Error = ParseError;

    fn try_from(value: (i64, Option<u8>, Option<u8>)) -> Result<Self, Self::Error> {
        Self::from_parts(value.0, value.1, value.2)
    }
}

impl From<DateValue> for DateSource {
    fn from(value: DateValue) -> Self {
        Self::Fields(value.to_field_map())
    }
}

impl serde::Serialize for DateValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for DateValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
