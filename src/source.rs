//! Turning the shapes callers hold into validated field maps.

use std::{cmp::Ordering, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Comparator, ComparisonResult, ParseError,
    error::{Error, Result},
    field::{DateField, DateFieldMap, FieldLookup},
    gregorian::{FormatOptions, GregorianCalendar, canonical_epoch_day, civil_from_epoch_day},
    parse_components,
};

/// A canonical (January-start) calendar date that knows nothing of eras or
/// shifted years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlainDate {
    year:  i64,
    month: u8,
    day:   u8,
}

impl PlainDate {
    /// # Errors
    /// `Error::Range` if the date does not exist.
    pub fn new(year: i64, month: u8, day: u8) -> Result<Self> {
        canonical_epoch_day(year, month, day)
            .map(|_| Self { year, month, day })
            .ok_or_else(|| Error::range(format!("{year}-{month:02}-{day:02} does not exist")))
    }

    /// # Errors
    /// `Error::Range` outside `MIN_EPOCH_DAY..=MAX_EPOCH_DAY`.
    pub fn from_epoch_day(epoch_day: i64) -> Result<Self> {
        civil_from_epoch_day(epoch_day)
            .map(|(year, month, day)| Self { year, month, day })
            .ok_or_else(|| Error::range(format!("epoch day {epoch_day} is outside the supported years")))
    }

    pub const fn year(self) -> i64 {
        self.year
    }

    pub const fn month(self) -> u8 {
        self.month
    }

    pub const fn day(self) -> u8 {
        self.day
    }

    pub fn epoch_day(self) -> i64 {
        // existence was checked on construction
        canonical_epoch_day(self.year, self.month, self.day).unwrap_or_default()
    }
}

/// Everything [`create_date_map`] accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum DateSource {
    /// `(year, month, day)` in the calendar's own year.
    Tuple(i64, u8, u8),
    Plain(PlainDate),
    /// A year with optional month and day.
    Record {
        year:  i64,
        month: Option<u8>,
        day:   Option<u8>,
    },
    Fields(DateFieldMap),
    /// `year`, `year.month` or `year.month.day`, optionally followed by an
    /// era abbreviation.
    Text(String),
    /// An array, record, field map, string or bare year in JSON.
    Json(Value),
}

impl From<PlainDate> for DateSource {
    fn from(date: PlainDate) -> Self {
        Self::Plain(date)
    }
}

impl From<DateFieldMap> for DateSource {
    fn from(fields: DateFieldMap) -> Self {
        Self::Fields(fields)
    }
}

impl From<(i64, u8, u8)> for DateSource {
    fn from((year, month, day): (i64, u8, u8)) -> Self {
        Self::Tuple(year, month, day)
    }
}

impl From<&str> for DateSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Value> for DateSource {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

fn record(year: i64, month: Option<u8>, day: Option<u8>) -> Result<DateFieldMap> {
    let mut fields = DateFieldMap::from([(DateField::Year, year)]);
    match (month, day) {
        (Some(month), day) => {
            fields = fields.with(DateField::MonthOfYear, i64::from(month));
            if let Some(day) = day {
                fields = fields.with(DateField::DayOfMonth, i64::from(day));
            }
        },
        (None, Some(day)) => {
            return Err(Error::type_error(format!("day {day} given without a month")));
        },
        (None, None) => {},
    }
    Ok(fields)
}

fn parsed_text(text: &str) -> Result<DateFieldMap> {
    let (year, month, day) = parse_components(text).map_err(|err| match err {
        ParseError::EmptyInput | ParseError::InvalidFormat(_) | ParseError::UnknownEra(_) => {
            Error::Syntax(err.to_string())
        },
        range => Error::Parse(range),
    })?;
    record(year, month, day)
}

fn json_integer<T: TryFrom<i64>>(value: &Value, what: &str) -> Result<T> {
    value
        .as_i64()
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| Error::type_error(format!("{what} must be an integer, got {value}")))
}

fn json_optional<T: TryFrom<i64>>(value: Option<&Value>, what: &str) -> Result<Option<T>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => json_integer(value, what).map(Some),
    }
}

fn json_fields(value: &Value) -> Result<DateFieldMap> {
    match value {
        Value::Array(items) => match items.as_slice() {
            [year] => record(json_integer(year, "year")?, None, None),
            [year, month] => record(json_integer(year, "year")?, Some(json_integer(month, "month")?), None),
            [year, month, day] => record(
                json_integer(year, "year")?,
                Some(json_integer(month, "month")?),
                Some(json_integer(day, "day")?),
            ),
            _ => Err(Error::type_error(format!("expected 1 to 3 date components, got {}", items.len()))),
        },
        Value::Object(object) if object.contains_key("year") => {
            if let Some(key) = object.keys().find(|key| !matches!(key.as_str(), "year" | "month" | "day")) {
                return Err(Error::type_error(format!("unexpected date record key {key:?}")));
            }
            record(
                json_integer(&object["year"], "year")?,
                json_optional(object.get("month"), "month")?,
                json_optional(object.get("day"), "day")?,
            )
        },
        Value::Object(object) => object
            .iter()
            .map(|(key, value)| -> Result<(DateField, i64)> { Ok((key.parse()?, json_integer(value, key)?)) })
            .collect(),
        Value::String(text) => parsed_text(text),
        Value::Number(_) => record(json_integer(value, "year")?, None, None),
        Value::Null | Value::Bool(_) => Err(Error::type_error(format!("{value} is not a date"))),
    }
}

/// Builds the field map of `source` and checks that `calendar` accepts it.
///
/// # Errors
/// `Error::Type` for a source of unrecognized shape, `Error::Syntax` for
/// malformed text, `Error::Range` (or a range-kind `Error::Parse`) for a date
/// that does not exist.
pub fn create_date_map(source: DateSource, calendar: &GregorianCalendar) -> Result<DateFieldMap> {
    let fields = match source {
        DateSource::Tuple(year, month, day) => record(year, Some(month), Some(day))?,
        DateSource::Plain(date) => {
            let all = calendar.fields_of_epoch_day(date.epoch_day())?;
            [DateField::Year, DateField::MonthOfYear, DateField::DayOfMonth]
                .into_iter()
                .filter_map(|field| all.get(field).map(|value| (field, value)))
                .collect()
        },
        DateSource::Record { year, month, day } => record(year, month, day)?,
        DateSource::Fields(fields) => fields,
        DateSource::Text(text) => parsed_text(&text)?,
        DateSource::Json(value) => json_fields(&value)?,
    };
    if fields.is_empty() {
        return Err(Error::type_error("a date needs at least one field"));
    }
    if !calendar.valid_date(&fields)? {
        return Err(Error::range(format!("{fields} is not a valid date")));
    }
    Ok(fields)
}

/// A field map bound to the calendar that interprets it.
#[derive(Debug, Clone)]
pub struct CalendarDate {
    fields:   DateFieldMap,
    calendar: Arc<GregorianCalendar>,
}

impl PartialEq for CalendarDate {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields && self.calendar.config() == other.calendar.config()
    }
}

impl CalendarDate {
    /// # Errors
    /// See [`create_date_map`].
    pub fn new(source: impl Into<DateSource>, calendar: Arc<GregorianCalendar>) -> Result<Self> {
        let fields = create_date_map(source.into(), &calendar)?;
        Ok(Self { fields, calendar })
    }

    pub const fn fields(&self) -> &DateFieldMap {
        &self.fields
    }

    pub fn calendar(&self) -> &GregorianCalendar {
        &self.calendar
    }

    /// # Errors
    /// See [`GregorianCalendar::get_field_value`].
    pub fn get(&self, field: DateField) -> Result<FieldLookup> {
        self.calendar.get_field_value(field, &self.fields)
    }

    /// `None` for a date less precise than a day.
    ///
    /// # Errors
    /// See [`GregorianCalendar::get_field_value`].
    pub fn epoch_day(&self) -> Result<Option<i64>> {
        self.calendar.get_epoch_day(&self.fields)
    }

    /// # Errors
    /// See [`GregorianCalendar::format_date_map`].
    pub fn format(&self, options: FormatOptions) -> Result<String> {
        self.calendar.format_date_map(&self.fields, options)
    }

    /// Orders dates by epoch day. Dates without a day are `Undefined`
    /// against everything.
    pub fn by_epoch_day() -> Comparator<Self> {
        Comparator::new("epoch_day", |a: &Self, b: &Self| match (a.epoch_day(), b.epoch_day()) {
            (Ok(Some(a)), Ok(Some(b))) => ComparisonResult::from_ordering(a.cmp(&b)),
            (Err(_), _) | (_, Err(_)) => ComparisonResult::Erroneous,
            _ => ComparisonResult::Undefined,
        })
    }

    /// Whether `self` falls on an earlier day than `other`.
    pub fn is_before(&self, other: &Self) -> Option<bool> {
        Self::by_epoch_day()
            .compare(self, other)
            .ordering()
            .map(|ordering| ordering == Ordering::Less)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{CalendarConfig, StartOfYear, compare::Outcome};

    fn fields<const N: usize>(fields: [(DateField, i64); N]) -> DateFieldMap {
        DateFieldMap::from(fields)
    }

    #[test]
    fn test_plain_date() {
        assert!(PlainDate::new(2024, 2, 29).is_ok());
        assert!(matches!(PlainDate::new(2023, 2, 29), Err(Error::Range(_))));
        let date = PlainDate::from_epoch_day(8826).unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 1));
        assert_eq!(date.epoch_day(), 8826);
        assert!(matches!(PlainDate::from_epoch_day(i64::MAX), Err(Error::Range(_))));
        assert!(matches!(PlainDate::new(i64::MIN, 1, 1), Err(Error::Range(_))));
    }

    #[test]
    fn test_sources_agree() {
        let calendar = GregorianCalendar::new();
        let expected = fields([
            (DateField::Year, 2024),
            (DateField::MonthOfYear, 2),
            (DateField::DayOfMonth, 29),
        ]);
        let sources = [
            DateSource::Tuple(2024, 2, 29),
            DateSource::Plain(PlainDate::new(2024, 2, 29).unwrap()),
            DateSource::Record {
                year:  2024,
                month: Some(2),
                day:   Some(29),
            },
            DateSource::Fields(expected.clone()),
            DateSource::Text("2024.2.29".to_owned()),
            DateSource::Json(json!([2024, 2, 29])),
            DateSource::Json(json!({"year": 2024, "month": 2, "day": 29})),
            DateSource::Json(json!({"Year": 2024, "MonthOfYear": 2, "DayOfMonth": 29})),
            DateSource::Json(json!("2024.02.29")),
        ];
        for source in sources {
            let description = format!("{source:?}");
            assert_eq!(create_date_map(source, &calendar).unwrap(), expected, "{description}");
        }
    }

    #[test]
    fn test_partial_sources() {
        let calendar = GregorianCalendar::new();
        assert_eq!(
            create_date_map(DateSource::Json(json!(1991)), &calendar).unwrap(),
            fields([(DateField::Year, 1991)])
        );
        assert_eq!(
            create_date_map(
                DateSource::Record {
                    year:  1991,
                    month: Some(8),
                    day:   None,
                },
                &calendar
            )
            .unwrap(),
            fields([(DateField::Year, 1991), (DateField::MonthOfYear, 8)])
        );
        assert_eq!(
            create_date_map("44 BC".into(), &calendar).unwrap(),
            fields([(DateField::Year, -43)])
        );
    }

    #[test]
    fn test_invalid_dates_are_range_errors() {
        let calendar = GregorianCalendar::new();
        let invalid = [
            DateSource::Tuple(2023, 2, 29),
            DateSource::Json(json!({"year": 2023, "month": 4, "day": 31})),
            DateSource::Fields(fields([(DateField::Year, 2023), (DateField::DayOfYear, 366)])),
        ];
        for source in invalid {
            let err = create_date_map(source, &calendar).unwrap_err();
            assert!(err.is_range(), "{err}");
        }
        assert!(create_date_map("2023.14".into(), &calendar).unwrap_err().is_range());
    }

    #[test]
    fn test_impossible_dates_without_year() {
        let calendar = GregorianCalendar::new();
        let invalid = [
            fields([(DateField::MonthOfYear, 2), (DateField::DayOfMonth, 31)]),
            fields([(DateField::MonthOfYear, 13)]),
            fields([(DateField::DayOfMonth, 12)]),
        ];
        for map in invalid {
            let description = map.to_string();
            assert!(create_date_map(map.into(), &calendar).unwrap_err().is_range(), "{description}");
        }
        let leap_day = fields([(DateField::MonthOfYear, 2), (DateField::DayOfMonth, 29)]);
        assert_eq!(create_date_map(leap_day.clone().into(), &calendar).unwrap(), leap_day);
    }

    #[test]
    fn test_extreme_years_are_range_errors() {
        let calendar = GregorianCalendar::new();
        let extremes = [
            DateSource::Text("-9223372036854775808".to_owned()),
            DateSource::Text("9223372036854775807 BC".to_owned()),
            DateSource::Fields(fields([(DateField::Year, i64::MIN)])),
            DateSource::Fields(fields([(DateField::EpochDay, i64::MAX)])),
            DateSource::Tuple(i64::MAX, 1, 1),
            DateSource::Json(json!([i64::MIN, 12, 31])),
        ];
        for source in extremes {
            let description = format!("{source:?}");
            assert!(create_date_map(source, &calendar).unwrap_err().is_range(), "{description}");
        }
    }

    #[test]
    fn test_unrecognized_shapes_are_type_errors() {
        let calendar = GregorianCalendar::new();
        let shapes = [
            json!(true),
            json!(null),
            json!([]),
            json!([2024, 1, 2, 3]),
            json!({"year": "2024"}),
            json!({"year": 2024, "hour": 3}),
            json!({"Fortnight": 2}),
            json!({}),
        ];
        for shape in shapes {
            let description = shape.to_string();
            assert!(
                matches!(create_date_map(DateSource::Json(shape), &calendar), Err(Error::Type(_))),
                "{description}"
            );
        }
        assert!(matches!(
            create_date_map(
                DateSource::Record {
                    year:  2024,
                    month: None,
                    day:   Some(3),
                },
                &calendar
            ),
            Err(Error::Type(_))
        ));
    }

    #[test]
    fn test_malformed_text_is_syntax_error() {
        let calendar = GregorianCalendar::new();
        for text in ["", "2024.x", "2024.1.2.3", "44 XY"] {
            assert!(
                matches!(create_date_map(text.into(), &calendar), Err(Error::Syntax(_))),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_plain_date_in_shifted_calendar() {
        let config = CalendarConfig::default().with_start_of_year(StartOfYear::new(3, 25).unwrap());
        let calendar = GregorianCalendar::with_config(config);
        let map = create_date_map(PlainDate::new(2024, 1, 1).unwrap().into(), &calendar).unwrap();
        assert_eq!(
            map,
            fields([
                (DateField::Year, 2023),
                (DateField::MonthOfYear, 11),
                (DateField::DayOfMonth, 1),
            ])
        );
    }

    #[test]
    fn test_calendar_dates() {
        let calendar = GregorianCalendar::shared(CalendarConfig::default());
        let leap_day = CalendarDate::new((2024, 2, 29), Arc::clone(&calendar)).unwrap();
        let next = CalendarDate::new(PlainDate::new(2024, 3, 1).unwrap(), Arc::clone(&calendar)).unwrap();
        let year = CalendarDate::new(DateSource::Json(json!(2024)), Arc::clone(&calendar)).unwrap();

        assert_eq!(leap_day.epoch_day().unwrap(), Some(8825));
        assert_eq!(leap_day.get(DateField::DayOfYear).unwrap(), FieldLookup::Found(60));
        assert_eq!(leap_day.format(FormatOptions::default()).unwrap(), "2024.2.29");
        assert_eq!(year.epoch_day().unwrap(), None);

        let cmp = CalendarDate::by_epoch_day();
        assert_eq!(cmp.compare(&leap_day, &next), ComparisonResult::Less);
        assert_eq!(cmp.compare(&leap_day, &year), ComparisonResult::Undefined);
        assert_eq!(leap_day.is_before(&next), Some(true));
        assert_eq!(next.is_before(&year), None);

        let mut dates = vec![next.clone(), leap_day.clone()];
        assert_eq!(cmp.sort(&mut dates), Outcome::Defined(()));
        assert_eq!(dates, vec![leap_day, next]);
    }
}
