//! Proleptic Gregorian calendar with a configurable start of year.
//!
//! Two year axes exist side by side. The *canonical* year starts on
//! 1 January. A calendar's own year (the [`Year`] field) starts on its
//! [`StartOfYear`]: year `N` begins on that month and day of canonical year
//! `N`. With the default start both axes coincide.
//!
//! Month and day-of-month fields are expressed in month *slots* of the
//! calendar's own year. When the year starts on the first of a month the
//! slots are the twelve months rotated. Otherwise the month containing the
//! start is split: its tail becomes slot 1 and its head becomes slot 13.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    boundary::Boundary,
    config::{CalendarConfig, StartOfYear, shared_calendar},
    consts::{
        CENTURY_CYCLE, DATE_SEPARATOR, DAYS_IN_LEAP_YEAR, DAYS_IN_NORMAL_YEAR, DAYS_PER_CYCLE, EPOCH_SHIFT,
        EPOCH_YEAR, FEBRUARY, GREGORIAN_CYCLE, JANUARY, LEAP_YEAR_CYCLE, MAX_DAY, MAX_MONTH_SLOTS, MAX_YEAR, MIN_DAY,
        MIN_YEAR, MONTH_ABBREVIATIONS, MONTH_NAMES, MONTHS_PER_YEAR,
    },
    era::EraStyle,
    error::{Error, Result},
    field::{
        DateField::{self, CanonicalYear, DayOfMonth, DayOfYear, EpochDay, Era, LeapYear, MonthOfYear, Year, YearOfEra},
        DateFieldMap, DerivationRegistry, FieldDefinition, FieldDerivation, FieldLookup,
    },
    types::{FieldFormat, MonthDay, YearType, days_in_month, is_leap_year, ordinal_suffix},
};

const SLOTS: usize = MAX_MONTH_SLOTS as usize + 1;

/// Days from the start of canonical year 0 to the start of `year`, up to a
/// constant that cancels in differences. `year` must lie within
/// `MIN_YEAR..=MAX_YEAR + 1`.
const fn days_before_year(year: i64) -> i64 {
    let previous = year - 1;
    DAYS_IN_NORMAL_YEAR * year + previous.div_euclid(LEAP_YEAR_CYCLE) - previous.div_euclid(CENTURY_CYCLE)
        + previous.div_euclid(GREGORIAN_CYCLE)
}

/// Epoch day of 1 January of [`MIN_YEAR`].
pub const MIN_EPOCH_DAY: i64 = days_before_year(MIN_YEAR) - days_before_year(EPOCH_YEAR);
/// Epoch day of 31 December of [`MAX_YEAR`].
pub const MAX_EPOCH_DAY: i64 = days_before_year(MAX_YEAR + 1) - days_before_year(EPOCH_YEAR) - 1;

const fn year_in_range(year: i64) -> bool {
    MIN_YEAR <= year && year <= MAX_YEAR
}

/// Day of the canonical year for a valid canonical date.
pub fn canonical_day_of_year(year: i64, month: u8, day: u8) -> Option<i64> {
    let length = days_in_month(year, month)?;
    if !(MIN_DAY..=length).contains(&day) {
        return None;
    }
    let before: i64 = (JANUARY..month)
        .filter_map(|m| days_in_month(year, m))
        .map(i64::from)
        .sum();
    Some(before + i64::from(day))
}

/// Days since 2000-01-01 of a valid canonical date. Years outside
/// `MIN_YEAR..=MAX_YEAR` have none.
pub fn canonical_epoch_day(year: i64, month: u8, day: u8) -> Option<i64> {
    if !year_in_range(year) {
        return None;
    }
    let day_of_year = canonical_day_of_year(year, month, day)?;
    Some(days_before_year(year) - days_before_year(EPOCH_YEAR) + day_of_year - 1)
}

/// Canonical `(year, month, day)` of an epoch day, for epoch days within
/// `MIN_EPOCH_DAY..=MAX_EPOCH_DAY`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn civil_from_epoch_day(epoch_day: i64) -> Option<(i64, u8, u8)> {
    if epoch_day < MIN_EPOCH_DAY || epoch_day > MAX_EPOCH_DAY {
        return None;
    }
    // Counted from 0000-03-01 so the leap day ends each cycle.
    let shifted = epoch_day + EPOCH_SHIFT;
    let cycle = shifted.div_euclid(DAYS_PER_CYCLE);
    let day_of_cycle = shifted.rem_euclid(DAYS_PER_CYCLE);
    let year_of_cycle =
        (day_of_cycle - day_of_cycle / 1460 + day_of_cycle / 36_524 - day_of_cycle / (DAYS_PER_CYCLE - 1)) / 365;
    let day_of_year = day_of_cycle - (365 * year_of_cycle + year_of_cycle / 4 - year_of_cycle / 100);
    let month_index = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * month_index + 2) / 5 + 1;
    let month = if month_index < 10 { month_index + 3 } else { month_index - 9 };
    let year = year_of_cycle + cycle * GREGORIAN_CYCLE + if month <= 2 { 1 } else { 0 };
    Some((year, month as u8, day as u8))
}

/// Day-in-month counts and their running totals for one year type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MonthTable {
    days:             [u8; SLOTS],
    last_day_of_year: [i64; SLOTS],
    count:            u8,
}

impl MonthTable {
    fn shifted(year_type: YearType, start: StartOfYear) -> Self {
        let canonical = year_type.canonical_days_in_month();
        let mut days = [0; SLOTS];
        for slot in 1..=MONTHS_PER_YEAR {
            days[slot as usize] = canonical[canonical_month_of_slot(start.month(), slot) as usize];
        }
        let mut count = MONTHS_PER_YEAR;
        if start.day() > MIN_DAY {
            let head = start.day() - MIN_DAY;
            days[1] -= head;
            days[MAX_MONTH_SLOTS as usize] = head;
            count = MAX_MONTH_SLOTS;
        }
        let mut last_day_of_year = [0; SLOTS];
        for slot in 1..=count as usize {
            last_day_of_year[slot] = last_day_of_year[slot - 1] + i64::from(days[slot]);
        }
        Self {
            days,
            last_day_of_year,
            count,
        }
    }

    const fn total(&self) -> i64 {
        self.last_day_of_year[self.count as usize]
    }

    fn days_in(&self, slot: u8) -> Option<u8> {
        (JANUARY..=self.count).contains(&slot).then(|| self.days[slot as usize])
    }

    /// First slot whose running total reaches `day_of_year`.
    fn month_of(&self, day_of_year: i64) -> Option<u8> {
        if day_of_year < 1 || day_of_year > self.total() {
            return None;
        }
        let totals = &self.last_day_of_year[1..=self.count as usize];
        u8::try_from(totals.partition_point(|&last| last < day_of_year) + 1).ok()
    }
}

const fn canonical_month_of_slot(start_month: u8, slot: u8) -> u8 {
    if slot == MAX_MONTH_SLOTS {
        start_month
    } else {
        (start_month - 1 + slot - 1) % MONTHS_PER_YEAR + 1
    }
}

/// The arithmetic of one start of year, shared by the calendar and its
/// derivations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    start:  StartOfYear,
    tables: [MonthTable; 2],
}

impl Frame {
    fn new(start: StartOfYear) -> Self {
        Self {
            start,
            tables: [
                MonthTable::shifted(YearType::Normal, start),
                MonthTable::shifted(YearType::Leap, start),
            ],
        }
    }

    const fn is_shifted(&self) -> bool {
        !self.start.is_canonical()
    }

    /// A year holds the February of canonical year `N` when it starts in
    /// January or February, and that of `N + 1` otherwise.
    const fn is_leap_year(&self, year: i64) -> bool {
        if self.start.month() <= FEBRUARY {
            is_leap_year(year)
        } else {
            is_leap_year(year.saturating_add(1))
        }
    }

    const fn year_type(&self, year: i64) -> YearType {
        YearType::of(self.is_leap_year(year))
    }

    const fn table(&self, year_type: YearType) -> &MonthTable {
        match year_type {
            YearType::Normal => &self.tables[0],
            YearType::Leap => &self.tables[1],
        }
    }

    fn year_start(&self, year: i64) -> Option<i64> {
        if !year_in_range(year) {
            return None;
        }
        let day_of_year: i64 = (JANUARY..self.start.month())
            .map(|month| i64::from(YearType::of(is_leap_year(year)).canonical_days_in_month()[month as usize]))
            .sum::<i64>()
            + i64::from(self.start.day());
        Some(days_before_year(year) - days_before_year(EPOCH_YEAR) + day_of_year - 1)
    }

    fn day_of_year(&self, year: i64, slot: u8, day: u8) -> Option<i64> {
        let table = self.table(self.year_type(year));
        let length = table.days_in(slot)?;
        (MIN_DAY..=length)
            .contains(&day)
            .then(|| table.last_day_of_year[slot as usize - 1] + i64::from(day))
    }

    fn month_day(&self, day_of_year: i64, query: DayOfYearQuery) -> Option<MonthDay> {
        let (year, day_of_year) = match query.year {
            Some(year) if query.lenient => {
                let epoch_day = self.year_start(year)?.checked_add(day_of_year.checked_sub(1)?)?;
                let (year, day_of_year) = self.date_of_epoch_day(epoch_day)?;
                (Some(year), day_of_year)
            },
            year => (year, day_of_year),
        };
        let year_type = year
            .map(|year| self.year_type(year))
            .or(query.year_type)
            .unwrap_or(YearType::Normal);
        let table = self.table(year_type);
        let month = table.month_of(day_of_year)?;
        let day = day_of_year - table.last_day_of_year[month as usize - 1];
        Some(MonthDay {
            year,
            month,
            day: u8::try_from(day).ok()?,
        })
    }

    fn epoch_day(&self, year: i64, day_of_year: i64) -> Option<i64> {
        if !(1..=self.year_type(year).days()).contains(&day_of_year) {
            return None;
        }
        Some(self.year_start(year)? + day_of_year - 1)
    }

    /// Own `(year, day_of_year)` of an epoch day. The days of canonical
    /// `MIN_YEAR` before the start of year have none.
    fn date_of_epoch_day(&self, epoch_day: i64) -> Option<(i64, i64)> {
        let (canonical_year, month, day) = civil_from_epoch_day(epoch_day)?;
        let year = if (month, day) >= (self.start.month(), self.start.day()) {
            canonical_year
        } else {
            canonical_year - 1
        };
        Some((year, epoch_day - self.year_start(year)? + 1))
    }

    const fn canonical_month(&self, slot: u8) -> u8 {
        canonical_month_of_slot(self.start.month(), slot)
    }

    /// Canonical day of month for `day` of slot `slot`.
    const fn canonical_day(&self, slot: u8, day: u8) -> u8 {
        if slot == 1 { day.saturating_add(self.start.day() - MIN_DAY) } else { day }
    }
}

/// Context for [`GregorianCalendar::get_month_day_of_day_of_year`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayOfYearQuery {
    /// Year the day belongs to; decides the year type.
    pub year:      Option<i64>,
    /// Year type used when no year is given. Defaults to a normal year.
    pub year_type: Option<YearType>,
    /// With a year, move out-of-range days into the neighbouring years.
    pub lenient:   bool,
}

impl DayOfYearQuery {
    pub const fn in_year(year: i64) -> Self {
        Self {
            year:      Some(year),
            year_type: None,
            lenient:   false,
        }
    }

    pub const fn of_type(year_type: YearType) -> Self {
        Self {
            year:      None,
            year_type: Some(year_type),
            lenient:   false,
        }
    }

    #[must_use]
    pub const fn lenient(mut self) -> Self {
        self.lenient = true;
        self
    }
}

/// When the year of a formatted date carries an era abbreviation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EraDisplay {
    /// For years before year 1, and for dates given as era and year of era.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub month: FieldFormat,
    pub day:   FieldFormat,
    pub era:   EraDisplay,
}

fn format_day(day: u8, format: FieldFormat) -> String {
    match format {
        FieldFormat::Numeric => day.to_string(),
        FieldFormat::Abbreviated => format!("{day:02}"),
        FieldFormat::Full => format!("{day}{}", ordinal_suffix(day)),
    }
}

fn field_definitions() -> [FieldDefinition; 9] {
    let closed = |lower: i64, upper: i64| Boundary::from_edges(Some(lower), Some(upper), None);
    [
        FieldDefinition::new(Era, closed(0, 1), None),
        FieldDefinition::new(YearOfEra, Boundary::at_least(1), Some(Era)),
        FieldDefinition::new(Year, closed(MIN_YEAR, MAX_YEAR), None),
        FieldDefinition::new(CanonicalYear, closed(MIN_YEAR, MAX_YEAR), None),
        FieldDefinition::new(LeapYear, closed(0, 1), Some(Year)),
        FieldDefinition::new(MonthOfYear, closed(1, i64::from(MAX_MONTH_SLOTS)), Some(Year)),
        FieldDefinition::new(DayOfMonth, closed(1, i64::from(MAX_DAY)), Some(MonthOfYear)),
        FieldDefinition::new(DayOfYear, closed(1, DAYS_IN_LEAP_YEAR), Some(Year)),
        FieldDefinition::new(EpochDay, closed(MIN_EPOCH_DAY, MAX_EPOCH_DAY), None),
    ]
}

/// Derivations in priority order.
fn field_derivations(frame: Frame, era_style: EraStyle) -> Vec<FieldDerivation> {
    let mut derivations = Vec::new();
    if !frame.is_shifted() {
        derivations.push(FieldDerivation::unary(Year, CanonicalYear, Some));
    }
    derivations.extend([
        FieldDerivation::binary(Year, [Era, YearOfEra], move |era, year_of_era| {
            era_style
                .era_by_value(era)
                .filter(|_| year_of_era >= 1)
                .map(|era| era.from_era_year(year_of_era))
        }),
        FieldDerivation::unary(Year, EpochDay, move |epoch_day| {
            frame.date_of_epoch_day(epoch_day).map(|(year, _)| year)
        }),
    ]);
    if !frame.is_shifted() {
        derivations.push(FieldDerivation::unary(CanonicalYear, Year, Some));
    }
    derivations.extend([
        FieldDerivation::unary(CanonicalYear, EpochDay, |epoch_day| {
            civil_from_epoch_day(epoch_day).map(|(year, ..)| year)
        }),
        FieldDerivation::unary(Era, Year, move |year| Some(era_style.era_for_year(year).numeric_value)),
        FieldDerivation::unary(YearOfEra, Year, move |year| Some(era_style.era_for_year(year).to_era_year(year))),
        FieldDerivation::unary(LeapYear, Year, move |year| Some(i64::from(frame.is_leap_year(year)))),
        FieldDerivation::ternary(DayOfYear, [Year, MonthOfYear, DayOfMonth], move |year, month, day| {
            frame.day_of_year(year, u8::try_from(month).ok()?, u8::try_from(day).ok()?)
        }),
        FieldDerivation::unary(DayOfYear, EpochDay, move |epoch_day| {
            frame.date_of_epoch_day(epoch_day).map(|(_, day_of_year)| day_of_year)
        })
        .prohibiting(&[Year]),
        FieldDerivation::binary(DayOfYear, [Year, EpochDay], move |year, epoch_day| {
            let (own_year, day_of_year) = frame.date_of_epoch_day(epoch_day)?;
            (own_year == year).then_some(day_of_year)
        }),
        FieldDerivation::binary(MonthOfYear, [Year, DayOfYear], move |year, day_of_year| {
            frame
                .month_day(day_of_year, DayOfYearQuery::in_year(year))
                .map(|md| i64::from(md.month))
        }),
        FieldDerivation::binary(DayOfMonth, [Year, DayOfYear], move |year, day_of_year| {
            frame
                .month_day(day_of_year, DayOfYearQuery::in_year(year))
                .map(|md| i64::from(md.day))
        }),
        FieldDerivation::binary(EpochDay, [Year, DayOfYear], move |year, day_of_year| {
            frame.epoch_day(year, day_of_year)
        }),
    ]);
    derivations
}

/// A frozen Gregorian calendar for one [`CalendarConfig`].
#[derive(Debug, Clone)]
pub struct GregorianCalendar {
    config:   CalendarConfig,
    frame:    Frame,
    registry: DerivationRegistry,
}

impl Default for GregorianCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl GregorianCalendar {
    /// The January-start calendar with BC/AD eras.
    pub fn new() -> Self {
        Self::with_config(CalendarConfig::default())
    }

    pub fn with_config(config: CalendarConfig) -> Self {
        let frame = Frame::new(config.start_of_year);
        if frame.is_shifted() {
            log::debug!(
                "start of year {} gives {} month slots: {:?}",
                config.start_of_year,
                frame.tables[0].count,
                &frame.tables[0].days[1..=frame.tables[0].count as usize]
            );
        }
        let registry = DerivationRegistry::trusted(field_definitions(), field_derivations(frame, config.era_style));
        Self {
            config,
            frame,
            registry,
        }
    }

    /// The process-wide instance for `config`.
    pub fn shared(config: CalendarConfig) -> Arc<Self> {
        shared_calendar(config)
    }

    pub const fn config(&self) -> &CalendarConfig {
        &self.config
    }

    pub const fn start_of_year(&self) -> StartOfYear {
        self.config.start_of_year
    }

    pub const fn registry(&self) -> &DerivationRegistry {
        &self.registry
    }

    /// Leap status of the calendar's own year.
    pub const fn is_leap_year(&self, year: i64) -> bool {
        self.frame.is_leap_year(year)
    }

    pub const fn year_type(&self, year: i64) -> YearType {
        self.frame.year_type(year)
    }

    /// 12, or 13 when the start of year splits a month.
    pub const fn month_count(&self, year_type: YearType) -> u8 {
        self.frame.table(year_type).count
    }

    pub fn days_in_month(&self, year: i64, month: u8) -> Option<u8> {
        self.frame.table(self.year_type(year)).days_in(month)
    }

    /// Days in slot `month` of `year`, or without a year the most it has
    /// in any year.
    fn longest_month(&self, year: Option<i64>, month: u8) -> Option<u8> {
        match year {
            Some(year) => self.days_in_month(year, month),
            None => [YearType::Normal, YearType::Leap]
                .into_iter()
                .filter_map(|year_type| self.frame.table(year_type).days_in(month))
                .max(),
        }
    }

    pub const fn days_in_year(&self, year: i64) -> i64 {
        self.year_type(year).days()
    }

    /// Name of month slot `month`; slot 13 is named after the split month.
    pub fn month_name(&self, month: u8, format: FieldFormat) -> Option<String> {
        if !(JANUARY..=self.month_count(YearType::Normal)).contains(&month) {
            return None;
        }
        let canonical = self.frame.canonical_month(month) as usize;
        Some(match format {
            FieldFormat::Numeric => month.to_string(),
            FieldFormat::Abbreviated => MONTH_ABBREVIATIONS[canonical].to_owned(),
            FieldFormat::Full => MONTH_NAMES[canonical].to_owned(),
        })
    }

    /// Month slot and day of month of `day_of_year`.
    ///
    /// Days outside the year are `None`, unless the query is lenient and
    /// names a year: the day is then carried into the neighbouring years and
    /// the returned [`MonthDay::year`] is the corrected year.
    ///
    /// ```
    /// use calendar_bounds::{DayOfYearQuery, GregorianCalendar};
    ///
    /// let calendar = GregorianCalendar::new();
    /// let leap = calendar.get_month_day_of_day_of_year(60, DayOfYearQuery::in_year(2024)).unwrap();
    /// assert_eq!((leap.month, leap.day), (2, 29));
    /// let normal = calendar.get_month_day_of_day_of_year(60, DayOfYearQuery::in_year(2023)).unwrap();
    /// assert_eq!((normal.month, normal.day), (3, 1));
    /// ```
    pub fn get_month_day_of_day_of_year(&self, day_of_year: i64, query: DayOfYearQuery) -> Option<MonthDay> {
        self.frame.month_day(day_of_year, query)
    }

    pub fn get_day_of_year(&self, year: i64, month: u8, day: u8) -> Option<i64> {
        self.frame.day_of_year(year, month, day)
    }

    /// Own year, month slot and day of an epoch day.
    pub fn date_of_epoch_day(&self, epoch_day: i64) -> Option<MonthDay> {
        let (year, day_of_year) = self.frame.date_of_epoch_day(epoch_day)?;
        self.frame.month_day(day_of_year, DayOfYearQuery::in_year(year))
    }

    /// Every field of an epoch day, in this calendar's frame.
    ///
    /// # Errors
    /// See [`GregorianCalendar::complete`].
    pub fn fields_of_epoch_day(&self, epoch_day: i64) -> Result<DateFieldMap> {
        self.complete(&DateFieldMap::from([(EpochDay, epoch_day)]))
    }

    /// Looks `field` up, deriving it through as many steps as needed.
    ///
    /// # Errors
    /// Only for a malformed derivation, which the built-in rule set never has.
    pub fn get_field_value(&self, field: DateField, map: &DateFieldMap) -> Result<FieldLookup> {
        match self.registry.get_field_value(field, map)? {
            FieldLookup::NotFound => self.registry.get_field_value(field, &self.complete(map)?),
            lookup => Ok(lookup),
        }
    }

    /// Like [`GregorianCalendar::get_field_value`], but answers in the
    /// canonical frame: January start, slot numbers replaced by months.
    ///
    /// # Errors
    /// See [`GregorianCalendar::get_field_value`].
    pub fn get_canonical_field_value(&self, field: DateField, map: &DateFieldMap) -> Result<FieldLookup> {
        let own = self.get_field_value(field, map)?;
        if !self.frame.is_shifted() || own == FieldLookup::Invalid {
            return Ok(own);
        }
        let completed = self.complete(map)?;
        let canonical = if let Some(epoch_day) = completed.get(EpochDay) {
            self.canonical_fields_of_epoch_day(epoch_day)
        } else if let Some(year) = completed.get(Year) {
            self.canonical_fields_of_year(year)
        } else {
            DateFieldMap::new()
        };
        Ok(canonical.get(field).map_or(FieldLookup::NotFound, FieldLookup::Found))
    }

    fn canonical_fields_of_year(&self, year: i64) -> DateFieldMap {
        let era = self.config.era_style.era_for_year(year);
        DateFieldMap::from([
            (Era, era.numeric_value),
            (YearOfEra, era.to_era_year(year)),
            (Year, year),
            (CanonicalYear, year),
            (LeapYear, i64::from(is_leap_year(year))),
        ])
    }

    fn canonical_fields_of_epoch_day(&self, epoch_day: i64) -> DateFieldMap {
        let Some((year, month, day)) = civil_from_epoch_day(epoch_day) else {
            return DateFieldMap::new();
        };
        let mut fields = self
            .canonical_fields_of_year(year)
            .with(MonthOfYear, i64::from(month))
            .with(DayOfMonth, i64::from(day))
            .with(EpochDay, epoch_day);
        if let Some(day_of_year) = canonical_day_of_year(year, month, day) {
            fields = fields.with(DayOfYear, day_of_year);
        }
        fields
    }

    /// # Errors
    /// See [`GregorianCalendar::get_field_value`].
    pub fn get_epoch_day(&self, map: &DateFieldMap) -> Result<Option<i64>> {
        Ok(self.get_field_value(EpochDay, map)?.value())
    }

    /// `map` with every derivable field filled in. Derivations run until no
    /// new field appears; invalid results are left out.
    ///
    /// # Errors
    /// See [`GregorianCalendar::get_field_value`].
    pub fn complete(&self, map: &DateFieldMap) -> Result<DateFieldMap> {
        let mut completed = map.clone();
        loop {
            let mut changed = false;
            for field in DateField::ALL {
                if completed.has(field) {
                    continue;
                }
                if let FieldLookup::Found(value) = self.registry.get_field_value(field, &completed)? {
                    completed = completed.with(field, value);
                    changed = true;
                }
            }
            if !changed {
                return Ok(completed);
            }
        }
    }

    /// Whether `map` describes a date, or a year or month, that exists and
    /// whose redundant fields agree with each other.
    ///
    /// # Errors
    /// See [`GregorianCalendar::get_field_value`].
    pub fn valid_date(&self, map: &DateFieldMap) -> Result<bool> {
        if map.iter().any(|(field, value)| !self.registry.accepts(*field, *value)) {
            return Ok(false);
        }
        if let Some(month) = map.get(MonthOfYear) {
            let Some(length) = u8::try_from(month)
                .ok()
                .and_then(|month| self.longest_month(map.get(Year), month))
            else {
                log::debug!("{map} names a month this calendar does not have");
                return Ok(false);
            };
            if map.get(DayOfMonth).is_some_and(|day| day > i64::from(length)) {
                log::debug!("{map} names a day past the end of its month");
                return Ok(false);
            }
        }
        let completed = self.complete(map)?;
        if completed.has(DayOfMonth) && !completed.has(MonthOfYear) {
            log::debug!("{map} has a day of month but no month");
            return Ok(false);
        }
        for field in DateField::ALL {
            if self.registry.get_field_value(field, &completed)? == FieldLookup::Invalid {
                log::debug!("{map} has an invalid {field}");
                return Ok(false);
            }
        }
        for (field, value) in map.iter() {
            let derived = self.registry.get_field_value(*field, &completed.without(*field))?;
            if matches!(derived, FieldLookup::Found(derived) if derived != *value) {
                log::debug!("{map} disagrees on {field}: derived {derived:?}");
                return Ok(false);
            }
        }
        if let Some(epoch_day) = completed.get(EpochDay) {
            let expected = self.fields_of_epoch_day(epoch_day)?;
            return Ok(map.iter().all(|(field, value)| expected.get(*field) == Some(*value)));
        }
        Ok(true)
    }

    /// Formats the fields present in `map` (after derivation).
    ///
    /// Numeric months give `year.month.day`, `year.month` or `year`, with an
    /// era abbreviation appended when requested (`44.3.15 BC`). Named months
    /// give `day month year` (`15 March 44 BC`), where the day is the
    /// canonical day of month.
    ///
    /// # Errors
    /// `Error::MissingField` when no year can be derived.
    pub fn format_date_map(&self, map: &DateFieldMap, options: FormatOptions) -> Result<String> {
        let completed = self.complete(map)?;
        let year = completed.get(Year).ok_or(Error::MissingField(Year))?;
        let with_era = match options.era {
            EraDisplay::Always => true,
            EraDisplay::Never => false,
            EraDisplay::Auto => year < 1 || (map.has(YearOfEra) && !map.has(Year)),
        };
        let era = self.config.era_style.era_for_year(year);
        let month = completed.get(MonthOfYear).and_then(|m| u8::try_from(m).ok());
        let day = completed.get(DayOfMonth).and_then(|d| u8::try_from(d).ok());

        let shown_year = if with_era { era.to_era_year(year) } else { year };

        let mut text = match (month, options.month) {
            (None, _) => shown_year.to_string(),
            (Some(month), FieldFormat::Numeric) => {
                let mut text = format!("{shown_year}{DATE_SEPARATOR}{month}");
                if let Some(day) = day {
                    text.push(DATE_SEPARATOR);
                    text.push_str(&format_day(day, options.day));
                }
                text
            },
            (Some(month), format) => {
                let name = self
                    .month_name(month, format)
                    .ok_or_else(|| Error::range(format!("month {month} does not exist")))?;
                match day {
                    Some(day) => format!(
                        "{} {name} {shown_year}",
                        format_day(self.frame.canonical_day(month, day), options.day)
                    ),
                    None => format!("{name} {shown_year}"),
                }
            },
        };
        if with_era {
            text.push(' ');
            text.push_str(era.abbreviation);
        }
        Ok(text)
    }
}
