//! Calendar configuration and the process-wide cache of calendars built from it.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use serde::{Deserialize, Serialize};

use crate::{
    consts::{DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, JANUARY, MIN_DAY, MONTHS_PER_YEAR},
    era::EraStyle,
    error::{Error, Result},
    gregorian::GregorianCalendar,
};

/// Month and day on which the calendar year begins, as a canonical date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawStartOfYear")]
pub struct StartOfYear {
    month: u8,
    day:   u8,
}

#[derive(Deserialize)]
struct RawStartOfYear {
    month: u8,
    day:   u8,
}

impl TryFrom<RawStartOfYear> for StartOfYear {
    type Error = Error;

    fn try_from(raw: RawStartOfYear) -> Result<Self> {
        Self::new(raw.month, raw.day)
    }
}

impl StartOfYear {
    /// 1 January.
    pub const CANONICAL: Self = Self {
        month: JANUARY,
        day:   MIN_DAY,
    };

    /// # Errors
    /// `Error::Range` for a date that does not exist every year, which
    /// includes 29 February.
    pub fn new(month: u8, day: u8) -> Result<Self> {
        if !(JANUARY..=MONTHS_PER_YEAR).contains(&month) {
            return Err(Error::range(format!("start of year month {month} is not 1-12")));
        }
        if month == FEBRUARY && day == FEBRUARY_DAYS_LEAP {
            return Err(Error::range("a year cannot start on 29 February"));
        }
        let last = DAYS_IN_MONTH[month as usize];
        if !(MIN_DAY..=last).contains(&day) {
            return Err(Error::range(format!("start of year day {day} is not 1-{last}")));
        }
        Ok(Self { month, day })
    }

    pub const fn month(self) -> u8 {
        self.month
    }

    pub const fn day(self) -> u8 {
        self.day
    }

    pub const fn is_canonical(self) -> bool {
        self.month == JANUARY && self.day == MIN_DAY
    }
}

impl Default for StartOfYear {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl fmt::Display for StartOfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Everything that distinguishes one Gregorian calendar from another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub start_of_year: StartOfYear,
    pub era_style:     EraStyle,
}

impl CalendarConfig {
    /// # Errors
    /// `Error::Syntax` for malformed JSON, `Error::Range` for an impossible
    /// start of year.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| {
            if err.is_data() {
                Error::range(err.to_string())
            } else {
                Error::Syntax(err.to_string())
            }
        })
    }

    #[must_use]
    pub const fn with_start_of_year(mut self, start_of_year: StartOfYear) -> Self {
        self.start_of_year = start_of_year;
        self
    }

    #[must_use]
    pub const fn with_era_style(mut self, era_style: EraStyle) -> Self {
        self.era_style = era_style;
        self
    }
}

static CALENDARS: OnceLock<Mutex<HashMap<CalendarConfig, Arc<GregorianCalendar>>>> = OnceLock::new();

/// The calendar for `config`, built on first request and shared afterwards.
pub(crate) fn shared_calendar(config: CalendarConfig) -> Arc<GregorianCalendar> {
    let mut calendars = CALENDARS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    Arc::clone(calendars.entry(config).or_insert_with(|| {
        log::debug!("building shared calendar starting {} ({:?})", config.start_of_year, config.era_style);
        Arc::new(GregorianCalendar::with_config(config))
    }))
}
