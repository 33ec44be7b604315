//! Named eras and their conversion to and from canonical years.
//!
//! Canonical years run continuously through zero: canonical year 0 is
//! 1 BC, canonical year -43 is 44 BC.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An era: a classification of canonical years plus a 1-based count within it.
#[derive(Debug, Clone, Copy)]
pub struct CalendarEra {
    pub name:          &'static str,
    pub abbreviation:  &'static str,
    pub numeric_value: i64,
    pub is_era_year:   fn(i64) -> bool,
    pub to_era_year:   fn(i64) -> i64,
    pub from_era_year: fn(i64) -> i64,
}

const fn before_epoch(year: i64) -> bool {
    year < 1
}

const fn from_epoch(year: i64) -> bool {
    year > 0
}

const fn mirrored(year: i64) -> i64 {
    1_i64.saturating_sub(year)
}

const fn identity(year: i64) -> i64 {
    year
}

pub const BC: CalendarEra = CalendarEra {
    name:          "Before Christ",
    abbreviation:  "BC",
    numeric_value: 0,
    is_era_year:   before_epoch,
    to_era_year:   mirrored,
    from_era_year: mirrored,
};

pub const AD: CalendarEra = CalendarEra {
    name:          "Anno Domini",
    abbreviation:  "AD",
    numeric_value: 1,
    is_era_year:   from_epoch,
    to_era_year:   identity,
    from_era_year: identity,
};

pub const BCE: CalendarEra = CalendarEra {
    name: "Before Common Era",
    abbreviation: "BCE",
    ..BC
};

pub const CE: CalendarEra = CalendarEra {
    name: "Common Era",
    abbreviation: "CE",
    ..AD
};

const ALL_ERAS: [CalendarEra; 4] = [BC, AD, BCE, CE];

impl CalendarEra {
    pub fn is_era_year(&self, canonical_year: i64) -> bool {
        (self.is_era_year)(canonical_year)
    }

    pub fn to_era_year(&self, canonical_year: i64) -> i64 {
        (self.to_era_year)(canonical_year)
    }

    pub fn from_era_year(&self, era_year: i64) -> i64 {
        (self.from_era_year)(era_year)
    }

    /// Looks an era up by abbreviation, ignoring case and dots (`b.c.`).
    pub fn by_abbreviation(abbreviation: &str) -> Option<Self> {
        let normalized: String = abbreviation
            .chars()
            .filter(|c| *c != '.')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        ALL_ERAS.into_iter().find(|era| era.abbreviation == normalized)
    }
}

// BC and BCE are the same era under different names.
impl PartialEq for CalendarEra {
    fn eq(&self, other: &Self) -> bool {
        self.numeric_value == other.numeric_value
    }
}

impl Eq for CalendarEra {}

impl fmt::Display for CalendarEra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation)
    }
}

/// Which pair of era names a calendar prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EraStyle {
    /// BC / AD
    #[default]
    Christian,
    /// BCE / CE
    Common,
}

impl EraStyle {
    /// The eras of this style, earliest first.
    pub const fn eras(self) -> [CalendarEra; 2] {
        match self {
            Self::Christian => [BC, AD],
            Self::Common => [BCE, CE],
        }
    }

    pub fn era_for_year(self, canonical_year: i64) -> CalendarEra {
        let [before, after] = self.eras();
        if before.is_era_year(canonical_year) { before } else { after }
    }

    pub fn era_by_value(self, numeric_value: i64) -> Option<CalendarEra> {
        self.eras().into_iter().find(|era| era.numeric_value == numeric_value)
    }
}
