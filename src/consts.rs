/// Number of months in a canonical (January-start) year
pub const MONTHS_PER_YEAR: u8 = 12;

/// Month slots available to a shifted year: the split month may add a 13th
pub const MAX_MONTH_SLOTS: u8 = 13;

/// Highest day of month in any month
pub const MAX_DAY: u8 = 31;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub(crate) const JANUARY: u8 = 1;
/// Month number for February
pub(crate) const FEBRUARY: u8 = 2;
/// Month number for December
pub(crate) const DECEMBER: u8 = 12;

/// Days in February for leap years
pub(crate) const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Earliest canonical year the calendar arithmetic accepts
pub const MIN_YEAR: i64 = -1_000_000;
/// Latest canonical year the calendar arithmetic accepts
pub const MAX_YEAR: i64 = 1_000_000;

/// Days in a normal year
pub const DAYS_IN_NORMAL_YEAR: i64 = 365;
/// Days in a leap year
pub const DAYS_IN_LEAP_YEAR: i64 = 366;

/// Days in each month of a normal year (index 0 is a sentinel, months are 1-indexed)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // sentinel
    31, // January
    28, // February
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Days in each month of a leap year (index 0 is a sentinel)
pub const DAYS_IN_MONTH_LEAP: [u8; 13] = [0, 31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i64 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i64 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i64 = 400;

/// Canonical year of the epoch-day reference date (2000-01-01 is epoch day 0)
pub const EPOCH_YEAR: i64 = 2000;

/// Days from 0000-03-01 to 2000-01-01, used by the epoch-day inverse
pub(crate) const EPOCH_SHIFT: i64 = 730_425;
/// Days in one full 400-year Gregorian cycle
pub(crate) const DAYS_PER_CYCLE: i64 = 146_097;

/// Separator between date components (`year.month.day`)
pub const DATE_SEPARATOR: char = '.';

/// Full month names, index 0 is a sentinel
pub const MONTH_NAMES: [&str; 13] = [
    "",
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Abbreviated month names, index 0 is a sentinel
pub const MONTH_ABBREVIATIONS: [&str; 13] = [
    "", "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
