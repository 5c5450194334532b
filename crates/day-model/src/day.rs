//! Calendar days and grid coordinates.
//!
//! A [`CalendarDay`] is a plain year-month-day value in the local reference
//! zone. It is never an instant: converting an instant into a day is the job
//! of the density aggregator, which applies the local-noon rule.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Short weekday labels, Monday first (row 0 of the grid).
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Short month labels, January first (month index 0).
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Error returned when a string is not a canonical `YYYY-MM-DD` day.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a calendar day (expected YYYY-MM-DD): {0}")]
pub struct ParseDayError(pub String);

/// A year-month-day value with canonical key format `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    /// Build a day from its parts. Returns `None` for impossible dates.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// January 1st of `year`.
    pub fn first_of_year(year: i32) -> Option<Self> {
        Self::new(year, 1, 1)
    }

    /// December 31st of `year`.
    pub fn last_of_year(year: i32) -> Option<Self> {
        Self::new(year, 12, 31)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month index 0..=11.
    pub fn month0(&self) -> u32 {
        self.0.month0()
    }

    /// Day of month 1..=31.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Weekday row index, Monday = 0 ... Sunday = 6.
    pub fn weekday_index(&self) -> u8 {
        self.0.weekday().num_days_from_monday() as u8
    }

    /// Short weekday label for this day.
    pub fn weekday_label(&self) -> &'static str {
        WEEKDAY_LABELS[self.weekday_index() as usize]
    }

    /// The following day, if representable.
    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// The preceding day, if representable.
    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// Canonical `YYYY-MM-DD` key.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDay {
    type Err = ParseDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Reject forms chrono tolerates but the canonical key does not.
        if trimmed.len() != 10 {
            return Err(ParseDayError(s.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| ParseDayError(s.to_string()))
    }
}

impl Serialize for CalendarDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Position of a day in a year grid: column `week`, row `weekday`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCoordinate {
    /// Column index, 0 = the week containing January 1st.
    pub week: u32,
    /// Row index, 0 = Monday ... 6 = Sunday.
    pub weekday: u8,
}

impl GridCoordinate {
    pub fn new(week: u32, weekday: u8) -> Self {
        Self { week, weekday }
    }

    /// Short weekday label for this row.
    ///
    /// Rows outside `0..7` never come out of the indexer; they are mapped
    /// onto the label table modulo 7 rather than panicking.
    pub fn weekday_label(&self) -> &'static str {
        WEEKDAY_LABELS[(self.weekday % 7) as usize]
    }
}

/// Month label for a 0-based month index, or `None` if out of range.
pub fn month_label(month0: u32) -> Option<&'static str> {
    MONTH_LABELS.get(month0 as usize).copied()
}
