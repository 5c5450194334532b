//! Clock utilities.
//!
//! The renderers need to know which calendar day is "today" so that later
//! days can be muted and refused as selections. Hosts inject a [`Clock`]
//! instead of reading the system time directly, which keeps rendering and
//! hit-testing deterministic under test.

use chrono::{Local, NaiveDate};

/// Source of the current local calendar day.
pub trait Clock {
    /// Today's date in the local reference zone.
    fn today(&self) -> NaiveDate;
}

/// Reads the system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
