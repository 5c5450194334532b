//! Calendar grid indexing: the date <-> `(week, weekday)` bijection for one year.
//!
//! # Layout
//!
//! Rows are weekdays with Monday as row 0. Column 0 is the week containing
//! January 1st, whatever weekday that is, so the cells above January 1st in
//! column 0 (and below December 31st in the last column) hold no date.
//!
//! ```text
//! week     = floor((days_since(jan1, date) + weekday(jan1)) / 7)
//! weekday  = (day_of_week(date) + 6) mod 7
//! ```
//!
//! # Local noon
//!
//! Every date is pinned to 12:00 local time before two dates are
//! differenced or an instant is turned into a day. Daylight-saving shifts
//! happen at night, so a noon anchor can never cross a day boundary. The
//! density aggregator goes through the same [`DayNormalizer`].

use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use daymap_common::error::{DaymapError, DaymapResult};
use daymap_model::day::{CalendarDay, GridCoordinate};
use daymap_model::event::ParsedTimestamp;

/// Wall-clock time every date is anchored to.
pub fn anchor_time() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()
}

/// `date` at local noon.
pub fn local_noon(date: NaiveDate) -> NaiveDateTime {
    date.and_time(anchor_time())
}

/// Whole days from `from` to `to`, measured between local noons.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (local_noon(to) - local_noon(from)).num_days()
}

/// Pins timestamps and dates to calendar days in one reference zone.
#[derive(Debug, Clone)]
pub struct DayNormalizer<Tz: TimeZone> {
    tz: Tz,
}

impl<Tz: TimeZone> DayNormalizer<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn zone(&self) -> &Tz {
        &self.tz
    }

    /// `day` at local noon in the reference zone.
    pub fn anchor(&self, day: CalendarDay) -> Option<DateTime<Tz>> {
        self.tz.from_local_datetime(&local_noon(day.date())).earliest()
    }

    /// Calendar day a parsed timestamp belongs to.
    ///
    /// Instants are moved into the reference zone first. Wall-clock values
    /// and bare dates already name a local day; their date part is re-anchored
    /// at noon so a time inside a DST gap or overlap cannot move them.
    pub fn day_of(&self, timestamp: &ParsedTimestamp) -> CalendarDay {
        let date = match timestamp {
            ParsedTimestamp::Instant(instant) => instant.with_timezone(&self.tz).date_naive(),
            ParsedTimestamp::Local(naive) => naive.date(),
            ParsedTimestamp::Date(date) => *date,
        };
        let day = CalendarDay::from(date);
        self.anchor(day)
            .map(|noon| CalendarDay::from(noon.date_naive()))
            .unwrap_or(day)
    }
}

/// Grid indexer for one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearGrid {
    year: i32,
    jan1: NaiveDate,
    dec31: NaiveDate,
    jan1_weekday: u8,
}

impl YearGrid {
    /// Build the grid for `year`. Fails only for years chrono cannot represent.
    pub fn new(year: i32) -> DaymapResult<Self> {
        let (Some(jan1), Some(dec31)) = (
            CalendarDay::first_of_year(year),
            CalendarDay::last_of_year(year),
        ) else {
            return Err(DaymapError::InvalidYear { year });
        };
        Ok(Self {
            year,
            jan1: jan1.date(),
            dec31: dec31.date(),
            jan1_weekday: jan1.weekday_index(),
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn first_day(&self) -> CalendarDay {
        CalendarDay::from(self.jan1)
    }

    pub fn last_day(&self) -> CalendarDay {
        CalendarDay::from(self.dec31)
    }

    /// Weekday row of January 1st.
    pub fn first_weekday(&self) -> u8 {
        self.jan1_weekday
    }

    /// 365, or 366 in leap years.
    pub fn day_count(&self) -> u32 {
        (days_between(self.jan1, self.dec31) + 1) as u32
    }

    pub fn contains(&self, day: CalendarDay) -> bool {
        day.date() >= self.jan1 && day.date() <= self.dec31
    }

    /// Grid coordinate of `day`, or `None` if it belongs to another year.
    pub fn date_to_coord(&self, day: CalendarDay) -> Option<GridCoordinate> {
        if !self.contains(day) {
            return None;
        }
        let offset = days_between(self.jan1, day.date()) + self.jan1_weekday as i64;
        Some(GridCoordinate {
            week: (offset / 7) as u32,
            weekday: day.weekday_index(),
        })
    }

    /// Day at a grid coordinate, or `None` for padding cells and anything
    /// outside the year. Never clamps into range.
    pub fn coord_to_date(&self, coord: GridCoordinate) -> Option<CalendarDay> {
        if coord.weekday > 6 {
            return None;
        }
        let offset = coord.week as i64 * 7 + coord.weekday as i64 - self.jan1_weekday as i64;
        if offset < 0 {
            return None;
        }
        let date = self.jan1.checked_add_signed(Duration::days(offset))?;
        (date <= self.dec31).then(|| CalendarDay::from(date))
    }

    /// Every day of the year in increasing order.
    pub fn all_dates(&self) -> Vec<CalendarDay> {
        self.jan1
            .iter_days()
            .take_while(|d| *d <= self.dec31)
            .map(CalendarDay::from)
            .collect()
    }

    /// Column index of December 31st.
    pub fn max_week_index(&self) -> u32 {
        let offset = days_between(self.jan1, self.dec31) + self.jan1_weekday as i64;
        (offset / 7) as u32
    }

    /// Number of columns needed to show the whole year.
    pub fn week_count(&self) -> u32 {
        self.max_week_index() + 1
    }

    /// Columns touched by month `month0` (0 = January).
    pub fn month_weeks(&self, month0: u32) -> Option<RangeInclusive<u32>> {
        let first = CalendarDay::new(self.year, month0.checked_add(1)?, 1)?;
        let next = month0
            .checked_add(2)
            .and_then(|month| CalendarDay::new(self.year, month, 1));
        let last = match next {
            Some(next) => next.pred()?,
            None => self.last_day(),
        };
        let start = self.date_to_coord(first)?.week;
        let end = self.date_to_coord(last)?.week;
        Some(start..=end)
    }
}

/// Grid coordinate of `day` within its own year.
pub fn date_to_coord(day: CalendarDay) -> Option<GridCoordinate> {
    YearGrid::new(day.year()).ok()?.date_to_coord(day)
}

/// Day at `(week, weekday)` of `year`, or `None` if there is none.
pub fn coord_to_date(week: u32, weekday: u8, year: i32) -> Option<CalendarDay> {
    YearGrid::new(year)
        .ok()?
        .coord_to_date(GridCoordinate::new(week, weekday))
}

/// Every day of `year` in increasing order.
pub fn all_dates_of_year(year: i32) -> DaymapResult<Vec<CalendarDay>> {
    Ok(YearGrid::new(year)?.all_dates())
}

/// Column index of December 31st of `year`.
pub fn max_week_index(year: i32) -> DaymapResult<u32> {
    Ok(YearGrid::new(year)?.max_week_index())
}
