//! Single-month calendar layout.
//!
//! Unlike the year grid, a month view anchors its first row on day 1 of the
//! month: leading blanks push day 1 under its weekday column and trailing
//! blanks pad the final week to seven cells.

use daymap_model::day::CalendarDay;

/// One month laid out in Monday-first rows of seven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    year: i32,
    month0: u32,
    leading: u32,
    days: Vec<CalendarDay>,
    trailing: u32,
}

impl MonthGrid {
    /// Layout for `month0` (0 = January) of `year`.
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        let first = CalendarDay::new(year, month0.checked_add(1)?, 1)?;
        let days: Vec<CalendarDay> = std::iter::successors(Some(first), |d| d.succ())
            .take_while(|d| d.month0() == month0 && d.year() == year)
            .collect();
        let leading = first.weekday_index() as u32;
        let filled = leading + days.len() as u32;
        let trailing = (7 - filled % 7) % 7;
        Some(Self {
            year,
            month0,
            leading,
            days,
            trailing,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    /// Blank cells before day 1.
    pub fn leading_blanks(&self) -> u32 {
        self.leading
    }

    /// Blank cells after the last day.
    pub fn trailing_blanks(&self) -> u32 {
        self.trailing
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    /// Number of week rows.
    pub fn row_count(&self) -> u32 {
        (self.leading + self.days.len() as u32 + self.trailing) / 7
    }

    /// All cells in row-major order; blanks are `None`.
    pub fn cells(&self) -> Vec<Option<CalendarDay>> {
        let mut cells = Vec::with_capacity((self.row_count() * 7) as usize);
        cells.extend((0..self.leading).map(|_| None));
        cells.extend(self.days.iter().copied().map(Some));
        cells.extend((0..self.trailing).map(|_| None));
        cells
    }

    /// Day at `(row, column)`, or `None` for blanks and out-of-range cells.
    pub fn day_at(&self, row: u32, column: u32) -> Option<CalendarDay> {
        if column > 6 {
            return None;
        }
        let index = row
            .checked_mul(7)?
            .checked_add(column)?
            .checked_sub(self.leading)?;
        self.days.get(index as usize).copied()
    }

    /// `(row, column)` of a day in this month.
    pub fn position_of(&self, day: CalendarDay) -> Option<(u32, u32)> {
        if day.year() != self.year || day.month0() != self.month0 {
            return None;
        }
        let index = self.leading + day.day() - 1;
        Some((index / 7, index % 7))
    }
}
