//! Year heatmap: the full day list joined with the density counts.
//!
//! Renderers draw from a [`HeatmapGrid`] rather than from the density map
//! directly, so days without events are still enumerated (and painted as
//! empty) and padding cells are explicit.

use daymap_model::day::{CalendarDay, GridCoordinate};

use crate::aggregate::DensityMap;
use crate::calendar::YearGrid;
use crate::ramp::normalized;

/// One real day in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatCell {
    pub day: CalendarDay,
    pub coord: GridCoordinate,
    pub count: u32,
}

/// Column-major `weeks x 7` grid of days for one year.
#[derive(Debug, Clone)]
pub struct HeatmapGrid {
    pub grid: YearGrid,
    pub cols: usize,
    pub rows: usize,
    pub cells: Vec<Option<HeatCell>>,
    pub max_density: u32,
}

impl HeatmapGrid {
    /// Join every day of `grid`'s year with its count in `density`.
    pub fn from_density(grid: YearGrid, density: &DensityMap) -> Self {
        let cols = grid.week_count() as usize;
        let rows = 7;
        let mut cells = vec![None; cols * rows];

        for day in grid.all_dates() {
            let Some(coord) = grid.date_to_coord(day) else {
                continue;
            };
            let idx = coord.week as usize * rows + coord.weekday as usize;
            cells[idx] = Some(HeatCell {
                day,
                coord,
                count: density.count(day),
            });
        }

        Self {
            grid,
            cols,
            rows,
            cells,
            max_density: density.max(),
        }
    }

    pub fn year(&self) -> i32 {
        self.grid.year()
    }

    /// Cell at `(col, row)`: `None` outside the grid, `Some(None)` for padding.
    pub fn cell(&self, col: usize, row: usize) -> Option<Option<&HeatCell>> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[col * self.rows + row].as_ref())
    }

    /// Real day at a coordinate, if any.
    pub fn day_cell(&self, coord: GridCoordinate) -> Option<&HeatCell> {
        self.cell(coord.week as usize, coord.weekday as usize)
            .flatten()
    }

    /// Count normalized against the grid maximum.
    pub fn normalized_cell(&self, col: usize, row: usize) -> Option<f64> {
        let cell = self.cell(col, row)??;
        Some(normalized(cell.count, self.max_density))
    }

    /// Every real day in date order, including days with no events.
    pub fn days(&self) -> impl Iterator<Item = &HeatCell> + '_ {
        self.cells.iter().flatten()
    }

    /// Days with at least one event, in date order.
    pub fn active_days(&self) -> impl Iterator<Item = &HeatCell> + '_ {
        self.days().filter(|c| c.count > 0)
    }
}
