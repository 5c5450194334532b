//! Pointer-to-day resolution.
//!
//! Hit testing reuses the exact [`GridLayout`] the renderer placed cells
//! with, so a pointer inside a drawn cell always resolves to that cell's day.
//! Padding and filler cells resolve to nothing; there is no snapping.

use daymap_model::day::{CalendarDay, GridCoordinate};
use daymap_model::layout::GridLayout;
use daymap_processing_core::aggregate::DensityMap;
use daymap_processing_core::heatmap::HeatmapGrid;
use daymap_processing_core::month::MonthGrid;
use serde::Serialize;

/// A resolved pointer position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub day: CalendarDay,
    pub weekday_label: &'static str,
    pub count: u32,
}

/// Hit tester over a year heatmap.
#[derive(Debug, Clone, Copy)]
pub struct HitTester<'a> {
    heatmap: &'a HeatmapGrid,
    layout: GridLayout,
}

impl<'a> HitTester<'a> {
    pub fn new(heatmap: &'a HeatmapGrid, layout: GridLayout) -> Self {
        Self { heatmap, layout }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Grid coordinate under `(x, y)`, real day or not.
    pub fn coord_at(&self, x: f64, y: f64) -> Option<GridCoordinate> {
        let (week, weekday) = self.layout.cell_at(x, y)?;
        Some(GridCoordinate::new(week, weekday as u8))
    }

    /// Day under a CSS-pixel position relative to the surface's top-left.
    pub fn pick(&self, x: f64, y: f64) -> Option<Hit> {
        let coord = self.coord_at(x, y)?;
        let day = self.heatmap.grid.coord_to_date(coord)?;
        let count = self.heatmap.day_cell(coord).map_or(0, |c| c.count);
        Some(Hit {
            day,
            weekday_label: coord.weekday_label(),
            count,
        })
    }
}

/// Hit tester over a single month view.
#[derive(Debug, Clone, Copy)]
pub struct MonthHitTester<'a> {
    month: &'a MonthGrid,
    density: &'a DensityMap,
    layout: GridLayout,
}

impl<'a> MonthHitTester<'a> {
    pub fn new(month: &'a MonthGrid, density: &'a DensityMap, layout: GridLayout) -> Self {
        Self {
            month,
            density,
            layout,
        }
    }

    pub fn pick(&self, x: f64, y: f64) -> Option<Hit> {
        let (column, row) = self.layout.cell_at(x, y)?;
        let day = self.month.day_at(row, column)?;
        Some(Hit {
            day,
            weekday_label: day.weekday_label(),
            count: self.density.count(day),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat::month_layout;
    use crate::frame::{YEAR_PAD_X, YEAR_PAD_Y};
    use chrono::FixedOffset;
    use daymap_model::event::Event;
    use daymap_processing_core::aggregate::DensityAggregator;
    use daymap_processing_core::calendar::YearGrid;
    use proptest::prelude::*;

    fn build(year: i32, stamps: &[&str]) -> (HeatmapGrid, DensityMap) {
        let events: Vec<Event> = stamps.iter().map(|s| Event::at(*s)).collect();
        let density =
            DensityAggregator::for_year(FixedOffset::east_opt(0).unwrap(), year).aggregate(&events);
        (HeatmapGrid::from_density(YearGrid::new(year).unwrap(), &density), density)
    }

    fn layout(heatmap: &HeatmapGrid) -> GridLayout {
        GridLayout::square(heatmap.cols as u32, 12.0, YEAR_PAD_X, YEAR_PAD_Y)
    }

    #[test]
    fn test_pick_resolves_corners_of_2024() {
        let (heatmap, _) = build(2024, &["2024-12-31", "2024-12-31"]);
        let layout = layout(&heatmap);
        let tester = HitTester::new(&heatmap, layout);

        let (x, y) = layout.cell_center(0, 0);
        let hit = tester.pick(x, y).unwrap();
        assert_eq!(hit.day.key(), "2024-01-01");
        assert_eq!(hit.weekday_label, "Mon");
        assert_eq!(hit.count, 0);

        let (x, y) = layout.cell_center(52, 1);
        let hit = tester.pick(x, y).unwrap();
        assert_eq!(hit.day.key(), "2024-12-31");
        assert_eq!(hit.weekday_label, "Tue");
        assert_eq!(hit.count, 2);
    }

    #[test]
    fn test_pick_rejects_padding_and_filler() {
        let (heatmap, _) = build(2023, &[]);
        let layout = layout(&heatmap);
        let tester = HitTester::new(&heatmap, layout);
        assert_eq!(tester.pick(YEAR_PAD_X - 1.0, YEAR_PAD_Y + 1.0), None);
        assert_eq!(tester.pick(YEAR_PAD_X + 1.0, YEAR_PAD_Y - 1.0), None);
        assert_eq!(tester.pick(layout.surface_width() - 1.0, YEAR_PAD_Y + 1.0), None);
        assert_eq!(tester.pick(f64::NAN, 40.0), None);
        // 2023-01-01 is a Sunday: Monday of week 0 is filler, never snapped.
        let (x, y) = layout.cell_center(0, 0);
        assert_eq!(tester.pick(x, y), None);
        assert_eq!(tester.coord_at(x, y), Some(GridCoordinate::new(0, 0)));
        // One column beyond the grid.
        let (x, y) = layout.cell_center(53, 0);
        assert_eq!(tester.pick(x, y), None);
    }

    #[test]
    fn test_month_pick_skips_blanks() {
        let month = MonthGrid::new(2024, 1).unwrap();
        let (_, density) = build(2024, &["2024-02-29"]);
        let layout = month_layout(&month, 20.0, 16.0);
        let tester = MonthHitTester::new(&month, &density, layout);
        let (x, y) = layout.cell_center(2, 0);
        assert_eq!(tester.pick(x, y), None);
        let (x, y) = layout.cell_center(3, 4);
        let hit = tester.pick(x, y).unwrap();
        assert_eq!(hit.day.key(), "2024-02-29");
        assert_eq!(hit.weekday_label, "Thu");
        assert_eq!(hit.count, 1);
    }

    proptest! {
        #[test]
        fn prop_pick_inverts_placement(
            year in 1990i32..2100,
            ordinal in 0u32..366,
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
            cell in 4.0f64..30.0,
            height in 90.0f64..400.0,
        ) {
            let (heatmap, _) = build(year, &[]);
            prop_assume!(ordinal < heatmap.grid.day_count());
            let layout = GridLayout::fit_height(heatmap.cols as u32, height, cell, YEAR_PAD_X, YEAR_PAD_Y);
            let day = heatmap.grid.all_dates()[ordinal as usize];
            let coord = heatmap.grid.date_to_coord(day).unwrap();
            let rect = layout.cell_rect(coord.week, coord.weekday as u32);
            let x = rect.x + (0.01 + 0.98 * fx) * rect.w;
            let y = rect.y + (0.01 + 0.98 * fy) * rect.h;
            let hit = HitTester::new(&heatmap, layout).pick(x, y);
            prop_assert_eq!(hit.map(|h| h.day), Some(day));
        }
    }
}
