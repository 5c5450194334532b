//! Flat-cell heatmap: one bucketed square per grid coordinate.

use daymap_common::config::RenderMode;
use daymap_model::day::{CalendarDay, GridCoordinate, WEEKDAY_LABELS};
use daymap_model::layout::{GridLayout, Rect, SurfaceSize};
use daymap_processing_core::aggregate::DensityMap;
use daymap_processing_core::heatmap::HeatmapGrid;
use daymap_processing_core::month::MonthGrid;
use daymap_processing_core::ramp::{Bucket, DiscreteRamp, Rgba};

use crate::frame::{month_labels, weekday_labels, Frame, HeatRenderer, Label, LabelKind, RenderContext};
use crate::surface::{BlendMode, Surface};

/// Decoration colors and spacing of the flat grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatStyle {
    /// Gap between neighbouring cells, in CSS pixels.
    pub gap: f64,
    pub today_border: Rgba,
    pub selected_ring: Rgba,
    /// Opacity multiplier for days after today.
    pub future_alpha: f32,
}

impl Default for FlatStyle {
    fn default() -> Self {
        Self {
            gap: 2.0,
            today_border: Rgba::from_rgb8(0xe6, 0xed, 0xf3),
            selected_ring: Rgba::from_rgb8(0xf7, 0x81, 0x66),
            future_alpha: 0.3,
        }
    }
}

/// Resolved state of one drawn cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatCell {
    pub coord: GridCoordinate,
    /// `None` for filler cells that only keep rows rectangular.
    pub day: Option<CalendarDay>,
    pub rect: Rect,
    pub count: u32,
    pub bucket: Bucket,
    pub today: bool,
    pub selected: bool,
    pub future: bool,
}

impl FlatCell {
    fn resolve(
        coord: GridCoordinate,
        day: Option<CalendarDay>,
        rect: Rect,
        count: u32,
        ctx: &RenderContext,
    ) -> Self {
        Self {
            coord,
            day,
            rect,
            count,
            bucket: Bucket::for_count(count),
            today: day.is_some() && day == ctx.today,
            selected: day.is_some() && day == ctx.selected,
            future: day.is_some_and(|d| ctx.is_future(d)),
        }
    }

    /// Whether a click on this cell may select its day.
    pub fn interactive(&self) -> bool {
        self.day.is_some() && !self.future
    }
}

/// Bucketed square-cell renderer.
#[derive(Debug, Clone, Default)]
pub struct FlatRenderer {
    pub ramp: DiscreteRamp,
    pub style: FlatStyle,
}

impl FlatRenderer {
    pub fn new(ramp: DiscreteRamp, style: FlatStyle) -> Self {
        Self { ramp, style }
    }

    /// Every cell of the year grid, filler included, in column-major order.
    pub fn paint_cells(&self, heatmap: &HeatmapGrid, ctx: &RenderContext) -> Vec<FlatCell> {
        let mut cells = Vec::with_capacity(heatmap.cols * heatmap.rows);
        for col in 0..heatmap.cols {
            for row in 0..heatmap.rows {
                let coord = GridCoordinate::new(col as u32, row as u8);
                let rect = ctx.layout.cell_rect(coord.week, row as u32);
                let cell = heatmap.cell(col, row).flatten();
                cells.push(FlatCell::resolve(
                    coord,
                    cell.map(|c| c.day),
                    rect,
                    cell.map_or(0, |c| c.count),
                    ctx,
                ));
            }
        }
        cells
    }

    /// Cells of a single month, row-major, with leading and trailing blanks.
    ///
    /// `ctx.layout` must come from [`month_layout`].
    pub fn paint_month_cells(
        &self,
        month: &MonthGrid,
        density: &DensityMap,
        ctx: &RenderContext,
    ) -> Vec<FlatCell> {
        month
            .cells()
            .into_iter()
            .enumerate()
            .map(|(i, day)| {
                let (row, col) = (i as u32 / 7, i as u32 % 7);
                let rect = ctx.layout.cell_rect(col, row);
                let count = day.map_or(0, |d| density.count(d));
                FlatCell::resolve(GridCoordinate::new(row, col as u8), day, rect, count, ctx)
            })
            .collect()
    }

    fn paint(&self, surface: &mut Surface, cells: &[FlatCell]) {
        let gap = self.style.gap;
        for cell in cells {
            if cell.day.is_none() {
                continue;
            }
            let inner = Rect::new(
                cell.rect.x + gap / 2.0,
                cell.rect.y + gap / 2.0,
                (cell.rect.w - gap).max(1.0),
                (cell.rect.h - gap).max(1.0),
            );
            let mut color = self.ramp.color(cell.bucket);
            if cell.future {
                color = color.with_alpha(color.a * self.style.future_alpha);
            }
            surface.fill_rect(inner, color, BlendMode::SourceOver);
            if cell.today {
                surface.stroke_rect(inner, 1.0, self.style.today_border);
            }
            if cell.selected {
                surface.stroke_rect(cell.rect, 1.5, self.style.selected_ring);
            }
        }
    }

    /// Draw a single month view.
    pub fn render_month(&self, month: &MonthGrid, density: &DensityMap, ctx: &RenderContext) -> Frame {
        let layout = ctx.layout;
        let mut surface = Surface::new(SurfaceSize::for_layout(&layout, ctx.device_scale));
        let cells = self.paint_month_cells(month, density, ctx);
        self.paint(&mut surface, &cells);

        let labels = WEEKDAY_LABELS
            .iter()
            .enumerate()
            .map(|(col, text)| {
                let (x, _) = layout.cell_origin(col as u32, 0);
                Label {
                    kind: LabelKind::Weekday(col as u8),
                    text: (*text).to_string(),
                    x,
                    y: layout.pad_y / 2.0,
                }
            })
            .collect();

        tracing::debug!(
            year = month.year(),
            month = month.month0(),
            rows = month.row_count(),
            "rendered month view"
        );
        Frame {
            surface,
            density: None,
            labels,
            stages: Vec::new(),
            layout,
        }
    }
}

/// Layout of a month view: weekdays across, weeks down, square cells.
pub fn month_layout(month: &MonthGrid, cell_size: f64, pad: f64) -> GridLayout {
    GridLayout::new(7, month.row_count(), pad, pad, cell_size, cell_size)
}

impl HeatRenderer for FlatRenderer {
    fn mode(&self) -> RenderMode {
        RenderMode::Flat
    }

    fn render(&self, heatmap: &HeatmapGrid, ctx: &RenderContext) -> Frame {
        let layout = ctx.layout;
        let mut surface = Surface::new(SurfaceSize::for_layout(&layout, ctx.device_scale));
        let cells = self.paint_cells(heatmap, ctx);
        self.paint(&mut surface, &cells);

        let mut labels = weekday_labels(&layout);
        labels.extend(month_labels(&heatmap.grid, &layout));

        tracing::debug!(
            year = heatmap.year(),
            width = surface.width(),
            height = surface.height(),
            cells = cells.len(),
            "rendered flat heatmap"
        );
        Frame {
            surface,
            density: None,
            labels,
            stages: Vec::new(),
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{YEAR_PAD_X, YEAR_PAD_Y};
    use chrono::FixedOffset;
    use daymap_model::event::Event;
    use daymap_processing_core::aggregate::DensityAggregator;
    use daymap_processing_core::calendar::YearGrid;

    fn heatmap(year: i32, stamps: &[&str]) -> (HeatmapGrid, DensityMap) {
        let events: Vec<Event> = stamps.iter().map(|s| Event::at(*s)).collect();
        let density =
            DensityAggregator::for_year(FixedOffset::east_opt(0).unwrap(), year).aggregate(&events);
        (HeatmapGrid::from_density(YearGrid::new(year).unwrap(), &density), density)
    }

    fn ctx(heatmap: &HeatmapGrid) -> RenderContext {
        let layout = GridLayout::square(heatmap.cols as u32, 10.0, YEAR_PAD_X, YEAR_PAD_Y);
        RenderContext::new(layout, 1.0)
    }

    fn day(s: &str) -> CalendarDay {
        s.parse().unwrap()
    }

    #[test]
    fn test_paint_cells_covers_rectangular_grid() {
        let (heatmap, _) = heatmap(2023, &["2023-01-01"]);
        let cells = FlatRenderer::default().paint_cells(&heatmap, &ctx(&heatmap));
        assert_eq!(cells.len(), 53 * 7);
        assert_eq!(cells.iter().filter(|c| c.day.is_some()).count(), 365);
        // 2023-01-01 is a Sunday; Monday..Saturday of week 0 are filler.
        assert!(cells[..6].iter().all(|c| c.day.is_none() && !c.interactive()));
        assert_eq!(cells[6].day, Some(day("2023-01-01")));
        assert_eq!(cells[6].bucket, Bucket::Low);
    }

    #[test]
    fn test_filler_is_transparent_and_empty_day_is_not() {
        let (heatmap, _) = heatmap(2023, &[]);
        let ctx = ctx(&heatmap);
        let frame = FlatRenderer::default().render(&heatmap, &ctx);
        let (fx, fy) = ctx.layout.cell_center(0, 0);
        assert_eq!(frame.surface.color_at_css(fx, fy).unwrap().a, 0.0);
        let (ex, ey) = ctx.layout.cell_center(0, 6);
        assert!(frame.surface.color_at_css(ex, ey).unwrap().a > 0.0);
        assert!(frame.stages.is_empty());
        assert_eq!(frame.labels.len(), 7 + 12);
    }

    #[test]
    fn test_future_today_and_selected_states() {
        let (heatmap, _) = heatmap(2024, &[]);
        let today = day("2024-06-15");
        let ctx = ctx(&heatmap)
            .with_today(today)
            .with_selected(Some(day("2024-06-10")));
        let cells = FlatRenderer::default().paint_cells(&heatmap, &ctx);
        let find = |key: &str| cells.iter().find(|c| c.day == Some(day(key))).unwrap();

        assert!(find("2024-06-15").today);
        assert!(find("2024-06-15").interactive());
        assert!(find("2024-06-16").future);
        assert!(!find("2024-06-16").interactive());
        assert!(find("2024-06-10").selected);
        assert!(!find("2024-06-11").selected);
    }

    #[test]
    fn test_future_cells_are_muted() {
        let (heatmap, _) = heatmap(2024, &["2024-06-14", "2024-06-16"]);
        let ctx = ctx(&heatmap).with_today(day("2024-06-15"));
        let frame = FlatRenderer::default().render(&heatmap, &ctx);
        let alpha_of = |key: &str| {
            let coord = heatmap.grid.date_to_coord(day(key)).unwrap();
            let (x, y) = ctx.layout.cell_center(coord.week, coord.weekday as u32);
            frame.surface.color_at_css(x, y).unwrap().a
        };
        assert!(alpha_of("2024-06-16") < alpha_of("2024-06-14"));
    }

    #[test]
    fn test_month_cells_align_day_one_under_weekday() {
        // 2024-02-01 is a Thursday.
        let month = MonthGrid::new(2024, 1).unwrap();
        let (_, density) = heatmap(2024, &["2024-02-01", "2024-02-01"]);
        let layout = month_layout(&month, 20.0, 16.0);
        let ctx = RenderContext::new(layout, 2.0);
        let renderer = FlatRenderer::default();
        let cells = renderer.paint_month_cells(&month, &density, &ctx);
        assert_eq!(cells.len(), 35);
        assert!(cells[..3].iter().all(|c| c.day.is_none()));
        assert_eq!(cells[3].day, Some(day("2024-02-01")));
        assert_eq!(cells[3].count, 2);
        assert_eq!(cells[3].coord, GridCoordinate::new(0, 3));

        let frame = renderer.render_month(&month, &density, &ctx);
        assert_eq!(frame.surface.width(), (layout.surface_width() * 2.0).round() as u32);
        assert_eq!(frame.labels.len(), 7);
    }
}
