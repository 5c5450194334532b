//! Render inputs and outputs shared by both heatmap styles.

use daymap_common::config::{RenderDefaults, RenderMode};
use daymap_model::day::{month_label, CalendarDay, WEEKDAY_LABELS};
use daymap_model::layout::{GridLayout, Rect};
use daymap_processing_core::calendar::YearGrid;
use daymap_processing_core::heatmap::HeatmapGrid;

use crate::compositor::Stage;
use crate::surface::Surface;

/// Left padding of a year grid; holds the weekday labels.
pub const YEAR_PAD_X: f64 = 32.0;
/// Top padding of a year grid; holds the month labels.
pub const YEAR_PAD_Y: f64 = 22.0;

/// Per-frame inputs besides the heatmap itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    /// Placement transform in CSS pixels. Hit testing must use the same value.
    pub layout: GridLayout,
    /// Device pixel ratio of the target surface.
    pub device_scale: f64,
    /// Days after this one are muted and not selectable.
    pub today: Option<CalendarDay>,
    /// Currently selected day, drawn with a ring.
    pub selected: Option<CalendarDay>,
}

impl RenderContext {
    pub fn new(layout: GridLayout, device_scale: f64) -> Self {
        Self {
            layout,
            device_scale,
            today: None,
            selected: None,
        }
    }

    pub fn with_today(mut self, today: CalendarDay) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_selected(mut self, selected: Option<CalendarDay>) -> Self {
        self.selected = selected;
        self
    }

    /// True when `day` lies strictly after today.
    pub fn is_future(&self, day: CalendarDay) -> bool {
        self.today.is_some_and(|today| day > today)
    }
}

/// What a text label annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Weekday(u8),
    Month(u32),
}

/// A text label for the host to draw; the text is passed through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub kind: LabelKind,
    pub text: String,
    /// Anchor point in CSS pixels (left edge, vertical center).
    pub x: f64,
    pub y: f64,
}

/// A finished frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub surface: Surface,
    /// Off-screen density buffer, kept for inspection (raster mode only).
    pub density: Option<Surface>,
    pub labels: Vec<Label>,
    /// Stages executed, in order (raster mode only).
    pub stages: Vec<Stage>,
    pub layout: GridLayout,
}

/// Strategy seam between the two heatmap styles.
pub trait HeatRenderer {
    fn mode(&self) -> RenderMode;

    /// Draw `heatmap` from scratch.
    fn render(&self, heatmap: &HeatmapGrid, ctx: &RenderContext) -> Frame;
}

/// Year-grid layout for a rendering mode.
///
/// Flat mode uses square cells of `cell_size`. Raster mode uses the same
/// column width and, when `raster_height` is given, stretches rows to fill it.
pub fn year_layout(grid: &YearGrid, mode: RenderMode, defaults: &RenderDefaults) -> GridLayout {
    let columns = grid.week_count();
    match (mode, defaults.raster_height) {
        (RenderMode::Raster, Some(height)) => {
            GridLayout::fit_height(columns, height, defaults.cell_size, YEAR_PAD_X, YEAR_PAD_Y)
        }
        _ => GridLayout::square(columns, defaults.cell_size, YEAR_PAD_X, YEAR_PAD_Y),
    }
}

/// Weekday labels along the left edge of a year grid.
pub fn weekday_labels(layout: &GridLayout) -> Vec<Label> {
    WEEKDAY_LABELS
        .iter()
        .enumerate()
        .map(|(row, text)| {
            let (_, cy) = layout.cell_center(0, row as u32);
            Label {
                kind: LabelKind::Weekday(row as u8),
                text: (*text).to_string(),
                x: 2.0,
                y: cy,
            }
        })
        .collect()
}

/// Header strip of each month above a year grid.
///
/// A month's header spans from its first column up to the next month's
/// first column, so neighbouring headers never overlap.
pub fn month_headers(grid: &YearGrid, layout: &GridLayout) -> Vec<(u32, Rect)> {
    // A month starting mid-week shares its first column with the previous
    // month; its header starts one column later.
    let starts: Vec<(u32, u32)> = (0..12)
        .filter_map(|m| {
            let weeks = grid.month_weeks(m)?;
            let first_day = grid.date_to_coord(CalendarDay::new(grid.year(), m + 1, 1)?)?;
            let shift = u32::from(m > 0 && first_day.weekday > 0);
            Some((m, *weeks.start() + shift))
        })
        .collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &(month0, start))| {
            let end = starts
                .get(i + 1)
                .map_or(layout.columns, |&(_, next)| next)
                .max(start + 1);
            let (x0, _) = layout.cell_origin(start, 0);
            let (x1, _) = layout.cell_origin(end, 0);
            (month0, Rect::new(x0, 0.0, x1 - x0, layout.pad_y))
        })
        .collect()
}

/// Month labels, one per header.
pub fn month_labels(grid: &YearGrid, layout: &GridLayout) -> Vec<Label> {
    month_headers(grid, layout)
        .into_iter()
        .filter_map(|(month0, rect)| {
            month_label(month0).map(|text| Label {
                kind: LabelKind::Month(month0),
                text: text.to_string(),
                x: rect.x,
                y: rect.h / 2.0,
            })
        })
        .collect()
}
