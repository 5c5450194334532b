//! Placement transform shared by the renderers and the hit tester.
//!
//! All values are CSS pixels. A [`GridLayout`] maps a `(column, row)` cell to
//! its rectangle on the drawing surface and maps a pointer position back to
//! the cell under it. Renderers and hit testing must use the same layout
//! value; any other padding or cell size misattributes pointer events.

use serde::{Deserialize, Serialize};

/// Rectangular cell grid inside a padded drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Horizontal padding before the first column.
    pub pad_x: f64,
    /// Vertical padding before the first row.
    pub pad_y: f64,
    /// Width of one column.
    pub cell_width: f64,
    /// Height of one row.
    pub cell_height: f64,
    /// Number of columns (weeks).
    pub columns: u32,
    /// Number of rows (weekdays).
    pub rows: u32,
}

impl GridLayout {
    /// Create a layout. Cell sizes are clamped to stay positive.
    pub fn new(
        columns: u32,
        rows: u32,
        pad_x: f64,
        pad_y: f64,
        cell_width: f64,
        cell_height: f64,
    ) -> Self {
        Self {
            pad_x: pad_x.max(0.0),
            pad_y: pad_y.max(0.0),
            cell_width: cell_width.max(f64::EPSILON),
            cell_height: cell_height.max(f64::EPSILON),
            columns,
            rows,
        }
    }

    /// A 7-row layout with square cells.
    pub fn square(columns: u32, cell_size: f64, pad_x: f64, pad_y: f64) -> Self {
        Self::new(columns, 7, pad_x, pad_y, cell_size, cell_size)
    }

    /// A 7-row layout whose rows stretch to fill a fixed total height.
    pub fn fit_height(
        columns: u32,
        total_height: f64,
        cell_width: f64,
        pad_x: f64,
        pad_y: f64,
    ) -> Self {
        let cell_height = (total_height - 2.0 * pad_y) / 7.0;
        Self::new(columns, 7, pad_x, pad_y, cell_width, cell_height)
    }

    /// Width of the cell area.
    pub fn content_width(&self) -> f64 {
        self.columns as f64 * self.cell_width
    }

    /// Height of the cell area.
    pub fn content_height(&self) -> f64 {
        self.rows as f64 * self.cell_height
    }

    /// Full surface width including padding on both sides.
    pub fn surface_width(&self) -> f64 {
        self.content_width() + 2.0 * self.pad_x
    }

    /// Full surface height including padding on both sides.
    pub fn surface_height(&self) -> f64 {
        self.content_height() + 2.0 * self.pad_y
    }

    /// Rectangle covered by the cell area.
    pub fn content_rect(&self) -> Rect {
        Rect::new(
            self.pad_x,
            self.pad_y,
            self.content_width(),
            self.content_height(),
        )
    }

    /// Top-left corner of a cell.
    pub fn cell_origin(&self, column: u32, row: u32) -> (f64, f64) {
        (
            self.pad_x + column as f64 * self.cell_width,
            self.pad_y + row as f64 * self.cell_height,
        )
    }

    /// Rectangle of a cell.
    pub fn cell_rect(&self, column: u32, row: u32) -> Rect {
        let (x, y) = self.cell_origin(column, row);
        Rect::new(x, y, self.cell_width, self.cell_height)
    }

    /// Center of a cell.
    pub fn cell_center(&self, column: u32, row: u32) -> (f64, f64) {
        let (x, y) = self.cell_origin(column, row);
        (x + self.cell_width / 2.0, y + self.cell_height / 2.0)
    }

    /// Cell under a pointer position, or `None` outside the cell area.
    ///
    /// This is the algebraic inverse of [`GridLayout::cell_origin`]:
    /// `column = floor((x - pad_x) / cell_width)` and likewise for rows.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(u32, u32)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let local_x = x - self.pad_x;
        let local_y = y - self.pad_y;
        if local_x < 0.0 || local_y < 0.0 {
            return None;
        }
        let column = (local_x / self.cell_width).floor();
        let row = (local_y / self.cell_height).floor();
        if column >= self.columns as f64 || row >= self.rows as f64 {
            return None;
        }
        Some((column as u32, row as u32))
    }
}

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Half-open containment: the right and bottom edges belong to the neighbour.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// Size of a drawing surface in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub css_width: f64,
    pub css_height: f64,
    pub device_scale: f64,
}

impl SurfaceSize {
    /// Create a surface size. Non-positive or non-finite scales fall back to 1.
    pub fn new(css_width: f64, css_height: f64, device_scale: f64) -> Self {
        let device_scale = if device_scale.is_finite() && device_scale > 0.0 {
            device_scale
        } else {
            1.0
        };
        Self {
            css_width: css_width.max(0.0),
            css_height: css_height.max(0.0),
            device_scale,
        }
    }

    /// Surface exactly large enough for a layout.
    pub fn for_layout(layout: &GridLayout, device_scale: f64) -> Self {
        Self::new(layout.surface_width(), layout.surface_height(), device_scale)
    }

    /// Backing-buffer width in device pixels.
    pub fn backing_width(&self) -> u32 {
        (self.css_width * self.device_scale).round() as u32
    }

    /// Backing-buffer height in device pixels.
    pub fn backing_height(&self) -> u32 {
        (self.css_height * self.device_scale).round() as u32
    }
}
