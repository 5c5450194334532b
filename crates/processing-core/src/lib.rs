//! Daymap Processing Core
//!
//! The calendar coordinate engine and density pipeline:
//! - **Calendar:** `(week, weekday)` grid indexing for one year, anchored at local noon
//! - **Aggregate:** Event timestamps to per-day counts and a normalization bound
//! - **Ramp:** Discrete bucket and continuous heat color policies
//! - **Heatmap:** The full day list joined with counts, ready for rendering
//! - **Month:** Single-month layouts with leading and trailing blanks
//!
//! This crate is pure computation: no I/O, no drawing.
//! All inputs are data; all outputs are data.

pub mod aggregate;
pub mod calendar;
pub mod heatmap;
pub mod month;
pub mod ramp;

pub use aggregate::{AggregateStats, DensityAggregator, DensityMap};
pub use calendar::{DayNormalizer, YearGrid};
pub use heatmap::{HeatCell, HeatmapGrid};
pub use month::MonthGrid;
pub use ramp::{Bucket, ColorRamp, ContinuousRamp, DiscreteRamp, Rgba};
