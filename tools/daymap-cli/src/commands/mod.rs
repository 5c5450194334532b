//! Subcommand implementations and the input plumbing they share.

pub mod locate;
pub mod pick;
pub mod render;
pub mod stats;

use std::path::Path;

use anyhow::Context;
use chrono::Local;
use daymap_common::clock::{Clock, FixedClock, SystemClock};
use daymap_common::config::{RenderDefaults, RenderMode};
use daymap_common::error::DaymapError;
use daymap_model::day::CalendarDay;
use daymap_model::event::{parse_events, Event};
use daymap_processing_core::aggregate::{DensityAggregator, DensityMap};
use daymap_processing_core::calendar::YearGrid;
use daymap_processing_core::heatmap::HeatmapGrid;

/// Read events from a JSON array or JSONL file.
pub fn load_events(path: &Path) -> anyhow::Result<Vec<Event>> {
    if !path.exists() {
        return Err(DaymapError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read events from {}", path.display()))?;
    let events = parse_events(&content)
        .map_err(|e| DaymapError::events(format!("{}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), events = events.len(), "loaded events");
    Ok(events)
}

/// Aggregate `events` for `year` in the local time zone.
pub fn year_heatmap(events: &[Event], year: i32) -> anyhow::Result<(HeatmapGrid, DensityMap)> {
    let grid = YearGrid::new(year)?;
    let density = DensityAggregator::for_year(Local, year).aggregate(events);
    let stats = density.stats();
    if stats.unparsable > 0 {
        tracing::warn!(skipped = stats.unparsable, "ignored events with unparsable timestamps");
    }
    Ok((HeatmapGrid::from_density(grid, &density), density))
}

/// Parse a canonical `YYYY-MM-DD` argument.
pub fn parse_day(raw: &str) -> anyhow::Result<CalendarDay> {
    raw.parse::<CalendarDay>()
        .map_err(|_| DaymapError::invalid_day(raw).into())
}

/// `--today` if given, otherwise the system date.
pub fn resolve_today(arg: Option<&str>) -> anyhow::Result<CalendarDay> {
    let clock: Box<dyn Clock> = match arg {
        Some(raw) => Box::new(FixedClock::new(parse_day(raw)?.date())),
        None => Box::new(SystemClock),
    };
    Ok(CalendarDay::from_date(clock.today()))
}

/// Render settings from config with command-line overrides applied.
pub fn resolve_render(
    defaults: &RenderDefaults,
    mode: Option<&str>,
    height: Option<f64>,
    scale: Option<f64>,
) -> anyhow::Result<RenderDefaults> {
    let mut resolved = defaults.clone();
    if let Some(raw) = mode {
        resolved.mode = raw
            .parse::<RenderMode>()
            .map_err(DaymapError::config)?;
    }
    if let Some(height) = height {
        if !(height.is_finite() && height > 0.0) {
            return Err(DaymapError::config(format!("invalid height {height}")).into());
        }
        resolved.raster_height = Some(height);
    }
    if let Some(scale) = scale {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(DaymapError::config(format!("invalid device scale {scale}")).into());
        }
        resolved.device_scale = scale;
    }
    Ok(resolved)
}
