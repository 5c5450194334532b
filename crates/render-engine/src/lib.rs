//! Daymap Render Engine
//!
//! Draws a year of day counts as pixels and maps pointer positions back to
//! days.
//!
//! # Pipeline
//!
//! ```text
//! HeatmapGrid ──┬── FlatRenderer ───────────────┐
//!               │                               ├── Frame ── export_png
//!               └── RasterRenderer              │
//!                     density buffer            │
//!                     background + decorations  │
//!                     bloom (wide → tight)      │
//!                     core (screen)             │
//!                     vignette                  │
//!                     noise ────────────────────┘
//!
//! pointer (x, y) ── HitTester ── ViewController ── Intent
//! ```
//!
//! Both renderers and the hit tester share one [`GridLayout`] per frame.

pub mod compositor;
pub mod export;
pub mod flat;
pub mod frame;
pub mod hit;
pub mod interaction;
pub mod raster;
pub mod sequencer;
pub mod surface;

use daymap_common::config::{RenderDefaults, RenderMode};
pub use daymap_model::layout::GridLayout;

pub use compositor::{BloomPass, BloomSchedule, Stage};
pub use export::{export_png, frame_signature, ExportSummary};
pub use flat::{month_layout, FlatCell, FlatRenderer, FlatStyle};
pub use frame::{year_layout, Frame, HeatRenderer, Label, LabelKind, RenderContext};
pub use hit::{Hit, HitTester, MonthHitTester};
pub use interaction::{Intent, MonthView, SelectionSink, Tooltip, ViewController, ViewTarget, YearView};
pub use raster::{Blob, RasterConfig, RasterRenderer};
pub use sequencer::{Commit, FrameSequencer, FrameTicket, RedrawCause};
pub use surface::{BlendMode, Surface};

/// Renderer for a mode, tuned from the configured defaults.
pub fn renderer_for(mode: RenderMode, defaults: &RenderDefaults) -> Box<dyn HeatRenderer> {
    match mode {
        RenderMode::Flat => Box::new(FlatRenderer::default()),
        RenderMode::Raster => Box::new(RasterRenderer {
            config: RasterConfig::from_defaults(defaults),
            ..RasterRenderer::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_for_mode() {
        let defaults = RenderDefaults::default();
        assert_eq!(renderer_for(RenderMode::Flat, &defaults).mode(), RenderMode::Flat);
        assert_eq!(renderer_for(RenderMode::Raster, &defaults).mode(), RenderMode::Raster);
    }
}
