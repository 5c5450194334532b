//! Raster heat renderer with bloom compositing.
//!
//! Each active day contributes one radial blob to an off-screen density
//! buffer. The buffer is then composited onto a tinted background several
//! times at decreasing blur radii, followed by a crisp core, a vignette and a
//! seeded noise pass. See [`Stage`] for the order.

use daymap_common::config::{RenderDefaults, RenderMode};
use daymap_model::day::CalendarDay;
use daymap_model::layout::{GridLayout, SurfaceSize};
use daymap_processing_core::heatmap::HeatmapGrid;
use daymap_processing_core::ramp::{ColorRamp, ContinuousRamp, HeatToken, Rgba};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::compositor::{blob_radius, compose_passes, BloomSchedule, Stage};
use crate::frame::{weekday_labels, Frame, HeatRenderer, RenderContext};
use crate::surface::{BlendMode, Surface};

/// Visual tuning of the raster renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterConfig {
    /// Smallest blob radius, as a fraction of the shorter cell side.
    pub min_radius: f64,
    /// Largest blob radius, as a fraction of the shorter cell side.
    pub max_radius: f64,
    pub bloom: BloomSchedule,
    pub background_top: Rgba,
    pub background_bottom: Rgba,
    pub frame_color: Rgba,
    pub guide_color: Rgba,
    /// Corner darkening in `[0, 1]`.
    pub vignette_strength: f32,
    /// Fraction of the half-diagonal left untouched by the vignette.
    pub vignette_inner: f32,
    /// Pixels touched by the noise pass, independent of resolution.
    pub noise_budget: usize,
    pub noise_amplitude: f32,
    pub seed: u64,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            min_radius: 0.45,
            max_radius: 1.6,
            bloom: BloomSchedule::default(),
            background_top: Rgba::from_rgb8(0x0b, 0x10, 0x20),
            background_bottom: Rgba::from_rgb8(0x05, 0x07, 0x0f),
            frame_color: Rgba::new(1.0, 1.0, 1.0, 0.12),
            guide_color: Rgba::new(1.0, 1.0, 1.0, 0.06),
            vignette_strength: 0.55,
            vignette_inner: 0.45,
            noise_budget: 1200,
            noise_amplitude: 0.04,
            seed: 0x5eed,
        }
    }
}

impl RasterConfig {
    pub fn from_defaults(defaults: &RenderDefaults) -> Self {
        Self {
            noise_budget: defaults.noise_budget,
            seed: defaults.seed,
            ..Self::default()
        }
    }
}

/// One heat blob in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    pub day: CalendarDay,
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub token: HeatToken,
}

/// Continuous heat renderer.
#[derive(Debug, Clone, Default)]
pub struct RasterRenderer {
    pub ramp: ContinuousRamp,
    pub config: RasterConfig,
}

impl RasterRenderer {
    pub fn new(ramp: ContinuousRamp, config: RasterConfig) -> Self {
        Self { ramp, config }
    }

    /// Blobs for every day with at least one event, in date order.
    pub fn blobs(&self, heatmap: &HeatmapGrid, layout: &GridLayout) -> Vec<Blob> {
        let side = layout.cell_width.min(layout.cell_height);
        let (min_r, max_r) = (self.config.min_radius * side, self.config.max_radius * side);
        heatmap
            .active_days()
            .map(|cell| {
                let token = self.ramp.token(cell.count, heatmap.max_density);
                let (cx, cy) = layout.cell_center(cell.coord.week, cell.coord.weekday as u32);
                Blob {
                    day: cell.day,
                    cx,
                    cy,
                    radius: blob_radius(token.t, min_r, max_r),
                    token,
                }
            })
            .collect()
    }

    fn decorate(&self, surface: &mut Surface, layout: &GridLayout) {
        let content = layout.content_rect();
        surface.stroke_rect(content, 1.0, self.config.frame_color);
        for row in 1..layout.rows {
            let (_, y) = layout.cell_origin(0, row);
            surface.hline(y, content.x, content.right(), 0.5, self.config.guide_color);
        }
    }
}

impl HeatRenderer for RasterRenderer {
    fn mode(&self) -> RenderMode {
        RenderMode::Raster
    }

    fn render(&self, heatmap: &HeatmapGrid, ctx: &RenderContext) -> Frame {
        let layout = ctx.layout;
        let size = SurfaceSize::for_layout(&layout, ctx.device_scale);
        let mut stages = Vec::with_capacity(7);

        let blobs = self.blobs(heatmap, &layout);
        let mut density = Surface::new(size);
        for blob in &blobs {
            density.radial_blob(blob.cx, blob.cy, blob.radius, blob.token.color, BlendMode::Lighter);
        }
        stages.push(Stage::DensityBuffer);

        let mut surface = Surface::new(size);
        surface.vertical_gradient(self.config.background_top, self.config.background_bottom);
        stages.push(Stage::Background);

        self.decorate(&mut surface, &layout);
        stages.push(Stage::Decorations);

        let glow = compose_passes(&mut surface, &density, &self.config.bloom.glow);
        stages.push(Stage::Bloom);

        compose_passes(&mut surface, &density, [&self.config.bloom.core]);
        stages.push(Stage::Core);

        surface.vignette(self.config.vignette_strength, self.config.vignette_inner);
        stages.push(Stage::Vignette);

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let jittered = surface.jitter(self.config.noise_budget, self.config.noise_amplitude, &mut rng);
        stages.push(Stage::Noise);

        tracing::debug!(
            year = heatmap.year(),
            width = surface.width(),
            height = surface.height(),
            blobs = blobs.len(),
            glow_passes = glow,
            jittered,
            "rendered raster heatmap"
        );
        Frame {
            surface,
            density: Some(density),
            labels: weekday_labels(&layout),
            stages,
            layout,
        }
    }
}
