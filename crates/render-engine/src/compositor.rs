//! Frame compositor: glow passes and pipeline stage bookkeeping.
//!
//! The raster renderer builds each frame in a fixed stage order. Only the
//! order and the monotonic growth of blob radius with intensity are
//! contractual; the pixel constants here are visual tuning.

use crate::surface::{BlendMode, Surface};

/// Pipeline stages of a raster frame, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Blobs accumulated on the off-screen density buffer.
    DensityBuffer,
    /// Gradient tint on the visible surface.
    Background,
    /// Frame, weekday labels, and guide lines.
    Decorations,
    /// Blurred additive glow passes.
    Bloom,
    /// Unblurred screen-blended highlight core.
    Core,
    /// Edge darkening.
    Vignette,
    /// Sparse brightness jitter.
    Noise,
}

/// One composite of the density buffer onto the visible surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomPass {
    /// Gaussian blur standard deviation in CSS pixels; 0 means no blur.
    pub blur: f64,
    pub mode: BlendMode,
}

/// Glow schedule: wide to tight additive passes, then a crisp screen core.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomSchedule {
    pub glow: Vec<BloomPass>,
    pub core: BloomPass,
}

impl Default for BloomSchedule {
    fn default() -> Self {
        Self::with_blurs(&[14.0, 7.0, 3.0])
    }
}

impl BloomSchedule {
    /// Additive glow passes at the given blur radii, widest first.
    pub fn with_blurs(blurs: &[f64]) -> Self {
        let mut blurs = blurs.to_vec();
        blurs.sort_by(|a, b| b.total_cmp(a));
        Self {
            glow: blurs
                .into_iter()
                .map(|blur| BloomPass {
                    blur: blur.max(0.0),
                    mode: BlendMode::Lighter,
                })
                .collect(),
            core: BloomPass {
                blur: 0.0,
                mode: BlendMode::Screen,
            },
        }
    }

    /// Glow passes followed by the core pass.
    pub fn passes(&self) -> impl Iterator<Item = &BloomPass> + '_ {
        self.glow.iter().chain(std::iter::once(&self.core))
    }
}

/// Blob radius for intensity `t`: sub-linear and clamped to `[min, max]`.
pub fn blob_radius(t: f64, min_radius: f64, max_radius: f64) -> f64 {
    let (lo, hi) = if min_radius <= max_radius {
        (min_radius, max_radius)
    } else {
        (max_radius, min_radius)
    };
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    (lo + (hi - lo) * t.sqrt()).clamp(lo, hi)
}

/// Composite `density` onto `target` once per pass, in order.
///
/// Returns the number of composites performed.
pub fn compose_passes<'a, I>(target: &mut Surface, density: &Surface, passes: I) -> usize
where
    I: IntoIterator<Item = &'a BloomPass>,
{
    let mut count = 0;
    for pass in passes {
        target.composite(density, pass.mode, pass.blur);
        count += 1;
    }
    tracing::debug!(passes = count, "composited density buffer");
    count
}
