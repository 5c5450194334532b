//! Color ramps: per-day counts to visual tokens.
//!
//! Two policies share the [`ColorRamp`] trait:
//! - [`DiscreteRamp`] sorts counts into five fixed buckets. The top bucket
//!   starts at 4, so a handful of extreme days cannot wash out the rest.
//! - [`ContinuousRamp`] normalizes against the density maximum and blends
//!   from a cold hue to a hot hue, with opacity rising from zero.

use serde::Serialize;

/// Straight-alpha RGBA color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Color from hue (degrees), saturation and lightness in `[0, 1]`.
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);
        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        Self::new(
            (r + m) as f32,
            (g + m) as f32,
            (b + m) as f32,
            alpha.clamp(0.0, 1.0) as f32,
        )
    }

    /// Channels as 8-bit values.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// A pure mapping from `(count, max)` to a visual token.
pub trait ColorRamp {
    type Token;

    fn token(&self, count: u32, max: u32) -> Self::Token;
}

/// `count / max` clamped to `[0, 1]`, with `max` floor-clamped to 1.
///
/// Returns exactly `1.0` whenever `count >= max`.
pub fn normalized(count: u32, max: u32) -> f64 {
    let max = max.max(1);
    if count >= max {
        return 1.0;
    }
    (count as f64 / max as f64).clamp(0.0, 1.0)
}

/// Discrete density tiers, ordered from empty to max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Empty,
    Low,
    Mid,
    High,
    Max,
}

impl Bucket {
    /// All buckets in ascending order, for legends.
    pub const ALL: [Bucket; 5] = [
        Bucket::Empty,
        Bucket::Low,
        Bucket::Mid,
        Bucket::High,
        Bucket::Max,
    ];

    /// Bucket for a raw count.
    pub fn for_count(count: u32) -> Self {
        match count {
            0 => Bucket::Empty,
            1 => Bucket::Low,
            2 => Bucket::Mid,
            3 => Bucket::High,
            _ => Bucket::Max,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Smallest count that lands in this bucket.
    pub fn min_count(self) -> u32 {
        self as u32
    }
}

/// Bucket plus the color it is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketToken {
    pub bucket: Bucket,
    pub color: Rgba,
}

/// Five-bucket ramp. The normalization bound is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteRamp {
    palette: [Rgba; 5],
}

impl Default for DiscreteRamp {
    fn default() -> Self {
        Self {
            palette: [
                Rgba::from_rgb8(0x23, 0x27, 0x2e),
                Rgba::from_rgb8(0x0e, 0x44, 0x29),
                Rgba::from_rgb8(0x00, 0x6d, 0x32),
                Rgba::from_rgb8(0x26, 0xa6, 0x41),
                Rgba::from_rgb8(0x39, 0xd3, 0x53),
            ],
        }
    }
}

impl DiscreteRamp {
    pub fn with_palette(palette: [Rgba; 5]) -> Self {
        Self { palette }
    }

    pub fn color(&self, bucket: Bucket) -> Rgba {
        self.palette[bucket.index()]
    }

    /// `(bucket, color)` pairs in ascending order.
    pub fn legend(&self) -> Vec<BucketToken> {
        Bucket::ALL
            .iter()
            .map(|&bucket| BucketToken {
                bucket,
                color: self.color(bucket),
            })
            .collect()
    }
}

impl ColorRamp for DiscreteRamp {
    type Token = BucketToken;

    fn token(&self, count: u32, _max: u32) -> BucketToken {
        let bucket = Bucket::for_count(count);
        BucketToken {
            bucket,
            color: self.color(bucket),
        }
    }
}

/// Continuous heat token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatToken {
    /// Normalized intensity in `[0, 1]`.
    pub t: f64,
    /// Blob color; alpha is 0 exactly when `t` is 0.
    pub color: Rgba,
}

/// Cold-to-hot ramp over a fixed hue range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousRamp {
    /// Hue at `t = 0` (degrees).
    pub cold_hue: f64,
    /// Hue at `t = 1` (degrees).
    pub hot_hue: f64,
    /// Opacity at `t = 1`.
    pub max_alpha: f64,
}

impl Default for ContinuousRamp {
    fn default() -> Self {
        Self {
            cold_hue: 220.0,
            hot_hue: 18.0,
            max_alpha: 1.0,
        }
    }
}

impl ContinuousRamp {
    /// Color for an already-normalized intensity.
    pub fn color_at(&self, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 {
            return Rgba::TRANSPARENT;
        }
        let hue = self.cold_hue + (self.hot_hue - self.cold_hue) * t;
        let lightness = 0.45 + 0.15 * t;
        let alpha = self.max_alpha * t.sqrt();
        Rgba::from_hsl(hue, 0.9, lightness, alpha)
    }
}

impl ColorRamp for ContinuousRamp {
    type Token = HeatToken;

    fn token(&self, count: u32, max: u32) -> HeatToken {
        let t = normalized(count, max);
        HeatToken {
            t,
            color: self.color_at(t),
        }
    }
}
