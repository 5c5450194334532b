//! Software drawing surface.
//!
//! Pixels live in an [`Rgba32FImage`] at device resolution and are stored
//! premultiplied. Every drawing call takes CSS-pixel geometry and scales it by
//! the device pixel ratio, so the layout math stays identical across displays.
//!
//! Shapes go through `imageproc` onto a [`BlendCanvas`], which applies the
//! active [`BlendMode`] per pixel.

use daymap_model::layout::{Rect, SurfaceSize};
use daymap_processing_core::ramp::Rgba;
use image::{imageops, Rgba32FImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, Canvas,
};
use imageproc::filter::gaussian_blur_f32;
use imageproc::rect::Rect as PixelRect;
use rand::Rng;

/// Compositing operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Standard source-over alpha blending.
    SourceOver,
    /// Additive ("lighter"): `dst + src`, saturating.
    Lighter,
    /// Screen: `src + dst - src * dst`.
    Screen,
}

type Px = [f32; 4];

#[inline]
fn premultiply(color: Rgba) -> Px {
    let a = color.a.clamp(0.0, 1.0);
    [color.r * a, color.g * a, color.b * a, a]
}

#[inline]
fn blend(dst: &mut Px, src: Px, mode: BlendMode) {
    match mode {
        BlendMode::SourceOver => {
            let inv = 1.0 - src[3];
            for c in 0..4 {
                dst[c] = src[c] + dst[c] * inv;
            }
        }
        BlendMode::Lighter => {
            for c in 0..4 {
                dst[c] = (dst[c] + src[c]).min(1.0);
            }
        }
        BlendMode::Screen => {
            for c in 0..4 {
                dst[c] = src[c] + dst[c] - src[c] * dst[c];
            }
        }
    }
}

/// `imageproc` canvas that blends instead of overwriting.
struct BlendCanvas<'a> {
    image: &'a mut Rgba32FImage,
    mode: BlendMode,
}

impl Canvas for BlendCanvas<'_> {
    type Pixel = image::Rgba<f32>;

    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn get_pixel(&self, x: u32, y: u32) -> Self::Pixel {
        *self.image.get_pixel(x, y)
    }

    fn draw_pixel(&mut self, x: u32, y: u32, color: Self::Pixel) {
        if let Some(px) = self.image.get_pixel_mut_checked(x, y) {
            blend(&mut px.0, color.0, self.mode);
        }
    }
}

/// RGBA raster with a device pixel ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    size: SurfaceSize,
    image: Rgba32FImage,
}

impl Surface {
    /// A fully transparent surface with a backing buffer of `size`.
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            image: Rgba32FImage::new(size.backing_width(), size.backing_height()),
        }
    }

    /// Backing width in device pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Backing height in device pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn scale(&self) -> f64 {
        self.size.device_scale
    }

    /// Premultiplied pixel at device coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.image.get_pixel_checked(x, y).map(|px| px.0)
    }

    /// Straight-alpha color at a CSS-pixel position.
    pub fn color_at_css(&self, x: f64, y: f64) -> Option<Rgba> {
        let s = self.scale();
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let [r, g, b, a] = self.pixel((x * s).floor() as u32, (y * s).floor() as u32)?;
        if a <= 0.0 {
            return Some(Rgba::TRANSPARENT);
        }
        Some(Rgba::new(r / a, g / a, b / a, a))
    }

    /// Sum of alpha over every pixel; 0 for a blank surface.
    pub fn alpha_sum(&self) -> f64 {
        self.image.pixels().map(|p| p.0[3] as f64).sum()
    }

    pub fn clear(&mut self, color: Rgba) {
        let px = image::Rgba(premultiply(color));
        for p in self.image.pixels_mut() {
            *p = px;
        }
    }

    fn canvas(&mut self, mode: BlendMode) -> BlendCanvas<'_> {
        BlendCanvas {
            image: &mut self.image,
            mode,
        }
    }

    /// Device-pixel span covered by a CSS interval, clipped to `0..limit`.
    fn span(&self, start: f64, len: f64, limit: u32) -> (u32, u32) {
        let s = self.scale();
        let a = (start * s).round().max(0.0) as u32;
        let b = ((start + len) * s).round().max(0.0) as u32;
        (a.min(limit), b.min(limit))
    }

    /// Device-pixel rectangle for a CSS rectangle, `None` when it covers no pixel.
    fn device_rect(&self, rect: Rect) -> Option<PixelRect> {
        let (x0, x1) = self.span(rect.x, rect.w, self.width());
        let (y0, y1) = self.span(rect.y, rect.h, self.height());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelRect::at(x0 as i32, y0 as i32).of_size(x1 - x0, y1 - y0))
    }

    /// Fill a CSS-pixel rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba, mode: BlendMode) {
        let src = premultiply(color);
        if src[3] <= 0.0 {
            return;
        }
        let Some(area) = self.device_rect(rect) else {
            return;
        };
        draw_filled_rect_mut(&mut self.canvas(mode), area, image::Rgba(src));
    }

    /// Outline a CSS-pixel rectangle with an inner stroke of `line_width`.
    pub fn stroke_rect(&mut self, rect: Rect, line_width: f64, color: Rgba) {
        let src = image::Rgba(premultiply(color));
        if src.0[3] <= 0.0 {
            return;
        }
        let Some(outer) = self.device_rect(rect) else {
            return;
        };
        let rings = (line_width * self.scale()).round().max(1.0) as u32;
        let mut canvas = self.canvas(BlendMode::SourceOver);
        for inset in 0..rings {
            let (w, h) = (outer.width(), outer.height());
            if w <= 2 * inset || h <= 2 * inset {
                break;
            }
            let ring = PixelRect::at(outer.left() + inset as i32, outer.top() + inset as i32)
                .of_size(w - 2 * inset, h - 2 * inset);
            draw_hollow_rect_mut(&mut canvas, ring, src);
        }
    }

    /// Horizontal line across `[x0, x1)` centered on `y`.
    pub fn hline(&mut self, y: f64, x0: f64, x1: f64, thickness: f64, color: Rgba) {
        let src = image::Rgba(premultiply(color));
        if src.0[3] <= 0.0 || x1 <= x0 || self.width() == 0 || self.height() == 0 {
            return;
        }
        let s = self.scale();
        let rows = (thickness * s).round().max(1.0) as u32;
        let top = ((y - thickness / 2.0) * s).round() as f32;
        let (left, right) = ((x0 * s) as f32, ((x1 * s) - 1.0) as f32);
        let mut canvas = self.canvas(BlendMode::SourceOver);
        for row in 0..rows {
            let py = top + row as f32;
            draw_line_segment_mut(&mut canvas, (left, py), (right, py), src);
        }
    }

    /// Top-to-bottom gradient over the whole surface, replacing its content.
    pub fn vertical_gradient(&mut self, top: Rgba, bottom: Rgba) {
        let start = image::Rgba(premultiply(top));
        let stop = image::Rgba(premultiply(bottom));
        imageops::vertical_gradient(&mut self.image, &start, &stop);
    }

    /// Radial blob centered at a CSS point with a quadratic alpha falloff.
    pub fn radial_blob(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba, mode: BlendMode) {
        if radius <= 0.0 || color.a <= 0.0 {
            return;
        }
        let s = self.scale();
        let (dcx, dcy, dr) = (cx * s, cy * s, radius * s);
        let x0 = (dcx - dr).floor().max(0.0) as u32;
        let y0 = (dcy - dr).floor().max(0.0) as u32;
        let x1 = ((dcx + dr).ceil().max(0.0) as u32).min(self.width());
        let y1 = ((dcy + dr).ceil().max(0.0) as u32).min(self.height());
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f64 + 0.5 - dcx;
                let dy = y as f64 + 0.5 - dcy;
                let d = (dx * dx + dy * dy).sqrt() / dr;
                if d >= 1.0 {
                    continue;
                }
                let falloff = ((1.0 - d) * (1.0 - d)) as f32;
                let src = premultiply(color.with_alpha(color.a * falloff));
                blend(&mut self.image.get_pixel_mut(x, y).0, src, mode);
            }
        }
    }

    /// Composite `src` onto this surface, optionally blurred by `blur` CSS pixels.
    ///
    /// Both surfaces must share the same backing size; anything else is
    /// ignored and logged.
    pub fn composite(&mut self, src: &Surface, mode: BlendMode, blur: f64) {
        if src.image.dimensions() != self.image.dimensions() {
            tracing::warn!(
                src_w = src.width(),
                src_h = src.height(),
                dst_w = self.width(),
                dst_h = self.height(),
                "skipping composite of mismatched surfaces"
            );
            return;
        }
        let sigma = (blur * self.scale()) as f32;
        let blurred;
        let source = if sigma > 0.0 {
            blurred = src.blurred(sigma);
            &blurred.image
        } else {
            &src.image
        };
        for (dst, s) in self.image.pixels_mut().zip(source.pixels()) {
            blend(&mut dst.0, s.0, mode);
        }
    }

    /// Gaussian-blurred copy with standard deviation `sigma` device pixels.
    pub fn blurred(&self, sigma: f32) -> Surface {
        if !(sigma > 0.0) || self.width() == 0 || self.height() == 0 {
            return self.clone();
        }
        Surface {
            size: self.size,
            image: gaussian_blur_f32(&self.image, sigma),
        }
    }

    /// Darken color channels toward the edges.
    ///
    /// `strength` is the darkening at the corners; the inner `inner` fraction
    /// of the half-diagonal is left untouched.
    pub fn vignette(&mut self, strength: f32, inner: f32) {
        let (w, h) = (self.width() as f32, self.height() as f32);
        let (cx, cy) = (w / 2.0, h / 2.0);
        let half_diag = (cx * cx + cy * cy).sqrt().max(1.0);
        let inner = inner.clamp(0.0, 0.99);
        let strength = strength.clamp(0.0, 1.0);
        for (x, y, px) in self.image.enumerate_pixels_mut() {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt() / half_diag;
            let t = ((d - inner) / (1.0 - inner)).clamp(0.0, 1.0);
            let factor = 1.0 - strength * t * t * (3.0 - 2.0 * t);
            for c in 0..3 {
                px.0[c] *= factor;
            }
        }
    }

    /// Nudge the brightness of `budget` randomly chosen pixels by up to
    /// `amplitude`. Only painted pixels are touched.
    pub fn jitter<R: Rng>(&mut self, budget: usize, amplitude: f32, rng: &mut R) -> usize {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 || amplitude <= 0.0 {
            return 0;
        }
        let mut touched = 0;
        for _ in 0..budget {
            let x = rng.random_range(0..w);
            let y = rng.random_range(0..h);
            let delta = rng.random_range(-amplitude..=amplitude);
            let px = &mut self.image.get_pixel_mut(x, y).0;
            if px[3] <= 0.0 {
                continue;
            }
            for c in 0..3 {
                px[c] = (px[c] + delta * px[3]).clamp(0.0, px[3]);
            }
            touched += 1;
        }
        touched
    }

    /// Straight-alpha RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.image.as_raw().len());
        for &image::Rgba([r, g, b, a]) in self.image.pixels() {
            let color = if a > 0.0 {
                Rgba::new(r / a, g / a, b / a, a)
            } else {
                Rgba::TRANSPARENT
            };
            out.extend_from_slice(&color.to_rgba8());
        }
        out
    }
}
