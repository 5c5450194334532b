//! PNG export of rendered frames.

use std::path::{Path, PathBuf};

use daymap_common::error::{DaymapError, DaymapResult};
use image::{ImageBuffer, Rgba, RgbaImage};
use serde::Serialize;

use crate::surface::Surface;

/// What was written by [`export_png`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub path: PathBuf,
    /// Backing width in device pixels.
    pub width: u32,
    /// Backing height in device pixels.
    pub height: u32,
    pub signature: String,
}

/// Convert a surface to an 8-bit straight-alpha image.
pub fn to_image(surface: &Surface) -> DaymapResult<RgbaImage> {
    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(surface.width(), surface.height(), surface.to_rgba8())
        .ok_or_else(|| {
            DaymapError::export(format!(
                "pixel buffer does not match {}x{}",
                surface.width(),
                surface.height()
            ))
        })
}

/// 64-bit FNV-1a over the 8-bit pixels, as 16 hex digits.
///
/// Stable across runs for the same frame; used to detect visual changes.
pub fn frame_signature(surface: &Surface) -> String {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = OFFSET;
    for dim in [surface.width(), surface.height()] {
        for byte in dim.to_le_bytes() {
            hash = (hash ^ byte as u64).wrapping_mul(PRIME);
        }
    }
    for byte in surface.to_rgba8() {
        hash = (hash ^ byte as u64).wrapping_mul(PRIME);
    }
    format!("{hash:016x}")
}

/// Write `surface` as a PNG, creating parent directories as needed.
pub fn export_png(surface: &Surface, output_path: &Path) -> DaymapResult<ExportSummary> {
    if surface.width() == 0 || surface.height() == 0 {
        return Err(DaymapError::export("cannot export an empty surface"));
    }
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let image = to_image(surface)?;
    image.save_with_format(output_path, image::ImageFormat::Png)?;

    let summary = ExportSummary {
        path: output_path.to_path_buf(),
        width: surface.width(),
        height: surface.height(),
        signature: frame_signature(surface),
    };
    tracing::info!(
        output = %output_path.display(),
        width = summary.width,
        height = summary.height,
        "exported frame"
    );
    Ok(summary)
}
