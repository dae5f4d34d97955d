//! Raster primitives and glyph rendering
//!
//! Handles:
//! - Pixel formats (1-bit, 8-bit grayscale, 24-bit RGB)
//! - Cell images (canonical per-character rasters) and concatenation
//! - Glyph rasterization (fontdue behind the GlyphRasterizer trait)
//! - cmap coverage queries (ttf-parser)

pub mod canvas;
pub mod coverage;
pub mod engine;

pub use canvas::GlyphCanvasBuilder;
pub use coverage::{CmapCoverage, CoverageChecker};
pub use engine::{FontRasterizer, GlyphRasterizer, LineMetrics, RasterGlyph};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Pixel format of a cell image.
///
/// Serde names follow the original PIL-style mode strings ("1", "L", "RGB")
/// so config files stay interchangeable with the reference tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 1-bit black/white, one sample per pixel with values 0 or 1
    #[serde(rename = "1", alias = "mono")]
    Mono1,
    /// 8-bit grayscale
    #[default]
    #[serde(rename = "L", alias = "gray", alias = "grayscale")]
    Gray8,
    /// 24-bit color, three samples per pixel
    #[serde(rename = "RGB", alias = "rgb")]
    Rgb24,
}

impl PixelFormat {
    /// Samples (bytes) per pixel
    pub fn samples_per_pixel(self) -> usize {
        match self {
            PixelFormat::Mono1 | PixelFormat::Gray8 => 1,
            PixelFormat::Rgb24 => 3,
        }
    }

    /// Maximum sample value: ink is drawn at this value, background at 0
    pub fn max_value(self) -> u8 {
        match self {
            PixelFormat::Mono1 => 1,
            PixelFormat::Gray8 | PixelFormat::Rgb24 => 255,
        }
    }
}

/// One rendered character cell: a row-major raster with a fixed height for
/// a given font+size configuration. Immutable once created; the cache hands
/// out `Arc<CellImage>` so composites can read without copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellImage {
    format: PixelFormat,
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl CellImage {
    /// All-background cell of the given geometry
    pub fn blank(format: PixelFormat, width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * format.samples_per_pixel();
        Self {
            format,
            width,
            height,
            samples: vec![0u8; len],
        }
    }

    /// Wrap an existing row-major sample buffer
    pub fn from_samples(format: PixelFormat, width: u32, height: u32, samples: Vec<u8>) -> Self {
        debug_assert_eq!(
            samples.len(),
            width as usize * height as usize * format.samples_per_pixel()
        );
        Self {
            format,
            width,
            height,
            samples,
        }
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major samples, `samples_per_pixel` bytes per pixel
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// One row of samples
    pub fn row(&self, y: u32) -> &[u8] {
        let spp = self.format.samples_per_pixel();
        let stride = self.width as usize * spp;
        let start = y as usize * stride;
        &self.samples[start..start + stride]
    }

    /// True if every sample is background (0)
    pub fn is_blank(&self) -> bool {
        self.samples.iter().all(|&s| s == 0)
    }

    /// Concatenate cells left to right into one composite raster.
    ///
    /// All parts share the same height and format within one cache, so the
    /// composite height is the common cell height and its width is the sum
    /// of the part widths. Zero-width parts contribute nothing but are
    /// permitted.
    pub fn hconcat(parts: &[Arc<CellImage>]) -> CellImage {
        debug_assert!(!parts.is_empty());
        let height = parts[0].height;
        let format = parts[0].format;
        debug_assert!(parts.iter().all(|p| p.height == height && p.format == format));

        let total_width: u32 = parts.iter().map(|p| p.width).sum();
        let spp = format.samples_per_pixel();
        let out_stride = total_width as usize * spp;
        let mut samples = vec![0u8; out_stride * height as usize];

        let mut x_offset = 0usize;
        for part in parts {
            let part_stride = part.width as usize * spp;
            for y in 0..height {
                let dst_start = y as usize * out_stride + x_offset * spp;
                samples[dst_start..dst_start + part_stride].copy_from_slice(part.row(y));
            }
            x_offset += part.width as usize;
        }

        CellImage::from_samples(format, total_width, height, samples)
    }
}
