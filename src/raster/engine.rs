//! Glyph rasterization engine
//!
//! The rasterizer is a black box to the rest of the pipeline: it reports
//! line metrics and draws one glyph into a tight coverage bitmap. The
//! production implementation wraps fontdue; tests substitute deterministic
//! stubs through the same trait.

use std::path::Path;
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use log::info;

use crate::error::{Error, Result};

/// Vertical font metrics, fixed for a given font+size
#[derive(Debug, Clone, Copy)]
pub struct LineMetrics {
    /// Height above the baseline (positive)
    pub ascent: f32,
    /// Depth below the baseline (negative or zero)
    pub descent: f32,
}

impl LineMetrics {
    /// Canvas height shared by every cell of this configuration
    pub fn cell_height(&self) -> u32 {
        (self.ascent - self.descent).ceil().max(1.0) as u32
    }

    /// Baseline row measured from the canvas top
    pub fn baseline(&self) -> i32 {
        self.ascent.round() as i32
    }
}

/// One rasterized glyph: a tight ink bounding box plus 8-bit coverage.
///
/// `xmin`/`ymin` follow fontdue conventions: horizontal offset of the left
/// ink edge from the pen position, and signed offset of the bitmap bottom
/// from the baseline (negative for descenders).
#[derive(Debug, Clone)]
pub struct RasterGlyph {
    pub width: usize,
    pub height: usize,
    pub xmin: i32,
    pub ymin: i32,
    /// Row-major coverage, one byte per pixel, `width * height` long
    pub coverage: Vec<u8>,
}

impl RasterGlyph {
    /// Glyph with no ink (whitespace, control characters)
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            xmin: 0,
            ymin: 0,
            coverage: Vec::new(),
        }
    }
}

/// Black-box rasterization interface
pub trait GlyphRasterizer {
    /// Fixed vertical metrics for this font+size
    fn line_metrics(&self) -> LineMetrics;

    /// Draw one character. Characters without outlines return an empty
    /// bounding box; unknown characters return whatever fallback glyph
    /// the engine substitutes.
    fn rasterize(&self, ch: char) -> RasterGlyph;
}

/// fontdue-backed rasterizer, loaded once from a font file
pub struct FontRasterizer {
    font: Font,
    data: Arc<Vec<u8>>,
    size: f32,
    metrics: LineMetrics,
}

impl FontRasterizer {
    /// Load a TTF/OTF file. Fatal if the file is missing, unparseable, or
    /// carries no horizontal line metrics.
    pub fn from_file(path: &Path, size: f32) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| Error::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(data, size).map_err(|e| match e {
            Error::FontLoad { reason, .. } => Error::FontLoad {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    /// Load from raw font bytes
    pub fn from_bytes(data: Vec<u8>, size: f32) -> Result<Self> {
        let data = Arc::new(data);
        // `from_file` rewrites the placeholder path with the real one.
        let font =
            Font::from_bytes(data.as_slice(), FontSettings::default()).map_err(|e| {
                Error::FontLoad {
                    path: "<memory>".into(),
                    reason: e.to_string(),
                }
            })?;

        let lm = font
            .horizontal_line_metrics(size)
            .ok_or_else(|| Error::FontLoad {
                path: "<memory>".into(),
                reason: "font has no horizontal line metrics".to_string(),
            })?;

        let metrics = LineMetrics {
            ascent: lm.ascent,
            descent: lm.descent,
        };

        info!(
            "Font loaded: size={}px, ascent={:.1}, descent={:.1}",
            size, metrics.ascent, metrics.descent
        );

        Ok(Self {
            font,
            data,
            size,
            metrics,
        })
    }

    /// Raw font bytes (for coverage queries and cache fingerprinting)
    pub fn font_data(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.data)
    }

    /// Configured size in pixels
    pub fn size(&self) -> f32 {
        self.size
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn line_metrics(&self) -> LineMetrics {
        self.metrics
    }

    fn rasterize(&self, ch: char) -> RasterGlyph {
        let (m, coverage) = self.font.rasterize(ch, self.size);
        RasterGlyph {
            width: m.width,
            height: m.height,
            xmin: m.xmin,
            ymin: m.ymin,
            coverage,
        }
    }
}
