//! Glyph canvas builder
//!
//! Renders exactly one character into a canonical cell image. Canvas height
//! is the font's ascent+descent so every cell of a configuration shares one
//! row height; canvas width is either the glyph's ink bounding-box width or
//! a caller-supplied fixed cell size. All glyphs are placed on a common
//! baseline row. Pure function of (character, rasterizer, config).

use crate::raster::engine::{GlyphRasterizer, LineMetrics};
use crate::raster::{CellImage, PixelFormat};

/// Coverage at or above this becomes ink in 1-bit output
const MONO_THRESHOLD: u8 = 128;

/// Renders characters into fixed-geometry cells
#[derive(Debug, Clone, Copy)]
pub struct GlyphCanvasBuilder {
    format: PixelFormat,
    /// Fixed cell width; None selects glyph-derived (variable) width
    cell_size: Option<u32>,
    metrics: LineMetrics,
}

impl GlyphCanvasBuilder {
    pub fn new(format: PixelFormat, cell_size: Option<u32>, metrics: LineMetrics) -> Self {
        Self {
            format,
            cell_size,
            metrics,
        }
    }

    /// Row height shared by every cell this builder produces
    pub fn cell_height(&self) -> u32 {
        self.metrics.cell_height()
    }

    /// Render one character into a cell.
    ///
    /// An empty ink bounding box (whitespace) still yields a valid cell:
    /// full line-metric height and a minimum width of 1 pixel, so
    /// downstream concatenation never sees a degenerate raster.
    pub fn build(&self, ch: char, rasterizer: &dyn GlyphRasterizer) -> CellImage {
        let glyph = rasterizer.rasterize(ch);

        let height = self.metrics.cell_height();
        let width = match self.cell_size {
            Some(w) => w,
            None => (glyph.width as u32).max(1),
        };

        let spp = self.format.samples_per_pixel();
        let stride = width as usize * spp;
        let mut samples = vec![0u8; stride * height as usize];

        // Leftmost ink lands at x = 0; the glyph top sits at
        // baseline - (ink height + ymin) so all cells share a baseline.
        let y0 = self.metrics.baseline() - (glyph.height as i32 + glyph.ymin);

        for gy in 0..glyph.height {
            let cy = y0 + gy as i32;
            if cy < 0 || cy >= height as i32 {
                continue; // clip rows that fall outside the canvas
            }
            for gx in 0..glyph.width {
                if gx as u32 >= width {
                    break; // clip columns in fixed-grid mode
                }
                let coverage = glyph.coverage[gy * glyph.width + gx];
                if coverage == 0 {
                    continue;
                }
                let dst = cy as usize * stride + gx * spp;
                match self.format {
                    PixelFormat::Gray8 => samples[dst] = coverage,
                    PixelFormat::Mono1 => {
                        if coverage >= MONO_THRESHOLD {
                            samples[dst] = 1;
                        }
                    }
                    PixelFormat::Rgb24 => {
                        samples[dst] = coverage;
                        samples[dst + 1] = coverage;
                        samples[dst + 2] = coverage;
                    }
                }
            }
        }

        CellImage::from_samples(self.format, width, height, samples)
    }
}
