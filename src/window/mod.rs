//! Window compositor
//!
//! Slides a fixed-width window over the input character sequence at a fixed
//! stride and concatenates the per-character cell images of each window
//! into one composite raster. This is the pipeline's primary entry point:
//! input text goes in, ordered (window text, composite image) pairs come
//! out.

use std::sync::Arc;

use log::info;

use crate::cache::TieredGlyphCache;
use crate::config::{Config, WindowConfig};
use crate::error::{Error, Result};
use crate::raster::CellImage;

/// Character used to right-pad the final short window, in both the window
/// text and its imagery.
pub const PAD_CHAR: char = ' ';

/// One n-gram window: the exact (padded) character substring and its
/// composite raster.
#[derive(Debug, Clone)]
pub struct Window {
    /// Always exactly `chunk` characters, space-padded at the end
    pub text: String,
    /// Horizontal concatenation of the window's cell images
    pub image: CellImage,
}

/// Fixed-width, fixed-stride window compositor over a tiered glyph cache
pub struct WindowCompositor {
    cache: TieredGlyphCache,
    chunk: usize,
    stride: usize,
}

impl WindowCompositor {
    /// Build the full pipeline from configuration: font load, cache warm
    /// start, parameter validation. All failure modes are construction-time.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let cache = TieredGlyphCache::new(config)?;

        info!(
            "Compositor ready: chunk={}, stride={}, cell_height={}px",
            config.window.chunk,
            config.window.stride,
            cache.cell_height()
        );

        Ok(Self {
            cache,
            chunk: config.window.chunk,
            stride: config.window.stride,
        })
    }

    /// Build over an existing cache (custom engines, tests)
    pub fn with_cache(cache: TieredGlyphCache, window: &WindowConfig) -> Result<Self> {
        window.validate()?;
        Ok(Self {
            cache,
            chunk: window.chunk,
            stride: window.stride,
        })
    }

    /// Transform a character sequence into its ordered window sequence.
    ///
    /// Start indices are `0, s, 2s, ...`, strictly below the input length,
    /// so the window count is `ceil(N / s)`. Only the final window can fall
    /// short of `chunk` characters; it is right-padded with [`PAD_CHAR`] so
    /// every window carries exactly `chunk` cells. Empty input is an error,
    /// not an empty result.
    pub fn compose(&mut self, text: &str) -> Result<Vec<Window>> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut windows = Vec::with_capacity(chars.len().div_ceil(self.stride));
        let mut start = 0usize;
        while start < chars.len() {
            let end = (start + self.chunk).min(chars.len());

            let mut window_text = String::with_capacity(self.chunk);
            let mut cells: Vec<Arc<CellImage>> = Vec::with_capacity(self.chunk);
            for &ch in &chars[start..end] {
                window_text.push(ch);
                cells.push(self.cache.resolve(ch));
            }
            while cells.len() < self.chunk {
                window_text.push(PAD_CHAR);
                cells.push(self.cache.resolve(PAD_CHAR));
            }

            windows.push(Window {
                text: window_text,
                image: CellImage::hconcat(&cells),
            });
            start += self.stride;
        }

        Ok(windows)
    }

    /// The underlying cache (render-count and coverage diagnostics)
    pub fn cache(&self) -> &TieredGlyphCache {
        &self.cache
    }
}
