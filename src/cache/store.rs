//! Durable glyph store
//!
//! One PNG per cached character, named by zero-padded uppercase hex
//! codepoint (`U+0041.png`). The store directory is namespaced by a
//! fingerprint of the rendering configuration, so a cache populated under a
//! different font, size, format or geometry is never mistaken for valid.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbImage};
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::raster::{CellImage, PixelFormat};

/// Cached glyph filename for a character: `U+0041.png`
pub fn glyph_filename(ch: char) -> String {
    format!("U+{:04X}.png", ch as u32)
}

/// Inverse of [`glyph_filename`]. Accepts any hex run between `U+` and
/// `.png` so astral-plane codepoints (5-6 digits) round-trip too.
pub fn parse_glyph_filename(name: &str) -> Option<char> {
    let hex = name.strip_prefix("U+")?.strip_suffix(".png")?;
    if hex.is_empty() {
        return None;
    }
    let codepoint = u32::from_str_radix(hex, 16).ok()?;
    char::from_u32(codepoint)
}

/// 64-bit fingerprint of everything that shapes cell pixels. Two stores
/// share a directory only if font bytes, size, pixel format and geometry
/// policy all match.
pub fn config_fingerprint(
    font_data: &[u8],
    size: f32,
    format: PixelFormat,
    cell_size: Option<u32>,
) -> u64 {
    let mut hasher = DefaultHasher::new();
    font_data.hash(&mut hasher);
    size.to_bits().hash(&mut hasher);
    format.hash(&mut hasher);
    cell_size.hash(&mut hasher);
    hasher.finish()
}

/// Filesystem tier of the glyph cache
pub struct DiskStore {
    dir: PathBuf,
    format: PixelFormat,
}

impl DiskStore {
    /// Open (creating if absent) the fingerprint-namespaced store under
    /// `base`.
    pub fn open(base: &Path, fingerprint: u64, format: PixelFormat) -> Result<Self> {
        let dir = base.join(format!("{fingerprint:016x}"));
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, format })
    }

    /// Namespaced store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Decode the cached cell for `ch`, if one exists on disk
    pub fn load(&self, ch: char) -> Result<Option<CellImage>> {
        let path = self.dir.join(glyph_filename(ch));
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(self.decode(&path)?))
    }

    /// Persist one cell under its codepoint filename
    pub fn save(&self, ch: char, cell: &CellImage) -> Result<()> {
        let path = self.dir.join(glyph_filename(ch));
        self.encode(cell)?.save(&path)?;
        Ok(())
    }

    /// Scan the store once, decoding every validly named entry.
    /// Files that don't match the naming convention are skipped; an entry
    /// that fails to decode is dropped with a warning (it will simply be
    /// re-rendered on demand).
    pub fn load_all(&self) -> Result<Vec<(char, CellImage)>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(ch) = name.to_str().and_then(parse_glyph_filename) else {
                debug!("Skipping non-glyph file: {:?}", name);
                continue;
            };
            match self.decode(&entry.path()) {
                Ok(cell) => entries.push((ch, cell)),
                Err(e) => warn!("Dropping undecodable cache entry {:?}: {}", name, e),
            }
        }
        Ok(entries)
    }

    fn decode(&self, path: &Path) -> Result<CellImage> {
        let img = image::open(path)?;
        let cell = match self.format {
            PixelFormat::Gray8 => {
                let gray = img.into_luma8();
                CellImage::from_samples(
                    PixelFormat::Gray8,
                    gray.width(),
                    gray.height(),
                    gray.into_raw(),
                )
            }
            PixelFormat::Mono1 => {
                // Stored as 0/255 grayscale; any non-zero sample is ink
                let gray = img.into_luma8();
                let (w, h) = (gray.width(), gray.height());
                let samples = gray.into_raw().iter().map(|&s| u8::from(s != 0)).collect();
                CellImage::from_samples(PixelFormat::Mono1, w, h, samples)
            }
            PixelFormat::Rgb24 => {
                let rgb = img.into_rgb8();
                CellImage::from_samples(
                    PixelFormat::Rgb24,
                    rgb.width(),
                    rgb.height(),
                    rgb.into_raw(),
                )
            }
        };
        Ok(cell)
    }

    fn encode(&self, cell: &CellImage) -> Result<DynamicImage> {
        let (w, h) = (cell.width(), cell.height());
        let img = match self.format {
            PixelFormat::Gray8 => {
                let buf = GrayImage::from_raw(w, h, cell.samples().to_vec())
                    .ok_or_else(invalid_buffer)?;
                DynamicImage::ImageLuma8(buf)
            }
            PixelFormat::Mono1 => {
                // Scale 0/1 samples to 0/255 so the PNG is viewable and the
                // decode threshold restores them exactly
                let samples: Vec<u8> = cell.samples().iter().map(|&s| s * 255).collect();
                let buf = GrayImage::from_raw(w, h, samples).ok_or_else(invalid_buffer)?;
                DynamicImage::ImageLuma8(buf)
            }
            PixelFormat::Rgb24 => {
                let buf = RgbImage::from_raw(w, h, cell.samples().to_vec())
                    .ok_or_else(invalid_buffer)?;
                DynamicImage::ImageRgb8(buf)
            }
        };
        Ok(img)
    }
}

fn invalid_buffer() -> Error {
    Error::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        "cell sample buffer does not match its dimensions",
    ))
}
