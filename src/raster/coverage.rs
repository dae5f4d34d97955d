//! Glyph coverage queries
//!
//! Answers "does this font map a codepoint to a glyph?" by consulting the
//! font's cmap character-map tables. Purely diagnostic: a negative answer
//! produces a warning upstream, never an error, and rendering proceeds with
//! the engine's fallback glyph either way.

use std::sync::Arc;

use ttf_parser::Face;

/// Read-only coverage oracle. `None` means the answer is unknown (no usable
/// character map), which callers treat as covered.
pub trait CoverageChecker {
    fn has_glyph(&self, ch: char) -> Option<bool>;
}

/// cmap-backed implementation over the raw font bytes
pub struct CmapCoverage {
    data: Arc<Vec<u8>>,
}

impl CmapCoverage {
    pub fn new(data: Arc<Vec<u8>>) -> Self {
        Self { data }
    }
}

impl CoverageChecker for CmapCoverage {
    fn has_glyph(&self, ch: char) -> Option<bool> {
        // Face::parse is lazy over borrowed bytes; the cache only asks once
        // per distinct character, right before its first render.
        let face = Face::parse(&self.data, 0).ok()?;
        face.tables().cmap.as_ref()?;
        Some(face.glyph_index(ch).is_some())
    }
}
