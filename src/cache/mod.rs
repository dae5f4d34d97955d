//! Tiered glyph cache
//!
//! Resolves a character to its cell image with at most one render per
//! character per process: memory first, then the durable disk store, then
//! the rasterizer. Newly rendered glyphs are persisted best-effort; a disk
//! failure never loses the in-memory result.

pub mod store;

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::{Config, RasterConfig};
use crate::error::Result;
use crate::raster::canvas::GlyphCanvasBuilder;
use crate::raster::coverage::{CmapCoverage, CoverageChecker};
use crate::raster::engine::{FontRasterizer, GlyphRasterizer};
use crate::raster::CellImage;
use store::DiskStore;

/// Character → cell image cache with an optional durable tier.
///
/// Unbounded and append-only: the character alphabet is small relative to
/// the corpora this feeds, so nothing is ever evicted.
pub struct TieredGlyphCache {
    rasterizer: Box<dyn GlyphRasterizer>,
    coverage: Option<Box<dyn CoverageChecker>>,
    builder: GlyphCanvasBuilder,
    cells: HashMap<char, Arc<CellImage>>,
    disk: Option<DiskStore>,
    renders: usize,
    missing: BTreeSet<char>,
}

impl TieredGlyphCache {
    /// Build the production cache: fontdue rasterizer, cmap coverage, and
    /// (if configured) a durable store namespaced by the configuration
    /// fingerprint.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let rasterizer = FontRasterizer::from_file(&config.font.path, config.font.size)?;
        let font_data = rasterizer.font_data();
        let fingerprint = store::config_fingerprint(
            &font_data,
            config.font.size,
            config.raster.format,
            config.raster.cell_size,
        );
        let coverage: Box<dyn CoverageChecker> = Box::new(CmapCoverage::new(font_data));

        Self::with_engine(
            Box::new(rasterizer),
            Some(coverage),
            &config.raster,
            config.cache.dir.as_deref(),
            fingerprint,
        )
    }

    /// Build a cache over a custom rasterization engine. `fingerprint`
    /// namespaces the durable store; callers that reuse a directory across
    /// processes must pass the same value for the same configuration.
    pub fn with_engine(
        rasterizer: Box<dyn GlyphRasterizer>,
        coverage: Option<Box<dyn CoverageChecker>>,
        raster: &RasterConfig,
        cache_dir: Option<&Path>,
        fingerprint: u64,
    ) -> Result<Self> {
        let builder =
            GlyphCanvasBuilder::new(raster.format, raster.cell_size, rasterizer.line_metrics());

        let disk = match cache_dir {
            Some(dir) => Some(DiskStore::open(dir, fingerprint, raster.format)?),
            None => None,
        };

        // Warm start: everything already on disk goes straight to memory,
        // so previously seen characters never probe the disk again.
        let mut cells = HashMap::new();
        if let Some(disk) = &disk {
            for (ch, cell) in disk.load_all()? {
                cells.insert(ch, Arc::new(cell));
            }
            info!(
                "Glyph cache warm start: {} entries from {}",
                cells.len(),
                disk.dir().display()
            );
        }

        Ok(Self {
            rasterizer,
            coverage,
            builder,
            cells,
            disk,
            renders: 0,
            missing: BTreeSet::new(),
        })
    }

    /// Resolve a character to its cell image.
    ///
    /// Memory, then disk, then render. Repeated calls return the same
    /// pixels and never re-render once memory is populated. Infallible:
    /// disk problems degrade to warnings and rendering is pure.
    pub fn resolve(&mut self, ch: char) -> Arc<CellImage> {
        if let Some(cell) = self.cells.get(&ch) {
            return Arc::clone(cell);
        }

        if let Some(disk) = &self.disk {
            match disk.load(ch) {
                Ok(Some(cell)) => {
                    let cell = Arc::new(cell);
                    self.cells.insert(ch, Arc::clone(&cell));
                    return cell;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Failed to read cached glyph for U+{:04X}: {}", ch as u32, e);
                }
            }
        }

        // Diagnostic only: a miss warns once, the render proceeds with
        // whatever fallback the engine substitutes.
        if let Some(coverage) = &self.coverage {
            if coverage.has_glyph(ch) == Some(false) {
                warn!("Warning: U+{:04X} '{}' misses glyph", ch as u32, ch);
                self.missing.insert(ch);
            }
        }

        let cell = Arc::new(self.builder.build(ch, self.rasterizer.as_ref()));
        self.renders += 1;
        debug!(
            "Rendered U+{:04X} '{}': {}x{}",
            ch as u32,
            ch,
            cell.width(),
            cell.height()
        );

        if let Some(disk) = &self.disk {
            // Best-effort persistence: the in-memory result stands either way
            if let Err(e) = disk.save(ch, &cell) {
                warn!("Failed to persist glyph for U+{:04X}: {}", ch as u32, e);
            }
        }

        self.cells.insert(ch, Arc::clone(&cell));
        cell
    }

    /// Row height shared by every cell this cache produces
    pub fn cell_height(&self) -> u32 {
        self.builder.cell_height()
    }

    /// How many rasterizations have happened in this process
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Number of cached characters (memory tier)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Characters the font's character map reported no glyph for
    pub fn missing_glyphs(&self) -> &BTreeSet<char> {
        &self.missing
    }
}
