//! glyphgram - character n-gram rasterization with a tiered glyph cache
//!
//! Turns a character sequence into fixed-geometry raster strips usable as
//! visual tokens (e.g. for a character-visual embedding pipeline).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            WindowCompositor                  │
//! │  "ABCDEFG" → ["ABCDE", "FG   "] windows      │
//! ├──────────────────────────────────────────────┤
//! │  TieredGlyphCache                            │
//! │    memory map → disk store → rasterize       │
//! │          ↓            ↓           ↓          │
//! │    HashMap      PNG (image)   GlyphCanvas    │
//! │                               (fontdue)      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Each window's characters are resolved individually through the cache,
//! then concatenated left to right into one composite image per window.
//! Cell images are rendered at most once per character per process and
//! persisted once per character when a durable cache directory is set.

pub mod cache;
pub mod config;
pub mod error;
pub mod raster;
pub mod window;

pub use cache::TieredGlyphCache;
pub use config::{CacheConfig, Config, FontConfig, PixelFormat, RasterConfig, WindowConfig};
pub use error::{Error, Result};
pub use raster::engine::{FontRasterizer, GlyphRasterizer, LineMetrics, RasterGlyph};
pub use raster::CellImage;
pub use window::{Window, WindowCompositor};
