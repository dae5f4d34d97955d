//! Error types for the glyph pipeline
//!
//! Construction-time failures (bad configuration, unloadable font) are
//! fatal; cache persistence failures are downgraded to warnings at the
//! call site and never surface through this enum.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in the glyph pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected at construction, never at call time.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Zero-length character sequence passed to the compositor.
    #[error("empty input sequence")]
    EmptyInput,

    /// Font file missing or unparseable. Fatal: the cache cannot be used.
    #[error("failed to load font {path}: {reason}")]
    FontLoad { path: PathBuf, reason: String },

    /// Raster encode/decode failure on the durable cache path.
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be parsed as TOML.
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
