//! Configuration management
//!
//! Loads TOML configuration files and validates pipeline parameters.
//! Default config path: ~/.config/glyphgram/config.toml

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use crate::raster::PixelFormat;

/// Pipeline settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Font settings
    pub font: FontConfig,
    /// Raster geometry settings
    pub raster: RasterConfig,
    /// Window (n-gram) settings
    pub window: WindowConfig,
    /// Durable cache settings
    pub cache: CacheConfig,
}

/// Font settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Path to a TTF/OTF font file
    pub path: PathBuf,
    /// Font size in pixels
    pub size: f32,
}

/// Raster geometry settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Pixel format: "1" (1-bit), "L" (8-bit grayscale) or "RGB" (24-bit)
    pub format: PixelFormat,
    /// Fixed cell width in pixels. When absent, each cell is as wide as
    /// the glyph's ink bounding box (variable-width geometry).
    pub cell_size: Option<u32>,
}

/// Window (n-gram) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Characters per window (chunk size c, >= 1)
    pub chunk: usize,
    /// Step between window start indices (stride s, 1 <= s <= c).
    /// s = 1 gives maximum overlap, s = c gives none.
    pub stride: usize,
}

/// Durable cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Durable cache directory. None disables the disk tier.
    pub dir: Option<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            size: 32.0,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            chunk: 3,
            stride: 2,
        }
    }
}

impl WindowConfig {
    /// Chunk must be positive and the stride within [1, chunk]
    pub fn validate(&self) -> Result<()> {
        if self.chunk < 1 {
            return Err(Error::InvalidConfig(format!(
                "chunk size must be >= 1 (got {})",
                self.chunk
            )));
        }
        if self.stride < 1 || self.stride > self.chunk {
            return Err(Error::InvalidConfig(format!(
                "stride must be in [1, {}] (got {})",
                self.chunk, self.stride
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration with priority:
    /// 1. GLYPHGRAM_CONFIG environment variable
    /// 2. ~/.config/glyphgram/config.toml (user config)
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Get the path that would be used for loading config.
    /// Returns None if using built-in defaults.
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("GLYPHGRAM_CONFIG") {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("glyphgram").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }
        }

        None
    }

    /// Load settings from the specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// Check parameter ranges. Called by the compositor constructor so
    /// invalid settings fail fast, never at compose time.
    pub fn validate(&self) -> Result<()> {
        self.window.validate()?;
        if !self.font.size.is_finite() || self.font.size <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "font size must be a positive number of pixels (got {})",
                self.font.size
            )));
        }
        if self.raster.cell_size == Some(0) {
            return Err(Error::InvalidConfig(
                "fixed cell size must be >= 1 pixel".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default durable cache directory (~/.cache/glyphgram on Linux)
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("glyphgram"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_stride_bounds() {
        let mut config = Config::default();
        config.window.chunk = 5;

        config.window.stride = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        config.window.stride = 6;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        config.window.stride = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chunk_must_be_positive() {
        let mut config = Config::default();
        config.window.chunk = 0;
        config.window.stride = 1;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_font_size_must_be_positive() {
        let mut config = Config::default();
        config.font.size = 0.0;
        assert!(config.validate().is_err());
        config.font.size = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_cell_size_rejected() {
        let mut config = Config::default();
        config.raster.cell_size = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pil_mode_aliases() {
        let config: Config = toml::from_str(
            r#"
            [font]
            path = "fonts/NotoSansMono.ttf"
            size = 32.0

            [raster]
            format = "L"
            cell_size = 16

            [window]
            chunk = 5
            stride = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.raster.format, PixelFormat::Gray8);
        assert_eq!(config.raster.cell_size, Some(16));
        assert_eq!(config.window.chunk, 5);

        let config: Config = toml::from_str("[raster]\nformat = \"1\"\n").unwrap();
        assert_eq!(config.raster.format, PixelFormat::Mono1);
        let config: Config = toml::from_str("[raster]\nformat = \"RGB\"\n").unwrap();
        assert_eq!(config.raster.format, PixelFormat::Rgb24);
    }
}
