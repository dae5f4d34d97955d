//! End-to-end pipeline tests over a deterministic stub engine.
//!
//! The rasterization engine is a black box to the pipeline, so these tests
//! substitute one with fixed metrics and per-character ink. Everything else
//! (canvas geometry, tiered caching, disk persistence, windowing) is the
//! real code path.

use std::collections::HashSet;
use std::sync::Arc;

use glyphgram::cache::store::config_fingerprint;
use glyphgram::raster::coverage::CoverageChecker;
use glyphgram::{
    CellImage, Config, GlyphRasterizer, LineMetrics, PixelFormat, RasterGlyph, TieredGlyphCache,
    WindowCompositor, WindowConfig,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic engine: each character gets a solid ink box whose width
/// and coverage value derive from the codepoint, so distinct characters
/// produce distinct pixels.
struct StubRaster;

impl GlyphRasterizer for StubRaster {
    fn line_metrics(&self) -> LineMetrics {
        LineMetrics {
            ascent: 8.0,
            descent: -2.0,
        }
    }

    fn rasterize(&self, ch: char) -> RasterGlyph {
        if ch == ' ' {
            return RasterGlyph::empty();
        }
        let width = 2 + (ch as usize % 3); // 2..=4 px
        let height = 6;
        let value = 55 + (ch as u32 % 200) as u8;
        RasterGlyph {
            width,
            height,
            xmin: 0,
            ymin: 0,
            coverage: vec![value; width * height],
        }
    }
}

struct SetCoverage(HashSet<char>);

impl CoverageChecker for SetCoverage {
    fn has_glyph(&self, ch: char) -> Option<bool> {
        Some(self.0.contains(&ch))
    }
}

fn stub_config(chunk: usize, stride: usize, cell_size: Option<u32>) -> Config {
    let mut config = Config::default();
    config.window.chunk = chunk;
    config.window.stride = stride;
    config.raster.cell_size = cell_size;
    config
}

fn stub_cache(config: &Config, fingerprint: u64) -> TieredGlyphCache {
    TieredGlyphCache::with_engine(
        Box::new(StubRaster),
        None,
        &config.raster,
        config.cache.dir.as_deref(),
        fingerprint,
    )
    .unwrap()
}

fn stub_compositor(config: &Config, fingerprint: u64) -> WindowCompositor {
    WindowCompositor::with_cache(stub_cache(config, fingerprint), &config.window).unwrap()
}

#[test]
fn resolve_twice_is_pixel_identical_and_render_free() {
    init_logging();
    let config = stub_config(3, 2, None);
    let mut cache = stub_cache(&config, 0);

    let first = cache.resolve('漢');
    assert_eq!(cache.render_count(), 1);
    let second = cache.resolve('漢');
    assert_eq!(cache.render_count(), 1);
    assert_eq!(*first, *second);
}

#[test]
fn padding_scenario_c5_s4() {
    init_logging();
    let config = stub_config(5, 4, None);
    let mut comp = stub_compositor(&config, 0);

    let windows = comp.compose("ABCDEFG").unwrap();
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].text, "ABCDE");
    assert_eq!(windows[1].text, "FG   ");
    // Cell heights are uniform, including the pad blanks
    assert_eq!(windows[0].image.height(), 10);
    assert_eq!(windows[1].image.height(), 10);
}

#[test]
fn composite_width_is_sum_of_chunk_cells() {
    init_logging();
    let config = stub_config(4, 4, None);
    let mut cache = stub_cache(&config, 0);

    let input = "WXYZ";
    let expected: u32 = input.chars().map(|ch| cache.resolve(ch).width()).sum();

    let mut comp = WindowCompositor::with_cache(cache, &config.window).unwrap();
    let windows = comp.compose(input).unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].image.width(), expected);
}

#[test]
fn fixed_grid_windows_share_identical_width() {
    init_logging();
    let config = stub_config(3, 2, Some(12));
    let mut comp = stub_compositor(&config, 0);

    let windows = comp.compose("hello world").unwrap();
    assert_eq!(windows.len(), 6); // ceil(11 / 2)
    for w in &windows {
        assert_eq!(w.image.width(), 36);
    }
}

#[test]
fn window_starts_follow_the_stride() {
    init_logging();
    let config = stub_config(3, 3, None);
    let mut comp = stub_compositor(&config, 0);

    let windows = comp.compose("ABCDEF").unwrap();
    let texts: Vec<&str> = windows.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(texts, ["ABC", "DEF"]);
}

#[test]
fn empty_input_is_an_error() {
    init_logging();
    let config = stub_config(3, 2, None);
    let mut comp = stub_compositor(&config, 0);
    assert!(matches!(
        comp.compose(""),
        Err(glyphgram::Error::EmptyInput)
    ));
}

#[test]
fn disk_cache_round_trip_without_rerender() {
    init_logging();
    let tmp = tempfile::tempdir().unwrap();
    let mut config = stub_config(2, 2, None);
    config.cache.dir = Some(tmp.path().to_path_buf());

    let first_windows = {
        let mut comp = stub_compositor(&config, 7);
        let windows = comp.compose("AB").unwrap();
        assert_eq!(comp.cache().render_count(), 2);
        windows
    };

    // A fresh compositor over the same directory warm-starts from disk and
    // produces pixel-identical composites with zero renders.
    let mut comp = stub_compositor(&config, 7);
    assert_eq!(comp.cache().len(), 2);
    let windows = comp.compose("AB").unwrap();
    assert_eq!(comp.cache().render_count(), 0);
    assert_eq!(windows[0].image, first_windows[0].image);
}

#[test]
fn stale_cache_from_other_config_is_invisible() {
    init_logging();
    let tmp = tempfile::tempdir().unwrap();
    let mut config = stub_config(2, 2, None);
    config.cache.dir = Some(tmp.path().to_path_buf());

    // Fingerprints derived from differing configurations never collide on
    // the same store directory.
    let gray = config_fingerprint(b"font", 32.0, PixelFormat::Gray8, None);
    let fixed = config_fingerprint(b"font", 32.0, PixelFormat::Gray8, Some(16));
    assert_ne!(gray, fixed);

    {
        let mut comp = stub_compositor(&config, gray);
        comp.compose("AB").unwrap();
    }

    let comp = stub_compositor(&config, fixed);
    assert!(comp.cache().is_empty());
}

#[test]
fn uncovered_character_still_renders_with_one_warning() {
    init_logging();
    let config = stub_config(2, 2, None);
    let covered: HashSet<char> = "ABC".chars().collect();
    let cache = TieredGlyphCache::with_engine(
        Box::new(StubRaster),
        Some(Box::new(SetCoverage(covered))),
        &config.raster,
        None,
        0,
    )
    .unwrap();
    let mut comp = WindowCompositor::with_cache(cache, &config.window).unwrap();

    // 'φ' appears twice but is only rendered (and recorded) once
    let windows = comp.compose("AφBφ").unwrap();
    assert_eq!(windows.len(), 2);
    assert_eq!(comp.cache().missing_glyphs().len(), 1);
    assert!(comp.cache().missing_glyphs().contains(&'φ'));
    // The fallback cell is still a valid raster of full height
    assert!(windows[0].image.height() > 0);
}

#[test]
fn whitespace_cells_do_not_break_concatenation() {
    init_logging();
    let config = stub_config(3, 3, None);
    let mut cache = stub_cache(&config, 0);

    let blank = cache.resolve(' ');
    assert_eq!(blank.width(), 1);
    assert_eq!(blank.height(), 10);
    assert!(blank.is_blank());

    let a = cache.resolve('A');
    let composite = CellImage::hconcat(&[Arc::clone(&a), blank, a]);
    assert_eq!(composite.height(), 10);
}
