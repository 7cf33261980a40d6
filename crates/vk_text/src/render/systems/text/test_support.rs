//! Synthetic monospace glyph source for tests

use nalgebra::Vector2;

use crate::core::config::TextConfig;

use super::error::{FontError, FontResult};
use super::metrics::{GlyphMetric, GlyphMetrics};
use super::rasterizer::{GlyphSource, RasterizedGlyph};

/// Base pixel height of the synthetic font
pub const BASE_HEIGHT: f32 = 64.0;
/// Advance of every printable glyph at the base height
pub const CHAR_ADVANCE: f32 = 32.0;
/// Advance of the space at the base height
pub const SPACE_ADVANCE: f32 = 16.0;
/// Bitmap size of every printable glyph
pub const GLYPH_SIZE: (u32, u32) = (24, 32);
/// Left bearing of every printable glyph
pub const GLYPH_BEARING_X: f32 = 4.0;

/// Every glyph is a 24x32 box sitting on the baseline
#[derive(Debug, Default)]
pub struct MonospaceSource {
    undefined: Vec<char>,
    failing: Option<char>,
}

impl MonospaceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the font has no glyph for `chars`
    pub fn without(mut self, chars: &[char]) -> Self {
        self.undefined.extend_from_slice(chars);
        self
    }

    /// Make rasterizing `ch` fail
    pub fn failing_on(mut self, ch: char) -> Self {
        self.failing = Some(ch);
        self
    }
}

#[allow(clippy::cast_possible_truncation)]
impl GlyphSource for MonospaceSource {
    fn pixel_height(&self) -> f32 {
        BASE_HEIGHT
    }

    fn defines(&self, ch: char) -> bool {
        !self.undefined.contains(&ch)
    }

    fn rasterize(&self, ch: char) -> FontResult<RasterizedGlyph> {
        if self.failing == Some(ch) {
            return Err(FontError::Rasterize(ch, "synthetic failure".to_string()));
        }

        if ch.is_whitespace() {
            return Ok(RasterizedGlyph {
                metric: GlyphMetric::new(Vector2::new(0, 0), Vector2::new(0, 0), (SPACE_ADVANCE * 64.0) as i64),
                bitmap: Vec::new(),
            });
        }

        let (width, height) = GLYPH_SIZE;
        Ok(RasterizedGlyph {
            metric: GlyphMetric::new(
                Vector2::new(width, height),
                Vector2::new(GLYPH_BEARING_X as i32, height as i32),
                (CHAR_ADVANCE * 64.0) as i64,
            ),
            bitmap: vec![255; (width * height) as usize],
        })
    }
}

/// Metrics of [`MonospaceSource`] over the default printable range
pub fn monospace_metrics() -> GlyphMetrics {
    let source = MonospaceSource::new();
    let mut metrics = GlyphMetrics::new(source.pixel_height());
    for ch in TextConfig::default().char_range() {
        if let Ok(glyph) = source.rasterize(ch) {
            metrics.insert(ch, glyph.metric);
        }
    }
    metrics
}
