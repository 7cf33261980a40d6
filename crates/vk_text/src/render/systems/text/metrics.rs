//! Glyph metrics store
//!
//! Metrics are captured once at the font's base pixel height. Every width the
//! layout engine works with is derived from them by scaling with
//! `font_size / base_height`.

use std::collections::HashMap;

use nalgebra::Vector2;

use super::error::{FontError, FontResult};

/// Placement data for a single glyph at the base pixel height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetric {
    /// Bitmap size in pixels
    pub size: Vector2<u32>,
    /// Offset from the pen to the bitmap's left edge (x) and top edge (y)
    pub bearing: Vector2<i32>,
    /// Horizontal pen advance in 1/64 pixel units
    pub advance: i64,
}

impl GlyphMetric {
    /// Create a metric from raw values
    pub const fn new(size: Vector2<u32>, bearing: Vector2<i32>, advance: i64) -> Self {
        Self { size, bearing, advance }
    }

    /// Advance in whole pixels at the base height
    #[allow(clippy::cast_precision_loss)]
    pub fn advance_px(&self) -> f32 {
        self.advance as f32 / 64.0
    }

    /// Whether the glyph has a bitmap worth uploading
    pub fn has_area(&self) -> bool {
        self.size.x > 0 && self.size.y > 0
    }
}

/// All glyph metrics of one font
#[derive(Debug, Clone)]
pub struct GlyphMetrics {
    glyphs: HashMap<char, GlyphMetric>,
    base_height: f32,
}

impl GlyphMetrics {
    /// Create an empty store for metrics captured at `base_height` pixels
    pub fn new(base_height: f32) -> Self {
        Self {
            glyphs: HashMap::new(),
            base_height,
        }
    }

    /// Record the metric of `ch`, replacing any earlier one
    pub fn insert(&mut self, ch: char, metric: GlyphMetric) {
        self.glyphs.insert(ch, metric);
    }

    /// Metric of `ch`
    pub fn get(&self, ch: char) -> FontResult<&GlyphMetric> {
        self.glyphs.get(&ch).ok_or(FontError::GlyphNotFound(ch))
    }

    /// Whether the font defines `ch`
    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    /// Number of glyphs with metrics
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether no glyph was loaded
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Pixel height the metrics were captured at
    pub const fn base_height(&self) -> f32 {
        self.base_height
    }

    /// Factor mapping base-height pixels to `font_size` pixels
    pub fn scale(&self, font_size: f32) -> f32 {
        font_size / self.base_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_advance_is_fractional() {
        let metric = GlyphMetric::new(Vector2::new(10, 12), Vector2::new(1, 12), 1000);
        assert_relative_eq!(metric.advance_px(), 15.625);
    }

    #[test]
    fn test_zero_area_glyph() {
        let space = GlyphMetric::new(Vector2::new(0, 0), Vector2::new(0, 0), 1024);
        let bar = GlyphMetric::new(Vector2::new(0, 30), Vector2::new(0, 30), 1024);
        assert!(!space.has_area());
        assert!(!bar.has_area());
    }

    #[test]
    fn test_missing_glyph_is_reported() {
        let mut metrics = GlyphMetrics::new(64.0);
        metrics.insert('a', GlyphMetric::new(Vector2::new(8, 8), Vector2::new(0, 8), 2048));

        assert!(metrics.contains('a'));
        assert_eq!(metrics.len(), 1);
        assert!(matches!(metrics.get('z'), Err(FontError::GlyphNotFound('z'))));
        assert_relative_eq!(metrics.scale(32.0), 0.5);
    }
}
