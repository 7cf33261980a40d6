//! Glyph rasterization
//!
//! [`GlyphSource`] is the seam between a font file and the font loader. The
//! production implementation rasterizes TrueType/OpenType faces with
//! `fontdue`; tests supply synthetic sources.

use std::path::Path;

use fontdue::FontSettings;
use nalgebra::Vector2;

use super::error::{FontError, FontResult};
use super::metrics::GlyphMetric;

/// A rasterized glyph: its metric and an 8-bit coverage bitmap
#[derive(Debug, Clone)]
pub struct RasterizedGlyph {
    /// Placement metric at the source's pixel height
    pub metric: GlyphMetric,
    /// Row-major coverage, `size.x * size.y` bytes, top row first
    pub bitmap: Vec<u8>,
}

/// Something that can rasterize glyphs at a fixed pixel height
pub trait GlyphSource {
    /// Pixel height every glyph is rasterized at
    fn pixel_height(&self) -> f32;

    /// Whether the source has a glyph for `ch`
    fn defines(&self, ch: char) -> bool;

    /// Rasterize `ch`
    fn rasterize(&self, ch: char) -> FontResult<RasterizedGlyph>;
}

/// Font face backed by `fontdue`
pub struct FontdueFace {
    font: fontdue::Font,
    pixel_height: f32,
}

impl FontdueFace {
    /// Read and parse a font file
    pub fn open(path: impl AsRef<Path>, pixel_height: f32) -> FontResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        log::debug!("Read {} bytes of font data from {}", bytes.len(), path.display());
        Self::from_bytes(&bytes, pixel_height)
    }

    /// Parse font data already in memory
    pub fn from_bytes(bytes: &[u8], pixel_height: f32) -> FontResult<Self> {
        let settings = FontSettings {
            scale: pixel_height,
            ..FontSettings::default()
        };
        let font = fontdue::Font::from_bytes(bytes, settings).map_err(|e| FontError::Load(e.to_string()))?;
        Ok(Self { font, pixel_height })
    }
}

impl GlyphSource for FontdueFace {
    fn pixel_height(&self) -> f32 {
        self.pixel_height
    }

    fn defines(&self, ch: char) -> bool {
        self.font.lookup_glyph_index(ch) != 0
    }

    fn rasterize(&self, ch: char) -> FontResult<RasterizedGlyph> {
        let (metrics, bitmap) = self.font.rasterize(ch, self.pixel_height);
        glyph_from_fontdue(ch, &metrics, bitmap)
    }
}

/// Convert fontdue's metrics into a [`RasterizedGlyph`]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn glyph_from_fontdue(ch: char, metrics: &fontdue::Metrics, bitmap: Vec<u8>) -> FontResult<RasterizedGlyph> {
    if bitmap.len() != metrics.width * metrics.height {
        return Err(FontError::Rasterize(
            ch,
            format!(
                "bitmap holds {} bytes for a {}x{} glyph",
                bitmap.len(),
                metrics.width,
                metrics.height
            ),
        ));
    }

    let width = u32::try_from(metrics.width).map_err(|e| FontError::Rasterize(ch, e.to_string()))?;
    let height = u32::try_from(metrics.height).map_err(|e| FontError::Rasterize(ch, e.to_string()))?;

    // fontdue reports the bottom edge; the quad builder wants the top
    let bearing = Vector2::new(metrics.xmin, metrics.ymin + height as i32);
    let advance = (metrics.advance_width * 64.0).round() as i64;

    Ok(RasterizedGlyph {
        metric: GlyphMetric::new(Vector2::new(width, height), bearing, advance),
        bitmap,
    })
}
