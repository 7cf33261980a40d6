//! Multi-font text renderer
//!
//! Holds every loaded [`Font`] and routes render calls to them by index.

use std::path::Path;

use crate::core::config::{TextConfig, TextRendererConfig};
use crate::render::backend::{CommandSink, DrawContext, GpuBackend};

use super::error::{FontError, FontResult};
use super::font::Font;
use super::paragraph::TextStyle;

/// Text rendering entry point
pub struct TextRenderer<B: GpuBackend> {
    fonts: Vec<Font<B>>,
    config: TextConfig,
}

impl<B: GpuBackend> TextRenderer<B> {
    /// Create a renderer with no fonts
    pub fn new(config: TextConfig) -> Self {
        Self {
            fonts: Vec::new(),
            config,
        }
    }

    /// Create a renderer and load every configured font, in order
    ///
    /// Also installs the logger with `config.log_level` as the default filter
    /// unless one is already installed.
    pub fn from_config(gpu: &mut B, config: &TextRendererConfig) -> FontResult<Self> {
        config.validate()?;
        crate::foundation::logging::init_with_level(&config.log_level);

        let mut renderer = Self::new(config.text.clone());
        for font in &config.fonts {
            renderer.load_font(gpu, &font.name, &font.path)?;
        }
        Ok(renderer)
    }

    /// Load a font file; returns its index
    pub fn load_font(&mut self, gpu: &mut B, name: &str, path: impl AsRef<Path>) -> FontResult<usize> {
        let font = Font::load(gpu, name, path, &self.config)?;
        Ok(self.add_font(font))
    }

    /// Take ownership of an already built font; returns its index
    pub fn add_font(&mut self, font: Font<B>) -> usize {
        self.fonts.push(font);
        self.fonts.len() - 1
    }

    /// Layout settings fonts are loaded with
    pub const fn config(&self) -> &TextConfig {
        &self.config
    }

    /// Number of loaded fonts
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    /// Font at `index`
    pub fn font(&self, index: usize) -> FontResult<&Font<B>> {
        let count = self.fonts.len();
        self.fonts.get(index).ok_or(FontError::InvalidFontIndex { index, count })
    }

    /// Index of the first font loaded under `name`
    pub fn font_index(&self, name: &str) -> Option<usize> {
        self.fonts.iter().position(|font| font.name() == name)
    }

    fn font_mut(&mut self, index: usize) -> FontResult<&mut Font<B>> {
        let count = self.fonts.len();
        self.fonts.get_mut(index).ok_or(FontError::InvalidFontIndex { index, count })
    }

    /// Draw `text` with font `font_index`, coordinates at the reference resolution
    pub fn render_text_rel<S: CommandSink<B>>(
        &mut self,
        ctx: &mut DrawContext<'_, B, S>,
        font_index: usize,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
    ) -> FontResult<usize> {
        self.font_mut(font_index)?.render_text_rel(ctx, text, x, y, style)
    }

    /// Draw `text` with font `font_index`, coordinates in surface pixels
    pub fn render_text_abs<S: CommandSink<B>>(
        &mut self,
        ctx: &mut DrawContext<'_, B, S>,
        font_index: usize,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
    ) -> FontResult<usize> {
        self.font_mut(font_index)?.render_text_abs(ctx, text, x, y, style)
    }

    /// Start a new recording of `frame` for every font
    pub fn clear_buffers(&mut self, gpu: &mut B, frame: usize) -> FontResult<()> {
        for font in &mut self.fonts {
            font.clear_buffers(gpu, frame)?;
        }
        Ok(())
    }
}
