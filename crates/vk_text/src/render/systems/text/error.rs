//! Text system errors

use crate::config::ConfigError;
use crate::render::RenderError;

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur while loading fonts or rendering text
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Font data could not be parsed
    #[error("Failed to load font: {0}")]
    Load(String),

    /// Font file could not be read
    #[error("Failed to read font file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to rasterize a specific glyph character
    #[error("Failed to rasterize glyph '{0}': {1}")]
    Rasterize(char, String),

    /// Text contains a character the font has no metrics for
    #[error("Character '{0}' not found in font")]
    GlyphNotFound(char),

    /// Renderer was asked for a font it does not hold
    #[error("Font index {index} out of range ({count} fonts loaded)")]
    InvalidFontIndex {
        /// Requested index
        index: usize,
        /// Number of loaded fonts
        count: usize,
    },

    /// Renderer configuration was rejected
    #[error("Invalid text configuration: {0}")]
    Config(#[from] ConfigError),

    /// GPU resource creation or command recording failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}
