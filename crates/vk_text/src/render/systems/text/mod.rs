//! Text rendering system
//!
//! Glyph rasterization, row/word layout, paragraph placement and the fonts
//! that draw laid out paragraphs as one textured quad per glyph.

pub mod error;
pub mod font;
pub mod glyph_quad;
pub mod metrics;
pub mod paragraph;
pub mod rasterizer;
pub mod text_layout;
pub mod text_renderer;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::*;
pub use font::*;
pub use glyph_quad::*;
pub use metrics::*;
pub use paragraph::*;
pub use rasterizer::*;
pub use text_layout::*;
pub use text_renderer::*;
