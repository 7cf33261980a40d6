//! # vk_text
//!
//! Text rendering on Vulkan: RAII wrappers over the `ash` objects glyph
//! drawing needs, and a text layout engine that wraps paragraphs into rows,
//! aligns them and draws every glyph as a textured quad from a per-frame pool
//! of reusable GPU buffers.
//!
//! ## Features
//!
//! - **Row wrapping**: word-aware, with words wider than a row split over rows
//! - **Alignment**: left/center/right rows, top/center/bottom blocks
//! - **Resolution independence**: coordinates relative to a reference resolution
//! - **Frame pooling**: draw buffers are reused across frames instead of reallocated
//! - **Headless backend**: layout and draw recording without a GPU
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vk_text::prelude::*;
//!
//! fn draw(
//!     renderer: &mut TextRenderer<VulkanBackend>,
//!     gpu: &mut VulkanBackend,
//!     sink: &mut VulkanCommandSink<'_>,
//!     projection: &vk_text::render::vulkan::Buffer,
//!     frame: usize,
//! ) -> Result<(), FontError> {
//!     renderer.clear_buffers(gpu, frame)?;
//!
//!     let mut ctx = DrawContext::new(gpu, sink, projection, frame, Extent::new(2560, 1440));
//!     let style = TextStyle::new(48.0)
//!         .with_color(Color::YELLOW)
//!         .with_row_width(800.0)
//!         .with_alignment(HorizontalAlignment::Center, VerticalAlignment::Center);
//!     renderer.render_text_rel(&mut ctx, 0, "Game Over", 960.0, 540.0, &style)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod render;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        core::{Config, FontConfig, TextConfig, TextRendererConfig},
        foundation::math::{screen_projection, Extent, Vec2},
        render::{
            systems::text::{
                Font, FontError, FontResult, HorizontalAlignment, TextRenderer, TextStyle, VerticalAlignment,
            },
            vulkan::{VulkanBackend, VulkanCommandSink},
            Color, CommandSink, DrawContext, GpuBackend, HeadlessBackend, RecordingSink,
        },
    };
}
