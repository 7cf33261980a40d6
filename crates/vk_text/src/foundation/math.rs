//! Math utilities and types
//!
//! Provides the small set of math types the text layer needs.

use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix4, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Size of a render target in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Extent {
    /// Create a new extent
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Per-axis scale factor of this extent relative to `reference`
    ///
    /// A 3840x2160 surface against a 1920x1080 reference yields `(2.0, 2.0)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn scale_from(&self, reference: Self) -> Vec2 {
        Vec2::new(
            self.width as f32 / reference.width as f32,
            self.height as f32 / reference.height as f32,
        )
    }
}

impl From<ash::vk::Extent2D> for Extent {
    fn from(extent: ash::vk::Extent2D) -> Self {
        Self::new(extent.width, extent.height)
    }
}

/// Orthographic projection mapping pixel coordinates onto clip space
///
/// The origin sits at the bottom-left corner of the surface and y grows
/// upwards, which is the space glyph quads are emitted in. Vulkan clip space
/// has +1 at the bottom of the framebuffer, so pixel y = 0 maps to +1 and no
/// negative-height viewport is needed.
#[allow(clippy::cast_precision_loss)]
pub fn screen_projection(extent: Extent) -> Mat4 {
    Mat4::new_orthographic(0.0, extent.width as f32, extent.height as f32, 0.0, -1.0, 1.0)
}
