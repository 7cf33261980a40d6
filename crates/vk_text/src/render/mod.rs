//! Rendering layer
//!
//! Backend-agnostic resource seams, the per-frame resource pool, the Vulkan
//! implementation of those seams and the text system built on top of them.
//!
//! ```text
//! TextRenderer ──► Font ──► FrameResources (SlotRing<DrawSlot>)
//!                    │
//!                    ▼
//!        GpuBackend + CommandSink  (VulkanBackend | HeadlessBackend)
//! ```

pub mod backend;
pub mod color;
pub mod frame_pool;
pub mod headless;
pub mod systems;
pub mod vulkan;

pub use backend::{CommandSink, DrawContext, GpuBackend};
pub use color::{Color, ParseColorError};
pub use frame_pool::{DrawSlot, FrameResources, FrameSet, SlotEntry, SlotRing, FRAMES_IN_FLIGHT};
pub use headless::{HeadlessBackend, RecordedCommand, RecordingSink};

use vulkan::VulkanError;

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while creating or using GPU resources
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A texture, buffer or pool could not be created
    #[error("Failed to create GPU resource: {0}")]
    ResourceCreation(String),

    /// Writing data into an existing buffer failed
    #[error("Failed to upload buffer data: {0}")]
    Upload(String),

    /// The descriptor pool could not hand out another set
    #[error("Failed to allocate descriptor set: {0}")]
    DescriptorAllocation(String),

    /// Caller passed a frame index outside the frames in flight
    #[error("Frame index {index} out of range ({frames} frames in flight)")]
    InvalidFrame {
        /// Requested frame index
        index: usize,
        /// Number of frame slots
        frames: usize,
    },

    /// Error reported by the Vulkan backend
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] VulkanError),
}
