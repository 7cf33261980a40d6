//! Vulkan implementation of the backend seams
//!
//! RAII wrappers over the handful of `ash` objects the text system creates
//! (buffers, glyph images, descriptor pools) plus [`VulkanBackend`] and
//! [`VulkanCommandSink`], which plug those wrappers into the generic text
//! renderer. Instance, device, queues, command pools and pipelines are
//! created and destroyed by the caller.

pub mod backend;
pub mod buffer;
pub mod commands;
pub mod descriptor_set;
pub mod texture;

pub use backend::VulkanBackend;
pub use buffer::{find_memory_type, Buffer};
pub use commands::{submit_one_shot, VulkanCommandSink};
pub use descriptor_set::{DescriptorPool, DescriptorSetLayout, DescriptorSetLayoutBuilder, GlyphBindings};
pub use texture::{GlyphImage, Sampler};

use ash::vk::{self, Handle};

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;

/// Errors raised by the Vulkan wrappers
#[derive(Debug, thiserror::Error)]
pub enum VulkanError {
    /// General Vulkan API error with result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// No memory type satisfies the requested properties
    #[error("No suitable memory type found")]
    NoSuitableMemoryType,

    /// Object creation failed for a reason other than an API result
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),
}

/// Whether `handle` still refers to a created object
pub(crate) fn is_live<H: Handle>(handle: H) -> bool {
    handle.as_raw() != 0
}
