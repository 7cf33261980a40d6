//! Command buffer helpers
//!
//! One-shot submission for uploads and a [`CommandSink`] that records text
//! draws into a command buffer owned by the caller.

use ash::{vk, Device};

use crate::render::backend::CommandSink;
use crate::render::vulkan::backend::VulkanBackend;
use crate::render::vulkan::buffer::Buffer;
use crate::render::vulkan::{VulkanError, VulkanResult};

/// Primary command buffer returned to its pool on drop
struct OneShot<'a> {
    device: &'a Device,
    command_pool: vk::CommandPool,
    command_buffer: vk::CommandBuffer,
}

impl Drop for OneShot<'_> {
    fn drop(&mut self) {
        unsafe {
            self.device
                .free_command_buffers(self.command_pool, &[self.command_buffer]);
        }
    }
}

/// Record commands with `record`, submit them to `queue` and wait until they complete
pub fn submit_one_shot<F>(device: &Device, command_pool: vk::CommandPool, queue: vk::Queue, record: F) -> VulkanResult<()>
where
    F: FnOnce(vk::CommandBuffer),
{
    let alloc_info = vk::CommandBufferAllocateInfo::builder()
        .level(vk::CommandBufferLevel::PRIMARY)
        .command_pool(command_pool)
        .command_buffer_count(1);

    let command_buffer = unsafe { device.allocate_command_buffers(&alloc_info) }
        .map_err(VulkanError::Api)?
        .into_iter()
        .next()
        .ok_or_else(|| VulkanError::InitializationFailed("no command buffer allocated".to_string()))?;

    let one_shot = OneShot {
        device,
        command_pool,
        command_buffer,
    };

    let begin_info = vk::CommandBufferBeginInfo::builder().flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
    unsafe { device.begin_command_buffer(one_shot.command_buffer, &begin_info) }.map_err(VulkanError::Api)?;

    record(one_shot.command_buffer);

    unsafe { device.end_command_buffer(one_shot.command_buffer) }.map_err(VulkanError::Api)?;

    let command_buffers = [one_shot.command_buffer];
    let submit_info = vk::SubmitInfo::builder().command_buffers(&command_buffers);

    unsafe {
        device
            .queue_submit(queue, &[submit_info.build()], vk::Fence::null())
            .map_err(VulkanError::Api)?;
        device.queue_wait_idle(queue).map_err(VulkanError::Api)?;
    }

    Ok(())
}

/// Records text draws into a caller-owned command buffer
///
/// The command buffer must be inside a render pass compatible with
/// `pipeline`, whose layout uses the glyph descriptor set layout at set 0.
pub struct VulkanCommandSink<'a> {
    device: &'a Device,
    command_buffer: vk::CommandBuffer,
    pipeline: vk::Pipeline,
    pipeline_layout: vk::PipelineLayout,
}

impl<'a> VulkanCommandSink<'a> {
    /// Wrap a command buffer in the recording state
    pub const fn new(
        device: &'a Device,
        command_buffer: vk::CommandBuffer,
        pipeline: vk::Pipeline,
        pipeline_layout: vk::PipelineLayout,
    ) -> Self {
        Self {
            device,
            command_buffer,
            pipeline,
            pipeline_layout,
        }
    }

    /// Command buffer being recorded
    pub const fn command_buffer(&self) -> vk::CommandBuffer {
        self.command_buffer
    }
}

impl CommandSink<VulkanBackend> for VulkanCommandSink<'_> {
    fn bind_pipeline(&mut self) {
        unsafe {
            self.device
                .cmd_bind_pipeline(self.command_buffer, vk::PipelineBindPoint::GRAPHICS, self.pipeline);
        }
    }

    fn bind_vertex_buffer(&mut self, buffer: &Buffer) {
        unsafe {
            self.device
                .cmd_bind_vertex_buffers(self.command_buffer, 0, &[buffer.handle()], &[0]);
        }
    }

    fn bind_index_buffer(&mut self, buffer: &Buffer) {
        unsafe {
            self.device
                .cmd_bind_index_buffer(self.command_buffer, buffer.handle(), 0, vk::IndexType::UINT32);
        }
    }

    fn bind_descriptor_set(&mut self, set: vk::DescriptorSet) {
        unsafe {
            self.device.cmd_bind_descriptor_sets(
                self.command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                self.pipeline_layout,
                0,
                &[set],
                &[],
            );
        }
    }

    fn draw_indexed(&mut self, index_count: u32) {
        unsafe {
            self.device
                .cmd_draw_indexed(self.command_buffer, index_count, 1, 0, 0, 0);
        }
    }
}
