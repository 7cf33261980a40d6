//! [`GpuBackend`] over caller-owned Vulkan objects
//!
//! `VulkanBackend` is a view: it holds copies of the handles it was given
//! and never destroys them. Resources it creates are RAII wrappers owned by
//! whoever requested them.

use ash::{vk, Device, Instance};

use crate::render::backend::GpuBackend;
use crate::render::vulkan::buffer::Buffer;
use crate::render::vulkan::descriptor_set::{DescriptorPool, GlyphBindings};
use crate::render::vulkan::texture::GlyphImage;
use crate::render::{RenderError, RenderResult};

/// Vulkan resource factory for the text system
pub struct VulkanBackend {
    device: Device,
    memory_properties: vk::PhysicalDeviceMemoryProperties,
    command_pool: vk::CommandPool,
    queue: vk::Queue,
    glyph_layout: vk::DescriptorSetLayout,
    sampler: vk::Sampler,
}

impl VulkanBackend {
    /// Borrow the device objects uploads and descriptor writes need
    ///
    /// `command_pool` must belong to `queue`'s family. `glyph_layout` must
    /// match [`DescriptorSetLayout::glyph`](crate::render::vulkan::DescriptorSetLayout::glyph).
    /// All handles must outlive the backend and every resource it creates.
    pub fn new(
        instance: &Instance,
        physical_device: vk::PhysicalDevice,
        device: &Device,
        command_pool: vk::CommandPool,
        queue: vk::Queue,
        glyph_layout: vk::DescriptorSetLayout,
        sampler: vk::Sampler,
    ) -> Self {
        let memory_properties = unsafe { instance.get_physical_device_memory_properties(physical_device) };
        Self {
            device: device.clone(),
            memory_properties,
            command_pool,
            queue,
            glyph_layout,
            sampler,
        }
    }

    /// Device resources are created on
    pub const fn device(&self) -> &Device {
        &self.device
    }

    fn device_local(&self, usage: vk::BufferUsageFlags, bytes: &[u8]) -> RenderResult<Buffer> {
        Ok(Buffer::device_local_with_data(
            &self.device,
            &self.memory_properties,
            self.command_pool,
            self.queue,
            usage,
            bytes,
        )?)
    }
}

impl GpuBackend for VulkanBackend {
    type Texture = GlyphImage;
    type Buffer = Buffer;
    type DescriptorPool = DescriptorPool;
    type DescriptorSet = vk::DescriptorSet;

    fn create_glyph_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> RenderResult<GlyphImage> {
        Ok(GlyphImage::new(
            &self.device,
            &self.memory_properties,
            self.command_pool,
            self.queue,
            width,
            height,
            pixels,
        )?)
    }

    fn create_vertex_buffer(&mut self, vertices: &[f32]) -> RenderResult<Buffer> {
        self.device_local(vk::BufferUsageFlags::VERTEX_BUFFER, bytemuck::cast_slice(vertices))
    }

    fn create_index_buffer(&mut self, indices: &[u32]) -> RenderResult<Buffer> {
        self.device_local(vk::BufferUsageFlags::INDEX_BUFFER, bytemuck::cast_slice(indices))
    }

    fn create_staging_buffer(&mut self, size: u64) -> RenderResult<Buffer> {
        Ok(Buffer::host_visible(
            &self.device,
            &self.memory_properties,
            size,
            vk::BufferUsageFlags::TRANSFER_SRC,
        )?)
    }

    fn restage_buffer(&mut self, dst: &Buffer, staging: &Buffer, bytes: &[u8]) -> RenderResult<()> {
        let size = bytes.len() as vk::DeviceSize;
        if size > dst.size() || size > staging.size() {
            return Err(RenderError::Upload(format!(
                "{} bytes exceed destination ({}) or staging ({}) size",
                size,
                dst.size(),
                staging.size()
            )));
        }

        staging.write(bytes)?;
        dst.copy_from(self.command_pool, self.queue, staging, size)?;
        Ok(())
    }

    fn create_uniform_buffer(&mut self, bytes: &[u8]) -> RenderResult<Buffer> {
        let buffer = Buffer::host_visible(
            &self.device,
            &self.memory_properties,
            bytes.len() as vk::DeviceSize,
            vk::BufferUsageFlags::UNIFORM_BUFFER,
        )?;
        buffer.write(bytes)?;
        Ok(buffer)
    }

    fn write_uniform_buffer(&mut self, buffer: &Buffer, bytes: &[u8]) -> RenderResult<()> {
        buffer.write(bytes).map_err(|e| RenderError::Upload(e.to_string()))
    }

    fn create_descriptor_pool(&mut self, max_sets: u32) -> RenderResult<DescriptorPool> {
        Ok(DescriptorPool::for_glyphs(&self.device, max_sets)?)
    }

    fn allocate_glyph_descriptor(
        &mut self,
        pool: &DescriptorPool,
        texture: &GlyphImage,
        color: &Buffer,
        projection: &Buffer,
    ) -> RenderResult<vk::DescriptorSet> {
        let bindings = GlyphBindings {
            image_view: texture.image_view(),
            sampler: self.sampler,
            color: color.handle(),
            projection: projection.handle(),
        };
        pool.allocate_glyph_set(self.glyph_layout, &bindings)
            .map_err(|e| RenderError::DescriptorAllocation(e.to_string()))
    }

    fn free_descriptor_sets(&mut self, pool: &DescriptorPool, sets: &[vk::DescriptorSet]) -> RenderResult<()> {
        Ok(pool.free(sets)?)
    }
}
