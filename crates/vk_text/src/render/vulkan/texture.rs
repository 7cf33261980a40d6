//! Glyph images and samplers
//!
//! A [`GlyphImage`] is a single-channel `R8_UNORM` image holding one glyph's
//! coverage bitmap, uploaded once through a staging buffer and left in
//! `SHADER_READ_ONLY_OPTIMAL`.

use ash::vk;
use ash::Device;

use crate::render::vulkan::buffer::{find_memory_type, Buffer};
use crate::render::vulkan::commands::submit_one_shot;
use crate::render::vulkan::{is_live, VulkanError, VulkanResult};

const COLOR_RANGE: vk::ImageSubresourceRange = vk::ImageSubresourceRange {
    aspect_mask: vk::ImageAspectFlags::COLOR,
    base_mip_level: 0,
    level_count: 1,
    base_array_layer: 0,
    layer_count: 1,
};

/// Sampled single-channel glyph image
pub struct GlyphImage {
    device: Device,
    image: vk::Image,
    image_view: vk::ImageView,
    memory: vk::DeviceMemory,
    extent: vk::Extent2D,
}

impl GlyphImage {
    /// Image format of every glyph
    pub const FORMAT: vk::Format = vk::Format::R8_UNORM;

    /// Create the image and upload `pixels` (`width * height` bytes, top row first)
    pub fn new(
        device: &Device,
        memory_properties: &vk::PhysicalDeviceMemoryProperties,
        command_pool: vk::CommandPool,
        queue: vk::Queue,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> VulkanResult<Self> {
        let expected = width as usize * height as usize;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(VulkanError::InitializationFailed(format!(
                "glyph bitmap {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }

        let extent = vk::Extent2D { width, height };
        let image_info = vk::ImageCreateInfo::builder()
            .image_type(vk::ImageType::TYPE_2D)
            .extent(vk::Extent3D {
                width,
                height,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .format(Self::FORMAT)
            .tiling(vk::ImageTiling::OPTIMAL)
            .initial_layout(vk::ImageLayout::UNDEFINED)
            .usage(vk::ImageUsageFlags::TRANSFER_DST | vk::ImageUsageFlags::SAMPLED)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .samples(vk::SampleCountFlags::TYPE_1);

        let image = unsafe { device.create_image(&image_info, None) }.map_err(VulkanError::Api)?;

        let mut this = Self {
            device: device.clone(),
            image,
            image_view: vk::ImageView::null(),
            memory: vk::DeviceMemory::null(),
            extent,
        };

        let requirements = unsafe { device.get_image_memory_requirements(image) };
        let memory_type_index = find_memory_type(
            memory_properties,
            requirements.memory_type_bits,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        )?;
        let alloc_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(requirements.size)
            .memory_type_index(memory_type_index);

        this.memory = unsafe { device.allocate_memory(&alloc_info, None) }.map_err(VulkanError::Api)?;
        unsafe { device.bind_image_memory(image, this.memory, 0) }.map_err(VulkanError::Api)?;

        let staging = Buffer::host_visible(
            device,
            memory_properties,
            pixels.len() as vk::DeviceSize,
            vk::BufferUsageFlags::TRANSFER_SRC,
        )?;
        staging.write(pixels)?;

        submit_one_shot(device, command_pool, queue, |command_buffer| {
            record_upload(device, command_buffer, staging.handle(), image, extent);
        })?;

        let view_info = vk::ImageViewCreateInfo::builder()
            .image(image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(Self::FORMAT)
            .subresource_range(COLOR_RANGE);

        this.image_view = unsafe { device.create_image_view(&view_info, None) }.map_err(VulkanError::Api)?;

        Ok(this)
    }

    /// Get the image view for descriptor set binding
    pub const fn image_view(&self) -> vk::ImageView {
        self.image_view
    }

    /// Image size in pixels
    pub const fn extent(&self) -> vk::Extent2D {
        self.extent
    }
}

impl Drop for GlyphImage {
    fn drop(&mut self) {
        unsafe {
            if is_live(self.image_view) {
                self.device.destroy_image_view(self.image_view, None);
                self.image_view = vk::ImageView::null();
            }
            if is_live(self.image) {
                self.device.destroy_image(self.image, None);
                self.image = vk::Image::null();
            }
            if is_live(self.memory) {
                self.device.free_memory(self.memory, None);
                self.memory = vk::DeviceMemory::null();
            }
        }
    }
}

/// Transition to transfer destination, copy, transition to shader read
fn record_upload(
    device: &Device,
    command_buffer: vk::CommandBuffer,
    buffer: vk::Buffer,
    image: vk::Image,
    extent: vk::Extent2D,
) {
    let to_transfer = vk::ImageMemoryBarrier::builder()
        .old_layout(vk::ImageLayout::UNDEFINED)
        .new_layout(vk::ImageLayout::TRANSFER_DST_OPTIMAL)
        .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .image(image)
        .subresource_range(COLOR_RANGE)
        .src_access_mask(vk::AccessFlags::empty())
        .dst_access_mask(vk::AccessFlags::TRANSFER_WRITE);

    let region = vk::BufferImageCopy::builder()
        .buffer_offset(0)
        .buffer_row_length(0)
        .buffer_image_height(0)
        .image_subresource(vk::ImageSubresourceLayers {
            aspect_mask: vk::ImageAspectFlags::COLOR,
            mip_level: 0,
            base_array_layer: 0,
            layer_count: 1,
        })
        .image_offset(vk::Offset3D { x: 0, y: 0, z: 0 })
        .image_extent(vk::Extent3D {
            width: extent.width,
            height: extent.height,
            depth: 1,
        });

    let to_shader = vk::ImageMemoryBarrier::builder()
        .old_layout(vk::ImageLayout::TRANSFER_DST_OPTIMAL)
        .new_layout(vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL)
        .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .image(image)
        .subresource_range(COLOR_RANGE)
        .src_access_mask(vk::AccessFlags::TRANSFER_WRITE)
        .dst_access_mask(vk::AccessFlags::SHADER_READ);

    unsafe {
        device.cmd_pipeline_barrier(
            command_buffer,
            vk::PipelineStageFlags::TOP_OF_PIPE,
            vk::PipelineStageFlags::TRANSFER,
            vk::DependencyFlags::empty(),
            &[],
            &[],
            &[to_transfer.build()],
        );
        device.cmd_copy_buffer_to_image(
            command_buffer,
            buffer,
            image,
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            &[region.build()],
        );
        device.cmd_pipeline_barrier(
            command_buffer,
            vk::PipelineStageFlags::TRANSFER,
            vk::PipelineStageFlags::FRAGMENT_SHADER,
            vk::DependencyFlags::empty(),
            &[],
            &[],
            &[to_shader.build()],
        );
    }
}

/// Sampler wrapper with RAII cleanup
pub struct Sampler {
    device: Device,
    sampler: vk::Sampler,
}

impl Sampler {
    /// Linear, clamp-to-edge sampler suited to glyph coverage maps
    pub fn glyph(device: &Device) -> VulkanResult<Self> {
        let sampler_info = vk::SamplerCreateInfo::builder()
            .mag_filter(vk::Filter::LINEAR)
            .min_filter(vk::Filter::LINEAR)
            .address_mode_u(vk::SamplerAddressMode::CLAMP_TO_EDGE)
            .address_mode_v(vk::SamplerAddressMode::CLAMP_TO_EDGE)
            .address_mode_w(vk::SamplerAddressMode::CLAMP_TO_EDGE)
            .anisotropy_enable(false)
            .max_anisotropy(1.0)
            .border_color(vk::BorderColor::INT_OPAQUE_BLACK)
            .unnormalized_coordinates(false)
            .compare_enable(false)
            .compare_op(vk::CompareOp::ALWAYS)
            .mipmap_mode(vk::SamplerMipmapMode::LINEAR);

        let sampler = unsafe { device.create_sampler(&sampler_info, None) }.map_err(VulkanError::Api)?;

        Ok(Self {
            device: device.clone(),
            sampler,
        })
    }

    /// Get the sampler handle
    pub const fn handle(&self) -> vk::Sampler {
        self.sampler
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        if is_live(self.sampler) {
            unsafe {
                self.device.destroy_sampler(self.sampler, None);
            }
            self.sampler = vk::Sampler::null();
        }
    }
}
