//! Descriptor set layouts and pools for glyph drawing
//!
//! Every glyph draw binds one set with three bindings:
//!
//! | binding | type                   | stage    | contents            |
//! |---------|------------------------|----------|---------------------|
//! | 0       | combined image sampler | fragment | glyph coverage map  |
//! | 1       | uniform buffer         | fragment | RGBA color          |
//! | 2       | uniform buffer         | vertex   | projection matrix   |

use ash::vk;
use ash::Device;

use crate::render::vulkan::{is_live, VulkanError, VulkanResult};

/// Binding of the glyph texture
pub const GLYPH_TEXTURE_BINDING: u32 = 0;
/// Binding of the color uniform
pub const GLYPH_COLOR_BINDING: u32 = 1;
/// Binding of the projection uniform
pub const GLYPH_PROJECTION_BINDING: u32 = 2;

/// Descriptor set layout builder for creating reusable layouts
pub struct DescriptorSetLayoutBuilder {
    bindings: Vec<vk::DescriptorSetLayoutBinding>,
}

impl DescriptorSetLayoutBuilder {
    /// Create a new descriptor set layout builder
    pub const fn new() -> Self {
        Self { bindings: Vec::new() }
    }

    fn add(mut self, binding: u32, descriptor_type: vk::DescriptorType, stage_flags: vk::ShaderStageFlags) -> Self {
        self.bindings.push(
            vk::DescriptorSetLayoutBinding::builder()
                .binding(binding)
                .descriptor_type(descriptor_type)
                .descriptor_count(1)
                .stage_flags(stage_flags)
                .build(),
        );
        self
    }

    /// Add a uniform buffer binding
    pub fn add_uniform_buffer(self, binding: u32, stage_flags: vk::ShaderStageFlags) -> Self {
        self.add(binding, vk::DescriptorType::UNIFORM_BUFFER, stage_flags)
    }

    /// Add a combined image sampler binding
    pub fn add_combined_image_sampler(self, binding: u32, stage_flags: vk::ShaderStageFlags) -> Self {
        self.add(binding, vk::DescriptorType::COMBINED_IMAGE_SAMPLER, stage_flags)
    }

    /// Bindings added so far
    pub fn bindings(&self) -> &[vk::DescriptorSetLayoutBinding] {
        &self.bindings
    }

    /// Build the descriptor set layout
    pub fn build(self, device: &Device) -> VulkanResult<DescriptorSetLayout> {
        let layout_info = vk::DescriptorSetLayoutCreateInfo::builder().bindings(&self.bindings);

        let layout = unsafe { device.create_descriptor_set_layout(&layout_info, None) }.map_err(VulkanError::Api)?;

        Ok(DescriptorSetLayout {
            layout,
            device: device.clone(),
        })
    }
}

impl Default for DescriptorSetLayoutBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Descriptor set layout wrapper with automatic cleanup
pub struct DescriptorSetLayout {
    layout: vk::DescriptorSetLayout,
    device: Device,
}

impl DescriptorSetLayout {
    /// Bindings of the glyph layout
    pub fn glyph_builder() -> DescriptorSetLayoutBuilder {
        DescriptorSetLayoutBuilder::new()
            .add_combined_image_sampler(GLYPH_TEXTURE_BINDING, vk::ShaderStageFlags::FRAGMENT)
            .add_uniform_buffer(GLYPH_COLOR_BINDING, vk::ShaderStageFlags::FRAGMENT)
            .add_uniform_buffer(GLYPH_PROJECTION_BINDING, vk::ShaderStageFlags::VERTEX)
    }

    /// Create the layout every glyph descriptor set uses
    pub fn glyph(device: &Device) -> VulkanResult<Self> {
        Self::glyph_builder().build(device)
    }

    /// Get the Vulkan descriptor set layout handle
    pub const fn handle(&self) -> vk::DescriptorSetLayout {
        self.layout
    }
}

impl Drop for DescriptorSetLayout {
    fn drop(&mut self) {
        if is_live(self.layout) {
            unsafe {
                self.device.destroy_descriptor_set_layout(self.layout, None);
            }
            self.layout = vk::DescriptorSetLayout::null();
        }
    }
}

/// Resources written into one glyph descriptor set
#[derive(Debug, Clone, Copy)]
pub struct GlyphBindings {
    /// Glyph image view
    pub image_view: vk::ImageView,
    /// Sampler for the glyph image
    pub sampler: vk::Sampler,
    /// Color uniform buffer
    pub color: vk::Buffer,
    /// Projection uniform buffer
    pub projection: vk::Buffer,
}

/// Descriptor pool for glyph descriptor sets
///
/// Created with `FREE_DESCRIPTOR_SET` so sets can be returned individually.
pub struct DescriptorPool {
    pool: vk::DescriptorPool,
    device: Device,
    max_sets: u32,
}

impl DescriptorPool {
    /// Create a pool able to hold `max_sets` glyph descriptor sets
    pub fn for_glyphs(device: &Device, max_sets: u32) -> VulkanResult<Self> {
        let pool_sizes = [
            vk::DescriptorPoolSize::builder()
                .ty(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
                .descriptor_count(max_sets)
                .build(),
            vk::DescriptorPoolSize::builder()
                .ty(vk::DescriptorType::UNIFORM_BUFFER)
                .descriptor_count(max_sets.saturating_mul(2))
                .build(),
        ];

        let pool_info = vk::DescriptorPoolCreateInfo::builder()
            .flags(vk::DescriptorPoolCreateFlags::FREE_DESCRIPTOR_SET)
            .max_sets(max_sets)
            .pool_sizes(&pool_sizes);

        let pool = unsafe { device.create_descriptor_pool(&pool_info, None) }.map_err(VulkanError::Api)?;

        log::debug!("Created glyph descriptor pool with {} sets", max_sets);
        Ok(Self {
            pool,
            device: device.clone(),
            max_sets,
        })
    }

    /// Allocate one set with `layout` and write `bindings` into it
    pub fn allocate_glyph_set(
        &self,
        layout: vk::DescriptorSetLayout,
        bindings: &GlyphBindings,
    ) -> VulkanResult<vk::DescriptorSet> {
        let layouts = [layout];
        let alloc_info = vk::DescriptorSetAllocateInfo::builder()
            .descriptor_pool(self.pool)
            .set_layouts(&layouts);

        let set = unsafe { self.device.allocate_descriptor_sets(&alloc_info) }
            .map_err(VulkanError::Api)?
            .into_iter()
            .next()
            .ok_or_else(|| VulkanError::InitializationFailed("no descriptor set allocated".to_string()))?;

        let image_info = [vk::DescriptorImageInfo::builder()
            .image_layout(vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL)
            .image_view(bindings.image_view)
            .sampler(bindings.sampler)
            .build()];
        let color_info = [vk::DescriptorBufferInfo::builder()
            .buffer(bindings.color)
            .offset(0)
            .range(vk::WHOLE_SIZE)
            .build()];
        let projection_info = [vk::DescriptorBufferInfo::builder()
            .buffer(bindings.projection)
            .offset(0)
            .range(vk::WHOLE_SIZE)
            .build()];

        let writes = [
            vk::WriteDescriptorSet::builder()
                .dst_set(set)
                .dst_binding(GLYPH_TEXTURE_BINDING)
                .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
                .image_info(&image_info)
                .build(),
            vk::WriteDescriptorSet::builder()
                .dst_set(set)
                .dst_binding(GLYPH_COLOR_BINDING)
                .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                .buffer_info(&color_info)
                .build(),
            vk::WriteDescriptorSet::builder()
                .dst_set(set)
                .dst_binding(GLYPH_PROJECTION_BINDING)
                .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                .buffer_info(&projection_info)
                .build(),
        ];

        unsafe {
            self.device.update_descriptor_sets(&writes, &[]);
        }
        Ok(set)
    }

    /// Return sets to the pool
    pub fn free(&self, sets: &[vk::DescriptorSet]) -> VulkanResult<()> {
        if sets.is_empty() {
            return Ok(());
        }
        unsafe { self.device.free_descriptor_sets(self.pool, sets) }.map_err(VulkanError::Api)
    }

    /// Maximum number of live sets
    pub const fn max_sets(&self) -> u32 {
        self.max_sets
    }

    /// Get the pool handle
    pub const fn handle(&self) -> vk::DescriptorPool {
        self.pool
    }
}

impl Drop for DescriptorPool {
    fn drop(&mut self) {
        if is_live(self.pool) {
            unsafe {
                self.device.destroy_descriptor_pool(self.pool, None);
            }
            self.pool = vk::DescriptorPool::null();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_layout_bindings() {
        let builder = DescriptorSetLayout::glyph_builder();
        let bindings = builder.bindings();

        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings[0].descriptor_type, vk::DescriptorType::COMBINED_IMAGE_SAMPLER);
        assert_eq!(bindings[0].stage_flags, vk::ShaderStageFlags::FRAGMENT);
        assert_eq!(bindings[1].binding, GLYPH_COLOR_BINDING);
        assert_eq!(bindings[1].descriptor_type, vk::DescriptorType::UNIFORM_BUFFER);
        assert_eq!(bindings[2].stage_flags, vk::ShaderStageFlags::VERTEX);
    }
}
