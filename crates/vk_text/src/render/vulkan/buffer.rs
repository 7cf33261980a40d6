//! Buffer management for vertex, index, staging and uniform data
//!
//! Memory management following RAII patterns. A [`Buffer`] owns its
//! `vk::Buffer` and backing memory and releases both on drop; a buffer whose
//! creation failed halfway releases whatever was created.

use ash::vk;
use ash::Device;

use crate::render::vulkan::commands::submit_one_shot;
use crate::render::vulkan::{is_live, VulkanError, VulkanResult};

/// Buffer wrapper with memory management
pub struct Buffer {
    device: Device,
    buffer: vk::Buffer,
    memory: vk::DeviceMemory,
    size: vk::DeviceSize,
}

impl Buffer {
    /// Create a buffer and bind freshly allocated memory to it
    pub fn new(
        device: &Device,
        memory_properties: &vk::PhysicalDeviceMemoryProperties,
        size: vk::DeviceSize,
        usage: vk::BufferUsageFlags,
        properties: vk::MemoryPropertyFlags,
    ) -> VulkanResult<Self> {
        let buffer_info = vk::BufferCreateInfo::builder()
            .size(size)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let buffer = unsafe { device.create_buffer(&buffer_info, None) }.map_err(VulkanError::Api)?;

        // From here on, dropping `this` releases whatever has been created
        let mut this = Self {
            device: device.clone(),
            buffer,
            memory: vk::DeviceMemory::null(),
            size,
        };

        let requirements = unsafe { device.get_buffer_memory_requirements(buffer) };
        let memory_type_index = find_memory_type(memory_properties, requirements.memory_type_bits, properties)?;

        let alloc_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(requirements.size)
            .memory_type_index(memory_type_index);

        this.memory = unsafe { device.allocate_memory(&alloc_info, None) }.map_err(VulkanError::Api)?;

        unsafe { device.bind_buffer_memory(buffer, this.memory, 0) }.map_err(VulkanError::Api)?;

        Ok(this)
    }

    /// Create a host-visible, host-coherent buffer
    pub fn host_visible(
        device: &Device,
        memory_properties: &vk::PhysicalDeviceMemoryProperties,
        size: vk::DeviceSize,
        usage: vk::BufferUsageFlags,
    ) -> VulkanResult<Self> {
        Self::new(
            device,
            memory_properties,
            size,
            usage,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        )
    }

    /// Create a device-local buffer filled with `bytes` through a temporary staging buffer
    pub fn device_local_with_data(
        device: &Device,
        memory_properties: &vk::PhysicalDeviceMemoryProperties,
        command_pool: vk::CommandPool,
        queue: vk::Queue,
        usage: vk::BufferUsageFlags,
        bytes: &[u8],
    ) -> VulkanResult<Self> {
        let size = bytes.len() as vk::DeviceSize;
        let staging = Self::host_visible(device, memory_properties, size, vk::BufferUsageFlags::TRANSFER_SRC)?;
        staging.write(bytes)?;

        let buffer = Self::new(
            device,
            memory_properties,
            size,
            usage | vk::BufferUsageFlags::TRANSFER_DST,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        )?;
        buffer.copy_from(command_pool, queue, &staging, size)?;

        Ok(buffer)
    }

    /// Copy `bytes` into host-visible memory
    pub fn write(&self, bytes: &[u8]) -> VulkanResult<()> {
        let len = bytes.len() as vk::DeviceSize;
        if len > self.size {
            return Err(VulkanError::InitializationFailed(format!(
                "{} bytes do not fit in a buffer of {} bytes",
                len, self.size
            )));
        }
        if bytes.is_empty() {
            return Ok(());
        }

        unsafe {
            let ptr = self
                .device
                .map_memory(self.memory, 0, len, vk::MemoryMapFlags::empty())
                .map_err(VulkanError::Api)?;
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.cast::<u8>(), bytes.len());
            self.device.unmap_memory(self.memory);
        }
        Ok(())
    }

    /// Copy the first `size` bytes of `src` into this buffer and wait for completion
    pub fn copy_from(
        &self,
        command_pool: vk::CommandPool,
        queue: vk::Queue,
        src: &Self,
        size: vk::DeviceSize,
    ) -> VulkanResult<()> {
        let region = vk::BufferCopy {
            src_offset: 0,
            dst_offset: 0,
            size,
        };
        submit_one_shot(&self.device, command_pool, queue, |command_buffer| unsafe {
            self.device
                .cmd_copy_buffer(command_buffer, src.buffer, self.buffer, &[region]);
        })
    }

    /// Get buffer handle
    pub const fn handle(&self) -> vk::Buffer {
        self.buffer
    }

    /// Get size in bytes
    pub const fn size(&self) -> vk::DeviceSize {
        self.size
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            if is_live(self.buffer) {
                self.device.destroy_buffer(self.buffer, None);
                self.buffer = vk::Buffer::null();
            }
            if is_live(self.memory) {
                self.device.free_memory(self.memory, None);
                self.memory = vk::DeviceMemory::null();
            }
        }
    }
}

/// Find memory type with required properties
pub fn find_memory_type(
    memory_properties: &vk::PhysicalDeviceMemoryProperties,
    type_filter: u32,
    properties: vk::MemoryPropertyFlags,
) -> VulkanResult<u32> {
    (0..memory_properties.memory_type_count)
        .find(|&i| {
            (type_filter & (1 << i)) != 0
                && memory_properties.memory_types[i as usize]
                    .property_flags
                    .contains(properties)
        })
        .ok_or(VulkanError::NoSuitableMemoryType)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_properties(flags: &[vk::MemoryPropertyFlags]) -> vk::PhysicalDeviceMemoryProperties {
        let mut properties = vk::PhysicalDeviceMemoryProperties::default();
        for (i, &flag) in flags.iter().enumerate() {
            properties.memory_types[i].property_flags = flag;
        }
        properties.memory_type_count = flags.len() as u32;
        properties
    }

    #[test]
    fn test_find_memory_type_respects_filter_and_flags() {
        let host = vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;
        let properties = memory_properties(&[vk::MemoryPropertyFlags::DEVICE_LOCAL, host, host]);

        assert_eq!(find_memory_type(&properties, 0b111, host).unwrap(), 1);
        assert_eq!(find_memory_type(&properties, 0b100, host).unwrap(), 2);
        assert_eq!(
            find_memory_type(&properties, 0b111, vk::MemoryPropertyFlags::DEVICE_LOCAL).unwrap(),
            0
        );
    }

    #[test]
    fn test_find_memory_type_without_match() {
        let properties = memory_properties(&[vk::MemoryPropertyFlags::DEVICE_LOCAL]);
        let result = find_memory_type(&properties, 0b1, vk::MemoryPropertyFlags::HOST_VISIBLE);
        assert!(matches!(result, Err(VulkanError::NoSuitableMemoryType)));
    }
}
