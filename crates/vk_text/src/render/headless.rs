//! Headless backend
//!
//! An in-memory [`GpuBackend`] and [`CommandSink`] pair. Buffers keep their
//! bytes so callers can read back what was uploaded, descriptor pools enforce
//! their capacity, and every recorded command is kept in order. Used by the
//! test suite and by tools that only need layout output.
//!
//! Buffer and pool state lives in the handles, so dropping a handle releases
//! it just as dropping a Vulkan wrapper does.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::render::backend::{CommandSink, GpuBackend};
use crate::render::{RenderError, RenderResult};

/// Handle to a headless texture
#[derive(Debug)]
pub struct HeadlessTexture {
    id: u64,
    width: u32,
    height: u32,
}

impl HeadlessTexture {
    /// Backend-unique id
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Texture size in pixels
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Handle to a headless buffer
#[derive(Debug)]
pub struct HeadlessBuffer {
    id: u64,
    usage: BufferUsage,
    contents: RefCell<Vec<u8>>,
}

impl HeadlessBuffer {
    /// Backend-unique id
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// What the buffer was created for
    pub const fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Copy of the bytes the buffer currently holds
    pub fn bytes(&self) -> Vec<u8> {
        self.contents.borrow().clone()
    }

    /// Contents read back as native-endian `f32`s
    pub fn to_f32(&self) -> Vec<f32> {
        self.contents
            .borrow()
            .chunks_exact(4)
            .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }
}

/// Purpose a headless buffer was created for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Vertex data
    Vertex,
    /// Index data
    Index,
    /// Host-visible staging memory
    Staging,
    /// Uniform data
    Uniform,
}

/// Handle to a headless descriptor pool
///
/// Dropping the pool releases every set still allocated from it.
#[derive(Debug)]
pub struct HeadlessDescriptorPool {
    id: u64,
    state: Rc<RefCell<PoolState>>,
}

impl HeadlessDescriptorPool {
    /// Number of sets currently allocated from the pool
    pub fn live_sets(&self) -> usize {
        self.state.borrow().live.len()
    }
}

/// Handle to a headless descriptor set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessDescriptorSet(u64);

/// Resource ids a descriptor set was written with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorBinding {
    /// Glyph texture id
    pub texture: u64,
    /// Color uniform buffer id
    pub color: u64,
    /// Projection uniform buffer id
    pub projection: u64,
}

/// Counters describing what the backend has been asked to do
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessStats {
    /// Buffers created of any usage
    pub buffers_created: usize,
    /// Textures created
    pub textures_created: usize,
    /// Restage operations
    pub restages: usize,
    /// Uniform rewrites
    pub uniform_writes: usize,
    /// Descriptor sets allocated
    pub descriptor_sets_allocated: usize,
    /// Descriptor sets freed
    pub descriptor_sets_freed: usize,
}

#[derive(Debug)]
struct PoolState {
    max_sets: u32,
    live: HashMap<u64, DescriptorBinding>,
}

/// In-memory GPU backend
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    pools: Vec<Weak<RefCell<PoolState>>>,
    stats: HeadlessStats,
}

impl HeadlessBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn store_buffer(&mut self, usage: BufferUsage, bytes: Vec<u8>) -> HeadlessBuffer {
        self.stats.buffers_created += 1;
        HeadlessBuffer {
            id: self.allocate_id(),
            usage,
            contents: RefCell::new(bytes),
        }
    }

    /// Counters accumulated since creation
    pub const fn stats(&self) -> HeadlessStats {
        self.stats
    }

    /// Resources a live descriptor set was written with
    pub fn binding(&self, set: HeadlessDescriptorSet) -> Option<DescriptorBinding> {
        self.pools
            .iter()
            .filter_map(Weak::upgrade)
            .find_map(|state| state.borrow().live.get(&set.0).copied())
    }

    /// Number of descriptor pools not yet dropped
    pub fn live_pools(&self) -> usize {
        self.pools.iter().filter(|pool| pool.strong_count() > 0).count()
    }
}

impl GpuBackend for HeadlessBackend {
    type Texture = HeadlessTexture;
    type Buffer = HeadlessBuffer;
    type DescriptorPool = HeadlessDescriptorPool;
    type DescriptorSet = HeadlessDescriptorSet;

    fn create_glyph_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> RenderResult<HeadlessTexture> {
        let expected = width as usize * height as usize;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(RenderError::ResourceCreation(format!(
                "glyph bitmap {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }

        self.stats.textures_created += 1;
        Ok(HeadlessTexture {
            id: self.allocate_id(),
            width,
            height,
        })
    }

    fn create_vertex_buffer(&mut self, vertices: &[f32]) -> RenderResult<HeadlessBuffer> {
        Ok(self.store_buffer(BufferUsage::Vertex, bytemuck::cast_slice(vertices).to_vec()))
    }

    fn create_index_buffer(&mut self, indices: &[u32]) -> RenderResult<HeadlessBuffer> {
        Ok(self.store_buffer(BufferUsage::Index, bytemuck::cast_slice(indices).to_vec()))
    }

    fn create_staging_buffer(&mut self, size: u64) -> RenderResult<HeadlessBuffer> {
        let size = usize::try_from(size).map_err(|e| RenderError::ResourceCreation(e.to_string()))?;
        Ok(self.store_buffer(BufferUsage::Staging, vec![0; size]))
    }

    fn restage_buffer(&mut self, dst: &HeadlessBuffer, staging: &HeadlessBuffer, bytes: &[u8]) -> RenderResult<()> {
        for buffer in [staging, dst] {
            let mut contents = buffer.contents.borrow_mut();
            if bytes.len() > contents.len() {
                return Err(RenderError::Upload(format!(
                    "{} bytes do not fit in buffer {} of {} bytes",
                    bytes.len(),
                    buffer.id,
                    contents.len()
                )));
            }
            contents[..bytes.len()].copy_from_slice(bytes);
        }

        self.stats.restages += 1;
        Ok(())
    }

    fn create_uniform_buffer(&mut self, bytes: &[u8]) -> RenderResult<HeadlessBuffer> {
        Ok(self.store_buffer(BufferUsage::Uniform, bytes.to_vec()))
    }

    fn write_uniform_buffer(&mut self, buffer: &HeadlessBuffer, bytes: &[u8]) -> RenderResult<()> {
        let mut contents = buffer.contents.borrow_mut();
        contents.clear();
        contents.extend_from_slice(bytes);
        self.stats.uniform_writes += 1;
        Ok(())
    }

    fn create_descriptor_pool(&mut self, max_sets: u32) -> RenderResult<HeadlessDescriptorPool> {
        self.pools.retain(|pool| pool.strong_count() > 0);

        let state = Rc::new(RefCell::new(PoolState {
            max_sets,
            live: HashMap::new(),
        }));
        self.pools.push(Rc::downgrade(&state));
        Ok(HeadlessDescriptorPool {
            id: self.allocate_id(),
            state,
        })
    }

    fn allocate_glyph_descriptor(
        &mut self,
        pool: &HeadlessDescriptorPool,
        texture: &HeadlessTexture,
        color: &HeadlessBuffer,
        projection: &HeadlessBuffer,
    ) -> RenderResult<HeadlessDescriptorSet> {
        let mut state = pool.state.borrow_mut();
        if state.live.len() >= state.max_sets as usize {
            return Err(RenderError::DescriptorAllocation(format!(
                "pool {} exhausted ({} sets)",
                pool.id, state.max_sets
            )));
        }

        let id = self.allocate_id();
        state.live.insert(
            id,
            DescriptorBinding {
                texture: texture.id,
                color: color.id,
                projection: projection.id,
            },
        );
        self.stats.descriptor_sets_allocated += 1;
        Ok(HeadlessDescriptorSet(id))
    }

    fn free_descriptor_sets(&mut self, pool: &HeadlessDescriptorPool, sets: &[HeadlessDescriptorSet]) -> RenderResult<()> {
        let mut state = pool.state.borrow_mut();
        for set in sets {
            if state.live.remove(&set.0).is_some() {
                self.stats.descriptor_sets_freed += 1;
            }
        }
        Ok(())
    }
}

/// A command captured by [`RecordingSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordedCommand {
    /// Pipeline bound
    BindPipeline,
    /// Vertex buffer bound, by buffer id
    BindVertexBuffer(u64),
    /// Index buffer bound, by buffer id
    BindIndexBuffer(u64),
    /// Descriptor set bound
    BindDescriptorSet(HeadlessDescriptorSet),
    /// Indexed draw issued
    DrawIndexed(u32),
}

/// Command sink that records into a list
#[derive(Debug, Default)]
pub struct RecordingSink {
    commands: Vec<RecordedCommand>,
}

impl RecordingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far, in order
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Number of draw calls recorded
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, RecordedCommand::DrawIndexed(_)))
            .count()
    }

    /// Descriptor sets bound so far, in order
    pub fn bound_sets(&self) -> Vec<HeadlessDescriptorSet> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                RecordedCommand::BindDescriptorSet(set) => Some(*set),
                _ => None,
            })
            .collect()
    }

    /// Vertex buffer ids bound so far, in order
    pub fn bound_vertex_buffers(&self) -> Vec<u64> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                RecordedCommand::BindVertexBuffer(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Drop every recorded command
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl CommandSink<HeadlessBackend> for RecordingSink {
    fn bind_pipeline(&mut self) {
        self.commands.push(RecordedCommand::BindPipeline);
    }

    fn bind_vertex_buffer(&mut self, buffer: &HeadlessBuffer) {
        self.commands.push(RecordedCommand::BindVertexBuffer(buffer.id));
    }

    fn bind_index_buffer(&mut self, buffer: &HeadlessBuffer) {
        self.commands.push(RecordedCommand::BindIndexBuffer(buffer.id));
    }

    fn bind_descriptor_set(&mut self, set: HeadlessDescriptorSet) {
        self.commands.push(RecordedCommand::BindDescriptorSet(set));
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.commands.push(RecordedCommand::DrawIndexed(index_count));
    }
}
