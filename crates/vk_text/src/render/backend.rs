//! Backend abstraction traits for the text renderer
//!
//! The text system never talks to a graphics API directly. It asks a
//! [`GpuBackend`] for resources and records work into a [`CommandSink`].
//! Device, pipeline, sampler and projection buffers stay owned by the caller;
//! they are only borrowed for the duration of a call through [`DrawContext`].

use crate::foundation::math::Extent;
use crate::render::RenderResult;

/// GPU resource factory used by fonts
///
/// Resource handles are move-only values owned by whoever requested them.
/// Implementations release the underlying API objects when a handle is
/// dropped, and dropping a handle whose creation failed halfway is safe.
pub trait GpuBackend {
    /// Sampled single-channel glyph image
    type Texture;
    /// Vertex, index, staging or uniform buffer
    type Buffer;
    /// Pool descriptor sets are carved from
    type DescriptorPool;
    /// Descriptor set binding a glyph texture, a color and a projection
    type DescriptorSet: Copy + std::fmt::Debug;

    /// Upload an 8-bit coverage bitmap as a sampled texture
    fn create_glyph_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> RenderResult<Self::Texture>;

    /// Create a vertex buffer initialised with `vertices`
    fn create_vertex_buffer(&mut self, vertices: &[f32]) -> RenderResult<Self::Buffer>;

    /// Create an index buffer initialised with `indices`
    fn create_index_buffer(&mut self, indices: &[u32]) -> RenderResult<Self::Buffer>;

    /// Create a host-visible staging buffer of `size` bytes
    fn create_staging_buffer(&mut self, size: u64) -> RenderResult<Self::Buffer>;

    /// Overwrite `dst` with `bytes` by way of `staging`, without reallocating
    fn restage_buffer(&mut self, dst: &Self::Buffer, staging: &Self::Buffer, bytes: &[u8]) -> RenderResult<()>;

    /// Create a host-visible uniform buffer holding `bytes`
    fn create_uniform_buffer(&mut self, bytes: &[u8]) -> RenderResult<Self::Buffer>;

    /// Overwrite the contents of a uniform buffer
    fn write_uniform_buffer(&mut self, buffer: &Self::Buffer, bytes: &[u8]) -> RenderResult<()>;

    /// Create a descriptor pool able to hold `max_sets` glyph descriptor sets
    fn create_descriptor_pool(&mut self, max_sets: u32) -> RenderResult<Self::DescriptorPool>;

    /// Allocate a descriptor set binding {texture, color uniform, projection uniform}
    fn allocate_glyph_descriptor(
        &mut self,
        pool: &Self::DescriptorPool,
        texture: &Self::Texture,
        color: &Self::Buffer,
        projection: &Self::Buffer,
    ) -> RenderResult<Self::DescriptorSet>;

    /// Return descriptor sets to the pool they came from
    fn free_descriptor_sets(&mut self, pool: &Self::DescriptorPool, sets: &[Self::DescriptorSet]) -> RenderResult<()>;
}

/// Command recording target
///
/// Commands are buffered by the implementation and submitted by the caller.
pub trait CommandSink<B: GpuBackend> {
    /// Bind the text pipeline
    fn bind_pipeline(&mut self);

    /// Bind a vertex buffer at binding 0
    fn bind_vertex_buffer(&mut self, buffer: &B::Buffer);

    /// Bind a `u32` index buffer
    fn bind_index_buffer(&mut self, buffer: &B::Buffer);

    /// Bind a descriptor set at set 0
    fn bind_descriptor_set(&mut self, set: B::DescriptorSet);

    /// Draw `index_count` indices from the bound buffers
    fn draw_indexed(&mut self, index_count: u32);
}

/// Everything a render call borrows from its caller
pub struct DrawContext<'a, B: GpuBackend, S: CommandSink<B>> {
    /// Resource factory
    pub gpu: &'a mut B,
    /// Command recording target for the current frame
    pub commands: &'a mut S,
    /// Projection uniform of the current frame
    pub projection: &'a B::Buffer,
    /// Frame slot being recorded
    pub frame: usize,
    /// Size of the surface being rendered to
    pub extent: Extent,
}

impl<'a, B: GpuBackend, S: CommandSink<B>> DrawContext<'a, B, S> {
    /// Bundle the borrowed per-frame state
    pub fn new(gpu: &'a mut B, commands: &'a mut S, projection: &'a B::Buffer, frame: usize, extent: Extent) -> Self {
        Self {
            gpu,
            commands,
            projection,
            frame,
            extent,
        }
    }
}
