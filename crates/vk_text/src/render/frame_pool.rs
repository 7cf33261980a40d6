//! Per-frame draw resource pool
//!
//! Each frame in flight owns a [`FrameResources`]: a ring of [`DrawSlot`]s,
//! a ring of color uniforms and the descriptor sets handed out while the
//! frame was recorded. Rings only grow; [`FrameResources::reset`] rewinds the
//! cursors so the next recording of that frame overwrites slots in place.
//!
//! ```text
//! SlotRing:  [slot0][slot1][slot2][slot3]
//!                          ▲ cursor
//!            next_slot() → Occupied(slot2)   (restage in place)
//!            ...at end   → Vacant            (append a new slot)
//! ```

use crate::render::backend::GpuBackend;
use crate::render::{RenderError, RenderResult};

/// Number of frames recorded concurrently
pub const FRAMES_IN_FLIGHT: usize = 2;

/// Append-only pool of reusable slots indexed by a rewindable cursor
#[derive(Debug)]
pub struct SlotRing<T> {
    slots: Vec<T>,
    cursor: usize,
}

/// Result of [`SlotRing::next_slot`]
pub enum SlotEntry<'a, T> {
    /// A slot from an earlier pass; overwrite its contents
    Occupied(&'a mut T),
    /// The ring is exhausted; insert a fresh slot
    Vacant(VacantSlot<'a, T>),
}

/// Insertion point at the end of a [`SlotRing`]
pub struct VacantSlot<'a, T> {
    ring: &'a mut SlotRing<T>,
}

impl<'a, T> VacantSlot<'a, T> {
    /// Append `value` and advance the cursor past it
    pub fn insert(self, value: T) -> &'a mut T {
        let ring = self.ring;
        ring.slots.push(value);
        ring.cursor = ring.slots.len();
        let index = ring.cursor - 1;
        &mut ring.slots[index]
    }
}

impl<T> SlotRing<T> {
    /// Create an empty ring
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            cursor: 0,
        }
    }

    /// Take the slot under the cursor, or an insertion point if there is none
    pub fn next_slot(&mut self) -> SlotEntry<'_, T> {
        if self.cursor < self.slots.len() {
            let index = self.cursor;
            self.cursor += 1;
            SlotEntry::Occupied(&mut self.slots[index])
        } else {
            SlotEntry::Vacant(VacantSlot { ring: self })
        }
    }

    /// Rewind the cursor; slots are kept for reuse
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Number of slots handed out since the last rewind
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of slots ever allocated
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slots handed out since the last rewind
    pub fn in_use(&self) -> &[T] {
        &self.slots[..self.cursor]
    }
}

impl<T> Default for SlotRing<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Buffers for drawing one glyph quad
pub struct DrawSlot<B: GpuBackend> {
    /// Four (x, y, u, v) vertices
    pub vertices: B::Buffer,
    /// Staging buffer used to restage `vertices`
    pub staging: B::Buffer,
    /// Six indices forming two triangles
    pub indices: B::Buffer,
}

impl<B: GpuBackend> DrawSlot<B> {
    /// Allocate a slot initialised with `vertices` and `indices`
    pub fn create(gpu: &mut B, vertices: &[f32], indices: &[u32]) -> RenderResult<Self> {
        let staging = gpu.create_staging_buffer(std::mem::size_of_val(vertices) as u64)?;
        Ok(Self {
            vertices: gpu.create_vertex_buffer(vertices)?,
            staging,
            indices: gpu.create_index_buffer(indices)?,
        })
    }

    /// Overwrite the vertex data in place
    ///
    /// The index buffer never changes: every slot draws the same two triangles.
    pub fn restage(&self, gpu: &mut B, vertices: &[f32]) -> RenderResult<()> {
        gpu.restage_buffer(&self.vertices, &self.staging, bytemuck::cast_slice(vertices))
    }
}

/// Everything one frame slot owns
pub struct FrameResources<B: GpuBackend> {
    pub(crate) slots: SlotRing<DrawSlot<B>>,
    pub(crate) colors: SlotRing<B::Buffer>,
    pub(crate) descriptor_sets: Vec<B::DescriptorSet>,
}

impl<B: GpuBackend> FrameResources<B> {
    /// Create empty frame resources
    pub const fn new() -> Self {
        Self {
            slots: SlotRing::new(),
            colors: SlotRing::new(),
            descriptor_sets: Vec::new(),
        }
    }

    /// Start a new recording of this frame
    ///
    /// Rewinds both rings and frees every descriptor set handed out during
    /// the previous recording. Calling it again without drawing is a no-op.
    pub fn reset(&mut self, gpu: &mut B, pool: &B::DescriptorPool) -> RenderResult<()> {
        self.slots.rewind();
        self.colors.rewind();

        if !self.descriptor_sets.is_empty() {
            log::debug!("Freeing {} glyph descriptor sets", self.descriptor_sets.len());
            gpu.free_descriptor_sets(pool, &self.descriptor_sets)?;
            self.descriptor_sets.clear();
        }

        Ok(())
    }

    /// Draw slots used since the last reset
    pub const fn slots_in_use(&self) -> usize {
        self.slots.cursor()
    }

    /// Draw slots allocated over the lifetime of this frame
    pub fn slot_capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Color payloads used since the last reset
    pub const fn colors_in_use(&self) -> usize {
        self.colors.cursor()
    }

    /// Descriptor sets allocated since the last reset
    pub fn descriptor_sets(&self) -> &[B::DescriptorSet] {
        &self.descriptor_sets
    }

    /// Draw slots used since the last reset, in draw order
    pub fn active_slots(&self) -> &[DrawSlot<B>] {
        self.slots.in_use()
    }
}

impl<B: GpuBackend> Default for FrameResources<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed array of per-frame state, addressed by frame index
pub struct FrameSet<B: GpuBackend> {
    frames: [FrameResources<B>; FRAMES_IN_FLIGHT],
}

impl<B: GpuBackend> FrameSet<B> {
    /// Create empty state for every frame in flight
    pub fn new() -> Self {
        Self {
            frames: std::array::from_fn(|_| FrameResources::new()),
        }
    }

    /// State of `frame`
    pub fn get(&self, frame: usize) -> RenderResult<&FrameResources<B>> {
        self.frames.get(frame).ok_or(RenderError::InvalidFrame {
            index: frame,
            frames: FRAMES_IN_FLIGHT,
        })
    }

    /// Mutable state of `frame`
    pub fn get_mut(&mut self, frame: usize) -> RenderResult<&mut FrameResources<B>> {
        self.frames.get_mut(frame).ok_or(RenderError::InvalidFrame {
            index: frame,
            frames: FRAMES_IN_FLIGHT,
        })
    }
}

impl<B: GpuBackend> Default for FrameSet<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::headless::HeadlessBackend;

    #[test]
    fn test_slot_ring_grows_then_reuses() {
        let mut ring = SlotRing::new();

        for value in 0..3 {
            match ring.next_slot() {
                SlotEntry::Vacant(slot) => {
                    slot.insert(value);
                }
                SlotEntry::Occupied(_) => panic!("empty ring handed out an occupied slot"),
            }
        }
        assert_eq!(ring.cursor(), 3);
        assert_eq!(ring.capacity(), 3);

        ring.rewind();
        assert_eq!(ring.cursor(), 0);
        assert!(ring.in_use().is_empty());

        match ring.next_slot() {
            SlotEntry::Occupied(slot) => *slot = 10,
            SlotEntry::Vacant(_) => panic!("rewound ring should reuse its first slot"),
        }
        assert_eq!(ring.in_use(), &[10]);
        assert_eq!(ring.capacity(), 3);
    }

    #[test]
    fn test_slot_ring_appends_past_previous_high_water_mark() {
        let mut ring = SlotRing::new();
        if let SlotEntry::Vacant(slot) = ring.next_slot() {
            slot.insert('a');
        }
        ring.rewind();

        assert!(matches!(ring.next_slot(), SlotEntry::Occupied(_)));
        assert!(matches!(ring.next_slot(), SlotEntry::Vacant(_)));
        // A vacant entry that is never filled does not move the cursor
        assert_eq!(ring.cursor(), 1);
        assert_eq!(ring.capacity(), 1);
    }

    #[test]
    fn test_frame_set_rejects_out_of_range_frames() {
        let mut set = FrameSet::<HeadlessBackend>::new();
        assert!(set.get(FRAMES_IN_FLIGHT - 1).is_ok());
        assert!(matches!(
            set.get_mut(FRAMES_IN_FLIGHT),
            Err(RenderError::InvalidFrame { index, frames }) if index == FRAMES_IN_FLIGHT && frames == FRAMES_IN_FLIGHT
        ));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut gpu = HeadlessBackend::new();
        let pool = gpu.create_descriptor_pool(4).unwrap();
        let mut frame = FrameResources::<HeadlessBackend>::new();

        frame.reset(&mut gpu, &pool).unwrap();
        frame.reset(&mut gpu, &pool).unwrap();

        assert_eq!(frame.slots_in_use(), 0);
        assert!(frame.descriptor_sets().is_empty());
        assert_eq!(gpu.stats().descriptor_sets_freed, 0);
    }
}
