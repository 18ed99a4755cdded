//! Owned, 64-byte aligned byte arena with typed views
//!
//! Backing storage is a `Vec` of cache-line sized blocks, so the arena's
//! base address is 64-byte aligned and any view starting at a 64-byte
//! aligned offset can be reinterpreted as `u32`/`f32` without copying.

use bytemuck::{Pod, Zeroable};

/// Alignment of the arena base and of every per-mip offset
pub const DATA_ALIGNMENT: usize = 64;

#[repr(C, align(64))]
#[derive(Clone, Copy)]
struct Block([u8; DATA_ALIGNMENT]);

// SAFETY: a byte array with size == alignment, no padding, any bit pattern valid.
unsafe impl Zeroable for Block {}
unsafe impl Pod for Block {}

/// Round `value` up to the next multiple of `alignment` (a power of two)
#[inline]
pub fn align_up(value: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (value + alignment - 1) & !(alignment - 1)
}

#[derive(Clone, Default)]
pub struct AlignedArena {
    blocks: Vec<Block>,
    len: usize,
}

impl AlignedArena {
    /// Zero-filled arena of `len` bytes
    pub fn zeroed(len: usize) -> Self {
        let block_count = align_up(len, DATA_ALIGNMENT) / DATA_ALIGNMENT;
        Self {
            blocks: vec![Block([0; DATA_ALIGNMENT]); block_count],
            len,
        }
    }

    /// Arena holding a copy of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut arena = Self::zeroed(bytes.len());
        arena.as_bytes_mut().copy_from_slice(bytes);
        arena
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        let bytes: &[u8] = bytemuck::cast_slice(&self.blocks);
        &bytes[..self.len]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.blocks);
        &mut bytes[..self.len]
    }

    /// `count` elements of `T` starting at byte `offset`
    ///
    /// Panics if the range leaves the arena or `offset` is not aligned
    /// for `T`.
    pub fn view<T: Pod>(&self, offset: usize, count: usize) -> &[T] {
        let end = offset + count * std::mem::size_of::<T>();
        bytemuck::cast_slice(&self.as_bytes()[offset..end])
    }

    pub fn view_mut<T: Pod>(&mut self, offset: usize, count: usize) -> &mut [T] {
        let end = offset + count * std::mem::size_of::<T>();
        bytemuck::cast_slice_mut(&mut self.as_bytes_mut()[offset..end])
    }
}

impl std::fmt::Debug for AlignedArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedArena").field("len", &self.len).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "arena_tests.rs"]
mod tests;
