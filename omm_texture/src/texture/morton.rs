//! Morton (Z-order) codec
//!
//! Bit-interleaves a 2D coordinate into a 1D index: even bits carry x,
//! odd bits carry y. Both axes must be below 65536, which keeps every
//! index inside a `u32`.
//!
//! Uses the "interleave by magic numbers" construction from
//! <https://graphics.stanford.edu/~seander/bithacks.html#InterleaveBMN>.

use glam::UVec2;

/// Largest coordinate (exclusive) on either axis
pub const MORTON_AXIS_LIMIT: u32 = 1 << 16;

/// Spread the low 16 bits of `v` to the even bit positions
#[inline(always)]
fn part1by1(v: u32) -> u32 {
    let mut v = v & 0x0000_FFFF;
    v = (v | (v << 8)) & 0x00FF_00FF;
    v = (v | (v << 4)) & 0x0F0F_0F0F;
    v = (v | (v << 2)) & 0x3333_3333;
    v = (v | (v << 1)) & 0x5555_5555;
    v
}

/// Gather the even bits of `v` into the low 16 bits
#[inline(always)]
fn compact1by1(v: u32) -> u32 {
    let mut v = v & 0x5555_5555;
    v = (v | (v >> 1)) & 0x3333_3333;
    v = (v | (v >> 2)) & 0x0F0F_0F0F;
    v = (v | (v >> 4)) & 0x00FF_00FF;
    v = (v | (v >> 8)) & 0x0000_FFFF;
    v
}

/// Interleave `(x, y)` into a Morton index
#[inline(always)]
pub fn encode(x: u32, y: u32) -> u32 {
    debug_assert!(x < MORTON_AXIS_LIMIT && y < MORTON_AXIS_LIMIT);
    part1by1(x) | (part1by1(y) << 1)
}

/// Split a Morton index back into `(x, y)`
#[inline(always)]
pub fn decode(index: u32) -> UVec2 {
    UVec2::new(compact1by1(index), compact1by1(index >> 1))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "morton_tests.rs"]
mod tests;
