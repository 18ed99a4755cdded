//! Texel fetch strategies
//!
//! Every `(TextureFormat, TilingMode)` pair gets its own monomorphized
//! fetch function. The store picks one when it is populated and keeps the
//! function pointer, so `load` never re-dispatches on format or tiling.

use glam::IVec2;
use crate::texture::arena::AlignedArena;
use crate::texture::format::{TextureFormat, TilingMode};
use crate::texture::mip::MipLevel;
use crate::texture::morton;

/// Fetch one texel of `mip` from the pixel arena
pub type LoadFn = fn(&AlignedArena, &MipLevel, IVec2) -> f32;

/// Maps an in-bounds texel coordinate to its slot within a mip
pub trait TexelLayout {
    fn index(coord: IVec2, mip: &MipLevel) -> usize;
}

/// Interprets the bytes of a texel slot
pub trait TexelFormat {
    fn read(pixels: &AlignedArena, mip: &MipLevel, index: usize) -> f32;
}

pub struct LinearLayout;
pub struct MortonLayout;
pub struct Unorm8Texel;
pub struct Float32Texel;

impl TexelLayout for LinearLayout {
    #[inline(always)]
    fn index(coord: IVec2, mip: &MipLevel) -> usize {
        coord.x as usize + coord.y as usize * mip.width()
    }
}

impl TexelLayout for MortonLayout {
    #[inline(always)]
    fn index(coord: IVec2, _mip: &MipLevel) -> usize {
        morton::encode(coord.x as u32, coord.y as u32) as usize
    }
}

impl TexelFormat for Unorm8Texel {
    #[inline(always)]
    fn read(pixels: &AlignedArena, mip: &MipLevel, index: usize) -> f32 {
        let texels = pixels.view::<u8>(mip.data_offset, mip.num_elements);
        texels[index] as f32 * (1.0 / 255.0)
    }
}

impl TexelFormat for Float32Texel {
    #[inline(always)]
    fn read(pixels: &AlignedArena, mip: &MipLevel, index: usize) -> f32 {
        let texels = pixels.view::<f32>(mip.data_offset, mip.num_elements);
        texels[index]
    }
}

fn load_texel<F: TexelFormat, L: TexelLayout>(pixels: &AlignedArena, mip: &MipLevel, coord: IVec2) -> f32 {
    debug_assert!(
        coord.x >= 0 && coord.y >= 0 && coord.x < mip.size.x && coord.y < mip.size.y,
        "texel {} outside mip of size {}",
        coord,
        mip.size
    );
    let index = L::index(coord, mip);
    debug_assert!(index < mip.num_elements);
    F::read(pixels, mip, index)
}

/// Placeholder for an unpopulated store; reaching it is a caller bug
fn load_unbound(_pixels: &AlignedArena, _mip: &MipLevel, _coord: IVec2) -> f32 {
    debug_assert!(false, "load on a texture that holds no data");
    0.0
}

pub(crate) const UNBOUND_LOAD: LoadFn = load_unbound;

/// Pick the fetch function for a format/tiling pair
pub fn select_load_fn(format: TextureFormat, tiling: TilingMode) -> LoadFn {
    match (format, tiling) {
        (TextureFormat::Unorm8, TilingMode::Linear) => load_texel::<Unorm8Texel, LinearLayout>,
        (TextureFormat::Unorm8, TilingMode::MortonZ) => load_texel::<Unorm8Texel, MortonLayout>,
        (TextureFormat::Float32, TilingMode::Linear) => load_texel::<Float32Texel, LinearLayout>,
        (TextureFormat::Float32, TilingMode::MortonZ) => load_texel::<Float32Texel, MortonLayout>,
    }
}

/// Slot of `coord` under `tiling`, used by the retiling copies
#[inline]
pub fn texel_index(tiling: TilingMode, coord: IVec2, mip: &MipLevel) -> usize {
    match tiling {
        TilingMode::Linear => LinearLayout::index(coord, mip),
        TilingMode::MortonZ => MortonLayout::index(coord, mip),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "sampler_tests.rs"]
mod tests;
