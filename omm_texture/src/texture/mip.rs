//! Per-mip geometry and buffer layout

use glam::{IVec2, Vec2};
use crate::texture::arena::{align_up, DATA_ALIGNMENT};
use crate::texture::format::{TextureFormat, TilingMode};

/// Largest accepted width or height
pub const MAX_DIMENSION: u32 = 65536;

/// Geometry of one mip level plus its location in the shared buffers
#[derive(Debug, Clone, PartialEq)]
pub struct MipLevel {
    pub size: IVec2,
    /// Trailing-zero count per axis; only meaningful when `size_is_pow2`
    pub size_log2: IVec2,
    pub size_f: Vec2,
    pub rcp_size: Vec2,
    pub size_is_pow2: bool,
    /// Byte offset into the pixel buffer
    pub data_offset: usize,
    /// Texels reserved for this mip (the Morton square over-allocates)
    pub num_elements: usize,
    /// Byte offset into the SAT buffer
    pub data_offset_sat: usize,
}

impl MipLevel {
    /// Geometry for a `width` x `height` mip, offsets left at zero
    pub fn new(width: u32, height: u32, tiling: TilingMode) -> Self {
        let size = IVec2::new(width as i32, height as i32);
        let size_f = size.as_vec2();
        Self {
            size,
            size_log2: size_log2(size),
            size_f,
            rcp_size: Vec2::ONE / size_f,
            size_is_pow2: width.is_power_of_two() && height.is_power_of_two(),
            data_offset: 0,
            num_elements: element_count(width, height, tiling),
            data_offset_sat: 0,
        }
    }

    /// Rebuild a mip from persisted fields, re-deriving what is not stored
    pub fn from_persisted(
        size: IVec2,
        rcp_size: Vec2,
        data_offset: usize,
        num_elements: usize,
        data_offset_sat: usize,
    ) -> Self {
        Self {
            size,
            size_log2: size_log2(size),
            size_f: size.as_vec2(),
            rcp_size,
            size_is_pow2: (size.x as u32).is_power_of_two() && (size.y as u32).is_power_of_two(),
            data_offset,
            num_elements,
            data_offset_sat,
        }
    }

    pub fn width(&self) -> usize {
        self.size.x as usize
    }

    pub fn height(&self) -> usize {
        self.size.y as usize
    }

    /// Texels actually covered by the image (no Morton padding)
    pub fn texel_count(&self) -> usize {
        self.width() * self.height()
    }
}

fn size_log2(size: IVec2) -> IVec2 {
    IVec2::new(size.x.trailing_zeros() as i32, size.y.trailing_zeros() as i32)
}

/// Texel slots a mip needs under `tiling`
pub fn element_count(width: u32, height: u32, tiling: TilingMode) -> usize {
    match tiling {
        TilingMode::Linear => width as usize * height as usize,
        TilingMode::MortonZ => {
            let side = width.max(height).next_power_of_two() as usize;
            side * side
        }
    }
}

/// Result of laying out a mip chain in the pixel and SAT buffers
#[derive(Debug, Clone)]
pub struct MipChainLayout {
    pub mips: Vec<MipLevel>,
    pub data_size: usize,
    /// Zero when the SAT is disabled
    pub sat_size: usize,
}

impl MipChainLayout {
    /// Place every mip at a 64-byte aligned offset, back to back
    ///
    /// The SAT is only laid out when `alpha_cutoff >= 0` and the first
    /// mip's element count fits a 32-bit running count. The check looks
    /// at mip 0 only and applies to the whole chain.
    pub fn build(
        dims: &[(u32, u32)],
        format: TextureFormat,
        tiling: TilingMode,
        alpha_cutoff: f32,
    ) -> Self {
        let bytes_per_pixel = format.bytes_per_pixel();
        let mut mips: Vec<MipLevel> = dims
            .iter()
            .map(|&(width, height)| MipLevel::new(width, height, tiling))
            .collect();

        let enable_sat = alpha_cutoff >= 0.0
            && mips
                .first()
                .is_some_and(|mip| (mip.num_elements as u64) < u32::MAX as u64);

        let mut data_size = 0usize;
        let mut sat_size = 0usize;
        for mip in &mut mips {
            mip.data_offset = data_size;
            mip.data_offset_sat = sat_size;

            data_size = align_up(data_size + bytes_per_pixel * mip.num_elements, DATA_ALIGNMENT);
            if enable_sat {
                sat_size = align_up(
                    sat_size + std::mem::size_of::<u32>() * mip.num_elements,
                    DATA_ALIGNMENT,
                );
            }
        }

        Self { mips, data_size, sat_size }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mip_tests.rs"]
mod tests;
