//! Texture addressing: maps out-of-range texel coordinates back into a mip
//!
//! Each addressing mode acts on one axis at a time. The resolver hands
//! back a tagged `TexelCoord` rather than magic sentinel values, so the
//! sampler must deal with `Border` and `Invalid` taps explicitly.

use glam::{IVec2, Vec2};

/// Addressing mode applied outside `[0, size)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureAddressMode {
    Wrap,
    Mirror,
    Clamp,
    Border,
    MirrorOnce,
}

/// A resolved tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexelCoord {
    /// In-bounds texel, safe to load
    Valid(IVec2),
    /// Outside the texture under `Border` addressing
    Border,
    /// No texel could be computed (non-finite or overflowing position)
    Invalid,
}

/// Bilinear tap order returned by `gather_tex_coord4`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexelOffset {
    I0x0 = 0,
    I1x0 = 1,
    I0x1 = 2,
    I1x1 = 3,
}

/// Resolve one axis; `None` means the border
#[inline]
fn resolve_axis(mode: TextureAddressMode, is_pow2: bool, coord: i32, size: i32, size_log2: i32) -> Option<i32> {
    match mode {
        TextureAddressMode::Wrap => {
            if is_pow2 {
                Some(coord & (size - 1))
            } else {
                Some(coord.rem_euclid(size))
            }
        }
        TextureAddressMode::Mirror => {
            // -1 mirrors onto 0, -2 onto 1, ...
            let folded = if coord < 0 { -(coord + 1) } else { coord };
            let (flipped, wrapped) = if is_pow2 {
                ((folded >> size_log2) & 1 == 1, folded & (size - 1))
            } else {
                ((folded / size) % 2 == 1, folded % size)
            };
            Some(if flipped { size - wrapped - 1 } else { wrapped })
        }
        TextureAddressMode::Clamp => Some(coord.clamp(0, size - 1)),
        TextureAddressMode::Border => {
            if coord < 0 || coord >= size {
                None
            } else {
                Some(coord)
            }
        }
        TextureAddressMode::MirrorOnce => {
            let folded = if coord < 0 { -(coord + 1) } else { coord };
            Some(folded.clamp(0, size - 1))
        }
    }
}

fn compose(x: Option<i32>, y: Option<i32>) -> TexelCoord {
    match (x, y) {
        (Some(x), Some(y)) => TexelCoord::Valid(IVec2::new(x, y)),
        _ => TexelCoord::Border,
    }
}

/// Resolve a single integer texel coordinate
pub fn get_tex_coord(
    mode: TextureAddressMode,
    is_pow2: bool,
    coord: IVec2,
    size: IVec2,
    size_log2: IVec2,
) -> TexelCoord {
    compose(
        resolve_axis(mode, is_pow2, coord.x, size.x, size_log2.x),
        resolve_axis(mode, is_pow2, coord.y, size.y, size_log2.y),
    )
}

/// Resolve the four bilinear taps around a pixel-space position
///
/// `pixel` is the un-floored position (`uv * size - 0.5`). Taps come back
/// indexed by `TexelOffset`: `[I0x0, I1x0, I0x1, I1x1]`.
pub fn gather_tex_coord4(
    mode: TextureAddressMode,
    is_pow2: bool,
    pixel: Vec2,
    size: IVec2,
    size_log2: IVec2,
) -> [TexelCoord; 4] {
    const INVALID: [TexelCoord; 4] = [TexelCoord::Invalid; 4];

    if !pixel.is_finite() {
        return INVALID;
    }
    let floor = pixel.floor();
    let in_range = |v: f32| v >= i32::MIN as f32 && v < i32::MAX as f32;
    if !in_range(floor.x) || !in_range(floor.y) {
        return INVALID;
    }

    let base = floor.as_ivec2();
    let (Some(next_x), Some(next_y)) = (base.x.checked_add(1), base.y.checked_add(1)) else {
        return INVALID;
    };

    let x0 = resolve_axis(mode, is_pow2, base.x, size.x, size_log2.x);
    let y0 = resolve_axis(mode, is_pow2, base.y, size.y, size_log2.y);
    let x1 = resolve_axis(mode, is_pow2, next_x, size.x, size_log2.x);
    let y1 = resolve_axis(mode, is_pow2, next_y, size.y, size_log2.y);

    [compose(x0, y0), compose(x1, y0), compose(x0, y1), compose(x1, y1)]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "address_tests.rs"]
mod tests;
