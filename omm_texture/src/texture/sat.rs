//! Summed-area table over a per-texel coverage mask
//!
//! Tables are always row-major (`x + y * width`), whatever the tiling of
//! the pixel buffer they were derived from.

use glam::IVec2;

/// Fill `table` with the 2D prefix sum of `covered` over a `size` mip
///
/// `table` must hold at least `size.x * size.y` entries.
pub fn build_sat(table: &mut [u32], size: IVec2, mut covered: impl FnMut(IVec2) -> bool) {
    let width = size.x as usize;
    let height = size.y as usize;
    debug_assert!(table.len() >= width * height);

    for y in 0..height {
        for x in 0..width {
            table[x + y * width] = covered(IVec2::new(x as i32, y as i32)) as u32;
        }
    }

    // sum in X
    for row in table[..width * height].chunks_exact_mut(width) {
        for x in 1..width {
            row[x] += row[x - 1];
        }
    }

    // sum in Y
    for y in 1..height {
        let (above, current) = table.split_at_mut(y * width);
        let above = &above[(y - 1) * width..];
        for x in 0..width {
            current[x] += above[x];
        }
    }
}

/// Covered texel count in the closed rectangle `[start, end]`
pub fn query_sat(table: &[u32], width: i32, start: IVec2, end: IVec2) -> u32 {
    debug_assert!(start.x <= end.x && start.y <= end.y, "empty SAT rectangle {}..{}", start, end);

    let at = |x: i32, y: i32| -> u32 {
        if x < 0 || y < 0 {
            0
        } else {
            table[x as usize + y as usize * width as usize]
        }
    };

    let a = at(start.x - 1, start.y - 1);
    let b = at(end.x, start.y - 1);
    let c = at(start.x - 1, end.y);
    let d = at(end.x, end.y);

    d.wrapping_add(a).wrapping_sub(b).wrapping_sub(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "sat_tests.rs"]
mod tests;
