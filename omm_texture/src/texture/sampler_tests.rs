use super::*;

// ============================================================================
// Helpers
// ============================================================================

/// 4x2 mip stored at offset 0, texel value = x + 4 * y
fn float_arena(tiling: TilingMode) -> (AlignedArena, MipLevel) {
    let mip = MipLevel::new(4, 2, tiling);
    let mut arena = AlignedArena::zeroed(mip.num_elements * 4);
    {
        let texels = arena.view_mut::<f32>(0, mip.num_elements);
        for y in 0..2 {
            for x in 0..4 {
                let coord = IVec2::new(x, y);
                texels[texel_index(tiling, coord, &mip)] = (x + 4 * y) as f32;
            }
        }
    }
    (arena, mip)
}

// ============================================================================
// Index math
// ============================================================================

#[test]
fn test_linear_index() {
    let mip = MipLevel::new(5, 3, TilingMode::Linear);
    assert_eq!(texel_index(TilingMode::Linear, IVec2::new(0, 0), &mip), 0);
    assert_eq!(texel_index(TilingMode::Linear, IVec2::new(4, 0), &mip), 4);
    assert_eq!(texel_index(TilingMode::Linear, IVec2::new(1, 2), &mip), 11);
}

#[test]
fn test_morton_index_ignores_width() {
    let mip = MipLevel::new(5, 3, TilingMode::MortonZ);
    assert_eq!(texel_index(TilingMode::MortonZ, IVec2::new(1, 1), &mip), 3);
    assert_eq!(texel_index(TilingMode::MortonZ, IVec2::new(4, 2), &mip), morton::encode(4, 2) as usize);
}

// ============================================================================
// Strategy table
// ============================================================================

#[test]
fn test_float_strategies() {
    for tiling in [TilingMode::Linear, TilingMode::MortonZ] {
        let (arena, mip) = float_arena(tiling);
        let load = select_load_fn(TextureFormat::Float32, tiling);
        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(load(&arena, &mip, IVec2::new(x, y)), (x + 4 * y) as f32);
            }
        }
    }
}

#[test]
fn test_unorm8_strategy_normalizes() {
    let mip = MipLevel::new(2, 1, TilingMode::Linear);
    let arena = AlignedArena::from_bytes(&[0, 255]);
    let load = select_load_fn(TextureFormat::Unorm8, TilingMode::Linear);

    assert_eq!(load(&arena, &mip, IVec2::new(0, 0)), 0.0);
    assert!((load(&arena, &mip, IVec2::new(1, 0)) - 1.0).abs() < 1e-6);
}

#[test]
fn test_unorm8_morton_strategy() {
    let mip = MipLevel::new(2, 2, TilingMode::MortonZ);
    // Morton order: (0,0) (1,0) (0,1) (1,1)
    let arena = AlignedArena::from_bytes(&[0, 51, 102, 255]);
    let load = select_load_fn(TextureFormat::Unorm8, TilingMode::MortonZ);

    assert!((load(&arena, &mip, IVec2::new(1, 0)) - 0.2).abs() < 1e-6);
    assert!((load(&arena, &mip, IVec2::new(0, 1)) - 0.4).abs() < 1e-6);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic]
fn test_out_of_bounds_load_is_caught_in_debug() {
    let (arena, mip) = float_arena(TilingMode::Linear);
    let load = select_load_fn(TextureFormat::Float32, TilingMode::Linear);
    load(&arena, &mip, IVec2::new(4, 0));
}
