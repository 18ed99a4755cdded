use super::*;

// ============================================================================
// Helpers
// ============================================================================

fn resolve_x(mode: TextureAddressMode, x: i32, size: i32) -> TexelCoord {
    let size_v = IVec2::new(size, 4);
    let log2 = IVec2::new(size.trailing_zeros() as i32, 2);
    let is_pow2 = (size as u32).is_power_of_two();
    get_tex_coord(mode, is_pow2, IVec2::new(x, 1), size_v, log2)
}

fn valid_x(x: i32) -> TexelCoord {
    TexelCoord::Valid(IVec2::new(x, 1))
}

// ============================================================================
// Per-mode behaviour
// ============================================================================

#[test]
fn test_wrap_pow2_and_non_pow2_agree() {
    for x in -9i32..9 {
        let expected = x.rem_euclid(4);
        assert_eq!(resolve_x(TextureAddressMode::Wrap, x, 4), valid_x(expected));
    }
    assert_eq!(resolve_x(TextureAddressMode::Wrap, -1, 3), valid_x(2));
    assert_eq!(resolve_x(TextureAddressMode::Wrap, 3, 3), valid_x(0));
    assert_eq!(resolve_x(TextureAddressMode::Wrap, 7, 3), valid_x(1));
}

#[test]
fn test_mirror_pow2() {
    // size 4: ... 1 0 | 0 1 2 3 | 3 2 1 0 | 0 1 ...
    let expected = [(-2, 1), (-1, 0), (0, 0), (3, 3), (4, 3), (5, 2), (7, 0), (8, 0), (9, 1)];
    for (x, want) in expected {
        assert_eq!(resolve_x(TextureAddressMode::Mirror, x, 4), valid_x(want), "x = {}", x);
    }
}

#[test]
fn test_mirror_non_pow2() {
    // size 3: ... 1 0 | 0 1 2 | 2 1 0 | 0 ...
    let expected = [(-2, 1), (-1, 0), (2, 2), (3, 2), (4, 1), (5, 0), (6, 0)];
    for (x, want) in expected {
        assert_eq!(resolve_x(TextureAddressMode::Mirror, x, 3), valid_x(want), "x = {}", x);
    }
}

#[test]
fn test_clamp() {
    assert_eq!(resolve_x(TextureAddressMode::Clamp, -5, 4), valid_x(0));
    assert_eq!(resolve_x(TextureAddressMode::Clamp, 2, 4), valid_x(2));
    assert_eq!(resolve_x(TextureAddressMode::Clamp, 40, 4), valid_x(3));
}

#[test]
fn test_border_outside_is_tagged() {
    assert_eq!(resolve_x(TextureAddressMode::Border, -1, 4), TexelCoord::Border);
    assert_eq!(resolve_x(TextureAddressMode::Border, 4, 4), TexelCoord::Border);
    assert_eq!(resolve_x(TextureAddressMode::Border, 3, 4), valid_x(3));
}

#[test]
fn test_mirror_once() {
    assert_eq!(resolve_x(TextureAddressMode::MirrorOnce, -1, 4), valid_x(0));
    assert_eq!(resolve_x(TextureAddressMode::MirrorOnce, -3, 4), valid_x(2));
    assert_eq!(resolve_x(TextureAddressMode::MirrorOnce, -10, 4), valid_x(3));
    assert_eq!(resolve_x(TextureAddressMode::MirrorOnce, 10, 4), valid_x(3));
}

// ============================================================================
// Gather
// ============================================================================

#[test]
fn test_gather_interior_taps() {
    let size = IVec2::new(4, 4);
    let log2 = IVec2::new(2, 2);
    let taps = gather_tex_coord4(TextureAddressMode::Clamp, true, Vec2::new(1.25, 2.5), size, log2);

    assert_eq!(taps[TexelOffset::I0x0 as usize], TexelCoord::Valid(IVec2::new(1, 2)));
    assert_eq!(taps[TexelOffset::I1x0 as usize], TexelCoord::Valid(IVec2::new(2, 2)));
    assert_eq!(taps[TexelOffset::I0x1 as usize], TexelCoord::Valid(IVec2::new(1, 3)));
    assert_eq!(taps[TexelOffset::I1x1 as usize], TexelCoord::Valid(IVec2::new(2, 3)));
}

#[test]
fn test_gather_wraps_across_edge() {
    let size = IVec2::new(4, 4);
    let log2 = IVec2::new(2, 2);
    let taps = gather_tex_coord4(TextureAddressMode::Wrap, true, Vec2::new(-0.5, 3.5), size, log2);

    assert_eq!(taps[0], TexelCoord::Valid(IVec2::new(3, 3)));
    assert_eq!(taps[1], TexelCoord::Valid(IVec2::new(0, 3)));
    assert_eq!(taps[2], TexelCoord::Valid(IVec2::new(3, 0)));
    assert_eq!(taps[3], TexelCoord::Valid(IVec2::new(0, 0)));
}

#[test]
fn test_gather_border_marks_only_outside_taps() {
    let size = IVec2::new(4, 4);
    let log2 = IVec2::new(2, 2);
    let taps = gather_tex_coord4(TextureAddressMode::Border, true, Vec2::new(3.5, 1.0), size, log2);

    assert_eq!(taps[0], TexelCoord::Valid(IVec2::new(3, 1)));
    assert_eq!(taps[1], TexelCoord::Border);
    assert_eq!(taps[2], TexelCoord::Valid(IVec2::new(3, 2)));
    assert_eq!(taps[3], TexelCoord::Border);
}

#[test]
fn test_gather_non_finite_is_invalid() {
    let size = IVec2::new(4, 4);
    let log2 = IVec2::new(2, 2);
    for pixel in [Vec2::new(f32::NAN, 0.0), Vec2::new(0.0, f32::INFINITY), Vec2::new(1e20, 0.0)] {
        let taps = gather_tex_coord4(TextureAddressMode::Wrap, true, pixel, size, log2);
        assert_eq!(taps, [TexelCoord::Invalid; 4]);
    }
}
