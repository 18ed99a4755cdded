use super::*;

// ============================================================================
// MipLevel geometry
// ============================================================================

#[test]
fn test_pow2_mip_geometry() {
    let mip = MipLevel::new(16, 4, TilingMode::Linear);
    assert_eq!(mip.size, IVec2::new(16, 4));
    assert_eq!(mip.size_log2, IVec2::new(4, 2));
    assert!(mip.size_is_pow2);
    assert_eq!(mip.size_f, Vec2::new(16.0, 4.0));
    assert_eq!(mip.rcp_size, Vec2::new(1.0 / 16.0, 0.25));
    assert_eq!(mip.num_elements, 64);
    assert_eq!(mip.texel_count(), 64);
}

#[test]
fn test_non_pow2_mip_geometry() {
    let mip = MipLevel::new(6, 3, TilingMode::Linear);
    assert!(!mip.size_is_pow2);
    assert_eq!(mip.num_elements, 18);
}

#[test]
fn test_morton_element_count_rounds_to_square() {
    assert_eq!(element_count(6, 3, TilingMode::MortonZ), 64);
    assert_eq!(element_count(16, 4, TilingMode::MortonZ), 256);
    assert_eq!(element_count(1, 1, TilingMode::MortonZ), 1);
    assert_eq!(element_count(65536, 1, TilingMode::MortonZ), 1 << 32);
    assert_eq!(element_count(6, 3, TilingMode::Linear), 18);
}

#[test]
fn test_from_persisted_rederives_fields() {
    let fresh = MipLevel::new(32, 8, TilingMode::MortonZ);
    let restored = MipLevel::from_persisted(
        fresh.size,
        fresh.rcp_size,
        fresh.data_offset,
        fresh.num_elements,
        fresh.data_offset_sat,
    );
    assert_eq!(restored, fresh);
}

// ============================================================================
// Chain layout
// ============================================================================

#[test]
fn test_chain_offsets_are_aligned_and_increasing() {
    let layout = MipChainLayout::build(
        &[(5, 3), (3, 2), (1, 1)],
        TextureFormat::Float32,
        TilingMode::Linear,
        -1.0,
    );

    assert_eq!(layout.mips[0].data_offset, 0);
    assert_eq!(layout.mips[1].data_offset, 64); // 15 * 4 = 60 -> 64
    assert_eq!(layout.mips[2].data_offset, 128); // 64 + 24 -> 128
    assert_eq!(layout.data_size, 192);
    assert_eq!(layout.sat_size, 0);

    for pair in layout.mips.windows(2) {
        let end = pair[0].data_offset + 4 * pair[0].num_elements;
        assert!(pair[1].data_offset >= end);
        assert_eq!(pair[1].data_offset % DATA_ALIGNMENT, 0);
    }
}

#[test]
fn test_chain_with_sat() {
    let layout = MipChainLayout::build(
        &[(8, 8), (4, 4)],
        TextureFormat::Unorm8,
        TilingMode::MortonZ,
        0.5,
    );
    assert_eq!(layout.mips[1].data_offset, 64);
    assert_eq!(layout.data_size, 128);
    assert_eq!(layout.mips[0].data_offset_sat, 0);
    assert_eq!(layout.mips[1].data_offset_sat, 256);
    assert_eq!(layout.sat_size, 320);
}

#[test]
fn test_sat_disabled_by_negative_cutoff() {
    let layout = MipChainLayout::build(&[(8, 8)], TextureFormat::Unorm8, TilingMode::Linear, -0.5);
    assert_eq!(layout.sat_size, 0);
}

#[test]
fn test_zero_cutoff_enables_sat() {
    let layout = MipChainLayout::build(&[(2, 2)], TextureFormat::Unorm8, TilingMode::Linear, 0.0);
    assert_eq!(layout.sat_size, 64);
}
