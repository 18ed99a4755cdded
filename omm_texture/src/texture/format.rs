//! Pixel format, tiling mode and creation flags
//!
//! The raw `u32` tags are the values written by the binary codec.

use bitflags::bitflags;

// ===== TEXTURE FORMAT =====

/// Texel storage format (single alpha channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8-bit unsigned, read back as `value / 255`
    Unorm8,
    /// 32-bit IEEE float, unclamped
    Float32,
}

impl TextureFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::Unorm8 => 1,
            TextureFormat::Float32 => 4,
        }
    }

    pub fn to_raw(self) -> u32 {
        match self {
            TextureFormat::Unorm8 => 0,
            TextureFormat::Float32 => 1,
        }
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(TextureFormat::Unorm8),
            1 => Some(TextureFormat::Float32),
            _ => None,
        }
    }
}

// ===== TILING MODE =====

/// In-memory texel layout of every mip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TilingMode {
    /// Row-major
    Linear,
    /// Z-order curve over the enclosing power-of-two square
    MortonZ,
}

impl TilingMode {
    /// Tiling implied by the creation flags
    pub fn from_flags(flags: TextureFlags) -> Self {
        if flags.contains(TextureFlags::DISABLE_Z_ORDER) {
            TilingMode::Linear
        } else {
            TilingMode::MortonZ
        }
    }

    pub fn to_raw(self) -> u32 {
        match self {
            TilingMode::Linear => 0,
            TilingMode::MortonZ => 1,
        }
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(TilingMode::Linear),
            1 => Some(TilingMode::MortonZ),
            _ => None,
        }
    }
}

// ===== TEXTURE FLAGS =====

bitflags! {
    /// Creation flags
    ///
    /// Unknown bits are retained so that persisted flags round-trip.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextureFlags: u32 {
        /// Keep the texture row-major instead of Morton-tiling it.
        /// Does not change the expected input layout.
        const DISABLE_Z_ORDER = 1 << 0;

        const _ = !0;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
