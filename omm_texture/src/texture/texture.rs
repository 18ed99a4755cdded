//! CPU-side alpha texture store
//!
//! Holds a mip pyramid of alpha values in one 64-byte aligned pixel
//! arena, optionally Morton-tiled, plus an optional summed-area table
//! per mip for constant-time coverage queries.
//!
//! Lifecycle: a store starts empty, is populated exactly once by
//! `create` or `deserialize`, and is emptied again by `deallocate` (also
//! run on drop). A populated store is immutable, so `load`, `bilinear`
//! and `sat` may be called from many threads at once.

use glam::{IVec2, Vec2};
use crate::error::Result;
use crate::omm_bail;
use crate::texture::address::{gather_tex_coord4, TexelCoord, TexelOffset, TextureAddressMode};
use crate::texture::arena::AlignedArena;
use crate::texture::format::{TextureFlags, TextureFormat, TilingMode};
use crate::texture::mip::{MipChainLayout, MipLevel, MAX_DIMENSION};
use crate::texture::sampler::{select_load_fn, texel_index, LoadFn, UNBOUND_LOAD};
use crate::texture::sat::{build_sat, query_sat};

pub(crate) const LOG_SOURCE: &str = "omm::Texture";

// ===== CREATION DESCRIPTORS =====

/// Source data for one mip
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuTextureMipDesc<'a> {
    pub width: u32,
    pub height: u32,
    /// Source row pitch in texels; 0 means tightly packed (`width`)
    pub row_pitch: u32,
    /// Row-major texels, at least `((height - 1) * pitch + width) * bpp` bytes
    pub texture_data: Option<&'a [u8]>,
}

/// Descriptor for `TextureStore::create`
#[derive(Debug, Clone)]
pub struct CpuTextureDesc<'a> {
    /// Must be set
    pub format: Option<TextureFormat>,
    pub flags: TextureFlags,
    /// Negative disables the SAT
    pub alpha_cutoff: f32,
    pub mips: Vec<CpuTextureMipDesc<'a>>,
}

impl Default for CpuTextureDesc<'_> {
    fn default() -> Self {
        Self {
            format: None,
            flags: TextureFlags::empty(),
            alpha_cutoff: -1.0,
            mips: Vec::new(),
        }
    }
}

// ===== READ-BACK DESCRIPTORS =====

/// Caller-facing geometry of one stored mip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureMipInfo {
    pub width: u32,
    pub height: u32,
    /// Row pitch (texels) of the row-major data `read_mip_data` produces
    pub row_pitch: u32,
}

/// Description of a populated store, as a caller would have created it
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    pub format: TextureFormat,
    pub flags: TextureFlags,
    pub alpha_cutoff: f32,
    pub mips: Vec<TextureMipInfo>,
}

// ===== TEXTURE STORE =====

/// Fully built store state, produced by `create` or `deserialize`
pub(crate) struct StoreContents {
    pub mips: Vec<MipLevel>,
    pub tiling_mode: TilingMode,
    pub format: TextureFormat,
    pub flags: TextureFlags,
    pub alpha_cutoff: f32,
    pub pixels: AlignedArena,
    pub sat: Option<AlignedArena>,
}

pub struct TextureStore {
    pub(crate) mips: Vec<MipLevel>,
    pub(crate) tiling_mode: TilingMode,
    pub(crate) format: TextureFormat,
    pub(crate) flags: TextureFlags,
    pub(crate) alpha_cutoff: f32,
    pub(crate) pixels: AlignedArena,
    pub(crate) sat: Option<AlignedArena>,
    load_fn: LoadFn,
}

impl TextureStore {
    /// An empty store
    pub fn new() -> Self {
        Self {
            mips: Vec::new(),
            tiling_mode: TilingMode::MortonZ,
            format: TextureFormat::Unorm8,
            flags: TextureFlags::empty(),
            alpha_cutoff: -1.0,
            pixels: AlignedArena::default(),
            sat: None,
            load_fn: UNBOUND_LOAD,
        }
    }

    /// Create a store directly from a descriptor
    pub fn from_desc(desc: &CpuTextureDesc) -> Result<Self> {
        let mut store = Self::new();
        store.create(desc)?;
        Ok(store)
    }

    fn validate(desc: &CpuTextureDesc) -> Result<TextureFormat> {
        if desc.mips.is_empty() {
            omm_bail!(LOG_SOURCE, InvalidArgument, "mipCount must be non-zero");
        }
        let Some(format) = desc.format else {
            omm_bail!(LOG_SOURCE, InvalidArgument, "format is not set");
        };
        let bytes_per_pixel = format.bytes_per_pixel();

        for (index, mip) in desc.mips.iter().enumerate() {
            let Some(data) = mip.texture_data else {
                omm_bail!(LOG_SOURCE, InvalidArgument, "mips[{}].textureData is not set", index);
            };
            if mip.width == 0 {
                omm_bail!(LOG_SOURCE, InvalidArgument, "mips[{}].width must be non-zero", index);
            }
            if mip.height == 0 {
                omm_bail!(LOG_SOURCE, InvalidArgument, "mips[{}].height must be non-zero", index);
            }
            if mip.width > MAX_DIMENSION {
                omm_bail!(LOG_SOURCE, InvalidArgument,
                    "mips[{}].width must be at most {}, got {}", index, MAX_DIMENSION, mip.width);
            }
            if mip.height > MAX_DIMENSION {
                omm_bail!(LOG_SOURCE, InvalidArgument,
                    "mips[{}].height must be at most {}, got {}", index, MAX_DIMENSION, mip.height);
            }
            if mip.row_pitch != 0 && mip.row_pitch < mip.width {
                omm_bail!(LOG_SOURCE, InvalidArgument,
                    "mips[{}].rowPitch ({}) is smaller than width ({})", index, mip.row_pitch, mip.width);
            }

            let pitch = effective_pitch(mip) as usize;
            let required = ((mip.height as usize - 1) * pitch + mip.width as usize) * bytes_per_pixel;
            if data.len() < required {
                omm_bail!(LOG_SOURCE, InvalidArgument,
                    "mips[{}].textureData holds {} bytes, {} required", index, data.len(), required);
            }
        }

        Ok(format)
    }

    /// Populate the store from `desc`
    ///
    /// The descriptor is validated before anything is touched: on error
    /// the store keeps whatever it held before. On success any previous
    /// content is replaced.
    pub fn create(&mut self, desc: &CpuTextureDesc) -> Result<()> {
        let format = Self::validate(desc)?;

        self.deallocate();

        let tiling_mode = TilingMode::from_flags(desc.flags);
        let bytes_per_pixel = format.bytes_per_pixel();
        let dims: Vec<(u32, u32)> = desc.mips.iter().map(|m| (m.width, m.height)).collect();
        let layout = MipChainLayout::build(&dims, format, tiling_mode, desc.alpha_cutoff);

        let mut pixels = AlignedArena::zeroed(layout.data_size);
        let mut sat = (layout.sat_size != 0).then(|| AlignedArena::zeroed(layout.sat_size));
        let load_fn = select_load_fn(format, tiling_mode);

        for (mip, src) in layout.mips.iter().zip(&desc.mips) {
            // Validated above
            let data = src.texture_data.unwrap_or_default();
            let dst = &mut pixels.as_bytes_mut()[mip.data_offset..][..mip.num_elements * bytes_per_pixel];
            copy_into_tiled(dst, data, mip, effective_pitch(src) as usize, bytes_per_pixel, tiling_mode);

            if let Some(sat) = sat.as_mut() {
                let table = sat.view_mut::<u32>(mip.data_offset_sat, mip.texel_count());
                let cutoff = desc.alpha_cutoff;
                build_sat(table, mip.size, |coord| load_fn(&pixels, mip, coord) > cutoff);
            }
        }

        crate::omm_debug!(LOG_SOURCE,
            "Created {}x{} texture: {} mip(s), {:?}, {:?}, {} pixel bytes, SAT {}",
            layout.mips[0].size.x, layout.mips[0].size.y, layout.mips.len(),
            format, tiling_mode, layout.data_size,
            if sat.is_some() { format!("{} bytes", layout.sat_size) } else { "off".to_string() });

        self.install(StoreContents {
            mips: layout.mips,
            tiling_mode,
            format,
            flags: desc.flags,
            alpha_cutoff: desc.alpha_cutoff,
            pixels,
            sat,
        });
        Ok(())
    }

    /// Install fully built state in one step
    pub(crate) fn install(&mut self, contents: StoreContents) {
        self.load_fn = select_load_fn(contents.format, contents.tiling_mode);
        self.mips = contents.mips;
        self.tiling_mode = contents.tiling_mode;
        self.format = contents.format;
        self.flags = contents.flags;
        self.alpha_cutoff = contents.alpha_cutoff;
        self.pixels = contents.pixels;
        self.sat = contents.sat;
    }

    /// Free both buffers and return to the empty state
    pub fn deallocate(&mut self) {
        if self.is_created() {
            crate::omm_trace!(LOG_SOURCE, "Releasing texture ({} mip(s))", self.mips.len());
        }
        self.mips.clear();
        self.pixels = AlignedArena::default();
        self.sat = None;
        self.flags = TextureFlags::empty();
        self.alpha_cutoff = -1.0;
        self.load_fn = UNBOUND_LOAD;
    }

    // ===== SAMPLING =====

    /// Point-sample one texel
    ///
    /// `coord` must lie inside the mip; checked in debug builds only.
    #[inline]
    pub fn load(&self, coord: IVec2, mip: usize) -> f32 {
        (self.load_fn)(&self.pixels, &self.mips[mip], coord)
    }

    /// Bilinear filter at normalized `p`; border taps read as 0
    pub fn bilinear(&self, mode: TextureAddressMode, p: Vec2, mip: usize) -> f32 {
        self.bilinear_with_border(mode, p, mip, 0.0)
    }

    /// Bilinear filter at normalized `p`, border taps read as `border_alpha`
    ///
    /// Taps the address resolver cannot place (non-finite `p`) read as 0.
    pub fn bilinear_with_border(&self, mode: TextureAddressMode, p: Vec2, mip: usize, border_alpha: f32) -> f32 {
        let level = &self.mips[mip];
        let pixel = p * level.size_f - 0.5;
        let taps = gather_tex_coord4(mode, level.size_is_pow2, pixel, level.size, level.size_log2);

        let fetch = |offset: TexelOffset| match taps[offset as usize] {
            TexelCoord::Valid(coord) => (self.load_fn)(&self.pixels, level, coord),
            TexelCoord::Border => border_alpha,
            TexelCoord::Invalid => 0.0,
        };

        let a = fetch(TexelOffset::I0x0);
        let b = fetch(TexelOffset::I0x1);
        let c = fetch(TexelOffset::I1x0);
        let d = fetch(TexelOffset::I1x1);

        let weight = if pixel.is_finite() { pixel - pixel.floor() } else { Vec2::ZERO };
        let ac = lerp(a, c, weight.x);
        let bd = lerp(b, d, weight.x);
        lerp(ac, bd, weight.y)
    }

    // ===== SUMMED-AREA TABLE =====

    pub fn has_sat(&self) -> bool {
        self.sat.as_ref().is_some_and(|sat| !sat.is_empty())
    }

    /// Count of texels with alpha above the cutoff in `[start, end]`
    ///
    /// Both corners must be inside the mip and the store must have a SAT;
    /// checked in debug builds only.
    pub fn sat(&self, start: IVec2, end: IVec2, mip: usize) -> u32 {
        debug_assert!(self.in_texture(start, mip), "SAT start {} outside mip {}", start, mip);
        debug_assert!(self.in_texture(end, mip), "SAT end {} outside mip {}", end, mip);
        let Some(sat) = self.sat.as_ref() else {
            debug_assert!(false, "SAT query on a texture without SAT");
            return 0;
        };
        let level = &self.mips[mip];
        let table = sat.view::<u32>(level.data_offset_sat, level.texel_count());
        query_sat(table, level.size.x, start, end)
    }

    // ===== READ-BACK =====

    /// Describe the stored texture the way a caller would have created it
    pub fn texture_desc(&self) -> TextureInfo {
        TextureInfo {
            format: self.format,
            flags: self.flags,
            alpha_cutoff: self.alpha_cutoff,
            mips: self
                .mips
                .iter()
                .map(|mip| TextureMipInfo {
                    width: mip.size.x as u32,
                    height: mip.size.y as u32,
                    row_pitch: mip.size.x as u32,
                })
                .collect(),
        }
    }

    /// Copy one mip back out as tightly packed row-major texels
    ///
    /// Undoes any Morton tiling. `dst` must hold `width * height * bpp` bytes.
    pub fn read_mip_data(&self, mip: usize, dst: &mut [u8]) -> Result<()> {
        let Some(level) = self.mips.get(mip) else {
            omm_bail!(LOG_SOURCE, InvalidArgument,
                "mip {} out of range, texture has {} mip(s)", mip, self.mips.len());
        };
        let bytes_per_pixel = self.format.bytes_per_pixel();
        let required = level.texel_count() * bytes_per_pixel;
        if dst.len() < required {
            omm_bail!(LOG_SOURCE, InvalidArgument,
                "destination holds {} bytes, mip {} needs {}", dst.len(), mip, required);
        }

        let src = &self.pixels.as_bytes()[level.data_offset..][..level.num_elements * bytes_per_pixel];
        match self.tiling_mode {
            TilingMode::Linear => dst[..required].copy_from_slice(&src[..required]),
            TilingMode::MortonZ => {
                for y in 0..level.size.y {
                    for x in 0..level.size.x {
                        let slot = texel_index(TilingMode::MortonZ, IVec2::new(x, y), level);
                        let out = (x as usize + y as usize * level.width()) * bytes_per_pixel;
                        dst[out..out + bytes_per_pixel]
                            .copy_from_slice(&src[slot * bytes_per_pixel..][..bytes_per_pixel]);
                    }
                }
            }
        }
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn is_created(&self) -> bool {
        !self.mips.is_empty()
    }

    pub fn tiling_mode(&self) -> TilingMode {
        self.tiling_mode
    }

    pub fn texture_format(&self) -> TextureFormat {
        self.format
    }

    pub fn flags(&self) -> TextureFlags {
        self.flags
    }

    pub fn has_alpha_cutoff(&self) -> bool {
        self.alpha_cutoff >= 0.0
    }

    pub fn alpha_cutoff(&self) -> f32 {
        self.alpha_cutoff
    }

    pub fn size(&self, mip: usize) -> IVec2 {
        self.mips[mip].size
    }

    pub fn size_log2(&self, mip: usize) -> IVec2 {
        self.mips[mip].size_log2
    }

    pub fn size_f(&self, mip: usize) -> Vec2 {
        self.mips[mip].size_f
    }

    pub fn rcp_size(&self, mip: usize) -> Vec2 {
        self.mips[mip].rcp_size
    }

    /// Whether mip 0 is power-of-two on both axes
    pub fn size_is_pow2(&self) -> bool {
        self.mips[0].size_is_pow2
    }

    pub fn mip_count(&self) -> usize {
        self.mips.len()
    }

    pub fn in_texture(&self, coord: IVec2, mip: usize) -> bool {
        let size = self.mips[mip].size;
        coord.x >= 0 && coord.y >= 0 && coord.x < size.x && coord.y < size.y
    }

    /// Pixel arena size in bytes
    pub fn data_size(&self) -> usize {
        self.pixels.len()
    }

    /// SAT arena size in bytes (0 without SAT)
    pub fn sat_size(&self) -> usize {
        self.sat.as_ref().map_or(0, AlignedArena::len)
    }

    pub fn mip_level(&self, mip: usize) -> &MipLevel {
        &self.mips[mip]
    }
}

impl Default for TextureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TextureStore {
    fn drop(&mut self) {
        self.deallocate();
    }
}

impl std::fmt::Debug for TextureStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureStore")
            .field("mips", &self.mips)
            .field("tiling_mode", &self.tiling_mode)
            .field("format", &self.format)
            .field("flags", &self.flags)
            .field("alpha_cutoff", &self.alpha_cutoff)
            .field("pixels", &self.pixels)
            .field("sat", &self.sat)
            .finish()
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn effective_pitch(mip: &CpuTextureMipDesc) -> u32 {
    if mip.row_pitch == 0 { mip.width } else { mip.row_pitch }
}

/// Copy row-major `src` (pitch in texels) into the tiled `dst` of one mip
fn copy_into_tiled(
    dst: &mut [u8],
    src: &[u8],
    mip: &MipLevel,
    src_pitch: usize,
    bytes_per_pixel: usize,
    tiling: TilingMode,
) {
    let width = mip.width();
    let height = mip.height();

    match tiling {
        TilingMode::Linear => {
            let row_bytes = width * bytes_per_pixel;
            let src_row_bytes = src_pitch * bytes_per_pixel;
            if src_row_bytes == row_bytes {
                let total = row_bytes * height;
                dst[..total].copy_from_slice(&src[..total]);
            } else {
                for y in 0..height {
                    dst[y * row_bytes..][..row_bytes]
                        .copy_from_slice(&src[y * src_row_bytes..][..row_bytes]);
                }
            }
        }
        TilingMode::MortonZ => {
            for y in 0..height {
                for x in 0..width {
                    let slot = texel_index(TilingMode::MortonZ, IVec2::new(x as i32, y as i32), mip);
                    debug_assert!(slot < mip.num_elements);
                    let from = (x + y * src_pitch) * bytes_per_pixel;
                    dst[slot * bytes_per_pixel..][..bytes_per_pixel]
                        .copy_from_slice(&src[from..][..bytes_per_pixel]);
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
