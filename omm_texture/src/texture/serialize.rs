//! Versioned binary codec for `TextureStore`
//!
//! Blob layout (native endianness, fixed widths):
//!
//! ```text
//! i32 mip_count
//! per mip: i32 width, i32 height, f32 rcp_x, f32 rcp_y,
//!          u64 data_offset, u64 num_elements, u64 data_offset_sat
//! header fields, in the order of the version's schema
//! u64 data_size, data_size bytes
//! u64 sat_size, sat_size bytes (omitted when sat_size == 0)
//! ```
//!
//! The header differs between versions; each version maps to an explicit
//! field list in `schema_for`. Fields a legacy schema lacks are inferred.

use bytemuck::{AnyBitPattern, NoUninit};
use glam::{IVec2, Vec2};
use crate::error::Result;
use crate::omm_bail;
use crate::texture::arena::AlignedArena;
use crate::texture::format::{TextureFlags, TextureFormat, TilingMode};
use crate::texture::mip::{element_count, MipLevel, MAX_DIMENSION};
use crate::texture::texture::{StoreContents, TextureStore, LOG_SOURCE};

/// Version written by `TextureStore::serialize`
pub const CURRENT_FORMAT_VERSION: i32 = 4;

/// Oldest version the reader accepts
pub const MIN_FORMAT_VERSION: i32 = 1;

/// Bytes taken by one persisted mip record
const MIP_RECORD_SIZE: usize = 2 * 4 + 2 * 4 + 3 * 8;

// ===== SCHEMA =====

/// Header field following the mip records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    /// `u32` tiling tag
    TilingMode,
    /// `u32` creation flags
    Flags,
    /// `f32` alpha cutoff
    AlphaCutoff,
    /// `u32` texel format tag
    Format,
}

/// Versions 1 and 2: flags and cutoff did not exist yet
const LEGACY_SCHEMA: &[HeaderField] = &[HeaderField::TilingMode, HeaderField::Format];

/// Versions 3 and 4
const CURRENT_SCHEMA: &[HeaderField] = &[
    HeaderField::TilingMode,
    HeaderField::Flags,
    HeaderField::AlphaCutoff,
    HeaderField::Format,
];

/// Ordered header fields of `version`, `None` if the version is unknown
pub fn schema_for(version: i32) -> Option<&'static [HeaderField]> {
    match version {
        1..=2 => Some(LEGACY_SCHEMA),
        3..=CURRENT_FORMAT_VERSION => Some(CURRENT_SCHEMA),
        _ => None,
    }
}

fn require_schema(version: i32) -> Result<&'static [HeaderField]> {
    match schema_for(version) {
        Some(schema) => Ok(schema),
        None => omm_bail!(LOG_SOURCE, InvalidArgument,
            "unsupported texture format version {} (expected {}..={})",
            version, MIN_FORMAT_VERSION, CURRENT_FORMAT_VERSION),
    }
}

// ===== WRITER =====

struct BlobWriter {
    out: Vec<u8>,
}

impl BlobWriter {
    fn with_capacity(capacity: usize) -> Self {
        Self { out: Vec::with_capacity(capacity) }
    }

    fn put<T: NoUninit>(&mut self, value: T) {
        self.out.extend_from_slice(bytemuck::bytes_of(&value));
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }
}

// ===== READER =====

struct BlobReader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> BlobReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    fn take_bytes(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        if len > self.remaining() {
            omm_bail!(LOG_SOURCE, InvalidArgument,
                "blob truncated reading {}: {} bytes needed at offset {}, {} left",
                what, len, self.cursor, self.remaining());
        }
        let slice = &self.bytes[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(slice)
    }

    fn take<T: AnyBitPattern>(&mut self, what: &str) -> Result<T> {
        let bytes = self.take_bytes(std::mem::size_of::<T>(), what)?;
        Ok(bytemuck::pod_read_unaligned(bytes))
    }
}

/// Mip record as read from a blob, before validation
struct RawMip {
    width: i32,
    height: i32,
    rcp_size: Vec2,
    data_offset: u64,
    num_elements: u64,
    data_offset_sat: u64,
}

fn to_usize(value: u64, what: &str) -> Result<usize> {
    match usize::try_from(value) {
        Ok(value) => Ok(value),
        Err(_) => omm_bail!(LOG_SOURCE, InvalidArgument, "{} ({}) does not fit in memory", what, value),
    }
}

/// `offset + count * stride` if it fits inside `limit` bytes
fn checked_span(offset: u64, count: u64, stride: u64, limit: usize) -> Option<u64> {
    count
        .checked_mul(stride)
        .and_then(|len| len.checked_add(offset))
        .filter(|&end| end <= limit as u64)
}

// ===== STORE CODEC =====

impl TextureStore {
    /// Serialize at `CURRENT_FORMAT_VERSION`
    pub fn serialize(&self) -> Result<Vec<u8>> {
        self.serialize_with_version(CURRENT_FORMAT_VERSION)
    }

    /// Serialize with the header schema of `version`
    ///
    /// Legacy versions drop flags and alpha cutoff; reading such a blob
    /// back infers them from the tiling mode.
    pub fn serialize_with_version(&self, version: i32) -> Result<Vec<u8>> {
        if !self.is_created() {
            omm_bail!(LOG_SOURCE, Failure, "cannot serialize a texture that holds no data");
        }
        let schema = require_schema(version)?;

        let sat_bytes = self.sat.as_ref().map_or(&[][..], AlignedArena::as_bytes);
        let capacity = 4
            + self.mips.len() * MIP_RECORD_SIZE
            + schema.len() * 4
            + 8 + self.pixels.len()
            + 8 + sat_bytes.len();
        let mut writer = BlobWriter::with_capacity(capacity);

        writer.put(self.mips.len() as i32);
        for mip in &self.mips {
            writer.put(mip.size.x);
            writer.put(mip.size.y);
            writer.put(mip.rcp_size.x);
            writer.put(mip.rcp_size.y);
            writer.put(mip.data_offset as u64);
            writer.put(mip.num_elements as u64);
            writer.put(mip.data_offset_sat as u64);
        }

        for field in schema {
            match field {
                HeaderField::TilingMode => writer.put(self.tiling_mode.to_raw()),
                HeaderField::Flags => writer.put(self.flags.bits()),
                HeaderField::AlphaCutoff => writer.put(self.alpha_cutoff),
                HeaderField::Format => writer.put(self.format.to_raw()),
            }
        }

        writer.put(self.pixels.len() as u64);
        writer.put_bytes(self.pixels.as_bytes());
        writer.put(sat_bytes.len() as u64);
        if !sat_bytes.is_empty() {
            writer.put_bytes(sat_bytes);
        }

        crate::omm_debug!(LOG_SOURCE, "Serialized texture at version {}: {} bytes", version, writer.out.len());
        Ok(writer.out)
    }

    /// Populate an empty store from a blob written at `version`
    ///
    /// Returns the number of bytes consumed. The whole blob is validated
    /// before the store is modified, so on error the store stays empty.
    pub fn deserialize(&mut self, bytes: &[u8], version: i32) -> Result<usize> {
        if self.is_created() {
            omm_bail!(LOG_SOURCE, Failure, "deserialize requires an empty texture");
        }
        let schema = require_schema(version)?;
        let mut reader = BlobReader::new(bytes);

        let mip_count = reader.take::<i32>("mip count")?;
        if mip_count <= 0 {
            omm_bail!(LOG_SOURCE, InvalidArgument, "mip count must be positive, got {}", mip_count);
        }
        let mip_count = mip_count as usize;
        if mip_count > reader.remaining() / MIP_RECORD_SIZE {
            omm_bail!(LOG_SOURCE, InvalidArgument,
                "blob truncated: {} mip records announced, {} bytes left", mip_count, reader.remaining());
        }

        let mut raw_mips = Vec::with_capacity(mip_count);
        for index in 0..mip_count {
            let raw = RawMip {
                width: reader.take("mip width")?,
                height: reader.take("mip height")?,
                rcp_size: Vec2::new(reader.take("mip rcp x")?, reader.take("mip rcp y")?),
                data_offset: reader.take("mip data offset")?,
                num_elements: reader.take("mip element count")?,
                data_offset_sat: reader.take("mip SAT offset")?,
            };
            for (axis, value) in [("width", raw.width), ("height", raw.height)] {
                if value <= 0 || value as u32 > MAX_DIMENSION {
                    omm_bail!(LOG_SOURCE, InvalidArgument,
                        "mips[{}].{} must be in 1..={}, got {}", index, axis, MAX_DIMENSION, value);
                }
            }
            raw_mips.push(raw);
        }

        let mut tiling_mode = None;
        let mut flags = None;
        let mut alpha_cutoff = None;
        let mut format = None;
        for field in schema {
            match field {
                HeaderField::TilingMode => {
                    let raw = reader.take::<u32>("tiling mode")?;
                    let Some(tiling) = TilingMode::from_raw(raw) else {
                        omm_bail!(LOG_SOURCE, InvalidArgument, "unknown tiling mode tag {}", raw);
                    };
                    tiling_mode = Some(tiling);
                }
                HeaderField::Flags => flags = Some(TextureFlags::from_bits_retain(reader.take("flags")?)),
                HeaderField::AlphaCutoff => alpha_cutoff = Some(reader.take::<f32>("alpha cutoff")?),
                HeaderField::Format => {
                    let raw = reader.take::<u32>("format")?;
                    let Some(parsed) = TextureFormat::from_raw(raw) else {
                        omm_bail!(LOG_SOURCE, InvalidArgument, "unknown texture format tag {}", raw);
                    };
                    format = Some(parsed);
                }
            }
        }

        let (Some(tiling_mode), Some(format)) = (tiling_mode, format) else {
            omm_bail!(LOG_SOURCE, Failure, "schema for version {} lacks tiling or format", version);
        };
        // Legacy blobs: flags follow the tiling, the SAT cutoff is off
        let flags = flags.unwrap_or(match tiling_mode {
            TilingMode::MortonZ => TextureFlags::empty(),
            TilingMode::Linear => TextureFlags::DISABLE_Z_ORDER,
        });
        let alpha_cutoff = alpha_cutoff.unwrap_or(-1.0);

        let data_size = reader.take::<u64>("data size")?;
        let data = reader.take_bytes(to_usize(data_size, "data size")?, "pixel data")?;
        let sat_size = reader.take::<u64>("SAT size")?;
        let sat_data = match sat_size {
            0 => None,
            size => Some(reader.take_bytes(to_usize(size, "SAT size")?, "SAT data")?),
        };

        let bytes_per_pixel = format.bytes_per_pixel() as u64;
        let sat_stride = std::mem::size_of::<u32>() as u64;
        let mut mips = Vec::with_capacity(mip_count);
        for (index, raw) in raw_mips.iter().enumerate() {
            let size = IVec2::new(raw.width, raw.height);
            let required = element_count(raw.width as u32, raw.height as u32, tiling_mode) as u64;
            if raw.num_elements < required {
                omm_bail!(LOG_SOURCE, InvalidArgument,
                    "mips[{}] holds {} elements, {:?} {}x{} needs {}",
                    index, raw.num_elements, tiling_mode, raw.width, raw.height, required);
            }
            if raw.data_offset % bytes_per_pixel != 0
                || checked_span(raw.data_offset, raw.num_elements, bytes_per_pixel, data.len()).is_none()
            {
                omm_bail!(LOG_SOURCE, InvalidArgument,
                    "mips[{}] pixel range (offset {}, {} elements) lies outside the {} byte buffer",
                    index, raw.data_offset, raw.num_elements, data.len());
            }
            if let Some(sat_data) = sat_data {
                let texels = raw.width as u64 * raw.height as u64;
                if raw.data_offset_sat % sat_stride != 0
                    || checked_span(raw.data_offset_sat, texels, sat_stride, sat_data.len()).is_none()
                {
                    omm_bail!(LOG_SOURCE, InvalidArgument,
                        "mips[{}] SAT range (offset {}, {} texels) lies outside the {} byte SAT buffer",
                        index, raw.data_offset_sat, texels, sat_data.len());
                }
            }

            // Offsets and counts were bounded by in-memory buffer lengths above
            mips.push(MipLevel::from_persisted(
                size,
                raw.rcp_size,
                raw.data_offset as usize,
                raw.num_elements as usize,
                raw.data_offset_sat as usize,
            ));
        }

        let pixels = AlignedArena::from_bytes(data);
        let sat = sat_data.map(AlignedArena::from_bytes);

        crate::omm_debug!(LOG_SOURCE,
            "Deserialized {}x{} texture at version {}: {} mip(s), {:?}, {:?}, {} pixel bytes, SAT {}",
            raw_mips[0].width, raw_mips[0].height, version, mip_count, format, tiling_mode, data.len(),
            sat_data.map_or_else(|| "off".to_string(), |sat| format!("{} bytes", sat.len())));

        self.install(StoreContents { mips, tiling_mode, format, flags, alpha_cutoff, pixels, sat });
        Ok(reader.cursor)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "serialize_tests.rs"]
mod tests;
