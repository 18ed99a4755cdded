//! CPU texture store module
//!
//! Morton tiling, texel fetch strategies, addressing, summed-area tables
//! and the binary codec around `TextureStore`.

pub mod morton;
pub mod address;
mod arena;
mod format;
mod mip;
mod sampler;
mod sat;
#[allow(clippy::module_inception)]
mod texture;
mod serialize;

pub use address::{
    get_tex_coord, gather_tex_coord4,
    TexelCoord, TexelOffset, TextureAddressMode,
};
pub use arena::DATA_ALIGNMENT;
pub use format::{TextureFlags, TextureFormat, TilingMode};
pub use mip::{MipLevel, MAX_DIMENSION};
pub use serialize::{schema_for, HeaderField, CURRENT_FORMAT_VERSION, MIN_FORMAT_VERSION};
pub use texture::{
    TextureStore,
    CpuTextureDesc, CpuTextureMipDesc,
    TextureInfo, TextureMipInfo,
};
