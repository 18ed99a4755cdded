/*!
# OMM Texture

CPU-side alpha texture store for opacity micromap baking.

A `TextureStore` takes a caller-supplied mip pyramid of alpha values and
keeps it in one contiguous, 64-byte aligned buffer, optionally Morton
Z-order tiled for locality. On top of that it provides:

- **Point sampling** (`load`): one texel, normalized for 8-bit formats
- **Bilinear filtering** (`bilinear`): with wrap, mirror, clamp, border and
  mirror-once addressing
- **Coverage queries** (`sat`): count of texels above the alpha cutoff in
  any rectangle, in constant time, via a per-mip summed-area table
- **Binary codec** (`serialize` / `deserialize`): versioned, reads legacy
  blobs

A populated store is immutable, so all queries may run from many threads.
*/

// Internal modules
mod error;
mod context;
pub mod log;
pub mod texture;

// Main omm namespace module
pub mod omm {
    // Error types
    pub use crate::error::{Error, ErrorKind, Result};

    // Logger registry
    pub use crate::context::Context;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{format_entry, Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Texture store sub-module
    pub mod texture {
        pub use crate::texture::*;
    }
}

// Re-export math library at crate root
pub use glam;
