//! Error types for the OMM texture store
//!
//! Two kinds of failure exist: a caller handed us something malformed
//! (a creation descriptor or a persisted blob), or an internal invariant
//! did not hold.

use std::fmt;

/// Result type for texture store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error classification, mirrors the result codes of the baker API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Failure,
}

/// Texture store errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed creation descriptor, or a truncated / corrupted blob
    InvalidArgument(String),

    /// Internal invariant violation
    Failure(String),
}

impl Error {
    /// Build an error of the given kind
    pub fn new(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::InvalidArgument => Error::InvalidArgument(message),
            ErrorKind::Failure => Error::Failure(message),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::Failure(_) => ErrorKind::Failure,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Error::InvalidArgument(msg) | Error::Failure(msg) => msg,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::Failure(msg) => write!(f, "Failure: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error at ERROR severity (with file:line) and evaluate to it
///
/// # Example
///
/// ```ignore
/// return Err(omm_err!("omm::Texture", InvalidArgument, "mip {} has zero width", i));
/// ```
#[macro_export]
macro_rules! omm_err {
    ($source:expr, $kind:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::omm_error!($source, "{}", message);
        $crate::omm::Error::new($crate::omm::ErrorKind::$kind, message)
    }};
}

/// Log an error and return it from the enclosing function
#[macro_export]
macro_rules! omm_bail {
    ($source:expr, $kind:ident, $($arg:tt)*) => {
        return Err($crate::omm_err!($source, $kind, $($arg)*))
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
