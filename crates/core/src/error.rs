//! Error types shared across the driftfield crates.

use thiserror::Error;

/// Errors produced by raster, color, tessellation, and snapshot operations.
#[derive(Debug, Error)]
pub enum DriftError {
    /// Width or height was zero, or the pixel count overflowed `usize`.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// Two buffers had incompatible dimensions for a paired operation.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A tessellation was requested over an empty site set.
    #[error("cannot tessellate an empty site set")]
    NoSites,

    /// A file write failed (PNG snapshot).
    #[error("i/o error: {0}")]
    Io(String),
}
