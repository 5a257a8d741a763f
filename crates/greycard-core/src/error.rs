//! Error types for greycard-core operations.
//!
//! Covers the failure modes of buffer construction and rectangle resolution:
//! - Buffers whose data length or stride doesn't match the dimensions
//! - Regions that are empty or fall outside the buffer after clamping
//!
//! # Usage
//!
//! ```rust
//! use greycard_core::{Error, Result};
//!
//! fn check(x: u32, y: u32, size: u32, width: u32, height: u32) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::invalid_region(x, y, size, size, width, height));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in buffer and region operations.
///
/// # Categories
///
/// - **Bounds errors**: [`InvalidRegion`](Error::InvalidRegion)
/// - **Dimension errors**: [`InvalidDimensions`](Error::InvalidDimensions),
///   [`InvalidStride`](Error::InvalidStride)
#[derive(Debug, Error)]
pub enum Error {
    /// Region has zero area after clamping, or lies entirely outside the buffer.
    ///
    /// The caller has to pick a new region; nothing is sampled.
    ///
    /// # Example
    ///
    /// ```rust
    /// use greycard_core::Error;
    ///
    /// let err = Error::invalid_region(120, 10, 16, 16, 100, 100);
    /// assert!(err.to_string().contains("120"));
    /// ```
    #[error("region ({rx}, {ry}, {rw}x{rh}) is empty or outside buffer {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: u32,
        /// Region Y origin
        ry: u32,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Buffer width
        width: u32,
        /// Buffer height
        height: u32,
    },

    /// Invalid buffer dimensions.
    ///
    /// Returned when width or height is zero, or when the data length does
    /// not match `stride * height`.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Stride is too small for the given width.
    ///
    /// Rows must hold at least `width * 4` bytes.
    #[error("stride {stride} is less than minimum {min_stride} for width {width}")]
    InvalidStride {
        /// Provided stride
        stride: usize,
        /// Minimum required stride
        min_stride: usize,
        /// Buffer width
        width: u32,
    },
}

impl Error {
    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(rx: u32, ry: u32, rw: u32, rh: u32, width: u32, height: u32) -> Self {
        Self::InvalidRegion {
            rx,
            ry,
            rw,
            rh,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_region() {
        let err = Error::invalid_region(100, 50, 8, 8, 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
        assert!(msg.contains("80x60"));
        assert!(matches!(err, Error::InvalidRegion { width: 80, .. }));
    }

    #[test]
    fn test_invalid_dimensions() {
        let err = Error::invalid_dimensions(0, 10, "width must be > 0");
        assert!(err.to_string().contains("0x10"));
    }

    #[test]
    fn test_invalid_stride() {
        let err = Error::InvalidStride {
            stride: 10,
            min_stride: 40,
            width: 10,
        };
        assert!(err.to_string().contains("40"));
    }
}
