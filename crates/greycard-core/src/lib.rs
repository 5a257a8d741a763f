//! # greycard-core
//!
//! Core types shared by every greycard crate.
//!
//! - [`PixelBuffer`] - RGBA8 raster with explicit row stride
//! - [`Rect`], [`FracRect`] - pixel and fractional rectangles, always clamped
//!   to buffer bounds before use
//! - [`luminance_rec709`] - BT.709 luma weights used by the validator,
//!   tone shaper and focus estimator
//! - [`Error`] - bounds and dimension failures
//!
//! ## Crate Structure
//!
//! ```text
//! greycard-core (this crate)
//!    ^
//!    |
//!    +-- greycard-math (Vec3, Mat3)
//!    +-- greycard-transfer (sRGB codec)
//!    +-- greycard-calib (calibration engine)
//!    +-- greycard-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;
pub mod rect;

pub use error::*;
pub use image::*;
pub use pixel::{luminance_rec709, CHANNELS, REC709_LUMA};
pub use rect::*;
