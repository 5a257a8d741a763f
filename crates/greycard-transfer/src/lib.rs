//! # greycard-transfer
//!
//! Conversion between 8-bit encoded channel values and linear light.
//!
//! # Terminology
//!
//! - **EOTF**: Encoded -> Linear (decode)
//! - **OETF**: Linear -> Encoded (encode)
//!
//! # Modules
//!
//! - [`srgb`] - IEC 61966-2-1 piecewise transfer function on [0, 1]
//! - [`codec`] - 8-bit [`decode`] / [`encode`] built on [`srgb`], with
//!   saturation of out-of-range and non-finite input
//!
//! # Usage
//!
//! ```rust
//! use greycard_transfer::{decode, encode};
//!
//! let linear = decode(180);
//! assert!((linear - 0.456).abs() < 0.001);
//! assert_eq!(encode(linear), 180);
//!
//! // Over-range values saturate
//! assert_eq!(encode(1.7), 255);
//! assert_eq!(encode(f32::NAN), 0);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod codec;
pub mod srgb;

pub use codec::{decode, decode_rgb, encode, encode_rgb};
pub use srgb::{eotf as srgb_eotf, oetf as srgb_oetf};
