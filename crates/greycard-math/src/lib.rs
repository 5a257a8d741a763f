//! # greycard-math
//!
//! Math primitives for the calibration engine:
//!
//! - [`Vec3`] - linear-light RGB triple
//! - [`Mat3`] - 3x3 color correction matrix
//!
//! # Design
//!
//! All matrix operations assume **row-major** storage and **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! Each output channel is the dot product of one matrix row with the input
//! triple. No normalization is applied.
//!
//! # Usage
//!
//! ```rust
//! use greycard_math::{Mat3, Vec3};
//!
//! let ccm = Mat3::from_rows([
//!     [1.10, -0.07, -0.03],
//!     [-0.05, 1.08, -0.03],
//!     [-0.02, -0.08, 1.10],
//! ]);
//! let gray = Vec3::splat(0.4);
//! let out = ccm * gray;
//! assert!((out.x - 0.4).abs() < 1e-5);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod mat3;
mod vec3;

pub use mat3::*;
pub use vec3::*;
