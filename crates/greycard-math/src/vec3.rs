//! Linear-light RGB triple.
//!
//! [`Vec3`] is what flows between the decode, gain, CCM and tone stages.
//! Nothing here clamps: values above 1 are normal until highlight
//! compression, and negatives can come out of the CCM.
//!
//! ```rust
//! use greycard_math::Vec3;
//!
//! let patch = Vec3::new(0.74, 0.70, 0.66);
//! let balanced = patch * Vec3::new(0.946, 1.0, 1.061);
//! assert!((balanced.x - balanced.y).abs() < 1e-3);
//! ```

use greycard_core::luminance_rec709;
use serde::{Deserialize, Serialize};
use std::ops::{Index, Mul};

/// Linear red, green and blue as `x`, `y`, `z`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// Red
    pub x: f32,
    /// Green
    pub y: f32,
    /// Blue
    pub z: f32,
}

impl Vec3 {
    /// Black.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Triple from its three channels.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Gray triple with every channel at `v`.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Triple from `[r, g, b]`.
    #[inline]
    pub const fn from_array(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    /// Channels as `[r, g, b]`.
    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// BT.709 luminance.
    #[inline]
    pub fn luminance(self) -> f32 {
        luminance_rec709(self.to_array())
    }

    /// `r + g + b`.
    #[inline]
    pub fn sum(self) -> f32 {
        self.x + self.y + self.z
    }

    /// Unweighted channel average, the white balance target.
    #[inline]
    pub fn mean(self) -> f32 {
        self.sum() / 3.0
    }

    /// Applies `f` to every channel.
    #[inline]
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }

    /// Brightest channel.
    #[inline]
    pub fn max_element(self) -> f32 {
        self.x.max(self.y).max(self.z)
    }
}

impl Index<usize> for Vec3 {
    type Output = f32;

    #[inline]
    fn index(&self, channel: usize) -> &f32 {
        match channel {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("channel {channel} out of range for an RGB triple"),
        }
    }
}

// Per-channel product: gains times linear values
impl Mul for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, k: f32) -> Self {
        self.map(|v| v * k)
    }
}
