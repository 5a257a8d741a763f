//! White balance gains from a neutral patch.
//!
//! Given patch means `(r, g, b)` and target `t = (r + g + b) / 3`, the gains
//! are `(t/r, t/g, t/b)`. Applying them to the patch yields `r = g = b = t`,
//! so the patch comes out neutral at its original average level.

use crate::{CalibError, CalibResult, Channel};
use greycard_math::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Smallest channel mean that may be divided by.
///
/// Means below this would produce gains above ~10^4 (or infinite ones).
pub const GAIN_FLOOR: f32 = 1e-4;

/// Per-channel multiplicative white balance gains.
///
/// Always finite and positive when produced by [`Gains::from_means`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gains {
    /// Red gain
    pub r: f32,
    /// Green gain
    pub g: f32,
    /// Blue gain
    pub b: f32,
}

impl Gains {
    /// Identity gains.
    pub const UNITY: Self = Self::new(1.0, 1.0, 1.0);

    /// Creates gains from explicit values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Derives gains from accepted patch means.
    ///
    /// # Errors
    ///
    /// [`CalibError::DegenerateGain`] if any mean is below [`GAIN_FLOOR`]
    /// or not finite.
    ///
    /// # Example
    ///
    /// ```rust
    /// use greycard_calib::Gains;
    /// use greycard_math::Vec3;
    ///
    /// let means = Vec3::new(0.8, 0.7, 0.6);
    /// let g = Gains::from_means(means).unwrap();
    /// let balanced = g.apply(means);
    /// assert!((balanced.x - balanced.z).abs() < 1e-6);
    /// ```
    pub fn from_means(means: Vec3) -> CalibResult<Self> {
        for (channel, mean) in Channel::ALL.into_iter().zip(means.to_array()) {
            if !mean.is_finite() || mean < GAIN_FLOOR {
                return Err(CalibError::DegenerateGain {
                    channel,
                    mean,
                    floor: GAIN_FLOOR,
                });
            }
        }
        let t = means.mean();
        let gains = Self::new(t / means.x, t / means.y, t / means.z);
        debug!(r = gains.r, g = gains.g, b = gains.b, target = t, "gains");
        Ok(gains)
    }

    /// Multiplies each channel by its gain.
    #[inline]
    pub fn apply(&self, rgb: Vec3) -> Vec3 {
        rgb * self.as_vec3()
    }

    /// Gains as a vector.
    #[inline]
    pub const fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    /// Returns `true` if every gain is finite and positive.
    pub fn is_valid(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|g| g.is_finite() && *g > 0.0)
    }
}

impl Default for Gains {
    fn default() -> Self {
        Self::UNITY
    }
}

impl fmt::Display for Gains {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4},{:.4}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_means_give_unity() {
        let g = Gains::from_means(Vec3::splat(0.456)).unwrap();
        assert!((g.r - 1.0).abs() < 1e-6);
        assert!((g.g - 1.0).abs() < 1e-6);
        assert!((g.b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_gains_neutralize_patch() {
        let cases = [
            Vec3::new(0.72, 0.70, 0.66),
            Vec3::new(0.61, 0.64, 0.69),
            Vec3::new(0.80, 0.75, 0.77),
        ];
        for means in cases {
            let out = Gains::from_means(means).unwrap().apply(means);
            let t = means.mean();
            for c in 0..3 {
                assert!((out[c] - t).abs() < 1e-6, "{:?} -> {:?}", means, out);
            }
        }
    }

    #[test]
    fn test_zero_channel_is_degenerate() {
        let err = Gains::from_means(Vec3::new(0.5, 0.5, 0.0)).unwrap_err();
        match err {
            CalibError::DegenerateGain { channel, .. } => assert_eq!(channel, Channel::Blue),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nan_mean_is_degenerate() {
        assert!(Gains::from_means(Vec3::new(f32::NAN, 0.5, 0.5)).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Gains::UNITY.to_string(), "1.0000,1.0000,1.0000");
        assert!(Gains::default().is_valid());
        assert!(!Gains::new(1.0, 0.0, 1.0).is_valid());
    }
}
