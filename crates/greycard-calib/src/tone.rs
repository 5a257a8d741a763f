//! Tone shaping after color correction.
//!
//! Applied in order to each color-corrected linear triple:
//!
//! 1. **Highlight compression** - luminance `L` is mapped to `L / (1 + L)`
//!    and all three channels are scaled by the same ratio, so hue and
//!    channel ratios survive while bright areas roll off instead of clipping.
//! 2. **Contrast** - per channel `(v - pivot) * (1 + amount) + pivot`.
//!    Not clamped; the encoder saturates at the end.
//! 3. **Saturation clamp** - each channel's deviation from the recomputed
//!    luminance is limited to `L * (max_saturation - 1)`.
//!
//! # Example
//!
//! ```rust
//! use greycard_calib::tone::{shape, ToneParams};
//! use greycard_math::Vec3;
//!
//! let out = shape(Vec3::new(1.4, 1.2, 1.0), &ToneParams::default());
//! assert!(out.max_element() < 1.0);
//! ```

use crate::{CalibError, CalibResult};
use greycard_math::Vec3;
use serde::{Deserialize, Serialize};

/// Tone shaping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneParams {
    /// Enables the `L / (1 + L)` highlight roll-off.
    pub highlight_compression: bool,
    /// Contrast pivot, in linear light.
    pub pivot: f32,
    /// Contrast amount; 0 leaves values unchanged.
    pub amount: f32,
    /// Saturation limit relative to luminance; `None` disables the clamp.
    pub max_saturation: Option<f32>,
}

impl Default for ToneParams {
    fn default() -> Self {
        Self {
            highlight_compression: true,
            pivot: 0.18,
            amount: 0.20,
            max_saturation: Some(1.10),
        }
    }
}

impl ToneParams {
    /// Parameters that leave every value unchanged.
    pub fn identity() -> Self {
        Self {
            highlight_compression: false,
            amount: 0.0,
            max_saturation: None,
            ..Self::default()
        }
    }

    /// Returns `true` if [`shape`] is a no-op with these parameters.
    pub fn is_identity(&self) -> bool {
        !self.highlight_compression && self.amount == 0.0 && self.max_saturation.is_none()
    }

    /// Checks that every parameter is finite and `max_saturation >= 1`.
    pub fn validate(&self) -> CalibResult<()> {
        if !self.pivot.is_finite() || !self.amount.is_finite() || self.amount <= -1.0 {
            return Err(CalibError::InvalidParameter(format!(
                "contrast pivot {} / amount {} out of range",
                self.pivot, self.amount
            )));
        }
        if let Some(s) = self.max_saturation {
            if !s.is_finite() || s < 1.0 {
                return Err(CalibError::InvalidParameter(format!(
                    "max_saturation must be >= 1, got {s}"
                )));
            }
        }
        Ok(())
    }
}

/// Reinhard-style luminance roll-off preserving channel ratios.
///
/// Values with non-positive or non-finite luminance pass through.
#[inline]
pub fn compress_highlights(rgb: Vec3) -> Vec3 {
    let l = rgb.luminance();
    if l <= 0.0 || !l.is_finite() {
        return rgb;
    }
    let compressed = l / (1.0 + l);
    rgb * (compressed / l)
}

/// Linear contrast around `pivot`.
#[inline]
pub fn contrast(rgb: Vec3, pivot: f32, amount: f32) -> Vec3 {
    let k = 1.0 + amount;
    rgb.map(|v| (v - pivot) * k + pivot)
}

/// Bounds each channel's deviation from luminance by `L * (max_saturation - 1)`.
///
/// A non-positive luminance gives a zero bound, collapsing the triple to gray.
#[inline]
pub fn clamp_saturation(rgb: Vec3, max_saturation: f32) -> Vec3 {
    let l = rgb.luminance();
    // f32::max drops NaN, keeping clamp's bounds ordered
    let bound = (l * (max_saturation - 1.0)).max(0.0);
    rgb.map(|v| l + (v - l).clamp(-bound, bound))
}

/// Runs the enabled tone stages in order.
#[inline]
pub fn shape(rgb: Vec3, params: &ToneParams) -> Vec3 {
    let mut v = rgb;
    if params.highlight_compression {
        v = compress_highlights(v);
    }
    if params.amount != 0.0 {
        v = contrast(v, params.pivot, params.amount);
    }
    if let Some(s) = params.max_saturation {
        v = clamp_saturation(v, s);
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_compression_curve() {
        let out = compress_highlights(Vec3::splat(1.0));
        assert!((out.luminance() - 0.5).abs() < EPS);
        let out = compress_highlights(Vec3::splat(3.0));
        assert!((out.luminance() - 0.75).abs() < EPS);
    }

    #[test]
    fn test_compression_preserves_ratios() {
        let rgb = Vec3::new(0.9, 0.6, 0.3);
        let out = compress_highlights(rgb);
        assert!((out.x / out.y - rgb.x / rgb.y).abs() < EPS);
        assert!((out.z / out.y - rgb.z / rgb.y).abs() < EPS);
    }

    #[test]
    fn test_compression_black_passthrough() {
        assert_eq!(compress_highlights(Vec3::ZERO), Vec3::ZERO);
        let neg = Vec3::new(-0.1, -0.1, -0.1);
        assert_eq!(compress_highlights(neg), neg);
    }

    #[test]
    fn test_contrast_pivot_fixed() {
        let out = contrast(Vec3::splat(0.18), 0.18, 0.2);
        assert!((out.x - 0.18).abs() < EPS);
        let out = contrast(Vec3::splat(0.5), 0.18, 0.2);
        assert!((out.x - (0.32 * 1.2 + 0.18)).abs() < EPS);
        let below = contrast(Vec3::splat(0.1), 0.18, 0.2);
        assert!(below.x < 0.1);
    }

    #[test]
    fn test_saturation_clamp_bounds_deviation() {
        let rgb = Vec3::new(0.9, 0.3, 0.2);
        let l = rgb.luminance();
        let out = clamp_saturation(rgb, 1.1);
        for c in 0..3 {
            assert!((out[c] - l).abs() <= l * 0.1 + EPS, "channel {c}: {:?}", out);
        }
        assert!(out.x > out.y);
    }

    #[test]
    fn test_saturation_clamp_leaves_gray() {
        let gray = Vec3::splat(0.4);
        let out = clamp_saturation(gray, 1.1);
        assert!((out.x - 0.4).abs() < EPS && (out.z - 0.4).abs() < EPS);
    }

    #[test]
    fn test_saturation_clamp_nan_safe() {
        let out = clamp_saturation(Vec3::new(f32::NAN, 0.5, 0.5), 1.1);
        assert!(out.x.is_nan());
        // Must not panic on an unordered clamp range
        let _ = clamp_saturation(Vec3::new(f32::INFINITY, 0.5, 0.5), 1.1);
    }

    #[test]
    fn test_identity() {
        let p = ToneParams::identity();
        assert!(p.is_identity());
        let rgb = Vec3::new(0.7, 1.3, -0.2);
        assert_eq!(shape(rgb, &p), rgb);
    }

    #[test]
    fn test_default_shape_rolls_off() {
        let p = ToneParams::default();
        let bright = shape(Vec3::splat(4.0), &p);
        assert!(bright.x < 1.0);
        let gray = shape(Vec3::splat(0.456), &p);
        assert!((gray.x - gray.y).abs() < EPS && (gray.y - gray.z).abs() < EPS);
    }

    #[test]
    fn test_validate() {
        assert!(ToneParams::default().validate().is_ok());
        let bad = ToneParams {
            max_saturation: Some(0.5),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
