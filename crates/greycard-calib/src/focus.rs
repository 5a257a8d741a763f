//! Focus check by Laplacian variance.
//!
//! A centered crop (25% x 25% of the frame by default) is reduced to
//! Rec.709 luma computed on the *encoded* 8-bit values, filtered with the
//! 3x3 kernel
//!
//! ```text
//! -1 -1 -1
//! -1  8 -1
//! -1 -1 -1
//! ```
//!
//! at every interior pixel, and the population variance of the responses
//! is compared against a threshold. Sharp edges give large responses of
//! both signs; a defocused image gives small ones.
//!
//! The score is relative: it depends on scene content and resolution, so
//! the threshold is a tunable, not an absolute sharpness scale.
//!
//! # Example
//!
//! ```rust
//! use greycard_calib::focus::{check_focus, FocusParams};
//! use greycard_core::PixelBuffer;
//!
//! let flat = PixelBuffer::filled(64, 64, [128, 128, 128, 255]);
//! let verdict = check_focus(&flat, &FocusParams::default()).unwrap();
//! assert!(verdict.blurry);
//! assert!(verdict.warning().is_some());
//! ```

use crate::{CalibError, CalibResult};
use greycard_core::{luminance_rec709, PixelBuffer, Rect};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Hint shown when a frame is judged soft.
pub const BLUR_WARNING: &str = "Focus soft. Adjust distance or hold steadier.";

/// Focus check parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusParams {
    /// Crop side as a fraction of each frame dimension.
    pub crop_fraction: f32,
    /// Variances below this are blurry (8-bit luma scale).
    pub blur_threshold: f32,
}

impl Default for FocusParams {
    fn default() -> Self {
        Self {
            crop_fraction: 0.25,
            blur_threshold: 2500.0,
        }
    }
}

impl FocusParams {
    /// Checks `0 < crop_fraction <= 1` and a finite, non-negative threshold.
    pub fn validate(&self) -> CalibResult<()> {
        if !(self.crop_fraction > 0.0 && self.crop_fraction <= 1.0) {
            return Err(CalibError::InvalidParameter(format!(
                "focus crop_fraction must be in (0, 1], got {}",
                self.crop_fraction
            )));
        }
        if !self.blur_threshold.is_finite() || self.blur_threshold < 0.0 {
            return Err(CalibError::InvalidParameter(format!(
                "blur_threshold must be finite and non-negative, got {}",
                self.blur_threshold
            )));
        }
        Ok(())
    }
}

/// Result of a focus check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusVerdict {
    /// `variance < blur_threshold`.
    pub blurry: bool,
    /// Raw Laplacian variance.
    pub variance: f32,
}

impl FocusVerdict {
    /// User hint for a blurry frame.
    pub fn warning(&self) -> Option<&'static str> {
        self.blurry.then_some(BLUR_WARNING)
    }
}

/// Centered crop of `fraction` of each dimension.
///
/// # Errors
///
/// [`greycard_core::Error::InvalidDimensions`] if the crop is smaller than 3x3,
/// which leaves no interior pixel for the kernel.
pub fn center_crop(width: u32, height: u32, fraction: f32) -> CalibResult<Rect> {
    let f = fraction.clamp(0.0, 1.0);
    let cw = (width as f32 * f).round() as u32;
    let ch = (height as f32 * f).round() as u32;
    if cw < 3 || ch < 3 {
        return Err(greycard_core::Error::invalid_dimensions(
            width,
            height,
            format!("focus crop {cw}x{ch} is smaller than 3x3"),
        )
        .into());
    }
    Ok(Rect::new((width - cw) / 2, (height - ch) / 2, cw, ch))
}

/// Rec.709 luma of the encoded values in `region`, row-major.
pub fn luma_plane(frame: &PixelBuffer, region: Rect) -> Vec<f32> {
    frame
        .region_pixels(region)
        .map(|[r, g, b, _]| luminance_rec709([r as f32, g as f32, b as f32]))
        .collect()
}

/// Population variance of the 8-neighbor Laplacian over interior pixels.
///
/// Returns 0 for planes smaller than 3x3.
pub fn laplacian_variance(luma: &[f32], width: usize, height: usize) -> f64 {
    if width < 3 || height < 3 || luma.len() < width * height {
        return 0.0;
    }

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut count = 0u64;

    for y in 1..height - 1 {
        let above = &luma[(y - 1) * width..y * width];
        let row = &luma[y * width..(y + 1) * width];
        let below = &luma[(y + 1) * width..(y + 2) * width];
        for x in 1..width - 1 {
            let neighbors = above[x - 1] + above[x] + above[x + 1]
                + row[x - 1] + row[x + 1]
                + below[x - 1] + below[x] + below[x + 1];
            let response = (8.0 * row[x] - neighbors) as f64;
            sum += response;
            sum_sq += response * response;
            count += 1;
        }
    }

    let n = count as f64;
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// Runs the focus check on the center of `frame`.
///
/// # Errors
///
/// Invalid parameters, or a frame too small for a 3x3 crop.
pub fn check_focus(frame: &PixelBuffer, params: &FocusParams) -> CalibResult<FocusVerdict> {
    params.validate()?;
    let (w, h) = frame.dimensions();
    let crop = center_crop(w, h, params.crop_fraction)?;
    trace!(w, h, crop = %crop, "check_focus");

    let luma = luma_plane(frame, crop);
    let variance = laplacian_variance(&luma, crop.width as usize, crop.height as usize) as f32;
    let verdict = FocusVerdict {
        blurry: variance < params.blur_threshold,
        variance,
    };
    debug!(variance, blurry = verdict.blurry, "focus");
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(size: u32) -> PixelBuffer {
        let mut frame = PixelBuffer::new(size, size);
        for y in 0..size {
            for x in 0..size {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                frame.set_pixel(x, y, [v, v, v, 255]);
            }
        }
        frame
    }

    #[test]
    fn test_uniform_is_blurry() {
        let frame = PixelBuffer::filled(64, 64, [200, 180, 160, 255]);
        let v = check_focus(&frame, &FocusParams::default()).unwrap();
        assert!(v.blurry);
        assert!(v.variance < 1e-3);
        assert_eq!(v.warning(), Some(BLUR_WARNING));
    }

    #[test]
    fn test_checkerboard_is_sharp() {
        let v = check_focus(&checkerboard(64), &FocusParams::default()).unwrap();
        assert!(!v.blurry);
        // Responses are +/-1020 -> variance ~1020^2
        assert!((v.variance - 1_040_400.0).abs() < 1_000.0, "{}", v.variance);
        assert_eq!(v.warning(), None);
    }

    #[test]
    fn test_center_crop_geometry() {
        let r = center_crop(640, 480, 0.25).unwrap();
        assert_eq!(r, Rect::new(240, 180, 160, 120));
    }

    #[test]
    fn test_tiny_frame_fails() {
        let frame = PixelBuffer::filled(8, 8, [0, 0, 0, 255]);
        let err = check_focus(&frame, &FocusParams::default()).unwrap_err();
        assert!(matches!(err, CalibError::Core(_)));
    }

    #[test]
    fn test_single_edge_response() {
        // Vertical step: only the columns next to the edge respond
        let luma: Vec<f32> = (0..5 * 4).map(|i| if i % 5 < 2 { 0.0 } else { 100.0 }).collect();
        let var = laplacian_variance(&luma, 5, 4);
        assert!(var > 0.0);
        assert_eq!(laplacian_variance(&luma, 2, 10), 0.0);
    }

    #[test]
    fn test_threshold_is_tunable() {
        let frame = checkerboard(64);
        let strict = FocusParams {
            blur_threshold: 2.0e6,
            ..Default::default()
        };
        assert!(check_focus(&frame, &strict).unwrap().blurry);
    }

    #[test]
    fn test_params_validate() {
        let bad = FocusParams {
            crop_fraction: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
