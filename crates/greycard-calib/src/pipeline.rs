//! Whole-frame entry points.
//!
//! [`FramePipeline`] is what the capture flow calls: calibrate on a patch,
//! render a corrected frame, check focus, crop to the region of interest.
//! It holds only the read-only [`CalibConfig`]; the current gains are
//! passed into every render call (see [`CalibrationSession`] for an owned
//! holder).
//!
//! Per pixel, rendering is
//!
//! ```text
//! decode -> gains -> CCM -> tone -> encode     (alpha copied through)
//! ```
//!
//! Rows are independent. With the `parallel` feature they are processed on
//! the rayon pool; output is identical either way.
//!
//! [`CalibrationSession`]: crate::CalibrationSession

use crate::locate::locate;
use crate::stats::measure;
use crate::tone::{shape, ToneParams};
use crate::validate::validate;
use crate::{ccm, CalibConfig, CalibResult, FocusVerdict, Gains, PatchStats};
use greycard_core::{FracRect, PixelBuffer, Rect, CHANNELS};
use greycard_math::{Mat3, Vec3};
use greycard_transfer::{decode_rgb, encode_rgb};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Where to sample the neutral reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchSelection {
    /// Explicit pixel rectangle (clamped to the frame).
    Manual(Rect),
    /// Centered square sized by `patch_fraction`.
    Centered,
    /// Search the frame for the best neutral window.
    Auto,
}

/// How the patch of a successful calibration was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchSource {
    /// User placed (explicit rectangle or centered box).
    Manual,
    /// Found by the locator.
    Auto,
}

/// A successful calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Derived gains.
    pub gains: Gains,
    /// Statistics the gains were derived from.
    pub stats: PatchStats,
    /// Sampled region, in frame pixels.
    pub region: Rect,
    /// How the region was chosen.
    pub source: PatchSource,
}

/// Largest magnitude a linear channel carries into the CCM and tone stages.
///
/// Anything at or above 1.0 already encodes to 255, so the bound only has
/// to keep the tone arithmetic finite.
pub const LINEAR_LIMIT: f32 = 1.0e6;

/// Replaces NaN with 0 and saturates each channel to `±LINEAR_LIMIT`.
#[inline]
fn bounded(rgb: Vec3) -> Vec3 {
    rgb.map(|v| if v.is_nan() { 0.0 } else { v.clamp(-LINEAR_LIMIT, LINEAR_LIMIT) })
}

/// Corrects one pixel.
///
/// Overflowing gains or matrix products saturate rather than turning into
/// NaN, so an over-driven channel encodes to 255 and never to black.
#[inline]
pub fn render_pixel(px: [u8; 4], gains: &Gains, matrix: &Mat3, tone: &ToneParams) -> [u8; 4] {
    let linear = Vec3::from_array(decode_rgb(px));
    let balanced = bounded(gains.apply(linear));
    let corrected = bounded(ccm::apply(matrix, balanced));
    let shaped = shape(corrected, tone);
    let [r, g, b] = encode_rgb(shaped.to_array());
    [r, g, b, px[3]]
}

#[inline]
fn render_row(src: &[u8], dst: &mut [u8], gains: &Gains, matrix: &Mat3, tone: &ToneParams) {
    for (s, d) in src.chunks_exact(CHANNELS).zip(dst.chunks_exact_mut(CHANNELS)) {
        let px = [s[0], s[1], s[2], s[3]];
        d.copy_from_slice(&render_pixel(px, gains, matrix, tone));
    }
}

/// Renders a corrected copy of `frame`.
///
/// The output is packed and has the same dimensions; the input is not touched.
pub fn render(frame: &PixelBuffer, gains: &Gains, matrix: &Mat3, tone: &ToneParams) -> PixelBuffer {
    let (w, h) = frame.dimensions();
    trace!(w, h, gains = %gains, "render");
    let mut out = PixelBuffer::new(w, h);
    if frame.is_empty() {
        return out;
    }
    let row_bytes = w as usize * CHANNELS;

    #[cfg(feature = "parallel")]
    out.data_mut()
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, dst)| render_row(frame.row(y as u32), dst, gains, matrix, tone));

    #[cfg(not(feature = "parallel"))]
    for (y, dst) in out.data_mut().chunks_mut(row_bytes).enumerate() {
        render_row(frame.row(y as u32), dst, gains, matrix, tone);
    }

    out
}

/// Crops `frame` to a fractional rectangle.
///
/// # Errors
///
/// [`greycard_core::Error::InvalidRegion`] if the rectangle resolves empty.
pub fn crop(frame: &PixelBuffer, rect: &FracRect) -> CalibResult<PixelBuffer> {
    let r = rect.to_rect(frame.width(), frame.height())?;
    trace!(crop = %r, "crop");
    Ok(frame.crop(r)?)
}

/// Calibration, rendering and focus over whole frames.
#[derive(Debug, Clone)]
pub struct FramePipeline {
    config: CalibConfig,
}

impl FramePipeline {
    /// Creates a pipeline after validating `config`.
    pub fn new(config: CalibConfig) -> CalibResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &CalibConfig {
        &self.config
    }

    /// Samples a patch and derives gains.
    ///
    /// # Errors
    ///
    /// - [`CalibError::Core`] for a region outside the frame
    /// - [`CalibError::PatchRejected`] when the patch fails validation
    /// - [`CalibError::NoPatchFound`] when auto-search finds nothing
    /// - [`CalibError::DegenerateGain`] if a channel mean is near zero
    ///
    /// [`CalibError::Core`]: crate::CalibError::Core
    /// [`CalibError::PatchRejected`]: crate::CalibError::PatchRejected
    /// [`CalibError::NoPatchFound`]: crate::CalibError::NoPatchFound
    /// [`CalibError::DegenerateGain`]: crate::CalibError::DegenerateGain
    pub fn calibrate(&self, frame: &PixelBuffer, selection: PatchSelection) -> CalibResult<Calibration> {
        let (w, h) = frame.dimensions();
        let (stats, region, source) = match selection {
            PatchSelection::Auto => {
                let found = locate(frame, &self.config.locator, &self.config.thresholds)?;
                (found.stats, found.frame_region(w, h)?, PatchSource::Auto)
            }
            PatchSelection::Manual(rect) => self.sample(frame, rect)?,
            PatchSelection::Centered => {
                self.sample(frame, Rect::centered_square(w, h, self.config.patch_fraction))?
            }
        };
        let gains = Gains::from_means(stats.mean)?;
        debug!(?source, region = %region, gains = %gains, "calibrated");
        Ok(Calibration {
            gains,
            stats,
            region,
            source,
        })
    }

    fn sample(&self, frame: &PixelBuffer, rect: Rect) -> CalibResult<(PatchStats, Rect, PatchSource)> {
        let region = rect.resolve(frame.width(), frame.height())?;
        let stats = measure(frame, region)?;
        let verdict = validate(&stats, &self.config.thresholds);
        debug!(region = %region, ?verdict, luminance = stats.luminance(), chroma = stats.chroma(), "sampled");
        verdict.into_result()?;
        Ok((stats, region, PatchSource::Manual))
    }

    /// Renders `frame` with `gains` and the configured matrix and tone.
    pub fn render(&self, frame: &PixelBuffer, gains: &Gains) -> PixelBuffer {
        render(frame, gains, &self.config.matrix, &self.config.tone)
    }

    /// Crops to the configured region of interest, then renders.
    pub fn render_cropped(&self, frame: &PixelBuffer, gains: &Gains) -> CalibResult<PixelBuffer> {
        let cropped = self.crop(frame)?;
        Ok(self.render(&cropped, gains))
    }

    /// Focus verdict for `frame`.
    pub fn check_focus(&self, frame: &PixelBuffer) -> CalibResult<FocusVerdict> {
        crate::focus::check_focus(frame, &self.config.focus)
    }

    /// Crops `frame` to the configured region of interest.
    pub fn crop(&self, frame: &PixelBuffer) -> CalibResult<PixelBuffer> {
        crop(frame, &self.config.crop)
    }
}
