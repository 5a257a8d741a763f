//! Calibration state for one capture session.
//!
//! The session owns the current gains (unity until the first successful
//! calibration) and whether they are locked. A failed calibration leaves
//! the previous gains in place. The owner calls [`CalibrationSession::reset`]
//! when the capture device changes.
//!
//! # Example
//!
//! ```rust
//! use greycard_calib::{CalibConfig, CalibrationSession, FramePipeline, PatchSelection};
//! use greycard_core::PixelBuffer;
//!
//! let pipeline = FramePipeline::new(CalibConfig::default()).unwrap();
//! let mut session = CalibrationSession::new();
//!
//! let dark = PixelBuffer::filled(64, 64, [40, 40, 40, 255]);
//! assert!(session.calibrate(&pipeline, &dark, PatchSelection::Centered).is_err());
//! assert!(!session.is_locked());
//!
//! let card = PixelBuffer::filled(64, 64, [226, 224, 225, 255]);
//! session.calibrate(&pipeline, &card, PatchSelection::Centered).unwrap();
//! assert!(session.is_locked());
//! ```

use crate::{CalibResult, Calibration, FramePipeline, Gains, PatchSelection, PatchSource};
use greycard_core::PixelBuffer;
use tracing::{debug, info};

/// Owned calibration state.
#[derive(Debug, Clone, Default)]
pub struct CalibrationSession {
    gains: Gains,
    last: Option<Calibration>,
}

impl CalibrationSession {
    /// New session with unity gains.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gains.
    #[inline]
    pub fn gains(&self) -> Gains {
        self.gains
    }

    /// `true` once a calibration has succeeded since the last reset.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.last.is_some()
    }

    /// How the current gains' patch was chosen, if locked.
    pub fn source(&self) -> Option<PatchSource> {
        self.last.map(|c| c.source)
    }

    /// The calibration behind the current gains, if locked.
    pub fn last_calibration(&self) -> Option<&Calibration> {
        self.last.as_ref()
    }

    /// Calibrates and, on success, adopts the new gains.
    ///
    /// On error the session is unchanged.
    pub fn calibrate(
        &mut self,
        pipeline: &FramePipeline,
        frame: &PixelBuffer,
        selection: PatchSelection,
    ) -> CalibResult<&Calibration> {
        match pipeline.calibrate(frame, selection) {
            Ok(cal) => {
                info!(gains = %cal.gains, source = ?cal.source, "calibration locked");
                self.gains = cal.gains;
                Ok(&*self.last.insert(cal))
            }
            Err(e) => {
                debug!(error = %e, locked = self.is_locked(), "calibration failed, keeping gains");
                Err(e)
            }
        }
    }

    /// Renders `frame` with the session gains.
    pub fn render(&self, pipeline: &FramePipeline, frame: &PixelBuffer) -> PixelBuffer {
        pipeline.render(frame, &self.gains)
    }

    /// Crops to the region of interest and renders with the session gains.
    pub fn render_cropped(&self, pipeline: &FramePipeline, frame: &PixelBuffer) -> CalibResult<PixelBuffer> {
        pipeline.render_cropped(frame, &self.gains)
    }

    /// Back to unity gains, unlocked.
    pub fn reset(&mut self) {
        debug!("calibration session reset");
        *self = Self::default();
    }
}
