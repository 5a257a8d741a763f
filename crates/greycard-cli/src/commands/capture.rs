//! Capture command
//!
//! Runs the whole capture flow on one frame: focus check, calibration,
//! render and save. With `--auto`, a failed search falls back to the
//! centered patch before giving up.

use crate::CaptureArgs;
use anyhow::{bail, Result};
use greycard_calib::{CalibResult, CalibrationSession, FramePipeline, PatchSelection};
use greycard_core::PixelBuffer;
use tracing::{info, warn};

/// Calibrates `session` with `selection`, retrying on the centered patch
/// when an auto search comes back empty or rejected.
///
/// Returns the selection that produced the locked gains.
pub fn calibrate_with_fallback(
    session: &mut CalibrationSession,
    pipeline: &FramePipeline,
    frame: &PixelBuffer,
    selection: PatchSelection,
) -> CalibResult<PatchSelection> {
    match session.calibrate(pipeline, frame, selection).map(|_| ()) {
        Ok(()) => Ok(selection),
        Err(e) if selection == PatchSelection::Auto && e.is_resample() => {
            info!(error = %e, "auto search failed, trying centered patch");
            session
                .calibrate(pipeline, frame, PatchSelection::Centered)
                .map(|_| PatchSelection::Centered)
        }
        Err(e) => Err(e),
    }
}

pub fn run(args: CaptureArgs, pipeline: &FramePipeline) -> Result<()> {
    let frame = super::load_png(&args.input)?;

    match pipeline.check_focus(&frame) {
        Ok(verdict) => {
            if let Some(hint) = verdict.warning() {
                warn!(variance = verdict.variance, "{hint}");
                eprintln!("warning: {hint}");
            }
        }
        Err(e) => warn!(error = %e, "focus check skipped"),
    }

    let mut session = CalibrationSession::new();
    if let Err(e) = calibrate_with_fallback(&mut session, pipeline, &frame, args.patch.selection()) {
        let hint = e.rejection().map_or("Calibration failed.", |r| r.user_hint());
        bail!("{hint} ({e})");
    }

    let output = if args.no_crop {
        session.render(pipeline, &frame)
    } else {
        session.render_cropped(pipeline, &frame)?
    };
    super::save_png(&args.output, &output)?;

    println!("gains:  {} ({:?})", session.gains(), session.source());
    println!("saved:  {} ({}x{})", args.output.display(), output.width(), output.height());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use greycard_calib::{CalibConfig, CalibError, PatchSource, Rejection};

    /// A card just larger than the centered box but smaller than any
    /// locator window.
    fn small_card_frame() -> PixelBuffer {
        let mut frame = PixelBuffer::filled(200, 200, [20, 20, 20, 255]);
        for y in 87..113 {
            for x in 87..113 {
                frame.set_pixel(x, y, [226, 224, 225, 255]);
            }
        }
        frame
    }

    #[test]
    fn test_auto_falls_back_to_centered() {
        let pipeline = FramePipeline::new(CalibConfig::default()).unwrap();
        let frame = small_card_frame();
        let err = pipeline.calibrate(&frame, PatchSelection::Auto).unwrap_err();
        assert!(matches!(err, CalibError::NoPatchFound { .. }));

        let mut session = CalibrationSession::new();
        let used = calibrate_with_fallback(&mut session, &pipeline, &frame, PatchSelection::Auto).unwrap();
        assert_eq!(used, PatchSelection::Centered);
        assert!(session.is_locked());
        assert_eq!(session.source(), Some(PatchSource::Manual));
    }

    #[test]
    fn test_fallback_both_fail() {
        let pipeline = FramePipeline::new(CalibConfig::default()).unwrap();
        let frame = PixelBuffer::filled(64, 64, [20, 20, 20, 255]);
        let mut session = CalibrationSession::new();
        let err = calibrate_with_fallback(&mut session, &pipeline, &frame, PatchSelection::Auto).unwrap_err();
        assert_eq!(err.rejection(), Some(Rejection::TooDim));
        assert!(!session.is_locked());
    }

    #[test]
    fn test_no_fallback_for_manual() {
        let pipeline = FramePipeline::new(CalibConfig::default()).unwrap();
        let frame = small_card_frame();
        let mut session = CalibrationSession::new();
        let corner = PatchSelection::Manual(greycard_core::Rect::square(0, 0, 20));
        let err = calibrate_with_fallback(&mut session, &pipeline, &frame, corner).unwrap_err();
        assert_eq!(err.rejection(), Some(Rejection::TooDim));
        assert!(!session.is_locked());
    }

    #[test]
    fn test_auto_success_keeps_selection() {
        let pipeline = FramePipeline::new(CalibConfig::default()).unwrap();
        let frame = PixelBuffer::filled(64, 64, [226, 224, 225, 255]);
        let mut session = CalibrationSession::new();
        let used = calibrate_with_fallback(&mut session, &pipeline, &frame, PatchSelection::Auto).unwrap();
        assert_eq!(used, PatchSelection::Auto);
        assert_eq!(session.source(), Some(PatchSource::Auto));
    }
}
