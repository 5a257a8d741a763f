//! # greycard-calib
//!
//! Image calibration engine: white balance from a single neutral patch
//! sampled in the live scene, followed by a fixed color correction and tone
//! shaping, plus a focus check on the captured frame.
//!
//! # Modules
//!
//! - [`stats`] - linear mean/variance over a pixel region
//! - [`validate`] - accept or reject a patch with a specific reason
//! - [`gain`] - per-channel white balance gains from patch means
//! - [`locate`] - hands-free search for the best neutral patch
//! - [`ccm`] - fixed 3x3 color correction
//! - [`tone`] - highlight compression, contrast curve, saturation clamp
//! - [`focus`] - Laplacian-variance sharpness on a center crop
//! - [`pipeline`] - whole-frame entry points
//! - [`session`] - owned calibration state for one capture session
//! - [`config`] - every tunable constant, loadable from YAML
//!
//! # Pipeline
//!
//! ```text
//! frame --stats--> validate --> gains ------------------------+
//!   |                                                         v
//!   +--> decode -> gains -> CCM -> highlight -> contrast -> sat clamp -> encode
//!   |
//!   +--> center crop -> luma -> Laplacian -> variance -> FocusVerdict
//! ```
//!
//! # Example
//!
//! ```rust
//! use greycard_calib::{CalibConfig, FramePipeline, PatchSelection};
//! use greycard_core::{PixelBuffer, Rect};
//!
//! let frame = PixelBuffer::filled(64, 64, [225, 225, 225, 255]);
//! let pipeline = FramePipeline::new(CalibConfig::default()).unwrap();
//!
//! let cal = pipeline
//!     .calibrate(&frame, PatchSelection::Manual(Rect::square(16, 16, 32)))
//!     .unwrap();
//! let corrected = pipeline.render(&frame, &cal.gains);
//! assert_eq!(corrected.dimensions(), frame.dimensions());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod ccm;
pub mod config;
pub mod focus;
pub mod gain;
pub mod locate;
pub mod pipeline;
pub mod session;
pub mod stats;
pub mod tone;
pub mod validate;

pub use config::CalibConfig;
pub use error::{CalibError, CalibResult, Channel, Rejection};
pub use focus::{FocusParams, FocusVerdict};
pub use gain::Gains;
pub use locate::{LinearGrid, LocatedPatch, LocatorParams};
pub use pipeline::{Calibration, FramePipeline, PatchSelection, PatchSource};
pub use session::CalibrationSession;
pub use stats::PatchStats;
pub use tone::ToneParams;
pub use validate::{PatchThresholds, Verdict};
