//! Engine configuration.
//!
//! Every tunable constant of the engine lives here, with defaults matching
//! the mature capture flow. Configurations load from YAML; missing keys
//! take their defaults.
//!
//! ```yaml
//! thresholds:
//!   min_luminance: 0.55
//!   max_luminance: 0.85
//! tone:
//!   pivot: 0.20
//! focus:
//!   blur_threshold: 1800
//! ```
//!
//! # Example
//!
//! ```rust
//! use greycard_calib::CalibConfig;
//!
//! let cfg = CalibConfig::from_yaml_str("tone:\n  pivot: 0.2\n").unwrap();
//! assert_eq!(cfg.tone.pivot, 0.2);
//! assert_eq!(cfg.thresholds.max_chroma, 0.06);
//! ```

use crate::ccm::{self, DEFAULT_CCM};
use crate::{CalibError, CalibResult, FocusParams, LocatorParams, PatchThresholds, ToneParams};
use greycard_core::FracRect;
use greycard_math::Mat3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default output crop (region of interest kept in the final image).
pub const DEFAULT_CROP: FracRect = FracRect::new(0.10, 0.12, 0.80, 0.64);

/// Default manual patch side as a fraction of `min(width, height)`.
pub const DEFAULT_PATCH_FRACTION: f32 = 0.12;

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibConfig {
    /// Color correction matrix, rows map to output channels.
    pub matrix: Mat3,
    /// Patch acceptance thresholds.
    pub thresholds: PatchThresholds,
    /// Tone shaping.
    pub tone: ToneParams,
    /// Focus check.
    pub focus: FocusParams,
    /// Manual patch side as a fraction of `min(width, height)`.
    pub patch_fraction: f32,
    /// Auto patch search geometry.
    pub locator: LocatorParams,
    /// Output crop.
    pub crop: FracRect,
}

impl Default for CalibConfig {
    fn default() -> Self {
        Self {
            matrix: DEFAULT_CCM,
            thresholds: PatchThresholds::default(),
            tone: ToneParams::default(),
            focus: FocusParams::default(),
            patch_fraction: DEFAULT_PATCH_FRACTION,
            locator: LocatorParams::default(),
            crop: DEFAULT_CROP,
        }
    }
}

impl CalibConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> CalibResult<Self> {
        let cfg: Self = serde_yaml::from_str(yaml)?;
        Ok(cfg)
    }

    /// Reads and parses a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> CalibResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading config");
        Self::from_yaml_str(&text)
    }

    /// Serializes to YAML.
    pub fn to_yaml(&self) -> CalibResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// [`CalibError::InvalidParameter`] naming the first bad value.
    pub fn validate(&self) -> CalibResult<()> {
        ccm::check(&self.matrix)?;
        self.thresholds.validate()?;
        self.tone.validate()?;
        self.focus.validate()?;
        self.locator.validate()?;
        if !(self.patch_fraction > 0.0 && self.patch_fraction <= 1.0) {
            return Err(CalibError::InvalidParameter(format!(
                "patch_fraction must be in (0, 1], got {}",
                self.patch_fraction
            )));
        }
        if !self.crop.is_valid() || self.crop.w <= 0.0 || self.crop.h <= 0.0 {
            return Err(CalibError::InvalidParameter(format!(
                "crop fractions must be in [0, 1] with positive size: {:?}",
                self.crop
            )));
        }
        Ok(())
    }
}
