//! Error types for calibration operations.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a sampled patch was not accepted as a neutral reference.
///
/// Listed in the order the validator checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Patch luminance below the acceptance band.
    TooDim,
    /// Patch luminance above the acceptance band.
    Overexposed,
    /// Channel means too far apart to be a gray/white surface.
    NotNeutral,
    /// Channel variance too high (texture, glare, noise).
    HighTexture,
}

impl Rejection {
    /// Stable snake_case identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TooDim => "too_dim",
            Self::Overexposed => "overexposed",
            Self::NotNeutral => "not_neutral",
            Self::HighTexture => "high_texture",
        }
    }

    /// Short instruction the capture UI can show for this rejection.
    pub const fn user_hint(self) -> &'static str {
        match self {
            Self::TooDim => "Patch too dark. Add light or move the card closer to the light.",
            Self::Overexposed => "Patch too bright. Reduce light or tilt the card away from glare.",
            Self::NotNeutral => "Patch is not neutral. Aim at a white or gray surface.",
            Self::HighTexture => "Patch is textured or glaring. Use a flat, matte area.",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color channel, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red
    Red,
    /// Green
    Green,
    /// Blue
    Blue,
}

impl Channel {
    /// Channels in R, G, B order.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        })
    }
}

/// Calibration engine error.
///
/// Every variant is a per-call, recoverable outcome. Rejections and
/// "not found" are expected during normal use; the caller re-samples.
#[derive(Debug, Error)]
pub enum CalibError {
    /// Region or buffer problem (empty region, bad stride, ...).
    #[error(transparent)]
    Core(#[from] greycard_core::Error),

    /// The sampled patch failed validation.
    #[error("patch rejected: {reason}")]
    PatchRejected {
        /// First failing check.
        reason: Rejection,
    },

    /// Auto-search found no acceptable window.
    #[error("no neutral patch found in {windows} candidate windows")]
    NoPatchFound {
        /// Number of windows examined.
        windows: usize,
    },

    /// A channel mean is too small to divide by.
    ///
    /// An accepted patch should never get here; seeing it points at
    /// acceptance thresholds that let a near-black channel through.
    #[error("degenerate gain: {channel} mean {mean} below floor {floor}")]
    DegenerateGain {
        /// Offending channel.
        channel: Channel,
        /// Its mean.
        mean: f32,
        /// Minimum usable mean.
        floor: f32,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// YAML configuration failed to parse.
    #[error("config parse error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// I/O error reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalibError {
    /// Rejection to surface to the user, if this error is patch-related.
    ///
    /// A degenerate gain is reported to the user as [`Rejection::TooDim`].
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::PatchRejected { reason } => Some(*reason),
            Self::DegenerateGain { .. } => Some(Rejection::TooDim),
            _ => None,
        }
    }

    /// Returns `true` if re-sampling the scene may succeed.
    pub fn is_resample(&self) -> bool {
        matches!(
            self,
            Self::PatchRejected { .. } | Self::NoPatchFound { .. } | Self::DegenerateGain { .. }
        )
    }
}

impl From<Rejection> for CalibError {
    fn from(reason: Rejection) -> Self {
        Self::PatchRejected { reason }
    }
}

/// Result type for calibration operations.
pub type CalibResult<T> = Result<T, CalibError>;
