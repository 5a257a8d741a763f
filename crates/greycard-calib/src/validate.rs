//! Patch validation.
//!
//! Decision sequence, first match wins:
//!
//! 1. Luminance of the means below `min_luminance` -> [`Rejection::TooDim`],
//!    above `max_luminance` -> [`Rejection::Overexposed`]
//! 2. `|r-g| + |g-b| + |b-r|` above `max_chroma` -> [`Rejection::NotNeutral`]
//! 3. Average channel variance above `max_variance` -> [`Rejection::HighTexture`]
//!    (only when variances were measured)
//! 4. Accept
//!
//! Exposure is checked before neutrality so a patch that is both too bright
//! and tinted is reported as overexposed, the fix the user can act on first.
//! Values exactly on a threshold are accepted.

use crate::{CalibError, CalibResult, PatchStats, Rejection};
use serde::{Deserialize, Serialize};

/// Default lower luminance bound (linear).
pub const DEFAULT_MIN_LUMINANCE: f32 = 0.60;
/// Default upper luminance bound (linear).
pub const DEFAULT_MAX_LUMINANCE: f32 = 0.80;
/// Default neutrality threshold.
pub const DEFAULT_MAX_CHROMA: f32 = 0.06;
/// Default texture/glare threshold on the average channel variance.
pub const DEFAULT_MAX_VARIANCE: f32 = 0.015;

/// Acceptance thresholds for a neutral reference patch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchThresholds {
    /// Lowest acceptable luminance of the means.
    pub min_luminance: f32,
    /// Highest acceptable luminance of the means.
    pub max_luminance: f32,
    /// Highest acceptable channel spread.
    pub max_chroma: f32,
    /// Highest acceptable average channel variance.
    pub max_variance: f32,
}

impl Default for PatchThresholds {
    fn default() -> Self {
        Self {
            min_luminance: DEFAULT_MIN_LUMINANCE,
            max_luminance: DEFAULT_MAX_LUMINANCE,
            max_chroma: DEFAULT_MAX_CHROMA,
            max_variance: DEFAULT_MAX_VARIANCE,
        }
    }
}

impl PatchThresholds {
    /// Checks that the band is ordered and every threshold is finite and positive.
    pub fn validate(&self) -> CalibResult<()> {
        let all = [
            self.min_luminance,
            self.max_luminance,
            self.max_chroma,
            self.max_variance,
        ];
        if all.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(CalibError::InvalidParameter(format!(
                "patch thresholds must be finite and non-negative: {:?}",
                self
            )));
        }
        if self.min_luminance >= self.max_luminance {
            return Err(CalibError::InvalidParameter(format!(
                "luminance band is empty: [{}, {}]",
                self.min_luminance, self.max_luminance
            )));
        }
        Ok(())
    }
}

/// Outcome of validating one patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Patch is a usable neutral reference.
    Accepted,
    /// Patch failed the given check.
    Rejected(Rejection),
}

impl Verdict {
    /// Returns `true` for [`Verdict::Accepted`].
    #[inline]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Converts to a result, mapping a rejection to [`CalibError::PatchRejected`].
    pub fn into_result(self) -> CalibResult<()> {
        match self {
            Self::Accepted => Ok(()),
            Self::Rejected(reason) => Err(CalibError::PatchRejected { reason }),
        }
    }
}

/// Classifies patch statistics against `thresholds`.
///
/// # Example
///
/// ```rust
/// use greycard_calib::validate::{validate, PatchThresholds};
/// use greycard_calib::{PatchStats, Rejection, Verdict};
/// use greycard_math::Vec3;
///
/// let t = PatchThresholds::default();
/// let dark = PatchStats { mean: Vec3::splat(0.2), variance: None, count: 1 };
/// assert_eq!(validate(&dark, &t), Verdict::Rejected(Rejection::TooDim));
/// ```
pub fn validate(stats: &PatchStats, thresholds: &PatchThresholds) -> Verdict {
    let l = stats.luminance();
    // NaN luminance fails the band check as too dim
    if l.is_nan() || l < thresholds.min_luminance {
        return Verdict::Rejected(Rejection::TooDim);
    }
    if l > thresholds.max_luminance {
        return Verdict::Rejected(Rejection::Overexposed);
    }
    if stats.chroma() > thresholds.max_chroma {
        return Verdict::Rejected(Rejection::NotNeutral);
    }
    if stats.variance.is_some() && stats.mean_variance() > thresholds.max_variance {
        return Verdict::Rejected(Rejection::HighTexture);
    }
    Verdict::Accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use greycard_math::Vec3;

    fn stats(mean: Vec3, var: f32) -> PatchStats {
        PatchStats {
            mean,
            variance: Some(Vec3::splat(var)),
            count: 36,
        }
    }

    const EPS: f32 = 1e-4;

    #[test]
    fn test_accepts_neutral_patch() {
        let t = PatchThresholds::default();
        assert_eq!(validate(&stats(Vec3::splat(0.7), 0.001), &t), Verdict::Accepted);
    }

    #[test]
    fn test_luminance_low_boundary() {
        let t = PatchThresholds::default();
        let at = validate(&stats(Vec3::splat(t.min_luminance), 0.0), &t);
        let below = validate(&stats(Vec3::splat(t.min_luminance - EPS), 0.0), &t);
        let above = validate(&stats(Vec3::splat(t.min_luminance + EPS), 0.0), &t);
        assert_eq!(at, Verdict::Accepted);
        assert_eq!(below, Verdict::Rejected(Rejection::TooDim));
        assert_eq!(above, Verdict::Accepted);
    }

    #[test]
    fn test_luminance_high_boundary() {
        let t = PatchThresholds::default();
        let at = validate(&stats(Vec3::splat(t.max_luminance), 0.0), &t);
        let below = validate(&stats(Vec3::splat(t.max_luminance - EPS), 0.0), &t);
        let above = validate(&stats(Vec3::splat(t.max_luminance + EPS), 0.0), &t);
        assert_eq!(at, Verdict::Accepted);
        assert_eq!(below, Verdict::Accepted);
        assert_eq!(above, Verdict::Rejected(Rejection::Overexposed));
    }

    #[test]
    fn test_chroma_boundary() {
        let t = PatchThresholds::default();
        // Spread d between r and b gives chroma 2d; keep luminance mid-band
        let patch = |chroma: f32| {
            let d = chroma / 2.0;
            stats(Vec3::new(0.7 + d / 2.0, 0.7, 0.7 - d / 2.0), 0.0)
        };
        assert_eq!(validate(&patch(t.max_chroma - EPS), &t), Verdict::Accepted);
        assert_eq!(
            validate(&patch(t.max_chroma + EPS), &t),
            Verdict::Rejected(Rejection::NotNeutral)
        );
    }

    #[test]
    fn test_variance_boundary() {
        let t = PatchThresholds::default();
        let m = Vec3::splat(0.7);
        assert_eq!(validate(&stats(m, t.max_variance - EPS), &t), Verdict::Accepted);
        assert_eq!(
            validate(&stats(m, t.max_variance + EPS), &t),
            Verdict::Rejected(Rejection::HighTexture)
        );
    }

    #[test]
    fn test_variance_skipped_without_measurement() {
        let t = PatchThresholds::default();
        let s = PatchStats {
            mean: Vec3::splat(0.7),
            variance: None,
            count: 1,
        };
        assert_eq!(validate(&s, &t), Verdict::Accepted);
    }

    #[test]
    fn test_overexposed_reported_before_not_neutral() {
        let t = PatchThresholds::default();
        let s = stats(Vec3::new(1.0, 0.9, 0.6), 0.0);
        assert_eq!(validate(&s, &t), Verdict::Rejected(Rejection::Overexposed));
    }

    #[test]
    fn test_not_neutral_reported_before_texture() {
        let t = PatchThresholds::default();
        let s = stats(Vec3::new(0.8, 0.7, 0.5), 0.5);
        assert_eq!(validate(&s, &t), Verdict::Rejected(Rejection::NotNeutral));
    }

    #[test]
    fn test_thresholds_validate() {
        assert!(PatchThresholds::default().validate().is_ok());
        let bad = PatchThresholds {
            min_luminance: 0.9,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let nan = PatchThresholds {
            max_chroma: f32::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_verdict_into_result() {
        assert!(Verdict::Accepted.into_result().is_ok());
        let err = Verdict::Rejected(Rejection::NotNeutral).into_result().unwrap_err();
        assert_eq!(err.rejection(), Some(Rejection::NotNeutral));
    }
}
