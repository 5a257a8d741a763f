//! Fixed color correction.
//!
//! The matrix is applied to gain-corrected linear RGB, one output channel per
//! row, with no normalization. Rows that sum to about 1 keep grays neutral.

use crate::{CalibError, CalibResult};
use greycard_math::{Mat3, Vec3};

/// Default correction matrix. Each row sums to 1.
pub const DEFAULT_CCM: Mat3 = Mat3::from_rows([
    [1.10, -0.07, -0.03],
    [-0.05, 1.08, -0.03],
    [-0.02, -0.08, 1.10],
]);

/// Applies `matrix` to a linear triple.
#[inline]
pub fn apply(matrix: &Mat3, rgb: Vec3) -> Vec3 {
    matrix.transform(rgb)
}

/// Rejects matrices with non-finite entries.
pub fn check(matrix: &Mat3) -> CalibResult<()> {
    if !matrix.is_finite() {
        return Err(CalibError::InvalidParameter(format!(
            "color matrix has non-finite entries: {:?}",
            matrix.m
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_keeps_gray_neutral() {
        assert!(DEFAULT_CCM.max_row_sum_error() < 1e-6);
        let gray = apply(&DEFAULT_CCM, Vec3::splat(0.4));
        assert_abs_diff_eq!(gray.x, 0.4, epsilon = 1e-5);
        assert_abs_diff_eq!(gray.y, 0.4, epsilon = 1e-5);
        assert_abs_diff_eq!(gray.z, 0.4, epsilon = 1e-5);
    }

    #[test]
    fn test_rows_map_to_channels() {
        let out = apply(&DEFAULT_CCM, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(out, Vec3::new(1.10, -0.05, -0.02));
    }

    #[test]
    fn test_check() {
        assert!(check(&DEFAULT_CCM).is_ok());
        let mut bad = Mat3::IDENTITY;
        bad.m[1][2] = f32::INFINITY;
        assert!(check(&bad).is_err());
    }
}
