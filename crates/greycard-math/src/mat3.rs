//! 3x3 color correction matrix.
//!
//! Rows are output channels: `out.r = row0 · (r, g, b)` and so on. A
//! matrix whose rows each sum to 1 leaves neutral grays where they were.

use crate::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Row-major 3x3 matrix applied to linear RGB column vectors.
///
/// Serializes as three rows, so a YAML config reads
///
/// ```yaml
/// matrix:
///   - [1.10, -0.07, -0.03]
///   - [-0.05, 1.08, -0.03]
///   - [-0.02, -0.08, 1.10]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mat3 {
    /// `m[row][column]`
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    /// Leaves every triple unchanged.
    pub const IDENTITY: Self = Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// Matrix from its rows.
    #[inline]
    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// `self * v`.
    #[inline]
    pub fn transform(&self, v: Vec3) -> Vec3 {
        let [r0, r1, r2] = self.m;
        let dot = |row: [f32; 3]| row[0] * v.x + row[1] * v.y + row[2] * v.z;
        Vec3::new(dot(r0), dot(r1), dot(r2))
    }

    /// Largest `|row sum - 1|`; zero when grays map onto themselves.
    pub fn max_row_sum_error(&self) -> f32 {
        self.m
            .iter()
            .map(|row| (row.iter().sum::<f32>() - 1.0).abs())
            .fold(0.0, f32::max)
    }

    /// `false` if any entry is NaN or infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|x| x.is_finite())
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform(rhs)
    }
}
