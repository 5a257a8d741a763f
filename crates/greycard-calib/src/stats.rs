//! Patch statistics in linear light.
//!
//! Per-channel mean and population variance (divide by N) of decoded
//! channel values over a rectangular region. Alpha is ignored. Every pixel
//! of the region is visited exactly once.
//!
//! Sums are accumulated in `f64` so large patches don't lose precision.

use crate::CalibResult;
use greycard_core::{PixelBuffer, Rect};
use greycard_math::Vec3;
use greycard_transfer::decode_rgb;
use tracing::{debug, trace};

/// Linear-light statistics of a sampled patch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchStats {
    /// Per-channel linear mean.
    pub mean: Vec3,
    /// Per-channel population variance, if it was computed.
    pub variance: Option<Vec3>,
    /// Number of pixels sampled.
    pub count: usize,
}

impl PatchStats {
    /// Computes statistics from linear samples.
    ///
    /// Returns `None` for an empty sample set.
    ///
    /// # Example
    ///
    /// ```rust
    /// use greycard_calib::PatchStats;
    /// use greycard_math::Vec3;
    ///
    /// let s = PatchStats::from_samples([Vec3::splat(0.2), Vec3::splat(0.4)], true).unwrap();
    /// assert!((s.mean.x - 0.3).abs() < 1e-6);
    /// assert!((s.variance.unwrap().x - 0.01).abs() < 1e-6);
    /// ```
    pub fn from_samples<I>(samples: I, with_variance: bool) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut acc = Accumulator::default();
        for s in samples {
            acc.push(s);
        }
        acc.finish(with_variance)
    }

    /// Rec.709 luminance of the means.
    #[inline]
    pub fn luminance(&self) -> f32 {
        self.mean.luminance()
    }

    /// `|r-g| + |g-b| + |b-r|` over the means.
    #[inline]
    pub fn chroma(&self) -> f32 {
        let m = self.mean;
        (m.x - m.y).abs() + (m.y - m.z).abs() + (m.z - m.x).abs()
    }

    /// Average of the three channel variances (0 when not computed).
    #[inline]
    pub fn mean_variance(&self) -> f32 {
        self.variance.map_or(0.0, Vec3::mean)
    }

    /// Sum of the three channel variances (0 when not computed).
    #[inline]
    pub fn variance_sum(&self) -> f32 {
        self.variance.map_or(0.0, Vec3::sum)
    }
}

#[derive(Default)]
struct Accumulator {
    sum: [f64; 3],
    sum_sq: [f64; 3],
    count: usize,
}

impl Accumulator {
    #[inline]
    fn push(&mut self, v: Vec3) {
        for c in 0..3 {
            let x = v[c] as f64;
            self.sum[c] += x;
            self.sum_sq[c] += x * x;
        }
        self.count += 1;
    }

    fn finish(&self, with_variance: bool) -> Option<PatchStats> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let mean = self.sum.map(|s| s / n);
        let variance = with_variance.then(|| {
            let mut var = [0.0f32; 3];
            for c in 0..3 {
                // Population variance, clamped against cancellation
                var[c] = (self.sum_sq[c] / n - mean[c] * mean[c]).max(0.0) as f32;
            }
            Vec3::from_array(var)
        });
        Some(PatchStats {
            mean: Vec3::new(mean[0] as f32, mean[1] as f32, mean[2] as f32),
            variance,
            count: self.count,
        })
    }
}

fn sample_region(frame: &PixelBuffer, region: Rect, with_variance: bool) -> CalibResult<PatchStats> {
    let r = region.resolve(frame.width(), frame.height())?;
    trace!(x = r.x, y = r.y, w = r.width, h = r.height, with_variance, "sample_region");

    let mut acc = Accumulator::default();
    for px in frame.region_pixels(r) {
        acc.push(Vec3::from_array(decode_rgb(px)));
    }
    let stats = acc
        .finish(with_variance)
        .ok_or_else(|| greycard_core::Error::invalid_region(r.x, r.y, r.width, r.height, frame.width(), frame.height()))?;
    debug!(
        count = stats.count,
        mean = ?stats.mean.to_array(),
        variance = ?stats.variance.map(Vec3::to_array),
        "patch stats"
    );
    Ok(stats)
}

/// Linear means over `region` (clamped to the frame); variance is skipped.
///
/// # Errors
///
/// [`greycard_core::Error::InvalidRegion`] if the clamped region is empty.
pub fn measure_mean(frame: &PixelBuffer, region: Rect) -> CalibResult<PatchStats> {
    sample_region(frame, region, false)
}

/// Linear means and population variances over `region` (clamped to the frame).
///
/// # Errors
///
/// [`greycard_core::Error::InvalidRegion`] if the clamped region is empty.
pub fn measure(frame: &PixelBuffer, region: Rect) -> CalibResult<PatchStats> {
    sample_region(frame, region, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CalibError;
    use greycard_transfer::decode;

    #[test]
    fn test_uniform_patch() {
        let frame = PixelBuffer::filled(20, 20, [180, 180, 180, 255]);
        let s = measure(&frame, Rect::square(5, 5, 10)).unwrap();
        assert_eq!(s.count, 100);
        assert!((s.mean.x - decode(180)).abs() < 1e-6);
        assert!(s.variance.unwrap().max_element() < 1e-9);
        assert!(s.chroma() < 1e-6);
    }

    #[test]
    fn test_alpha_ignored() {
        let mut frame = PixelBuffer::filled(4, 4, [100, 100, 100, 255]);
        frame.set_pixel(0, 0, [100, 100, 100, 0]);
        let s = measure(&frame, frame.bounds()).unwrap();
        assert!(s.variance.unwrap().max_element() < 1e-9);
    }

    #[test]
    fn test_population_variance() {
        // Half 0, half 255 -> mean 0.5, population variance 0.25
        let mut frame = PixelBuffer::filled(2, 1, [0, 0, 0, 255]);
        frame.set_pixel(1, 0, [255, 255, 255, 255]);
        let s = measure(&frame, frame.bounds()).unwrap();
        assert!((s.mean.y - 0.5).abs() < 1e-6);
        assert!((s.variance.unwrap().y - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_mean_only_skips_variance() {
        let frame = PixelBuffer::filled(8, 8, [50, 60, 70, 255]);
        let s = measure_mean(&frame, frame.bounds()).unwrap();
        assert!(s.variance.is_none());
        assert_eq!(s.mean_variance(), 0.0);
    }

    #[test]
    fn test_region_is_clamped() {
        let frame = PixelBuffer::filled(10, 10, [50, 60, 70, 255]);
        let s = measure(&frame, Rect::square(8, 8, 6)).unwrap();
        assert_eq!(s.count, 4);
    }

    #[test]
    fn test_empty_region_fails() {
        let frame = PixelBuffer::filled(10, 10, [50, 60, 70, 255]);
        let err = measure(&frame, Rect::square(12, 0, 4)).unwrap_err();
        assert!(matches!(err, CalibError::Core(_)));
        assert!(PatchStats::from_samples(std::iter::empty(), true).is_none());
    }
}
