//! Hands-free neutral patch search.
//!
//! The frame is box-averaged into a small [`LinearGrid`] (40x40 by default)
//! so the search cost does not depend on the capture resolution. A square
//! window slides over the grid with a fixed stride; each window's statistics
//! go through the validator, and among accepted windows the one with the
//! highest `luminance - sum(variances)` wins.
//!
//! Scan order is row-major, top to bottom then left to right. Comparison is
//! strict, so the first window in scan order wins ties.
//!
//! # Example
//!
//! ```rust
//! use greycard_calib::locate::{locate_in_grid, LinearGrid, LocatorParams};
//! use greycard_calib::PatchThresholds;
//! use greycard_math::Vec3;
//!
//! let mut grid = LinearGrid::filled(40, 40, Vec3::ZERO);
//! for y in 18..24 {
//!     for x in 18..24 {
//!         grid.set(x, y, Vec3::splat(0.7));
//!     }
//! }
//! let found = locate_in_grid(&grid, &LocatorParams::default(), &PatchThresholds::default()).unwrap();
//! assert_eq!((found.cell.x, found.cell.y), (18, 18));
//! ```

use crate::validate::{validate, PatchThresholds, Verdict};
use crate::{CalibError, CalibResult, PatchStats};
use greycard_core::{PixelBuffer, Rect};
use greycard_math::Vec3;
use greycard_transfer::decode_rgb;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Search geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorParams {
    /// Grid side the frame is downsampled to.
    pub grid: u32,
    /// Window side, in grid cells.
    pub window: u32,
    /// Window step, in grid cells.
    pub stride: u32,
}

impl Default for LocatorParams {
    fn default() -> Self {
        Self {
            grid: 40,
            window: 6,
            stride: 3,
        }
    }
}

impl LocatorParams {
    /// Checks `1 <= window <= grid` and `stride >= 1`.
    pub fn validate(&self) -> CalibResult<()> {
        if self.grid == 0 || self.window == 0 || self.stride == 0 {
            return Err(CalibError::InvalidParameter(format!(
                "locator grid, window and stride must be positive: {:?}",
                self
            )));
        }
        if self.window > self.grid {
            return Err(CalibError::InvalidParameter(format!(
                "locator window {} larger than grid {}",
                self.window, self.grid
            )));
        }
        Ok(())
    }
}

/// Downsampled linear-light frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGrid {
    cells: Vec<Vec3>,
    width: u32,
    height: u32,
}

impl LinearGrid {
    /// Grid with every cell set to `value`.
    pub fn filled(width: u32, height: u32, value: Vec3) -> Self {
        Self {
            cells: vec![value; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Wraps row-major cells.
    ///
    /// # Errors
    ///
    /// [`greycard_core::Error::InvalidDimensions`] on a length mismatch or empty grid.
    pub fn from_cells(width: u32, height: u32, cells: Vec<Vec3>) -> CalibResult<Self> {
        if width == 0 || height == 0 || cells.len() != width as usize * height as usize {
            return Err(greycard_core::Error::invalid_dimensions(
                width,
                height,
                format!("grid needs {} cells, got {}", width as usize * height as usize, cells.len()),
            )
            .into());
        }
        Ok(Self { cells, width, height })
    }

    /// Box-averages the decoded frame into `size x size` cells.
    ///
    /// When the frame is smaller than the grid on an axis, cells on that axis
    /// repeat the nearest pixel.
    ///
    /// # Errors
    ///
    /// [`greycard_core::Error::InvalidDimensions`] for an empty frame or zero size.
    pub fn from_frame(frame: &PixelBuffer, size: u32) -> CalibResult<Self> {
        let (w, h) = frame.dimensions();
        if frame.is_empty() || size == 0 {
            return Err(greycard_core::Error::invalid_dimensions(
                w,
                h,
                format!("cannot build a {size}x{size} grid"),
            )
            .into());
        }
        trace!(w, h, size, "LinearGrid::from_frame");

        let span = |i: u32, extent: u32| {
            let lo = (i as u64 * extent as u64 / size as u64) as u32;
            let hi = ((i as u64 + 1) * extent as u64 / size as u64) as u32;
            (lo, hi.max(lo + 1).min(extent))
        };

        let mut cells = Vec::with_capacity(size as usize * size as usize);
        for gy in 0..size {
            let (y0, y1) = span(gy, h);
            for gx in 0..size {
                let (x0, x1) = span(gx, w);
                let cell = Rect::new(x0, y0, x1 - x0, y1 - y0);
                let mut sum = [0.0f64; 3];
                for px in frame.region_pixels(cell) {
                    let rgb = decode_rgb(px);
                    for c in 0..3 {
                        sum[c] += rgb[c] as f64;
                    }
                }
                let n = cell.area() as f64;
                cells.push(Vec3::new(
                    (sum[0] / n) as f32,
                    (sum[1] / n) as f32,
                    (sum[2] / n) as f32,
                ));
            }
        }
        Ok(Self {
            cells,
            width: size,
            height: size,
        })
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cell value.
    ///
    /// # Panics
    ///
    /// Panics if out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        self.cells[self.index(x, y)]
    }

    /// Sets a cell value.
    ///
    /// # Panics
    ///
    /// Panics if out of bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: Vec3) {
        let i = self.index(x, y);
        self.cells[i] = value;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) out of bounds");
        y as usize * self.width as usize + x as usize
    }

    /// Statistics (with variance) over a window of cells.
    fn window_stats(&self, window: Rect) -> Option<PatchStats> {
        PatchStats::from_samples(window.iter_coords().map(|(x, y)| self.get(x, y)), true)
    }
}

/// Best window found by the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatedPatch {
    /// Statistics of the winning window.
    pub stats: PatchStats,
    /// Winning window, in grid cells.
    pub cell: Rect,
    /// `luminance - sum(variances)`.
    pub score: f32,
    /// Width of the searched grid.
    pub grid_width: u32,
    /// Height of the searched grid.
    pub grid_height: u32,
}

impl LocatedPatch {
    /// Maps the winning window back to a pixel rectangle of a `width x height` frame.
    ///
    /// # Errors
    ///
    /// [`greycard_core::Error::InvalidRegion`] if the mapped rectangle is empty.
    pub fn frame_region(&self, width: u32, height: u32) -> CalibResult<Rect> {
        let map = |v: u32, extent: u32, cells: u32| (v as u64 * extent as u64 / cells as u64) as u32;
        let x0 = map(self.cell.x, width, self.grid_width);
        let y0 = map(self.cell.y, height, self.grid_height);
        let x1 = map(self.cell.right(), width, self.grid_width).max(x0 + 1);
        let y1 = map(self.cell.bottom(), height, self.grid_height).max(y0 + 1);
        Ok(Rect::new(x0, y0, x1 - x0, y1 - y0).resolve(width, height)?)
    }
}

/// Searches a prepared grid.
///
/// # Errors
///
/// - [`CalibError::InvalidParameter`] for bad [`LocatorParams`] or a window
///   larger than the grid
/// - [`CalibError::NoPatchFound`] if no window validates
pub fn locate_in_grid(
    grid: &LinearGrid,
    params: &LocatorParams,
    thresholds: &PatchThresholds,
) -> CalibResult<LocatedPatch> {
    if params.window == 0 || params.stride == 0 {
        return Err(CalibError::InvalidParameter(format!(
            "locator window and stride must be positive: {:?}",
            params
        )));
    }
    if params.window > grid.width || params.window > grid.height {
        return Err(CalibError::InvalidParameter(format!(
            "window {} does not fit a {}x{} grid",
            params.window, grid.width, grid.height
        )));
    }

    let mut best: Option<LocatedPatch> = None;
    let mut windows = 0usize;
    let mut accepted = 0usize;

    for y in (0..=grid.height - params.window).step_by(params.stride as usize) {
        for x in (0..=grid.width - params.window).step_by(params.stride as usize) {
            windows += 1;
            let cell = Rect::square(x, y, params.window);
            let Some(stats) = grid.window_stats(cell) else {
                continue;
            };
            if validate(&stats, thresholds) != Verdict::Accepted {
                continue;
            }
            accepted += 1;
            let score = stats.luminance() - stats.variance_sum();
            if best.is_none_or(|b| score > b.score) {
                best = Some(LocatedPatch {
                    stats,
                    cell,
                    score,
                    grid_width: grid.width,
                    grid_height: grid.height,
                });
            }
        }
    }

    match best {
        Some(found) => {
            debug!(
                x = found.cell.x,
                y = found.cell.y,
                score = found.score,
                windows,
                accepted,
                "patch located"
            );
            Ok(found)
        }
        None => {
            debug!(windows, "no acceptable window");
            Err(CalibError::NoPatchFound { windows })
        }
    }
}

/// Downsamples `frame` and searches it.
///
/// # Errors
///
/// See [`locate_in_grid`] and [`LinearGrid::from_frame`].
pub fn locate(
    frame: &PixelBuffer,
    params: &LocatorParams,
    thresholds: &PatchThresholds,
) -> CalibResult<LocatedPatch> {
    params.validate()?;
    let grid = LinearGrid::from_frame(frame, params.grid)?;
    locate_in_grid(&grid, params, thresholds)
}
