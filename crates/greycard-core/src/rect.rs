//! Rectangle types for patch sampling and cropping.
//!
//! - [`Rect`] - pixel rectangle with origin and dimensions
//! - [`FracRect`] - rectangle in fractions of the frame size, resolved to a
//!   [`Rect`] against concrete dimensions
//!
//! # Coordinate System
//!
//! Origin (0, 0) is the top-left corner, X grows right, Y grows down.
//!
//! # Clamping
//!
//! Every rectangle handed to a buffer operation goes through
//! [`Rect::resolve`] first. After resolution `x + width <= W`,
//! `y + height <= H`, and both dimensions are at least one pixel; anything
//! that would violate that is an [`Error::InvalidRegion`].
//!
//! ```rust
//! use greycard_core::Rect;
//!
//! let patch = Rect::square(90, 40, 20);
//! let clamped = patch.resolve(100, 50).unwrap();
//! assert_eq!(clamped, Rect::new(90, 40, 10, 10));
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// # Example
///
/// ```rust
/// use greycard_core::Rect;
///
/// let rect = Rect::new(10, 20, 100, 50);
/// assert_eq!(rect.right(), 110);
/// assert_eq!(rect.bottom(), 70);
/// assert_eq!(rect.area(), 5000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: u32,
    /// Y coordinate of the top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from origin (0, 0) with given dimensions.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Creates a square patch region `(x, y, size)`.
    #[inline]
    pub const fn square(x: u32, y: u32, size: u32) -> Self {
        Self::new(x, y, size, size)
    }

    /// Square of `round(fraction * min(width, height))` pixels centered in
    /// a `width x height` frame.
    ///
    /// This is the default manual sample box. The side is at least one pixel
    /// and never larger than the shorter frame side.
    ///
    /// # Example
    ///
    /// ```rust
    /// use greycard_core::Rect;
    ///
    /// let r = Rect::centered_square(640, 480, 0.12);
    /// assert_eq!(r.width, 58);
    /// assert_eq!(r.x, (640 - 58) / 2);
    /// ```
    pub fn centered_square(width: u32, height: u32, fraction: f32) -> Self {
        let short = width.min(height);
        let size = ((fraction.clamp(0.0, 1.0) * short as f32).round() as u32)
            .max(1)
            .min(short.max(1));
        Self::square(
            width.saturating_sub(size) / 2,
            height.saturating_sub(size) / 2,
            size,
        )
    }

    /// Returns the X coordinate of the right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Returns the Y coordinate of the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Returns the area of the rectangle in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Returns `true` if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if this rectangle fully contains another.
    #[inline]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns the intersection of this rectangle with another.
    ///
    /// Returns `None` if the rectangles don't overlap.
    ///
    /// # Example
    ///
    /// ```rust
    /// use greycard_core::Rect;
    ///
    /// let a = Rect::new(0, 0, 100, 100);
    /// let b = Rect::new(50, 50, 100, 100);
    /// assert_eq!(a.intersect(&b), Some(Rect::new(50, 50, 50, 50)));
    /// ```
    #[inline]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Clamps this rectangle to `width x height`, or `None` if nothing remains.
    #[inline]
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Rect> {
        self.intersect(&Rect::from_size(width, height))
    }

    /// Clamps to `width x height` and fails on an empty result.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegion`] if the rectangle has zero area or doesn't
    /// overlap the buffer at all.
    pub fn resolve(&self, width: u32, height: u32) -> Result<Rect> {
        if self.is_empty() {
            return Err(self.region_error(width, height));
        }
        self.clamp_to(width, height)
            .ok_or_else(|| self.region_error(width, height))
    }

    fn region_error(&self, width: u32, height: u32) -> Error {
        Error::invalid_region(self.x, self.y, self.width, self.height, width, height)
    }

    /// Returns an iterator over all (x, y) coordinates in this rectangle.
    ///
    /// Row-major: left to right, top to bottom.
    #[inline]
    pub fn iter_coords(self) -> impl Iterator<Item = (u32, u32)> {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| (x, y)))
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Rectangle expressed as fractions of the frame size.
///
/// The capture flow keeps a fixed region of interest (e.g. the face box)
/// defined by fractional offsets; [`FracRect::to_rect`] resolves it against
/// real dimensions.
///
/// # Example
///
/// ```rust
/// use greycard_core::FracRect;
///
/// let roi = FracRect::new(0.10, 0.12, 0.80, 0.64);
/// let r = roi.to_rect(1280, 720).unwrap();
/// assert_eq!((r.x, r.y, r.width, r.height), (128, 86, 1024, 461));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FracRect {
    /// Left edge as a fraction of width
    pub x: f32,
    /// Top edge as a fraction of height
    pub y: f32,
    /// Width as a fraction of frame width
    pub w: f32,
    /// Height as a fraction of frame height
    pub h: f32,
}

impl FracRect {
    /// The full frame.
    pub const FULL: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Creates a fractional rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns `true` if all fields are finite and within [0, 1].
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.w, self.h]
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v))
    }

    /// Resolves to a pixel rectangle clamped to `width x height`.
    ///
    /// Origins are floored, sizes are rounded.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegion`] when fractions are out of range or the
    /// resolved rectangle is empty.
    pub fn to_rect(&self, width: u32, height: u32) -> Result<Rect> {
        let x = (self.x.clamp(0.0, 1.0) * width as f32).floor() as u32;
        let y = (self.y.clamp(0.0, 1.0) * height as f32).floor() as u32;
        let w = (self.w.clamp(0.0, 1.0) * width as f32).round() as u32;
        let h = (self.h.clamp(0.0, 1.0) * height as f32).round() as u32;
        let rect = Rect::new(x, y, w, h);
        if !self.is_valid() {
            return Err(Error::invalid_region(x, y, w, h, width, height));
        }
        rect.resolve(width, height)
    }
}

impl Default for FracRect {
    fn default() -> Self {
        Self::FULL
    }
}
