//! RGBA8 pixel buffer.
//!
//! [`PixelBuffer`] is the only raster type the engine consumes and produces:
//! width x height pixels, four interleaved 8-bit channels `[R G B A]`,
//! row-major, top-to-bottom.
//!
//! # Memory Layout
//!
//! ```text
//! Memory: [R G B A R G B A ... (padding)]  <- Row 0, `stride` bytes
//!         [R G B A R G B A ... (padding)]  <- Row 1
//!         ...
//! ```
//!
//! Inputs may carry row padding (camera frame grabs often do), so the stride
//! is explicit. Every buffer the engine allocates is packed
//! (`stride == width * 4`).
//!
//! # Usage
//!
//! ```rust
//! use greycard_core::{PixelBuffer, Rect};
//!
//! let frame = PixelBuffer::filled(64, 48, [180, 180, 180, 255]);
//! let roi = frame.crop(Rect::new(8, 8, 16, 16)).unwrap();
//! assert_eq!(roi.dimensions(), (16, 16));
//! assert_eq!(roi.pixel(0, 0), [180, 180, 180, 255]);
//! ```

use crate::pixel::CHANNELS;
use crate::{Error, Rect, Result};

/// Owned RGBA8 raster with explicit row stride.
///
/// Inputs are never mutated by the engine; every operation that changes
/// pixels returns a freshly allocated buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    /// Bytes per row (may include padding)
    stride: usize,
}

impl PixelBuffer {
    /// Creates a packed buffer filled with zeros.
    ///
    /// # Example
    ///
    /// ```rust
    /// use greycard_core::PixelBuffer;
    ///
    /// let img = PixelBuffer::new(1920, 1080);
    /// assert_eq!(img.width(), 1920);
    /// assert_eq!(img.stride(), 1920 * 4);
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        let stride = width as usize * CHANNELS;
        Self {
            data: vec![0; stride * height as usize],
            width,
            height,
            stride,
        }
    }

    /// Creates a packed buffer from existing RGBA data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the length isn't
    /// `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::from_raw(width, height, width as usize * CHANNELS, data)
    }

    /// Creates a buffer from raw RGBA rows with an explicit stride.
    ///
    /// The last row may omit its trailing padding.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidStride`] if `stride < width * 4`
    /// - [`Error::InvalidDimensions`] if `data` is too short for
    ///   `height` rows, or too long to be a `stride`-padded raster
    ///
    /// # Example
    ///
    /// ```rust
    /// use greycard_core::PixelBuffer;
    ///
    /// // 2x2 image with 4 bytes of padding per row
    /// let data = vec![
    ///     1, 1, 1, 255, 2, 2, 2, 255, 0, 0, 0, 0,
    ///     3, 3, 3, 255, 4, 4, 4, 255, 0, 0, 0, 0,
    /// ];
    /// let img = PixelBuffer::from_raw(2, 2, 12, data).unwrap();
    /// assert_eq!(img.pixel(1, 1), [4, 4, 4, 255]);
    /// ```
    pub fn from_raw(width: u32, height: u32, stride: usize, data: Vec<u8>) -> Result<Self> {
        let row_bytes = width as usize * CHANNELS;
        if stride < row_bytes {
            return Err(Error::InvalidStride {
                stride,
                min_stride: row_bytes,
                width,
            });
        }
        let min_len = match height {
            0 => 0,
            h => stride * (h as usize - 1) + row_bytes,
        };
        let max_len = stride * height as usize;
        if data.len() < min_len || data.len() > max_len {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!(
                    "expected {}..={} bytes for stride {}, got {}",
                    min_len,
                    max_len,
                    stride,
                    data.len()
                ),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Creates a packed buffer with every pixel set to `pixel`.
    pub fn filled(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data,
            width,
            height,
            stride: width as usize * CHANNELS,
        }
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the stride (bytes per row).
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns `true` if rows carry no padding.
    #[inline]
    pub fn is_packed(&self) -> bool {
        self.stride == self.width as usize * CHANNELS
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns a rectangle covering the entire image.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the raw bytes, including any row padding.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the raw bytes mutably, including any row padding.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride + x as usize * CHANNELS
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.pixel_offset(x, y);
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[offset..offset + CHANNELS]);
        px
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [u8; 4]) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.pixel_offset(x, y);
        self.data[offset..offset + CHANNELS].copy_from_slice(&pixel);
    }

    /// Returns row `y` without padding (`width * 4` bytes).
    ///
    /// # Panics
    ///
    /// Panics if y >= height.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * CHANNELS]
    }

    /// Iterates over rows without padding.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }

    /// Iterates over the pixels of `region` in row-major order.
    ///
    /// The region must already be resolved against this buffer.
    pub fn region_pixels(&self, region: Rect) -> impl Iterator<Item = [u8; 4]> + '_ {
        debug_assert!(self.bounds().contains_rect(&region), "unresolved region");
        region.iter_coords().map(move |(x, y)| self.pixel(x, y))
    }

    /// Copies `region` (clamped to bounds) into a new packed buffer.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegion`] if the clamped region is empty.
    pub fn crop(&self, region: Rect) -> Result<Self> {
        let r = region.resolve(self.width, self.height)?;
        let row_bytes = r.width as usize * CHANNELS;
        let mut data = Vec::with_capacity(row_bytes * r.height as usize);
        for y in r.y..r.bottom() {
            let start = self.pixel_offset(r.x, y);
            data.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        Ok(Self {
            data,
            width: r.width,
            height: r.height,
            stride: row_bytes,
        })
    }

    /// Returns a packed copy (no-op clone when already packed).
    pub fn to_packed(&self) -> Self {
        if self.is_packed() {
            return self.clone();
        }
        let mut data = Vec::with_capacity(self.pixel_count() * CHANNELS);
        for row in self.rows() {
            data.extend_from_slice(row);
        }
        Self {
            data,
            width: self.width,
            height: self.height,
            stride: self.width as usize * CHANNELS,
        }
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_new() {
        let img = PixelBuffer::new(10, 5);
        assert_eq!(img.dimensions(), (10, 5));
        assert_eq!(img.pixel_count(), 50);
        assert_eq!(img.data().len(), 200);
        assert!(img.is_packed());
    }

    #[test]
    fn test_buffer_set_pixel() {
        let mut img = PixelBuffer::new(10, 10);
        img.set_pixel(5, 5, [255, 0, 0, 255]);
        assert_eq!(img.pixel(5, 5), [255, 0, 0, 255]);
        assert_eq!(img.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_from_rgba_wrong_size() {
        assert!(PixelBuffer::from_rgba(10, 10, vec![0; 100]).is_err());
    }

    #[test]
    fn test_from_raw_short_stride() {
        let err = PixelBuffer::from_raw(4, 1, 8, vec![0; 16]).unwrap_err();
        assert!(matches!(err, Error::InvalidStride { min_stride: 16, .. }));
    }

    #[test]
    fn test_from_raw_padded_rows() {
        // Last row without trailing padding is accepted
        let mut data = vec![0u8; 12 + 8];
        data[12..16].copy_from_slice(&[9, 8, 7, 6]);
        let img = PixelBuffer::from_raw(2, 2, 12, data).unwrap();
        assert_eq!(img.pixel(0, 1), [9, 8, 7, 6]);
        assert_eq!(img.row(1).len(), 8);
        assert!(!img.is_packed());

        let packed = img.to_packed();
        assert!(packed.is_packed());
        assert_eq!(packed.pixel(0, 1), [9, 8, 7, 6]);
    }

    #[test]
    fn test_crop() {
        let mut img = PixelBuffer::filled(20, 20, [10, 20, 30, 255]);
        img.set_pixel(5, 6, [1, 2, 3, 4]);
        let c = img.crop(Rect::new(5, 6, 4, 3)).unwrap();
        assert_eq!(c.dimensions(), (4, 3));
        assert_eq!(c.pixel(0, 0), [1, 2, 3, 4]);
        assert_eq!(c.pixel(3, 2), [10, 20, 30, 255]);
    }

    #[test]
    fn test_crop_clamps_and_fails() {
        let img = PixelBuffer::filled(20, 20, [0, 0, 0, 255]);
        let c = img.crop(Rect::new(15, 15, 10, 10)).unwrap();
        assert_eq!(c.dimensions(), (5, 5));
        assert!(img.crop(Rect::new(30, 0, 5, 5)).is_err());
    }

    #[test]
    fn test_region_pixels_count() {
        let img = PixelBuffer::filled(8, 8, [1, 1, 1, 1]);
        assert_eq!(img.region_pixels(Rect::new(2, 2, 3, 4)).count(), 12);
    }
}
