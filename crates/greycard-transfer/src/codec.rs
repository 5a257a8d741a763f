//! 8-bit colorimetric codec.
//!
//! [`decode`] maps an encoded byte to linear light through a 256-entry
//! table built once from [`srgb::eotf`]. [`encode`] runs [`srgb::oetf`],
//! scales to [0, 255] and rounds.
//!
//! `encode` is total: values above 1 saturate to 255, values below 0 and
//! NaN saturate to 0, and `+inf` maps to 255. Nothing non-finite ever
//! reaches an output byte.

use crate::srgb;
use std::sync::LazyLock;

static DECODE_TABLE: LazyLock<[f32; 256]> = LazyLock::new(|| {
    let mut table = [0.0f32; 256];
    for (i, v) in table.iter_mut().enumerate() {
        *v = srgb::eotf(i as f32 / 255.0);
    }
    table
});

/// Decodes an 8-bit encoded channel value to linear light in [0, 1].
///
/// ```rust
/// use greycard_transfer::decode;
///
/// assert_eq!(decode(0), 0.0);
/// assert!((decode(255) - 1.0).abs() < 1e-6);
/// ```
#[inline]
pub fn decode(v: u8) -> f32 {
    DECODE_TABLE[v as usize]
}

/// Encodes linear light to an 8-bit channel value, saturating.
///
/// ```rust
/// use greycard_transfer::encode;
///
/// assert_eq!(encode(-0.3), 0);
/// assert_eq!(encode(1.0), 255);
/// assert_eq!(encode(f32::INFINITY), 255);
/// ```
#[inline]
pub fn encode(linear: f32) -> u8 {
    if linear.is_nan() {
        return 0;
    }
    let l = linear.clamp(0.0, 1.0);
    (srgb::oetf(l) * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Decodes the R, G, B channels of an RGBA pixel; alpha is ignored.
#[inline]
pub fn decode_rgb(px: [u8; 4]) -> [f32; 3] {
    [decode(px[0]), decode(px[1]), decode(px[2])]
}

/// Encodes a linear triple to three 8-bit channels.
#[inline]
pub fn encode_rgb(rgb: [f32; 3]) -> [u8; 3] {
    [encode(rgb[0]), encode(rgb[1]), encode(rgb[2])]
}
