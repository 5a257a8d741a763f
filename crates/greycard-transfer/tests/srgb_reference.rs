//! sRGB codec validation against reference values.
//!
//! Reference values computed in double precision from IEC 61966-2-1:
//!   V = byte / 255
//!   L = V / 12.92                      if V <= 0.04045
//!   L = ((V + 0.055) / 1.055)^2.4      otherwise

use greycard_transfer::{decode, encode, srgb};

/// (encoded byte, linear)
const DECODE_REFERENCE: &[(u8, f32)] = &[
    (0, 0.0),
    (10, 0.003_035_27),  // linear segment
    (64, 0.051_269_46),
    (128, 0.215_860_50),
    (180, 0.456_411_02), // mid-gray card
    (200, 0.577_580_44),
    (230, 0.791_297_94),
    (255, 1.0),
];

#[test]
fn test_decode_reference() {
    for &(byte, expected) in DECODE_REFERENCE {
        let got = decode(byte);
        assert!(
            (got - expected).abs() < 1e-5,
            "decode({}) = {}, expected {}",
            byte,
            got,
            expected
        );
    }
}

#[test]
fn test_encode_reference() {
    for &(byte, linear) in DECODE_REFERENCE {
        assert_eq!(encode(linear), byte, "encode({})", linear);
    }
}

#[test]
fn test_table_matches_eotf() {
    for v in 0..=255u8 {
        let direct = srgb::eotf(v as f32 / 255.0);
        assert_eq!(decode(v), direct);
    }
}

#[test]
fn test_encode_over_range_sweep() {
    // Linear values well outside [0, 1] never wrap
    for i in -50..=50 {
        let l = i as f32 * 0.1;
        let e = encode(l);
        if l <= 0.0 {
            assert_eq!(e, 0);
        } else if l >= 1.0 {
            assert_eq!(e, 255);
        }
    }
}
