//! CLI command implementations

pub mod calibrate;
pub mod capture;
pub mod config;
pub mod crop;
pub mod focus;
pub mod render;

use anyhow::{bail, Context, Result};
use greycard_calib::{Calibration, FramePipeline, Gains, PatchSelection};
use greycard_core::{FracRect, PixelBuffer, Rect};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::PatchArgs;

/// Load a PNG as an RGBA8 frame.
///
/// RGB, grayscale and grayscale+alpha inputs are expanded to RGBA with
/// opaque alpha. 16-bit inputs are rejected.
pub fn load_png(path: &Path) -> Result<PixelBuffer> {
    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .with_context(|| format!("Failed to decode: {}", path.display()))?;

    let buf_size = reader
        .output_buffer_size()
        .context("Cannot determine PNG buffer size")?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .with_context(|| format!("Failed to decode: {}", path.display()))?;
    let bytes = &buf[..info.buffer_size()];

    let rgba: Vec<u8> = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgba, png::BitDepth::Eight) => bytes.to_vec(),
        (png::ColorType::Rgb, png::BitDepth::Eight) => bytes
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            bytes.iter().flat_map(|&g| [g, g, g, 255]).collect()
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => bytes
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        (color_type, bit_depth) => {
            bail!(
                "{}: unsupported PNG layout {:?} {:?} (need 8-bit)",
                path.display(),
                color_type,
                bit_depth
            );
        }
    };

    PixelBuffer::from_rgba(info.width, info.height, rgba)
        .with_context(|| format!("Bad pixel data in {}", path.display()))
}

/// Save an RGBA8 frame as PNG.
pub fn save_png(path: &Path, frame: &PixelBuffer) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), frame.width(), frame.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    let packed = frame.to_packed();
    writer
        .write_image_data(packed.data())
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    writer
        .finish()
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    Ok(())
}

fn parse_floats<const N: usize>(s: &str) -> Result<[f32; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated numbers, got '{s}'"));
    }
    let mut out = [0.0f32; N];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{part}' is not a number"))?;
    }
    Ok(out)
}

/// Parse `x,y,size` into a square region.
pub fn parse_region(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,size, got '{s}'"));
    }
    let mut v = [0u32; 3];
    for (slot, part) in v.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{part}' is not a pixel coordinate"))?;
    }
    Ok(Rect::square(v[0], v[1], v[2]))
}

/// Parse `r,g,b` gains; each must be finite and positive.
pub fn parse_gains(s: &str) -> Result<Gains, String> {
    let [r, g, b] = parse_floats::<3>(s)?;
    let gains = Gains::new(r, g, b);
    if !gains.is_valid() {
        return Err(format!("gains must be finite and positive, got '{s}'"));
    }
    Ok(gains)
}

/// Parse `x,y,w,h` fractions.
pub fn parse_frac_rect(s: &str) -> Result<FracRect, String> {
    let [x, y, w, h] = parse_floats::<4>(s)?;
    let rect = FracRect::new(x, y, w, h);
    if !rect.is_valid() {
        return Err(format!("fractions must be within [0, 1], got '{s}'"));
    }
    Ok(rect)
}

impl PatchArgs {
    /// Selection requested on the command line.
    pub fn selection(&self) -> PatchSelection {
        match (self.auto, self.region) {
            (true, _) => PatchSelection::Auto,
            (false, Some(r)) => PatchSelection::Manual(r),
            (false, None) => PatchSelection::Centered,
        }
    }
}

/// Calibrate, turning a rejection into an error carrying the user hint.
pub fn calibrate(pipeline: &FramePipeline, frame: &PixelBuffer, selection: PatchSelection) -> Result<Calibration> {
    match pipeline.calibrate(frame, selection) {
        Ok(cal) => Ok(cal),
        Err(e) => match e.rejection() {
            Some(reason) => bail!("{} ({})", reason.user_hint(), e),
            None => Err(e).context("Calibration failed"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_region() {
        assert_eq!(parse_region("10, 20,30").unwrap(), Rect::square(10, 20, 30));
        assert!(parse_region("10,20").is_err());
        assert!(parse_region("-1,0,4").is_err());
    }

    #[test]
    fn test_parse_gains() {
        let g = parse_gains("1.1,1,0.9").unwrap();
        assert_eq!(g, Gains::new(1.1, 1.0, 0.9));
        assert!(parse_gains("1,0,1").is_err());
        assert!(parse_gains("1,x,1").is_err());
    }

    #[test]
    fn test_parse_frac_rect() {
        let r = parse_frac_rect("0.1,0.12,0.8,0.64").unwrap();
        assert_eq!(r, FracRect::new(0.1, 0.12, 0.8, 0.64));
        assert!(parse_frac_rect("0.1,0.1,1.5,0.5").is_err());
    }

    #[test]
    fn test_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut frame = PixelBuffer::filled(7, 5, [12, 34, 56, 200]);
        frame.set_pixel(6, 4, [255, 0, 128, 255]);
        save_png(&path, &frame).unwrap();
        let back = load_png(&path).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_png(Path::new("/nonexistent/frame.png")).unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
