//! Benchmarks for greycard operations.
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use greycard_calib::focus::{check_focus, FocusParams};
use greycard_calib::locate::{locate, LocatorParams};
use greycard_calib::pipeline::render;
use greycard_calib::stats::measure;
use greycard_calib::{ccm, Gains, PatchThresholds, ToneParams};
use greycard_core::{PixelBuffer, Rect};
use greycard_transfer::{decode, encode, srgb};

/// Synthetic frame with a gradient and a neutral card in the middle.
fn test_frame(width: u32, height: u32) -> PixelBuffer {
    let mut frame = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            frame.set_pixel(x, y, [r, g, 128, 255]);
        }
    }
    let card = Rect::centered_square(width, height, 0.2);
    for (x, y) in card.iter_coords() {
        frame.set_pixel(x, y, [226, 224, 225, 255]);
    }
    frame
}

/// Benchmark the 8-bit codec.
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let bytes: Vec<u8> = (0..10000).map(|i| (i % 256) as u8).collect();
    let linear: Vec<f32> = (0..10000).map(|i| i as f32 / 10000.0).collect();
    group.throughput(Throughput::Elements(10000));

    group.bench_function("decode_table", |b| {
        b.iter(|| bytes.iter().map(|&v| decode(black_box(v))).collect::<Vec<_>>())
    });

    group.bench_function("decode_eotf", |b| {
        b.iter(|| {
            bytes
                .iter()
                .map(|&v| srgb::eotf(black_box(v) as f32 / 255.0))
                .collect::<Vec<_>>()
        })
    });

    group.bench_function("encode", |b| {
        b.iter(|| linear.iter().map(|&v| encode(black_box(v))).collect::<Vec<_>>())
    });

    group.finish();
}

/// Benchmark full-frame rendering at capture resolutions.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let gains = Gains::new(1.08, 1.0, 0.93);
    let tone = ToneParams::default();

    for (w, h) in [(640u32, 480u32), (1280, 720), (1920, 1080)] {
        let frame = test_frame(w, h);
        group.throughput(Throughput::Elements(w as u64 * h as u64));
        group.bench_with_input(BenchmarkId::new("frame", format!("{w}x{h}")), &frame, |b, f| {
            b.iter(|| render(black_box(f), &gains, &ccm::DEFAULT_CCM, &tone))
        });
    }

    group.finish();
}

/// Benchmark patch statistics, auto search and focus.
fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    let frame = test_frame(1280, 720);
    let thresholds = PatchThresholds::default();

    group.bench_function("measure_86px", |b| {
        let patch = Rect::centered_square(1280, 720, 0.12);
        b.iter(|| measure(black_box(&frame), patch))
    });

    group.bench_function("locate_40x40", |b| {
        let params = LocatorParams::default();
        b.iter(|| locate(black_box(&frame), &params, &thresholds))
    });

    group.bench_function("focus_center", |b| {
        let params = FocusParams::default();
        b.iter(|| check_focus(black_box(&frame), &params))
    });

    group.finish();
}

criterion_group!(benches, bench_codec, bench_render, bench_analysis);
criterion_main!(benches);
