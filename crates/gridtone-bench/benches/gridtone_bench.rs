//! Benchmarks for gridtone operations.
//!
//! Run with: `cargo bench -p gridtone-bench`

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use gridtone_core::{Image, ImageProperties};
use gridtone_lut::Lut3D;
use gridtone_ops::hsl::{hsl_to_rgb, rgb_to_hsl};
use gridtone_ops::parallel::grade_image;
use gridtone_ops::{DetailLayers, DetailSettings, GradeParams, Pipeline, grade};
use gridtone_render::{CpuBackend, FitMode, FrameJob, Quad, RenderBackend};

fn colors(n: usize) -> Vec<[f32; 3]> {
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            [t, (t * 7.0).fract(), (t * 13.0).fract()]
        })
        .collect()
}

fn gradient(w: u32, h: u32) -> Image {
    let mut img = Image::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let u = x as f32 / w as f32;
            let v = y as f32 / h as f32;
            img.set_pixel(x, y, [u, v, (u * v * 4.0).fract(), 1.0]);
        }
    }
    img
}

fn graded_props() -> ImageProperties {
    let mut p = ImageProperties::default();
    p.brightness = 110.0;
    p.contrast = 120.0;
    p.saturation = 90.0;
    p.hue = 15.0;
    p.orange_saturation = 0.1;
    p.blue_hue = -0.05;
    p
}

/// Per-pixel kernel without the detail stage.
fn bench_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel");
    let values = colors(10_000);
    group.throughput(Throughput::Elements(values.len() as u64));

    let defaults = GradeParams::from_properties(&ImageProperties::default(), &DetailSettings::default());
    let graded = GradeParams::from_properties(&graded_props(), &DetailSettings::default());
    let layers = DetailLayers::default();

    group.bench_function("grade_defaults", |b| {
        b.iter(|| {
            values
                .iter()
                .map(|&c| grade(black_box(c), &defaults, &layers))
                .collect::<Vec<_>>()
        })
    });
    group.bench_function("grade_full", |b| {
        b.iter(|| {
            values
                .iter()
                .map(|&c| grade(black_box(c), &graded, &layers))
                .collect::<Vec<_>>()
        })
    });
    group.bench_function("hsl_round_trip", |b| {
        b.iter(|| {
            values
                .iter()
                .map(|&c| hsl_to_rgb(rgb_to_hsl(black_box(c))))
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

/// Trilinear 3D LUT lookups.
fn bench_lut3d(c: &mut Criterion) {
    let mut group = c.benchmark_group("lut3d");
    let values = colors(10_000);
    group.throughput(Throughput::Elements(values.len() as u64));

    for size in [17usize, 33, 65] {
        let lut = Lut3D::identity(size);
        group.bench_with_input(BenchmarkId::new("apply", size), &lut, |b, lut| {
            b.iter(|| {
                values
                    .iter()
                    .map(|&c| lut.apply(black_box(c)))
                    .collect::<Vec<_>>()
            })
        });
    }

    group.finish();
}

/// Whole frames through the pipeline.
fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    group.sample_size(20);

    let detail = DetailSettings::default();
    let lut = Arc::new(Lut3D::identity(33));

    for size in [256u32, 512] {
        let src = gradient(size, size);
        group.throughput(Throughput::Elements((size * size) as u64));

        let tone = Pipeline::new(&graded_props(), &detail, Some(Arc::clone(&lut)));
        group.bench_with_input(BenchmarkId::new("tone_lut", size), &src, |b, src| {
            b.iter(|| grade_image(black_box(src), &tone))
        });

        let mut props = graded_props();
        props.sharpness = 60.0;
        props.structure = 40.0;
        props.vignette_size = 0.5;
        props.vignette_sharpness = 0.5;
        let full = Pipeline::new(&props, &detail, Some(Arc::clone(&lut)));
        group.bench_with_input(BenchmarkId::new("full", size), &src, |b, src| {
            b.iter(|| grade_image(black_box(src), &full))
        });

        let mut backend = CpuBackend::new();
        group.bench_with_input(BenchmarkId::new("surface_cover_1080", size), &src, |b, src| {
            b.iter(|| {
                let job = FrameJob {
                    source: src,
                    pipeline: &tone,
                    width: 1080,
                    height: 1350,
                    quad: Quad::fit(src.dimensions(), (1080, 1350), FitMode::Cover),
                };
                backend.render(black_box(&job))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kernel, bench_lut3d, bench_frame);

criterion_main!(benches);
