//! Benchmarks for the bounded shapers.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use phosphor_dsp::dsp::saturation::{drive_shape, fast_tanh_buffer};

use crate::BLOCK_SIZES;

pub fn bench_saturation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/saturation");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| ((i as f32 / size as f32) * 2.0 - 1.0) * 3.0)
            .collect();
        let mut buffer = input.clone();

        group.bench_with_input(BenchmarkId::new("fast_tanh", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                fast_tanh_buffer(black_box(&mut buffer));
            })
        });

        group.bench_with_input(BenchmarkId::new("drive_shape", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = drive_shape(black_box(x), 9.0);
                }
            })
        });
    }

    group.finish();
}
