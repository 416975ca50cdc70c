//! Benchmarks for the recursive phase-modulation oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use phosphor_dsp::dsp::RpmOscillator;
use phosphor_dsp::source::{StereoSource, TestSignal};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut osc = RpmOscillator::new(48_000.0);
        osc.set_frequency(80.0);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer)))
        });

        let mut osc = RpmOscillator::new(48_000.0);
        osc.set_frequency(80.0);
        osc.set_saw_mode(8.0);
        osc.set_soft_clip(true);
        group.bench_with_input(BenchmarkId::new("saw_feedback", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer)))
        });

        let mut osc = RpmOscillator::new(48_000.0);
        osc.set_frequency(80.0);
        osc.set_beta(-6.0);
        osc.set_exponent(5);
        osc.set_soft_clip(true);
        group.bench_with_input(BenchmarkId::new("high_exponent", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer)))
        });

        let mut signal = TestSignal::new(48_000.0);
        group.bench_with_input(BenchmarkId::new("test_signal", size), &size, |b, _| {
            b.iter(|| {
                for _ in 0..size {
                    black_box(signal.next_frame());
                }
            })
        });
    }

    group.finish();
}
