//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use phosphor_dsp::dsp::filter::{Poles, StateVariableFilter, SvfKind};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // All four taps per sample, as the engine uses it
        let mut filter = StateVariableFilter::lowpass(48_000.0, 1000.0);
        filter.set_resonance(0.5);
        group.bench_with_input(BenchmarkId::new("taps_2pole", size), &size, |b, _| {
            b.iter(|| {
                let mut acc = 0.0;
                for &x in &input {
                    let taps = filter.process(black_box(x));
                    acc += taps.lowpass + taps.bandpass + taps.highpass;
                }
                black_box(acc)
            })
        });

        let mut filter = StateVariableFilter::lowpass(48_000.0, 1000.0);
        filter.set_resonance(0.5);
        filter.set_poles(Poles::Four);
        group.bench_with_input(BenchmarkId::new("taps_4pole", size), &size, |b, _| {
            b.iter(|| {
                let mut acc = 0.0;
                for &x in &input {
                    acc += filter.process(black_box(x)).lowpass;
                }
                black_box(acc)
            })
        });

        // Crossfaded synth response
        let mut filter = StateVariableFilter::lowpass(48_000.0, 1000.0);
        filter.set_lp_bp_mix(0.3);
        filter.set_drive_db(6.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("render", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        // EQ bell
        let mut filter = StateVariableFilter::eq(48_000.0, SvfKind::Bell, 1000.0, 6.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("bell", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
