//! Benchmarks for tap morphing and routing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use phosphor_dsp::dsp::filter::StateVariableFilter;
use phosphor_dsp::routing::{FilterMorpher, SplitMode, StereoFilterRouter};

use crate::BLOCK_SIZES;

pub fn bench_morph(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/morph");

    for &size in BLOCK_SIZES {
        let mut filter = StateVariableFilter::lowpass(48_000.0, 800.0);
        let taps: Vec<_> = (0..size)
            .map(|i| filter.process(((i as f32) * 0.01).sin()))
            .collect();

        let mut morpher = FilterMorpher::new();
        morpher.set_position(0.4, 0.6);
        morpher.set_split_angle(90.0);
        morpher.set_split_depth(0.3);
        group.bench_with_input(BenchmarkId::new("apply_xy", size), &size, |b, _| {
            b.iter(|| {
                let mut acc = 0.0;
                for t in &taps {
                    let (x, y) = morpher.apply_taps_xy(black_box(t));
                    acc += x + y;
                }
                black_box(acc)
            })
        });

        let router = StereoFilterRouter::new(SplitMode::BpAp);
        group.bench_with_input(BenchmarkId::new("route", size), &size, |b, _| {
            b.iter(|| {
                let mut acc = 0.0;
                for t in &taps {
                    let (x, y) = router.route(black_box(t));
                    acc += x + y;
                }
                black_box(acc)
            })
        });
    }

    group.finish();
}
