//! Benchmarks for complete scope callbacks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use phosphor_dsp::dsp::Poles;
use phosphor_dsp::engine::ScopeRouting;
use phosphor_dsp::source::TestSignal;
use phosphor_dsp::{EngineConfig, ScopeEngine};

use crate::BLOCK_SIZES;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * 2];

        // === DEFAULT SCOPE ===
        // test signal → 2-pole filter → morph, single weight set
        let (mut engine, mut ctl) = ScopeEngine::new(&EngineConfig::default());
        ctl.set_source(TestSignal::new(48_000.0)).unwrap();
        engine.process(&mut buffer);

        group.bench_with_input(BenchmarkId::new("default", size), &size, |b, _| {
            b.iter(|| engine.process(black_box(&mut buffer)))
        });

        // === SPLIT, 4-POLE ===
        // both scope channels morphed, cascaded filter
        let (mut engine, mut ctl) = ScopeEngine::new(&EngineConfig::default());
        ctl.set_source(TestSignal::new(48_000.0)).unwrap();
        ctl.params().set_poles(Poles::Four);
        ctl.params().set_morph_position(0.5, 0.5);
        ctl.params().set_split_angle(120.0);
        engine.process(&mut buffer);

        group.bench_with_input(BenchmarkId::new("split_4pole", size), &size, |b, _| {
            b.iter(|| engine.process(black_box(&mut buffer)))
        });

        // === ROUTER ===
        let (mut engine, mut ctl) = ScopeEngine::new(&EngineConfig::default());
        ctl.set_source(TestSignal::new(48_000.0)).unwrap();
        ctl.params().set_routing(ScopeRouting::Router);
        engine.process(&mut buffer);

        group.bench_with_input(BenchmarkId::new("router", size), &size, |b, _| {
            b.iter(|| engine.process(black_box(&mut buffer)))
        });

        // === PARAMETER SWEEP ===
        // cutoff changes every callback, so coefficients are recomputed
        let (mut engine, mut ctl) = ScopeEngine::new(&EngineConfig::default());
        ctl.set_source(TestSignal::new(48_000.0)).unwrap();
        let mut cutoff = 100.0f32;
        group.bench_with_input(BenchmarkId::new("cutoff_sweep", size), &size, |b, _| {
            b.iter(|| {
                cutoff = if cutoff > 2_900.0 { 100.0 } else { cutoff * 1.01 };
                ctl.params().set_cutoff(cutoff);
                engine.process(black_box(&mut buffer))
            })
        });
    }

    group.finish();
}
