//! Benchmarks for low-level DSP primitives.

mod filter;
mod morph;
mod oscillator;
mod saturation;

pub use filter::bench_filter;
pub use morph::bench_morph;
pub use oscillator::bench_oscillator;
pub use saturation::bench_saturation;
