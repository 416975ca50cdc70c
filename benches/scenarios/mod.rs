//! Whole-engine benchmarks.
//!
//! These run the same callback the audio driver does, with the parameter sync,
//! ring writes and trigger detection included.

mod engine;

pub use engine::bench_engine;
