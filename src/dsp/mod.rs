//! Low-level DSP primitives used by the scope engine.
//!
//! These components are allocation-free and realtime-safe once constructed,
//! so the engine can own them directly and call them once per sample. They
//! stay focused on the signal-processing math; routing and parameter plumbing
//! live in [`crate::routing`] and [`crate::engine`].

/// Recursive phase-modulation oscillator.
pub mod oscillator;
/// Bounded shapers (fast tanh, drive).
pub mod saturation;
/// Shared interpolated sine lookup.
pub mod sine_table;
/// State-variable filter with simultaneous taps and EQ responses.
pub mod filter;

pub use filter::{FilterOutput, FilterOutputs, Poles, StateVariableFilter, SvfKind};
pub use oscillator::RpmOscillator;
pub use sine_table::SineTable;
