use std::f64::consts::TAU;
use std::sync::Arc;

use lazy_static::lazy_static;

/// Number of interpolation segments in the table.
pub const TABLE_SIZE: usize = 16_384;

lazy_static! {
    static ref SHARED: Arc<SineTable> = Arc::new(SineTable::new());
}

/// Linearly interpolated sine lookup over one normalized cycle.
///
/// Built once (about 64 KiB) and shared by every oscillator through an `Arc`.
/// The extra guard entry at `TABLE_SIZE` lets interpolation read `index + 1`
/// without wrapping.
#[derive(Debug, Clone)]
pub struct SineTable {
    table: Box<[f32]>,
}

impl SineTable {
    pub fn new() -> Self {
        let table = (0..=TABLE_SIZE)
            .map(|i| (TAU * i as f64 / TABLE_SIZE as f64).sin() as f32)
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { table }
    }

    /// Process-wide instance, built on first use.
    pub fn shared() -> Arc<SineTable> {
        Arc::clone(&SHARED)
    }

    /// `sin(2π·phase)`. Any finite phase is accepted and wrapped into `[0, 1)`.
    #[inline]
    pub fn sample(&self, phase: f64) -> f32 {
        let wrapped = phase - phase.floor();
        let scaled = (wrapped * TABLE_SIZE as f64).clamp(0.0, TABLE_SIZE as f64 - 1e-9);
        if !scaled.is_finite() {
            return 0.0;
        }

        let index = scaled as usize;
        let frac = (scaled - index as f64) as f32;
        let a = self.table[index];
        let b = self.table[index + 1];
        a + frac * (b - a)
    }
}

impl Default for SineTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_points() {
        let table = SineTable::new();
        assert!(table.sample(0.0).abs() < 1e-6);
        assert!((table.sample(0.25) - 1.0).abs() < 1e-6);
        assert!(table.sample(0.5).abs() < 1e-6);
        assert!((table.sample(0.75) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_interpolation_accuracy() {
        let table = SineTable::new();
        let mut phase = -3.0f64;
        while phase < 3.0 {
            let expected = (TAU * phase).sin() as f32;
            let err = (table.sample(phase) - expected).abs();
            assert!(err < 1e-6, "phase {phase}: err {err}");
            phase += 0.000_37;
        }
    }

    #[test]
    fn test_near_one_does_not_overrun() {
        let table = SineTable::new();
        let y = table.sample(1.0 - 1e-17);
        assert!(y.abs() < 1e-3);
        assert!(table.sample(-1e-300).abs() < 1e-3);
    }

    #[test]
    fn test_non_finite_phase_is_silent() {
        let table = SineTable::new();
        assert_eq!(table.sample(f64::NAN), 0.0);
        assert_eq!(table.sample(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_shared_instance_is_reused() {
        let a = SineTable::shared();
        let b = SineTable::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
