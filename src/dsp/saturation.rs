//! Saturation / soft clipping
//!
//! Every feedback path in the filter and oscillator runs through one of these
//! shapers. They are bounded, odd and monotonic, which is what keeps a
//! self-oscillating filter or a runaway phase-feedback loop finite.
//!
//! # Shapers
//!
//! Fast tanh (Padé 7/6):
//!   f(x) = x(135135 + 17325x² + 378x⁴ + x⁶) / (135135 + 62370x² + 3150x⁴ + 28x⁶)
//!   - Within ~0.0001% of tanh for |x| < 5
//!   - Input clamped to ±5.5, output clamped to ±1
//!
//! Drive shaping:
//!   Blends the dry sample toward fast tanh by `drive_db / 12`, capped at 1.
//!   Below 10% of that range the sample passes through untouched. Past 12 dB
//!   the shape stays pure tanh; the extra drive is input gain only.

/// Input range beyond which the Padé approximant is no longer tracking tanh.
const TANH_INPUT_LIMIT: f32 = 5.5;

/// Drive (dB) at which [`drive_shape`] is fully saturated.
pub const FULL_DRIVE_DB: f32 = 12.0;

/// Padé [7/6] tanh approximation.
///
/// Odd, monotonic and bounded to `[-1, 1]` for every finite input. NaN stays NaN.
#[inline]
pub fn fast_tanh(x: f32) -> f32 {
    let x = x.clamp(-TANH_INPUT_LIMIT, TANH_INPUT_LIMIT);
    let x2 = x * x;
    let num = x * (135_135.0 + x2 * (17_325.0 + x2 * (378.0 + x2)));
    let den = 135_135.0 + x2 * (62_370.0 + x2 * (3_150.0 + x2 * 28.0));
    // the approximant overshoots by ~2e-4 right at the clamp
    (num / den).clamp(-1.0, 1.0)
}

/// Drive-dependent saturation used at the filter input and between cascaded
/// filter stages.
#[inline]
pub fn drive_shape(sample: f32, drive_db: f32) -> f32 {
    let amount = (drive_db / FULL_DRIVE_DB).min(1.0);
    if amount < 0.1 {
        return sample;
    }

    (1.0 - amount) * sample + amount * fast_tanh(sample)
}

/// Convert decibels to linear amplitude.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear amplitude to decibels.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * gain.max(f32::MIN_POSITIVE).log10()
}

/// Apply fast tanh to an entire buffer in place.
pub fn fast_tanh_buffer(buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        *sample = fast_tanh(*sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_tanh_tracks_tanh() {
        let mut x = -5.0f32;
        while x <= 5.0 {
            let err = (fast_tanh(x) - x.tanh()).abs();
            assert!(err < 1e-4, "fast_tanh({x}) off by {err}");
            x += 0.01;
        }
    }

    #[test]
    fn test_fast_tanh_is_bounded_and_odd() {
        for &x in &[0.3f32, 1.0, 5.49, 5.5, 6.0, 100.0, 1e30, f32::MAX] {
            let y = fast_tanh(x);
            assert!(y <= 1.0, "fast_tanh({x}) = {y}");
            assert_eq!(fast_tanh(-x), -y);
        }
        assert_eq!(fast_tanh(f32::INFINITY), 1.0);
        assert_eq!(fast_tanh(f32::NEG_INFINITY), -1.0);
    }

    #[test]
    fn test_fast_tanh_is_monotonic() {
        let mut prev = fast_tanh(-10.0);
        let mut x = -10.0f32;
        while x <= 10.0 {
            let y = fast_tanh(x);
            assert!(y >= prev, "not monotonic at {x}");
            prev = y;
            x += 0.001;
        }
    }

    #[test]
    fn test_drive_shape_monotonic_across_drive_range() {
        let mut drive = 0.0f32;
        while drive <= 24.0 {
            let mut prev = drive_shape(-50.0, drive);
            let mut x = -50.0f32;
            while x <= 50.0 {
                let y = drive_shape(x, drive);
                assert!(y >= prev, "drive {drive} dB not monotonic at {x}");
                assert_eq!(drive_shape(-x, drive), -y);
                prev = y;
                x += 0.01;
            }
            drive += 0.5;
        }
    }

    #[test]
    fn test_drive_shape_bounded_once_saturating() {
        // at >= 1.2 dB the dry share is at most 90%, so |y| <= max(|x|, 1)
        for &drive in &[1.2f32, 6.0, 12.0, 18.0, 24.0] {
            for &x in &[0.5f32, 1.0, 5.0, 50.0, 1e6] {
                let y = drive_shape(x, drive);
                assert!(y > 0.0, "sign flip at drive {drive}, x {x}: {y}");
                assert!(y <= x.max(1.0), "drive {drive}, x {x}: {y}");
            }
            assert!(drive_shape(50.0, drive) <= 50.0);
        }
        assert!((drive_shape(50.0, 24.0) - fast_tanh(50.0)).abs() < 1e-6);
        assert_eq!(drive_shape(5.0, 24.0), drive_shape(5.0, FULL_DRIVE_DB));
    }

    #[test]
    fn test_drive_shape_bypass_below_threshold() {
        assert_eq!(drive_shape(0.8, 0.0), 0.8);
        assert_eq!(drive_shape(0.8, 1.0), 0.8);
    }

    #[test]
    fn test_drive_shape_full_drive_is_tanh() {
        let y = drive_shape(2.0, FULL_DRIVE_DB);
        assert!((y - fast_tanh(2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_db_round_trip_at_unity() {
        assert!((db_to_gain(0.0) - 1.0).abs() < 1e-6);
        assert!((gain_to_db(1.0)).abs() < 1e-6);
        assert!((db_to_gain(6.0) - 1.995).abs() < 1e-3);
    }
}
