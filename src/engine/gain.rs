/// Linear per-sample ramp toward a target gain.
///
/// The slope is fixed by the ramp time: a full 0 → 1 swing takes exactly
/// `ramp_time` seconds, so mute, pause and shutdown all settle within that bound.
#[derive(Debug, Clone, Copy)]
pub struct GainRamp {
    current: f32,
    increment: f32,
}

/// Shortest ramp allowed, in seconds.
const MIN_RAMP_TIME: f32 = 0.000_1;

impl GainRamp {
    pub fn new(sample_rate: f32, ramp_time: f32) -> Self {
        let ramp_time = if ramp_time.is_finite() {
            ramp_time.max(MIN_RAMP_TIME)
        } else {
            MIN_RAMP_TIME
        };
        Self {
            current: 0.0,
            increment: 1.0 / (ramp_time * sample_rate.max(1.0)),
        }
    }

    /// Step once toward `target` and return the new gain.
    #[inline]
    pub fn next(&mut self, target: f32) -> f32 {
        if self.current < target {
            self.current = (self.current + self.increment).min(target);
        } else if self.current > target {
            self.current = (self.current - self.increment).max(target);
        }
        self.current
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    pub fn increment(&self) -> f32 {
        self.increment
    }
}
