use std::f32::consts::TAU;
use std::sync::Arc;

use crate::dsp::saturation::fast_tanh;
use crate::dsp::sine_table::SineTable;

/*
Recursive phase modulation (RPM)

  state  = 0.5·(state + last^exponent)        one-pole average of the powered output
  out    = sin(2π·(φ + β·state / 2π))          feedback into its own phase

| β        | exponent | character              |
| -------- | -------- | ---------------------- |
| 0        | any      | pure sine              |
| > 0      | 1        | saw-leaning            |
| < 0      | 2        | square-leaning         |
| large |β| | any      | chaotic, noise-like    |

With soft clip on, both `state` and the output pass through tanh, which keeps
|out| ≤ 1 no matter how hard the loop is driven.
*/

/// Highest frequency the oscillator accepts.
pub const MAX_FREQUENCY_HZ: f32 = 20_000.0;

pub struct RpmOscillator {
    table: Arc<SineTable>,

    sample_rate: f32,
    frequency: f32,
    /// Normalized phase, always in `[0, 1)`.
    phase: f64,
    increment: f64,

    beta: f32,
    exponent: u32,
    soft_clip: bool,

    state: f32,
    last_out: f32,
}

impl RpmOscillator {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_table(SineTable::shared(), sample_rate)
    }

    pub fn with_table(table: Arc<SineTable>, sample_rate: f32) -> Self {
        let mut osc = Self {
            table,
            sample_rate: 48_000.0,
            frequency: 440.0,
            phase: 0.0,
            increment: 0.0,
            beta: 1.0,
            exponent: 1,
            soft_clip: false,
            state: 0.0,
            last_out: 0.0,
        };
        osc.set_sample_rate(sample_rate);
        osc
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate > 0.0 && sample_rate.is_finite() {
            self.sample_rate = sample_rate;
        }
        self.update_increment();
    }

    /// Clamped to `[0, 20 kHz]`.
    pub fn set_frequency(&mut self, frequency: f32) {
        if frequency.is_finite() {
            self.frequency = frequency.clamp(0.0, MAX_FREQUENCY_HZ);
        }
        self.update_increment();
    }

    /// Feedback depth. Not clamped; large magnitudes are the chaotic regime.
    pub fn set_beta(&mut self, beta: f32) {
        if beta.is_finite() {
            self.beta = beta;
        }
    }

    /// Power applied to the fed-back sample. Values below 1 are raised to 1.
    pub fn set_exponent(&mut self, exponent: u32) {
        self.exponent = exponent.max(1);
    }

    pub fn set_soft_clip(&mut self, enabled: bool) {
        self.soft_clip = enabled;
    }

    /// Saw-like preset: positive β, linear feedback.
    pub fn set_saw_mode(&mut self, amount: f32) {
        self.set_beta(amount.abs());
        self.exponent = 1;
    }

    /// Square-like preset: negative β, squared feedback.
    pub fn set_square_mode(&mut self, amount: f32) {
        self.set_beta(-amount.abs());
        self.exponent = 2;
    }

    fn update_increment(&mut self) {
        self.increment = self.frequency as f64 / self.sample_rate as f64;
    }

    /// One sample driven by an external phasor in `[0, 1)`.
    #[inline]
    pub fn process(&mut self, phase: f64) -> f32 {
        self.state = 0.5 * (self.state + fast_pow(self.last_out, self.exponent));
        if self.soft_clip {
            self.state = fast_tanh(self.state);
        }

        let modulated = phase + (self.beta * self.state / TAU) as f64;
        let mut out = self.table.sample(modulated);
        if self.soft_clip {
            out = fast_tanh(out);
        }

        self.last_out = out;
        out
    }

    /// One sample from the internal phase accumulator.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let out = self.process(self.phase);
        self.phase = wrap_phase(self.phase + self.increment);
        out
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Clears phase, feedback state and the last output.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.state = 0.0;
        self.last_out = 0.0;
    }

    pub fn reset_phase(&mut self) {
        self.phase = 0.0;
    }

    pub fn set_phase(&mut self, phase: f64) {
        if phase.is_finite() {
            self.phase = wrap_phase(phase);
        }
    }

    /// Move the phase by `samples` worth of increments. Negative values rewind.
    /// Feedback state is left untouched.
    pub fn advance_phase(&mut self, samples: f64) {
        self.set_phase(self.phase + self.increment * samples);
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn beta(&self) -> f32 {
        self.beta
    }

    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    pub fn soft_clip(&self) -> bool {
        self.soft_clip
    }
}

/// Wrap into `[0, 1)`. `rem_euclid` can round up to exactly 1.0 for tiny
/// negative inputs, so that case folds back to 0.
#[inline]
fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(1.0);
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

#[inline]
fn fast_pow(base: f32, exponent: u32) -> f32 {
    match exponent {
        0 | 1 => base,
        2 => base * base,
        3 => base * base * base,
        4 => {
            let sq = base * base;
            sq * sq
        }
        n => base.powi(n.min(i32::MAX as u32) as i32),
    }
}
