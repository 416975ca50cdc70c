use std::sync::Arc;

use crate::dsp::oscillator::RpmOscillator;
use crate::dsp::sine_table::SineTable;
use crate::scope::ring::StereoFrame;
use crate::source::StereoSource;

pub const MIN_FREQUENCY_HZ: f32 = 10.0;
pub const MAX_FREQUENCY_HZ: f32 = 500.0;
pub const MIN_DETUNE: f32 = 0.9;
pub const MAX_DETUNE: f32 = 1.1;
pub const MIN_BETA: f32 = -10.0;
pub const MAX_BETA: f32 = 50.0;
pub const MIN_EXPONENT: u32 = 1;
pub const MAX_EXPONENT: u32 = 16;

/// Built-in stereo test generator: two RPM oscillators, Y slightly detuned
/// from X, so the X/Y figure slowly rotates.
///
/// With detune `d` the figure completes one rotation every
/// `1 / (frequency · (d - 1))` seconds.
pub struct TestSignal {
    osc_x: RpmOscillator,
    osc_y: RpmOscillator,
    frequency: f32,
    detune: f32,
    beta: f32,
    exponent: u32,
}

impl TestSignal {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_table(SineTable::shared(), sample_rate)
    }

    pub fn with_table(table: Arc<SineTable>, sample_rate: f32) -> Self {
        let mut osc_x = RpmOscillator::with_table(Arc::clone(&table), sample_rate);
        let mut osc_y = RpmOscillator::with_table(table, sample_rate);
        osc_x.set_soft_clip(true);
        osc_y.set_soft_clip(true);

        let mut signal = Self {
            osc_x,
            osc_y,
            frequency: 80.0,
            detune: 1.003,
            beta: 0.0,
            exponent: 1,
        };
        signal.set_beta(0.0);
        signal.set_exponent(1);
        signal.update_frequencies();
        signal
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.osc_x.set_sample_rate(sample_rate);
        self.osc_y.set_sample_rate(sample_rate);
    }

    /// Base (X) frequency, clamped to `[10, 500]` Hz.
    pub fn set_frequency(&mut self, hz: f32) {
        if hz.is_finite() {
            self.frequency = hz.clamp(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ);
        }
        self.update_frequencies();
    }

    /// Y/X frequency ratio, clamped to `[0.9, 1.1]`.
    pub fn set_detune(&mut self, ratio: f32) {
        if ratio.is_finite() {
            self.detune = ratio.clamp(MIN_DETUNE, MAX_DETUNE);
        }
        self.update_frequencies();
    }

    pub fn set_beta(&mut self, beta: f32) {
        if beta.is_finite() {
            self.beta = beta.clamp(MIN_BETA, MAX_BETA);
        }
        self.osc_x.set_beta(self.beta);
        self.osc_y.set_beta(self.beta);
    }

    pub fn set_exponent(&mut self, exponent: u32) {
        self.exponent = exponent.clamp(MIN_EXPONENT, MAX_EXPONENT);
        self.osc_x.set_exponent(self.exponent);
        self.osc_y.set_exponent(self.exponent);
    }

    fn update_frequencies(&mut self) {
        self.osc_x.set_frequency(self.frequency);
        self.osc_y.set_frequency(self.frequency * self.detune);
    }

    /// Scrub both oscillators by `samples` without generating output.
    pub fn advance(&mut self, samples: i64) {
        let samples = samples as f64;
        self.osc_x.advance_phase(samples);
        self.osc_y.advance_phase(samples);
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn detune(&self) -> f32 {
        self.detune
    }

    pub fn beta(&self) -> f32 {
        self.beta
    }

    pub fn exponent(&self) -> u32 {
        self.exponent
    }
}

impl StereoSource for TestSignal {
    #[inline]
    fn next_frame(&mut self) -> StereoFrame {
        StereoFrame::new(self.osc_x.next_sample(), self.osc_y.next_sample())
    }

    fn step(&mut self, samples: i64) {
        self.advance(samples);
    }

    fn reset(&mut self) {
        self.osc_x.reset();
        self.osc_y.reset();
    }
}
