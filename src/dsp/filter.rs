use std::f32::consts::{FRAC_PI_2, PI, SQRT_2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::saturation::{db_to_gain, drive_shape, fast_tanh, gain_to_db};

/*
TPT state-variable filter (trapezoidal integrators, implicit loop solve)

  x ──> [drive] ──> (Σ) ──> [tanh] ──> hp ──> ∫ ──> bp ──> ∫ ──> lp
                     ^                                │            │
                     └────── -f·z1 - z2 ◄─────────────┴────────────┘

  g  = tan(π·fc/fs)          integrator gain
  k  = 2(1 - r)              damping (r = 1 → k = 0, self-oscillation)
  a1 = 1 / (1 + g(g + k))

  hp = tanh(x - f·z1 - z2)·a1
  bp = g·hp + z1
  lp = g·bp + z2
  z1 = 2·tanh(bp) - z1
  z2 = 2·tanh(lp) - z2

EQ kinds solve the loop exactly (f = k + g, no tanh at the sum). The synth
loop feeds back f = k: the missing g·z1 term is a small negative damping, so
at k = 0 the loop keeps ringing and settles where the tanh stages absorb it.

| tap      | formula      | passes                |
| -------- | ------------ | --------------------- |
| low-pass | lp           | below cutoff          |
| band     | bp           | around cutoff         |
| high     | hp           | above cutoff          |
| notch    | lp + hp      | outside cutoff        |
| allpass  | lp + hp - bp | everything, phase rot |
*/

/// Lowest cutoff the filter will run at.
pub const MIN_CUTOFF_HZ: f32 = 20.0;
/// Highest cutoff as a fraction of the sample rate.
pub const MAX_CUTOFF_RATIO: f32 = 0.49;
/// EQ gain range in dB.
pub const MAX_EQ_GAIN_DB: f32 = 24.0;
/// Input drive range in dB.
pub const MAX_DRIVE_DB: f32 = 24.0;
/// Pre-gain range (linear).
pub const MAX_PRE_GAIN: f32 = 4.0;

/// The multimode input is attenuated by this much so typical program material
/// sits below the saturation knee.
const INPUT_SCALE: f32 = 0.5;
/// Makeup applied to the raw multimode taps.
const OUTPUT_MAKEUP: f32 = 2.0;
/// Per-stage resonance scale in four-pole mode.
const FOUR_POLE_RESONANCE: f32 = 0.8;

/// Response family. `MultiMode` is the synth / scope filter; the others are EQ
/// sections that mix the same three taps with gain-dependent weights.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SvfKind {
    #[default]
    MultiMode,
    LowShelf,
    HighShelf,
    Bell,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Poles {
    /// 12 dB/oct
    #[default]
    Two,
    /// 24 dB/oct, two cascaded sections
    Four,
}

/// Named filter output, selectable per scope channel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutput {
    LowPass,
    BandPass,
    HighPass,
    Notch,
    AllPass,
    Input,
}

impl FilterOutput {
    pub const ALL: [FilterOutput; 6] = [
        FilterOutput::LowPass,
        FilterOutput::BandPass,
        FilterOutput::HighPass,
        FilterOutput::Notch,
        FilterOutput::AllPass,
        FilterOutput::Input,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterOutput::LowPass => "LP",
            FilterOutput::BandPass => "BP",
            FilterOutput::HighPass => "HP",
            FilterOutput::Notch => "BR",
            FilterOutput::AllPass => "AP",
            FilterOutput::Input => "In",
        }
    }

    /// Next output in [`FilterOutput::ALL`] order, wrapping.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&o| o == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// All taps from a single processing step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    /// The unfiltered sample that produced these taps.
    pub input: f32,
}

impl FilterOutputs {
    #[inline]
    pub fn notch(&self) -> f32 {
        self.lowpass + self.highpass
    }

    #[inline]
    pub fn allpass(&self) -> f32 {
        self.lowpass + self.highpass - self.bandpass
    }

    #[inline]
    pub fn select(&self, output: FilterOutput) -> f32 {
        match output {
            FilterOutput::LowPass => self.lowpass,
            FilterOutput::BandPass => self.bandpass,
            FilterOutput::HighPass => self.highpass,
            FilterOutput::Notch => self.notch(),
            FilterOutput::AllPass => self.allpass(),
            FilterOutput::Input => self.input,
        }
    }
}

/// Integrator memory of one two-pole section.
#[derive(Debug, Clone, Copy, Default)]
struct SvfSection {
    z1: f32, // First integrator's memory
    z2: f32, // Second integrator's memory
}

impl SvfSection {
    /// One step of the section. Returns (lp, bp, hp).
    #[inline]
    fn tick(&mut self, x: f32, g: f32, k: f32, a1: f32, synth: bool) -> (f32, f32, f32) {
        let v0 = if synth {
            fast_tanh(x - k * self.z1 - self.z2)
        } else {
            x - (k + g) * self.z1 - self.z2
        };
        let hp = v0 * a1;
        let bp = g * hp + self.z1;
        let lp = g * bp + self.z2;

        self.z1 = 2.0 * fast_tanh(bp) - self.z1;
        self.z2 = 2.0 * fast_tanh(lp) - self.z2;

        (lp, bp, hp)
    }
}

pub struct StateVariableFilter {
    stage1: SvfSection,
    stage2: SvfSection,

    sample_rate: f32,
    cutoff_hz: f32,
    resonance: f32,
    pre_gain: f32,
    drive_db: f32,
    drive_gain: f32,
    kind: SvfKind,
    poles: Poles,

    // eq
    gain_db: f32,
    a: f32,
    sqrt_a: f32,

    // synth response
    lp_bp_mix: f32,
    notch_mode: bool,
    notch_offset: f32,
    passband_compensation: f32,

    g: f32,
    k: f32,
    a1: f32,
}

impl StateVariableFilter {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            stage1: SvfSection::default(),
            stage2: SvfSection::default(),
            sample_rate: sample_rate.max(1.0),
            cutoff_hz: 1000.0,
            resonance: 0.0,
            pre_gain: 1.0,
            drive_db: 0.0,
            drive_gain: 1.0,
            kind: SvfKind::MultiMode,
            poles: Poles::Two,
            gain_db: 0.0,
            a: 1.0,
            sqrt_a: 1.0,
            lp_bp_mix: 0.0,
            notch_mode: false,
            notch_offset: 0.0,
            passband_compensation: 0.0,
            g: 0.0,
            k: 2.0,
            a1: 1.0,
        };
        filter.update_coefficients();
        filter
    }

    pub fn lowpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self::new(sample_rate);
        filter.set_cutoff(cutoff_hz);
        filter
    }

    pub fn eq(sample_rate: f32, kind: SvfKind, cutoff_hz: f32, gain_db: f32) -> Self {
        let mut filter = Self::new(sample_rate);
        filter.kind = kind;
        filter.cutoff_hz = cutoff_hz;
        filter.set_gain_db(gain_db);
        filter
    }

    fn update_coefficients(&mut self) {
        self.cutoff_hz = self
            .cutoff_hz
            .clamp(MIN_CUTOFF_HZ, self.sample_rate * MAX_CUTOFF_RATIO);
        let g0 = (PI * self.cutoff_hz / self.sample_rate).tan();

        let effective_res = match self.poles {
            Poles::Two => self.resonance,
            Poles::Four => self.resonance * FOUR_POLE_RESONANCE,
        };
        let q = 0.5 + effective_res * 9.5;
        let k0 = 1.0 / q;

        let (g, k) = match self.kind {
            SvfKind::MultiMode => (g0, 2.0 * (1.0 - effective_res)),
            SvfKind::LowShelf => (g0 / self.sqrt_a, k0),
            SvfKind::HighShelf => (g0 * self.sqrt_a, k0),
            SvfKind::Bell => (g0, k0 / self.a),
        };

        self.g = g;
        self.k = k;
        self.a1 = 1.0 / (1.0 + g * (g + k));
    }

    /// Run one sample through the loop and return every raw tap.
    ///
    /// Multimode taps include the input attenuation, drive gain and output
    /// makeup; EQ taps are unscaled so the shelf/bell mixes sit at unity.
    /// Multimode high-pass is bounded to ±2 in both pole modes.
    #[inline]
    pub fn process(&mut self, input: f32) -> FilterOutputs {
        let multimode = self.kind == SvfKind::MultiMode;

        let x = if multimode {
            let driven = input * INPUT_SCALE * self.pre_gain * self.drive_gain;
            drive_shape(driven, self.drive_db)
        } else {
            input
        };

        let (lp1, bp1, hp1) = self.stage1.tick(x, self.g, self.k, self.a1, multimode);

        let (lp, bp, hp) = if multimode && self.poles == Poles::Four {
            let x2 = drive_shape(lp1, self.drive_db);
            let (lp2, bp2, _) = self.stage2.tick(x2, self.g, self.k, self.a1, true);
            // algebraic high-pass, not a true cascaded HP->HP; saturated like
            // the stage sums
            (lp2, bp2, fast_tanh(x - lp2 - self.k * bp2))
        } else {
            (lp1, bp1, hp1)
        };

        let makeup = if multimode { OUTPUT_MAKEUP } else { 1.0 };
        FilterOutputs {
            lowpass: lp * makeup,
            bandpass: bp * makeup,
            highpass: hp * makeup,
            input,
        }
    }

    /// One sample of the configured response: the LP/BP/HP crossfade (or offset
    /// notch) for `MultiMode`, the shelf / bell mix for EQ kinds.
    #[inline]
    pub fn next_sample(&mut self, input: f32) -> f32 {
        let taps = self.process(input);
        let (lp, bp, hp) = (taps.lowpass, taps.bandpass, taps.highpass);
        let a = self.a;
        let k = self.k;

        match self.kind {
            SvfKind::LowShelf => a * a * lp + a * k * bp + hp,
            SvfKind::HighShelf => lp + a * k * bp + a * a * hp,
            SvfKind::Bell => lp + a * k * bp + hp,
            SvfKind::MultiMode => {
                let out = if self.notch_mode {
                    let lp_mix = self.notch_offset * 0.5 + 0.5;
                    let makeup = 2.0 - self.notch_offset.abs();
                    makeup * (lp_mix * lp + (1.0 - lp_mix) * hp)
                } else {
                    let (lp_w, bp_w, hp_w) = crossfade_weights(self.lp_bp_mix);
                    lp_w * lp + bp_w * SQRT_2 * bp + hp_w * hp
                };

                let res_boost = match self.poles {
                    Poles::Two => 2.0 - k,
                    Poles::Four => (2.0 - k) * (2.0 - k),
                };
                out * (1.0 + self.passband_compensation * (res_boost - 1.0))
            }
        }
    }

    /// Filter a block in place through [`Self::next_sample`].
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.stage1 = SvfSection::default();
        self.stage2 = SvfSection::default();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate > 0.0 {
            self.sample_rate = sample_rate;
        }
        self.update_coefficients();
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        if cutoff_hz.is_finite() {
            self.cutoff_hz = cutoff_hz;
        }
        self.update_coefficients();
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        if resonance.is_finite() {
            self.resonance = resonance.clamp(0.0, 1.0);
        }
        self.update_coefficients();
    }

    pub fn set_pre_gain(&mut self, pre_gain: f32) {
        if pre_gain.is_finite() {
            self.pre_gain = pre_gain.clamp(0.0, MAX_PRE_GAIN);
        }
    }

    pub fn set_drive_db(&mut self, drive_db: f32) {
        if drive_db.is_finite() {
            self.drive_db = drive_db.clamp(0.0, MAX_DRIVE_DB);
        }
        self.drive_gain = db_to_gain(self.drive_db);
    }

    pub fn set_kind(&mut self, kind: SvfKind) {
        self.kind = kind;
        self.update_coefficients();
    }

    pub fn set_poles(&mut self, poles: Poles) {
        self.poles = poles;
        self.update_coefficients();
    }

    /// EQ gain in dB, clamped to ±24. Only the shelf and bell kinds use it.
    pub fn set_gain_db(&mut self, gain_db: f32) {
        if gain_db.is_finite() {
            self.gain_db = gain_db.clamp(-MAX_EQ_GAIN_DB, MAX_EQ_GAIN_DB);
        }
        self.a = db_to_gain(self.gain_db).sqrt();
        self.sqrt_a = self.a.sqrt();
        self.update_coefficients();
    }

    pub fn set_gain_linear(&mut self, gain: f32) {
        let gain = if gain.is_finite() { gain.max(0.001) } else { 1.0 };
        self.set_gain_db(gain_to_db(gain));
    }

    /// 0 = LP, 0.5 = BP, 1 = HP.
    pub fn set_lp_bp_mix(&mut self, mix: f32) {
        if mix.is_finite() {
            self.lp_bp_mix = mix.clamp(0.0, 1.0);
        }
    }

    pub fn set_notch_mode(&mut self, enabled: bool) {
        self.notch_mode = enabled;
    }

    /// -1 = HP-heavy, 0 = balanced notch, +1 = LP-heavy.
    pub fn set_notch_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.notch_offset = offset.clamp(-1.0, 1.0);
        }
    }

    pub fn set_passband_compensation(&mut self, amount: f32) {
        if amount.is_finite() {
            self.passband_compensation = amount.clamp(0.0, 1.0);
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    pub fn pre_gain(&self) -> f32 {
        self.pre_gain
    }

    pub fn drive_db(&self) -> f32 {
        self.drive_db
    }

    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    pub fn kind(&self) -> SvfKind {
        self.kind
    }

    pub fn poles(&self) -> Poles {
        self.poles
    }

    /// Current damping coefficient.
    pub fn damping(&self) -> f32 {
        self.k
    }
}

/// Equal-power LP -> BP -> HP weights.
#[inline]
fn crossfade_weights(mix: f32) -> (f32, f32, f32) {
    if mix <= 0.5 {
        let angle = mix * 2.0 * FRAC_PI_2;
        (angle.cos(), angle.sin(), 0.0)
    } else {
        let angle = (mix - 0.5) * 2.0 * FRAC_PI_2;
        (0.0, angle.cos(), angle.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::morph::FilterMorpher;
    use std::f32::consts::TAU;

    const SR: f32 = 48_000.0;

    fn sine(freq: f32, amplitude: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| amplitude * (TAU * freq * n as f32 / SR).sin())
            .collect()
    }

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(2048);
        buffer
            .get(skip..)
            .unwrap_or(buffer)
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn tap_peak(filter: &mut StateVariableFilter, input: &[f32], output: FilterOutput) -> f32 {
        let out: Vec<f32> = input
            .iter()
            .map(|&x| filter.process(x).select(output))
            .collect();
        peak_after_transient(&out)
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let mut filter = StateVariableFilter::lowpass(SR, 1_000.0);
        let mut last = 0.0;
        for _ in 0..4096 {
            last = filter.process(0.1).lowpass;
        }
        assert!((last - 0.1).abs() < 0.005, "LP DC gain off: {last}");
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let mut filter = StateVariableFilter::lowpass(SR, 1_000.0);
        let mut last = 1.0;
        for _ in 0..4096 {
            last = filter.process(0.1).highpass;
        }
        assert!(last.abs() < 0.001, "HP let DC through: {last}");
    }

    #[test]
    fn test_lowpass_filters_high_freq() {
        let mut filter = StateVariableFilter::lowpass(SR, 500.0);
        let input = sine(5_000.0, 0.1, 8192);

        let peak = tap_peak(&mut filter, &input, FilterOutput::LowPass);
        assert!(
            peak < 0.01,
            "Expected high freq attenuation, got peak: {}",
            peak
        );
    }

    #[test]
    fn test_bandpass_emphasizes_cutoff_frequency() {
        let mut filter = StateVariableFilter::lowpass(SR, 1_000.0);
        filter.set_resonance(0.5);

        let pass_peak = tap_peak(&mut filter, &sine(1_000.0, 0.1, 8192), FilterOutput::BandPass);
        filter.reset();
        let off_peak = tap_peak(&mut filter, &sine(100.0, 0.1, 8192), FilterOutput::BandPass);

        assert!(
            pass_peak > off_peak * 2.0,
            "expected bandpass to emphasize cutoff freq, got pass_peak={}, off_peak={}",
            pass_peak,
            off_peak
        );
    }

    #[test]
    fn test_notch_rejects_cutoff_frequency() {
        let mut filter = StateVariableFilter::lowpass(SR, 1_000.0);
        filter.set_resonance(0.5);

        let center_peak = tap_peak(&mut filter, &sine(1_000.0, 0.1, 8192), FilterOutput::Notch);
        filter.reset();
        let off_peak = tap_peak(&mut filter, &sine(100.0, 0.1, 8192), FilterOutput::Notch);

        assert!(
            center_peak * 2.0 < off_peak,
            "expected notch to reject center freq, got center_peak={}, off_peak={}",
            center_peak,
            off_peak
        );
    }

    #[test]
    fn test_resonance_affects_peak() {
        let input = sine(1_000.0, 0.05, 8192);

        let mut filter = StateVariableFilter::lowpass(SR, 1_000.0);
        filter.set_resonance(0.1);
        let peak_low_res = tap_peak(&mut filter, &input, FilterOutput::LowPass);

        filter.reset();
        filter.set_resonance(0.8);
        let peak_high_res = tap_peak(&mut filter, &input, FilterOutput::LowPass);

        assert!(
            peak_high_res > peak_low_res * 1.5,
            "High resonance should boost signal: high_res={}, low_res={}",
            peak_high_res,
            peak_low_res
        );
    }

    #[test]
    fn test_parameters_are_clamped() {
        let mut filter = StateVariableFilter::new(SR);
        filter.set_cutoff(1.0);
        assert_eq!(filter.cutoff(), MIN_CUTOFF_HZ);
        filter.set_cutoff(100_000.0);
        assert!((filter.cutoff() - SR * MAX_CUTOFF_RATIO).abs() < 0.01);
        filter.set_resonance(3.0);
        assert_eq!(filter.resonance(), 1.0);
        filter.set_resonance(-1.0);
        assert_eq!(filter.resonance(), 0.0);
        filter.set_pre_gain(10.0);
        assert_eq!(filter.pre_gain(), MAX_PRE_GAIN);
        filter.set_cutoff(f32::NAN);
        assert!(filter.cutoff().is_finite());
    }

    #[test]
    fn test_full_resonance_means_zero_damping() {
        let mut filter = StateVariableFilter::new(SR);
        filter.set_resonance(1.0);
        assert_eq!(filter.damping(), 0.0);

        filter.set_poles(Poles::Four);
        assert!((filter.damping() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_self_oscillation_sustains_and_stays_bounded() {
        let mut filter = StateVariableFilter::lowpass(SR, 440.0);
        filter.set_resonance(1.0);

        // kick then silence
        filter.process(1.0);
        let mut peak = 0.0f32;
        for n in 0..48_000 {
            let y = filter.process(0.0).lowpass;
            assert!(y.is_finite());
            if n > 40_000 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak > 0.01, "expected sustained ringing, got {peak}");
        assert!(peak < 4.0, "self-oscillation ran away: {peak}");
    }

    fn assert_taps_bounded(taps: &FilterOutputs, poles: Poles, n: usize) {
        assert!(
            taps.lowpass.abs() <= 4.0 && taps.bandpass.abs() <= 4.0,
            "{poles:?} diverged at sample {n}: {taps:?}"
        );
        assert!(
            taps.highpass.abs() <= 2.0,
            "{poles:?} HP diverged at sample {n}: {taps:?}"
        );
    }

    #[test]
    fn test_stability_under_parameter_sweep() {
        let mut morpher = FilterMorpher::new();
        morpher.set_split_angle(90.0);
        morpher.set_split_depth(0.5);

        for poles in [Poles::Two, Poles::Four] {
            let mut tapped = StateVariableFilter::new(SR);
            let mut mixed = StateVariableFilter::new(SR);
            for filter in [&mut tapped, &mut mixed] {
                filter.set_poles(poles);
                filter.set_pre_gain(MAX_PRE_GAIN);
            }

            for n in 0..100_000 {
                let t = n as f32 / 100_000.0;
                let cutoff = 20.0 + 2_980.0 * ((n as f32 * 0.001).sin() * 0.5 + 0.5);
                for filter in [&mut tapped, &mut mixed] {
                    filter.set_resonance(t);
                    filter.set_cutoff(cutoff);
                }
                mixed.set_lp_bp_mix((n as f32 * 0.0003).sin() * 0.5 + 0.5);
                let turn = n as f32 * 0.002;
                morpher.set_position(turn.cos(), turn.sin());

                let x = (TAU * 220.0 * n as f32 / SR).sin();
                let taps = tapped.process(x);
                assert_taps_bounded(&taps, poles, n);

                // allpass = lp + hp - bp is the widest blend
                let (mx, my) = morpher.apply_taps_xy(&taps);
                assert!(
                    mx.abs() <= 10.0 && my.abs() <= 10.0,
                    "{poles:?} morph diverged at {n}: ({mx}, {my})"
                );

                // equal-power LP/BP/HP crossfade of the bounded taps, BP at sqrt 2
                let y = mixed.next_sample(x);
                assert!(y.abs() <= 7.0, "{poles:?} next_sample diverged at {n}: {y}");
            }
        }
    }

    #[test]
    fn test_full_drive_keeps_taps_bounded() {
        for poles in [Poles::Two, Poles::Four] {
            let mut filter = StateVariableFilter::new(SR);
            filter.set_poles(poles);
            filter.set_resonance(1.0);
            filter.set_pre_gain(MAX_PRE_GAIN);
            filter.set_cutoff(800.0);

            for n in 0..25 * 4_800 {
                // one more dB every 100 ms
                filter.set_drive_db((n / 4_800) as f32);
                let x = (TAU * 110.0 * n as f32 / SR).sin();
                let taps = filter.process(x);
                assert_taps_bounded(&taps, poles, n);
            }
            assert_eq!(filter.drive_db(), MAX_DRIVE_DB);
        }
    }

    #[test]
    fn test_drive_adds_input_gain() {
        let dc_level = |drive_db: f32| {
            let mut filter = StateVariableFilter::lowpass(SR, 1_000.0);
            filter.set_drive_db(drive_db);
            let mut last = 0.0;
            for _ in 0..4096 {
                last = filter.process(0.01).lowpass;
            }
            last
        };

        let clean = dc_level(0.0);
        let driven = dc_level(12.0);
        // +12 dB is ~3.98x before the (nearly linear) tanh knee
        assert!(
            driven > clean * 3.5 && driven < clean * 4.1,
            "clean={clean}, driven={driven}"
        );
        assert_eq!(driven.signum(), clean.signum());
    }

    #[test]
    fn test_four_pole_rolls_off_faster() {
        let input = sine(8_000.0, 0.1, 8192);

        let mut two = StateVariableFilter::lowpass(SR, 1_000.0);
        let two_peak = tap_peak(&mut two, &input, FilterOutput::LowPass);

        let mut four = StateVariableFilter::lowpass(SR, 1_000.0);
        four.set_poles(Poles::Four);
        let four_peak = tap_peak(&mut four, &input, FilterOutput::LowPass);

        assert!(
            four_peak < two_peak * 0.5,
            "4-pole should attenuate more: two={two_peak}, four={four_peak}"
        );
    }

    #[test]
    fn test_taps_derive_notch_and_allpass() {
        let taps = FilterOutputs {
            lowpass: 0.5,
            bandpass: 0.25,
            highpass: -0.1,
            input: 0.7,
        };
        assert!((taps.select(FilterOutput::Notch) - 0.4).abs() < 1e-6);
        assert!((taps.select(FilterOutput::AllPass) - 0.15).abs() < 1e-6);
        assert_eq!(taps.select(FilterOutput::Input), 0.7);
    }

    #[test]
    fn test_bell_boosts_at_center() {
        let input = sine(1_000.0, 0.1, 8192);

        let mut flat = StateVariableFilter::eq(SR, SvfKind::Bell, 1_000.0, 0.0);
        let mut flat_out = input.clone();
        flat.render(&mut flat_out);
        let flat_peak = peak_after_transient(&flat_out);

        let mut boost = StateVariableFilter::eq(SR, SvfKind::Bell, 1_000.0, 12.0);
        let mut boost_out = input.clone();
        boost.render(&mut boost_out);
        let boost_peak = peak_after_transient(&boost_out);

        assert!((flat_peak - 0.1).abs() < 0.01, "flat bell not unity: {flat_peak}");
        // center gain is sqrt of the linear gain
        assert!(
            boost_peak > flat_peak * 1.8,
            "bell +12 dB should boost, flat={flat_peak}, boost={boost_peak}"
        );
    }

    #[test]
    fn test_low_shelf_cuts_lows_only() {
        let mut shelf = StateVariableFilter::eq(SR, SvfKind::LowShelf, 500.0, -12.0);
        let mut low = sine(50.0, 0.1, 16_384);
        shelf.render(&mut low);
        let low_peak = peak_after_transient(&low);

        shelf.reset();
        let mut high = sine(8_000.0, 0.1, 8192);
        shelf.render(&mut high);
        let high_peak = peak_after_transient(&high);

        assert!(low_peak < 0.05, "low shelf should cut 50 Hz: {low_peak}");
        assert!(high_peak > 0.08, "low shelf should leave 8 kHz: {high_peak}");
    }

    #[test]
    fn test_gain_linear_floor() {
        let mut filter = StateVariableFilter::new(SR);
        filter.set_gain_linear(0.0);
        assert!(filter.gain_db() >= -MAX_EQ_GAIN_DB);
        filter.set_gain_linear(4.0);
        assert!((filter.gain_db() - 12.04).abs() < 0.01);
    }

    #[test]
    fn test_crossfade_endpoints() {
        let (lp, bp, hp) = crossfade_weights(0.0);
        assert!((lp - 1.0).abs() < 1e-6 && bp.abs() < 1e-6 && hp == 0.0);
        let (lp, bp, hp) = crossfade_weights(0.5);
        assert!(lp.abs() < 1e-6 && (bp - 1.0).abs() < 1e-6 && hp == 0.0);
        let (lp, bp, hp) = crossfade_weights(1.0);
        assert!(lp == 0.0 && bp.abs() < 1e-6 && (hp - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_notch_offset_shifts_balance() {
        let input = sine(100.0, 0.05, 16_384);

        let mut lp_heavy = StateVariableFilter::lowpass(SR, 1_000.0);
        lp_heavy.set_notch_mode(true);
        lp_heavy.set_notch_offset(1.0);
        let mut a = input.clone();
        lp_heavy.render(&mut a);

        let mut hp_heavy = StateVariableFilter::lowpass(SR, 1_000.0);
        hp_heavy.set_notch_mode(true);
        hp_heavy.set_notch_offset(-1.0);
        let mut b = input.clone();
        hp_heavy.render(&mut b);

        // 100 Hz is well below cutoff: LP-heavy notch keeps it, HP-heavy drops it
        assert!(peak_after_transient(&a) > peak_after_transient(&b) * 4.0);
    }
}
