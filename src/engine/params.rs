use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::ParamDefaults;
use crate::dsp::filter::Poles;
use crate::scope::trigger::TriggerEdge;

pub const MIN_CUTOFF_HZ: f32 = 20.0;
pub const MAX_CUTOFF_HZ: f32 = 3_000.0;
pub const MAX_PRE_GAIN: f32 = 4.0;
pub const MAX_SPLIT_ANGLE: f32 = 180.0;

/// f32 stored as its bit pattern.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn load(&self, order: Ordering) -> f32 {
        f32::from_bits(self.0.load(order))
    }

    #[inline]
    pub fn store(&self, value: f32, order: Ordering) {
        self.0.store(value.to_bits(), order);
    }
}

/// Where the two scope channels come from when the filter is on.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeRouting {
    /// X = raw input and Y = morphed output, or both morphed when a split is set.
    #[default]
    Morph,
    /// X and Y taps picked by the stereo router preset.
    Router,
}

impl ScopeRouting {
    fn to_u8(self) -> u8 {
        match self {
            ScopeRouting::Morph => 0,
            ScopeRouting::Router => 1,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => ScopeRouting::Router,
            _ => ScopeRouting::Morph,
        }
    }
}

/*
Shared parameter block
======================

Single writer per field:

| fields                         | written by     | read by        |
| ------------------------------ | -------------- | -------------- |
| everything except current_gain | control thread | audio thread   |
| current_gain                   | audio thread   | control thread |

Setters clamp and store with Release; the audio thread loads with Acquire at
the top of every sample. Fields are independent: two setters called back to
back may land on different samples.
*/
#[derive(Debug)]
pub struct ScopeParams {
    cutoff: AtomicF32,
    resonance: AtomicF32,
    pre_gain: AtomicF32,
    volume: AtomicF32,
    threshold: AtomicF32,
    split_angle: AtomicF32,
    split_depth: AtomicF32,
    morph_x: AtomicF32,
    morph_y: AtomicF32,

    signal_frequency: AtomicF32,
    signal_detune: AtomicF32,
    signal_beta: AtomicF32,
    signal_exponent: AtomicU32,

    rising_edge: AtomicBool,
    waveform_lock: AtomicBool,
    filter_enabled: AtomicBool,
    four_pole: AtomicBool,
    routing: AtomicU8,
    paused: AtomicBool,
    shutting_down: AtomicBool,

    current_gain: AtomicF32,
}

#[inline]
fn store_clamped(atom: &AtomicF32, value: f32, lo: f32, hi: f32) {
    if value.is_finite() {
        atom.store(value.clamp(lo, hi), Ordering::Release);
    }
}

impl ScopeParams {
    pub fn new(defaults: &ParamDefaults) -> Self {
        let params = Self {
            cutoff: AtomicF32::new(150.0),
            resonance: AtomicF32::new(1.0),
            pre_gain: AtomicF32::new(1.0),
            volume: AtomicF32::new(0.5),
            threshold: AtomicF32::new(0.0),
            split_angle: AtomicF32::new(0.0),
            split_depth: AtomicF32::new(0.0),
            morph_x: AtomicF32::new(0.0),
            morph_y: AtomicF32::new(0.0),
            signal_frequency: AtomicF32::new(80.0),
            signal_detune: AtomicF32::new(1.003),
            signal_beta: AtomicF32::new(0.0),
            signal_exponent: AtomicU32::new(1),
            rising_edge: AtomicBool::new(true),
            waveform_lock: AtomicBool::new(true),
            filter_enabled: AtomicBool::new(true),
            four_pole: AtomicBool::new(false),
            routing: AtomicU8::new(ScopeRouting::Morph.to_u8()),
            paused: AtomicBool::new(false),
            shutting_down: AtomicBool::new(false),
            current_gain: AtomicF32::new(0.0),
        };

        // route defaults through the setters so they get the same clamping
        params.set_cutoff(defaults.cutoff);
        params.set_resonance(defaults.resonance);
        params.set_pre_gain(defaults.pre_gain);
        params.set_volume(defaults.volume);
        params.set_threshold(defaults.threshold);
        params.set_trigger_edge(defaults.trigger_edge);
        params.set_waveform_lock(defaults.waveform_lock);
        params.set_filter_enabled(defaults.filter_enabled);
        params.set_split_angle(defaults.split_angle);
        params.set_split_depth(defaults.split_depth);
        params.set_morph_position(defaults.morph_x, defaults.morph_y);
        params.set_poles(defaults.poles);
        params.set_routing(defaults.routing);
        params.set_signal_frequency(defaults.signal_frequency);
        params.set_signal_detune(defaults.signal_detune);
        params.set_signal_beta(defaults.signal_beta);
        params.set_signal_exponent(defaults.signal_exponent);
        params
    }

    // setters (control thread)

    /// Hz, clamped to `[20, 3000]`.
    pub fn set_cutoff(&self, hz: f32) {
        store_clamped(&self.cutoff, hz, MIN_CUTOFF_HZ, MAX_CUTOFF_HZ);
    }

    pub fn set_resonance(&self, resonance: f32) {
        store_clamped(&self.resonance, resonance, 0.0, 1.0);
    }

    pub fn set_pre_gain(&self, gain: f32) {
        store_clamped(&self.pre_gain, gain, 0.0, MAX_PRE_GAIN);
    }

    pub fn set_volume(&self, volume: f32) {
        store_clamped(&self.volume, volume, 0.0, 1.0);
    }

    pub fn set_threshold(&self, threshold: f32) {
        store_clamped(&self.threshold, threshold, -1.0, 1.0);
    }

    /// Degrees, clamped to `[-180, 180]`.
    pub fn set_split_angle(&self, degrees: f32) {
        store_clamped(&self.split_angle, degrees, -MAX_SPLIT_ANGLE, MAX_SPLIT_ANGLE);
    }

    pub fn set_split_depth(&self, depth: f32) {
        store_clamped(&self.split_depth, depth, 0.0, 1.0);
    }

    /// Each axis clamped to `[-1, 1]`; the morpher pulls the point into the
    /// unit disc.
    pub fn set_morph_position(&self, x: f32, y: f32) {
        store_clamped(&self.morph_x, x, -1.0, 1.0);
        store_clamped(&self.morph_y, y, -1.0, 1.0);
    }

    pub fn set_signal_frequency(&self, hz: f32) {
        use crate::source::signal::{MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ};
        store_clamped(&self.signal_frequency, hz, MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ);
    }

    pub fn set_signal_detune(&self, ratio: f32) {
        use crate::source::signal::{MAX_DETUNE, MIN_DETUNE};
        store_clamped(&self.signal_detune, ratio, MIN_DETUNE, MAX_DETUNE);
    }

    pub fn set_signal_beta(&self, beta: f32) {
        use crate::source::signal::{MAX_BETA, MIN_BETA};
        store_clamped(&self.signal_beta, beta, MIN_BETA, MAX_BETA);
    }

    pub fn set_signal_exponent(&self, exponent: u32) {
        use crate::source::signal::{MAX_EXPONENT, MIN_EXPONENT};
        self.signal_exponent
            .store(exponent.clamp(MIN_EXPONENT, MAX_EXPONENT), Ordering::Release);
    }

    pub fn set_trigger_edge(&self, edge: TriggerEdge) {
        self.rising_edge
            .store(edge == TriggerEdge::Rising, Ordering::Release);
    }

    pub fn set_waveform_lock(&self, enabled: bool) {
        self.waveform_lock.store(enabled, Ordering::Release);
    }

    pub fn set_filter_enabled(&self, enabled: bool) {
        self.filter_enabled.store(enabled, Ordering::Release);
    }

    pub fn set_poles(&self, poles: Poles) {
        self.four_pole.store(poles == Poles::Four, Ordering::Release);
    }

    pub fn set_routing(&self, routing: ScopeRouting) {
        self.routing.store(routing.to_u8(), Ordering::Release);
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
    }

    pub(crate) fn begin_shutdown(&self) {
        self.shutting_down.store(true, Ordering::Release);
    }

    pub(crate) fn publish_gain(&self, gain: f32) {
        self.current_gain.store(gain, Ordering::Release);
    }

    // getters (either side)

    pub fn cutoff(&self) -> f32 {
        self.cutoff.load(Ordering::Acquire)
    }

    pub fn resonance(&self) -> f32 {
        self.resonance.load(Ordering::Acquire)
    }

    pub fn pre_gain(&self) -> f32 {
        self.pre_gain.load(Ordering::Acquire)
    }

    pub fn volume(&self) -> f32 {
        self.volume.load(Ordering::Acquire)
    }

    pub fn threshold(&self) -> f32 {
        self.threshold.load(Ordering::Acquire)
    }

    pub fn split_angle(&self) -> f32 {
        self.split_angle.load(Ordering::Acquire)
    }

    pub fn split_depth(&self) -> f32 {
        self.split_depth.load(Ordering::Acquire)
    }

    pub fn morph_position(&self) -> (f32, f32) {
        (
            self.morph_x.load(Ordering::Acquire),
            self.morph_y.load(Ordering::Acquire),
        )
    }

    pub fn signal_frequency(&self) -> f32 {
        self.signal_frequency.load(Ordering::Acquire)
    }

    pub fn signal_detune(&self) -> f32 {
        self.signal_detune.load(Ordering::Acquire)
    }

    pub fn signal_beta(&self) -> f32 {
        self.signal_beta.load(Ordering::Acquire)
    }

    pub fn signal_exponent(&self) -> u32 {
        self.signal_exponent.load(Ordering::Acquire)
    }

    pub fn trigger_edge(&self) -> TriggerEdge {
        if self.rising_edge.load(Ordering::Acquire) {
            TriggerEdge::Rising
        } else {
            TriggerEdge::Falling
        }
    }

    pub fn waveform_lock(&self) -> bool {
        self.waveform_lock.load(Ordering::Acquire)
    }

    pub fn filter_enabled(&self) -> bool {
        self.filter_enabled.load(Ordering::Acquire)
    }

    pub fn poles(&self) -> Poles {
        if self.four_pole.load(Ordering::Acquire) {
            Poles::Four
        } else {
            Poles::Two
        }
    }

    pub fn routing(&self) -> ScopeRouting {
        ScopeRouting::from_u8(self.routing.load(Ordering::Acquire))
    }

    pub fn paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Acquire)
    }

    /// Output gain at the end of the last audio callback.
    pub fn current_gain(&self) -> f32 {
        self.current_gain.load(Ordering::Acquire)
    }
}

impl Default for ScopeParams {
    fn default() -> Self {
        Self::new(&ParamDefaults::default())
    }
}
