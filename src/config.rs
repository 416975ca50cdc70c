#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::filter::Poles;
use crate::engine::params::ScopeRouting;
use crate::scope::ring::DEFAULT_CAPACITY;
use crate::scope::trigger::{TriggerEdge, DEFAULT_SWEEP_LEN};

/// Starting values for every shared parameter.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDefaults {
    pub cutoff: f32,
    pub resonance: f32,
    pub pre_gain: f32,
    pub volume: f32,
    pub threshold: f32,
    pub trigger_edge: TriggerEdge,
    pub waveform_lock: bool,
    pub filter_enabled: bool,
    pub split_angle: f32,
    pub split_depth: f32,
    pub morph_x: f32,
    pub morph_y: f32,
    pub poles: Poles,
    pub routing: ScopeRouting,
    pub signal_frequency: f32,
    pub signal_detune: f32,
    pub signal_beta: f32,
    pub signal_exponent: u32,
}

impl Default for ParamDefaults {
    fn default() -> Self {
        Self {
            cutoff: 150.0,
            resonance: 1.0,
            pre_gain: 1.0,
            volume: 0.5,
            threshold: 0.0,
            trigger_edge: TriggerEdge::Rising,
            waveform_lock: true,
            filter_enabled: true,
            split_angle: 0.0,
            split_depth: 0.0,
            morph_x: 0.0,
            morph_y: 0.0,
            poles: Poles::Two,
            routing: ScopeRouting::Morph,
            signal_frequency: 80.0,
            signal_detune: 1.003,
            signal_beta: 0.0,
            signal_exponent: 1,
        }
    }
}

/// Deployment decisions for one engine instance.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    /// Rounded up to a power of two by the ring.
    pub ring_capacity: usize,
    /// Capped at a quarter of the rounded ring capacity.
    pub sweep_len: usize,
    /// Seconds for a full 0 → 1 gain swing.
    pub ramp_time: f32,
    pub message_capacity: usize,
    pub params: ParamDefaults,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            ring_capacity: DEFAULT_CAPACITY,
            sweep_len: DEFAULT_SWEEP_LEN,
            ramp_time: 0.05,
            message_capacity: 64,
            params: ParamDefaults::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_ring_capacity(mut self, capacity: usize) -> Self {
        self.ring_capacity = capacity;
        self
    }

    pub fn with_sweep_len(mut self, sweep_len: usize) -> Self {
        self.sweep_len = sweep_len;
        self
    }

    pub fn with_ramp_time(mut self, seconds: f32) -> Self {
        self.ramp_time = seconds;
        self
    }

    pub fn with_message_capacity(mut self, capacity: usize) -> Self {
        self.message_capacity = capacity;
        self
    }

    pub fn with_params(mut self, params: ParamDefaults) -> Self {
        self.params = params;
        self
    }
}
