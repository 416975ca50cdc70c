#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::filter::{FilterOutput, FilterOutputs};

/*
Stereo split presets
====================

Each preset sends one filter tap to X and another to Y. Different taps of
the same filter sit at fixed phase offsets from each other around the cutoff,
which is what turns a mono signal into an ellipse, flower or knot on an X/Y
display.

| preset   | X  | Y  | look                                   |
| -------- | -- | -- | -------------------------------------- |
| LpHp     | LP | HP | classic ellipses (fc 40-80, Q 0.7)     |
| BpAp     | BP | AP | swirling shapes (fc 150-250, Q 1.0)    |
| BrAp     | BR | AP | geometric patterns (fc 300-800, Q 1.2) |
| LpBp     | LP | BP | soft loops (fc 100-200, Q 0.8)         |
| ApHp     | AP | HP | phase + edge (fc 20-40, Q 0.5)         |
| BpBr     | BP | BR | complementary bands                    |
| InMorph  | In | LP | raw vs filtered                        |
| Custom   | -  | -  | whatever was selected by hand          |
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    #[default]
    LpHp,
    BpAp,
    BrAp,
    LpBp,
    ApHp,
    BpBr,
    InMorph,
    Custom,
}

impl SplitMode {
    /// Cycle order. `Custom` is part of the cycle and keeps the current taps.
    pub const ALL: [SplitMode; 8] = [
        SplitMode::LpHp,
        SplitMode::BpAp,
        SplitMode::BrAp,
        SplitMode::LpBp,
        SplitMode::ApHp,
        SplitMode::BpBr,
        SplitMode::InMorph,
        SplitMode::Custom,
    ];

    /// The (X, Y) taps a preset selects. `None` for `Custom`.
    pub fn outputs(self) -> Option<(FilterOutput, FilterOutput)> {
        use FilterOutput::*;
        match self {
            SplitMode::LpHp => Some((LowPass, HighPass)),
            SplitMode::BpAp => Some((BandPass, AllPass)),
            SplitMode::BrAp => Some((Notch, AllPass)),
            SplitMode::LpBp => Some((LowPass, BandPass)),
            SplitMode::ApHp => Some((AllPass, HighPass)),
            SplitMode::BpBr => Some((BandPass, Notch)),
            SplitMode::InMorph => Some((Input, LowPass)),
            SplitMode::Custom => None,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            SplitMode::LpHp => "LP/HP Retro",
            SplitMode::BpAp => "BP/AP Flowers",
            SplitMode::BrAp => "BR/AP Kaleidoscope",
            SplitMode::LpBp => "LP/BP Organic",
            SplitMode::ApHp => "AP/HP Liquid",
            SplitMode::BpBr => "BP/BR Complement",
            SplitMode::InMorph => "In/Morph Live",
            SplitMode::Custom => "Custom",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SplitMode::LpHp => "Classic ellipses (fc 40-80, Q 0.7)",
            SplitMode::BpAp => "Swirling shapes (fc 150-250, Q 1.0)",
            SplitMode::BrAp => "Geometric patterns (fc 300-800, Q 1.2)",
            SplitMode::LpBp => "Soft loops (fc 100-200, Q 0.8)",
            SplitMode::ApHp => "Phase + edge (fc 20-40, Q 0.5)",
            SplitMode::BpBr => "Complementary bands",
            SplitMode::InMorph => "X=raw, Y=filtered",
            SplitMode::Custom => "Manual X/Y selection",
        }
    }
}

/// Pure selection layer: picks one tap for X and one for Y out of a single
/// filter step.
#[derive(Debug, Clone, Copy)]
pub struct StereoFilterRouter {
    mode: SplitMode,
    x_output: FilterOutput,
    y_output: FilterOutput,
}

impl StereoFilterRouter {
    pub fn new(mode: SplitMode) -> Self {
        let mut router = Self {
            mode: SplitMode::LpHp,
            x_output: FilterOutput::LowPass,
            y_output: FilterOutput::HighPass,
        };
        router.set_split_mode(mode);
        router
    }

    pub fn set_split_mode(&mut self, mode: SplitMode) {
        self.mode = mode;
        if let Some((x, y)) = mode.outputs() {
            self.x_output = x;
            self.y_output = y;
        }
    }

    pub fn cycle(&mut self) {
        self.set_split_mode(self.mode.next());
    }

    /// Selecting a tap by hand leaves any preset.
    pub fn set_x_output(&mut self, output: FilterOutput) {
        self.x_output = output;
        self.mode = SplitMode::Custom;
    }

    pub fn set_y_output(&mut self, output: FilterOutput) {
        self.y_output = output;
        self.mode = SplitMode::Custom;
    }

    #[inline]
    pub fn route(&self, taps: &FilterOutputs) -> (f32, f32) {
        (taps.select(self.x_output), taps.select(self.y_output))
    }

    pub fn split_mode(&self) -> SplitMode {
        self.mode
    }

    pub fn x_output(&self) -> FilterOutput {
        self.x_output
    }

    pub fn y_output(&self) -> FilterOutput {
        self.y_output
    }
}

impl Default for StereoFilterRouter {
    fn default() -> Self {
        Self::new(SplitMode::default())
    }
}
