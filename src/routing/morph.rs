use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::dsp::filter::FilterOutputs;

/*
Filter Morphing
===============

A 2D control point picks "which filter" by its angle and "how much filter"
by its distance from the center.

                    BP (π/2)
                       │
          LP (π) ──────┼────── HP (0)
                       │
                    BR (3π/2)

Each role owns a quarter-circle window:

  w(role) = cos(min(4·d, 1)·π/2)²      d = circular distance in turns

Neighbouring windows are complementary (cos² + sin² = 1), so the four weights
always sum to 1 before normalization. HP sits on the 0 / 2π seam and takes the
max of its window evaluated at both ends.

Radius blends between a phase-only allpass (r = 0, lp + hp - bp) and the
weighted mix (r = 1):

  out = (1 - r)·allpass + r·(w_lp·lp + w_bp·bp + w_hp·hp + w_br·(lp + hp))

Split
-----
The Y channel is the same computation at a second point: rotated by the split
angle and pulled toward the center by the split depth.

  y_angle  = x_angle + split_angle   (wrapped)
  y_radius = x_radius·(1 - depth)
*/

/// Added to the weight sum before normalizing so it never divides by zero.
const WEIGHT_FLOOR: f32 = 0.0001;

/// Split angle/depth below these count as "no split".
const SPLIT_ANGLE_EPSILON: f32 = 0.01;
const SPLIT_DEPTH_EPSILON: f32 = 0.01;

/// Crossfade weights for the four morph roles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphWeights {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
}

impl MorphWeights {
    /// Weights at a normalized angle in radians.
    pub fn at_angle(angle: f32) -> Self {
        let a = angle / TAU;

        let highpass = window(0.0, a).max(window(1.0, a));
        let bandpass = window(0.25, a);
        let lowpass = window(0.5, a);
        let notch = window(0.75, a);

        let sum = lowpass + bandpass + highpass + notch + WEIGHT_FLOOR;
        Self {
            lowpass: lowpass / sum,
            bandpass: bandpass / sum,
            highpass: highpass / sum,
            notch: notch / sum,
        }
    }

    pub fn sum(&self) -> f32 {
        self.lowpass + self.bandpass + self.highpass + self.notch
    }

    #[inline]
    fn mix(&self, radius: f32, lp: f32, bp: f32, hp: f32) -> f32 {
        let notch = lp + hp;
        let allpass = lp + hp - bp;
        let filtered =
            self.lowpass * lp + self.bandpass * bp + self.highpass * hp + self.notch * notch;
        (1.0 - radius) * allpass + radius * filtered
    }
}

impl Default for MorphWeights {
    fn default() -> Self {
        Self::at_angle(0.0)
    }
}

/// Squared-cosine window around `center`, both in turns.
#[inline]
fn window(center: f32, a: f32) -> f32 {
    let mut dist = (a - center).abs();
    if dist > 0.5 {
        dist = 1.0 - dist;
    }
    let w = ((dist * 4.0).min(1.0) * FRAC_PI_2).cos();
    (w * w).max(0.0)
}

#[inline]
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Polar filter-morph controller with a derived Y-channel weight set.
///
/// Position, split and weights are recomputed on every setter, so
/// [`FilterMorpher::apply`] and [`FilterMorpher::apply_xy`] are a handful of
/// multiply-adds per sample.
#[derive(Debug, Clone)]
pub struct FilterMorpher {
    pos_x: f32,
    pos_y: f32,
    radius: f32,
    angle: f32,
    weights: MorphWeights,

    split_angle: f32, // radians
    split_depth: f32,

    radius_y: f32,
    angle_y: f32,
    weights_y: MorphWeights,
}

impl FilterMorpher {
    pub fn new() -> Self {
        let mut morpher = Self {
            pos_x: 0.0,
            pos_y: 0.0,
            radius: 0.0,
            angle: 0.0,
            weights: MorphWeights::default(),
            split_angle: 0.0,
            split_depth: 0.0,
            radius_y: 0.0,
            angle_y: 0.0,
            weights_y: MorphWeights::default(),
        };
        morpher.update_weights();
        morpher
    }

    /// Move the control point. Points outside the unit disc are pulled back
    /// onto its edge along the same direction.
    pub fn set_position(&mut self, x: f32, y: f32) {
        let (mut x, mut y) = if x.is_finite() && y.is_finite() {
            (x, y)
        } else {
            (0.0, 0.0)
        };

        let dist = (x * x + y * y).sqrt();
        if dist > 1.0 {
            x /= dist;
            y /= dist;
        }
        self.pos_x = x;
        self.pos_y = y;
        self.update_weights();
    }

    /// Rotation of the Y point relative to X, in degrees. Clamped to ±180.
    pub fn set_split_angle(&mut self, degrees: f32) {
        if degrees.is_finite() {
            self.split_angle = degrees.clamp(-180.0, 180.0).to_radians();
        }
        self.update_y_weights();
    }

    /// 0 leaves the Y radius alone, 1 pins Y to the center (allpass).
    pub fn set_split_depth(&mut self, depth: f32) {
        if depth.is_finite() {
            self.split_depth = depth.clamp(0.0, 1.0);
        }
        self.update_y_weights();
    }

    pub fn has_split(&self) -> bool {
        self.split_angle.abs() > SPLIT_ANGLE_EPSILON || self.split_depth > SPLIT_DEPTH_EPSILON
    }

    /// Blend of the raw taps at the primary (X) position.
    #[inline]
    pub fn apply(&self, lp: f32, bp: f32, hp: f32) -> f32 {
        self.weights.mix(self.radius, lp, bp, hp)
    }

    /// Blend at both the X position and the split-derived Y position.
    #[inline]
    pub fn apply_xy(&self, lp: f32, bp: f32, hp: f32) -> (f32, f32) {
        (
            self.weights.mix(self.radius, lp, bp, hp),
            self.weights_y.mix(self.radius_y, lp, bp, hp),
        )
    }

    #[inline]
    pub fn apply_taps(&self, taps: &FilterOutputs) -> f32 {
        self.apply(taps.lowpass, taps.bandpass, taps.highpass)
    }

    #[inline]
    pub fn apply_taps_xy(&self, taps: &FilterOutputs) -> (f32, f32) {
        self.apply_xy(taps.lowpass, taps.bandpass, taps.highpass)
    }

    fn update_weights(&mut self) {
        self.radius = (self.pos_x * self.pos_x + self.pos_y * self.pos_y)
            .sqrt()
            .min(1.0);

        let angle = self.pos_y.atan2(self.pos_x);
        self.angle = if angle < 0.0 { angle + TAU } else { angle };
        self.angle = wrap_angle(self.angle);

        self.weights = MorphWeights::at_angle(self.angle);
        self.update_y_weights();
    }

    fn update_y_weights(&mut self) {
        self.angle_y = wrap_angle(self.angle + self.split_angle);
        self.radius_y = self.radius * (1.0 - self.split_depth);
        self.weights_y = MorphWeights::at_angle(self.angle_y);
    }

    pub fn position(&self) -> (f32, f32) {
        (self.pos_x, self.pos_y)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Primary angle in `[0, 2π)`.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn split_angle_degrees(&self) -> f32 {
        self.split_angle * 180.0 / PI
    }

    pub fn split_depth(&self) -> f32 {
        self.split_depth
    }

    pub fn weights(&self) -> MorphWeights {
        self.weights
    }

    pub fn weights_y(&self) -> MorphWeights {
        self.weights_y
    }

    pub fn radius_y(&self) -> f32 {
        self.radius_y
    }

    pub fn angle_y(&self) -> f32 {
        self.angle_y
    }
}

impl Default for FilterMorpher {
    fn default() -> Self {
        Self::new()
    }
}
