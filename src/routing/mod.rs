//! Turning one filter step into two scope channels.
//!
//! [`morph::FilterMorpher`] blends the taps continuously from a polar control
//! position; [`router::StereoFilterRouter`] picks discrete taps from a preset
//! table. Neither adds DSP state of its own.

pub mod morph;
pub mod router;

pub use morph::{FilterMorpher, MorphWeights};
pub use router::{SplitMode, StereoFilterRouter};
