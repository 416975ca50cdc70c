//! Sample history and triggering shared between the audio thread and the
//! display.

pub mod ring;
pub mod trigger;

pub use ring::{sample_ring, RingReader, RingWriter, StereoFrame};
pub use trigger::{read_triggered_sweep, TriggerDetector, TriggerEdge, TriggerMarker};
