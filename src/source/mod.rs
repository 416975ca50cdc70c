//! Where the scope's samples come from.
//!
//! Everything the engine plays implements [`StereoSource`], a one-frame pull
//! interface. [`Source`] closes the set so the audio callback dispatches with
//! a `match` instead of a trait object.

pub mod clip;
pub mod signal;

pub use clip::SampleClip;
pub use signal::TestSignal;

use crate::scope::ring::StereoFrame;

pub trait StereoSource {
    /// Produce the next stereo frame.
    fn next_frame(&mut self) -> StereoFrame;

    /// Scrub by `samples` (negative rewinds) without producing output.
    fn step(&mut self, samples: i64);

    /// Back to the start.
    fn reset(&mut self);
}

#[derive(Default)]
pub enum Source {
    /// Nothing loaded: plays zeros.
    #[default]
    Silence,
    Clip(SampleClip),
    Signal(TestSignal),
}

impl Source {
    pub fn name(&self) -> &'static str {
        match self {
            Source::Silence => "silence",
            Source::Clip(_) => "file",
            Source::Signal(_) => "test signal",
        }
    }

    pub fn as_signal_mut(&mut self) -> Option<&mut TestSignal> {
        match self {
            Source::Signal(signal) => Some(signal),
            _ => None,
        }
    }
}

impl StereoSource for Source {
    #[inline]
    fn next_frame(&mut self) -> StereoFrame {
        match self {
            Source::Silence => StereoFrame::SILENT,
            Source::Clip(clip) => clip.next_frame(),
            Source::Signal(signal) => signal.next_frame(),
        }
    }

    fn step(&mut self, samples: i64) {
        match self {
            Source::Silence => {}
            Source::Clip(clip) => clip.step(samples),
            Source::Signal(signal) => signal.step(samples),
        }
    }

    fn reset(&mut self) {
        match self {
            Source::Silence => {}
            Source::Clip(clip) => clip.reset(),
            Source::Signal(signal) => signal.reset(),
        }
    }
}

impl From<SampleClip> for Source {
    fn from(clip: SampleClip) -> Self {
        Source::Clip(clip)
    }
}

impl From<TestSignal> for Source {
    fn from(signal: TestSignal) -> Self {
        Source::Signal(signal)
    }
}
