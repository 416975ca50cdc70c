use crate::scope::ring::StereoFrame;
use crate::source::StereoSource;

/// Pre-decoded stereo audio, played back in a loop.
///
/// Playback reads the frames at `source_rate / output_rate` frames per output
/// sample with linear interpolation, so a 44.1 kHz file plays at pitch on a
/// 48 kHz stream. An empty clip plays silence.
#[derive(Debug, Clone)]
pub struct SampleClip {
    frames: Vec<StereoFrame>,
    source_rate: u32,
    channels: u16,
    position: f64,
    step: f64,
    looping: bool,
}

impl SampleClip {
    pub fn new(frames: Vec<StereoFrame>, source_rate: u32) -> Self {
        Self {
            frames,
            source_rate: source_rate.max(1),
            channels: 2,
            position: 0.0,
            step: 1.0,
            looping: true,
        }
    }

    /// Interleaved samples with `channels` per frame. Mono is duplicated to both
    /// sides; channels past the second are dropped.
    pub fn from_interleaved(samples: &[f32], channels: u16, source_rate: u32) -> Self {
        let channels_usize = channels.max(1) as usize;
        let frames = samples
            .chunks_exact(channels_usize)
            .map(|frame| match frame {
                [mono] => StereoFrame::new(*mono, *mono),
                [left, right, ..] => StereoFrame::new(*left, *right),
                [] => StereoFrame::SILENT,
            })
            .collect();

        let mut clip = Self::new(frames, source_rate);
        clip.channels = channels.max(1);
        clip
    }

    /// Rate the engine will pull frames at.
    pub fn set_output_rate(&mut self, output_rate: f32) {
        if output_rate > 0.0 && output_rate.is_finite() {
            self.step = self.source_rate as f64 / output_rate as f64;
        }
    }

    pub fn with_output_rate(mut self, output_rate: f32) -> Self {
        self.set_output_rate(output_rate);
        self
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Move the play head by `delta` output samples. Wraps both ways.
    pub fn seek(&mut self, delta: i64) {
        if self.frames.is_empty() {
            return;
        }
        let len = self.frames.len() as f64;
        let moved = self.position + delta as f64 * self.step;
        self.position = moved.rem_euclid(len);
        if self.position >= len {
            self.position = 0.0;
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn source_rate(&self) -> u32 {
        self.source_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Play head in source frames.
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames.len() as f64 / self.source_rate as f64
    }
}

impl StereoSource for SampleClip {
    #[inline]
    fn next_frame(&mut self) -> StereoFrame {
        let len = self.frames.len();
        if len == 0 || (!self.looping && self.position >= len as f64) {
            return StereoFrame::SILENT;
        }

        let index = self.position as usize;
        let frac = (self.position - index as f64) as f32;
        let a = self.frames[index.min(len - 1)];
        let b = if index + 1 < len {
            self.frames[index + 1]
        } else if self.looping {
            self.frames[0]
        } else {
            a
        };
        let frame = StereoFrame::new(
            a.left + frac * (b.left - a.left),
            a.right + frac * (b.right - a.right),
        );

        self.position += self.step;
        if self.looping && self.position >= len as f64 {
            self.position -= len as f64;
            if self.position >= len as f64 {
                self.position = 0.0;
            }
        }
        frame
    }

    fn step(&mut self, samples: i64) {
        self.seek(samples);
    }

    fn reset(&mut self) {
        self.position = 0.0;
    }
}
