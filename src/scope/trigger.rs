use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::scope::ring::{RingReader, StereoFrame};

/*
Triggered sweep
===============

  armed ──(edge crossing, holdoff ≥ sweep)──► accept: marker := cursor, holdoff := 0
    ^                                                     │
    └──────────────── holdoff counts up every sample ◄────┘

rising  = prev ≤ threshold && cur > threshold
falling = prev ≥ threshold && cur < threshold

The accepted position is the ring cursor right after the crossing sample was
written, so a sweep read from there starts on the first sample past the edge.

The consumer prefers the newest trigger whose whole sweep is already in the
ring, falls back to the previous one while the newest is still filling, and
free-runs on the latest samples when there is no trigger or it is older than
half the ring.
*/

/// Marker value meaning "no trigger accepted yet".
pub const NO_TRIGGER: usize = usize::MAX;

pub const DEFAULT_SWEEP_LEN: usize = 1024;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerEdge {
    #[default]
    Rising,
    Falling,
}

impl TriggerEdge {
    pub fn toggled(self) -> Self {
        match self {
            TriggerEdge::Rising => TriggerEdge::Falling,
            TriggerEdge::Falling => TriggerEdge::Rising,
        }
    }

    #[inline]
    pub fn crossed(self, prev: f32, cur: f32, threshold: f32) -> bool {
        match self {
            TriggerEdge::Rising => prev <= threshold && cur > threshold,
            TriggerEdge::Falling => prev >= threshold && cur < threshold,
        }
    }
}

/// Published trigger positions. Written only by the audio thread.
#[derive(Debug)]
pub struct TriggerMarker {
    last: AtomicUsize,
    previous: AtomicUsize,
    count: AtomicU64,
}

impl TriggerMarker {
    pub fn new() -> Self {
        Self {
            last: AtomicUsize::new(NO_TRIGGER),
            previous: AtomicUsize::new(NO_TRIGGER),
            count: AtomicU64::new(0),
        }
    }

    fn publish(&self, position: usize) {
        let last = self.last.load(Ordering::Relaxed);
        self.previous.store(last, Ordering::Release);
        self.last.store(position, Ordering::Release);
        self.count.fetch_add(1, Ordering::Release);
    }

    fn clear(&self) {
        self.previous.store(NO_TRIGGER, Ordering::Release);
        self.last.store(NO_TRIGGER, Ordering::Release);
    }

    /// Most recent accepted position, if any.
    pub fn last(&self) -> Option<usize> {
        match self.last.load(Ordering::Acquire) {
            NO_TRIGGER => None,
            pos => Some(pos),
        }
    }

    pub fn previous(&self) -> Option<usize> {
        match self.previous.load(Ordering::Acquire) {
            NO_TRIGGER => None,
            pos => Some(pos),
        }
    }

    /// Accepted triggers since creation. Not reset by [`TriggerDetector::reset`].
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    /// Newest position whose `sweep_len` frames are all below `cursor`.
    pub fn latest_complete(&self, cursor: usize, sweep_len: usize) -> Option<usize> {
        let complete = |pos: usize| pos.checked_add(sweep_len).is_some_and(|end| end <= cursor);
        match (self.last(), self.previous()) {
            (Some(last), _) if complete(last) => Some(last),
            (_, Some(previous)) if complete(previous) => Some(previous),
            _ => None,
        }
    }
}

impl Default for TriggerMarker {
    fn default() -> Self {
        Self::new()
    }
}

/// Edge detector with holdoff. Lives on the audio thread.
pub struct TriggerDetector {
    marker: Arc<TriggerMarker>,
    threshold: f32,
    edge: TriggerEdge,
    sweep_len: usize,
    holdoff: usize,
    prev: f32,

    lock_enabled: bool,
    reference: Box<[f32]>,
    capture_pos: Option<usize>,
    reference_ready: bool,
}

impl TriggerDetector {
    pub fn new(sweep_len: usize, marker: Arc<TriggerMarker>) -> Self {
        let sweep_len = sweep_len.max(1);
        Self {
            marker,
            threshold: 0.0,
            edge: TriggerEdge::Rising,
            sweep_len,
            holdoff: sweep_len,
            prev: 0.0,
            lock_enabled: true,
            reference: vec![0.0; sweep_len].into_boxed_slice(),
            capture_pos: None,
            reference_ready: false,
        }
    }

    /// Clamped to `[-1, 1]`.
    pub fn set_threshold(&mut self, threshold: f32) {
        if threshold.is_finite() {
            self.threshold = threshold.clamp(-1.0, 1.0);
        }
    }

    pub fn set_edge(&mut self, edge: TriggerEdge) {
        self.edge = edge;
    }

    /// Enables capture of the reference sweep after each accepted trigger.
    pub fn set_lock_enabled(&mut self, enabled: bool) {
        self.lock_enabled = enabled;
        if !enabled {
            self.capture_pos = None;
        }
    }

    /// Feed one scope sample. `cursor` is the ring cursor after that sample
    /// was written. Returns true if a trigger was accepted.
    #[inline]
    pub fn process(&mut self, sample: f32, cursor: usize) -> bool {
        if let Some(pos) = self.capture_pos {
            self.reference[pos] = sample;
            if pos + 1 == self.sweep_len {
                self.capture_pos = None;
                self.reference_ready = true;
            } else {
                self.capture_pos = Some(pos + 1);
            }
        }

        self.holdoff = self.holdoff.saturating_add(1);
        let crossed = self.edge.crossed(self.prev, sample, self.threshold);
        self.prev = sample;

        if crossed && self.holdoff >= self.sweep_len {
            self.holdoff = 0;
            self.marker.publish(cursor);
            if self.lock_enabled {
                self.capture_pos = Some(0);
            }
            return true;
        }
        false
    }

    /// Back to the armed state with no published trigger.
    pub fn reset(&mut self) {
        self.holdoff = self.sweep_len;
        self.prev = 0.0;
        self.capture_pos = None;
        self.reference_ready = false;
        self.marker.clear();
    }

    /// The sweep that followed the last fully captured trigger.
    pub fn reference(&self) -> Option<&[f32]> {
        self.reference_ready.then_some(&self.reference[..])
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn edge(&self) -> TriggerEdge {
        self.edge
    }

    pub fn sweep_len(&self) -> usize {
        self.sweep_len
    }

    pub fn marker(&self) -> &Arc<TriggerMarker> {
        &self.marker
    }
}

/// Fill `out` with one sweep starting at the newest usable trigger.
///
/// Returns `true` when the sweep is aligned to a trigger and `false` when it
/// free-ran on the most recent samples instead.
pub fn read_triggered_sweep(
    reader: &RingReader,
    marker: &TriggerMarker,
    out: &mut [StereoFrame],
) -> bool {
    let cursor = reader.cursor();
    // a trigger newer than this cursor is incomplete, so pos <= cursor below
    let chosen = marker.latest_complete(cursor, out.len());

    let stale_after = reader.capacity() / 2;
    match chosen {
        Some(pos) if cursor - pos <= stale_after => {
            reader.read_from_into(pos, out);
            true
        }
        _ => {
            reader.read_range_into(0, out);
            false
        }
    }
}
