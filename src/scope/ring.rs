use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

/*
Lock-free stereo history
========================

  writer (audio thread)                 readers (render / tests)
  ─────────────────────                 ────────────────────────
  store L/R at slot[W & mask]           W = cursor.load(Acquire)
  cursor.store(W + 1, Release) ───────► every slot below W is visible

The cursor counts every frame ever written and never moves backward. The slot
for absolute index i is `i & mask`, so only the last `capacity` indices are
still in storage; anything older has been overwritten and reads back as
silence, as does anything not yet written.

Samples are stored as f32 bit patterns in AtomicU32 so readers can race the
writer without undefined behavior. A reader that overlaps a write may see one
half-updated frame, which on a scope is a single stray dot.
*/

pub const DEFAULT_CAPACITY: usize = 16_384;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    pub const SILENT: StereoFrame = StereoFrame {
        left: 0.0,
        right: 0.0,
    };

    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }
}

struct RingStorage {
    left: Box<[AtomicU32]>,
    right: Box<[AtomicU32]>,
    cursor: AtomicUsize,
    mask: usize,
}

impl RingStorage {
    #[inline]
    fn load(&self, index: usize) -> StereoFrame {
        let slot = index & self.mask;
        StereoFrame {
            left: f32::from_bits(self.left[slot].load(Ordering::Relaxed)),
            right: f32::from_bits(self.right[slot].load(Ordering::Relaxed)),
        }
    }

    fn capacity(&self) -> usize {
        self.mask + 1
    }
}

/// Create a ring with room for `capacity` frames, rounded up to a power of two.
pub fn sample_ring(capacity: usize) -> (RingWriter, RingReader) {
    let rounded = capacity.max(2).next_power_of_two();
    if rounded != capacity {
        log::info!("sample ring capacity {capacity} rounded to {rounded}");
    }

    let zeroed = || {
        (0..rounded)
            .map(|_| AtomicU32::new(0.0f32.to_bits()))
            .collect::<Vec<_>>()
            .into_boxed_slice()
    };

    let storage = Arc::new(RingStorage {
        left: zeroed(),
        right: zeroed(),
        cursor: AtomicUsize::new(0),
        mask: rounded - 1,
    });

    (
        RingWriter {
            storage: Arc::clone(&storage),
        },
        RingReader { storage },
    )
}

/// The single producer. Not `Clone`; owning it is the right to write.
pub struct RingWriter {
    storage: Arc<RingStorage>,
}

impl RingWriter {
    /// Append one frame and publish it.
    #[inline]
    pub fn write(&mut self, left: f32, right: f32) {
        let storage = &*self.storage;
        let cursor = storage.cursor.load(Ordering::Relaxed);
        let slot = cursor & storage.mask;
        storage.left[slot].store(left.to_bits(), Ordering::Relaxed);
        storage.right[slot].store(right.to_bits(), Ordering::Relaxed);
        storage.cursor.store(cursor.wrapping_add(1), Ordering::Release);
    }

    #[inline]
    pub fn write_frame(&mut self, frame: StereoFrame) {
        self.write(frame.left, frame.right);
    }

    /// Zero the stored history. The cursor keeps counting from where it was.
    pub fn clear(&mut self) {
        for (l, r) in self.storage.left.iter().zip(self.storage.right.iter()) {
            l.store(0.0f32.to_bits(), Ordering::Relaxed);
            r.store(0.0f32.to_bits(), Ordering::Relaxed);
        }
    }

    /// Total frames written so far.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.storage.cursor.load(Ordering::Relaxed)
    }

    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// A new reader over the same storage.
    pub fn reader(&self) -> RingReader {
        RingReader {
            storage: Arc::clone(&self.storage),
        }
    }
}

/// Any number of consumers; cheap to clone.
#[derive(Clone)]
pub struct RingReader {
    storage: Arc<RingStorage>,
}

impl RingReader {
    /// Total frames written so far, with acquire ordering: every frame below the
    /// returned value is readable.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.storage.cursor.load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Single frame by absolute index, masked into storage. No validity check.
    #[inline]
    pub fn read_at(&self, index: usize) -> StereoFrame {
        self.storage.load(index)
    }

    /// Fill `out` with the `out.len()` frames ending `offset` frames before the
    /// cursor, oldest first. Positions without retained history are silent.
    /// Returns the absolute index of `out[0]` (may be negative).
    pub fn read_range_into(&self, offset: usize, out: &mut [StereoFrame]) -> i64 {
        let cursor = self.cursor() as i64;
        let start = cursor - offset as i64 - out.len() as i64;
        self.copy_span(cursor, start, out);
        start
    }

    /// Fill `out` with frames starting at absolute index `start`.
    pub fn read_from_into(&self, start: usize, out: &mut [StereoFrame]) {
        let cursor = self.cursor() as i64;
        self.copy_span(cursor, start as i64, out);
    }

    /// Allocating convenience over [`Self::read_range_into`].
    pub fn read_range(&self, count: usize, offset: usize) -> Vec<StereoFrame> {
        let mut out = vec![StereoFrame::SILENT; count];
        self.read_range_into(offset, &mut out);
        out
    }

    /// The most recent `count` frames, oldest first.
    pub fn read_last(&self, count: usize) -> Vec<StereoFrame> {
        self.read_range(count, 0)
    }

    fn copy_span(&self, cursor: i64, start: i64, out: &mut [StereoFrame]) {
        let oldest = cursor - self.capacity() as i64;
        for (i, frame) in out.iter_mut().enumerate() {
            let index = start + i as i64;
            *frame = if index < 0 || index < oldest || index >= cursor {
                StereoFrame::SILENT
            } else {
                self.storage.load(index as usize)
            };
        }
    }
}
