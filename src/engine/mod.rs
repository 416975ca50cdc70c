//! The per-sample scope pipeline and the handle the control thread drives it with.
//!
//! [`ScopeEngine::new`] returns a pair: the [`ScopeEngine`] moves into the
//! audio callback, the [`ScopeController`] stays with the UI. They share
//! [`ScopeParams`], the sample ring and the trigger marker, and exchange
//! everything else over two `rtrb` queues.

pub mod gain;
pub mod message;
pub mod params;

pub use gain::GainRamp;
pub use message::{MessageReceiver, ScopeMessage};
pub use params::{AtomicF32, ScopeParams, ScopeRouting};

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result};
use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::config::EngineConfig;
use crate::dsp::filter::{FilterOutput, StateVariableFilter};
use crate::routing::morph::FilterMorpher;
use crate::routing::router::{SplitMode, StereoFilterRouter};
use crate::scope::ring::{sample_ring, RingReader, RingWriter, StereoFrame};
use crate::scope::trigger::{read_triggered_sweep, TriggerDetector, TriggerMarker};
use crate::source::{Source, StereoSource};

/// Gain below which the output counts as silent for shutdown.
pub const SILENT_GAIN: f32 = 0.001;

const SHUTDOWN_POLL: Duration = Duration::from_millis(1);

/// Values last pushed into the DSP objects. NaN forces the next sync to apply.
struct Applied {
    cutoff: f32,
    resonance: f32,
    pre_gain: f32,
    morph_x: f32,
    morph_y: f32,
    split_angle: f32,
    split_depth: f32,
    signal_frequency: f32,
    signal_detune: f32,
    signal_beta: f32,
    signal_exponent: Option<u32>,
}

impl Applied {
    fn stale() -> Self {
        Self {
            cutoff: f32::NAN,
            resonance: f32::NAN,
            pre_gain: f32::NAN,
            morph_x: f32::NAN,
            morph_y: f32::NAN,
            split_angle: f32::NAN,
            split_depth: f32::NAN,
            signal_frequency: f32::NAN,
            signal_detune: f32::NAN,
            signal_beta: f32::NAN,
            signal_exponent: None,
        }
    }

    fn invalidate_signal(&mut self) {
        self.signal_frequency = f32::NAN;
        self.signal_detune = f32::NAN;
        self.signal_beta = f32::NAN;
        self.signal_exponent = None;
    }
}

/// Audio-thread half. Owns every piece of DSP state; nothing in
/// [`ScopeEngine::process`] allocates, locks or logs.
pub struct ScopeEngine {
    params: Arc<ScopeParams>,
    rx: Consumer<ScopeMessage>,
    retired: Producer<Box<Source>>,

    source: Box<Source>,
    filter: StateVariableFilter,
    morpher: FilterMorpher,
    router: StereoFilterRouter,
    trigger: TriggerDetector,
    writer: RingWriter,
    gain: GainRamp,

    applied: Applied,
    filter_enabled: bool,
    routing: ScopeRouting,
    sample_rate: f32,
    sweep_len: usize,
}

impl ScopeEngine {
    pub fn new(config: &EngineConfig) -> (ScopeEngine, ScopeController) {
        let sample_rate = if config.sample_rate.is_finite() && config.sample_rate > 0.0 {
            config.sample_rate
        } else {
            EngineConfig::default().sample_rate
        };
        let queue_len = config.message_capacity.max(1);

        let params = Arc::new(ScopeParams::new(&config.params));
        let (tx, rx) = RingBuffer::<ScopeMessage>::new(queue_len);
        let (retire_tx, retire_rx) = RingBuffer::<Box<Source>>::new(queue_len);
        let (writer, reader) = sample_ring(config.ring_capacity);
        // triggers older than half the ring are stale, so a sweep has to finish
        // well inside that window for triggered reads to land
        let max_sweep = (reader.capacity() / 4).max(1);
        let sweep_len = if config.sweep_len > max_sweep {
            log::warn!(
                "sweep length {} too long for a {}-frame ring, using {}",
                config.sweep_len,
                reader.capacity(),
                max_sweep
            );
            max_sweep
        } else {
            config.sweep_len.max(1)
        };
        let marker = Arc::new(TriggerMarker::new());

        let engine = ScopeEngine {
            params: Arc::clone(&params),
            rx,
            retired: retire_tx,
            source: Box::default(),
            filter: StateVariableFilter::new(sample_rate),
            morpher: FilterMorpher::new(),
            router: StereoFilterRouter::new(SplitMode::default()),
            trigger: TriggerDetector::new(sweep_len, Arc::clone(&marker)),
            writer,
            gain: GainRamp::new(sample_rate, config.ramp_time),
            applied: Applied::stale(),
            filter_enabled: config.params.filter_enabled,
            routing: config.params.routing,
            sample_rate,
            sweep_len,
        };

        let controller = ScopeController {
            params,
            tx,
            retired: retire_rx,
            reader,
            marker,
            router: StereoFilterRouter::new(SplitMode::default()),
            sample_rate,
            sweep_len,
        };

        log::info!(
            "scope engine ready: {} Hz, sweep {} samples, ring {} frames",
            sample_rate,
            sweep_len,
            controller.reader.capacity()
        );
        (engine, controller)
    }

    /// Fill an interleaved stereo buffer.
    pub fn process(&mut self, out: &mut [f32]) {
        self.render(out, 2);
    }

    /// Fill an interleaved buffer with `channels` per frame. Mono gets the
    /// average of both sides; channels past the second are silent.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        self.drain_messages();

        for frame in out.chunks_exact_mut(channels.max(1)) {
            let speaker = self.tick();
            match frame {
                [mono] => *mono = 0.5 * (speaker.left + speaker.right),
                [left, right, rest @ ..] => {
                    *left = speaker.left;
                    *right = speaker.right;
                    rest.fill(0.0);
                }
                [] => {}
            }
        }

        self.params.publish_gain(self.gain.value());
    }

    #[inline]
    fn tick(&mut self) -> StereoFrame {
        self.sync_params();

        let paused = self.params.paused();
        let target = if paused || self.params.shutting_down() {
            0.0
        } else {
            self.params.volume()
        };
        let gain = self.gain.next(target);

        // a paused source keeps playing until the fade-out finishes
        if paused && gain <= 0.0 {
            return StereoFrame::SILENT;
        }

        let input = self.source.next_frame();
        let (scope, speaker) = self.shape(input);

        if !paused {
            self.writer.write_frame(scope);
            self.trigger.process(scope.left, self.writer.cursor());
        }

        StereoFrame::new(speaker.left * gain, speaker.right * gain)
    }

    /// Returns the (scope, speaker) frames for one input frame.
    #[inline]
    fn shape(&mut self, input: StereoFrame) -> (StereoFrame, StereoFrame) {
        if !self.filter_enabled {
            return (input, input);
        }

        let taps = self.filter.process(0.5 * (input.left + input.right));
        let (scope_x, scope_y) = match self.routing {
            ScopeRouting::Morph if self.morpher.has_split() => self.morpher.apply_taps_xy(&taps),
            ScopeRouting::Morph => (input.left, self.morpher.apply_taps(&taps)),
            ScopeRouting::Router => self.router.route(&taps),
        };
        let (out_l, out_r) = self.morpher.apply_taps_xy(&taps);

        (
            StereoFrame::new(scope_x, scope_y),
            StereoFrame::new(out_l, out_r),
        )
    }

    fn sync_params(&mut self) {
        let p = &*self.params;

        let cutoff = p.cutoff();
        if cutoff != self.applied.cutoff {
            self.filter.set_cutoff(cutoff);
            self.applied.cutoff = cutoff;
        }
        let resonance = p.resonance();
        if resonance != self.applied.resonance {
            self.filter.set_resonance(resonance);
            self.applied.resonance = resonance;
        }
        let pre_gain = p.pre_gain();
        if pre_gain != self.applied.pre_gain {
            self.filter.set_pre_gain(pre_gain);
            self.applied.pre_gain = pre_gain;
        }
        let poles = p.poles();
        if poles != self.filter.poles() {
            self.filter.set_poles(poles);
        }

        let (x, y) = p.morph_position();
        if x != self.applied.morph_x || y != self.applied.morph_y {
            self.morpher.set_position(x, y);
            self.applied.morph_x = x;
            self.applied.morph_y = y;
        }
        let split_angle = p.split_angle();
        if split_angle != self.applied.split_angle {
            self.morpher.set_split_angle(split_angle);
            self.applied.split_angle = split_angle;
        }
        let split_depth = p.split_depth();
        if split_depth != self.applied.split_depth {
            self.morpher.set_split_depth(split_depth);
            self.applied.split_depth = split_depth;
        }

        self.trigger.set_threshold(p.threshold());
        self.trigger.set_edge(p.trigger_edge());
        self.trigger.set_lock_enabled(p.waveform_lock());
        self.filter_enabled = p.filter_enabled();
        self.routing = p.routing();

        if let Some(signal) = self.source.as_signal_mut() {
            let frequency = p.signal_frequency();
            if frequency != self.applied.signal_frequency {
                signal.set_frequency(frequency);
                self.applied.signal_frequency = frequency;
            }
            let detune = p.signal_detune();
            if detune != self.applied.signal_detune {
                signal.set_detune(detune);
                self.applied.signal_detune = detune;
            }
            let beta = p.signal_beta();
            if beta != self.applied.signal_beta {
                signal.set_beta(beta);
                self.applied.signal_beta = beta;
            }
            let exponent = p.signal_exponent();
            if Some(exponent) != self.applied.signal_exponent {
                signal.set_exponent(exponent);
                self.applied.signal_exponent = Some(exponent);
            }
        }
    }

    fn drain_messages(&mut self) {
        while let Some(msg) = MessageReceiver::pop(&mut self.rx) {
            self.handle_message(msg);
        }
    }

    fn handle_message(&mut self, msg: ScopeMessage) {
        match msg {
            ScopeMessage::SetSource(mut incoming) => {
                std::mem::swap(&mut self.source, &mut incoming);
                self.applied.invalidate_signal();
                if let Err(PushError::Full(old)) = self.retired.push(incoming) {
                    // retire queue full: the old source is freed on the audio thread
                    drop(old);
                }
            }
            ScopeMessage::SelectSplitMode(mode) => self.router.set_split_mode(mode),
            ScopeMessage::CycleSplitMode => self.router.cycle(),
            ScopeMessage::SetRouteX(output) => self.router.set_x_output(output),
            ScopeMessage::SetRouteY(output) => self.router.set_y_output(output),
            ScopeMessage::Step(samples) => self.scrub(samples),
            ScopeMessage::Reset => {
                self.filter.reset();
                self.trigger.reset();
                self.writer.clear();
                self.source.reset();
            }
        }
    }

    /// Move the source by `samples` and rewrite the last sweep of history so
    /// that it ends where the source now is.
    fn scrub(&mut self, samples: i64) {
        self.sync_params();
        self.source.step(samples - self.sweep_len as i64);
        for _ in 0..self.sweep_len {
            let input = self.source.next_frame();
            let (scope, _) = self.shape(input);
            self.writer.write_frame(scope);
        }
    }

    pub fn params(&self) -> &Arc<ScopeParams> {
        &self.params
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn router(&self) -> &StereoFilterRouter {
        &self.router
    }

    pub fn filter(&self) -> &StateVariableFilter {
        &self.filter
    }

    pub fn trigger(&self) -> &TriggerDetector {
        &self.trigger
    }

    pub fn gain(&self) -> f32 {
        self.gain.value()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

/// Control-thread half: parameter setters, queued requests and scope reads.
pub struct ScopeController {
    params: Arc<ScopeParams>,
    tx: Producer<ScopeMessage>,
    retired: Consumer<Box<Source>>,
    reader: RingReader,
    marker: Arc<TriggerMarker>,
    // replays routing requests so the UI can show the active preset
    router: StereoFilterRouter,
    sample_rate: f32,
    sweep_len: usize,
}

impl ScopeController {
    pub fn params(&self) -> &ScopeParams {
        &self.params
    }

    pub fn shared_params(&self) -> Arc<ScopeParams> {
        Arc::clone(&self.params)
    }

    /// Queue a request for the audio thread.
    pub fn send(&mut self, msg: ScopeMessage) -> Result<()> {
        self.collect_retired();

        let mut router = self.router;
        match &msg {
            ScopeMessage::SelectSplitMode(mode) => router.set_split_mode(*mode),
            ScopeMessage::CycleSplitMode => router.cycle(),
            ScopeMessage::SetRouteX(output) => router.set_x_output(*output),
            ScopeMessage::SetRouteY(output) => router.set_y_output(*output),
            _ => {}
        }

        self.tx
            .push(msg)
            .map_err(|_| eyre!("scope message queue is full"))?;
        self.router = router;
        Ok(())
    }

    /// Replace the source. Rates are matched to the engine before it is queued.
    pub fn set_source(&mut self, source: impl Into<Source>) -> Result<()> {
        let mut source = source.into();
        match &mut source {
            Source::Clip(clip) => {
                clip.set_output_rate(self.sample_rate);
                log::info!(
                    "queueing clip: {} frames, {} Hz, {} channel(s)",
                    clip.len(),
                    clip.source_rate(),
                    clip.channels()
                );
            }
            Source::Signal(signal) => {
                signal.set_sample_rate(self.sample_rate);
                log::info!("queueing test signal");
            }
            Source::Silence => log::info!("queueing silence"),
        }
        self.send(ScopeMessage::SetSource(Box::new(source)))
    }

    pub fn select_split_mode(&mut self, mode: SplitMode) -> Result<()> {
        self.send(ScopeMessage::SelectSplitMode(mode))
    }

    pub fn cycle_split_mode(&mut self) -> Result<()> {
        self.send(ScopeMessage::CycleSplitMode)
    }

    pub fn set_route_x(&mut self, output: FilterOutput) -> Result<()> {
        self.send(ScopeMessage::SetRouteX(output))
    }

    pub fn set_route_y(&mut self, output: FilterOutput) -> Result<()> {
        self.send(ScopeMessage::SetRouteY(output))
    }

    pub fn step(&mut self, samples: i64) -> Result<()> {
        self.send(ScopeMessage::Step(samples))
    }

    pub fn reset(&mut self) -> Result<()> {
        self.send(ScopeMessage::Reset)
    }

    /// Free sources the audio thread has swapped out. Returns how many.
    pub fn collect_retired(&mut self) -> usize {
        let mut count = 0;
        while let Ok(source) = self.retired.pop() {
            drop(source);
            count += 1;
        }
        count
    }

    /// Most recent frames, oldest first.
    pub fn latest(&self, out: &mut [StereoFrame]) {
        self.reader.read_range_into(0, out);
    }

    /// One sweep aligned to the newest complete trigger. Returns `false` when
    /// no usable trigger exists and the sweep free-ran instead.
    pub fn triggered_sweep(&self, out: &mut [StereoFrame]) -> bool {
        read_triggered_sweep(&self.reader, &self.marker, out)
    }

    pub fn reader(&self) -> &RingReader {
        &self.reader
    }

    pub fn marker(&self) -> &Arc<TriggerMarker> {
        &self.marker
    }

    pub fn router(&self) -> &StereoFilterRouter {
        &self.router
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn sweep_len(&self) -> usize {
        self.sweep_len
    }

    pub fn current_gain(&self) -> f32 {
        self.params.current_gain()
    }

    /// Ramp the output to silence before the stream is torn down.
    ///
    /// Polls the gain the audio thread publishes and returns `true` once it is
    /// below [`SILENT_GAIN`], or `false` if `max_wait` runs out first.
    pub fn shutdown(&self, max_wait: Duration) -> bool {
        self.params.begin_shutdown();
        let start = Instant::now();

        loop {
            let gain = self.params.current_gain();
            if gain < SILENT_GAIN {
                log::info!("output ramped down in {:?}", start.elapsed());
                return true;
            }
            if start.elapsed() >= max_wait {
                log::warn!("output gain still {gain:.4} after {max_wait:?}, stopping anyway");
                return false;
            }
            thread::sleep(SHUTDOWN_POLL);
        }
    }
}
