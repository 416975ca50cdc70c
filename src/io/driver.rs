use color_eyre::eyre::{eyre, Result, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::engine::ScopeEngine;
use crate::MAX_BLOCK_SIZE;

/// Something that periodically asks a [`ScopeEngine`] for audio.
///
/// The engine never knows which driver runs it, so the DSP core has no
/// platform branches.
pub trait AudioDriver {
    fn sample_rate(&self) -> f32;

    fn channels(&self) -> usize;

    /// Take ownership of the engine and start calling it.
    fn start(&mut self, engine: ScopeEngine) -> Result<()>;

    /// Stop calling the engine. Safe to call more than once.
    fn stop(&mut self) -> Result<()>;
}

/// The default output device through cpal.
pub struct CpalDriver {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
    stream: Option<cpal::Stream>,
}

impl CpalDriver {
    pub fn open_default() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        log::info!(
            "output device {}: {} Hz, {} channel(s), {:?}",
            device.name().unwrap_or_else(|_| "<unnamed>".into()),
            config.sample_rate().0,
            config.channels(),
            config.sample_format()
        );

        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }
}

impl AudioDriver for CpalDriver {
    fn sample_rate(&self) -> f32 {
        self.config.sample_rate().0 as f32
    }

    fn channels(&self) -> usize {
        self.config.channels() as usize
    }

    fn start(&mut self, mut engine: ScopeEngine) -> Result<()> {
        if self.stream.is_some() {
            return Err(eyre!("audio stream already running"));
        }

        let channels = self.channels().max(1);
        let stream = self
            .device
            .build_output_stream(
                &self.config.config(),
                move |data: &mut [f32], _| {
                    for block in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                        engine.render(block, channels);
                    }
                },
                |err| log::error!("audio stream error: {err}"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;
        log::info!("audio stream started");
        self.stream = Some(stream);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            stream.pause().wrap_err("failed to pause output stream")?;
            log::info!("audio stream stopped");
        }
        Ok(())
    }
}

/// Pulls blocks from the engine on demand. Used for bouncing to files and
/// in tests, where there is no device clock.
pub struct OfflineDriver {
    sample_rate: f32,
    channels: usize,
    block_size: usize,
    engine: Option<ScopeEngine>,
}

impl OfflineDriver {
    pub fn new(sample_rate: f32, channels: usize) -> Self {
        Self {
            sample_rate,
            channels: channels.max(1),
            block_size: 512,
            engine: None,
        }
    }

    /// Frames per engine call, capped at [`MAX_BLOCK_SIZE`].
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.clamp(1, MAX_BLOCK_SIZE);
        self
    }

    /// Render `frames` interleaved frames.
    pub fn render(&mut self, frames: usize) -> Result<Vec<f32>> {
        let channels = self.channels;
        let block_size = self.block_size;
        let engine = self
            .engine
            .as_mut()
            .ok_or_else(|| eyre!("offline driver has not been started"))?;

        let mut out = vec![0.0; frames * channels];
        for block in out.chunks_mut(block_size * channels) {
            engine.render(block, channels);
        }
        Ok(out)
    }

    pub fn engine(&self) -> Option<&ScopeEngine> {
        self.engine.as_ref()
    }
}

impl AudioDriver for OfflineDriver {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn start(&mut self, engine: ScopeEngine) -> Result<()> {
        if self.engine.is_some() {
            return Err(eyre!("offline driver already running"));
        }
        self.engine = Some(engine);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.engine = None;
        Ok(())
    }
}
