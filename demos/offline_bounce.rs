//! Bounce a morph sweep to a WAV file without an audio device.
//!
//! Run with: cargo run --example offline_bounce -- [out.wav]
//!
//! The test signal runs through the filter while the morph point circles the
//! disc once and the Y channel is split off by 90°, so the file walks through
//! every tap blend.

use std::f32::consts::TAU;

use color_eyre::eyre::Result;
use phosphor_dsp::io::{write_wav, AudioDriver, OfflineDriver};
use phosphor_dsp::source::TestSignal;
use phosphor_dsp::{EngineConfig, ScopeEngine};

const SAMPLE_RATE: f32 = 48_000.0;
const SECONDS: usize = 8;
const STEPS: usize = 400;

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "phosphor_bounce.wav".into());

    let config = EngineConfig::default().with_sample_rate(SAMPLE_RATE);
    let (engine, mut ctl) = ScopeEngine::new(&config);
    ctl.set_source(TestSignal::new(SAMPLE_RATE))?;

    let params = ctl.params();
    params.set_volume(0.8);
    params.set_cutoff(600.0);
    params.set_resonance(0.7);
    params.set_split_angle(90.0);
    params.set_signal_beta(4.0);

    let mut driver = OfflineDriver::new(SAMPLE_RATE, 2).with_block_size(256);
    driver.start(engine)?;

    let frames_per_step = SECONDS * SAMPLE_RATE as usize / STEPS;
    let mut rendered = Vec::with_capacity(SECONDS * SAMPLE_RATE as usize * 2);
    for step in 0..STEPS {
        let angle = TAU * step as f32 / STEPS as f32;
        params.set_morph_position(0.9 * angle.cos(), 0.9 * angle.sin());
        rendered.extend(driver.render(frames_per_step)?);
    }
    driver.stop()?;

    write_wav(&path, &rendered, 2, SAMPLE_RATE as u32)?;
    println!(
        "wrote {} ({} triggers seen)",
        path,
        ctl.marker().count()
    );
    Ok(())
}
