use std::path::Path;

use color_eyre::eyre::{eyre, Result, WrapErr};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::source::SampleClip;

/// Decode a WAV file into a looping clip.
///
/// Integer files (8 to 32 bit) are normalised to ±1; float files are taken as
/// is. Mono files play on both sides.
pub fn load_wav(path: impl AsRef<Path>) -> Result<SampleClip> {
    let path = path.as_ref();
    let mut reader = WavReader::open(path)
        .wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();

    if spec.channels == 0 {
        return Err(eyre!("{} has no audio channels", path.display()));
    }

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .wrap_err_with(|| format!("failed to decode {}", path.display()))?,
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(eyre!(
                    "{}: unsupported bit depth {}",
                    path.display(),
                    spec.bits_per_sample
                ));
            }
            let full_scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<_, _>>()
                .wrap_err_with(|| format!("failed to decode {}", path.display()))?
        }
    };

    let clip = SampleClip::from_interleaved(&samples, spec.channels, spec.sample_rate);
    log::info!(
        "loaded {}: {} frames, {} Hz, {} channel(s), {}-bit {:?}",
        path.display(),
        clip.len(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format
    );
    Ok(clip)
}

/// Write interleaved float samples as a 32-bit float WAV file.
pub fn write_wav(
    path: impl AsRef<Path>,
    samples: &[f32],
    channels: u16,
    sample_rate: u32,
) -> Result<()> {
    let path = path.as_ref();
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)
        .wrap_err_with(|| format!("failed to create {}", path.display()))?;
    for sample in samples {
        writer
            .write_sample(*sample)
            .wrap_err("failed to write sample")?;
    }
    writer
        .finalize()
        .wrap_err_with(|| format!("failed to finalize {}", path.display()))?;

    log::info!(
        "wrote {}: {} frames",
        path.display(),
        samples.len() / channels.max(1) as usize
    );
    Ok(())
}
