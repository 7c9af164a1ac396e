//! Source clip loading.

use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::clip::{frames_to_ms, Clip, SAMPLE_RATE};
use crate::error::{AudioError, AudioResult};

/// Loads a WAV file as a mono 16-bit 44.1 kHz clip.
///
/// Files already in that layout are copied sample for sample. Anything else
/// is averaged down to mono, resampled linearly, and requantized.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be opened or decoded
/// - The bit depth is not 8, 16, 24, or 32 bits for integer data
pub fn read_clip(path: &Path) -> AudioResult<Clip> {
    let read_err = |source| AudioError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = WavReader::open(path).map_err(read_err)?;
    let spec = reader.spec();

    if spec.channels == 0 {
        return Err(AudioError::unsupported(path, "file declares zero channels"));
    }

    if spec.sample_format == SampleFormat::Int
        && spec.bits_per_sample == 16
        && spec.channels == 1
        && spec.sample_rate == SAMPLE_RATE
    {
        let samples = reader
            .samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?;
        return Ok(Clip::from_samples(samples));
    }

    let normalized: Vec<f64> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, _) => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .map_err(read_err)?,
        (SampleFormat::Int, 8) => reader
            .samples::<i8>()
            .map(|s| s.map(|v| normalize_sample(v.into(), 8)))
            .collect::<Result<_, _>>()
            .map_err(read_err)?,
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| normalize_sample(v.into(), 16)))
            .collect::<Result<_, _>>()
            .map_err(read_err)?,
        (SampleFormat::Int, bits @ (24 | 32)) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| normalize_sample(v, bits)))
            .collect::<Result<_, _>>()
            .map_err(read_err)?,
        (SampleFormat::Int, bits) => {
            return Err(AudioError::unsupported(
                path,
                format!("{bits}-bit samples (supported: 8, 16, 24, 32)"),
            ));
        }
    };

    let mono = downmix(&normalized, spec.channels);
    let resampled = resample_linear(&mono, spec.sample_rate, SAMPLE_RATE);
    Ok(Clip::from_samples(resampled.iter().map(|&s| quantize(s)).collect()))
}

/// Returns a clip's duration in milliseconds after conversion.
///
/// Files already at the output rate are measured from the header alone.
/// Other rates are decoded, since resampling decides the final frame count.
pub fn clip_duration_ms(path: &Path) -> AudioResult<f64> {
    let reader = WavReader::open(path).map_err(|source| AudioError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if reader.spec().sample_rate == SAMPLE_RATE {
        return Ok(frames_to_ms(reader.duration() as usize));
    }
    read_clip(path).map(|clip| clip.duration_ms())
}

/// Normalize a sample value to [-1.0, 1.0] range.
fn normalize_sample(sample: i32, bits_per_sample: u16) -> f64 {
    let max_value = match bits_per_sample {
        8 => 128.0,
        16 => 32768.0,
        24 => 8388608.0,
        _ => 2147483648.0,
    };

    sample as f64 / max_value
}

/// Averages interleaved channels into one.
fn downmix(samples: &[f64], channels: u16) -> Vec<f64> {
    if channels == 1 {
        return samples.to_vec();
    }
    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect()
}

/// Linear interpolation resampling.
pub(super) fn resample_linear(samples: &[f64], from_rate: u32, to_rate: u32) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }

    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = src_pos - src_idx as f64;

        let sample = if src_idx + 1 < samples.len() {
            let s0 = samples[src_idx];
            let s1 = samples[src_idx + 1];
            s0 + (s1 - s0) * frac
        } else {
            samples[src_idx.min(samples.len() - 1)]
        };

        output.push(sample);
    }

    output
}

fn quantize(sample: f64) -> i16 {
    (sample * 32768.0).round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}
