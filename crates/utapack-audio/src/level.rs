//! Loudness measurement and gain.

/// Full-scale amplitude of a 16-bit sample.
const FULL_SCALE: f64 = 32768.0;

/// Converts decibels to a linear amplitude factor.
#[inline]
pub fn db_to_amp(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// RMS level in dB relative to full scale.
///
/// Returns negative infinity for an empty or silent buffer.
pub fn dbfs(samples: &[i16]) -> f64 {
    if samples.is_empty() {
        return f64::NEG_INFINITY;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let rms = (sum_sq / samples.len() as f64).sqrt();
    if rms == 0.0 {
        return f64::NEG_INFINITY;
    }
    20.0 * (rms / FULL_SCALE).log10()
}

/// Scales samples by `db` decibels, saturating at the 16-bit limits.
pub fn apply_gain(samples: &mut [i16], db: f64) {
    let gain = db_to_amp(db);
    for sample in samples.iter_mut() {
        let scaled = (*sample as f64 * gain).round();
        *sample = scaled.clamp(i16::MIN as f64, i16::MAX as f64) as i16;
    }
}

/// Gains samples so their RMS level equals `target_dbfs`.
///
/// Silent buffers are left untouched.
pub fn match_level(samples: &mut [i16], target_dbfs: f64) {
    let current = dbfs(samples);
    if current.is_finite() {
        apply_gain(samples, target_dbfs - current);
    }
}
