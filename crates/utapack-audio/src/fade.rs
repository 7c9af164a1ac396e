//! Linear fade envelopes.
//!
//! A fade-in over `n` frames scales frame `i` by `i / n`, so the first frame
//! is silent and the gain reaches unity right after the fade. A fade-out is
//! the mirror image ending on a silent frame.

/// Applies a linear fade-in over the first `frames` samples.
pub fn linear_fade_in(samples: &mut [i16], frames: usize) {
    let frames = frames.min(samples.len());
    for (i, sample) in samples.iter_mut().take(frames).enumerate() {
        *sample = scale(*sample, i as f64 / frames as f64);
    }
}

/// Applies a linear fade-out over the last `frames` samples.
pub fn linear_fade_out(samples: &mut [i16], frames: usize) {
    let frames = frames.min(samples.len());
    for (i, sample) in samples.iter_mut().rev().take(frames).enumerate() {
        *sample = scale(*sample, i as f64 / frames as f64);
    }
}

#[inline]
fn scale(sample: i16, gain: f64) -> i16 {
    (sample as f64 * gain).round() as i16
}
