//! Channel normalization: interleaved multi-channel audio to mono.

use crate::audio::AudioBuffer;
use crate::audio::wav::DecodedAudio;
use crate::error::Result;

/// Average each frame of interleaved samples into a single mono sample.
///
/// Single-channel input is returned unchanged. One output sample is produced
/// per frame, so the result has `samples.len() / channels` values.
pub fn downmix_to_mono(samples: Vec<f32>, channels: u16) -> Vec<f32> {
    let channels = usize::from(channels);
    if channels <= 1 {
        return samples;
    }

    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Collapse decoded audio into the mono buffer the metrics operate on.
pub fn to_mono(decoded: DecodedAudio) -> Result<AudioBuffer> {
    let mono = downmix_to_mono(decoded.samples, decoded.channels);
    AudioBuffer::new(mono, decoded.sample_rate)
}
