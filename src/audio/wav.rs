//! WAV decoding for uploaded recordings.
//!
//! Works over an in-memory byte slice. Integer PCM of any bit depth and
//! 32-bit float PCM are scaled to [-1.0, 1.0]; channels stay interleaved
//! until [`crate::audio::downmix`] collapses them.

use crate::error::{LectometroError, Result};
use std::io::Cursor;

/// Samples exactly as stored in the container.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Interleaved samples, `channels` values per frame.
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl DecodedAudio {
    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }
}

/// Decode a RIFF/WAVE payload.
///
/// Fails with [`LectometroError::Decode`] on a malformed header, an
/// unsupported encoding, truncated sample data, zero channels or a zero
/// sample rate.
pub fn decode_wav(bytes: &[u8]) -> Result<DecodedAudio> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| LectometroError::decode(format!("Failed to parse WAV file: {}", e)))?;

    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(LectometroError::decode("Invalid sample rate: 0 Hz"));
    }
    if spec.channels == 0 {
        return Err(LectometroError::decode("Invalid channel count: 0"));
    }

    let samples = match spec.sample_format {
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(LectometroError::decode(format!(
                    "Unsupported bit depth: {}",
                    spec.bits_per_sample
                )));
            }
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<std::result::Result<Vec<_>, _>>()
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>(),
    }
    .map_err(|e| LectometroError::decode(format!("Failed to read WAV samples: {}", e)))?;

    if samples.len() % usize::from(spec.channels) != 0 {
        return Err(LectometroError::decode(format!(
            "Truncated sample data: {} samples do not fill {} channels",
            samples.len(),
            spec.channels
        )));
    }

    Ok(DecodedAudio {
        samples,
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
    })
}
