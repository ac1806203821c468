//! Duration and energy of a mono recording.

use crate::audio::AudioBuffer;

/// Measurements the quality flags and fluency score are derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioMetrics {
    pub sample_rate: u32,
    pub sample_count: usize,
    /// Seconds; `0.0` for an empty buffer.
    pub duration_secs: f64,
    /// Root-mean-square amplitude; `0.0` for an empty buffer.
    pub rms: f64,
}

impl AudioMetrics {
    pub fn measure(buffer: &AudioBuffer) -> Self {
        Self {
            sample_rate: buffer.sample_rate(),
            sample_count: buffer.len(),
            duration_secs: duration_secs(buffer),
            rms: calculate_rms(buffer.samples()),
        }
    }
}

/// Length of the buffer in seconds.
pub fn duration_secs(buffer: &AudioBuffer) -> f64 {
    if buffer.is_empty() {
        return 0.0;
    }
    buffer.len() as f64 / f64::from(buffer.sample_rate())
}

/// Calculates the Root Mean Square (RMS) of normalized samples.
///
/// # Returns
/// RMS in [0.0, 1.0] for samples in [-1.0, 1.0], where:
/// - 0.0 represents silence (and empty input)
/// - ~0.707 represents a full-scale sine wave
/// - 1.0 represents a full-scale square wave
pub fn calculate_rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples
        .iter()
        .map(|&sample| {
            let s = f64::from(sample);
            s * s
        })
        .sum();

    (sum_squares / samples.len() as f64).sqrt()
}
