//! Audio side of the evaluation pipeline.
//!
//! decode (`wav`) → downmix (`downmix`) → measure (`metrics`) → flag (`quality`)

pub mod downmix;
pub mod metrics;
pub mod quality;
pub mod wav;

use crate::error::{LectometroError, Result};

/// Mono recording ready for measurement.
///
/// Holds one sample per frame, normalized to [-1.0, 1.0], and a sample rate
/// that is always positive.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Wrap mono samples. A zero sample rate is a decode failure, never an
    /// empty recording.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(LectometroError::decode("Invalid sample rate: 0 Hz"));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
