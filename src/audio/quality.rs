//! Audio quality flags.
//!
//! Both flags use strict less-than: a value sitting exactly on its threshold
//! is not flagged.

use crate::audio::metrics::AudioMetrics;
use crate::defaults;
use serde::{Deserialize, Serialize};

/// Limits below which a recording is flagged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    pub min_duration_secs: f64,
    pub min_rms: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_duration_secs: defaults::MIN_DURATION_SECS,
            min_rms: defaults::MIN_RMS,
        }
    }
}

/// Diagnostic flags attached to every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityFlags {
    #[serde(rename = "audio_muy_corto")]
    pub too_short: bool,
    #[serde(rename = "audio_silencioso")]
    pub too_quiet: bool,
}

impl QualityFlags {
    pub fn from_values(duration_secs: f64, rms: f64, thresholds: &QualityThresholds) -> Self {
        Self {
            too_short: duration_secs < thresholds.min_duration_secs,
            too_quiet: rms < thresholds.min_rms,
        }
    }

    pub fn assess(metrics: &AudioMetrics, thresholds: &QualityThresholds) -> Self {
        Self::from_values(metrics.duration_secs, metrics.rms, thresholds)
    }

    pub fn any(&self) -> bool {
        self.too_short || self.too_quiet
    }
}
