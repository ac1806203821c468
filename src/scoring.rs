//! Provisional fluency score: words per minute over the canonical passage.
//!
//! The reading is not transcribed, so the rate assumes the whole passage was
//! read in the recorded time. The category scale is provisional until it is
//! calibrated against real readings; every limit is overridable.

use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Limits used to compute and grade WPM.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluencyThresholds {
    /// Lowest WPM graded `BUENO` (inclusive).
    pub bueno_min_wpm: f64,
    /// Lowest WPM graded `REGULAR` (inclusive).
    pub regular_min_wpm: f64,
    /// At or below this duration the WPM is reported as 0.0.
    pub min_scorable_duration_secs: f64,
}

impl Default for FluencyThresholds {
    fn default() -> Self {
        Self {
            bueno_min_wpm: defaults::BUENO_MIN_WPM,
            regular_min_wpm: defaults::REGULAR_MIN_WPM,
            min_scorable_duration_secs: defaults::MIN_SCORABLE_DURATION_SECS,
        }
    }
}

/// Ordinal grade, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FluencyCategory {
    Bueno,
    Regular,
    Malo,
}

impl FluencyCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            FluencyCategory::Bueno => "BUENO",
            FluencyCategory::Regular => "REGULAR",
            FluencyCategory::Malo => "MALO",
        }
    }
}

impl fmt::Display for FluencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score attached to `FL` evaluations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluencyScore {
    pub word_count: usize,
    pub wpm: f64,
    pub category: FluencyCategory,
}

impl FluencyThresholds {
    /// Words per minute for `word_count` words read in `duration_secs`.
    pub fn wpm(&self, word_count: usize, duration_secs: f64) -> f64 {
        if duration_secs <= self.min_scorable_duration_secs {
            return 0.0;
        }
        (word_count as f64 / duration_secs) * 60.0
    }

    /// Grade a rate, checking the highest band first.
    pub fn classify(&self, wpm: f64) -> FluencyCategory {
        if wpm >= self.bueno_min_wpm {
            FluencyCategory::Bueno
        } else if wpm >= self.regular_min_wpm {
            FluencyCategory::Regular
        } else {
            FluencyCategory::Malo
        }
    }

    pub fn score(&self, word_count: usize, duration_secs: f64) -> FluencyScore {
        let wpm = self.wpm(word_count, duration_secs);
        FluencyScore {
            word_count,
            wpm,
            category: self.classify(wpm),
        }
    }
}
