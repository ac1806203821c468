//! Default configuration constants for lectometro.
//!
//! Every threshold the evaluation pipeline applies lives here so it can be
//! recalibrated from observed data without touching call sites. The config
//! layer copies these into overridable values.

/// Recordings shorter than this (seconds) are flagged `audio_muy_corto`.
pub const MIN_DURATION_SECS: f64 = 2.0;

/// Recordings whose RMS energy is below this are flagged `audio_silencioso`.
///
/// Samples are normalized to [-1.0, 1.0], so 0.005 is roughly -46 dBFS.
pub const MIN_RMS: f64 = 0.005;

/// Durations at or below this (seconds) yield a WPM of 0.0.
///
/// Keeps near-empty uploads from producing absurd rates.
pub const MIN_SCORABLE_DURATION_SECS: f64 = 0.1;

/// Lowest WPM graded `BUENO` (inclusive).
///
/// Provisional, pending calibration against real readings.
pub const BUENO_MIN_WPM: f64 = 85.0;

/// Lowest WPM graded `REGULAR` (inclusive). Anything below is `MALO`.
pub const REGULAR_MIN_WPM: f64 = 55.0;

/// Default address the HTTP service binds to.
pub const BIND_ADDR: &str = "127.0.0.1:8000";

/// Default upload limit in megabytes.
pub const MAX_UPLOAD_MB: usize = 25;

/// Default directory holding the canonical reading texts.
pub const TEXTS_DIR: &str = "texts";

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "lectometro";

/// Note attached to `DEC` results until decoding is scored.
pub const DECODING_NOTE: &str =
    "Evaluación de decodificación pendiente: requiere reconocimiento de voz";
