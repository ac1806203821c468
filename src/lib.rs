//! lectometro - Reading fluency evaluation for recorded exams
//!
//! Decodes an uploaded WAV recording, measures it, flags quality problems and,
//! for fluency tasks, scores words-per-minute against a canonical passage.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod evaluation;
pub mod scoring;
#[cfg(feature = "server")]
pub mod server;
pub mod text;

// Audio pipeline
pub use audio::AudioBuffer;
pub use audio::metrics::AudioMetrics;
pub use audio::quality::{QualityFlags, QualityThresholds};

// Canonical texts (source → registry)
pub use text::{CanonicalText, CanonicalTextRegistry, DirTextSource, Form, MemoryTextSource, TextSource};

// Scoring
pub use scoring::{FluencyCategory, FluencyScore, FluencyThresholds};

// Evaluation
pub use evaluation::{EvaluationRequest, EvaluationResult, Evaluator, TaskOutcome, TaskType};

// Error handling
pub use error::{ErrorKind, LectometroError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_hash_suffix_matches_build_env() {
        let ver = version_string();
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            let hash_part = ver.split('+').nth(1).unwrap_or("");
            assert_eq!(hash_part.len(), 7, "Git hash should be 7 chars, got: {}", ver);
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}
