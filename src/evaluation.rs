//! Evaluation of one uploaded reading.
//!
//! The audio path (decode → downmix → metrics → flags) always runs. For
//! fluency tasks the canonical word count is looked up on a scoped worker
//! thread at the same time and merged into the same result. Either the full
//! result is produced or an error is returned; there are no partial results.

use crate::audio::downmix::to_mono;
use crate::audio::metrics::AudioMetrics;
use crate::audio::quality::{QualityFlags, QualityThresholds};
use crate::audio::wav::decode_wav;
use crate::config::Config;
use crate::defaults;
use crate::error::{ErrorKind, LectometroError, Result};
use crate::scoring::{FluencyCategory, FluencyScore, FluencyThresholds};
use crate::text::{CanonicalTextRegistry, Form};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// What the recording is evaluated for. Resolved once, at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    #[serde(rename = "FL")]
    Fluency,
    #[serde(rename = "DEC")]
    Decoding,
}

impl TaskType {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Fluency => "FL",
            TaskType::Decoding => "DEC",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = LectometroError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "FL" => Ok(TaskType::Fluency),
            "DEC" => Ok(TaskType::Decoding),
            other => Err(LectometroError::InvalidTaskType {
                value: other.to_string(),
            }),
        }
    }
}

/// Accept only names ending in `.wav`, ignoring case.
pub fn check_wav_filename(filename: &str) -> Result<()> {
    let bytes = filename.as_bytes();
    if bytes.len() >= 4 && bytes[bytes.len() - 4..].eq_ignore_ascii_case(b".wav") {
        Ok(())
    } else {
        Err(LectometroError::InvalidFilename {
            filename: filename.to_string(),
        })
    }
}

/// A validated evaluation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub subject_id: String,
    pub task: TaskType,
    pub form: Form,
    pub filename: String,
    pub audio: Vec<u8>,
}

impl EvaluationRequest {
    /// Build a request from typed fields. Fails if the filename is not a
    /// `.wav`, before the audio is ever looked at.
    pub fn new(
        subject_id: impl Into<String>,
        task: TaskType,
        form: Form,
        filename: impl Into<String>,
        audio: Vec<u8>,
    ) -> Result<Self> {
        let filename = filename.into();
        check_wav_filename(&filename)?;
        Ok(Self {
            subject_id: subject_id.into(),
            task,
            form,
            filename,
            audio,
        })
    }

    /// Build a request from raw transport fields.
    pub fn parse(
        subject_id: &str,
        task: &str,
        form: &str,
        filename: &str,
        audio: Vec<u8>,
    ) -> Result<Self> {
        let request = task.parse::<TaskType>().and_then(|task| {
            let form = form.parse::<Form>()?;
            Self::new(subject_id, task, form, filename, audio)
        });
        if let Err(ref e) = request {
            tracing::info!(error = %e, "Rejected evaluation request");
        }
        request
    }
}

/// Task-specific part of a result.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Fluency(FluencyScore),
    /// Decoding is not scored yet; the result carries a note instead.
    Decoding { note: String },
}

/// Everything measured for one request. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub subject_id: String,
    pub task: TaskType,
    pub form: Form,
    pub filename: String,
    pub size_bytes: usize,
    pub metrics: AudioMetrics,
    pub flags: QualityFlags,
    pub outcome: TaskOutcome,
}

impl EvaluationResult {
    pub fn fluency(&self) -> Option<&FluencyScore> {
        match &self.outcome {
            TaskOutcome::Fluency(score) => Some(score),
            TaskOutcome::Decoding { .. } => None,
        }
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Response field layout. Values are rounded here, at the boundary.
mod wire {
    use super::*;

    #[derive(Serialize)]
    pub(super) struct Response<'a> {
        pub id_sujeto: &'a str,
        pub tipo: TaskType,
        pub forma: Form,
        pub archivo: &'a str,
        pub audio_info: AudioInfo,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub fluencia: Option<Fluencia>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub decodificacion: Option<Decodificacion<'a>>,
    }

    #[derive(Serialize)]
    pub(super) struct AudioInfo {
        pub sample_rate: u32,
        pub duration_sec: f64,
        pub size_kb: f64,
        pub rms: f64,
        pub flags: QualityFlags,
    }

    #[derive(Serialize)]
    pub(super) struct Fluencia {
        pub n_palabras_texto: usize,
        pub wpm_texto: f64,
        pub categoria_provisoria: FluencyCategory,
    }

    #[derive(Serialize)]
    pub(super) struct Decodificacion<'a> {
        pub nota: &'a str,
    }
}

impl Serialize for EvaluationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let (fluencia, decodificacion) = match &self.outcome {
            TaskOutcome::Fluency(score) => (
                Some(wire::Fluencia {
                    n_palabras_texto: score.word_count,
                    wpm_texto: round_to(score.wpm, 2),
                    categoria_provisoria: score.category,
                }),
                None,
            ),
            TaskOutcome::Decoding { note } => {
                (None, Some(wire::Decodificacion { nota: note.as_str() }))
            }
        };

        wire::Response {
            id_sujeto: &self.subject_id,
            tipo: self.task,
            forma: self.form,
            archivo: &self.filename,
            audio_info: wire::AudioInfo {
                sample_rate: self.metrics.sample_rate,
                duration_sec: round_to(self.metrics.duration_secs, 3),
                size_kb: round_to(self.size_bytes as f64 / 1024.0, 1),
                rms: round_to(self.metrics.rms, 6),
                flags: self.flags,
            },
            fluencia,
            decodificacion,
        }
        .serialize(serializer)
    }
}

/// Decode, downmix, measure and flag an uploaded recording.
pub fn analyze_audio(
    bytes: &[u8],
    thresholds: &QualityThresholds,
) -> Result<(AudioMetrics, QualityFlags)> {
    let decoded = decode_wav(bytes)?;
    tracing::trace!(
        channels = decoded.channels,
        sample_rate = decoded.sample_rate,
        bits = decoded.bits_per_sample,
        frames = decoded.frames(),
        "Decoded WAV"
    );
    let buffer = to_mono(decoded)?;
    let metrics = AudioMetrics::measure(&buffer);
    let flags = QualityFlags::assess(&metrics, thresholds);
    Ok((metrics, flags))
}

/// Runs evaluations against a shared canonical text registry.
#[derive(Debug)]
pub struct Evaluator {
    registry: Arc<CanonicalTextRegistry>,
    quality: QualityThresholds,
    fluency: FluencyThresholds,
}

impl Evaluator {
    pub fn new(registry: Arc<CanonicalTextRegistry>) -> Self {
        Self {
            registry,
            quality: QualityThresholds::default(),
            fluency: FluencyThresholds::default(),
        }
    }

    pub fn from_config(config: &Config, registry: Arc<CanonicalTextRegistry>) -> Self {
        Self::new(registry).with_thresholds(config.quality, config.fluency)
    }

    pub fn with_thresholds(mut self, quality: QualityThresholds, fluency: FluencyThresholds) -> Self {
        self.quality = quality;
        self.fluency = fluency;
        self
    }

    pub fn registry(&self) -> &CanonicalTextRegistry {
        &self.registry
    }

    pub fn quality_thresholds(&self) -> &QualityThresholds {
        &self.quality
    }

    pub fn fluency_thresholds(&self) -> &FluencyThresholds {
        &self.fluency
    }

    /// Evaluate one request. Pure over its inputs apart from the first load
    /// of a canonical text.
    pub fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult> {
        tracing::debug!(
            subject = %request.subject_id,
            task = %request.task,
            form = %request.form,
            file = %request.filename,
            bytes = request.audio.len(),
            "Evaluating recording"
        );

        let result = match request.task {
            TaskType::Fluency => self.evaluate_fluency(request),
            TaskType::Decoding => analyze_audio(&request.audio, &self.quality).map(
                |(metrics, flags)| {
                    self.assemble(
                        request,
                        metrics,
                        flags,
                        TaskOutcome::Decoding {
                            note: defaults::DECODING_NOTE.to_string(),
                        },
                    )
                },
            ),
        };

        match &result {
            Ok(r) => tracing::debug!(
                subject = %r.subject_id,
                duration_secs = r.metrics.duration_secs,
                rms = r.metrics.rms,
                flagged = r.flags.any(),
                wpm = r.fluency().map(|s| s.wpm),
                "Evaluation complete"
            ),
            Err(e) if e.kind() == ErrorKind::MissingResource => {
                tracing::error!(kind = e.kind().as_str(), error = %e, "Evaluation failed")
            }
            Err(e) => tracing::warn!(kind = e.kind().as_str(), error = %e, "Evaluation failed"),
        }

        result
    }

    fn evaluate_fluency(&self, request: &EvaluationRequest) -> Result<EvaluationResult> {
        std::thread::scope(|scope| {
            let words = scope.spawn(|| self.registry.word_count(request.form));
            let audio = analyze_audio(&request.audio, &self.quality);
            let words = words.join().map_err(|_| {
                LectometroError::Other("Canonical text lookup panicked".to_string())
            })?;

            // Audio errors win: they are the caller's to fix.
            let (metrics, flags) = audio?;
            let word_count = words?;

            let score = self.fluency.score(word_count, metrics.duration_secs);
            Ok(self.assemble(request, metrics, flags, TaskOutcome::Fluency(score)))
        })
    }

    fn assemble(
        &self,
        request: &EvaluationRequest,
        metrics: AudioMetrics,
        flags: QualityFlags,
        outcome: TaskOutcome,
    ) -> EvaluationResult {
        EvaluationResult {
            subject_id: request.subject_id.clone(),
            task: request.task,
            form: request.form,
            filename: request.filename.clone(),
            size_bytes: request.audio.len(),
            metrics,
            flags,
            outcome,
        }
    }
}
