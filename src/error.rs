//! Error types for lectometro.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LectometroError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Request validation errors
    #[error("Invalid task type '{value}': expected FL or DEC")]
    InvalidTaskType { value: String },

    #[error("Invalid form '{value}': expected 2A or 2B")]
    InvalidForm { value: String },

    #[error("Invalid file '{filename}': only .wav files are accepted")]
    InvalidFilename { filename: String },

    #[error("No audio file was uploaded")]
    MissingAudio,

    // Audio errors
    #[error("Could not decode audio: {message}")]
    Decode { message: String },

    // Canonical text errors
    #[error("Canonical text not found: {resource}")]
    MissingResource { resource: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Coarse classification used at the transport boundary and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller sent something we refuse to evaluate.
    InvalidInput,
    /// The audio payload is corrupt or unsupported.
    Decode,
    /// A canonical text is not provisioned. Server-side fault.
    MissingResource,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Decode => "decode",
            ErrorKind::MissingResource => "missing_resource",
            ErrorKind::Internal => "internal",
        }
    }
}

impl LectometroError {
    pub fn decode(message: impl Into<String>) -> Self {
        LectometroError::Decode {
            message: message.into(),
        }
    }

    /// Classify this error. `InvalidForm` stays its own variant for logging
    /// but is a plain invalid-input error to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LectometroError::InvalidTaskType { .. }
            | LectometroError::InvalidForm { .. }
            | LectometroError::InvalidFilename { .. }
            | LectometroError::MissingAudio => ErrorKind::InvalidInput,
            LectometroError::Decode { .. } => ErrorKind::Decode,
            LectometroError::MissingResource { .. } => ErrorKind::MissingResource,
            LectometroError::ConfigFileNotFound { .. }
            | LectometroError::ConfigInvalidValue { .. }
            | LectometroError::Config(_)
            | LectometroError::Io(_)
            | LectometroError::Other(_) => ErrorKind::Internal,
        }
    }

    /// Underlying cause, reported separately for decode failures.
    pub fn detail(&self) -> Option<&str> {
        match self {
            LectometroError::Decode { message } => Some(message),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LectometroError>;
