//! Error types for the faktur-core library.
//!
//! Field extraction itself never fails: every stage degrades to a sentinel.
//! These errors cover the fallible edges around it, namely configuration
//! files and the injected text recognizer.

use thiserror::Error;

/// Main error type for the faktur library.
#[derive(Error, Debug)]
pub enum FakturError {
    /// Text recognition error from an injected recognizer.
    #[error("recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a [`TextRecognizer`](crate::recognizer::TextRecognizer).
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// The document bytes could not be decoded by the recognizer.
    #[error("unreadable document: {0}")]
    Unreadable(String),

    /// Recognition succeeded but produced no usable text.
    #[error("no text recognized")]
    NoText,

    /// The recognition backend failed.
    #[error("{backend} failed: {reason}")]
    Backend { backend: String, reason: String },
}

/// Errors related to configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Confidence weights do not add up to 1.0.
    #[error("confidence weights sum to {0}, expected 1.0")]
    WeightSum(f32),

    /// A fuzzy-match threshold is outside 0..=100.
    #[error("match threshold {name} must be within 0..=100, got {value}")]
    Threshold { name: String, value: u8 },

    /// The home entity name is blank.
    #[error("home entity name is empty")]
    EmptyHomeEntity,
}

/// Result type for the faktur library.
pub type Result<T> = std::result::Result<T, FakturError>;
