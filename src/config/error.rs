//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::citation::CitationError;
use crate::corpus::Granularity;
use crate::scoring::ScoringError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A float variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    FloatParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// An integer variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    IntParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A boolean variable was not one of the accepted spellings.
    #[error("invalid boolean {name}='{value}': expected true/false, 1/0, yes/no or on/off")]
    InvalidBool { name: &'static str, value: String },

    #[error("invalid execution mode '{value}': expected 'cpu' or 'gpu'")]
    InvalidExecutionMode { value: String },

    /// Similarity threshold outside `[0, 1]`.
    #[error("{granularity} threshold must be in [0, 1], got {value}")]
    ThresholdOutOfRange { granularity: Granularity, value: f32 },

    /// A count that must be positive was zero.
    #[error("{name} must be at least 1")]
    ZeroLimit { name: &'static str },

    #[error("embedding dimension cannot be zero")]
    ZeroDimension,

    /// Batch budget was negative, zero or not finite.
    #[error("batch budget must be a positive number of seconds, got {value}")]
    InvalidBudget { value: f64 },

    #[error("invalid scoring configuration: {0}")]
    Scoring(#[from] ScoringError),

    #[error("invalid citation configuration: {0}")]
    Citation(#[from] CitationError),

    /// Config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config document was not valid JSON for [`EngineConfig`](super::EngineConfig).
    #[error("invalid config document: {0}")]
    Json(#[from] serde_json::Error),
}
