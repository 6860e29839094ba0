use thiserror::Error;

use crate::citation::CitationError;
use crate::config::ConfigError;
use crate::corpus::CorpusError;
use crate::embedding::EmbeddingError;
use crate::index::IndexError;
use crate::scoring::ScoringError;

/// Setup errors that stop a batch before any work starts.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("citation rules error: {0}")]
    Citation(#[from] CitationError),

    #[error("scoring weights error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("segment store error: {0}")]
    Corpus(#[from] CorpusError),
}

/// Fatal error confined to one granularity. The other granularity still runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GranularityFailure {
    #[error("index build failed: {0}")]
    Index(#[from] IndexError),

    #[error("embedding scheduler failed: {0}")]
    Embedding(#[from] EmbeddingError),
}
