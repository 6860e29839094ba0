//! Overlap library crate (used by the `overlap` binary and integration tests).
//!
//! Flags near-duplicate and paraphrased content across a batch of text
//! submissions. Sentences and paragraphs are embedded by an external oracle,
//! matched through per-granularity vector indices, dampened when they carry
//! citations, aggregated per submission pair and fused into one score.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`SegmentStore`], [`SegmentRecord`] - Segments of a batch
//! - [`EmbeddingOracle`], [`ExecutionMode`] - Text to vector, and how calls are scheduled
//! - [`GranularityIndex`], [`IndexPartitioning`] - Nearest-neighbor search
//! - [`CitationDetector`], [`CitationRule`], [`CitationWeights`] - Citation handling
//! - [`MatchHit`], [`PairAggregate`] - Retrieval and aggregation output
//! - [`ScoreEngine`], [`PairScore`] - Composite scores and fusion
//!
//! ## Orchestration
//! - [`MatchEngine`], [`BatchReport`], [`BatchWarning`] - One call per batch
//! - [`EngineConfig`], [`ConfigError`] - Configuration
//! - [`ReportDocument`] - Versioned JSON output
//!
//! ## Test/Mock Support
//! `MockOracle` is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod aggregate;
pub mod budget;
pub mod citation;
pub mod config;
pub mod constants;
pub mod corpus;
pub mod embedding;
pub mod engine;
pub mod hashing;
pub mod index;
pub mod report;
pub mod retrieval;
pub mod scoring;

pub use aggregate::{EvidenceHit, PairAggregate, SubmissionPair};
pub use budget::Deadline;
pub use citation::{CitationDetector, CitationError, CitationRule, CitationWeights};
pub use config::{ConfigError, EngineConfig, GranularityConfig, IoConfig};
pub use constants::{DimConfig, DimValidationError, validate_embedding_dim};
pub use corpus::{CorpusError, Granularity, Segment, SegmentId, SegmentRecord, SegmentStore};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockOracle;
pub use embedding::{
    EmbeddingError, EmbeddingOracle, ExecutionMode, HashOracle, PrecomputedOracle,
};
pub use engine::{
    BatchReport, BatchWarning, EngineError, GranularityFailure, GranularityOutcome,
    GranularityResult, MatchEngine,
};
pub use hashing::{embedding_seed, hash_text, hash_to_u64};
pub use index::{GranularityIndex, IndexError, IndexPartitioning};
pub use report::ReportDocument;
pub use retrieval::{MatchHit, SegmentPairKey};
pub use scoring::{FusionWeights, PairScore, ScoreEngine, ScoreWeights, ScoringError};
