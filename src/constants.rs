//! Cross-cutting, shared defaults.
//!
//! Every value here is only a default: the engine reads its working values from
//! [`EngineConfig`](crate::config::EngineConfig), so tests and callers can swap
//! weight schemes without recompiling.
//!
//! # Dimension Invariants
//!
//! The oracle decides the embedding dimension. Indices only require that all
//! vectors of one granularity agree with each other (and with
//! [`DimConfig::embedding_dim`] when one is configured). Use
//! [`validate_embedding_dim`] at module boundaries to catch mismatches early.

/// Default sentence-level similarity threshold.
pub const DEFAULT_SENTENCE_THRESHOLD: f32 = 0.80;

/// Default paragraph-level similarity threshold. Longer spans produce lower raw
/// cosine scores, so the bar sits below the sentence one.
pub const DEFAULT_PARAGRAPH_THRESHOLD: f32 = 0.75;

/// Neighbors requested per index query.
pub const DEFAULT_QUERY_TOP_K: usize = 50;

/// Evidence hits retained per pair aggregate.
pub const DEFAULT_EVIDENCE_CAP: usize = 20;

/// Hit count at which the hit-count term of the composite score saturates.
pub const DEFAULT_HIT_COUNT_CAP: usize = 50;

pub const DEFAULT_WEIGHT_MEAN_SIM: f32 = 0.40;
pub const DEFAULT_WEIGHT_COVERAGE: f32 = 0.35;
pub const DEFAULT_WEIGHT_MAX_SIM: f32 = 0.15;
pub const DEFAULT_WEIGHT_HIT_COUNT: f32 = 0.10;

pub const DEFAULT_FUSION_SENTENCE: f32 = 0.4;
pub const DEFAULT_FUSION_PARAGRAPH: f32 = 0.6;

/// Citation multiplier when neither side of a hit carries a citation marker.
pub const DEFAULT_CITATION_WEIGHT_NONE: f32 = 1.0;
/// Citation multiplier when exactly one side carries a citation marker.
pub const DEFAULT_CITATION_WEIGHT_ONE: f32 = 0.6;
/// Citation multiplier when both sides carry citation markers.
pub const DEFAULT_CITATION_WEIGHT_BOTH: f32 = 0.3;

/// Minimum share of a segment's characters that must sit inside quotation
/// marks before the quotation rule flags it.
pub const DEFAULT_QUOTE_MIN_FRACTION: f32 = 0.2;

/// Tolerance used when checking that weight sets sum to one.
pub const WEIGHT_SUM_TOLERANCE: f32 = 1e-4;

/// Version of the serialized report document. Bump on any field change.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Runtime dimension configuration shared by the oracle layer and the indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DimConfig {
    /// Expected embedding dimension. `None` accepts whatever the first vector has.
    pub embedding_dim: Option<usize>,
}

impl DimConfig {
    /// Creates a configuration pinned to `embedding_dim`.
    pub fn new(embedding_dim: usize) -> Self {
        Self {
            embedding_dim: Some(embedding_dim),
        }
    }

    /// Returns an error when a pinned dimension is zero.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        if self.embedding_dim == Some(0) {
            return Err(DimValidationError::ZeroDimension);
        }
        Ok(())
    }

    /// Checks `actual` against the pinned dimension, if any.
    pub fn check(&self, actual: usize) -> Result<(), DimValidationError> {
        match self.embedding_dim {
            Some(expected) => validate_embedding_dim(actual, expected),
            None if actual == 0 => Err(DimValidationError::ZeroDimension),
            None => Ok(()),
        }
    }
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use overlap::constants::validate_embedding_dim;
///
/// assert!(validate_embedding_dim(384, 384).is_ok());
/// assert!(validate_embedding_dim(768, 384).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dim_config_default_accepts_any_nonzero() {
        let config = DimConfig::default();
        assert!(config.check(384).is_ok());
        assert!(config.check(3).is_ok());
        assert_eq!(config.check(0), Err(DimValidationError::ZeroDimension));
    }

    #[test]
    fn test_dim_config_pinned() {
        let config = DimConfig::new(384);
        assert!(config.validate().is_ok());
        assert!(config.check(384).is_ok());
        assert_eq!(
            config.check(768),
            Err(DimValidationError::DimensionMismatch {
                expected: 384,
                actual: 768
            })
        );
    }

    #[test]
    fn test_dim_config_validate_zero() {
        let config = DimConfig::new(0);
        assert_eq!(config.validate(), Err(DimValidationError::ZeroDimension));
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let score_sum = DEFAULT_WEIGHT_MEAN_SIM
            + DEFAULT_WEIGHT_COVERAGE
            + DEFAULT_WEIGHT_MAX_SIM
            + DEFAULT_WEIGHT_HIT_COUNT;
        assert!((score_sum - 1.0).abs() < WEIGHT_SUM_TOLERANCE);

        let fusion_sum = DEFAULT_FUSION_SENTENCE + DEFAULT_FUSION_PARAGRAPH;
        assert!((fusion_sum - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
        assert!(DEFAULT_FUSION_PARAGRAPH > DEFAULT_FUSION_SENTENCE);
    }

    #[test]
    fn test_error_display() {
        let err = DimValidationError::ZeroDimension;
        assert_eq!(err.to_string(), "embedding dimension cannot be zero");

        let err = DimValidationError::DimensionMismatch {
            expected: 384,
            actual: 768,
        };
        assert!(err.to_string().contains("384"));
        assert!(err.to_string().contains("768"));
    }
}
