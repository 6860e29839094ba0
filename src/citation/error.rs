use thiserror::Error;

#[derive(Debug, Error)]
pub enum CitationError {
    #[error("invalid citation pattern '{name}': {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("quotation fraction must be in (0, 1], got {value}")]
    InvalidQuoteFraction { value: f32 },

    #[error("citation weight '{name}' must be in [0, 1], got {value}")]
    WeightOutOfRange { name: &'static str, value: f32 },
}
