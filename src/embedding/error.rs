use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EmbeddingError {
    #[error("embedding oracle unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("no precomputed vector for text '{preview}'")]
    UnknownText { preview: String },

    #[error("oracle returned an empty vector")]
    EmptyVector,

    #[error("oracle returned a zero-norm vector")]
    ZeroNorm,

    #[error("oracle returned a non-finite component at position {position}")]
    NonFinite { position: usize },

    #[error("failed to start embedding workers: {reason}")]
    Scheduler { reason: String },
}

/// First 40 characters of `text`, for error messages.
pub(crate) fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 40;
    let mut out: String = text.chars().take(MAX_CHARS).collect();
    if text.chars().count() > MAX_CHARS {
        out.push('…');
    }
    out
}
