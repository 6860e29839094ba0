use tracing::debug;

use crate::hashing::embedding_seed;

use super::EmbeddingOracle;
use super::error::EmbeddingError;

/// Deterministic stub oracle: every distinct (text, language) gets a fixed
/// pseudo-random unit vector.
///
/// Identical texts map to identical vectors (similarity 1.0); anything else is
/// close to orthogonal. Good enough for exact-copy detection and for tests, never
/// for paraphrases.
#[derive(Debug, Clone)]
pub struct HashOracle {
    dim: usize,
}

impl HashOracle {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl EmbeddingOracle for HashOracle {
    fn embed(&self, text: &str, language_hint: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.dim == 0 {
            return Err(EmbeddingError::EmptyVector);
        }

        debug!(text_len = text.len(), "Generating stub embedding");

        let mut state = embedding_seed(text, language_hint);
        let mut embedding = Vec::with_capacity(self.dim);
        for _ in 0..self.dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        Ok(embedding)
    }

    fn name(&self) -> &str {
        "hash-stub"
    }
}
