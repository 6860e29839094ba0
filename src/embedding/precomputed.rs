use std::collections::HashMap;

use crate::hashing::hash_text;

use super::EmbeddingOracle;
use super::error::{EmbeddingError, preview};

/// Oracle backed by vectors computed ahead of time, keyed by segment text.
///
/// Texts without a stored vector fail with [`EmbeddingError::UnknownText`], which
/// the engine reports as a missing embedding for that segment.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedOracle {
    vectors: HashMap<[u8; 32], Vec<f32>>,
}

impl PrecomputedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `vector` for `text`, returning the vector it replaced.
    pub fn insert(&mut self, text: &str, vector: Vec<f32>) -> Option<Vec<f32>> {
        self.vectors.insert(hash_text(text), vector)
    }

    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.insert(text, vector);
        self
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, Vec<f32>)> for PrecomputedOracle {
    fn from_iter<I: IntoIterator<Item = (&'a str, Vec<f32>)>>(iter: I) -> Self {
        let mut oracle = Self::new();
        for (text, vector) in iter {
            oracle.insert(text, vector);
        }
        oracle
    }
}

impl EmbeddingOracle for PrecomputedOracle {
    fn embed(&self, text: &str, _language_hint: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.vectors
            .get(&hash_text(text))
            .cloned()
            .ok_or_else(|| EmbeddingError::UnknownText {
                preview: preview(text),
            })
    }

    fn name(&self) -> &str {
        "precomputed"
    }
}
