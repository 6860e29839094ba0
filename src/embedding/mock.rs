//! Scripted oracle for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::ThreadId;

use parking_lot::Mutex;

use super::EmbeddingOracle;
use super::error::{EmbeddingError, preview};

/// Oracle returning scripted vectors, failing on demand, and recording how it
/// was called.
#[derive(Debug, Default)]
pub struct MockOracle {
    vectors: HashMap<String, Vec<f32>>,
    failing: HashSet<String>,
    calls: AtomicUsize,
    threads: Mutex<HashSet<ThreadId>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    /// Makes `embed` fail with [`EmbeddingError::Unavailable`] for `text`.
    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of distinct threads that called `embed`.
    pub fn thread_count(&self) -> usize {
        self.threads.lock().len()
    }
}

impl EmbeddingOracle for MockOracle {
    fn embed(&self, text: &str, _language_hint: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.threads.lock().insert(std::thread::current().id());

        if self.failing.contains(text) {
            return Err(EmbeddingError::Unavailable {
                reason: "scripted failure".to_string(),
            });
        }

        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| EmbeddingError::UnknownText {
                preview: preview(text),
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
