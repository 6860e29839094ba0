//! Test fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use overlap::config::EngineConfig;
use overlap::corpus::SegmentRecord;
use overlap::embedding::MockOracle;
use overlap::engine::MatchEngine;
use overlap::scoring::ScoreWeights;

pub const DIM: usize = 16;

/// Unit vector along axis `k`.
pub fn axis(k: usize) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[k] = 1.0;
    v
}

/// Two unit vectors in the plane of axes `2k` and `2k + 1` whose cosine is `cos`.
///
/// Vectors from different `k` are orthogonal to each other.
pub fn pair_vectors(k: usize, cos: f32) -> (Vec<f32>, Vec<f32>) {
    let a = axis(2 * k);
    let mut b = vec![0.0; DIM];
    b[2 * k] = cos;
    b[2 * k + 1] = (1.0 - cos * cos).max(0.0).sqrt();
    (a, b)
}

/// Collects segment records and the vectors a [`MockOracle`] returns for them.
#[derive(Default)]
pub struct BatchBuilder {
    records: Vec<SegmentRecord>,
    oracle: MockOracle,
}

impl BatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sentence(self, submission: &str, document: &str, index: u32, text: &str, vector: Vec<f32>) -> Self {
        self.record(SegmentRecord::sentence(submission, document, index, text), vector)
    }

    pub fn paragraph(self, submission: &str, document: &str, index: u32, text: &str, vector: Vec<f32>) -> Self {
        self.record(SegmentRecord::paragraph(submission, document, index, text), vector)
    }

    pub fn record(mut self, record: SegmentRecord, vector: Vec<f32>) -> Self {
        self.oracle = self.oracle.with_vector(&record.text, vector);
        self.records.push(record);
        self
    }

    /// A sentence the oracle fails on.
    pub fn failing_sentence(mut self, submission: &str, document: &str, index: u32, text: &str) -> Self {
        self.oracle = self.oracle.failing_on(text);
        self.records
            .push(SegmentRecord::sentence(submission, document, index, text));
        self
    }

    pub fn build(self) -> (Vec<SegmentRecord>, MockOracle) {
        (self.records, self.oracle)
    }
}

/// Default config with the hit-count cap set to `cap`.
pub fn config_with_cap(cap: usize) -> EngineConfig {
    EngineConfig {
        score_weights: ScoreWeights {
            hit_count_cap: cap,
            ..ScoreWeights::default()
        },
        ..EngineConfig::default()
    }
}

pub fn engine(config: EngineConfig, oracle: MockOracle) -> MatchEngine {
    MatchEngine::new(config, Arc::new(oracle)).expect("valid engine config")
}

/// Four submissions sharing paraphrased sentences and one paragraph.
pub fn classroom_batch() -> BatchBuilder {
    let (a0, b0) = pair_vectors(0, 0.93);
    let (a1, c1) = pair_vectors(1, 0.88);
    let (b2, c2) = pair_vectors(2, 0.91);
    let (pa, pb) = pair_vectors(3, 0.86);
    let mut lone = vec![0.0; DIM];
    lone[DIM - 1] = 1.0;

    BatchBuilder::new()
        .sentence("alice", "alice-essay", 0, "Photosynthesis converts light into chemical energy.", a0)
        .sentence("alice", "alice-essay", 1, "Chlorophyll absorbs mostly red and blue light.", a1)
        .sentence("bob", "bob-essay", 0, "Light is turned into chemical energy by photosynthesis.", b0)
        .sentence("bob", "bob-essay", 1, "Plants release oxygen as a by-product.", b2)
        .sentence("carol", "carol-essay", 0, "Red and blue light are absorbed by chlorophyll.", c1)
        .sentence("carol", "carol-essay", 1, "Oxygen is released by plants as a by-product.", c2)
        .sentence("dave", "dave-essay", 0, "Volcanoes form at plate boundaries.", lone)
        .paragraph("alice", "alice-essay", 0, "Photosynthesis paragraph by alice.", pa)
        .paragraph("bob", "bob-essay", 0, "Photosynthesis paragraph by bob.", pb)
}
