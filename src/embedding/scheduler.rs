use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::budget::Deadline;
use crate::corpus::{Segment, SegmentId};

use super::EmbeddingOracle;
use super::config::ExecutionMode;
use super::error::EmbeddingError;

/// Vectors for one granularity's segments, aligned with the store's ids.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingBatch {
    /// `vectors[id]` is the L2-normalized vector of segment `id`, if any.
    pub vectors: Vec<Option<Vec<f32>>>,
    /// Segments the oracle failed on.
    pub failures: Vec<(SegmentId, EmbeddingError)>,
    /// Segments never sent to the oracle because the deadline expired.
    pub skipped: usize,
}

impl EmbeddingBatch {
    pub fn embedded(&self) -> usize {
        self.vectors.iter().filter(|v| v.is_some()).count()
    }
}

enum Outcome {
    Ready(Vec<f32>),
    Failed(EmbeddingError),
    Skipped,
}

/// Runs the oracle over `segments` according to `mode`.
///
/// Per-segment failures never abort the batch. Only failing to start the CPU
/// worker pool is an error.
pub fn embed_segments(
    segments: &[Segment],
    oracle: &dyn EmbeddingOracle,
    mode: ExecutionMode,
    deadline: &Deadline,
) -> Result<EmbeddingBatch, EmbeddingError> {
    if segments.is_empty() {
        return Ok(EmbeddingBatch::default());
    }

    debug!(
        segments = segments.len(),
        oracle = oracle.name(),
        ?mode,
        "Embedding segments"
    );

    let embed_one = |segment: &Segment| -> Outcome {
        if deadline.expired() {
            return Outcome::Skipped;
        }
        match oracle
            .embed(&segment.text, &segment.language)
            .and_then(normalize)
        {
            Ok(vector) => Outcome::Ready(vector),
            Err(e) => Outcome::Failed(e),
        }
    };

    let outcomes: Vec<Outcome> = match mode {
        ExecutionMode::Cpu { workers } => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("overlap-embed-{i}"))
                .build()
                .map_err(|e| EmbeddingError::Scheduler {
                    reason: e.to_string(),
                })?;
            pool.install(|| segments.par_iter().map(embed_one).collect())
        }
        ExecutionMode::Gpu => segments.iter().map(embed_one).collect(),
    };

    let mut batch = EmbeddingBatch {
        vectors: Vec::with_capacity(segments.len()),
        failures: Vec::new(),
        skipped: 0,
    };

    for (segment, outcome) in segments.iter().zip(outcomes) {
        match outcome {
            Outcome::Ready(vector) => batch.vectors.push(Some(vector)),
            Outcome::Failed(error) => {
                warn!(
                    segment = %segment.id,
                    submission = %segment.submission_id,
                    document = %segment.document_id,
                    index = segment.index,
                    error = %error,
                    "Missing embedding: segment excluded from matching"
                );
                batch.failures.push((segment.id, error));
                batch.vectors.push(None);
            }
            Outcome::Skipped => {
                batch.skipped += 1;
                batch.vectors.push(None);
            }
        }
    }

    if batch.skipped > 0 {
        warn!(
            skipped = batch.skipped,
            "Batch budget expired during embedding"
        );
    }

    info!(
        embedded = batch.embedded(),
        failed = batch.failures.len(),
        skipped = batch.skipped,
        "Embedding finished"
    );

    Ok(batch)
}

/// Scales `vector` to unit length, rejecting empty, zero and non-finite input.
pub fn normalize(mut vector: Vec<f32>) -> Result<Vec<f32>, EmbeddingError> {
    if vector.is_empty() {
        return Err(EmbeddingError::EmptyVector);
    }
    if let Some(position) = vector.iter().position(|x| !x.is_finite()) {
        return Err(EmbeddingError::NonFinite { position });
    }

    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return Err(EmbeddingError::ZeroNorm);
    }

    for x in &mut vector {
        *x /= norm;
    }
    Ok(vector)
}
