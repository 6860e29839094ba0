//! Candidate retrieval.
//!
//! Every embedded segment queries its granularity's index. Neighbors above the
//! threshold become [`MatchHit`]s; the reverse direction of a pair found from
//! both ends is emitted once.

pub mod types;

#[cfg(test)]
mod tests;

pub use types::{MatchHit, RetrievalOutcome, RetrievalParams, SegmentPairKey};

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::budget::Deadline;
use crate::corpus::Segment;
use crate::index::GranularityIndex;

/// Hits for one segment, oriented and keyed canonically.
pub fn retrieve(
    index: &GranularityIndex,
    segments: &[Segment],
    segment: &Segment,
    vector: &[f32],
    params: RetrievalParams,
) -> Vec<MatchHit> {
    index
        .neighbors(segment, vector, params.top_k, params.threshold)
        .into_iter()
        .filter_map(|neighbor| {
            let other = segments.get(neighbor.id.as_usize())?;
            let (first, second) = if segment.id < other.id {
                (segment, other)
            } else {
                (other, segment)
            };
            Some(MatchHit {
                granularity: segment.granularity,
                seg_i: first.id,
                seg_j: second.id,
                similarity: neighbor.similarity,
                citation_i: first.citation,
                citation_j: second.citation,
            })
        })
        .collect()
}

type HitMap = HashMap<SegmentPairKey, MatchHit>;

fn insert_hit(map: &mut HitMap, hit: MatchHit) {
    map.entry(hit.key())
        .and_modify(|existing| {
            if hit.similarity > existing.similarity {
                *existing = hit;
            }
        })
        .or_insert(hit);
}

/// Runs [`retrieve`] for every segment that has a vector.
///
/// Queries fan out on the current rayon pool. Each worker folds into its own
/// map and the maps are merged pairwise, so no lock is taken. Once `deadline`
/// expires, remaining segments are skipped and counted.
pub fn retrieve_all(
    index: &GranularityIndex,
    segments: &[Segment],
    vectors: &[Option<Vec<f32>>],
    params: RetrievalParams,
    deadline: &Deadline,
) -> RetrievalOutcome {
    #[derive(Default)]
    struct Partial {
        hits: HitMap,
        queried: usize,
        skipped: usize,
    }

    let partial = segments
        .par_iter()
        .zip(vectors.par_iter())
        .filter_map(|(segment, vector)| vector.as_deref().map(|v| (segment, v)))
        .fold(Partial::default, |mut acc, (segment, vector)| {
            if deadline.expired() {
                acc.skipped += 1;
                return acc;
            }
            acc.queried += 1;
            for hit in retrieve(index, segments, segment, vector, params) {
                insert_hit(&mut acc.hits, hit);
            }
            acc
        })
        .reduce(Partial::default, |mut left, right| {
            let (mut big, small) = if left.hits.len() >= right.hits.len() {
                (std::mem::take(&mut left.hits), right.hits)
            } else {
                (right.hits, std::mem::take(&mut left.hits))
            };
            for (_, hit) in small {
                insert_hit(&mut big, hit);
            }
            Partial {
                hits: big,
                queried: left.queried + right.queried,
                skipped: left.skipped + right.skipped,
            }
        });

    let mut hits: Vec<MatchHit> = partial.hits.into_values().collect();
    hits.sort_by_key(MatchHit::key);

    if partial.skipped > 0 {
        warn!(
            granularity = %index.granularity(),
            skipped = partial.skipped,
            "Batch budget expired during retrieval"
        );
    }

    debug!(
        granularity = %index.granularity(),
        queried = partial.queried,
        hits = hits.len(),
        "Retrieval finished"
    );

    RetrievalOutcome {
        hits,
        queried: partial.queried,
        skipped: partial.skipped,
    }
}
