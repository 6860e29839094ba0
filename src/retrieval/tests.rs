use std::time::Duration;

use super::*;
use crate::budget::Deadline;
use crate::constants::DimConfig;
use crate::corpus::{Granularity, SegmentId, SegmentRecord, SegmentStore};
use crate::index::{GranularityIndex, IndexPartitioning};

fn unit(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    v.iter().map(|x| x / norm).collect()
}

struct Setup {
    store: SegmentStore,
    vectors: Vec<Option<Vec<f32>>>,
    index: GranularityIndex,
}

fn setup(vectors: Vec<Option<Vec<f32>>>) -> Setup {
    let store = SegmentStore::build(
        vec![
            SegmentRecord::sentence("A", "a1", 0, "a0"),
            SegmentRecord::sentence("A", "a1", 1, "a1"),
            SegmentRecord::sentence("B", "b1", 0, "b0"),
            SegmentRecord::sentence("C", "c1", 0, "c0"),
        ],
        None,
    )
    .unwrap();
    let index = GranularityIndex::build(
        Granularity::Sentence,
        store.segments(Granularity::Sentence),
        &vectors,
        IndexPartitioning::Shared,
        DimConfig::default(),
    )
    .unwrap();
    Setup {
        store,
        vectors,
        index,
    }
}

const PARAMS: RetrievalParams = RetrievalParams {
    top_k: 50,
    threshold: 0.8,
};

#[test]
fn test_segment_pair_key_is_canonical() {
    let a = SegmentPairKey::new(SegmentId(4), SegmentId(1));
    let b = SegmentPairKey::new(SegmentId(1), SegmentId(4));
    assert_eq!(a, b);
    assert_eq!(a.low, SegmentId(1));
}

#[test]
fn test_retrieve_orients_hits() {
    let s = setup(vec![
        Some(vec![1.0, 0.0]),
        Some(vec![0.0, 1.0]),
        Some(vec![1.0, 0.0]),
        Some(vec![0.0, 1.0]),
    ]);
    let segments = s.store.segments(Granularity::Sentence);

    let hits = retrieve(&s.index, segments, &segments[2], &[1.0, 0.0], PARAMS);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].seg_i, SegmentId(0));
    assert_eq!(hits[0].seg_j, SegmentId(2));
    assert_eq!(hits[0].granularity, Granularity::Sentence);
}

#[test]
fn test_retrieve_all_deduplicates_reverse_pairs() {
    let s = setup(vec![
        Some(vec![1.0, 0.0]),
        Some(vec![0.0, 1.0]),
        Some(vec![1.0, 0.0]),
        Some(unit(&[1.0, 1.0])),
    ]);
    let segments = s.store.segments(Granularity::Sentence);

    let outcome = retrieve_all(&s.index, segments, &s.vectors, PARAMS, &Deadline::none());
    assert_eq!(outcome.queried, 4);
    assert_eq!(outcome.skipped, 0);

    let keys: Vec<(u32, u32)> = outcome
        .hits
        .iter()
        .map(|h| (h.seg_i.0, h.seg_j.0))
        .collect();
    // 0.707 between the diagonal and the axes stays below 0.8
    assert_eq!(keys, vec![(0, 2)]);
    assert!((outcome.hits[0].similarity - 1.0).abs() < 1e-6);
}

#[test]
fn test_retrieve_all_skips_missing_vectors() {
    let s = setup(vec![Some(vec![1.0, 0.0]), None, None, Some(vec![1.0, 0.0])]);
    let segments = s.store.segments(Granularity::Sentence);

    let outcome = retrieve_all(&s.index, segments, &s.vectors, PARAMS, &Deadline::none());
    assert_eq!(outcome.queried, 2);
    assert_eq!(outcome.hits.len(), 1);
    assert_eq!(outcome.hits[0].key(), SegmentPairKey::new(SegmentId(3), SegmentId(0)));
}

#[test]
fn test_retrieve_all_sorted_and_order_independent() {
    let v = vec![1.0, 0.0];
    let s = setup(vec![Some(v.clone()), Some(v.clone()), Some(v.clone()), Some(v)]);
    let segments = s.store.segments(Granularity::Sentence);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
    let serial = pool.install(|| retrieve_all(&s.index, segments, &s.vectors, PARAMS, &Deadline::none()));
    let parallel = retrieve_all(&s.index, segments, &s.vectors, PARAMS, &Deadline::none());

    assert_eq!(serial.hits, parallel.hits);
    // A-A pairs are never produced
    let keys: Vec<(u32, u32)> = parallel.hits.iter().map(|h| (h.seg_i.0, h.seg_j.0)).collect();
    assert_eq!(keys, vec![(0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
}

#[test]
fn test_retrieve_all_expired_deadline() {
    let v = vec![1.0, 0.0];
    let s = setup(vec![Some(v.clone()), Some(v.clone()), Some(v.clone()), Some(v)]);
    let segments = s.store.segments(Granularity::Sentence);

    let outcome = retrieve_all(
        &s.index,
        segments,
        &s.vectors,
        PARAMS,
        &Deadline::after(Duration::ZERO),
    );
    assert!(outcome.hits.is_empty());
    assert_eq!(outcome.skipped, 4);
    assert_eq!(outcome.queried, 0);
}

#[test]
fn test_retrieve_copies_citation_flags() {
    let store = SegmentStore::build(
        vec![
            SegmentRecord::sentence("A", "a1", 0, "As shown in [1], it works."),
            SegmentRecord::sentence("B", "b1", 0, "It works."),
        ],
        Some(&crate::citation::CitationDetector::default()),
    )
    .unwrap();
    let vectors = vec![Some(vec![1.0, 0.0]), Some(vec![1.0, 0.0])];
    let segments = store.segments(Granularity::Sentence);
    let index = GranularityIndex::build(
        Granularity::Sentence,
        segments,
        &vectors,
        IndexPartitioning::Shared,
        DimConfig::default(),
    )
    .unwrap();

    let outcome = retrieve_all(&index, segments, &vectors, PARAMS, &Deadline::none());
    assert_eq!(outcome.hits.len(), 1);
    assert!(outcome.hits[0].citation_i);
    assert!(!outcome.hits[0].citation_j);
}
