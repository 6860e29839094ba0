use super::*;
use crate::citation::CitationDetector;

fn records() -> Vec<SegmentRecord> {
    vec![
        SegmentRecord::sentence("B", "b1", 1, "Second sentence of B."),
        SegmentRecord::sentence("A", "a1", 0, "First sentence of A."),
        SegmentRecord::paragraph("A", "a1", 0, "First sentence of A. Second sentence of A."),
        SegmentRecord::sentence("A", "a1", 1, "Second sentence of A."),
        SegmentRecord::sentence("B", "b1", 0, "According to Smith, results vary."),
    ]
}

#[test]
fn test_build_orders_segments_canonically() {
    let store = SegmentStore::build(records(), None).unwrap();

    let sentences = store.segments(Granularity::Sentence);
    assert_eq!(sentences.len(), 4);
    let keys: Vec<(&str, u32)> = sentences
        .iter()
        .map(|s| (s.submission_id.as_str(), s.index))
        .collect();
    assert_eq!(keys, vec![("A", 0), ("A", 1), ("B", 0), ("B", 1)]);

    for (position, segment) in sentences.iter().enumerate() {
        assert_eq!(segment.id.as_usize(), position);
    }
}

#[test]
fn test_build_is_independent_of_input_order() {
    let forward = SegmentStore::build(records(), None).unwrap();
    let mut reversed = records();
    reversed.reverse();
    let backward = SegmentStore::build(reversed, None).unwrap();

    assert_eq!(
        forward.segments(Granularity::Sentence),
        backward.segments(Granularity::Sentence)
    );
    assert_eq!(forward.submissions(), backward.submissions());
}

#[test]
fn test_submissions_and_documents() {
    let store = SegmentStore::build(records(), None).unwrap();

    let submissions = store.submissions();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0].id, "A");
    assert_eq!(submissions[0].ordinal, 0);
    assert_eq!(submissions[1].documents, vec!["b1".to_string()]);

    let doc = store.document("a1").unwrap();
    assert_eq!(doc.sentences.len(), 2);
    assert_eq!(doc.paragraphs.len(), 1);
    assert_eq!(doc.segments(Granularity::Paragraph).len(), 1);
    assert!(store.document("missing").is_none());
}

#[test]
fn test_total_segments_per_granularity() {
    let store = SegmentStore::build(records(), None).unwrap();

    assert_eq!(store.total_segments("A", Granularity::Sentence), 2);
    assert_eq!(store.total_segments("A", Granularity::Paragraph), 1);
    assert_eq!(store.total_segments("B", Granularity::Paragraph), 0);
    assert_eq!(store.total_segments("nobody", Granularity::Sentence), 0);
    assert_eq!(store.len(Granularity::Paragraph), 1);
    assert!(!store.is_empty());
}

#[test]
fn test_citation_flags_computed_on_build() {
    let detector = CitationDetector::default();
    let store = SegmentStore::build(records(), Some(&detector)).unwrap();

    let flagged: Vec<&str> = store
        .segments(Granularity::Sentence)
        .iter()
        .filter(|s| s.citation)
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(flagged, vec!["According to Smith, results vary."]);
}

#[test]
fn test_citation_disabled_flags_nothing() {
    let store = SegmentStore::build(records(), None).unwrap();
    assert!(
        store
            .segments(Granularity::Sentence)
            .iter()
            .all(|s| !s.citation)
    );
}

#[test]
fn test_duplicate_segment_rejected() {
    let mut input = records();
    input.push(SegmentRecord::sentence("A", "a1", 1, "duplicate"));

    let err = SegmentStore::build(input, None).unwrap_err();
    assert!(matches!(
        err,
        CorpusError::DuplicateSegment { index: 1, granularity: Granularity::Sentence, .. }
    ));
}

#[test]
fn test_same_index_different_granularity_allowed() {
    let input = vec![
        SegmentRecord::sentence("A", "a1", 0, "text"),
        SegmentRecord::paragraph("A", "a1", 0, "text"),
    ];
    assert!(SegmentStore::build(input, None).is_ok());
}

#[test]
fn test_document_owner_conflict() {
    let input = vec![
        SegmentRecord::sentence("A", "shared", 0, "one"),
        SegmentRecord::sentence("B", "shared", 0, "two"),
    ];
    let err = SegmentStore::build(input, None).unwrap_err();
    assert!(matches!(err, CorpusError::DocumentOwnerConflict { .. }));
}

#[test]
fn test_empty_identifier_rejected() {
    let input = vec![SegmentRecord::sentence(" ", "d", 0, "text")];
    let err = SegmentStore::build(input, None).unwrap_err();
    assert!(matches!(
        err,
        CorpusError::EmptyIdentifier { field: "submission_id" }
    ));
}

#[test]
fn test_empty_store() {
    let store = SegmentStore::build(Vec::new(), None).unwrap();
    assert!(store.is_empty());
    assert!(store.submissions().is_empty());
}

#[test]
fn test_record_deserialize_defaults_language() {
    let record: SegmentRecord = serde_json::from_str(
        r#"{"submission_id":"A","document_id":"a1","granularity":"paragraph","index":3,"text":"t"}"#,
    )
    .unwrap();
    assert_eq!(record.language, "und");
    assert_eq!(record.granularity, Granularity::Paragraph);
}

#[test]
fn test_granularity_parse() {
    assert_eq!("Sentence".parse::<Granularity>(), Ok(Granularity::Sentence));
    assert_eq!("para".parse::<Granularity>(), Ok(Granularity::Paragraph));
    assert!("word".parse::<Granularity>().is_err());
    assert_eq!(Granularity::Paragraph.to_string(), "paragraph");
}

#[test]
fn test_corpus_file_inline_and_mapped_vectors() {
    use crate::embedding::EmbeddingOracle;

    let file = CorpusFile::from_json_str(
        r#"{
            "segments": [
                {"submission_id": "A", "document_id": "a1", "granularity": "sentence", "index": 0,
                 "text": "inline", "language": "en", "embedding": [1.0, 0.0]},
                {"submission_id": "B", "document_id": "b1", "granularity": "sentence", "index": 0,
                 "text": "mapped"}
            ],
            "vectors": {"mapped": [0.0, 1.0], "inline": [0.5, 0.5]}
        }"#,
    )
    .unwrap();
    assert!(file.has_vectors());

    let (records, oracle) = file.into_parts();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].language, "en");
    assert_eq!(records[1].language, "und");
    assert_eq!(oracle.len(), 2);
    assert_eq!(oracle.embed("inline", "en").unwrap(), vec![1.0, 0.0]);
    assert_eq!(oracle.embed("mapped", "und").unwrap(), vec![0.0, 1.0]);
}

#[test]
fn test_corpus_file_without_vectors() {
    let file = CorpusFile::from_json_str(r#"{"segments": []}"#).unwrap();
    assert!(!file.has_vectors());
}

#[test]
fn test_corpus_file_identical_text_keeps_last_inline_vector() {
    use crate::embedding::EmbeddingOracle;

    let file = CorpusFile::from_json_str(
        r#"{
            "segments": [
                {"submission_id": "A", "document_id": "a1", "granularity": "sentence", "index": 0,
                 "text": "same words", "embedding": [1.0, 0.0]},
                {"submission_id": "B", "document_id": "b1", "granularity": "sentence", "index": 0,
                 "text": "same words", "embedding": [0.0, 1.0]}
            ]
        }"#,
    )
    .unwrap();

    let (records, oracle) = file.into_parts();
    assert_eq!(records.len(), 2);
    assert_eq!(oracle.len(), 1);
    assert_eq!(oracle.embed("same words", "und").unwrap(), vec![0.0, 1.0]);
}
