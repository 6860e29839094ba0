use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use crate::citation::CitationDetector;

use super::error::CorpusError;
use super::types::{Document, Granularity, Segment, SegmentId, SegmentRecord, Submission};

/// Build-once, read-many container for every segment of a batch.
///
/// Segments are laid out per granularity in `(submission, document, index)`
/// order, so ids do not depend on the order records arrived in.
#[derive(Debug, Clone, Default)]
pub struct SegmentStore {
    sentences: Vec<Segment>,
    paragraphs: Vec<Segment>,
    documents: Vec<Document>,
    submissions: Vec<Submission>,
    totals: HashMap<(u32, Granularity), usize>,
}

impl SegmentStore {
    /// Builds the store and flags citation-bearing segments.
    ///
    /// `detector == None` disables citation detection: every segment is flagged
    /// non-citation.
    pub fn build(
        records: Vec<SegmentRecord>,
        detector: Option<&CitationDetector>,
    ) -> Result<Self, CorpusError> {
        let mut records = records;
        for record in &records {
            if record.submission_id.trim().is_empty() {
                return Err(CorpusError::EmptyIdentifier {
                    field: "submission_id",
                });
            }
            if record.document_id.trim().is_empty() {
                return Err(CorpusError::EmptyIdentifier {
                    field: "document_id",
                });
            }
        }

        records.sort_by(|a, b| {
            (&a.submission_id, &a.document_id, a.granularity, a.index).cmp(&(
                &b.submission_id,
                &b.document_id,
                b.granularity,
                b.index,
            ))
        });

        for pair in records.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.submission_id == b.submission_id
                && a.document_id == b.document_id
                && a.granularity == b.granularity
                && a.index == b.index
            {
                return Err(CorpusError::DuplicateSegment {
                    submission_id: b.submission_id.clone(),
                    document_id: b.document_id.clone(),
                    granularity: b.granularity,
                    index: b.index,
                });
            }
        }

        let flags: Vec<bool> = match detector {
            Some(detector) => records
                .par_iter()
                .map(|record| detector.detect(&record.text))
                .collect(),
            None => vec![false; records.len()],
        };

        let mut store = Self::default();
        let mut submission_lookup: HashMap<String, u32> = HashMap::new();
        let mut document_lookup: HashMap<String, usize> = HashMap::new();

        for (record, citation) in records.into_iter().zip(flags) {
            let ordinal = match submission_lookup.get(&record.submission_id) {
                Some(&ordinal) => ordinal,
                None => {
                    let ordinal = store.submissions.len() as u32;
                    submission_lookup.insert(record.submission_id.clone(), ordinal);
                    store.submissions.push(Submission {
                        id: record.submission_id.clone(),
                        ordinal,
                        documents: Vec::new(),
                    });
                    ordinal
                }
            };

            let doc_slot = match document_lookup.get(&record.document_id) {
                Some(&slot) => {
                    let owner = &store.documents[slot].submission_id;
                    if *owner != record.submission_id {
                        return Err(CorpusError::DocumentOwnerConflict {
                            document_id: record.document_id,
                            owner: owner.clone(),
                            submission_id: record.submission_id,
                        });
                    }
                    slot
                }
                None => {
                    let slot = store.documents.len();
                    document_lookup.insert(record.document_id.clone(), slot);
                    store.documents.push(Document {
                        id: record.document_id.clone(),
                        submission_id: record.submission_id.clone(),
                        language: record.language.clone(),
                        sentences: Vec::new(),
                        paragraphs: Vec::new(),
                    });
                    store.submissions[ordinal as usize]
                        .documents
                        .push(record.document_id.clone());
                    slot
                }
            };

            let table = store.table_mut(record.granularity);
            let id = u32::try_from(table.len()).map_err(|_| CorpusError::TooManySegments {
                granularity: record.granularity,
                count: table.len(),
            })?;
            let id = SegmentId(id);

            table.push(Segment {
                id,
                submission_id: record.submission_id,
                submission_ordinal: ordinal,
                document_id: record.document_id,
                granularity: record.granularity,
                index: record.index,
                text: record.text,
                language: record.language,
                citation,
            });

            let document = &mut store.documents[doc_slot];
            match record.granularity {
                Granularity::Sentence => document.sentences.push(id),
                Granularity::Paragraph => document.paragraphs.push(id),
            }

            *store.totals.entry((ordinal, record.granularity)).or_insert(0) += 1;
        }

        debug!(
            submissions = store.submissions.len(),
            documents = store.documents.len(),
            sentences = store.sentences.len(),
            paragraphs = store.paragraphs.len(),
            "Segment store built"
        );

        Ok(store)
    }

    fn table_mut(&mut self, granularity: Granularity) -> &mut Vec<Segment> {
        match granularity {
            Granularity::Sentence => &mut self.sentences,
            Granularity::Paragraph => &mut self.paragraphs,
        }
    }

    /// All segments of one granularity, indexed by [`SegmentId`].
    pub fn segments(&self, granularity: Granularity) -> &[Segment] {
        match granularity {
            Granularity::Sentence => &self.sentences,
            Granularity::Paragraph => &self.paragraphs,
        }
    }

    pub fn get(&self, granularity: Granularity, id: SegmentId) -> Option<&Segment> {
        self.segments(granularity).get(id.as_usize())
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, document_id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == document_id)
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Number of segments a submission has at `granularity` (the coverage denominator).
    pub fn total_segments(&self, submission_id: &str, granularity: Granularity) -> usize {
        self.submissions
            .iter()
            .find(|s| s.id == submission_id)
            .map(|s| self.total_segments_by_ordinal(s.ordinal, granularity))
            .unwrap_or(0)
    }

    pub(crate) fn total_segments_by_ordinal(&self, ordinal: u32, granularity: Granularity) -> usize {
        self.totals.get(&(ordinal, granularity)).copied().unwrap_or(0)
    }

    pub fn len(&self, granularity: Granularity) -> usize {
        self.segments(granularity).len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty() && self.paragraphs.is_empty()
    }
}
