use serde::{Deserialize, Serialize};

/// Segmentation level of a [`Segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Sentence,
    Paragraph,
}

impl Granularity {
    /// Both granularities, in pipeline order.
    pub const ALL: [Granularity; 2] = [Granularity::Sentence, Granularity::Paragraph];

    /// Returns the lowercase name used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Sentence => "sentence",
            Granularity::Paragraph => "paragraph",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sentence" | "sent" => Ok(Self::Sentence),
            "paragraph" | "para" => Ok(Self::Paragraph),
            _ => Err(format!("Unknown granularity: {}", s)),
        }
    }
}

/// Position of a segment inside the store's table for one granularity.
///
/// Ids are only meaningful together with the granularity they were issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(pub u32);

impl SegmentId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One segment as handed over by the ingestion collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub submission_id: String,
    pub document_id: String,
    pub granularity: Granularity,
    pub index: u32,
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "und".to_string()
}

impl SegmentRecord {
    pub fn new(
        submission_id: impl Into<String>,
        document_id: impl Into<String>,
        granularity: Granularity,
        index: u32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            submission_id: submission_id.into(),
            document_id: document_id.into(),
            granularity,
            index,
            text: text.into(),
            language: default_language(),
        }
    }

    pub fn sentence(
        submission_id: impl Into<String>,
        document_id: impl Into<String>,
        index: u32,
        text: impl Into<String>,
    ) -> Self {
        Self::new(submission_id, document_id, Granularity::Sentence, index, text)
    }

    pub fn paragraph(
        submission_id: impl Into<String>,
        document_id: impl Into<String>,
        index: u32,
        text: impl Into<String>,
    ) -> Self {
        Self::new(submission_id, document_id, Granularity::Paragraph, index, text)
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Immutable segment held by the [`SegmentStore`](super::SegmentStore).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub id: SegmentId,
    pub submission_id: String,
    /// Dense ordinal of the owning submission; used for same-submission exclusion.
    pub submission_ordinal: u32,
    pub document_id: String,
    pub granularity: Granularity,
    pub index: u32,
    pub text: String,
    pub language: String,
    pub citation: bool,
}

/// Document with its two independent segmentations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    pub submission_id: String,
    /// Language of the first segment seen for this document.
    pub language: String,
    pub sentences: Vec<SegmentId>,
    pub paragraphs: Vec<SegmentId>,
}

impl Document {
    pub fn segments(&self, granularity: Granularity) -> &[SegmentId] {
        match granularity {
            Granularity::Sentence => &self.sentences,
            Granularity::Paragraph => &self.paragraphs,
        }
    }
}

/// A submission and the documents it owns, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub id: String,
    pub ordinal: u32,
    pub documents: Vec<String>,
}
