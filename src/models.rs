//! Core data types flowing through the analysis pipeline.
//!
//! These types define the request/response contract of the `/analyze`
//! endpoint and the shape of the records held by the corpus index.

use serde::{Deserialize, Serialize, Serializer};

/// Sentinel returned in `dataset_result` when no corpus record matches.
pub const NO_MATCH_MESSAGE: &str = "No matching content found.";

/// Two-class probability distribution produced by the classifier.
///
/// Values are non-negative and sum to 1.0 within floating-point tolerance
/// (they come out of a softmax over two logits).
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ClassProbs {
    pub class_0_prob: f32,
    pub class_1_prob: f32,
}

/// A single record in the static corpus.
///
/// The dataset file uses capitalized `Title`/`Content` keys; responses use
/// lowercase field names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorpusRecord {
    #[serde(rename(deserialize = "Title"))]
    pub title: String,
    #[serde(rename(deserialize = "Content"))]
    pub content: String,
}

/// The `dataset_result` field: either the no-match sentinel string or the
/// ordered list of matching records.
///
/// `NoMatch` is a unit variant so the sentinel text cannot be forged; it
/// always serializes as [`NO_MATCH_MESSAGE`].
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetResult {
    NoMatch,
    Matches(Vec<CorpusRecord>),
}

impl Serialize for DatasetResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DatasetResult::NoMatch => serializer.serialize_str(NO_MATCH_MESSAGE),
            DatasetResult::Matches(records) => records.serialize(serializer),
        }
    }
}

impl DatasetResult {
    /// Wraps a search result, substituting the sentinel for an empty match set.
    pub fn from_matches(matches: Vec<CorpusRecord>) -> Self {
        if matches.is_empty() {
            DatasetResult::NoMatch
        } else {
            DatasetResult::Matches(matches)
        }
    }
}

/// Combined response for one analysis request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalysisResult {
    pub model_analysis: ClassProbs,
    pub dataset_result: DatasetResult,
}
