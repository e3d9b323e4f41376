//! Per-URL outcomes and the batch envelope.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::PreviewError;
use crate::types::record::MetadataRecord;

/// Result of running the pipeline for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Metadata was extracted
    Success(MetadataRecord),

    /// The URL failed at some stage of the pipeline
    Failure { url: String, error: PreviewError },
}

impl Outcome {
    /// The URL this outcome was produced for.
    pub fn url(&self) -> &str {
        match self {
            Self::Success(record) => &record.url,
            Self::Failure { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The record, if extraction succeeded.
    pub fn record(&self) -> Option<&MetadataRecord> {
        match self {
            Self::Success(record) => Some(record),
            Self::Failure { .. } => None,
        }
    }

    /// The error, if extraction failed.
    pub fn error(&self) -> Option<&PreviewError> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error, .. } => Some(error),
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(record) => record.serialize(serializer),
            Self::Failure { url, error } => {
                let mut state = serializer.serialize_struct("Failure", 2)?;
                state.serialize_field("url", url)?;
                state.serialize_field("error", &error.to_string())?;
                state.end()
            }
        }
    }
}

/// Ordered outcomes for a batch; `results[i]` belongs to input URL `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub results: Vec<Outcome>,
    pub total: usize,
}

impl BatchResult {
    pub fn new(results: Vec<Outcome>) -> Self {
        let total = results.len();
        Self { results, total }
    }

    /// Number of outcomes that carry a record.
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|o| o.is_success()).count()
    }
}

/// What the core returns for a target request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PreviewResponse {
    /// A lone URL: the record itself, no envelope
    Single(MetadataRecord),

    /// Two or more URLs
    Batch(BatchResult),
}
