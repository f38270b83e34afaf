//! Transcript records and embedding outcomes.

use serde::{Deserialize, Serialize};

/// A cleaned call transcript, keyed by its stable business id.
///
/// Records are immutable once embedded: re-indexing writes a new point
/// under a fresh internal id with the business id duplicated in the
/// payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub id: String,
    pub full_text: String,
}

impl TranscriptRecord {
    pub fn new(id: impl Into<String>, full_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_text: full_text.into(),
        }
    }
}

/// Per-position result of a batch embedding run.
///
/// A batch result always carries one outcome per input position: inputs
/// that were invalid, or whose chunk failed, are `Missing` rather than
/// absent.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingOutcome {
    Vector(Vec<f32>),
    Missing,
}

impl EmbeddingOutcome {
    pub fn as_vector(&self) -> Option<&[f32]> {
        match self {
            EmbeddingOutcome::Vector(v) => Some(v),
            EmbeddingOutcome::Missing => None,
        }
    }

    pub fn into_vector(self) -> Option<Vec<f32>> {
        match self {
            EmbeddingOutcome::Vector(v) => Some(v),
            EmbeddingOutcome::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, EmbeddingOutcome::Missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_outcome_accessors() {
        let vector = EmbeddingOutcome::Vector(vec![0.1, 0.2]);
        assert_eq!(vector.as_vector(), Some([0.1, 0.2].as_slice()));
        assert!(!vector.is_missing());

        let missing = EmbeddingOutcome::Missing;
        assert_eq!(missing.as_vector(), None);
        assert!(missing.is_missing());
        assert_eq!(missing.into_vector(), None);
    }
}
