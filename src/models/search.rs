//! Search modes, hits, and result envelopes.

use serde::{Deserialize, Serialize};

/// Bounds on `top_n` accepted at the search boundary.
pub const MIN_TOP_N: u64 = 1;
pub const MAX_TOP_N: u64 = 20;

/// Clamp a requested result count into the supported range.
pub fn clamp_top_n(top_n: u64) -> u64 {
    top_n.clamp(MIN_TOP_N, MAX_TOP_N)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Semantic,
    Keyword,
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "semantic" => Ok(SearchMode::Semantic),
            "keyword" => Ok(SearchMode::Keyword),
            _ => Err(format!("unknown search mode: {}", s)),
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Semantic => write!(f, "semantic"),
            SearchMode::Keyword => write!(f, "keyword"),
        }
    }
}

/// A single ranked hit.
///
/// Semantic hits carry a cosine similarity score; keyword hits
/// intentionally carry none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub transcript_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,

    /// 1-based rank in the result set.
    pub rank: usize,
}

/// Result envelope for one search call.
///
/// `warnings` surfaces data-integrity issues (e.g. stored points with no
/// business id) instead of silently patching them over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }
}
