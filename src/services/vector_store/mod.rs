//! Vector store abstraction layer.
//!
//! A trait-based abstraction over the stores transcript points live in:
//! Qdrant for deployments, an in-process memory backend for local runs
//! and tests. Conflict resolution between concurrent readers and writers
//! is delegated to the backend; handles are shared without in-process
//! locking.

mod memory;
mod qdrant;

pub use memory::MemoryBackend;
pub use qdrant::QdrantBackend;

use async_trait::async_trait;

use crate::error::VectorStoreError;
use crate::models::VectorStoreConfig;

/// Collection information.
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub points_count: u64,
}

/// One stored transcript point.
///
/// `point_id` is a fresh internal UUID per indexing run; the stable
/// business id travels in the payload as `original_id` so lookups
/// survive re-indexing.
#[derive(Debug, Clone)]
pub struct TranscriptPoint {
    pub point_id: String,
    pub vector: Vec<f32>,
    pub original_id: String,
    pub full_text: String,
    pub indexed_at: String,
}

/// One nearest-neighbor hit before business-id resolution.
#[derive(Debug, Clone)]
pub struct StoredHit {
    pub point_id: String,
    pub original_id: Option<String>,
    pub score: f32,
}

/// Payload of a transcript fetched by business id.
#[derive(Debug, Clone)]
pub struct StoredTranscript {
    pub original_id: String,
    pub full_text: String,
}

/// Operations every transcript store backend provides.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Check if the store is reachable.
    async fn health_check(&self) -> Result<bool, VectorStoreError>;

    /// Collection info, or None if the collection doesn't exist.
    async fn get_collection_info(&self) -> Result<Option<CollectionInfo>, VectorStoreError>;

    /// Create the collection with the given vector dimension and cosine
    /// distance. A no-op if it already exists.
    async fn create_collection(&self, dimension: u64) -> Result<(), VectorStoreError>;

    /// Drop the collection and everything in it.
    async fn delete_collection(&self) -> Result<(), VectorStoreError>;

    /// Insert or update points. `wait=false` returns before the write is
    /// durable; the final batch of a job passes `wait=true`.
    async fn upsert_points(
        &self,
        points: Vec<TranscriptPoint>,
        wait: bool,
    ) -> Result<(), VectorStoreError>;

    /// K nearest neighbors by cosine similarity, best first.
    async fn search(
        &self,
        query_vector: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<StoredHit>, VectorStoreError>;

    /// Business ids of points whose stored text contains `query` as a
    /// whole word, case-insensitively, in index iteration order.
    async fn keyword_filter(&self, query: &str, limit: u64)
    -> Result<Vec<String>, VectorStoreError>;

    /// Fetch a transcript by business id. A miss is `Ok(None)`, not an
    /// error.
    async fn get_by_original_id(
        &self,
        id: &str,
    ) -> Result<Option<StoredTranscript>, VectorStoreError>;

    /// The collection name this store operates on.
    fn collection(&self) -> &str;
}

/// Create the Qdrant-backed store from configuration.
pub fn create_backend(config: &VectorStoreConfig) -> Result<Box<dyn VectorStore>, VectorStoreError> {
    let backend = QdrantBackend::new(config)?;
    Ok(Box::new(backend))
}
