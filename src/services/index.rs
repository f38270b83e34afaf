//! Buffered point writes into the vector store.
//!
//! Points accumulate into batches; intermediate batches are upserted
//! without waiting for durability, and the final batch of a job blocks
//! until the store acknowledges it. A failed upsert drops that batch and
//! bumps a counter surfaced in the job summary; there is no unbounded
//! retry against a struggling store.

use std::sync::Arc;

use serde::Serialize;

use crate::error::VectorStoreError;
use crate::models::IndexingConfig;
use crate::services::vector_store::{TranscriptPoint, VectorStore};

/// What to do when the target collection already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionMode {
    /// Keep the collection and upsert into it.
    Update,
    /// Destroy and rebuild. Only reachable through an explicit
    /// confirm-to-destroy decision upstream.
    Recreate,
}

/// Outcome of one indexing job, for the operator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexSummary {
    pub indexed: u64,
    pub embedding_failures: u64,
    pub upsert_failures: u64,
    pub cancelled: bool,
    pub duration_ms: u64,
}

pub struct IndexWriter {
    store: Arc<dyn VectorStore>,
    batch_size: usize,
    buffer: Vec<TranscriptPoint>,
    upsert_failures: u64,
}

impl IndexWriter {
    pub fn new(store: Arc<dyn VectorStore>, config: &IndexingConfig) -> Self {
        Self {
            store,
            batch_size: (config.upsert_batch_size as usize).max(1),
            buffer: Vec::new(),
            upsert_failures: 0,
        }
    }

    /// Check the target collection before the first write.
    ///
    /// Absent collections are created with the given dimension and
    /// cosine distance. An existing collection is kept in `Update` mode
    /// and destroyed and rebuilt in `Recreate` mode.
    pub async fn prepare_collection(
        &self,
        dimension: u64,
        mode: CollectionMode,
    ) -> Result<(), VectorStoreError> {
        match self.store.get_collection_info().await? {
            None => {
                tracing::info!(
                    collection = self.store.collection(),
                    dimension,
                    "creating collection"
                );
                self.store.create_collection(dimension).await
            }
            Some(info) => match mode {
                CollectionMode::Update => {
                    tracing::info!(
                        collection = self.store.collection(),
                        points = info.points_count,
                        "using existing collection; ids will be upserted"
                    );
                    Ok(())
                }
                CollectionMode::Recreate => {
                    tracing::warn!(
                        collection = self.store.collection(),
                        points = info.points_count,
                        "recreating collection; existing data is destroyed"
                    );
                    self.store.delete_collection().await?;
                    self.store.create_collection(dimension).await
                }
            },
        }
    }

    /// Queue a point, flushing a non-blocking batch when the buffer
    /// fills.
    pub async fn push(&mut self, point: TranscriptPoint) {
        self.buffer.push(point);
        if self.buffer.len() >= self.batch_size {
            self.flush(false).await;
        }
    }

    /// Flush the remaining buffer with a durability acknowledgment and
    /// return the number of points lost to failed upserts.
    pub async fn finish(&mut self) -> u64 {
        self.flush(true).await;
        self.upsert_failures
    }

    async fn flush(&mut self, wait: bool) {
        if self.buffer.is_empty() {
            return;
        }

        let batch = std::mem::take(&mut self.buffer);
        let batch_len = batch.len() as u64;

        match self.store.upsert_points(batch, wait).await {
            Ok(()) => {
                tracing::debug!(points = batch_len, wait, "upserted batch");
            }
            Err(e) => {
                tracing::error!(points = batch_len, error = %e, "upsert failed; batch dropped");
                self.upsert_failures += batch_len;
            }
        }
    }
}
