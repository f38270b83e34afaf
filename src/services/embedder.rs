//! Order-preserving batch embedding on top of the gateway.
//!
//! Input texts are validated up front; valid ones are grouped into
//! chunks and embedded with bounded concurrency. The result always has
//! the same length and order as the input, with invalid positions and
//! failed chunks marked `Missing` rather than dropped. A chunk failure
//! never aborts the rest of the job.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;

use crate::models::{EmbeddingOutcome, IndexingConfig};
use crate::services::gateway::GatewayClient;
use crate::utils::cancel::CancelFlag;
use crate::utils::text::is_embeddable;

pub struct BatchEmbedder {
    gateway: Arc<GatewayClient>,
    chunk_size: usize,
    concurrency: usize,
}

impl BatchEmbedder {
    pub fn new(gateway: Arc<GatewayClient>, config: &IndexingConfig) -> Self {
        Self {
            gateway,
            chunk_size: (config.embed_batch_size as usize).max(1),
            concurrency: (config.concurrency as usize).max(1),
        }
    }

    /// Embed every text, returning one outcome per input position.
    ///
    /// Chunks are dispatched concurrently; global order is reconstructed
    /// at the merge, not during dispatch. Cancellation is checked at
    /// chunk boundaries: once the flag is set, undispatched chunks come
    /// back `Missing` while in-flight calls are left to finish.
    pub async fn embed_all(&self, texts: &[String], cancel: &CancelFlag) -> Vec<EmbeddingOutcome> {
        let mut outcomes = vec![EmbeddingOutcome::Missing; texts.len()];

        let valid: Vec<(usize, String)> = texts
            .iter()
            .enumerate()
            .filter(|(_, t)| is_embeddable(t))
            .map(|(i, t)| (i, t.clone()))
            .collect();

        let invalid_count = texts.len() - valid.len();
        if invalid_count > 0 {
            tracing::warn!(
                invalid = invalid_count,
                total = texts.len(),
                "skipping texts with no embeddable content"
            );
        }
        if valid.is_empty() {
            return outcomes;
        }

        let chunks: Vec<Vec<(usize, String)>> =
            valid.chunks(self.chunk_size).map(|c| c.to_vec()).collect();
        let total_chunks = chunks.len();

        let results: Vec<(Vec<(usize, String)>, Option<Vec<Vec<f32>>>)> =
            stream::iter(chunks.into_iter().enumerate())
                .map(|(chunk_index, chunk)| {
                    let gateway = Arc::clone(&self.gateway);
                    let cancel = cancel.clone();
                    async move {
                        if cancel.is_cancelled() {
                            tracing::info!(
                                chunk = chunk_index + 1,
                                total = total_chunks,
                                "cancelled before dispatch"
                            );
                            return (chunk, None);
                        }

                        let chunk_texts: Vec<String> =
                            chunk.iter().map(|(_, t)| t.clone()).collect();
                        match gateway.embed_batch(&chunk_texts).await {
                            Ok(vectors) => (chunk, Some(vectors)),
                            Err(e) => {
                                tracing::warn!(
                                    chunk = chunk_index + 1,
                                    total = total_chunks,
                                    error = %e,
                                    "embedding chunk failed; its texts stay unembedded"
                                );
                                (chunk, None)
                            }
                        }
                    }
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        for (chunk, vectors) in results {
            if let Some(vectors) = vectors {
                for ((position, _), vector) in chunk.into_iter().zip(vectors) {
                    outcomes[position] = EmbeddingOutcome::Vector(vector);
                }
            }
        }

        outcomes
    }
}
