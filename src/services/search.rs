//! Semantic and keyword search over indexed transcripts.
//!
//! Both operations degrade instead of failing: a gateway or store
//! problem is logged and produces an empty result set, so the boundary
//! layer never has to distinguish "down" from "no matches" to stay up.

use std::sync::Arc;

use crate::models::{SearchHit, SearchMode, SearchResponse, clamp_top_n};
use crate::services::gateway::GatewayClient;
use crate::services::vector_store::VectorStore;

pub struct SearchService {
    gateway: Arc<GatewayClient>,
    store: Arc<dyn VectorStore>,
}

impl SearchService {
    pub fn new(gateway: Arc<GatewayClient>, store: Arc<dyn VectorStore>) -> Self {
        Self { gateway, store }
    }

    /// Boundary entry point: clamps `top_n` into [1, 20] and dispatches
    /// on mode.
    pub async fn search(&self, query: &str, mode: SearchMode, top_n: u64) -> SearchResponse {
        let top_n = clamp_top_n(top_n);
        match mode {
            SearchMode::Semantic => self.semantic_search(query, top_n).await,
            SearchMode::Keyword => self.keyword_search(query, top_n).await,
        }
    }

    /// Nearest neighbors of the embedded query, best first.
    pub async fn semantic_search(&self, query: &str, top_n: u64) -> SearchResponse {
        if query.trim().is_empty() {
            return SearchResponse::default();
        }

        let query_vector = match self.gateway.embed(query).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(error = %e, "query embedding failed; returning no results");
                return SearchResponse::default();
            }
        };

        let stored = match self.store.search(query_vector, top_n).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(error = %e, "vector search failed; returning no results");
                return SearchResponse::default();
            }
        };

        let mut response = SearchResponse::default();
        for hit in stored {
            match hit.original_id {
                Some(transcript_id) => {
                    let rank = response.hits.len() + 1;
                    response.hits.push(SearchHit {
                        transcript_id,
                        score: Some(hit.score),
                        rank,
                    });
                }
                None => {
                    // A point with no business id is a data-integrity
                    // problem; surface it, don't substitute the internal
                    // point id.
                    response.warnings.push(format!(
                        "stored point {} has no original_id; excluded from results",
                        hit.point_id
                    ));
                }
            }
        }

        tracing::debug!(
            hits = response.hits.len(),
            warnings = response.warnings.len(),
            "semantic search done"
        );
        response
    }

    /// Whole-word, case-insensitive match over stored transcript text.
    /// Returns ids in index iteration order, deliberately unscored.
    pub async fn keyword_search(&self, query: &str, top_n: u64) -> SearchResponse {
        if query.trim().is_empty() {
            return SearchResponse::default();
        }

        let ids = match self.store.keyword_filter(query, top_n).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "keyword search failed; returning no results");
                return SearchResponse::default();
            }
        };

        let hits = ids
            .into_iter()
            .enumerate()
            .map(|(i, transcript_id)| SearchHit {
                transcript_id,
                score: None,
                rank: i + 1,
            })
            .collect();

        SearchResponse {
            hits,
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GatewayConfig;
    use crate::services::vector_store::{MemoryBackend, TranscriptPoint};

    const TEST_DIM: u32 = 64;

    fn test_gateway() -> Arc<GatewayClient> {
        let config = GatewayConfig {
            sim_latency_ms_min: 0,
            sim_latency_ms_max: 0,
            embedding_dimension: TEST_DIM,
            ..Default::default()
        };
        Arc::new(GatewayClient::simulated(&config))
    }

    async fn indexed_service(texts: &[(&str, &str)]) -> SearchService {
        let gateway = test_gateway();
        let store = Arc::new(MemoryBackend::new("test"));
        store.create_collection(u64::from(TEST_DIM)).await.unwrap();

        let mut points = Vec::new();
        for (n, (id, text)) in texts.iter().enumerate() {
            let vector = gateway.embed(text).await.unwrap();
            points.push(TranscriptPoint {
                point_id: format!("p{}", n),
                vector,
                original_id: (*id).to_string(),
                full_text: (*text).to_string(),
                indexed_at: "2024-01-01T00:00:00Z".to_string(),
            });
        }
        store.upsert_points(points, true).await.unwrap();

        SearchService::new(gateway, store)
    }

    #[tokio::test]
    async fn test_semantic_self_search_is_top_hit() {
        let service = indexed_service(&[
            ("t-1", "mi internet está muy lento desde ayer"),
            ("t-2", "quiero dar de baja el servicio"),
        ])
        .await;

        let response = service
            .semantic_search("mi internet está muy lento desde ayer", 1)
            .await;

        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.hits[0].transcript_id, "t-1");
        assert_eq!(response.hits[0].rank, 1);
        assert!(response.hits[0].score.unwrap() >= 0.99);
    }

    #[tokio::test]
    async fn test_semantic_hits_ordered_by_descending_score() {
        let service = indexed_service(&[
            ("t-1", "problema con la factura del mes"),
            ("t-2", "consulta sobre cobertura en mi zona"),
            ("t-3", "no puedo pagar la factura"),
        ])
        .await;

        let response = service
            .semantic_search("problema con la factura del mes", 3)
            .await;

        assert_eq!(response.hits.len(), 3);
        let scores: Vec<f32> = response.hits.iter().map(|h| h.score.unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        let ranks: Vec<usize> = response.hits.iter().map(|h| h.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_query_is_a_no_op() {
        let service = indexed_service(&[("t-1", "algo")]).await;

        assert!(service.semantic_search("", 5).await.is_empty());
        assert!(service.keyword_search("   ", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_keyword_search_whole_word() {
        let service = indexed_service(&[
            ("t-1", "necesito un Plan de datos más grande"),
            ("t-2", "hablamos de la planificación anual"),
        ])
        .await;

        let response = service.keyword_search("plan", 10).await;

        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.hits[0].transcript_id, "t-1");
        assert_eq!(response.hits[0].score, None);
    }

    #[tokio::test]
    async fn test_missing_original_id_surfaces_as_warning() {
        let gateway = test_gateway();
        let store = Arc::new(MemoryBackend::new("test"));
        store.create_collection(u64::from(TEST_DIM)).await.unwrap();

        let vector = gateway.embed("texto sin id").await.unwrap();
        store
            .upsert_points(
                vec![TranscriptPoint {
                    point_id: "p0".to_string(),
                    vector,
                    original_id: String::new(),
                    full_text: "texto sin id".to_string(),
                    indexed_at: "2024-01-01T00:00:00Z".to_string(),
                }],
                true,
            )
            .await
            .unwrap();

        let service = SearchService::new(gateway, store);
        let response = service.semantic_search("texto sin id", 5).await;

        assert!(response.hits.is_empty());
        assert_eq!(response.warnings.len(), 1);
        assert!(response.warnings[0].contains("p0"));
    }

    #[tokio::test]
    async fn test_search_clamps_top_n() {
        let service = indexed_service(&[("t-1", "hola")]).await;
        // top_n of 0 still returns up to one hit instead of erroring.
        let response = service.search("hola", SearchMode::Semantic, 0).await;
        assert_eq!(response.hits.len(), 1);
    }
}
