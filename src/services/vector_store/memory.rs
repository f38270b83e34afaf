//! In-process vector store backend.
//!
//! Holds points in memory with a linear cosine scan. Used for local runs
//! without a Qdrant instance and as the store double in tests. Keyword
//! search here is the local-index variant: a whole-word regex over the
//! cached transcript text.

use async_trait::async_trait;
use regex::RegexBuilder;
use std::sync::RwLock;

use super::{CollectionInfo, StoredHit, StoredTranscript, TranscriptPoint, VectorStore};
use crate::error::VectorStoreError;

#[derive(Default)]
struct MemoryState {
    /// Vector dimension the collection was created with; None until
    /// `create_collection`.
    dimension: Option<u64>,
    points: Vec<TranscriptPoint>,
}

pub struct MemoryBackend {
    collection: String,
    state: RwLock<MemoryState>,
}

impl MemoryBackend {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            state: RwLock::new(MemoryState::default()),
        }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for MemoryBackend {
    async fn health_check(&self) -> Result<bool, VectorStoreError> {
        Ok(true)
    }

    async fn get_collection_info(&self) -> Result<Option<CollectionInfo>, VectorStoreError> {
        let state = self.state.read().expect("memory store lock poisoned");
        Ok(state.dimension.map(|_| CollectionInfo {
            points_count: state.points.len() as u64,
        }))
    }

    async fn create_collection(&self, dimension: u64) -> Result<(), VectorStoreError> {
        let mut state = self.state.write().expect("memory store lock poisoned");
        if state.dimension.is_none() {
            state.dimension = Some(dimension);
        }
        Ok(())
    }

    async fn delete_collection(&self) -> Result<(), VectorStoreError> {
        let mut state = self.state.write().expect("memory store lock poisoned");
        state.dimension = None;
        state.points.clear();
        Ok(())
    }

    async fn upsert_points(
        &self,
        points: Vec<TranscriptPoint>,
        _wait: bool,
    ) -> Result<(), VectorStoreError> {
        let mut state = self.state.write().expect("memory store lock poisoned");
        let dimension = state.dimension.ok_or_else(|| {
            VectorStoreError::CollectionError(format!(
                "collection '{}' does not exist",
                self.collection
            ))
        })?;

        for point in points {
            if point.vector.len() as u64 != dimension {
                return Err(VectorStoreError::UpsertError(format!(
                    "vector dimension {} does not match collection dimension {}",
                    point.vector.len(),
                    dimension
                )));
            }
            match state
                .points
                .iter_mut()
                .find(|p| p.point_id == point.point_id)
            {
                Some(existing) => *existing = point,
                None => state.points.push(point),
            }
        }
        Ok(())
    }

    async fn search(
        &self,
        query_vector: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<StoredHit>, VectorStoreError> {
        let state = self.state.read().expect("memory store lock poisoned");
        if state.dimension.is_none() {
            return Err(VectorStoreError::SearchError(format!(
                "collection '{}' does not exist",
                self.collection
            )));
        }

        let mut hits: Vec<StoredHit> = state
            .points
            .iter()
            .map(|point| StoredHit {
                point_id: point.point_id.clone(),
                original_id: if point.original_id.is_empty() {
                    None
                } else {
                    Some(point.original_id.clone())
                },
                score: cosine_similarity(&query_vector, &point.vector),
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit as usize);
        Ok(hits)
    }

    async fn keyword_filter(
        &self,
        query: &str,
        limit: u64,
    ) -> Result<Vec<String>, VectorStoreError> {
        // Escape before compiling so no query text can break the pattern.
        let pattern = format!(r"\b{}\b", regex::escape(query));
        let matcher = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| VectorStoreError::SearchError(e.to_string()))?;

        let state = self.state.read().expect("memory store lock poisoned");
        let ids = state
            .points
            .iter()
            .filter(|point| matcher.is_match(&point.full_text))
            .filter_map(|point| {
                if point.original_id.is_empty() {
                    None
                } else {
                    Some(point.original_id.clone())
                }
            })
            .take(limit as usize)
            .collect();

        Ok(ids)
    }

    async fn get_by_original_id(
        &self,
        id: &str,
    ) -> Result<Option<StoredTranscript>, VectorStoreError> {
        let state = self.state.read().expect("memory store lock poisoned");
        Ok(state
            .points
            .iter()
            .find(|point| point.original_id == id)
            .map(|point| StoredTranscript {
                original_id: point.original_id.clone(),
                full_text: point.full_text.clone(),
            }))
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, original_id: &str, vector: Vec<f32>, text: &str) -> TranscriptPoint {
        TranscriptPoint {
            point_id: id.to_string(),
            vector,
            original_id: original_id.to_string(),
            full_text: text.to_string(),
            indexed_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_requires_collection() {
        let store = MemoryBackend::new("test");
        let result = store
            .upsert_points(vec![point("p1", "t-1", vec![1.0, 0.0], "hola")], true)
            .await;
        assert!(matches!(result, Err(VectorStoreError::CollectionError(_))));
    }

    #[tokio::test]
    async fn test_upsert_rejects_dimension_mismatch() {
        let store = MemoryBackend::new("test");
        store.create_collection(3).await.unwrap();
        let result = store
            .upsert_points(vec![point("p1", "t-1", vec![1.0, 0.0], "hola")], true)
            .await;
        assert!(matches!(result, Err(VectorStoreError::UpsertError(_))));
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_point_id() {
        let store = MemoryBackend::new("test");
        store.create_collection(2).await.unwrap();
        store
            .upsert_points(vec![point("p1", "t-1", vec![1.0, 0.0], "v1")], true)
            .await
            .unwrap();
        store
            .upsert_points(vec![point("p1", "t-1", vec![0.0, 1.0], "v2")], true)
            .await
            .unwrap();

        let info = store.get_collection_info().await.unwrap().unwrap();
        assert_eq!(info.points_count, 1);

        let stored = store.get_by_original_id("t-1").await.unwrap().unwrap();
        assert_eq!(stored.full_text, "v2");
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity() {
        let store = MemoryBackend::new("test");
        store.create_collection(2).await.unwrap();
        store
            .upsert_points(
                vec![
                    point("p1", "t-1", vec![1.0, 0.0], "a"),
                    point("p2", "t-2", vec![0.0, 1.0], "b"),
                    point("p3", "t-3", vec![0.7, 0.7], "c"),
                ],
                true,
            )
            .await
            .unwrap();

        let hits = store.search(vec![1.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].original_id.as_deref(), Some("t-1"));
        assert!(hits[0].score > hits[1].score);
    }

    #[tokio::test]
    async fn test_keyword_filter_matches_whole_words() {
        let store = MemoryBackend::new("test");
        store.create_collection(2).await.unwrap();
        store
            .upsert_points(
                vec![
                    point("p1", "t-1", vec![1.0, 0.0], "quiero cambiar mi Plan de datos"),
                    point("p2", "t-2", vec![0.0, 1.0], "la planificación del proyecto"),
                ],
                true,
            )
            .await
            .unwrap();

        let ids = store.keyword_filter("plan", 10).await.unwrap();
        assert_eq!(ids, vec!["t-1".to_string()]);
    }

    #[tokio::test]
    async fn test_keyword_filter_escapes_regex_metacharacters() {
        let store = MemoryBackend::new("test");
        store.create_collection(2).await.unwrap();
        store
            .upsert_points(
                vec![point("p1", "t-1", vec![1.0, 0.0], "cobro de $50 (extra)")],
                true,
            )
            .await
            .unwrap();

        // Would be invalid patterns if not escaped.
        assert!(store.keyword_filter("(extra", 10).await.is_ok());
        assert!(store.keyword_filter("[50", 10).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_by_original_id_miss_is_none() {
        let store = MemoryBackend::new("test");
        store.create_collection(2).await.unwrap();
        assert!(store.get_by_original_id("nope").await.unwrap().is_none());
    }
}
