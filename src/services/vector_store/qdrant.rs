//! Qdrant vector store backend implementation.

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointStruct, ScrollPointsBuilder,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use std::collections::HashMap;

use super::{CollectionInfo, StoredHit, StoredTranscript, TranscriptPoint, VectorStore};
use crate::error::VectorStoreError;
use crate::models::VectorStoreConfig;

/// Qdrant vector store backend.
pub struct QdrantBackend {
    client: Qdrant,
    collection: String,
}

impl QdrantBackend {
    /// Create a new Qdrant backend from configuration.
    pub fn new(config: &VectorStoreConfig) -> Result<Self, VectorStoreError> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(ref api_key) = config.api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder
            .build()
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            collection: config.collection.clone(),
        })
    }

    fn point_payload(point: &TranscriptPoint) -> HashMap<String, qdrant_client::qdrant::Value> {
        let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
        payload.insert("original_id".to_string(), point.original_id.clone().into());
        payload.insert("full_text".to_string(), point.full_text.clone().into());
        payload.insert("indexed_at".to_string(), point.indexed_at.clone().into());
        payload
    }
}

fn payload_string(
    payload: &HashMap<String, qdrant_client::qdrant::Value>,
    key: &str,
) -> Option<String> {
    payload.get(key).and_then(|v| match &v.kind {
        Some(qdrant_client::qdrant::value::Kind::StringValue(s)) => Some(s.clone()),
        _ => None,
    })
}

fn point_id_string(id: &Option<qdrant_client::qdrant::PointId>) -> String {
    match id {
        Some(id) => match &id.point_id_options {
            Some(qdrant_client::qdrant::point_id::PointIdOptions::Uuid(uuid)) => uuid.clone(),
            Some(qdrant_client::qdrant::point_id::PointIdOptions::Num(num)) => num.to_string(),
            None => String::new(),
        },
        None => String::new(),
    }
}

#[async_trait]
impl VectorStore for QdrantBackend {
    async fn health_check(&self) -> Result<bool, VectorStoreError> {
        self.client
            .health_check()
            .await
            .map(|_| true)
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))
    }

    async fn get_collection_info(&self) -> Result<Option<CollectionInfo>, VectorStoreError> {
        match self.client.collection_info(&self.collection).await {
            Ok(info) => Ok(Some(CollectionInfo {
                points_count: info.result.map_or(0, |r| r.points_count.unwrap_or(0)),
            })),
            Err(e) => {
                let msg = e.to_string();
                if msg.contains("not found") || msg.contains("doesn't exist") {
                    Ok(None)
                } else {
                    Err(VectorStoreError::CollectionError(msg))
                }
            }
        }
    }

    async fn create_collection(&self, dimension: u64) -> Result<(), VectorStoreError> {
        if self.get_collection_info().await?.is_some() {
            return Ok(());
        }

        let create_collection = CreateCollectionBuilder::new(&self.collection)
            .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine));

        self.client
            .create_collection(create_collection)
            .await
            .map_err(|e| VectorStoreError::CollectionError(e.to_string()))?;

        Ok(())
    }

    async fn delete_collection(&self) -> Result<(), VectorStoreError> {
        self.client
            .delete_collection(&self.collection)
            .await
            .map_err(|e| VectorStoreError::CollectionError(e.to_string()))?;
        Ok(())
    }

    async fn upsert_points(
        &self,
        points: Vec<TranscriptPoint>,
        wait: bool,
    ) -> Result<(), VectorStoreError> {
        if points.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = points
            .into_iter()
            .map(|point| {
                let payload = Self::point_payload(&point);
                PointStruct::new(point.point_id, point.vector, payload)
            })
            .collect();

        let upsert = UpsertPointsBuilder::new(&self.collection, points).wait(wait);

        self.client
            .upsert_points(upsert)
            .await
            .map_err(|e| VectorStoreError::UpsertError(e.to_string()))?;

        Ok(())
    }

    async fn search(
        &self,
        query_vector: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<StoredHit>, VectorStoreError> {
        let search = SearchPointsBuilder::new(&self.collection, query_vector, limit)
            .with_payload(true);

        let results = self
            .client
            .search_points(search)
            .await
            .map_err(|e| VectorStoreError::SearchError(e.to_string()))?;

        let hits = results
            .result
            .into_iter()
            .map(|point| StoredHit {
                point_id: point_id_string(&point.id),
                original_id: payload_string(&point.payload, "original_id"),
                score: point.score,
            })
            .collect();

        Ok(hits)
    }

    async fn keyword_filter(
        &self,
        query: &str,
        limit: u64,
    ) -> Result<Vec<String>, VectorStoreError> {
        let filter = Filter::must([Condition::matches_text("full_text", query)]);

        let scroll = ScrollPointsBuilder::new(&self.collection)
            .filter(filter)
            .limit(limit as u32)
            .with_payload(true)
            .with_vectors(false);

        let response = self
            .client
            .scroll(scroll)
            .await
            .map_err(|e| VectorStoreError::SearchError(e.to_string()))?;

        let ids = response
            .result
            .into_iter()
            .filter_map(|point| payload_string(&point.payload, "original_id"))
            .collect();

        Ok(ids)
    }

    async fn get_by_original_id(
        &self,
        id: &str,
    ) -> Result<Option<StoredTranscript>, VectorStoreError> {
        let filter = Filter::must([Condition::matches("original_id", id.to_string())]);

        let scroll = ScrollPointsBuilder::new(&self.collection)
            .filter(filter)
            .limit(1)
            .with_payload(true)
            .with_vectors(false);

        let response = self
            .client
            .scroll(scroll)
            .await
            .map_err(|e| VectorStoreError::LookupError(e.to_string()))?;

        let transcript = response.result.into_iter().next().and_then(|point| {
            let original_id = payload_string(&point.payload, "original_id")?;
            let full_text = payload_string(&point.payload, "full_text").unwrap_or_default();
            Some(StoredTranscript {
                original_id,
                full_text,
            })
        });

        Ok(transcript)
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}
