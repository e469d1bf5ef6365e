//! Vector index adapter over Qdrant.
//!
//! Entries are partitioned by tenant: every search carries a mandatory
//! tenant_id filter that Qdrant applies during ranking, never after it.

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use std::collections::HashMap;

use crate::error::VectorStoreError;
use crate::models::{EntryPayload, SearchHit, VectorEntry, VectorStoreConfig};

/// Collection information reported by the index.
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub points_count: u64,
    /// Vector size of the existing collection, when the backend reports it.
    pub vector_dim: Option<u64>,
}

/// Tenant-partitioned vector search over cosine similarity.
///
/// Upsert by id is idempotent: re-upserting an id replaces its vector and
/// payload in place.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn health_check(&self) -> Result<bool, VectorStoreError>;

    /// Returns None if the collection doesn't exist yet.
    async fn get_collection_info(&self) -> Result<Option<CollectionInfo>, VectorStoreError>;

    /// Create the collection with the given vector dimension if absent.
    async fn create_collection(&self, dimension: u64) -> Result<(), VectorStoreError>;

    async fn upsert_entries(&self, entries: Vec<VectorEntry>) -> Result<(), VectorStoreError>;

    /// Top-k cosine search restricted to one tenant. Returns fewer than
    /// `top_k` hits only when the tenant has fewer entries.
    async fn search(
        &self,
        tenant_id: &str,
        query_vector: Vec<f32>,
        top_k: u64,
    ) -> Result<Vec<SearchHit>, VectorStoreError>;

    fn collection(&self) -> &str;
}

/// Qdrant vector index backend.
pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
}

impl QdrantIndex {
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
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn health_check(&self) -> Result<bool, VectorStoreError> {
        self.client
            .health_check()
            .await
            .map(|_| true)
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))
    }

    async fn get_collection_info(&self) -> Result<Option<CollectionInfo>, VectorStoreError> {
        match self.client.collection_info(&self.collection).await {
            Ok(info) => {
                let result = info.result;
                let points_count = result
                    .as_ref()
                    .map_or(0, |r| r.points_count.unwrap_or(0));
                let vector_dim = result
                    .as_ref()
                    .and_then(|r| r.config.as_ref())
                    .and_then(|c| c.params.as_ref())
                    .and_then(|p| p.vectors_config.as_ref())
                    .and_then(|v| v.config.as_ref())
                    .and_then(|cfg| match cfg {
                        qdrant_client::qdrant::vectors_config::Config::Params(params) => {
                            Some(params.size)
                        }
                        _ => None,
                    });
                Ok(Some(CollectionInfo {
                    points_count,
                    vector_dim,
                }))
            }
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

    async fn upsert_entries(&self, entries: Vec<VectorEntry>) -> Result<(), VectorStoreError> {
        if entries.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = entries
            .into_iter()
            .map(|entry| {
                let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
                payload.insert("tenant_id".to_string(), entry.payload.tenant_id.into());
                payload.insert("url".to_string(), entry.payload.url.into());
                payload.insert("heading".to_string(), entry.payload.heading.into());
                payload.insert(
                    "description".to_string(),
                    entry.payload.description.into(),
                );

                PointStruct::new(entry.id, entry.vector, payload)
            })
            .collect();

        let upsert = UpsertPointsBuilder::new(&self.collection, points);

        self.client
            .upsert_points(upsert)
            .await
            .map_err(|e| VectorStoreError::UpsertError(e.to_string()))?;

        Ok(())
    }

    async fn search(
        &self,
        tenant_id: &str,
        query_vector: Vec<f32>,
        top_k: u64,
    ) -> Result<Vec<SearchHit>, VectorStoreError> {
        // The tenant filter rides inside the search request so ranking
        // only ever sees this tenant's points.
        let filter = Filter::must([Condition::matches("tenant_id", tenant_id.to_string())]);

        let search_builder = SearchPointsBuilder::new(&self.collection, query_vector, top_k)
            .filter(filter)
            .with_payload(true);

        let results = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| VectorStoreError::SearchError(e.to_string()))?;

        let hits: Vec<SearchHit> = results
            .result
            .into_iter()
            .map(|point| {
                let payload = point.payload;
                SearchHit {
                    score: point.score,
                    payload: EntryPayload {
                        tenant_id: string_field(&payload, "tenant_id"),
                        url: string_field(&payload, "url"),
                        heading: string_field(&payload, "heading"),
                        description: string_field(&payload, "description"),
                    },
                }
            })
            .collect();

        Ok(hits)
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}

fn string_field(
    payload: &HashMap<String, qdrant_client::qdrant::Value>,
    key: &str,
) -> String {
    payload
        .get(key)
        .and_then(|v| match &v.kind {
            Some(qdrant_client::qdrant::value::Kind::StringValue(s)) => Some(s.as_str()),
            _ => None,
        })
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_field_extraction() {
        let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
        payload.insert("tenant_id".to_string(), "t1".to_string().into());

        assert_eq!(string_field(&payload, "tenant_id"), "t1");
        assert_eq!(string_field(&payload, "missing"), "");
    }
}
