//! Embedding client for generating text embeddings.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::EmbeddingError;
use crate::models::EmbeddingConfig;

/// Instruction type for embedding generation.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionType {
    /// For indexing documents
    Document,
    /// For search queries
    Query,
}

/// Embedding capability behind the pipeline.
///
/// The dimension is a static property of the configured model; the
/// pipeline verifies it against the vector index at startup.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn dimension(&self) -> u64;

    /// Generate embeddings for documents (for indexing).
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Generate an embedding for a query (for searching).
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Request body for the /embed endpoint.
#[derive(Debug, Serialize)]
struct EmbedRequest {
    inputs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    truncate: Option<bool>,
    instruction_type: InstructionType,
}

/// Response from the /embed endpoint.
#[derive(Debug, Deserialize)]
struct EmbedResponse(Vec<Vec<f32>>);

/// Client for an HTTP embedding server.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    dimension: u64,
    batch_size: usize,
}

impl HttpEmbeddingClient {
    /// Create a new embedding client with the given configuration.
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            dimension: u64::from(config.dimension),
            batch_size: config.batch_size.max(1) as usize,
        })
    }

    /// Generate embeddings for a batch of texts with the given instruction
    /// type, splitting at the configured batch size.
    async fn embed_batch_with_type(
        &self,
        texts: Vec<String>,
        instruction_type: InstructionType,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.batch_size) {
            let embeddings = self
                .embed_single_batch(chunk.to_vec(), instruction_type)
                .await?;
            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }

    async fn embed_single_batch(
        &self,
        texts: Vec<String>,
        instruction_type: InstructionType,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let url = format!("{}/embed", self.base_url);
        let request = EmbedRequest {
            inputs: texts,
            truncate: Some(true),
            instruction_type,
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                EmbeddingError::Timeout
            } else {
                EmbeddingError::RequestError(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ServerError(format!(
                "status {}: {}",
                status, body
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        for vector in &embed_response.0 {
            if vector.len() as u64 != self.dimension {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "server returned {}-dimensional vector, expected {}",
                    vector.len(),
                    self.dimension
                )));
            }
        }

        Ok(embed_response.0)
    }

    /// Get the base URL of the embedding server.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Embedder for HttpEmbeddingClient {
    fn dimension(&self) -> u64 {
        self.dimension
    }

    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.embed_batch_with_type(texts, InstructionType::Document)
            .await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let embeddings = self
            .embed_batch_with_type(vec![text.to_string()], InstructionType::Query)
            .await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("empty embedding response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config(url: String, dimension: u32) -> EmbeddingConfig {
        EmbeddingConfig {
            url,
            dimension,
            ..Default::default()
        }
    }

    #[test]
    fn test_client_creation() {
        let client = HttpEmbeddingClient::new(&EmbeddingConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_base_url_trimming() {
        let config = EmbeddingConfig {
            url: "http://localhost:11411/".to_string(),
            ..Default::default()
        };
        let client = HttpEmbeddingClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11411");
    }

    #[tokio::test]
    async fn test_embed_query_returns_single_vector() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/embed");
                then.status(200).json_body(serde_json::json!([[0.1, 0.2, 0.3]]));
            })
            .await;

        let client = HttpEmbeddingClient::new(&config(server.base_url(), 3)).unwrap();
        let vector = client.embed_query("history of AI").await.unwrap();
        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/embed");
                then.status(200).json_body(serde_json::json!([[0.1, 0.2]]));
            })
            .await;

        let client = HttpEmbeddingClient::new(&config(server.base_url(), 3)).unwrap();
        let result = client.embed_query("q").await;
        assert!(matches!(result, Err(EmbeddingError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_embed_documents_empty_input() {
        let client =
            HttpEmbeddingClient::new(&config("http://localhost:1".to_string(), 3)).unwrap();
        let embeddings = client.embed_documents(Vec::new()).await.unwrap();
        assert!(embeddings.is_empty());
    }
}
