//! Error types for the harvest and search pipeline.

use thiserror::Error;

use crate::utils::retry::Retryable;

/// Errors for inputs rejected before any network call.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("tenant id must not be empty")]
    EmptyTenant,

    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("search query must not be empty")]
    EmptyQuery,

    #[error("top_k must be at least 1")]
    ZeroTopK,
}

/// Errors related to fetching a page over the network.
///
/// Reachable-but-erroring servers are not represented here: the fetcher
/// returns their status code and the coordinator decides.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build fetch client: {0}")]
    ClientError(String),

    #[error("fetch request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("fetch timed out")]
    Timeout,

    #[error("failed to read response body: {0}")]
    BodyError(String),
}

/// Errors from the text-generation provider.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to connect to generation provider: {0}")]
    ConnectionError(String),

    #[error("generation provider error: {0}")]
    ServerError(String),

    #[error("generation request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid generation response: {0}")]
    InvalidResponse(String),

    #[error("generation timeout")]
    Timeout,
}

/// Errors related to embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to connect to embedding server: {0}")]
    ConnectionError(String),

    #[error("embedding server error: {0}")]
    ServerError(String),

    #[error("embedding request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("embedding timeout")]
    Timeout,
}

impl Retryable for EmbeddingError {
    fn is_retryable(&self) -> bool {
        match self {
            EmbeddingError::ConnectionError(_) | EmbeddingError::Timeout => true,
            EmbeddingError::ServerError(msg) => is_transient_server_message(msg),
            EmbeddingError::RequestError(e) => e.is_timeout() || e.is_connect(),
            EmbeddingError::InvalidResponse(_) => false,
        }
    }
}

/// Errors related to the document store.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("failed to connect to document store: {0}")]
    ConnectionError(String),

    #[error("document store query error: {0}")]
    QueryError(String),

    #[error("failed to encode record: {0}")]
    SerializeError(String),

    #[error("failed to decode stored record: {0}")]
    DeserializeError(String),
}

impl Retryable for DocumentStoreError {
    fn is_retryable(&self) -> bool {
        match self {
            DocumentStoreError::ConnectionError(_) => true,
            DocumentStoreError::QueryError(msg) => is_transient_server_message(msg),
            DocumentStoreError::SerializeError(_) | DocumentStoreError::DeserializeError(_) => {
                false
            }
        }
    }
}

/// Errors related to vector index operations.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("failed to connect to Qdrant: {0}")]
    ConnectionError(String),

    #[error("collection error: {0}")]
    CollectionError(String),

    #[error("upsert error: {0}")]
    UpsertError(String),

    #[error("search error: {0}")]
    SearchError(String),

    #[error("Qdrant client error: {0}")]
    ClientError(String),
}

impl Retryable for VectorStoreError {
    fn is_retryable(&self) -> bool {
        match self {
            VectorStoreError::ConnectionError(_) => true,
            VectorStoreError::CollectionError(msg)
            | VectorStoreError::UpsertError(msg)
            | VectorStoreError::SearchError(msg)
            | VectorStoreError::ClientError(msg) => is_transient_server_message(msg),
        }
    }
}

/// Errors related to configuration. Fatal at startup, never per-request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error(
        "embedding dimension mismatch: model produces {model_dim}, index expects {index_dim}"
    )]
    DimensionMismatch { model_dim: u64, index_dim: u64 },
}

/// Failures that abort a harvest outright.
///
/// Everything else (generation, storage) degrades and is reported as
/// metadata on an otherwise successful [`HarvestReport`].
///
/// [`HarvestReport`]: crate::pipeline::HarvestReport
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("upstream returned status {status}")]
    UpstreamStatus { status: u16 },
}

impl HarvestError {
    /// Status code hint for callers mapping this failure to a response.
    pub fn http_status_hint(&self) -> Option<u16> {
        match self {
            HarvestError::Validation(_) => Some(400),
            HarvestError::Fetch(_) => None,
            HarvestError::UpstreamStatus { status } => Some(*status),
        }
    }
}

/// Errors related to search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),
}

/// Application-level errors that wrap domain errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("harvest error: {0}")]
    Harvest(#[from] HarvestError),

    #[error("search error: {0}")]
    Search(#[from] SearchError),

    #[error("document store error: {0}")]
    DocumentStore(#[from] DocumentStoreError),

    #[error("{0}")]
    Other(String),
}

fn is_transient_server_message(msg: &str) -> bool {
    let msg_lower = msg.to_lowercase();
    msg.contains("502")
        || msg.contains("503")
        || msg.contains("504")
        || msg.contains("429")
        || msg_lower.contains("timeout")
        || msg_lower.contains("connection")
        || msg_lower.contains("unavailable")
        || msg_lower.contains("too many requests")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_hint() {
        let err = HarvestError::UpstreamStatus { status: 404 };
        assert_eq!(err.http_status_hint(), Some(404));

        let err = HarvestError::Validation(ValidationError::EmptyTenant);
        assert_eq!(err.http_status_hint(), Some(400));
    }

    #[test]
    fn test_embedding_error_retryable() {
        assert!(EmbeddingError::ConnectionError("refused".into()).is_retryable());
        assert!(EmbeddingError::Timeout.is_retryable());
        assert!(EmbeddingError::ServerError("status 503: unavailable".into()).is_retryable());
        assert!(!EmbeddingError::ServerError("status 400: bad input".into()).is_retryable());
        assert!(!EmbeddingError::InvalidResponse("garbage".into()).is_retryable());
    }

    #[test]
    fn test_vector_store_error_retryable() {
        assert!(VectorStoreError::ConnectionError("refused".into()).is_retryable());
        assert!(VectorStoreError::UpsertError("deadline timeout".into()).is_retryable());
        assert!(!VectorStoreError::UpsertError("bad point id".into()).is_retryable());
    }

    #[test]
    fn test_document_store_error_retryable() {
        assert!(DocumentStoreError::ConnectionError("refused".into()).is_retryable());
        assert!(!DocumentStoreError::SerializeError("bad json".into()).is_retryable());
    }
}
