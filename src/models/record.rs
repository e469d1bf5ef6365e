//! Persisted record and vector entry models.

use serde::{Deserialize, Serialize};

use super::outline::{HeadingInsights, OutlineSection};

/// Metadata captured at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchMetadata {
    pub status_code: u16,
    pub content_type: String,
    pub fetched_at: String,
    /// SHA-256 of the extracted raw text, hex-encoded (first 16 bytes).
    pub checksum: String,
    /// Whether the text sent to the summarizer was cut at the text limit.
    pub truncated: bool,
}

/// The unit persisted in the document store, keyed by (tenant_id, url).
///
/// A later harvest of the same key replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebContentRecord {
    pub tenant_id: String,
    pub url: String,
    pub raw_text: String,
    pub headings: HeadingInsights,
    pub fetch_metadata: FetchMetadata,
    pub created_at: String,
}

impl WebContentRecord {
    pub fn checksum(text: &str) -> String {
        use sha2::{Digest, Sha256};
        let hash = Sha256::digest(text.as_bytes());
        hex::encode(&hash[..16])
    }
}

/// Payload stored alongside each vector, returned verbatim on search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPayload {
    pub tenant_id: String,
    pub url: String,
    pub heading: String,
    pub description: String,
}

/// One embedding plus its retrievable payload, the unit of semantic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorEntry {
    /// Deterministic UUIDv5 of (tenant_id, url, heading), so re-harvesting
    /// the same heading replaces the prior point instead of duplicating it.
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: EntryPayload,
}

impl VectorEntry {
    pub fn generate_id(tenant_id: &str, url: &str, heading: &str) -> String {
        use uuid::Uuid;
        let name = format!("{}:{}:{}", tenant_id, url, heading);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
    }

    pub fn new(tenant_id: &str, url: &str, heading: &str, description: &str, vector: Vec<f32>) -> Self {
        Self {
            id: Self::generate_id(tenant_id, url, heading),
            vector,
            payload: EntryPayload {
                tenant_id: tenant_id.to_string(),
                url: url.to_string(),
                heading: heading.to_string(),
                description: description.to_string(),
            },
        }
    }

    /// Text fed to the embedding model for a section: the model
    /// description when present, otherwise the raw body text, prefixed
    /// with the heading so degraded harvests stay searchable.
    pub fn embedding_input(section: &OutlineSection, description: &str) -> String {
        let content = if description.is_empty() {
            section.body_text.as_str()
        } else {
            description
        };
        if content.is_empty() {
            section.heading.clone()
        } else {
            format!("{}\n{}", section.heading, content)
        }
    }
}
