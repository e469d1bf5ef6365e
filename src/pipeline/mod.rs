//! Pipeline coordinator: the harvest and search operations.
//!
//! A harvest runs the strict sequence fetch → extract → summarize →
//! persist ∥ index. Validation, transport, and upstream-status failures
//! abort it; summarization failures degrade it to the raw outline; store
//! failures are reported on the result instead of discarding the work
//! already done.

use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tracing::{error, info, warn};
use url::Url;

use crate::error::{AppError, ConfigError, HarvestError, SearchError, ValidationError};
use crate::models::{
    Config, FetchMetadata, HarvestConfig, HeadingInsights, PageOutline, SearchHit, VectorEntry,
    WebContentRecord,
};
use crate::services::{
    DocumentStore, Embedder, Fetcher, HttpEmbeddingClient, HttpFetcher, HttpGenerationClient,
    OutlineExtractor, PgDocumentStore, QdrantIndex, Summarizer, TextGenerator, VectorIndex,
};
use crate::utils::retry::{RetryConfig, with_retry};
use crate::utils::text::truncate_chars;

/// Stages of a harvest, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestStage {
    Fetching,
    Extracting,
    Summarizing,
    Persisting,
    Indexing,
}

impl fmt::Display for HarvestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarvestStage::Fetching => write!(f, "fetching"),
            HarvestStage::Extracting => write!(f, "extracting"),
            HarvestStage::Summarizing => write!(f, "summarizing"),
            HarvestStage::Persisting => write!(f, "persisting"),
            HarvestStage::Indexing => write!(f, "indexing"),
        }
    }
}

/// Outcome of a harvest that got past fetching.
///
/// `storage_succeeded` is separate from overall success: the extracted
/// record is returned to the caller even when a store write failed.
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub record: WebContentRecord,
    pub storage_succeeded: bool,
    /// True when summarization failed and the raw outline was persisted
    /// with empty descriptions.
    pub degraded: bool,
    pub storage_error: Option<String>,
}

/// Coordinates the collaborating adapters into the harvest and search
/// operations. All adapters are injected at construction.
pub struct HarvestPipeline {
    fetcher: Arc<dyn Fetcher>,
    extractor: OutlineExtractor,
    summarizer: Summarizer,
    embedder: Arc<dyn Embedder>,
    documents: Arc<dyn DocumentStore>,
    index: Arc<dyn VectorIndex>,
    text_limit: usize,
    storage_retry: RetryConfig,
}

impl HarvestPipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        generator: Arc<dyn TextGenerator>,
        embedder: Arc<dyn Embedder>,
        documents: Arc<dyn DocumentStore>,
        index: Arc<dyn VectorIndex>,
        harvest: &HarvestConfig,
    ) -> Self {
        Self {
            fetcher,
            extractor: OutlineExtractor::new(),
            summarizer: Summarizer::new(generator, harvest),
            embedder,
            documents,
            index,
            text_limit: harvest.text_limit as usize,
            storage_retry: RetryConfig::new(2),
        }
    }

    /// Build a pipeline wired to the production adapters.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;

        let fetcher = HttpFetcher::new(&config.fetch).context("failed to build fetcher")?;
        let generator = HttpGenerationClient::new(&config.generation)?;
        let embedder = HttpEmbeddingClient::new(&config.embedding)
            .context("failed to build embedding client")?;
        let documents = PgDocumentStore::new(&config.document_store)
            .await
            .context("failed to connect to document store")?;
        let index =
            QdrantIndex::new(&config.vector_store).context("failed to connect to Qdrant")?;

        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(generator),
            Arc::new(embedder),
            Arc::new(documents),
            Arc::new(index),
            &config.harvest,
        ))
    }

    /// Verify the embedding dimension against the index, creating the
    /// collection if it doesn't exist yet. Runs once at startup; a
    /// mismatch is a configuration fault, never a per-request error.
    pub async fn startup_check(&self) -> Result<(), ConfigError> {
        let model_dim = self.embedder.dimension();

        match self.index.get_collection_info().await {
            Ok(Some(info)) => {
                if let Some(index_dim) = info.vector_dim
                    && index_dim != model_dim
                {
                    return Err(ConfigError::DimensionMismatch {
                        model_dim,
                        index_dim,
                    });
                }
                Ok(())
            }
            Ok(None) => self.index.create_collection(model_dim).await.map_err(|e| {
                ConfigError::ValidationError(format!("failed to create collection: {}", e))
            }),
            Err(e) => Err(ConfigError::ValidationError(format!(
                "vector index unavailable: {}",
                e
            ))),
        }
    }

    /// Harvest one page for one tenant.
    pub async fn harvest(
        &self,
        tenant_id: &str,
        url: &str,
    ) -> Result<HarvestReport, HarvestError> {
        let url = validate_request(tenant_id, url)?;

        info!(tenant_id, url = %url, stage = %HarvestStage::Fetching, "starting harvest");
        let page = self.fetcher.fetch(url.as_str()).await?;
        if !page.is_success() {
            warn!(status = page.status_code, "upstream returned error status, aborting");
            return Err(HarvestError::UpstreamStatus {
                status: page.status_code,
            });
        }

        let outline = self.extractor.extract(&page.html);
        info!(
            stage = %HarvestStage::Extracting,
            sections = outline.len(),
            bytes = outline.raw_text.len(),
            "extracted outline"
        );

        let (headings, degraded) = match self.summarizer.summarize(&outline).await {
            Ok(insights) => (insights, false),
            Err(e) => {
                warn!(
                    stage = %HarvestStage::Summarizing,
                    error = %e,
                    "summarization failed, continuing with raw outline"
                );
                (HeadingInsights::empty_for(&outline.sections), true)
            }
        };

        let now = Utc::now().to_rfc3339();
        let record = WebContentRecord {
            tenant_id: tenant_id.to_string(),
            url: url.to_string(),
            raw_text: outline.raw_text.clone(),
            headings,
            fetch_metadata: FetchMetadata {
                status_code: page.status_code,
                content_type: page.content_type,
                fetched_at: now.clone(),
                checksum: WebContentRecord::checksum(&outline.raw_text),
                truncated: outline.raw_text.chars().count() > self.text_limit,
            },
            created_at: now,
        };

        let persist = async {
            with_retry(&self.storage_retry, || async {
                self.documents.upsert(&record).await
            })
            .await
            .into_result()
            .map_err(|e| format!("document store: {}", e))
        };

        let index = async {
            let entries = self.embed_entries(&record, &outline).await?;
            if entries.is_empty() {
                return Ok(());
            }
            let entries = &entries;
            with_retry(&self.storage_retry, || {
                let batch = entries.clone();
                async move { self.index.upsert_entries(batch).await }
            })
            .await
            .into_result()
            .map_err(|e| format!("vector index: {}", e))
        };

        let (persist_result, index_result) = tokio::join!(persist, index);

        let mut storage_errors = Vec::new();
        if let Err(e) = persist_result {
            error!(stage = %HarvestStage::Persisting, error = %e, "record write failed");
            storage_errors.push(e);
        }
        if let Err(e) = index_result {
            error!(stage = %HarvestStage::Indexing, error = %e, "entry write failed");
            storage_errors.push(e);
        }

        let storage_succeeded = storage_errors.is_empty();
        info!(
            tenant_id,
            url = %record.url,
            headings = record.headings.len(),
            storage_succeeded,
            degraded,
            "harvest done"
        );

        Ok(HarvestReport {
            record,
            storage_succeeded,
            degraded,
            storage_error: (!storage_errors.is_empty()).then(|| storage_errors.join("; ")),
        })
    }

    /// Embed one entry per insight and pair it with its payload.
    async fn embed_entries(
        &self,
        record: &WebContentRecord,
        outline: &PageOutline,
    ) -> Result<Vec<VectorEntry>, String> {
        if record.headings.is_empty() {
            return Ok(Vec::new());
        }

        let mut inputs = Vec::with_capacity(record.headings.len());
        for insight in &record.headings {
            // Insights are deduplicated keep-first, so the first matching
            // section is the one the insight describes.
            let input = match outline
                .sections
                .iter()
                .find(|s| s.heading == insight.heading)
            {
                Some(section) => VectorEntry::embedding_input(section, &insight.description),
                None => insight.heading.clone(),
            };
            inputs.push(truncate_chars(&input, self.text_limit).to_string());
        }

        let vectors = self
            .embedder
            .embed_documents(inputs)
            .await
            .map_err(|e| format!("embedding: {}", e))?;

        if vectors.len() != record.headings.len() {
            return Err(format!(
                "embedding: expected {} vectors, got {}",
                record.headings.len(),
                vectors.len()
            ));
        }

        Ok(record
            .headings
            .iter()
            .zip(vectors)
            .map(|(insight, vector)| {
                VectorEntry::new(
                    &record.tenant_id,
                    &record.url,
                    &insight.heading,
                    &insight.description,
                    vector,
                )
            })
            .collect())
    }

    /// Fetch the stored record for one (tenant, url) key, if any.
    pub async fn get_record(
        &self,
        tenant_id: &str,
        url: &str,
    ) -> Result<Option<WebContentRecord>, AppError> {
        let url = validate_request(tenant_id, url)?;
        Ok(self.documents.get(tenant_id, url.as_str()).await?)
    }

    /// Search one tenant's entries with a natural-language query.
    pub async fn search(
        &self,
        tenant_id: &str,
        query: &str,
        top_k: u64,
    ) -> Result<Vec<SearchHit>, SearchError> {
        if tenant_id.trim().is_empty() {
            return Err(ValidationError::EmptyTenant.into());
        }
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery.into());
        }
        if top_k == 0 {
            return Err(ValidationError::ZeroTopK.into());
        }

        let vector = self.embedder.embed_query(query).await?;
        let hits = self.index.search(tenant_id, vector, top_k).await?;
        info!(tenant_id, query, hits = hits.len(), "search done");
        Ok(hits)
    }
}

fn validate_request(tenant_id: &str, url: &str) -> Result<Url, ValidationError> {
    if tenant_id.trim().is_empty() {
        return Err(ValidationError::EmptyTenant);
    }

    let parsed = Url::parse(url).map_err(|e| ValidationError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme {:?}", parsed.scheme()),
        });
    }

    Ok(parsed)
}
