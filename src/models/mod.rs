mod config;
mod outline;
mod record;
mod search;

pub use config::{
    Config, DEFAULT_COLLECTION, DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_URL,
    DEFAULT_GENERATION_MODEL, DEFAULT_GENERATION_URL, DEFAULT_QDRANT_URL, DocumentStoreConfig,
    EmbeddingConfig, FetchConfig, GenerationConfig, HarvestConfig, SearchConfig,
    VectorStoreConfig,
};
pub use outline::{HeadingInsight, HeadingInsights, OutlineSection, PageOutline};
pub use record::{EntryPayload, FetchMetadata, VectorEntry, WebContentRecord};
pub use search::{OutputFormat, SearchHit, SearchResults};
