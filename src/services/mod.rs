mod document_store;
mod embedding;
mod extractor;
mod fetcher;
mod generation;
mod summarizer;
mod vector_store;

pub use document_store::{DocumentStore, PgDocumentStore};
pub use embedding::{Embedder, HttpEmbeddingClient, InstructionType};
pub use extractor::OutlineExtractor;
pub use fetcher::{FetchedPage, Fetcher, HttpFetcher};
pub use generation::{HttpGenerationClient, TextGenerator};
pub use summarizer::Summarizer;
pub use vector_store::{CollectionInfo, QdrantIndex, VectorIndex};
