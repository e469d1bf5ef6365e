use anyhow::Result;

use crate::cli::output::{StatusInfo, get_formatter};
use crate::models::{Config, OutputFormat};
use crate::services::{DocumentStore, PgDocumentStore, QdrantIndex, VectorIndex};

pub async fn handle_status(format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let document_store_connected = match PgDocumentStore::new(&config.document_store).await {
        Ok(store) => store.health_check().await.unwrap_or(false),
        Err(_) => false,
    };

    let (vector_store_connected, vector_store_points) =
        if let Ok(index) = QdrantIndex::new(&config.vector_store) {
            let connected = index.health_check().await.unwrap_or(false);
            let points = if connected {
                index
                    .get_collection_info()
                    .await
                    .ok()
                    .flatten()
                    .map_or(0, |info| info.points_count)
            } else {
                0
            };
            (connected, points)
        } else {
            (false, 0)
        };

    let status = StatusInfo {
        document_store_connected,
        vector_store_connected,
        vector_store_points,
        collection: config.vector_store.collection.clone(),
        embedding_url: config.embedding.url.clone(),
        generation_model: config.generation.model.clone(),
    };

    print!("{}", formatter.format_status(&status));

    if !document_store_connected {
        eprintln!();
        eprintln!("Warning: document store not reachable. Check DATABASE_URL.");
    }
    if !vector_store_connected {
        eprintln!("Warning: Qdrant not reachable. Check QDRANT_URL.");
    }

    Ok(())
}
