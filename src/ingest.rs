//! Offline document ingestion.
//!
//! Builds the persisted vector store consumed by the style retriever: read
//! the source transcript, split it into overlapping chunks, embed each chunk
//! with the resolved model, write the index. Run manually after updating the
//! transcripts; never part of the live request path.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::config::AppConfig;
use crate::retrieval::{
    Embedder, GeminiEmbedder, GeminiModelResolver, ModelResolver, StoreIndex, StoredChunk,
    TextSplitter, INDEX_FILE,
};

pub const CHUNK_SIZE: usize = 2000;
pub const CHUNK_OVERLAP: usize = 500;

pub struct IngestSummary {
    pub embedding_model: String,
    pub chunk_count: usize,
}

/// Ingest one source document into the configured store path
pub async fn ingest_document(config: &AppConfig, source: &Path) -> Result<IngestSummary> {
    let text = tokio::fs::read_to_string(source)
        .await
        .with_context(|| format!("reading source document {}", source.display()))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream.timeout_seconds))
        .build()
        .context("building HTTP client")?;
    let resolver = GeminiModelResolver::new(
        client.clone(),
        config.upstream.base_url(),
        config.upstream.api_key.clone(),
        config.retrieval.default_embedding_model.clone(),
    );
    let embedder = GeminiEmbedder::new(
        client,
        config.upstream.base_url(),
        config.upstream.api_key.clone(),
    );

    ingest_text(&resolver, &embedder, &text, &config.retrieval.store_path).await
}

/// Ingestion with injectable resolution and embedding
pub async fn ingest_text(
    resolver: &dyn ModelResolver,
    embedder: &dyn Embedder,
    text: &str,
    store_path: &Path,
) -> Result<IngestSummary> {
    if text.trim().is_empty() {
        bail!("source document is empty");
    }

    let model = resolver.resolve().await;
    tracing::info!(model = %model, "resolved embedding model for ingestion");

    let splitter = TextSplitter::new(CHUNK_SIZE, CHUNK_OVERLAP);
    let pieces = splitter.split(text);
    if pieces.is_empty() {
        bail!("no chunks produced from source document");
    }
    tracing::info!(chunks = pieces.len(), "document split");

    let mut chunks = Vec::with_capacity(pieces.len());
    for (i, piece) in pieces.into_iter().enumerate() {
        let embedding = embedder
            .embed(&model, &piece)
            .await
            .with_context(|| format!("embedding chunk {}", i))?;
        chunks.push(StoredChunk {
            id: uuid::Uuid::new_v4().to_string(),
            text: piece,
            embedding,
        });
    }

    let index = StoreIndex {
        embedding_model: model.clone(),
        chunks,
    };

    tokio::fs::create_dir_all(store_path)
        .await
        .with_context(|| format!("creating store directory {}", store_path.display()))?;
    let index_path = store_path.join(INDEX_FILE);
    let raw = serde_json::to_vec_pretty(&index).context("serializing store index")?;
    tokio::fs::write(&index_path, raw)
        .await
        .with_context(|| format!("writing {}", index_path.display()))?;

    tracing::info!(
        path = %index_path.display(),
        chunks = index.chunks.len(),
        "store written"
    );

    Ok(IngestSummary {
        embedding_model: model,
        chunk_count: index.chunks.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::{DiskVectorStore, RetrievalError, StyleStore};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedResolver;

    #[async_trait]
    impl ModelResolver for FixedResolver {
        async fn resolve(&self) -> String {
            "models/text-embedding-004".to_string()
        }
    }

    /// Embeds by text length so ranking is deterministic
    struct LengthEmbedder;

    #[async_trait]
    impl Embedder for LengthEmbedder {
        async fn embed(&self, _model: &str, text: &str) -> Result<Vec<f32>, RetrievalError> {
            Ok(vec![text.len() as f32, 1.0])
        }
    }

    #[tokio::test]
    async fn test_ingest_then_search_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let store_path = dir.path().join("style_db");

        let summary = ingest_text(
            &FixedResolver,
            &LengthEmbedder,
            "A paragraph about narratives.\n\nAnother paragraph about money.",
            &store_path,
        )
        .await
        .unwrap();

        assert_eq!(summary.embedding_model, "models/text-embedding-004");
        assert!(summary.chunk_count >= 1);

        let store = DiskVectorStore::new(store_path, Arc::new(LengthEmbedder));
        let results = store
            .similarity_search("narratives", 3, "models/text-embedding-004")
            .await
            .unwrap();
        assert!(!results.is_empty());
    }

    #[tokio::test]
    async fn test_ingest_empty_document_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = ingest_text(
            &FixedResolver,
            &LengthEmbedder,
            "   \n  ",
            &dir.path().join("style_db"),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_ingested_chunks_have_unique_ids() {
        let dir = tempfile::TempDir::new().unwrap();
        let store_path = dir.path().join("style_db");

        ingest_text(
            &FixedResolver,
            &LengthEmbedder,
            "First paragraph.\n\nSecond paragraph.",
            &store_path,
        )
        .await
        .unwrap();

        let raw = std::fs::read(store_path.join(INDEX_FILE)).unwrap();
        let index: StoreIndex = serde_json::from_slice(&raw).unwrap();
        let mut ids: Vec<&str> = index.chunks.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), index.chunks.len());
    }
}
