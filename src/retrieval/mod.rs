//! Style example retrieval against the persisted vector store.
//!
//! Flow per request: resolve the embedding model, search the store for the
//! nearest chunks, assemble a labeled context string. Model resolution and
//! the store are trait seams so callers can stub or memoize them.

mod chunker;
mod embedder;
mod models;
mod store;

pub use chunker::TextSplitter;
pub use embedder::{Embedder, GeminiEmbedder};
pub use models::{GeminiModelResolver, ModelResolver, DEFAULT_EMBEDDING_MODEL};
pub use store::{DiskVectorStore, StoreIndex, StoredChunk, StyleStore, INDEX_FILE};

use std::sync::Arc;

/// Errors surfaced by the retrieval pipeline.
///
/// Callers that want the legacy swallow-everything behavior use
/// [`StyleRetriever::get_style_examples`], which maps all of these to an
/// empty context string.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("style store unavailable: {0}")]
    Store(String),

    #[error("embedding request failed: {0}")]
    Embedding(String),

    #[error("malformed store index: {0}")]
    Index(String),
}

/// A chunk returned from the vector store, best match first
#[derive(Debug, Clone)]
pub struct StyleChunk {
    pub text: String,
    pub score: f32,
}

/// Retrieves style example context for a topic
pub struct StyleRetriever {
    resolver: Arc<dyn ModelResolver>,
    store: Arc<dyn StyleStore>,
    default_k: usize,
}

impl StyleRetriever {
    pub fn new(
        resolver: Arc<dyn ModelResolver>,
        store: Arc<dyn StyleStore>,
        default_k: usize,
    ) -> Self {
        Self {
            resolver,
            store,
            default_k,
        }
    }

    /// Discriminated variant: callers can tell "no examples" apart from
    /// "retrieval broken".
    pub async fn retrieve(&self, topic: &str, k: usize) -> Result<String, RetrievalError> {
        // the model is resolved on every call; stored vectors are only
        // comparable when query vectors come from the same model
        let model = self.resolver.resolve().await;
        let chunks = self.store.similarity_search(topic, k, &model).await?;
        Ok(assemble_context(&chunks))
    }

    /// Compatibility variant: any failure is logged and mapped to an empty
    /// context string, which callers treat as "no style examples available".
    pub async fn get_style_examples(&self, topic: &str, k: usize) -> String {
        match self.retrieve(topic, k).await {
            Ok(context) => context,
            Err(e) => {
                tracing::error!(error = %e, topic = %topic, "style retrieval failed");
                String::new()
            }
        }
    }

    /// `get_style_examples` with the configured default `k`
    pub async fn context_for(&self, topic: &str) -> String {
        self.get_style_examples(topic, self.default_k).await
    }
}

/// Join chunk texts in store order, each with a 1-based positional label
fn assemble_context(chunks: &[StyleChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("--- STYLE EXAMPLE {} ---\n{}", i + 1, chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
