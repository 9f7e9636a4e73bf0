//! Persisted vector store.
//!
//! The index is a single JSON file written by the offline `ingest` command:
//! the embedding model identifier plus every chunk's text and vector. The
//! live server treats the store directory as read-only and re-reads the
//! index on each search, so re-ingestion is picked up without a restart.

use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Embedder, RetrievalError, StyleChunk};

pub const INDEX_FILE: &str = "index.json";

/// On-disk index format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreIndex {
    /// Model the stored vectors were computed with
    pub embedding_model: String,
    pub chunks: Vec<StoredChunk>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Nearest-neighbor search over stored style chunks.
///
/// `embedding_model` is the identifier resolved for this call; query
/// vectors are computed with it.
#[async_trait]
pub trait StyleStore: Send + Sync {
    async fn similarity_search(
        &self,
        topic: &str,
        k: usize,
        embedding_model: &str,
    ) -> Result<Vec<StyleChunk>, RetrievalError>;
}

/// Store backed by the persisted index directory
pub struct DiskVectorStore {
    path: PathBuf,
    embedder: Arc<dyn Embedder>,
}

impl DiskVectorStore {
    pub fn new(path: impl Into<PathBuf>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            path: path.into(),
            embedder,
        }
    }

    async fn load_index(&self) -> Result<StoreIndex, RetrievalError> {
        let index_path = self.path.join(INDEX_FILE);
        let raw = tokio::fs::read(&index_path)
            .await
            .map_err(|e| RetrievalError::Store(format!("{}: {}", index_path.display(), e)))?;
        serde_json::from_slice(&raw).map_err(|e| RetrievalError::Index(e.to_string()))
    }
}

#[async_trait]
impl StyleStore for DiskVectorStore {
    async fn similarity_search(
        &self,
        topic: &str,
        k: usize,
        embedding_model: &str,
    ) -> Result<Vec<StyleChunk>, RetrievalError> {
        let index = self.load_index().await?;
        if index.embedding_model != embedding_model {
            tracing::warn!(
                stored = %index.embedding_model,
                resolved = %embedding_model,
                "query embedding model differs from ingest-time model"
            );
        }

        let query = self.embedder.embed(embedding_model, topic).await?;

        let mut scored: Vec<(f32, &StoredChunk)> = index
            .chunks
            .iter()
            .map(|chunk| (cosine_similarity(&query, &chunk.embedding), chunk))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(score, chunk)| StyleChunk {
                text: chunk.text.clone(),
                score,
            })
            .collect())
    }
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEmbedder {
        vector: Vec<f32>,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _model: &str, _text: &str) -> Result<Vec<f32>, RetrievalError> {
            Ok(self.vector.clone())
        }
    }

    fn write_index(dir: &std::path::Path, index: &StoreIndex) {
        std::fs::write(
            dir.join(INDEX_FILE),
            serde_json::to_vec_pretty(index).unwrap(),
        )
        .unwrap();
    }

    fn chunk(id: &str, text: &str, embedding: Vec<f32>) -> StoredChunk {
        StoredChunk {
            id: id.to_string(),
            text: text.to_string(),
            embedding,
        }
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let dir = tempfile::TempDir::new().unwrap();
        write_index(
            dir.path(),
            &StoreIndex {
                embedding_model: "models/text-embedding-004".to_string(),
                chunks: vec![
                    chunk("a", "far", vec![0.0, 1.0]),
                    chunk("b", "near", vec![1.0, 0.1]),
                    chunk("c", "middle", vec![1.0, 1.0]),
                ],
            },
        );

        let store = DiskVectorStore::new(
            dir.path(),
            Arc::new(FixedEmbedder {
                vector: vec![1.0, 0.0],
            }),
        );

        let results = store
            .similarity_search("topic", 2, "models/text-embedding-004")
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "near");
        assert_eq!(results[1].text, "middle");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_k_larger_than_store_returns_everything() {
        let dir = tempfile::TempDir::new().unwrap();
        write_index(
            dir.path(),
            &StoreIndex {
                embedding_model: "models/text-embedding-004".to_string(),
                chunks: vec![chunk("a", "only", vec![1.0, 0.0])],
            },
        );

        let store = DiskVectorStore::new(
            dir.path(),
            Arc::new(FixedEmbedder {
                vector: vec![1.0, 0.0],
            }),
        );

        let results = store
            .similarity_search("topic", 3, "models/text-embedding-004")
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_index_is_a_store_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = DiskVectorStore::new(
            dir.path(),
            Arc::new(FixedEmbedder {
                vector: vec![1.0],
            }),
        );

        let result = store
            .similarity_search("topic", 3, "models/text-embedding-004")
            .await;
        assert!(matches!(result, Err(RetrievalError::Store(_))));
    }

    #[tokio::test]
    async fn test_corrupt_index_is_an_index_error() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(INDEX_FILE), b"not json").unwrap();

        let store = DiskVectorStore::new(
            dir.path(),
            Arc::new(FixedEmbedder {
                vector: vec![1.0],
            }),
        );

        let result = store
            .similarity_search("topic", 3, "models/text-embedding-004")
            .await;
        assert!(matches!(result, Err(RetrievalError::Index(_))));
    }
}
