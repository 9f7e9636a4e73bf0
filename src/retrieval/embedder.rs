//! Remote embedding client

use async_trait::async_trait;
use serde_json::json;

use super::RetrievalError;
use crate::api::EmbedContentResponse;
use crate::config::ApiKey;

/// Embeds one text with a given model, returning the raw vector
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>, RetrievalError>;
}

/// Embeds text through the upstream `:embedContent` endpoint
pub struct GeminiEmbedder {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
}

impl GeminiEmbedder {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<ApiKey>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let key = self.api_key.as_ref().ok_or_else(|| {
            RetrievalError::Embedding("GOOGLE_API_KEY not configured".to_string())
        })?;

        // the resolved model name already carries the "models/" prefix
        let url = format!("{}/v1beta/{}:embedContent", self.base_url, model);
        let body = json!({
            "model": model,
            "content": { "parts": [{ "text": text }] },
        });

        // errors are rendered without the URL so the key query parameter
        // never reaches a log line or caller
        let response = self
            .client
            .post(&url)
            .query(&[("key", key.expose())])
            .json(&body)
            .send()
            .await
            .map_err(|e| RetrievalError::Embedding(e.without_url().to_string()))?
            .error_for_status()
            .map_err(|e| RetrievalError::Embedding(e.without_url().to_string()))?;

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Embedding(e.without_url().to_string()))?;

        Ok(parsed.embedding.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embed_without_key_fails_before_any_network_call() {
        // unreachable base URL: a network attempt would error differently
        let embedder = GeminiEmbedder::new(reqwest::Client::new(), "http://127.0.0.1:1", None);
        let result = embedder.embed("models/text-embedding-004", "text").await;

        match result {
            Err(RetrievalError::Embedding(msg)) => {
                assert!(msg.contains("GOOGLE_API_KEY"));
            }
            other => panic!("expected embedding error, got {:?}", other.map(|v| v.len())),
        }
    }
}
