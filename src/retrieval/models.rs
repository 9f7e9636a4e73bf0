//! Embedding model resolution.
//!
//! The upstream account decides which embedding models are available, so the
//! identifier is discovered by listing models and filtering for
//! `embedContent` support — the same logic the ingestion pipeline uses, so
//! query vectors stay comparable with stored vectors.

use async_trait::async_trait;

use crate::api::ModelList;
use crate::config::ApiKey;

/// Fallback when model listing fails or nothing supports embedding
pub const DEFAULT_EMBEDDING_MODEL: &str = "models/text-embedding-004";

/// Resolves the embedding model identifier to use for a call.
///
/// A trait so call sites can be given a cached, memoized or stubbed
/// resolver without changing.
#[async_trait]
pub trait ModelResolver: Send + Sync {
    async fn resolve(&self) -> String;
}

/// Resolves the embedding model by listing upstream models
pub struct GeminiModelResolver {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
    fallback: String,
}

impl GeminiModelResolver {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<ApiKey>,
        fallback: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
            fallback: fallback.into(),
        }
    }

    async fn list_models(&self) -> Result<ModelList, reqwest::Error> {
        let url = format!("{}/v1beta/models", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(ref key) = self.api_key {
            request = request.query(&[("key", key.expose())]);
        }
        request
            .send()
            .await?
            .error_for_status()?
            .json::<ModelList>()
            .await
    }
}

#[async_trait]
impl ModelResolver for GeminiModelResolver {
    async fn resolve(&self) -> String {
        match self.list_models().await {
            Ok(list) => {
                if let Some(model) = list.models.iter().find(|m| m.supports_embedding()) {
                    tracing::debug!(model = %model.name, "resolved embedding model");
                    return model.name.clone();
                }
                tracing::warn!(
                    fallback = %self.fallback,
                    "no embedding-capable model listed, using fallback"
                );
                self.fallback.clone()
            }
            Err(e) => {
                tracing::warn!(
                    error = %e.without_url(),
                    fallback = %self.fallback,
                    "model listing failed, using fallback"
                );
                self.fallback.clone()
            }
        }
    }
}
