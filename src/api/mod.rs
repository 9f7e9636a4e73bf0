//! Wire types for the HTTP API and the upstream Generative Language API

use serde::{Deserialize, Serialize};

/// Liveness payload returned by `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
}

/// Request body for `POST /api/get-harris-style`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRequest {
    pub topic: String,
}

/// Response body for `POST /api/get-harris-style`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleResponse {
    pub topic: String,
    pub style_context: String,
}

/// Subset of the upstream `GET /v1beta/models` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

/// One model entry from the upstream listing
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default, rename = "supportedGenerationMethods")]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    /// True if the model can serve `embedContent` requests
    pub fn supports_embedding(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|method| method == "embedContent")
    }
}

/// Subset of the upstream `:embedContent` response
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedContentResponse {
    pub embedding: ContentEmbedding,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentEmbedding {
    #[serde(default)]
    pub values: Vec<f32>,
}
