//! Server setup and API route handlers

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::HeaderValue,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handler::GeminiRelay;
use crate::api::{StatusResponse, StyleResponse, TopicRequest};
use crate::config::AppConfig;
use crate::prompts;
use crate::retrieval::{DiskVectorStore, GeminiEmbedder, GeminiModelResolver, StyleRetriever};

/// Version reported by the liveness endpoint; the frontend checks it
pub const API_VERSION: &str = "3.3";

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub http_client: reqwest::Client,
    pub retriever: Arc<StyleRetriever>,
}

impl AppState {
    /// Build production state: one HTTP client for all upstream calls and a
    /// retriever wired to the configured store path.
    pub fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream.timeout_seconds))
            .build()?;

        let resolver = Arc::new(GeminiModelResolver::new(
            http_client.clone(),
            config.upstream.base_url(),
            config.upstream.api_key.clone(),
            config.retrieval.default_embedding_model.clone(),
        ));
        let embedder = Arc::new(GeminiEmbedder::new(
            http_client.clone(),
            config.upstream.base_url(),
            config.upstream.api_key.clone(),
        ));
        let store = Arc::new(DiskVectorStore::new(
            config.retrieval.store_path.clone(),
            embedder,
        ));
        let retriever = Arc::new(StyleRetriever::new(resolver, store, config.retrieval.top_k));

        Ok(Self {
            config: Arc::new(config),
            http_client,
            retriever,
        })
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(root_handler))
        .route("/api/prompts", get(prompts_handler))
        .route("/api/get-harris-style", post(style_handler))
        .route("/api/gemini/*path", post(gemini_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Run the server until shutdown
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let upstream = config.upstream.base_url().to_string();

    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("mediawar-backend listening on {}", addr);
    tracing::info!("Relaying to {}", upstream);

    Ok(axum::serve(listener, app).await?)
}

/// Liveness payload
async fn root_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "MediaWar Backend is running".to_string(),
        version: API_VERSION.to_string(),
    })
}

/// Serves all agent prompts so they can change without a frontend rebuild
async fn prompts_handler() -> Json<BTreeMap<&'static str, &'static str>> {
    Json(prompts::prompt_map())
}

/// Style context lookup; retrieval failures degrade to an empty context
async fn style_handler(
    State(state): State<AppState>,
    Json(request): Json<TopicRequest>,
) -> Json<StyleResponse> {
    tracing::info!(topic = %request.topic, "style request");
    let style_context = state.retriever.context_for(&request.topic).await;
    Json(StyleResponse {
        topic: request.topic,
        style_context,
    })
}

/// Transparent relay to the upstream Generative Language API
async fn gemini_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    GeminiRelay::new(state).relay(&path, query.as_deref(), body).await
}
