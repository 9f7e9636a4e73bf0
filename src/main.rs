//! mediawar-backend: relay and retrieval service for the MediaWar pipeline
//!
//! Sits between the frontend and the Google Generative Language API and
//! provides:
//! - A transparent relay with server-side API key injection
//! - Style example context from a persisted vector store
//! - Agent prompt serving so the frontend bundle stays prompt-free

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

use mediawar_backend::{config::AppConfig, ingest::ingest_document, run_server};

#[derive(Parser)]
#[command(name = "mediawar-backend")]
#[command(version = "3.3.0")]
#[command(about = "Backend relay and style retrieval for the MediaWar pipeline")]
#[command(long_about = "
mediawar-backend hosts the server side of the MediaWar pipeline:
  - /api/gemini/{path}: transparent relay to the Generative Language API,
    with the GOOGLE_API_KEY injected server-side (never sent to browsers)
  - /api/get-harris-style: style example context from the vector store
  - /api/prompts: agent prompts for the frontend pipeline

Example usage:
  mediawar-backend run --config config.yaml
  mediawar-backend ingest --source training_data/all_transcripts.txt
")]
struct Cli {
    /// Path to config file (optional; defaults apply when absent)
    #[arg(short, long, global = true, default_value = "config.yaml")]
    config: PathBuf,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the backend server
    Run {
        /// Override listen port
        #[arg(short, long)]
        port: Option<u16>,
        /// Override upstream base URL
        #[arg(long)]
        upstream_url: Option<String>,
    },

    /// Build the style vector store from a source document
    Ingest {
        /// Path to the source transcript file (plain text)
        #[arg(short, long)]
        source: PathBuf,
        /// Override the store directory
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Validate configuration file
    CheckConfig,

    /// Test connection to the upstream API
    TestUpstream,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter))
        .init();

    match cli.command {
        Commands::Run { port, upstream_url } => {
            let mut config = AppConfig::load(&cli.config)?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(url) = upstream_url {
                config.upstream.url = url;
            }
            if config.upstream.api_key.is_none() {
                tracing::warn!(
                    "GOOGLE_API_KEY is not set; /api/gemini requests will be rejected"
                );
            }
            run_server(config).await?;
        }
        Commands::Ingest { source, store } => {
            let mut config = AppConfig::load(&cli.config)?;
            if let Some(store) = store {
                config.retrieval.store_path = store;
            }
            let summary = ingest_document(&config, &source).await?;
            println!(
                "Ingested {} chunks with model {}",
                summary.chunk_count, summary.embedding_model
            );
            println!("Store written to {}", config.retrieval.store_path.display());
        }
        Commands::CheckConfig => {
            check_config(cli.config)?;
        }
        Commands::TestUpstream => {
            test_upstream(cli.config).await?;
        }
    }

    Ok(())
}

/// Validate configuration file
fn check_config(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    match AppConfig::from_file(&config_path) {
        Ok(mut config) => {
            config.merge_env();
            println!("✓ Configuration file is valid\n");
            println!("Server:");
            println!("  Listen: {}:{}", config.server.host, config.server.port);
            println!("  Allowed origins: {}", config.server.allowed_origins.join(", "));
            println!("\nUpstream:");
            println!("  URL: {}", config.upstream.base_url());
            println!("  Timeout: {}s", config.upstream.timeout_seconds);
            println!(
                "  API key: {}",
                if config.upstream.api_key.is_some() {
                    "configured"
                } else {
                    "not set (export GOOGLE_API_KEY)"
                }
            );
            println!("\nRetrieval:");
            println!("  Store: {}", config.retrieval.store_path.display());
            println!(
                "  Fallback embedding model: {}",
                config.retrieval.default_embedding_model
            );
            println!("  Top k: {}", config.retrieval.top_k);
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Test connection to the upstream API
async fn test_upstream(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(&config_path)?;
    let models_url = format!("{}/v1beta/models", config.upstream.base_url());

    println!("Testing upstream model listing: {}", models_url);
    if config.upstream.api_key.is_none() {
        println!("  (GOOGLE_API_KEY not set; the upstream will likely reject the call)");
    }

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let mut request = client.get(&models_url);
    if let Some(ref key) = config.upstream.api_key {
        request = request.query(&[("key", key.expose())]);
    }

    match request.send().await {
        Ok(resp) => {
            if resp.status().is_success() {
                println!("✓ Upstream is reachable");
                if let Ok(json) = resp.json::<serde_json::Value>().await {
                    if let Some(models) = json.get("models").and_then(|m| m.as_array()) {
                        println!("  Available models: {}", models.len());
                        for model in models.iter().take(5) {
                            if let Some(name) = model.get("name").and_then(|n| n.as_str()) {
                                println!("    - {}", name);
                            }
                        }
                    }
                }
            } else {
                println!("✗ Upstream returned error status: {}", resp.status());
            }
        }
        Err(e) => {
            println!("✗ Failed to connect to upstream: {}", e.without_url());
            std::process::exit(1);
        }
    }

    Ok(())
}
