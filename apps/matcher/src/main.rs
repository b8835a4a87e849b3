mod config;
mod errors;
mod ingest;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;
mod storage;
mod vector;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, VectorBackend};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::vector::embedding::HttpEmbedder;
use crate::vector::memory::InMemoryIndex;
use crate::vector::pinecone::PineconeIndex;
use crate::vector::{Embedder, VectorIndex, VectorStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting candidate matcher v{}", env!("CARGO_PKG_VERSION"));

    let timeout = Duration::from_secs(config.llm_timeout_secs);

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        &config.openai_base_url,
        config.llm_model.clone(),
        timeout,
    )?
    .with_max_attempts(config.llm_max_attempts);
    info!("LLM client initialized (model: {})", llm.model());

    // Shared client for embeddings, Pinecone and job-description URL fetches
    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")?;

    let embedder = Arc::new(HttpEmbedder::new(
        http.clone(),
        config.embedding_url.clone(),
        config.embedding_api_key.clone(),
        config.embedding_dimension,
    ));

    let index: Arc<dyn VectorIndex> = match (&config.vector_backend, &config.pinecone) {
        (VectorBackend::Pinecone, Some(pinecone)) => {
            let index = PineconeIndex::connect(
                http.clone(),
                pinecone,
                embedder.dimension(),
                config.vector_metric,
            )
            .await?;
            Arc::new(index)
        }
        _ => {
            info!("Using in-memory vector index; stored resumes are lost on restart");
            Arc::new(InMemoryIndex::new())
        }
    };
    let store = VectorStore::new(embedder, index);

    tokio::fs::create_dir_all(&config.resume_dir)
        .await
        .with_context(|| format!("failed to create {}", config.resume_dir.display()))?;
    tokio::fs::create_dir_all(&config.jd_dir)
        .await
        .with_context(|| format!("failed to create {}", config.jd_dir.display()))?;

    // Build app state
    let state = AppState::new(config.clone(), Arc::new(llm), store, http);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
