// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mentora serve` command implementation.
//!
//! Wires the full coach backend: SQLite storage, Gemini provider and
//! embedder, the memory subsystem, the coach pipeline, and the HTTP
//! gateway. Each backing-store client is constructed once here and shared
//! by reference across all request tasks.

use std::sync::Arc;

use mentora_agent::CoachPipeline;
use mentora_config::MentoraConfig;
use mentora_core::{EmbeddingAdapter, MentoraError, ProviderAdapter};
use mentora_gateway::{start_server, GatewayState, ServerConfig};
use mentora_gemini::{GeminiClient, GeminiEmbedder, GeminiProvider};
use mentora_memory::{apply_schema, ContextRanker, LongTermMemory, SessionMemory, VectorStore};
use tracing::info;

/// Runs the `mentora serve` command.
pub async fn run_serve(config: MentoraConfig) -> Result<(), MentoraError> {
    info!(name = %config.agent.name, "starting mentora serve");

    let api_key = config.gemini.api_key.clone().ok_or_else(|| {
        MentoraError::Config(
            "gemini.api_key is not set (use MENTORA_GEMINI_API_KEY or mentora.toml)".to_string(),
        )
    })?;

    // One SQLite connection for the process; every component shares the
    // same background-thread handle.
    let conn = tokio_rusqlite::Connection::open(&config.storage.database_path)
        .await
        .map_err(|e| MentoraError::Storage {
            source: Box::new(e),
        })?;
    apply_schema(&conn).await?;
    info!(path = %config.storage.database_path, "storage ready");

    // One Gemini client for the process; provider and embedder share its
    // connection pool.
    let client = Arc::new(GeminiClient::new(&api_key)?);
    let provider: Arc<dyn ProviderAdapter> = Arc::new(GeminiProvider::new(
        Arc::clone(&client),
        config.gemini.model.clone(),
    ));
    let embedder: Arc<dyn EmbeddingAdapter> = Arc::new(GeminiEmbedder::new(
        client,
        config.gemini.embedding_model.clone(),
        config.memory.embedding_dimensions,
    ));

    let store = Arc::new(VectorStore::new(
        conn.clone(),
        config.memory.embedding_dimensions,
    ));
    let long_term = Arc::new(LongTermMemory::new(
        Arc::clone(&store),
        Arc::clone(&embedder),
        config.memory.clone(),
    ));
    let ranker = Arc::new(ContextRanker::new(
        store,
        embedder,
        Arc::clone(&long_term),
        config.memory.clone(),
    ));
    let session = Arc::new(SessionMemory::new(
        conn,
        config.session.max_turns,
        config.session.ttl_seconds,
    ));

    let pipeline = Arc::new(CoachPipeline::new(
        session,
        ranker,
        long_term,
        provider,
        config.gemini.max_tokens,
    ));

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    start_server(&server_config, GatewayState { pipeline }).await
}
