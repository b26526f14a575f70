// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mentora seed` command implementation.
//!
//! Loads predefined-knowledge items from a JSON file into the shared
//! predefined collection, embedding each item. Items that fail to embed
//! are skipped with a warning rather than aborting the load.

use std::path::Path;
use std::sync::Arc;

use mentora_config::MentoraConfig;
use mentora_core::types::EmbeddingInput;
use mentora_core::{EmbeddingAdapter, MentoraError};
use mentora_gemini::{GeminiClient, GeminiEmbedder};
use mentora_memory::{apply_schema, NewVector, VectorStore};
use serde::Deserialize;
use tracing::{info, warn};

/// One predefined-knowledge item in the seed file.
#[derive(Debug, Deserialize)]
struct SeedItem {
    /// The knowledge text to embed and store.
    text: String,
    /// Optional role tag carried as metadata.
    #[serde(default)]
    role: Option<String>,
}

/// Runs the `mentora seed` command.
pub async fn run_seed(
    config: MentoraConfig,
    file: &Path,
    recreate: bool,
) -> Result<(), MentoraError> {
    let api_key = config.gemini.api_key.clone().ok_or_else(|| {
        MentoraError::Config(
            "gemini.api_key is not set (use MENTORA_GEMINI_API_KEY or mentora.toml)".to_string(),
        )
    })?;

    let raw = std::fs::read_to_string(file).map_err(|e| {
        MentoraError::Config(format!("cannot read seed file {}: {e}", file.display()))
    })?;
    let items: Vec<SeedItem> = serde_json::from_str(&raw).map_err(|e| {
        MentoraError::Config(format!("seed file {} is not a JSON array: {e}", file.display()))
    })?;

    let conn = tokio_rusqlite::Connection::open(&config.storage.database_path)
        .await
        .map_err(|e| MentoraError::Storage {
            source: Box::new(e),
        })?;
    apply_schema(&conn).await?;

    let client = Arc::new(GeminiClient::new(&api_key)?);
    let embedder = GeminiEmbedder::new(
        client,
        config.gemini.embedding_model.clone(),
        config.memory.embedding_dimensions,
    );

    let store = VectorStore::new(conn, config.memory.embedding_dimensions);
    let collection = &config.memory.predefined_collection;

    if recreate {
        let removed = store.clear_collection(collection).await?;
        info!(collection, removed, "cleared predefined collection");
    }

    let total = items.len();
    let mut inserted = 0usize;
    for item in items {
        let output = embedder
            .embed(EmbeddingInput {
                texts: vec![item.text.clone()],
            })
            .await?;
        let embedding = output.embeddings.into_iter().next().unwrap_or_default();
        if embedding.is_empty() {
            warn!(text = %item.text, "embedding failed, item skipped");
            continue;
        }

        let metadata = match &item.role {
            Some(role) => serde_json::json!({ "role": role }),
            None => serde_json::Value::Null,
        };
        store
            .insert(
                collection,
                NewVector {
                    owner: None,
                    kind: None,
                    text: item.text,
                    embedding,
                    metadata,
                },
            )
            .await?;
        inserted += 1;
    }

    info!(collection, inserted, total, "predefined knowledge loaded");
    Ok(())
}
