// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context ranker: merges predefined knowledge and per-user long-term
//! memory into one ranked list for prompting.
//!
//! The two sub-searches are independently fault-tolerant -- either failing
//! contributes an empty set rather than failing the merge.

use std::sync::Arc;

use mentora_config::model::MemoryConfig;
use mentora_core::types::EmbeddingInput;
use mentora_core::EmbeddingAdapter;
use tracing::warn;

use crate::long_term::LongTermMemory;
use crate::types::RankedChunk;
use crate::vector_store::VectorStore;

/// Merges predefined-knowledge hits and long-term-memory hits for a query.
pub struct ContextRanker {
    store: Arc<VectorStore>,
    embedder: Arc<dyn EmbeddingAdapter>,
    long_term: Arc<LongTermMemory>,
    config: MemoryConfig,
}

impl ContextRanker {
    /// Creates a new ranker over the configured predefined collection and
    /// the user's long-term memory.
    pub fn new(
        store: Arc<VectorStore>,
        embedder: Arc<dyn EmbeddingAdapter>,
        long_term: Arc<LongTermMemory>,
        config: MemoryConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            long_term,
            config,
        }
    }

    /// The merged, descending-score context for a query.
    ///
    /// Queries the shared predefined collection (unfiltered) and the user's
    /// long-term memory, concatenates both result sets, and sorts by raw
    /// similarity. No truncation happens here -- display capping belongs to
    /// prompt composition.
    pub async fn search_relevant_chunks(&self, query: &str, user_id: &str) -> Vec<RankedChunk> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let query_embedding = self.embed(query).await;

        let predefined = if query_embedding.is_empty() {
            Vec::new()
        } else {
            match self
                .store
                .search(
                    &self.config.predefined_collection,
                    &query_embedding,
                    self.config.search_limit,
                    None,
                )
                .await
            {
                Ok(hits) => hits
                    .into_iter()
                    .map(|hit| RankedChunk {
                        text: hit.text,
                        source: hit.source,
                        score: hit.score,
                    })
                    .collect(),
                Err(e) => {
                    warn!(error = %e, "predefined knowledge search failed");
                    Vec::new()
                }
            }
        };

        let user_memory = self
            .long_term
            .search_relevant_chunks(query, user_id, self.config.search_limit)
            .await;

        let mut merged: Vec<RankedChunk> = predefined.into_iter().chain(user_memory).collect();
        merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        merged
    }

    /// Embed the query once for the predefined search, degrading failure to
    /// an empty vector.
    async fn embed(&self, text: &str) -> Vec<f32> {
        let input = EmbeddingInput {
            texts: vec![text.to_string()],
        };
        match self.embedder.embed(input).await {
            Ok(output) => output.embeddings.into_iter().next().unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "query embedding failed");
                Vec::new()
            }
        }
    }
}
