// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-term memory manager: the durable fact lifecycle.
//!
//! Owns storage, deduplication, capacity eviction, and similarity retrieval
//! for per-user memory records. Every store and embedding interaction is
//! independently guarded: a failure degrades to a no-op or an empty result
//! and is logged, never propagated to the caller.

use std::sync::Arc;

use mentora_config::model::MemoryConfig;
use mentora_core::types::EmbeddingInput;
use mentora_core::EmbeddingAdapter;
use tracing::{debug, warn};

use crate::types::{
    comparison_key, is_trivial_text, normalize_text, MemoryKind, MemoryRecord, RankedChunk,
};
use crate::vector_store::{NewVector, StoredVector, VectorStore};

/// Long-term memory manager for per-user records.
pub struct LongTermMemory {
    store: Arc<VectorStore>,
    embedder: Arc<dyn EmbeddingAdapter>,
    config: MemoryConfig,
}

impl LongTermMemory {
    /// Creates a new manager over the configured user-history collection.
    pub fn new(
        store: Arc<VectorStore>,
        embedder: Arc<dyn EmbeddingAdapter>,
        config: MemoryConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            config,
        }
    }

    /// Commit a raw message as a History-kind record.
    ///
    /// Trivial text is skipped unless `force` is set. Embedding failure
    /// (empty vector) skips the commit entirely.
    pub async fn save_history(&self, user_id: &str, message: &str, force: bool) {
        let message = normalize_text(message);
        if message.is_empty() {
            return;
        }
        if !force && is_trivial_text(&message) {
            debug!(user_id, "skipping trivial history message");
            return;
        }
        self.commit(user_id, &message, MemoryKind::History).await;
    }

    /// Commit a distilled fact as a Summary-kind record.
    ///
    /// The trivial filter always applies -- there is no override for
    /// summaries. Embedding failure skips the commit entirely.
    pub async fn save_summary(&self, user_id: &str, summary: &str) {
        let summary = normalize_text(summary);
        if summary.is_empty() || is_trivial_text(&summary) {
            debug!(user_id, "skipping trivial summary");
            return;
        }
        self.commit(user_id, &summary, MemoryKind::Summary).await;
    }

    /// Embed and insert a record, degrading silently on failure.
    async fn commit(&self, user_id: &str, text: &str, kind: MemoryKind) {
        let embedding = self.embed(text).await;
        if embedding.is_empty() {
            warn!(user_id, "embedding failed, memory not committed");
            return;
        }

        let point = NewVector {
            owner: Some(user_id.to_string()),
            kind: Some(kind.as_str().to_string()),
            text: text.to_string(),
            embedding,
            metadata: serde_json::Value::Null,
        };
        if let Err(e) = self.store.insert(&self.config.user_collection, point).await {
            warn!(user_id, error = %e, "memory insert failed");
        }
    }

    /// All Summary-kind records for a user, newest first.
    ///
    /// Enumerates a bounded superset of the collection and filters
    /// client-side -- the store is not assumed to support filtered queries.
    /// Users with more records than the scan bound may miss their oldest
    /// entries. Store failure reads as an empty set.
    pub async fn get_summaries(&self, user_id: &str) -> Vec<MemoryRecord> {
        let scroll = self
            .store
            .scroll(&self.config.user_collection, self.config.scroll_limit)
            .await;
        let records = match scroll {
            Ok(records) => records,
            Err(e) => {
                warn!(user_id, error = %e, "summary enumeration failed");
                return Vec::new();
            }
        };

        records
            .into_iter()
            .filter_map(to_memory_record)
            .filter(|record| record.owner == user_id && record.kind == MemoryKind::Summary)
            .collect()
    }

    /// Deduplicating insert with capacity eviction.
    ///
    /// Skips the insert when the normalized new text equals an existing
    /// summary, or is contained in one. Containment is checked in that one
    /// direction only: a longer rewording of an existing fact is stored as a
    /// new record. After a successful insert, records beyond the capacity
    /// cap are deleted -- `get_summaries` returns newest first, so the
    /// entries past the cap are the oldest. The cap is approximate when two
    /// upserts for the same user race; the window is read-then-write.
    pub async fn upsert_summary(&self, user_id: &str, summary: &str) {
        let summary = normalize_text(summary);
        if summary.is_empty() {
            return;
        }

        let existing = self.get_summaries(user_id).await;
        let new_key = comparison_key(&summary);

        for record in &existing {
            let existing_key = comparison_key(&record.text);
            if new_key == existing_key {
                debug!(user_id, "summary already stored, skipping");
                return;
            }
            if existing_key.contains(&new_key) {
                debug!(user_id, "summary contained in an existing record, skipping");
                return;
            }
        }

        self.save_summary(user_id, &summary).await;

        let summaries = self.get_summaries(user_id).await;
        if summaries.len() > self.config.max_summaries {
            for record in &summaries[self.config.max_summaries..] {
                if let Err(e) = self.store.delete(&self.config.user_collection, &record.id).await {
                    warn!(user_id, id = %record.id, error = %e, "summary eviction failed");
                }
            }
        }
    }

    /// The user's summaries ranked against a query, best first.
    ///
    /// Embeds the query (an empty embedding yields no results), scores every
    /// summary by cosine similarity -- re-embedding any record whose stored
    /// vector is unusable -- and returns the top `limit`.
    pub async fn search_relevant_chunks(
        &self,
        query: &str,
        user_id: &str,
        limit: usize,
    ) -> Vec<RankedChunk> {
        let summaries = self.get_summaries(user_id).await;
        if summaries.is_empty() {
            return Vec::new();
        }

        let query_embedding = self.embed(query).await;
        if query_embedding.is_empty() {
            warn!(user_id, "query embedding failed, no memory retrieved");
            return Vec::new();
        }

        let mut scored = Vec::new();
        for record in summaries {
            let embedding = if record.embedding.len() == query_embedding.len() {
                record.embedding
            } else {
                self.embed(&record.text).await
            };
            if embedding.len() != query_embedding.len() {
                continue;
            }
            scored.push(RankedChunk {
                score: crate::types::cosine_similarity(&query_embedding, &embedding),
                text: record.text,
                source: MemoryKind::Summary.as_str().to_string(),
            });
        }

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }

    /// Embed one text, degrading any failure to an empty vector.
    async fn embed(&self, text: &str) -> Vec<f32> {
        let input = EmbeddingInput {
            texts: vec![text.to_string()],
        };
        match self.embedder.embed(input).await {
            Ok(output) => output.embeddings.into_iter().next().unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "embedding call failed");
                Vec::new()
            }
        }
    }
}

/// Validate a stored row into the typed record the core works with.
///
/// Rows missing the required owner or kind fields are dropped here, at the
/// boundary where store payloads enter the core.
fn to_memory_record(stored: StoredVector) -> Option<MemoryRecord> {
    let owner = stored.owner?;
    let kind = MemoryKind::from_str_value(&stored.kind?);
    Some(MemoryRecord {
        id: stored.id,
        owner,
        kind,
        text: normalize_text(&stored.text),
        embedding: stored.embedding,
        metadata: stored.metadata,
        created_at: stored.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::apply_schema;
    use mentora_test_utils::MockEmbedder;
    use tokio_rusqlite::Connection;

    fn memory_config() -> MemoryConfig {
        MemoryConfig::default()
    }

    const DIM: usize = 16;

    async fn setup() -> LongTermMemory {
        setup_with_embedder(Arc::new(MockEmbedder::new(DIM))).await
    }

    async fn setup_with_embedder(embedder: Arc<dyn EmbeddingAdapter>) -> LongTermMemory {
        let conn = Connection::open_in_memory().await.unwrap();
        apply_schema(&conn).await.unwrap();
        let store = Arc::new(VectorStore::new(conn, DIM));
        LongTermMemory::new(store, embedder, memory_config())
    }

    #[tokio::test]
    async fn save_summary_and_get_summaries() {
        let memory = setup().await;

        memory.save_summary("u1", "wants to learn backend development").await;

        let summaries = memory.get_summaries("u1").await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].text, "wants to learn backend development");
        assert_eq!(summaries[0].kind, MemoryKind::Summary);
        assert_eq!(summaries[0].owner, "u1");
        assert_eq!(summaries[0].embedding.len(), DIM);
    }

    #[tokio::test]
    async fn trivial_summaries_are_never_committed() {
        let memory = setup().await;

        memory.save_summary("u1", "ok").await;
        memory.save_summary("u1", "thanks").await;
        memory.save_summary("u1", "short").await; // under 10 chars
        memory.save_summary("u1", "").await;

        assert!(memory.get_summaries("u1").await.is_empty());
    }

    #[tokio::test]
    async fn history_respects_force_flag() {
        let memory = setup().await;

        memory.save_history("u1", "ok", false).await;
        assert!(memory.get_summaries("u1").await.is_empty());

        memory.save_history("u1", "ok", true).await;
        // History records are not summaries; check through the store.
        let records = memory.store.scroll("user_history", 10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind.as_deref(), Some("history"));
    }

    #[tokio::test]
    async fn embedding_failure_skips_commit() {
        let memory = setup_with_embedder(Arc::new(MockEmbedder::failing(DIM))).await;

        memory.save_summary("u1", "this would be worth remembering").await;

        assert!(memory.get_summaries("u1").await.is_empty());
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let memory = setup().await;

        memory.upsert_summary("u1", "loves systems programming").await;
        memory.upsert_summary("u1", "loves systems programming").await;

        let summaries = memory.get_summaries("u1").await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].text, "loves systems programming");
    }

    #[tokio::test]
    async fn upsert_dedup_is_case_and_whitespace_insensitive() {
        let memory = setup().await;

        memory.upsert_summary("u1", "Loves Systems Programming").await;
        memory.upsert_summary("u1", "loves   systems\tprogramming").await;

        assert_eq!(memory.get_summaries("u1").await.len(), 1);
    }

    #[tokio::test]
    async fn upsert_skips_substring_of_existing() {
        let memory = setup().await;

        memory.upsert_summary("u1", "I love backend development").await;
        memory.upsert_summary("u1", "backend development").await;

        let summaries = memory.get_summaries("u1").await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].text, "I love backend development");
    }

    #[tokio::test]
    async fn upsert_keeps_superstring_of_existing() {
        let memory = setup().await;

        // The containment check runs in one direction only: a longer
        // rewording of a stored fact is inserted as a new record.
        memory.upsert_summary("u1", "backend development").await;
        memory.upsert_summary("u1", "I love backend development deeply").await;

        assert_eq!(memory.get_summaries("u1").await.len(), 2);
    }

    #[tokio::test]
    async fn upsert_evicts_oldest_beyond_cap() {
        let memory = setup().await;

        for i in 0..9 {
            memory
                .upsert_summary("u1", &format!("distinct long-term fact number {i}"))
                .await;
        }

        let summaries = memory.get_summaries("u1").await;
        assert_eq!(summaries.len(), 6);
        // Newest first; the three oldest (0, 1, 2) were evicted.
        assert_eq!(summaries[0].text, "distinct long-term fact number 8");
        assert_eq!(summaries[5].text, "distinct long-term fact number 3");
    }

    #[tokio::test]
    async fn summaries_are_per_user() {
        let memory = setup().await;

        memory.upsert_summary("alice", "alice enjoys rock climbing").await;
        memory.upsert_summary("bob", "bob enjoys chess tournaments").await;

        let alice = memory.get_summaries("alice").await;
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].text, "alice enjoys rock climbing");
        assert_eq!(memory.get_summaries("bob").await.len(), 1);
    }

    #[tokio::test]
    async fn search_returns_descending_scores() {
        let memory = setup().await;

        memory.upsert_summary("u1", "studies backend development at night").await;
        memory.upsert_summary("u1", "has a golden retriever named max").await;
        memory.upsert_summary("u1", "wants a promotion to staff engineer").await;

        let chunks = memory
            .search_relevant_chunks("studies backend development at night", "u1", 5)
            .await;
        assert_eq!(chunks.len(), 3);
        for pair in chunks.windows(2) {
            assert!(pair[0].score >= pair[1].score, "scores must be non-increasing");
        }
        // The exact-text summary scores ~1.0 and ranks first.
        assert_eq!(chunks[0].text, "studies backend development at night");
        assert!((chunks[0].score - 1.0).abs() < 1e-5);
        assert!(chunks.iter().all(|c| c.source == "summary"));
    }

    #[tokio::test]
    async fn search_respects_limit() {
        let memory = setup().await;
        for i in 0..5 {
            memory
                .upsert_summary("u1", &format!("distinct long-term fact number {i}"))
                .await;
        }

        let chunks = memory.search_relevant_chunks("fact", "u1", 2).await;
        assert_eq!(chunks.len(), 2);
    }

    #[tokio::test]
    async fn search_with_no_summaries_is_empty() {
        let memory = setup().await;
        assert!(memory
            .search_relevant_chunks("career growth", "u1", 5)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn search_with_failed_query_embedding_is_empty() {
        let conn = Connection::open_in_memory().await.unwrap();
        apply_schema(&conn).await.unwrap();
        let store = Arc::new(VectorStore::new(conn, DIM));

        // Seed one summary with a working embedder.
        let working = LongTermMemory::new(
            Arc::clone(&store),
            Arc::new(MockEmbedder::new(DIM)),
            memory_config(),
        );
        working.save_summary("u1", "remembers something substantive").await;

        // Then search with a failing embedder over the same store.
        let broken = LongTermMemory::new(
            store,
            Arc::new(MockEmbedder::failing(DIM)),
            memory_config(),
        );
        assert!(broken
            .search_relevant_chunks("anything", "u1", 5)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn unreadable_stored_embedding_is_recomputed() {
        let memory = setup().await;
        memory.save_summary("u1", "has been learning rust for a year").await;

        // Corrupt the stored vector to a wrong-length blob.
        memory
            .store
            .conn_for_tests()
            .call(|conn| {
                conn.execute("UPDATE vectors SET embedding = x'00000000'", [])?;
                Ok::<(), rusqlite::Error>(())
            })
            .await
            .unwrap();

        let chunks = memory
            .search_relevant_chunks("has been learning rust for a year", "u1", 5)
            .await;
        assert_eq!(chunks.len(), 1);
        assert!((chunks[0].score - 1.0).abs() < 1e-5);
    }
}
