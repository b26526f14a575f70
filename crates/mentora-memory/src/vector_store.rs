// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed namespaced vector store.
//!
//! Each record lives in a named collection and carries a fixed-dimension
//! embedding stored as a little-endian f32 BLOB. Similarity search loads the
//! collection's embeddings and computes cosine similarity in-process; the
//! store makes no assumption about server-side filtering, so enumeration
//! (`scroll`) is bounded and unfiltered, with callers filtering client-side.

use mentora_core::MentoraError;
use rusqlite::params;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::types::{blob_to_vec, cosine_similarity, vec_to_blob};

/// Helper to convert tokio_rusqlite errors into MentoraError::Storage.
fn storage_err(e: tokio_rusqlite::Error) -> MentoraError {
    MentoraError::Storage {
        source: Box::new(e),
    }
}

/// A record as stored in a collection.
#[derive(Debug, Clone)]
pub struct StoredVector {
    /// Unique record identifier.
    pub id: String,
    /// Owning user, when the collection is per-user.
    pub owner: Option<String>,
    /// Record kind tag, when the collection distinguishes kinds.
    pub kind: Option<String>,
    /// The stored text.
    pub text: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// Opaque metadata map.
    pub metadata: serde_json::Value,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// Input for [`VectorStore::insert`].
#[derive(Debug, Clone)]
pub struct NewVector {
    pub owner: Option<String>,
    pub kind: Option<String>,
    pub text: String,
    pub embedding: Vec<f32>,
    pub metadata: serde_json::Value,
}

/// A similarity search hit.
#[derive(Debug, Clone)]
pub struct ScoredPoint {
    /// The matched text.
    pub text: String,
    /// Cosine similarity against the query embedding.
    pub score: f32,
    /// Collection the hit came from.
    pub source: String,
    /// Opaque metadata map.
    pub metadata: serde_json::Value,
}

/// Namespaced vector collection store over a shared SQLite connection.
pub struct VectorStore {
    conn: Connection,
    dimensions: usize,
}

impl VectorStore {
    /// Creates a new store wrapping an existing connection.
    ///
    /// The connection should already have the memory schema applied.
    pub fn new(conn: Connection, dimensions: usize) -> Self {
        Self { conn, dimensions }
    }

    /// Returns the fixed embedding dimensionality of this store.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Insert a record into a collection, returning its generated id.
    ///
    /// Rejects embeddings whose length differs from the store dimension --
    /// in particular the empty vector a failed embedding call produces. A
    /// record with a failed embedding must never be committed.
    pub async fn insert(
        &self,
        collection: &str,
        point: NewVector,
    ) -> Result<String, MentoraError> {
        if point.embedding.len() != self.dimensions {
            return Err(MentoraError::Embedding {
                message: format!(
                    "refusing to store embedding of length {} (expected {})",
                    point.embedding.len(),
                    self.dimensions
                ),
            });
        }

        let id = uuid::Uuid::new_v4().to_string();
        let collection = collection.to_string();
        let embedding_blob = vec_to_blob(&point.embedding);
        let metadata = serde_json::to_string(&point.metadata).map_err(|e| {
            MentoraError::Storage {
                source: Box::new(e),
            }
        })?;
        let created_at = now_iso();

        let inserted_id = id.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO vectors (id, collection, owner, kind, text, embedding, metadata, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        id,
                        collection,
                        point.owner,
                        point.kind,
                        point.text,
                        embedding_blob,
                        metadata,
                        created_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;

        Ok(inserted_id)
    }

    /// Similarity search within a collection, optionally filtered by owner.
    ///
    /// Loads the collection's embeddings and scores them in-process, sorted
    /// by cosine similarity descending, capped at `limit`. Embeddings whose
    /// length does not match the query are skipped.
    pub async fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        limit: usize,
        owner: Option<&str>,
    ) -> Result<Vec<ScoredPoint>, MentoraError> {
        if query_embedding.len() != self.dimensions {
            debug!(
                len = query_embedding.len(),
                expected = self.dimensions,
                "query embedding has wrong dimension, returning no hits"
            );
            return Ok(vec![]);
        }

        let collection_name = collection.to_string();
        let owner = owner.map(|o| o.to_string());
        let rows: Vec<(String, Vec<u8>, String)> = self
            .conn
            .call(move |conn| {
                let mut results = Vec::new();
                match &owner {
                    Some(owner_filter) => {
                        let mut stmt = conn.prepare(
                            "SELECT text, embedding, metadata FROM vectors
                             WHERE collection = ?1 AND owner = ?2",
                        )?;
                        let rows = stmt.query_map(params![collection_name, owner_filter], |row| {
                            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                        })?;
                        for row in rows {
                            results.push(row?);
                        }
                    }
                    None => {
                        let mut stmt = conn.prepare(
                            "SELECT text, embedding, metadata FROM vectors
                             WHERE collection = ?1",
                        )?;
                        let rows = stmt.query_map(params![collection_name], |row| {
                            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                        })?;
                        for row in rows {
                            results.push(row?);
                        }
                    }
                }
                Ok(results)
            })
            .await
            .map_err(storage_err)?;

        let mut scored: Vec<ScoredPoint> = rows
            .into_iter()
            .filter_map(|(text, blob, metadata)| {
                let embedding = blob_to_vec(&blob);
                if embedding.len() != query_embedding.len() {
                    return None;
                }
                Some(ScoredPoint {
                    text,
                    score: cosine_similarity(query_embedding, &embedding),
                    source: collection.to_string(),
                    metadata: serde_json::from_str(&metadata)
                        .unwrap_or(serde_json::Value::Null),
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        Ok(scored)
    }

    /// Bounded enumeration of a collection, newest-first, without filtering.
    ///
    /// Callers that need per-owner or per-kind subsets filter client-side;
    /// records beyond `limit` (the oldest, given the ordering) are silently
    /// missed, which is the documented degradation of the bounded scan.
    pub async fn scroll(
        &self,
        collection: &str,
        limit: usize,
    ) -> Result<Vec<StoredVector>, MentoraError> {
        let collection = collection.to_string();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, owner, kind, text, embedding, metadata, created_at
                     FROM vectors WHERE collection = ?1
                     ORDER BY rowid DESC LIMIT ?2",
                )?;
                let rows = stmt.query_map(params![collection, limit as i64], |row| {
                    let blob: Vec<u8> = row.get(4)?;
                    let metadata: Option<String> = row.get(5)?;
                    Ok(StoredVector {
                        id: row.get(0)?,
                        owner: row.get(1)?,
                        kind: row.get(2)?,
                        text: row.get(3)?,
                        embedding: blob_to_vec(&blob),
                        metadata: metadata
                            .and_then(|m| serde_json::from_str(&m).ok())
                            .unwrap_or(serde_json::Value::Null),
                        created_at: row.get(6)?,
                    })
                })?;
                let mut records = Vec::new();
                for row in rows {
                    records.push(row?);
                }
                Ok(records)
            })
            .await
            .map_err(storage_err)
    }

    /// Direct connection access for test setup.
    #[cfg(test)]
    pub(crate) fn conn_for_tests(&self) -> &Connection {
        &self.conn
    }

    /// Delete a record from a collection by id. Idempotent.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), MentoraError> {
        let collection = collection.to_string();
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "DELETE FROM vectors WHERE collection = ?1 AND id = ?2",
                    params![collection, id],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }

    /// Delete every record in a collection, returning how many were removed.
    pub async fn clear_collection(&self, collection: &str) -> Result<usize, MentoraError> {
        let collection = collection.to_string();
        self.conn
            .call(move |conn| {
                let removed =
                    conn.execute("DELETE FROM vectors WHERE collection = ?1", params![collection])?;
                Ok(removed)
            })
            .await
            .map_err(storage_err)
    }
}

/// Current UTC time as a fixed-format ISO 8601 string.
fn now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
