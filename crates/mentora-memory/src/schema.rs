// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite schema for the memory subsystem.
//!
//! Applied once at startup against the single shared connection. All writes
//! are serialized through tokio-rusqlite's background thread.

use mentora_core::MentoraError;
use tokio_rusqlite::Connection;

/// Statements creating the vector and session tables.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS vectors (
    id TEXT PRIMARY KEY NOT NULL,
    collection TEXT NOT NULL,
    owner TEXT,
    kind TEXT,
    text TEXT NOT NULL,
    embedding BLOB NOT NULL,
    metadata TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_vectors_collection ON vectors(collection);

CREATE TABLE IF NOT EXISTS session_turns (
    user_id TEXT NOT NULL,
    role TEXT NOT NULL,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_session_turns_user ON session_turns(user_id);

CREATE TABLE IF NOT EXISTS session_expiry (
    user_id TEXT PRIMARY KEY NOT NULL,
    expires_at TEXT NOT NULL
);
";

/// Apply the memory schema to a connection.
///
/// Idempotent; safe to run on every startup.
pub async fn apply_schema(conn: &Connection) -> Result<(), MentoraError> {
    conn.call(|conn| {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute_batch(SCHEMA)?;
        Ok::<(), rusqlite::Error>(())
    })
    .await
    .map_err(|e| MentoraError::Storage {
        source: Box::new(e),
    })
}
