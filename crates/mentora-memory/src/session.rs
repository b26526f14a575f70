// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Short-term conversation memory: a per-user capped turn log with a
//! sliding expiry window.
//!
//! Each write appends a turn, trims the log to the newest `max_turns`
//! entries, and refreshes the expiry in one store round-trip. Reads return
//! turns oldest-first and treat an expired or unreachable session as empty
//! rather than failing.

use chrono::{Duration, Utc};
use mentora_core::types::{ConversationTurn, Role};
use mentora_core::MentoraError;
use rusqlite::params;
use tokio_rusqlite::Connection;
use tracing::warn;

/// Helper to convert tokio_rusqlite errors into MentoraError::Storage.
fn storage_err(e: tokio_rusqlite::Error) -> MentoraError {
    MentoraError::Storage {
        source: Box::new(e),
    }
}

/// Per-user short-term memory over the shared SQLite connection.
pub struct SessionMemory {
    conn: Connection,
    max_turns: usize,
    ttl_seconds: u64,
}

impl SessionMemory {
    /// Creates a new session memory wrapping an existing connection.
    ///
    /// The connection should already have the memory schema applied.
    pub fn new(conn: Connection, max_turns: usize, ttl_seconds: u64) -> Self {
        Self {
            conn,
            max_turns,
            ttl_seconds,
        }
    }

    /// Append a user turn to the user's session log.
    pub async fn add_user(&self, user_id: &str, text: &str) -> Result<(), MentoraError> {
        self.push(user_id, Role::User, text).await
    }

    /// Append an assistant turn to the user's session log.
    pub async fn add_assistant(&self, user_id: &str, text: &str) -> Result<(), MentoraError> {
        self.push(user_id, Role::Assistant, text).await
    }

    /// Append a turn, trim to capacity, and refresh the sliding expiry.
    ///
    /// All three steps run inside one store round-trip. A concurrent reader
    /// may observe the log between steps; that transient state is benign.
    async fn push(&self, user_id: &str, role: Role, text: &str) -> Result<(), MentoraError> {
        let user_id = user_id.to_string();
        let role = role.as_str().to_string();
        let text = text.to_string();
        let max_turns = self.max_turns;
        let expires_at = iso_after(Duration::seconds(self.ttl_seconds as i64));
        let created_at = now_iso();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO session_turns (user_id, role, text, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![user_id, role, text, created_at],
                )?;
                conn.execute(
                    "DELETE FROM session_turns WHERE user_id = ?1 AND rowid NOT IN (
                         SELECT rowid FROM session_turns WHERE user_id = ?1
                         ORDER BY rowid DESC LIMIT ?2
                     )",
                    params![user_id, max_turns as i64],
                )?;
                conn.execute(
                    "INSERT INTO session_expiry (user_id, expires_at) VALUES (?1, ?2)
                     ON CONFLICT(user_id) DO UPDATE SET expires_at = excluded.expires_at",
                    params![user_id, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }

    /// The user's retained turns, oldest first.
    ///
    /// Returns an empty Vec -- never an error -- when the session does not
    /// exist, has expired, or the store is unreachable. Expired sessions are
    /// purged lazily here.
    pub async fn get_recent(&self, user_id: &str) -> Vec<ConversationTurn> {
        let user_id_owned = user_id.to_string();
        let now = now_iso();

        let result = self
            .conn
            .call(move |conn| {
                let expires_at: Option<String> = conn
                    .query_row(
                        "SELECT expires_at FROM session_expiry WHERE user_id = ?1",
                        params![user_id_owned],
                        |row| row.get(0),
                    )
                    .map(Some)
                    .or_else(|e| match e {
                        rusqlite::Error::QueryReturnedNoRows => Ok(None),
                        other => Err(other),
                    })?;

                match expires_at {
                    None => Ok::<Vec<ConversationTurn>, rusqlite::Error>(Vec::new()),
                    // Fixed-format UTC timestamps compare lexicographically.
                    Some(expires_at) if expires_at <= now => {
                        conn.execute(
                            "DELETE FROM session_turns WHERE user_id = ?1",
                            params![user_id_owned],
                        )?;
                        conn.execute(
                            "DELETE FROM session_expiry WHERE user_id = ?1",
                            params![user_id_owned],
                        )?;
                        Ok(Vec::new())
                    }
                    Some(_) => {
                        let mut stmt = conn.prepare(
                            "SELECT role, text FROM session_turns
                             WHERE user_id = ?1 ORDER BY rowid ASC",
                        )?;
                        let rows = stmt.query_map(params![user_id_owned], |row| {
                            let role: String = row.get(0)?;
                            let text: String = row.get(1)?;
                            Ok(ConversationTurn {
                                role: Role::from_str_value(&role),
                                text,
                            })
                        })?;
                        let mut turns = Vec::new();
                        for row in rows {
                            turns.push(row?);
                        }
                        Ok(turns)
                    }
                }
            })
            .await;

        match result {
            Ok(turns) => turns,
            Err(e) => {
                warn!(user_id, error = %e, "session read failed, returning empty history");
                Vec::new()
            }
        }
    }

    /// Remove the user's entire session log. Idempotent.
    pub async fn clear(&self, user_id: &str) -> Result<(), MentoraError> {
        let user_id = user_id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "DELETE FROM session_turns WHERE user_id = ?1",
                    params![user_id],
                )?;
                conn.execute(
                    "DELETE FROM session_expiry WHERE user_id = ?1",
                    params![user_id],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }
}

/// Current UTC time as a fixed-format ISO 8601 string.
fn now_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// UTC time `delta` from now, same fixed format.
fn iso_after(delta: Duration) -> String {
    (Utc::now() + delta)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}
