// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Mentora workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Convert to string for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse from a storage string. Unknown values read as `User`.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "assistant" => Role::Assistant,
            _ => Role::User,
        }
    }
}

/// A single turn in a user's short-term conversation log.
///
/// Immutable once written; position in the log carries the timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who spoke.
    pub role: Role,
    /// What was said.
    pub text: String,
}

impl ConversationTurn {
    /// Convenience constructor for a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Convenience constructor for an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Embedding,
}

// --- Provider types ---

/// A request to an LLM provider.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The fully composed prompt.
    pub prompt: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// A response from an LLM provider.
///
/// `text` may be empty (blocked or contentless responses); callers decide
/// how to degrade.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// Extracted plain text of the response.
    pub text: String,
    /// Model that produced the response.
    pub model: String,
}

// --- Embedding types ---

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    /// Texts to embed, one vector produced per entry.
    pub texts: Vec<String>,
}

/// Output from an embedding adapter.
///
/// A failed embedding is reported as an **empty vector** in `embeddings`,
/// never as an error -- callers must treat empty as "do not commit, do not
/// rank".
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    /// One vector per input text; empty vector on per-text failure.
    pub embeddings: Vec<Vec<f32>>,
    /// Expected dimensionality of successful embeddings.
    pub dimensions: usize,
}
