// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Mentora coach backend.

use thiserror::Error;

/// The primary error type used across all Mentora adapter traits and core operations.
///
/// Only [`MentoraError::EmptyMessage`] is ever surfaced to the end user as a
/// rejected request. Every other variant is absorbed at the component boundary
/// that produced it and degraded to an empty or placeholder result, with the
/// cause logged.
#[derive(Debug, Error)]
pub enum MentoraError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// LLM provider errors (API failure, exhausted retries, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Embedding generation errors (API failure, dimension mismatch).
    #[error("embedding error: {message}")]
    Embedding { message: String },

    /// The user message was empty after trimming. Terminal, no side effects.
    #[error("message cannot be empty")]
    EmptyMessage,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
