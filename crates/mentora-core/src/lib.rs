// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mentora coach backend.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Mentora workspace. The provider and
//! embedding adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MentoraError;
pub use types::{ConversationTurn, Role};

// Re-export adapter traits at crate root.
pub use traits::{EmbeddingAdapter, PluginAdapter, ProviderAdapter};
