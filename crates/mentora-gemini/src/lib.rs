// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini adapters for the Mentora coach backend.
//!
//! Provides the [`GeminiClient`] HTTP wrapper plus the [`GeminiProvider`]
//! (text generation with transient-overload retry) and [`GeminiEmbedder`]
//! (text embedding, degrading failure to empty vectors) adapter
//! implementations.

pub mod adapter;
pub mod client;
pub mod types;

pub use adapter::{GeminiEmbedder, GeminiProvider};
pub use client::GeminiClient;
