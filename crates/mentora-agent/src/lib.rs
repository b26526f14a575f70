// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coach pipeline for the Mentora backend.
//!
//! Orchestrates one conversation turn: record the user message, retrieve
//! ranked context and recent history, compose the prompt, generate a reply,
//! record it, and conditionally commit extracted facts to long-term memory.

pub mod extractor;
pub mod pipeline;
pub mod prompt;

pub use extractor::FactExtractor;
pub use pipeline::{CoachPipeline, TurnPhase};
pub use prompt::PromptComposer;
