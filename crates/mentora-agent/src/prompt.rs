// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt composition for coaching replies.
//!
//! A pure function with no side effects: long-term memory chunks and recent
//! conversation turns go in, one prompt string comes out.

use mentora_core::types::{ConversationTurn, Role};
use mentora_memory::types::RankedChunk;

/// How many ranked chunks are considered before filtering.
const CHUNK_CANDIDATES: usize = 8;

/// How many filtered chunks make it into the prompt.
const MAX_CONTEXT_CHUNKS: usize = 4;

/// Chunks shorter than this carry no useful context.
const MIN_CHUNK_CHARS: usize = 10;

/// Chunks are truncated to this many characters.
const CHUNK_TRUNCATE_CHARS: usize = 450;

/// Turns shorter than this are noise ("ok", "ya").
const MIN_TURN_CHARS: usize = 6;

/// Leaked identity fragments that make for confusing context lines.
const IDENTITY_PREFIXES: [&str; 2] = ["is named", "named "];

/// Builds the coaching prompt from ranked context and recent conversation.
pub struct PromptComposer;

impl PromptComposer {
    /// Compose the full prompt for one turn.
    ///
    /// Takes up to [`MAX_CONTEXT_CHUNKS`] usable chunks from the first
    /// [`CHUNK_CANDIDATES`] ranked results, the recent turns (with the
    /// just-recorded copy of the current user message dropped from the
    /// tail), and the raw user message.
    pub fn build(
        user_query: &str,
        context_chunks: &[RankedChunk],
        recent_turns: &[ConversationTurn],
    ) -> String {
        let mut filtered: Vec<String> = Vec::new();
        for chunk in context_chunks.iter().take(CHUNK_CANDIDATES) {
            let text = chunk.text.trim();
            if text.chars().count() < MIN_CHUNK_CHARS {
                continue;
            }
            let lower = text.to_lowercase();
            if IDENTITY_PREFIXES.iter().any(|p| lower.starts_with(p)) {
                continue;
            }
            let snippet = truncate_chars(text, CHUNK_TRUNCATE_CHARS);
            filtered.push(format!("[{}] {snippet}", chunk.source.to_uppercase()));
        }
        filtered.truncate(MAX_CONTEXT_CHUNKS);

        let context_text = if filtered.is_empty() {
            "No long-term memories available.".to_string()
        } else {
            filtered.join("\n")
        };

        let mut turns = recent_turns;
        if let Some(last) = turns.last() {
            // The current user message was already appended to the session;
            // drop that copy so it appears only once, as the new message.
            if last.role == Role::User && last.text.trim() == user_query.trim() {
                turns = &turns[..turns.len() - 1];
            }
        }

        let mut recent_lines: Vec<String> = Vec::new();
        for turn in turns {
            let text = turn.text.trim();
            if text.chars().count() < MIN_TURN_CHARS {
                continue;
            }
            let prefix = match turn.role {
                Role::User => "User:",
                Role::Assistant => "Assistant:",
            };
            recent_lines.push(format!("{prefix} {text}"));
        }

        let recent_text = if recent_lines.is_empty() {
            "No recent conversation.".to_string()
        } else {
            recent_lines.join("\n")
        };

        format!(
            "You are a friendly personal coach. Help the user with planning, learning, \
             productivity, and career growth through practical next steps.\n\
             Use the long-term memories and recent conversation below to personalize \
             answers, but do not invent facts.\n\
             \n\
             Long-term memory:\n\
             {context_text}\n\
             \n\
             Recent conversation:\n\
             {recent_text}\n\
             \n\
             User's new message:\n\
             {user_query}\n\
             \n\
             Rules:\n\
             - Reply in 4-7 short lines.\n\
             - Keep the tone supportive and practical.\n\
             - Give 1-3 actionable steps and one short follow-up question if it helps clarity.\n\
             \n\
             Now respond as the user's personal coach."
        )
    }
}

/// Truncate to a character count, appending an ellipsis when cut.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
    }
}
