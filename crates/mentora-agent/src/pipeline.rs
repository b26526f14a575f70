// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The coach pipeline: one reply per turn.
//!
//! Each turn walks Received -> MemoryRetrieved -> Generated -> Persisted.
//! Only an empty user message rejects the turn; every downstream failure
//! (store, generator, extraction) degrades to an empty read, a skipped
//! write, or a placeholder reply, so the user always gets a response and
//! the session always records what they saw.

use std::sync::Arc;

use mentora_core::types::GenerationRequest;
use mentora_core::{MentoraError, ProviderAdapter};
use mentora_memory::types::TRIVIAL_STOPLIST;
use mentora_memory::{ContextRanker, LongTermMemory, SessionMemory};
use tracing::{debug, warn};

use crate::extractor::{clean_fact, FactExtractor};
use crate::prompt::PromptComposer;

/// Upper bound on facts extracted per turn.
const MAX_FACTS_PER_TURN: usize = 6;

/// Phases of one turn through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// Message accepted, user turn being recorded.
    Received,
    /// Context and recent history fetched.
    MemoryRetrieved,
    /// A reply exists -- generated or placeholder.
    Generated,
    /// Assistant turn recorded and long-term commit decided.
    Persisted,
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnPhase::Received => write!(f, "received"),
            TurnPhase::MemoryRetrieved => write!(f, "memory_retrieved"),
            TurnPhase::Generated => write!(f, "generated"),
            TurnPhase::Persisted => write!(f, "persisted"),
        }
    }
}

/// Orchestrates short-term memory, context ranking, generation, and
/// long-term commit for each conversation turn.
pub struct CoachPipeline {
    session: Arc<SessionMemory>,
    ranker: Arc<ContextRanker>,
    long_term: Arc<LongTermMemory>,
    provider: Arc<dyn ProviderAdapter>,
    extractor: FactExtractor,
    max_tokens: u32,
}

impl CoachPipeline {
    /// Creates a pipeline over shared components.
    pub fn new(
        session: Arc<SessionMemory>,
        ranker: Arc<ContextRanker>,
        long_term: Arc<LongTermMemory>,
        provider: Arc<dyn ProviderAdapter>,
        max_tokens: u32,
    ) -> Self {
        let extractor = FactExtractor::new(Arc::clone(&provider));
        Self {
            session,
            ranker,
            long_term,
            provider,
            extractor,
            max_tokens,
        }
    }

    /// Handle one user turn and return the reply text.
    ///
    /// The only error this returns is [`MentoraError::EmptyMessage`], raised
    /// before any side effect. Everything after that point completes the
    /// turn, degraded if necessary.
    pub async fn handle_turn(
        &self,
        user_id: &str,
        message: &str,
    ) -> Result<String, MentoraError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(MentoraError::EmptyMessage);
        }
        debug!(user_id, phase = %TurnPhase::Received, "handling turn");

        // Best effort: a session write failure costs history, not the turn.
        if let Err(e) = self.session.add_user(user_id, message).await {
            warn!(user_id, error = %e, "failed to record user turn, continuing without it");
        }

        let chunks = self.ranker.search_relevant_chunks(message, user_id).await;
        let recent = self.session.get_recent(user_id).await;
        debug!(
            user_id,
            phase = %TurnPhase::MemoryRetrieved,
            chunks = chunks.len(),
            turns = recent.len(),
            "context assembled"
        );

        let prompt = PromptComposer::build(message, &chunks, &recent);

        let reply = match self
            .provider
            .generate(GenerationRequest {
                prompt,
                max_tokens: self.max_tokens,
            })
            .await
        {
            Ok(response) if !response.text.trim().is_empty() => response.text,
            Ok(_) => {
                warn!(user_id, "generator returned an empty reply");
                "[LLM ERROR] empty text".to_string()
            }
            Err(e) => {
                warn!(user_id, error = %e, "generation failed, substituting placeholder");
                format!("[LLM ERROR] {e}")
            }
        };
        debug!(user_id, phase = %TurnPhase::Generated, "reply ready");

        // Always recorded, placeholders included: the session must reflect
        // what the user saw.
        if let Err(e) = self.session.add_assistant(user_id, &reply).await {
            warn!(user_id, error = %e, "failed to record assistant turn");
        }

        if should_summarize(message, &reply) {
            self.commit_facts(user_id, message, &reply).await;
        } else {
            debug!(user_id, "turn below summarize threshold, long-term commit skipped");
        }
        debug!(user_id, phase = %TurnPhase::Persisted, "turn complete");

        Ok(format_reply(&reply))
    }

    /// Extract facts from the exchange and upsert each into long-term
    /// memory. Failures are logged; the reply is already decided.
    async fn commit_facts(&self, user_id: &str, message: &str, reply: &str) {
        let combined = format!("User: {message}\nAssistant: {reply}");
        let facts = self
            .extractor
            .summarize_to_facts(&combined, MAX_FACTS_PER_TURN)
            .await;

        for fact in facts {
            let Some(cleaned) = clean_fact(&fact) else {
                continue;
            };
            self.long_term.upsert_summary(user_id, &cleaned).await;
        }
    }
}

/// Whether an exchange is substantive enough to mine for long-term facts.
pub fn should_summarize(user_message: &str, reply: &str) -> bool {
    let trimmed = user_message.trim();
    if trimmed.split_whitespace().count() < 2 {
        return false;
    }
    if trimmed.chars().count() < 8 {
        return false;
    }
    if reply.trim().chars().count() < 20 {
        return false;
    }
    if TRIVIAL_STOPLIST.contains(&trimmed.to_lowercase().as_str()) {
        return false;
    }
    true
}

/// Format the final reply. Total: trimming cannot fail, so the raw text is
/// always returned in some form.
fn format_reply(reply: &str) -> String {
    reply.trim().to_string()
}
