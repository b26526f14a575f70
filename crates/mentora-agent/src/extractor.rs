// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM-based fact extraction from conversations.
//!
//! Asks the provider for a strict JSON array of short user facts, tolerating
//! the free-text output models actually produce: markdown code fences,
//! surrounding prose, or plain bullet lists. Parse failures degrade to an
//! empty fact list -- extraction never blocks the response already computed.

use std::sync::Arc;

use mentora_core::types::GenerationRequest;
use mentora_core::ProviderAdapter;
use tracing::{debug, warn};

/// Prompt for fact extraction.
const FACTS_PROMPT: &str = r#"Extract only user facts from the text below.
Return STRICT JSON: ["fact1", "fact2", ...]

Rules:
- Max {max_facts} items
- Remove opinions and assistant information
- Facts must be short phrases
- If none exist, return []

Text:
"""{text}""""#;

/// Token cap for extraction calls -- facts are short.
const EXTRACTION_MAX_TOKENS: u32 = 512;

/// Facts shorter than this are noise after cleanup.
const MIN_FACT_CHARS: usize = 8;

/// Identity fragments that should never become standalone facts.
const IDENTITY_PREFIXES: [&str; 2] = ["is named", "named "];

/// Extracts short fact strings from conversation text via the provider.
pub struct FactExtractor {
    provider: Arc<dyn ProviderAdapter>,
}

impl FactExtractor {
    /// Creates an extractor over a shared provider.
    pub fn new(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self { provider }
    }

    /// Extract up to `max_facts` short fact strings from `text`.
    ///
    /// Provider failure, empty output, and unparseable output all degrade
    /// to an empty list.
    pub async fn summarize_to_facts(&self, text: &str, max_facts: usize) -> Vec<String> {
        if text.trim().chars().count() < 10 {
            return Vec::new();
        }

        let prompt = FACTS_PROMPT
            .replace("{max_facts}", &max_facts.to_string())
            .replace("{text}", text);

        let response = match self
            .provider
            .generate(GenerationRequest {
                prompt,
                max_tokens: EXTRACTION_MAX_TOKENS,
            })
            .await
        {
            Ok(response) => response.text,
            Err(e) => {
                warn!(error = %e, "fact extraction call failed");
                return Vec::new();
            }
        };

        if response.trim().is_empty() {
            return Vec::new();
        }

        parse_facts(&response, max_facts)
    }
}

/// Parse the extraction response into fact strings.
///
/// Tries the bracketed slice of the response as a JSON array first (which
/// also handles markdown code fences and surrounding prose), then falls
/// back to splitting lines and stripping bullet markers.
pub fn parse_facts(response: &str, max_facts: usize) -> Vec<String> {
    let trimmed = response.trim();

    if let (Some(start), Some(end)) = (trimmed.find('['), trimmed.rfind(']')) {
        if start < end {
            if let Ok(values) =
                serde_json::from_str::<Vec<serde_json::Value>>(&trimmed[start..=end])
            {
                return values
                    .into_iter()
                    .filter_map(|value| value.as_str().map(|s| s.trim().to_string()))
                    .filter(|fact| !fact.is_empty())
                    .take(max_facts)
                    .collect();
            }
            debug!("extraction output was not a JSON array, falling back to line split");
        }
    }

    let mut facts = Vec::new();
    for line in trimmed.lines() {
        let line = line.trim().trim_start_matches(['-', '•', '*', ' ']).trim();
        if !line.is_empty() {
            facts.push(line.to_string());
        }
        if facts.len() >= max_facts {
            break;
        }
    }
    facts
}

/// Clean one extracted fact for storage.
///
/// Strips surrounding quotes and trailing commas, then discards facts that
/// are too short or start with an identity fragment. Returns `None` when
/// the fact should be dropped.
pub fn clean_fact(fact: &str) -> Option<String> {
    let cleaned = fact
        .trim()
        .trim_matches('"')
        .trim_end_matches(',')
        .trim();

    if cleaned.chars().count() < MIN_FACT_CHARS {
        return None;
    }
    let lower = cleaned.to_lowercase();
    if IDENTITY_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return None;
    }
    Some(cleaned.to_string())
}
