// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini generateContent/embedContent API request and response types.

use serde::{Deserialize, Serialize};

// --- Request types ---

/// A request to the Gemini generateContent endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents. Single-turn requests carry one entry.
    pub contents: Vec<Content>,

    /// Sampling and length parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Build a single-turn request from a composed prompt.
    pub fn from_prompt(prompt: &str, temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
                role: None,
            }],
            generation_config: Some(GenerationConfig {
                temperature,
                max_output_tokens,
            }),
        }
    }
}

/// A content block: an ordered list of parts with an optional role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Ordered message parts.
    #[serde(default)]
    pub parts: Vec<Part>,

    /// "user" or "model". Omitted on single-turn requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A single part of a content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Plain text payload. Other part kinds (inline data) are not used here.
    #[serde(default)]
    pub text: Option<String>,
}

/// Sampling parameters for generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_output_tokens: u32,
}

/// A request to the Gemini embedContent endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContentRequest {
    /// Text to embed, wrapped in a content block.
    pub content: Content,

    /// Optimization hint, e.g. "RETRIEVAL_DOCUMENT".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
}

impl EmbedContentRequest {
    /// Build an embedding request for one text.
    pub fn from_text(text: &str) -> Self {
        Self {
            content: Content {
                parts: vec![Part {
                    text: Some(text.to_string()),
                }],
                role: None,
            },
            task_type: Some("RETRIEVAL_DOCUMENT".to_string()),
        }
    }
}

// --- Response types ---

/// A response from the generateContent endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    /// Generated candidates; blocked requests may return none.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Extract plain text from the first candidate.
    ///
    /// Returns an empty string for missing candidates, blocked content, or
    /// partless responses -- never panics on a sparse payload.
    pub fn text(&self) -> String {
        let Some(candidate) = self.candidates.first() else {
            return String::new();
        };
        let Some(content) = &candidate.content else {
            return String::new();
        };
        content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<String>()
            .trim()
            .to_string()
    }
}

/// A single generation candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content; absent when the candidate was blocked.
    #[serde(default)]
    pub content: Option<Content>,

    /// Why generation stopped (e.g. "STOP", "SAFETY").
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// A response from the embedContent endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedContentResponse {
    /// The embedding vector for the request content.
    pub embedding: ContentEmbedding,
}

/// Embedding values payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEmbedding {
    #[serde(default)]
    pub values: Vec<f32>,
}

// --- Error types ---

/// Error payload returned by the Gemini API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

/// Error details within an API error payload.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_camel_case_config() {
        let request = GenerateContentRequest::from_prompt("hello", 0.6, 1024);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"maxOutputTokens\":1024"));
        assert!(json.contains("\"temperature\":0.6"));
        // Role is omitted on single-turn requests.
        assert!(!json.contains("\"role\""));
    }

    #[test]
    fn response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [{"text": "Hello "}, {"text": "world"}],
                        "role": "model"
                    },
                    "finishReason": "STOP"
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(response.text(), "Hello world");
    }

    #[test]
    fn response_text_empty_on_no_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), "");
    }

    #[test]
    fn response_text_empty_on_blocked_candidate() {
        // Safety-blocked candidates come back with no content.
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"finishReason": "SAFETY"}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), "");
    }

    #[test]
    fn embed_request_wraps_text() {
        let request = EmbedContentRequest::from_text("embed me");
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"embed me\""));
        assert!(json.contains("\"taskType\":\"RETRIEVAL_DOCUMENT\""));
    }

    #[test]
    fn embed_response_parses_values() {
        let response: EmbedContentResponse = serde_json::from_str(
            r#"{"embedding": {"values": [0.1, 0.2, 0.3]}}"#,
        )
        .unwrap();
        assert_eq!(response.embedding.values, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn api_error_parses() {
        let response: ApiErrorResponse = serde_json::from_str(
            r#"{"error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}}"#,
        )
        .unwrap();
        assert_eq!(response.error.code, 503);
        assert_eq!(response.error.status, "UNAVAILABLE");
    }
}
