// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Google Gemini API.
//!
//! Provides [`GeminiClient`] which handles request construction,
//! authentication, and transient error retry for generation. Embedding
//! calls never surface errors: a failed embed degrades to an empty vector.

use std::time::Duration;

use mentora_core::MentoraError;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::types::{
    ApiErrorResponse, EmbedContentRequest, EmbedContentResponse, GenerateContentRequest,
    GenerateContentResponse,
};

/// Base URL for the Gemini API.
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// HTTP client for Gemini API communication.
///
/// Manages authentication headers, connection pooling, and retry logic for
/// transient overload errors (429, 503, or "overloaded" in the error body).
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl GeminiClient {
    /// Creates a new Gemini API client.
    pub fn new(api_key: &str) -> Result<Self, MentoraError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key).map_err(|e| {
                MentoraError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| MentoraError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            max_retries: 2,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Sends a generation request and returns the full response.
    ///
    /// On transient overload (429, 503, or an error body mentioning
    /// "overloaded"), retries with growing waits (2s, then 4s) before
    /// giving up.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, MentoraError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let wait = Duration::from_secs(2 * attempt as u64);
                warn!(attempt, ?wait, "retrying generation after transient error");
                tokio::time::sleep(wait).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| MentoraError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "generation response received");

            if status.is_success() {
                return response.json::<GenerateContentResponse>().await.map_err(|e| {
                    MentoraError::Provider {
                        message: format!("failed to decode generation response: {e}"),
                        source: Some(Box::new(e)),
                    }
                });
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status, &body) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "model overloaded, will retry");
                last_error = Some(MentoraError::Provider {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "Gemini API error ({}): {}",
                    api_err.error.status, api_err.error.message
                )
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(MentoraError::Provider {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| MentoraError::Provider {
            message: "generation request failed after retries".into(),
            source: None,
        }))
    }

    /// Embed one text, degrading every failure to an empty vector.
    ///
    /// Blank input short-circuits without an HTTP call. Transport errors,
    /// non-success statuses, and undecodable bodies all yield an empty
    /// vector with a logged warning -- this call never raises.
    pub async fn embed_content(&self, model: &str, text: &str) -> Vec<f32> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let url = format!("{}/models/{}:embedContent", self.base_url, model);
        let request = EmbedContentRequest::from_text(text);

        let response = match self.client.post(&url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "embedding request failed");
                return Vec::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "embedding request rejected");
            return Vec::new();
        }

        match response.json::<EmbedContentResponse>().await {
            Ok(decoded) => decoded.embedding.values,
            Err(e) => {
                warn!(error = %e, "failed to decode embedding response");
                Vec::new()
            }
        }
    }
}

/// Whether a failed generation response is worth retrying.
fn is_transient_error(status: StatusCode, body: &str) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::SERVICE_UNAVAILABLE
        || body.to_lowercase().contains("overloaded")
}
