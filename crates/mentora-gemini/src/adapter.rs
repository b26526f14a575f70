// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait implementations over [`GeminiClient`].
//!
//! `GeminiProvider` and `GeminiEmbedder` share one configured client so the
//! process keeps a single connection pool for all Gemini traffic.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use mentora_core::error::MentoraError;
use mentora_core::traits::adapter::PluginAdapter;
use mentora_core::traits::embedding::EmbeddingAdapter;
use mentora_core::traits::provider::ProviderAdapter;
use mentora_core::types::{
    AdapterType, EmbeddingInput, EmbeddingOutput, GenerationRequest, GenerationResponse,
    HealthStatus,
};

use crate::client::GeminiClient;
use crate::types::GenerateContentRequest;

/// Sampling temperature for coaching replies.
const TEMPERATURE: f32 = 0.6;

/// Text generation via the Gemini generateContent endpoint.
pub struct GeminiProvider {
    client: Arc<GeminiClient>,
    model: String,
}

impl GeminiProvider {
    /// Creates a provider over a shared client.
    pub fn new(client: Arc<GeminiClient>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MentoraError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MentoraError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, MentoraError> {
        let api_request =
            GenerateContentRequest::from_prompt(&request.prompt, TEMPERATURE, request.max_tokens);
        let response = self.client.generate_content(&self.model, &api_request).await?;
        Ok(GenerationResponse {
            text: response.text(),
            model: self.model.clone(),
        })
    }
}

/// Embedding generation via the Gemini embedContent endpoint.
pub struct GeminiEmbedder {
    client: Arc<GeminiClient>,
    model: String,
    dimensions: usize,
}

impl GeminiEmbedder {
    /// Creates an embedder over a shared client.
    pub fn new(client: Arc<GeminiClient>, model: String, dimensions: usize) -> Self {
        Self {
            client,
            model,
            dimensions,
        }
    }
}

#[async_trait]
impl PluginAdapter for GeminiEmbedder {
    fn name(&self) -> &str {
        "gemini-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, MentoraError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MentoraError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for GeminiEmbedder {
    /// Embed each input text; per-text failure yields an empty vector.
    ///
    /// A vector of unexpected dimensionality is treated as a failure too --
    /// committing it would poison similarity comparisons downstream.
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MentoraError> {
        let mut embeddings = Vec::with_capacity(input.texts.len());
        for text in &input.texts {
            let values = self.client.embed_content(&self.model, text).await;
            if !values.is_empty() && values.len() != self.dimensions {
                warn!(
                    len = values.len(),
                    expected = self.dimensions,
                    "embedding has unexpected dimension, treating as failed"
                );
                embeddings.push(Vec::new());
            } else {
                embeddings.push(values);
            }
        }
        Ok(EmbeddingOutput {
            embeddings,
            dimensions: self.dimensions,
        })
    }
}
