// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding adapter producing deterministic vectors.
//!
//! The same text always embeds to the same L2-normalized vector, so cosine
//! comparisons behave: identical texts score ~1.0 and unrelated texts score
//! low. A failing variant returns empty vectors, matching the degraded
//! output of a real provider outage.

use async_trait::async_trait;

use mentora_core::error::MentoraError;
use mentora_core::traits::adapter::PluginAdapter;
use mentora_core::traits::embedding::EmbeddingAdapter;
use mentora_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};

/// A deterministic, offline embedding adapter for tests.
pub struct MockEmbedder {
    dimensions: usize,
    fail: bool,
}

impl MockEmbedder {
    /// Create a working mock embedder with the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            fail: false,
        }
    }

    /// Create a mock embedder that reports failure (empty vectors) for
    /// every input.
    pub fn failing(dimensions: usize) -> Self {
        Self {
            dimensions,
            fail: true,
        }
    }

    /// The deterministic vector this embedder produces for a text.
    ///
    /// Exposed so tests can seed stores with embeddings that match what a
    /// later `embed` call will produce.
    pub fn embedding_for(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimensions];
        for (i, b) in text.bytes().enumerate() {
            let idx = (i + b as usize) % self.dimensions;
            v[idx] += b as f32 / 255.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in v.iter_mut() {
                *x /= norm;
            }
        }
        v
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
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
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, MentoraError> {
        let embeddings = input
            .texts
            .iter()
            .map(|text| {
                if self.fail || text.trim().is_empty() {
                    Vec::new()
                } else {
                    self.embedding_for(text)
                }
            })
            .collect();
        Ok(EmbeddingOutput {
            embeddings,
            dimensions: self.dimensions,
        })
    }
}
