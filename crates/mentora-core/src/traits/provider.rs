// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM text generation.

use async_trait::async_trait;

use crate::error::MentoraError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{GenerationRequest, GenerationResponse};

/// Adapter for LLM provider integrations.
///
/// The core treats the generator as opaque: retry policy for transient
/// overload lives inside the adapter, and the pipeline only reacts to
/// success versus terminal failure.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a generation request and returns the full response.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, MentoraError>;
}
