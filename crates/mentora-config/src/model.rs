// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Mentora coach backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Mentora configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MentoraConfig {
    /// Service identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Google Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Short-term session memory settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Long-term memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Service identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the coach service.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "mentora".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Google Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` requires the MENTORA_GEMINI_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model to use for coaching replies and fact extraction.
    #[serde(default = "default_model")]
    pub model: String,

    /// Model to use for embedding generation.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Maximum tokens to generate per coaching reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            embedding_model: default_embedding_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "mentora.db".to_string()
}

/// Short-term session memory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Maximum number of most-recent turns retained per user.
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Sliding expiry window in seconds, reset on every write.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

fn default_max_turns() -> usize {
    6
}

fn default_ttl_seconds() -> u64 {
    3600
}

/// Long-term memory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Maximum number of summary records retained per user.
    /// Approximate under concurrent upserts for the same user.
    #[serde(default = "default_max_summaries")]
    pub max_summaries: usize,

    /// Upper bound on records fetched per enumeration of the user-history
    /// collection. Records beyond this bound may be silently missed.
    #[serde(default = "default_scroll_limit")]
    pub scroll_limit: usize,

    /// Maximum results returned per similarity sub-search.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Fixed dimensionality of stored embedding vectors.
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,

    /// Collection holding per-user long-term memory records.
    #[serde(default = "default_user_collection")]
    pub user_collection: String,

    /// Collection holding shared predefined knowledge.
    #[serde(default = "default_predefined_collection")]
    pub predefined_collection: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_summaries: default_max_summaries(),
            scroll_limit: default_scroll_limit(),
            search_limit: default_search_limit(),
            embedding_dimensions: default_embedding_dimensions(),
            user_collection: default_user_collection(),
            predefined_collection: default_predefined_collection(),
        }
    }
}

fn default_max_summaries() -> usize {
    6
}

fn default_scroll_limit() -> usize {
    500
}

fn default_search_limit() -> usize {
    5
}

fn default_embedding_dimensions() -> usize {
    768
}

fn default_user_collection() -> String {
    "user_history".to_string()
}

fn default_predefined_collection() -> String {
    "predefined_context".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3900
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = MentoraConfig::default();
        assert_eq!(config.agent.name, "mentora");
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.embedding_model, "text-embedding-004");
        assert_eq!(config.session.max_turns, 6);
        assert_eq!(config.session.ttl_seconds, 3600);
        assert_eq!(config.memory.max_summaries, 6);
        assert_eq!(config.memory.scroll_limit, 500);
        assert_eq!(config.memory.embedding_dimensions, 768);
        assert_eq!(config.memory.user_collection, "user_history");
        assert_eq!(config.memory.predefined_collection, "predefined_context");
        assert_eq!(config.gateway.port, 3900);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = MentoraConfig::default();
        let serialized = toml::to_string(&config).expect("should serialize");
        let parsed: MentoraConfig = toml::from_str(&serialized).expect("should deserialize");
        assert_eq!(parsed.session.max_turns, config.session.max_turns);
        assert_eq!(parsed.memory.user_collection, config.memory.user_collection);
    }
}
