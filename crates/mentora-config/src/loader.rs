// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./mentora.toml` > `~/.config/mentora/mentora.toml` > `/etc/mentora/mentora.toml`
//! with environment variable overrides via `MENTORA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MentoraConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/mentora/mentora.toml` (system-wide)
/// 3. `~/.config/mentora/mentora.toml` (user XDG config)
/// 4. `./mentora.toml` (local directory)
/// 5. `MENTORA_*` environment variables
pub fn load_config() -> Result<MentoraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MentoraConfig::default()))
        .merge(Toml::file("/etc/mentora/mentora.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("mentora/mentora.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("mentora.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<MentoraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MentoraConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MentoraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MentoraConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `MENTORA_GEMINI_API_KEY` must
/// map to `gemini.api_key`, not `gemini.api.key`.
fn env_provider() -> Env {
    Env::prefixed("MENTORA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: MENTORA_GEMINI_API_KEY -> "gemini_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("session_", "session.", 1)
            .replacen("memory_", "memory.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").expect("defaults should load");
        assert_eq!(config.agent.name, "mentora");
        assert_eq!(config.session.max_turns, 6);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [session]
            max_turns = 12
            ttl_seconds = 60

            [memory]
            max_summaries = 3
            "#,
        )
        .expect("valid toml should load");
        assert_eq!(config.session.max_turns, 12);
        assert_eq!(config.session.ttl_seconds, 60);
        assert_eq!(config.memory.max_summaries, 3);
        // Untouched sections keep defaults.
        assert_eq!(config.memory.scroll_limit, 500);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = load_config_from_str(
            r#"
            [session]
            max_turnz = 12
            "#,
        );
        assert!(result.is_err(), "unknown key should be rejected");
    }

    #[test]
    fn env_override_maps_section_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("MENTORA_GEMINI_API_KEY", "test-key");
            jail.set_env("MENTORA_SESSION_MAX_TURNS", "9");
            let config = load_config().expect("config should load");
            assert_eq!(config.gemini.api_key.as_deref(), Some("test-key"));
            assert_eq!(config.session.max_turns, 9);
            Ok(())
        });
    }
}
