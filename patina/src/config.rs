//! Configuration for providers and credentials.
//!
//! Credentials are supplied out-of-band by the caller and are read-only for
//! the lifetime of a run. Provider configs carry the knobs a call needs:
//! model name, deadlines, and the tool-round bound for the sourcing stage.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::PreconditionError;

/// API keys for the two hosted providers.
///
/// Keys are stored as plain strings but never rendered by the `Debug`
/// implementation.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// Model-provider API key.
    pub model_api_key: String,
    /// Search-provider API key.
    pub search_api_key: String,
}

impl Credentials {
    /// Creates credentials from the two provider keys.
    #[must_use]
    pub fn new(model_api_key: impl Into<String>, search_api_key: impl Into<String>) -> Self {
        Self {
            model_api_key: model_api_key.into(),
            search_api_key: search_api_key.into(),
        }
    }

    /// Checks that both keys are present.
    ///
    /// Validation order matches the order the keys are requested from the
    /// caller: model key first, then search key.
    pub fn validate(&self) -> Result<(), PreconditionError> {
        if self.model_api_key.trim().is_empty() {
            return Err(PreconditionError::MissingModelCredential);
        }
        if self.search_api_key.trim().is_empty() {
            return Err(PreconditionError::MissingSearchCredential);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("model_api_key", &redact(&self.model_api_key))
            .field("search_api_key", &redact(&self.search_api_key))
            .finish()
    }
}

fn redact(key: &str) -> &'static str {
    if key.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

/// Configuration for the language-model provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-call deadline in seconds.
    #[serde(default = "default_model_timeout")]
    pub timeout_seconds: u64,
    /// Maximum number of tool-call rounds before the client gives up
    /// waiting for a final text answer.
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
    /// API endpoint.
    #[serde(default = "default_model_endpoint")]
    pub endpoint: String,
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_model_timeout() -> u64 {
    120
}

fn default_max_tool_rounds() -> usize {
    4
}

fn default_model_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            timeout_seconds: default_model_timeout(),
            max_tool_rounds: default_max_tool_rounds(),
            endpoint: default_model_endpoint(),
        }
    }
}

impl ModelConfig {
    /// Creates a model configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the per-call deadline.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the maximum tool-call rounds.
    #[must_use]
    pub const fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Gets the deadline as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Configuration for the search provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search engine identifier.
    #[serde(default = "default_engine")]
    pub engine: String,
    /// Maximum number of hits to return per query.
    #[serde(default = "default_max_hits")]
    pub max_hits: usize,
    /// Per-call deadline in seconds.
    #[serde(default = "default_search_timeout")]
    pub timeout_seconds: u64,
    /// API endpoint.
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
}

fn default_engine() -> String {
    "google".to_string()
}

fn default_max_hits() -> usize {
    8
}

fn default_search_timeout() -> u64 {
    30
}

fn default_search_endpoint() -> String {
    "https://serpapi.com/search.json".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            max_hits: default_max_hits(),
            timeout_seconds: default_search_timeout(),
            endpoint: default_search_endpoint(),
        }
    }
}

impl SearchConfig {
    /// Creates a search configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum hits per query.
    #[must_use]
    pub const fn with_max_hits(mut self, max_hits: usize) -> Self {
        self.max_hits = max_hits;
        self
    }

    /// Sets the per-call deadline.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Gets the deadline as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validate_ok() {
        let creds = Credentials::new("sk-model", "serp-key");
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_credentials_missing_model_key_reported_first() {
        let creds = Credentials::new("", "serp-key");
        assert_eq!(
            creds.validate(),
            Err(PreconditionError::MissingModelCredential)
        );

        // Even when both are missing the model key is reported first.
        let creds = Credentials::default();
        assert_eq!(
            creds.validate(),
            Err(PreconditionError::MissingModelCredential)
        );
    }

    #[test]
    fn test_credentials_missing_search_key() {
        let creds = Credentials::new("sk-model", "   ");
        assert_eq!(
            creds.validate(),
            Err(PreconditionError::MissingSearchCredential)
        );
    }

    #[test]
    fn test_credentials_debug_redacts_keys() {
        let creds = Credentials::new("sk-secret", "");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("<empty>"));
    }

    #[test]
    fn test_model_config_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.max_tool_rounds, 4);
    }

    #[test]
    fn test_model_config_builders() {
        let config = ModelConfig::new()
            .with_model("gpt-4o-mini")
            .with_timeout(15)
            .with_max_tool_rounds(2);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout_seconds, 15);
        assert_eq!(config.max_tool_rounds, 2);
    }

    #[test]
    fn test_search_config_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.engine, "google");
        assert_eq!(config.max_hits, 8);
        assert!(config.endpoint.contains("serpapi.com"));
    }
}
