//! SerpAPI-backed implementation of the search tool.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{SearchHit, SearchTool};
use crate::config::SearchConfig;
use crate::errors::ProviderError;

const PROVIDER: &str = "serpapi";

/// Search tool backed by SerpAPI's Google engine.
pub struct SerpApiTool {
    http: reqwest::Client,
    api_key: String,
    config: SearchConfig,
}

impl SerpApiTool {
    /// Creates a tool with the given API key and configuration.
    #[must_use]
    pub fn new(api_key: impl Into<String>, config: SearchConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            config,
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    snippet: Option<String>,
}

#[async_trait]
impl SearchTool for SerpApiTool {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError> {
        debug!(provider = PROVIDER, query, "running search");

        let request = self
            .http
            .get(&self.config.endpoint)
            .query(&[
                ("engine", self.config.engine.as_str()),
                ("q", query),
                ("api_key", self.api_key.as_str()),
            ])
            .timeout(self.config.timeout());

        let response = request.send().await.map_err(|source| {
            if source.is_timeout() {
                ProviderError::Timeout {
                    provider: PROVIDER,
                    seconds: self.config.timeout_seconds,
                }
            } else {
                ProviderError::Transport {
                    provider: PROVIDER,
                    source,
                }
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::Auth {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let message = truncate(&response.text().await.unwrap_or_default(), 512);
            warn!(provider = PROVIDER, status = status.as_u16(), "search failed");
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                message,
            });
        }

        let body: SerpApiResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::MalformedResponse {
                    provider: PROVIDER,
                    detail: e.to_string(),
                })?;

        let hits: Vec<SearchHit> = body
            .organic_results
            .into_iter()
            .filter(|r| !r.link.is_empty())
            .take(self.config.max_hits)
            .map(|r| SearchHit {
                title: r.title,
                url: r.link,
                snippet: r.snippet,
            })
            .collect();

        debug!(provider = PROVIDER, hits = hits.len(), "search complete");
        Ok(hits)
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}

impl std::fmt::Debug for SerpApiTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiTool")
            .field("engine", &self.config.engine)
            .field("max_hits", &self.config.max_hits)
            .finish()
    }
}
