//! Web search used by the sourcing stage to find real restoration parts.
//!
//! The orchestrator binds the tool to the sourcing stage, but the model -
//! not the orchestrator - decides whether to call it, what to query, and
//! how many hits to use.

mod serpapi;

pub use serpapi::SerpApiTool;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;

/// The tool name the model is instructed to call.
pub const SEARCH_TOOL_NAME: &str = "search_google";

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title.
    pub title: String,
    /// Result URL.
    pub url: String,
    /// Snippet of the result body, if the provider returned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl SearchHit {
    /// Creates a hit with no snippet.
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: None,
        }
    }

    /// Sets the snippet.
    #[must_use]
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

/// A hosted search service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchTool: Send + Sync {
    /// Runs one query and returns ranked hits.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError>;
}

/// The JSON-schema function definition handed to the model for the
/// search tool.
#[must_use]
pub fn search_tool_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": SEARCH_TOOL_NAME,
            "description": "Search the web for restoration parts and accessories. \
                Returns ranked results with title, url, and snippet.",
            "parameters": {
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                },
                "required": ["query"]
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_search_hit_builder() {
        let hit = SearchHit::new("Chrome bumper", "https://example.com/bumper")
            .with_snippet("OEM-style front bumper");
        assert_eq!(hit.title, "Chrome bumper");
        assert_eq!(hit.snippet.as_deref(), Some("OEM-style front bumper"));
    }

    #[test]
    fn test_search_hit_serializes_without_empty_snippet() {
        let hit = SearchHit::new("t", "u");
        let json = serde_json::to_value(&hit).unwrap();
        assert!(json.get("snippet").is_none());
    }

    #[test]
    fn test_mock_search_tool() {
        let mut tool = MockSearchTool::new();
        tool.expect_search()
            .returning(|_| Ok(vec![SearchHit::new("t", "u")]));

        let hits = tokio_test::block_on(tool.search("any query")).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_schema_names_the_tool() {
        let schema = search_tool_schema();
        assert_eq!(schema["function"]["name"], SEARCH_TOOL_NAME);
        assert_eq!(
            schema["function"]["parameters"]["required"],
            serde_json::json!(["query"])
        );
    }
}
