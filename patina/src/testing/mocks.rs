//! Stub and recording doubles.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::errors::ProviderError;
use crate::inference::{InferenceClient, InferenceRequest};
use crate::search::{SearchHit, SearchTool};

/// One recorded inference invocation.
#[derive(Debug, Clone)]
pub struct RecordedInvocation {
    /// The role label of the invoking stage.
    pub role: String,
    /// The prompt that was sent.
    pub prompt: String,
    /// The instructions that were sent.
    pub instructions: Vec<String>,
    /// Whether an image was attached.
    pub had_image: bool,
    /// Whether a search tool was bound.
    pub had_tool: bool,
}

impl RecordedInvocation {
    fn capture(request: &InferenceRequest, had_tool: bool) -> Self {
        Self {
            role: request.role.clone(),
            prompt: request.prompt.clone(),
            instructions: request.instructions.clone(),
            had_image: request.image.is_some(),
            had_tool,
        }
    }
}

/// A client that answers each role with a scripted string and records
/// every invocation.
#[derive(Debug, Default)]
pub struct ScriptedInferenceClient {
    script: HashMap<String, String>,
    invocations: Mutex<Vec<RecordedInvocation>>,
}

impl ScriptedInferenceClient {
    /// Creates a client with an empty script; unscripted roles get an
    /// empty-string reply.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the reply for a role.
    #[must_use]
    pub fn with_reply(mut self, role: impl Into<String>, reply: impl Into<String>) -> Self {
        self.script.insert(role.into(), reply.into());
        self
    }

    /// All recorded invocations, in call order.
    #[must_use]
    pub fn invocations(&self) -> Vec<RecordedInvocation> {
        self.invocations.lock().clone()
    }

    /// The number of invocations made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.invocations.lock().len()
    }

    /// The recorded invocation for a role, if that role was called.
    #[must_use]
    pub fn invocation_for(&self, role: &str) -> Option<RecordedInvocation> {
        self.invocations
            .lock()
            .iter()
            .find(|i| i.role == role)
            .cloned()
    }
}

#[async_trait]
impl InferenceClient for ScriptedInferenceClient {
    async fn invoke(
        &self,
        request: InferenceRequest,
        tool: Option<&dyn SearchTool>,
    ) -> Result<String, ProviderError> {
        self.invocations
            .lock()
            .push(RecordedInvocation::capture(&request, tool.is_some()));
        Ok(self.script.get(&request.role).cloned().unwrap_or_default())
    }
}

/// A client that echoes its prompt back unchanged.
#[derive(Debug, Default)]
pub struct EchoInferenceClient {
    invocations: Mutex<Vec<RecordedInvocation>>,
}

impl EchoInferenceClient {
    /// Creates an echo client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded invocations, in call order.
    #[must_use]
    pub fn invocations(&self) -> Vec<RecordedInvocation> {
        self.invocations.lock().clone()
    }
}

#[async_trait]
impl InferenceClient for EchoInferenceClient {
    async fn invoke(
        &self,
        request: InferenceRequest,
        tool: Option<&dyn SearchTool>,
    ) -> Result<String, ProviderError> {
        self.invocations
            .lock()
            .push(RecordedInvocation::capture(&request, tool.is_some()));
        Ok(request.prompt)
    }
}

/// A client that fails every invocation, or only the invocation for one
/// role, with a provider error.
#[derive(Debug)]
pub struct FailingInferenceClient {
    fail_role: Option<String>,
    call_count: Mutex<usize>,
}

impl FailingInferenceClient {
    /// Fails every invocation.
    #[must_use]
    pub fn always() -> Self {
        Self {
            fail_role: None,
            call_count: Mutex::new(0),
        }
    }

    /// Fails only the invocation whose role matches; other roles reply
    /// with an empty string.
    #[must_use]
    pub fn for_role(role: impl Into<String>) -> Self {
        Self {
            fail_role: Some(role.into()),
            call_count: Mutex::new(0),
        }
    }

    /// The number of invocations made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock()
    }
}

#[async_trait]
impl InferenceClient for FailingInferenceClient {
    async fn invoke(
        &self,
        request: InferenceRequest,
        _tool: Option<&dyn SearchTool>,
    ) -> Result<String, ProviderError> {
        *self.call_count.lock() += 1;
        let fails = self
            .fail_role
            .as_ref()
            .map_or(true, |role| *role == request.role);
        if fails {
            Err(ProviderError::Status {
                provider: "stub",
                status: 500,
                message: format!("stubbed failure for role '{}'", request.role),
            })
        } else {
            Ok(String::new())
        }
    }
}

/// A client that calls the bound search tool itself, simulating a model
/// that decides to use it.
///
/// With no tool bound it replies with plain text; with a tool bound it
/// searches for its configured query and renders the hits as bullet
/// links, or a fallback line when the search fails (degraded output, not
/// an error).
#[derive(Debug)]
pub struct ToolDrivenInferenceClient {
    query: String,
}

impl ToolDrivenInferenceClient {
    /// Creates a client that searches for the given query when a tool is
    /// bound.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

#[async_trait]
impl InferenceClient for ToolDrivenInferenceClient {
    async fn invoke(
        &self,
        request: InferenceRequest,
        tool: Option<&dyn SearchTool>,
    ) -> Result<String, ProviderError> {
        let Some(tool) = tool else {
            return Ok(format!("no tool bound for role '{}'", request.role));
        };

        match tool.search(&self.query).await {
            Ok(hits) => {
                let links: Vec<String> = hits
                    .iter()
                    .map(|h| format!("- [{}]({})", h.title, h.url))
                    .collect();
                Ok(links.join("\n"))
            }
            Err(_) => Ok("no parts found".to_string()),
        }
    }
}

/// A search tool that returns a fixed hit list and records queries.
#[derive(Debug, Default)]
pub struct StaticSearchTool {
    hits: Vec<SearchHit>,
    queries: Mutex<Vec<String>>,
}

impl StaticSearchTool {
    /// Creates a tool returning the given hits for every query.
    #[must_use]
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// All recorded queries, in call order.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl SearchTool for StaticSearchTool {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError> {
        self.queries.lock().push(query.to_string());
        Ok(self.hits.clone())
    }
}

/// A search tool that fails every query.
#[derive(Debug, Default)]
pub struct FailingSearchTool;

#[async_trait]
impl SearchTool for FailingSearchTool {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, ProviderError> {
        Err(ProviderError::Status {
            provider: "stub",
            status: 503,
            message: "stubbed search outage".to_string(),
        })
    }
}
