//! OpenAI chat-completions implementation of the inference client.
//!
//! Supports image attachments (as base64 data URLs) and the tool-calling
//! loop the sourcing stage relies on: when the model requests a search,
//! the bound tool is executed and its hits are fed back as a tool message,
//! bounded by a configurable round limit.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{InferenceClient, InferenceRequest};
use crate::config::ModelConfig;
use crate::errors::ProviderError;
use crate::request::CarImage;
use crate::search::{search_tool_schema, SearchTool, SEARCH_TOOL_NAME};

const PROVIDER: &str = "openai";

/// Inference client backed by the OpenAI chat-completions API.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    config: ModelConfig,
}

impl OpenAiClient {
    /// Creates a client with the given API key and configuration.
    #[must_use]
    pub fn new(api_key: impl Into<String>, config: ModelConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            config,
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ModelConfig {
        &self.config
    }

    async fn post_chat(&self, body: &ChatRequest) -> Result<ResponseMessage, ProviderError> {
        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .timeout(self.config.timeout())
            .send()
            .await
            .map_err(|source| {
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
            let message = response.text().await.unwrap_or_default();
            warn!(provider = PROVIDER, status = status.as_u16(), "chat call failed");
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                message: message.chars().take(512).collect(),
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::MalformedResponse {
                    provider: PROVIDER,
                    detail: e.to_string(),
                })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(ProviderError::MalformedResponse {
                provider: PROVIDER,
                detail: "response carried no choices".to_string(),
            })
    }
}

#[async_trait]
impl InferenceClient for OpenAiClient {
    async fn invoke(
        &self,
        request: InferenceRequest,
        tool: Option<&dyn SearchTool>,
    ) -> Result<String, ProviderError> {
        debug!(
            provider = PROVIDER,
            role = %request.role,
            has_image = request.image.is_some(),
            has_tool = tool.is_some(),
            "invoking model"
        );

        let mut messages = vec![
            Message::system(request.system_text()),
            Message::user(&request.prompt, request.image.as_ref()),
        ];
        let tools = tool.map(|_| vec![search_tool_schema()]);

        let mut last_text: Option<String> = None;
        for round in 0..=self.config.max_tool_rounds {
            let body = ChatRequest {
                model: self.config.model.clone(),
                messages: messages.clone(),
                tools: tools.clone(),
            };
            let reply = self.post_chat(&body).await?;

            if reply.tool_calls.is_empty() {
                return reply.content.filter(|c| !c.is_empty()).ok_or(
                    ProviderError::MalformedResponse {
                        provider: PROVIDER,
                        detail: "model returned neither text nor tool calls".to_string(),
                    },
                );
            }

            let Some(tool) = tool else {
                // Tool calls without a bound tool: nothing to execute.
                return Err(ProviderError::MalformedResponse {
                    provider: PROVIDER,
                    detail: "model requested a tool but none was bound".to_string(),
                });
            };

            last_text = reply.content.clone().filter(|c| !c.is_empty());
            let calls = reply.tool_calls.clone();
            messages.push(Message::assistant_tool_calls(reply));

            for call in calls {
                debug!(provider = PROVIDER, round, tool = %call.function.name, "executing tool call");
                let content = execute_tool_call(tool, &call).await;
                messages.push(Message::tool(call.id, content));
            }
        }

        // Round limit hit while the model kept asking for tools. Fall back
        // to the last text it produced alongside a tool request, if any.
        last_text.ok_or(ProviderError::MalformedResponse {
            provider: PROVIDER,
            detail: format!(
                "no final answer after {} tool rounds",
                self.config.max_tool_rounds
            ),
        })
    }
}

/// Executes one tool call, rendering failures as text for the model.
///
/// A failed search degrades the stage (the model sees the failure and can
/// emit an empty parts list) rather than aborting the run.
async fn execute_tool_call(tool: &dyn SearchTool, call: &ToolCall) -> String {
    if call.function.name != SEARCH_TOOL_NAME {
        return format!("unknown tool: {}", call.function.name);
    }

    let query = serde_json::from_str::<SearchArguments>(&call.function.arguments)
        .map(|args| args.query)
        .unwrap_or_default();
    if query.is_empty() {
        return "search error: missing query argument".to_string();
    }

    match tool.search(&query).await {
        Ok(hits) => serde_json::to_string(&hits)
            .unwrap_or_else(|e| format!("search error: could not serialize hits: {e}")),
        Err(e) => {
            warn!(provider = PROVIDER, error = %e, "search tool failed; degrading");
            format!("search error: {e}")
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchArguments {
    #[serde(default)]
    query: String,
}

// Wire types. Content is a raw JSON value so one message type covers both
// plain-text messages and multi-part image messages.

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize)]
struct Message {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl Message {
    fn system(text: String) -> Self {
        Self {
            role: "system",
            content: Some(serde_json::Value::String(text)),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn user(prompt: &str, image: Option<&CarImage>) -> Self {
        let content = match image {
            Some(image) => serde_json::json!([
                { "type": "text", "text": prompt },
                {
                    "type": "image_url",
                    "image_url": { "url": image_data_url(image) }
                }
            ]),
            None => serde_json::Value::String(prompt.to_string()),
        };
        Self {
            role: "user",
            content: Some(content),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn assistant_tool_calls(reply: ResponseMessage) -> Self {
        Self {
            role: "assistant",
            content: reply.content.map(serde_json::Value::String),
            tool_calls: Some(reply.tool_calls),
            tool_call_id: None,
        }
    }

    fn tool(call_id: String, content: String) -> Self {
        Self {
            role: "tool",
            content: Some(serde_json::Value::String(content)),
            tool_calls: None,
            tool_call_id: Some(call_id),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

fn image_data_url(image: &CarImage) -> String {
    format!(
        "data:{};base64,{}",
        image.format.mime_type(),
        BASE64.encode(&image.bytes)
    )
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.config.model)
            .field("endpoint", &self.config.endpoint)
            .finish()
    }
}
