//! OpenAI-compatible chat completions client.
//!
//! Works with any provider that speaks the `/chat/completions` format.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tandem_core::{ChatMessage, ToolCall, ToolSpec};
use tracing::{debug, warn};

use crate::error::{LlmError, LlmResult};
use crate::model::ChatModel;

/// Public OpenAI endpoint
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const PROVIDER: &str = "openai";

/// Chat model backed by an OpenAI-compatible HTTP API
pub struct OpenAiChatModel {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl std::fmt::Debug for OpenAiChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatModel")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAiChatModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Point at another OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Use a client with the given request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
                Client::new()
            });
        self
    }

    /// Use a preconfigured HTTP client
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    fn build_request(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> OpenAiRequest {
        OpenAiRequest {
            model: self.model.clone(),
            messages: messages.iter().map(OpenAiMessage::from).collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: (!tools.is_empty()).then(|| {
                tools
                    .iter()
                    .map(|t| OpenAiTool {
                        tool_type: "function".to_string(),
                        function: OpenAiFunction {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: t.parameters.clone(),
                        },
                    })
                    .collect()
            }),
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn chat(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> LlmResult<ChatMessage> {
        let request = self.build_request(messages, tools);

        debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                reason,
            });
        }

        let response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::invalid_response(PROVIDER, e.to_string()))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::invalid_response(PROVIDER, "No choices in response"))?;

        if let Some(usage) = &response.usage {
            debug!(
                model = %self.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
                "Chat completion finished"
            );
        }

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                let arguments = parse_arguments(&call.function.name, &call.function.arguments);
                ToolCall::new(call.id, call.function.name, arguments)
            })
            .collect();

        Ok(ChatMessage::ai_with_tool_calls(
            choice.message.content.unwrap_or_default(),
            tool_calls,
        ))
    }
}

/// Tool arguments arrive as a JSON string; keep malformed ones verbatim so the
/// tool can report the problem back to the model.
fn parse_arguments(tool: &str, raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(tool, error = %e, "Model produced malformed tool arguments");
        Value::String(raw.to_string())
    })
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAiTool>>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(message: &ChatMessage) -> Self {
        let (role, tool_call_id) = match message {
            ChatMessage::System { .. } => ("system", None),
            ChatMessage::Human { .. } => ("user", None),
            ChatMessage::Ai { .. } => ("assistant", None),
            ChatMessage::Tool { tool_call_id, .. } => ("tool", Some(tool_call_id.clone())),
        };

        let tool_calls = message.has_tool_calls().then(|| {
            message
                .tool_calls()
                .iter()
                .map(|call| OpenAiToolCall {
                    id: call.id.clone(),
                    call_type: "function".to_string(),
                    function: OpenAiFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.to_string(),
                    },
                })
                .collect()
        });

        // Assistant turns that only call tools carry null content
        let content = match message.content() {
            "" if tool_calls.is_some() => None,
            text => Some(text.to_string()),
        };

        Self {
            role,
            content,
            tool_call_id,
            tool_calls,
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAiTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAiFunction,
}

#[derive(Debug, Serialize)]
struct OpenAiFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    call_type: String,
    function: OpenAiFunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_roles() {
        let model = OpenAiChatModel::new("sk-test", "gpt-4.1");
        let messages = vec![
            ChatMessage::system("be brief"),
            ChatMessage::human("Roll 2d6"),
            ChatMessage::ai_with_tool_calls(
                "",
                vec![ToolCall::new("call-1", "dice_roll", json!({"notation": "2d6"}))],
            ),
            ChatMessage::tool("12", "call-1", "dice_roll"),
        ];

        let request = serde_json::to_value(model.build_request(&messages, &[])).unwrap();
        let sent = request["messages"].as_array().unwrap();

        assert_eq!(sent[0]["role"], "system");
        assert_eq!(sent[1]["role"], "user");
        assert_eq!(sent[2]["role"], "assistant");
        assert!(sent[2]["content"].is_null());
        assert_eq!(sent[2]["tool_calls"][0]["function"]["arguments"], r#"{"notation":"2d6"}"#);
        assert_eq!(sent[3]["role"], "tool");
        assert_eq!(sent[3]["tool_call_id"], "call-1");
        assert!(request.get("tools").is_none());
    }

    #[test]
    fn test_tools_and_temperature_serialized() {
        let model = OpenAiChatModel::new("sk-test", "gpt-4.1").with_temperature(0.3);
        let tools = vec![ToolSpec {
            name: "exchange_rate".to_string(),
            description: "Currency rates".to_string(),
            parameters: json!({"type": "object"}),
        }];

        let request =
            serde_json::to_value(model.build_request(&[ChatMessage::human("hi")], &tools)).unwrap();

        assert_eq!(request["tools"][0]["type"], "function");
        assert_eq!(request["tools"][0]["function"]["name"], "exchange_rate");
        assert!((request["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse_arguments("t", r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(parse_arguments("t", ""), json!({}));
        assert_eq!(parse_arguments("t", "{broken"), json!("{broken"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let model = OpenAiChatModel::new("k", "m").with_base_url("http://localhost:8080/v1/");
        assert_eq!(model.base_url, "http://localhost:8080/v1");
    }
}
