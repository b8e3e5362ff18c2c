//! Chat model abstraction.
//!
//! A [`ChatModel`] turns a conversation into the next AI turn. Models are
//! shared as `Arc<dyn ChatModel>` so graph nodes can hold them cheaply.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tandem_core::{ChatMessage, Tool, ToolSpec};
use tracing::debug;

use crate::error::{LlmError, LlmResult};
use crate::openai::{DEFAULT_OPENAI_BASE_URL, OpenAiChatModel};

/// Provider used when a model id has no `provider:` prefix
pub const DEFAULT_PROVIDER: &str = "openai";

/// A conversational language model
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model name as sent to the provider
    fn model_name(&self) -> &str;

    /// Produce the next AI message. The result may request tool calls when
    /// `tools` is non-empty.
    async fn chat(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> LlmResult<ChatMessage>;

    /// Produce the next AI message without tools
    async fn invoke(&self, messages: &[ChatMessage]) -> LlmResult<ChatMessage> {
        self.chat(messages, &[]).await
    }
}

/// A model with a fixed set of tools offered on every call
#[derive(Clone)]
pub struct BoundModel {
    model: Arc<dyn ChatModel>,
    tools: Vec<ToolSpec>,
}

impl fmt::Debug for BoundModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundModel")
            .field("model", &self.model.model_name())
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl BoundModel {
    pub fn new(model: Arc<dyn ChatModel>, tools: Vec<ToolSpec>) -> Self {
        Self { model, tools }
    }

    /// Tool specs offered to the model
    pub fn tools(&self) -> &[ToolSpec] {
        &self.tools
    }

    /// Run the model with the bound tools
    pub async fn invoke(&self, messages: &[ChatMessage]) -> LlmResult<ChatMessage> {
        self.model.chat(messages, &self.tools).await
    }
}

/// Bind a set of tools to a model
pub fn bind_tools(model: Arc<dyn ChatModel>, tools: &[Arc<dyn Tool>]) -> BoundModel {
    BoundModel::new(model, tools.iter().map(|t| t.spec()).collect())
}

/// A parsed `provider:model` identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelId {
    pub provider: String,
    pub model: String,
}

impl ModelId {
    /// Parse `provider:model`; a bare model name uses [`DEFAULT_PROVIDER`]
    pub fn parse(id: &str) -> LlmResult<Self> {
        let (provider, model) = match id.split_once(':') {
            Some((provider, model)) => (provider.trim(), model.trim()),
            None => (DEFAULT_PROVIDER, id.trim()),
        };

        if provider.is_empty() || model.is_empty() {
            return Err(LlmError::UnknownProvider {
                provider: provider.to_string(),
                model_id: id.to_string(),
            });
        }

        Ok(Self {
            provider: provider.to_lowercase(),
            model: model.to_string(),
        })
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}

/// Provider settings used by [`init_chat_model`]
#[derive(Debug, Clone, Default)]
pub struct ModelSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub timeout: Option<Duration>,
}

impl ModelSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Build a chat model from a `provider:model` identifier
pub fn init_chat_model(id: &str, settings: &ModelSettings) -> LlmResult<Arc<dyn ChatModel>> {
    let model_id = ModelId::parse(id)?;

    debug!(model = %model_id, "Initializing chat model");

    match model_id.provider.as_str() {
        "openai" => {
            let api_key = settings
                .api_key
                .clone()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| LlmError::MissingApiKey {
                    provider: model_id.provider.clone(),
                })?;

            let mut model = OpenAiChatModel::new(api_key, model_id.model).with_base_url(
                settings
                    .base_url
                    .as_deref()
                    .unwrap_or(DEFAULT_OPENAI_BASE_URL),
            );
            if let Some(temperature) = settings.temperature {
                model = model.with_temperature(temperature);
            }
            if let Some(timeout) = settings.timeout {
                model = model.with_timeout(timeout);
            }
            Ok(Arc::new(model))
        }
        _ => Err(LlmError::UnknownProvider {
            provider: model_id.provider,
            model_id: id.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_and_model() {
        let id = ModelId::parse("openai:gpt-4.1").unwrap();
        assert_eq!(id.provider, "openai");
        assert_eq!(id.model, "gpt-4.1");
        assert_eq!(id.to_string(), "openai:gpt-4.1");
    }

    #[test]
    fn test_bare_model_defaults_to_openai() {
        let id = ModelId::parse("gpt-3.5-turbo").unwrap();
        assert_eq!(id.provider, DEFAULT_PROVIDER);
        assert_eq!(id.model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_empty_model_rejected() {
        assert!(ModelId::parse("openai:").is_err());
        assert!(ModelId::parse("").is_err());
    }

    #[test]
    fn test_unknown_provider() {
        let settings = ModelSettings::new().with_api_key("sk-test");
        let err = init_chat_model("mystery:model-1", &settings).err().unwrap();
        assert!(matches!(err, LlmError::UnknownProvider { provider, .. } if provider == "mystery"));
    }

    #[test]
    fn test_missing_api_key() {
        let err = init_chat_model("openai:gpt-4.1", &ModelSettings::new())
            .err()
            .unwrap();
        assert!(matches!(err, LlmError::MissingApiKey { .. }));
    }

    #[test]
    fn test_init_openai_model() {
        let settings = ModelSettings::new()
            .with_api_key("sk-test")
            .with_temperature(0.3);
        let model = init_chat_model("openai:gpt-4.1", &settings).unwrap();
        assert_eq!(model.model_name(), "gpt-4.1");
    }
}
