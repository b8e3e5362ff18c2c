//! LLM error types

use thiserror::Error;

/// Result type for model and prompt operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors that can occur when preparing or running a chat model call
#[derive(Debug, Error)]
pub enum LlmError {
    /// Model identifier named an unsupported provider
    #[error("Unknown model provider '{provider}' in '{model_id}'")]
    UnknownProvider { provider: String, model_id: String },

    /// No API key was configured for a provider that needs one
    #[error("Missing API key for provider '{provider}'")]
    MissingApiKey { provider: String },

    /// The provider answered with an error
    #[error("{provider} request failed with status {status}: {reason}")]
    RequestFailed {
        provider: String,
        status: u16,
        reason: String,
    },

    /// The provider's answer could not be understood
    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    /// A prompt template could not be parsed
    #[error("Invalid prompt template: {reason}")]
    InvalidTemplate { reason: String },

    /// A prompt variable was not supplied
    #[error("Missing prompt variable '{name}'")]
    MissingVariable { name: String },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LlmError {
    /// Create an invalid template error
    pub fn invalid_template(reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            reason: reason.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LlmError::MissingVariable {
            name: "ai_content".to_string(),
        };
        assert_eq!(err.to_string(), "Missing prompt variable 'ai_content'");
    }
}
