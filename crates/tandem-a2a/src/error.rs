//! A2A Protocol Error Types
//!
//! This module defines error types for the A2A client implementation.

use thiserror::Error;

use crate::types::TransportProtocol;

/// Result type for A2A operations
pub type A2aResult<T> = Result<T, A2aError>;

/// Errors that can occur in A2A protocol operations
#[derive(Debug, Error)]
pub enum A2aError {
    /// Agent (or its card) not found
    #[error("Agent not found: {agent_url}")]
    AgentNotFound { agent_url: String },

    /// Agent card validation failed
    #[error("Invalid agent card: {reason}")]
    InvalidAgentCard { reason: String },

    /// No advertised transport is supported by this client
    #[error("No compatible transport: agent offers {offered:?}, client supports {supported:?}")]
    NoCompatibleTransport {
        offered: Vec<TransportProtocol>,
        supported: Vec<TransportProtocol>,
    },

    /// Authentication required
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Authorization failed
    #[error("Not authorized: {reason}")]
    NotAuthorized { reason: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded: retry after {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    /// Connection error
    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    /// Request timeout
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The remote agent answered with a JSON-RPC error object
    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc { code: i64, message: String },

    /// Protocol error
    #[error("Protocol error: {message}")]
    ProtocolError { message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl A2aError {
    /// Create an agent not found error
    pub fn agent_not_found(agent_url: impl Into<String>) -> Self {
        Self::AgentNotFound {
            agent_url: agent_url.into(),
        }
    }

    /// Create an invalid agent card error
    pub fn invalid_agent_card(reason: impl Into<String>) -> Self {
        Self::InvalidAgentCard {
            reason: reason.into(),
        }
    }

    /// Create a connection error
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    /// Create a protocol error
    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<crate::jsonrpc::JsonRpcError> for A2aError {
    fn from(err: crate::jsonrpc::JsonRpcError) -> Self {
        A2aError::JsonRpc {
            code: err.code,
            message: err.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = A2aError::agent_not_found("http://localhost:10000");
        assert!(matches!(err, A2aError::AgentNotFound { .. }));
        assert_eq!(err.to_string(), "Agent not found: http://localhost:10000");
    }

    #[test]
    fn test_jsonrpc_error_conversion() {
        let rpc = crate::jsonrpc::JsonRpcError {
            code: -32001,
            message: "Task not found".to_string(),
            data: None,
        };
        let err: A2aError = rpc.into();
        assert_eq!(err.to_string(), "JSON-RPC error -32001: Task not found");
    }

    #[test]
    fn test_no_compatible_transport_message() {
        let err = A2aError::NoCompatibleTransport {
            offered: vec![TransportProtocol::Grpc],
            supported: vec![TransportProtocol::JsonRpc],
        };
        assert!(err.to_string().contains("No compatible transport"));
    }
}
