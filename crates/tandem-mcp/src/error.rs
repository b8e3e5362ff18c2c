//! MCP error types
//!
//! Errors raised while connecting to MCP servers and calling their tools,
//! plus the mapping into [`ToolError`] used when MCP tools run inside a graph.

use tandem_core::ToolError;
use thiserror::Error;

/// MCP operation result type
pub type McpResult<T> = Result<T, McpError>;

/// Errors that can occur during MCP operations
#[derive(Debug, Error)]
pub enum McpError {
    /// Server configuration is unusable
    #[error("Invalid server configuration for '{server}': {reason}")]
    InvalidConfig { server: String, reason: String },

    /// Spawning the server process failed
    #[error("Failed to spawn MCP server '{server}': {source}")]
    Spawn {
        server: String,
        #[source]
        source: std::io::Error,
    },

    /// Initialize handshake failed
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Tool not found on the server
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool arguments were not a JSON object
    #[error("Invalid tool parameters: {0}")]
    InvalidParameters(String),

    /// Request to the server failed
    #[error("MCP protocol error: {0}")]
    ProtocolError(String),

    /// Connection closed
    #[error("Connection closed")]
    ConnectionClosed,

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl McpError {
    /// Create an error from an rmcp service error
    pub fn from_service_error(error: impl std::fmt::Display) -> Self {
        let msg = error.to_string();

        if msg.contains("closed") || msg.contains("Closed") {
            McpError::ConnectionClosed
        } else {
            McpError::ProtocolError(msg)
        }
    }

    /// Convert into a [`ToolError`] for the named tool
    pub fn into_tool_error(self, tool: &str) -> ToolError {
        match self {
            McpError::ToolNotFound(_) => ToolError::not_found(tool),
            McpError::InvalidParameters(reason) => ToolError::InvalidArguments {
                name: tool.to_string(),
                reason,
            },
            McpError::ConnectionError(_)
            | McpError::ConnectionClosed
            | McpError::Spawn { .. }
            | McpError::ProtocolError(_) => ToolError::transport(tool, self.to_string()),
            other => ToolError::execution(tool, other.to_string()),
        }
    }
}
