//! Tool execution errors.

use thiserror::Error;

/// Result type for tool operations
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur when invoking a tool
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    /// Tool was not found among the available tools
    #[error("Tool '{name}' not found")]
    NotFound { name: String },

    /// Tool arguments were rejected before execution
    #[error("Tool '{name}' received invalid arguments: {reason}")]
    InvalidArguments { name: String, reason: String },

    /// Tool ran but reported a failure
    #[error("Tool '{name}' execution failed: {message}")]
    Execution { name: String, message: String },

    /// The transport to the tool provider failed
    #[error("Tool '{name}' is unreachable: {message}")]
    Transport { name: String, message: String },
}

impl ToolError {
    /// Create a not found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an execution error
    pub fn execution(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Name of the tool the error refers to
    pub fn tool_name(&self) -> &str {
        match self {
            ToolError::NotFound { name }
            | ToolError::InvalidArguments { name, .. }
            | ToolError::Execution { name, .. }
            | ToolError::Transport { name, .. } => name,
        }
    }
}
