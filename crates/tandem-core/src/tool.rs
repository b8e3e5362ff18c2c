//! Tool abstraction.
//!
//! A [`Tool`] is a named async callable with a JSON Schema describing its
//! arguments. Tools discovered on remote MCP servers are bridged into this
//! trait so graphs and chat models never see the transport.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::ToolResult;

/// A callable exposed to a language-model-driven agent
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name
    fn name(&self) -> &str;

    /// Human-readable description shown to the model
    fn description(&self) -> &str {
        ""
    }

    /// JSON Schema for the tool arguments
    fn input_schema(&self) -> Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    /// Invoke the tool with JSON arguments and return its textual output
    async fn call(&self, arguments: Value) -> ToolResult<String>;

    /// Describe the tool for a model's function-calling interface
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.input_schema(),
        }
    }
}

/// Model-facing description of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Find a tool by name
pub fn find_tool<'a>(tools: &'a [Arc<dyn Tool>], name: &str) -> Option<&'a Arc<dyn Tool>> {
    tools.iter().find(|t| t.name() == name)
}
