//! Runnable demos composing the A2A client, MCP tools and the graph executor.
//!
//! - [`interview`]: queries a remote A2A agent, then turns its answer into
//!   interviewing advice with a chat model
//! - [`mcp_agent`]: prebuilt ReAct agent over tools from a stdio MCP server
//! - [`mcp_graph`]: hand-built model ⇄ tools graph whose transcripts are saved
//!   to disk

pub mod interview;
pub mod mcp_agent;
pub mod mcp_graph;

use crate::config::ConfigError;
use tandem_graph::GraphError;
use tandem_llm::LlmError;
use tandem_mcp::McpError;

/// Name under which the local MCP server is registered
pub const MCP_SERVER_NAME: &str = "local-mcp-server";

/// Failures that stop a demo before it can run its queries
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model error: {0}")]
    Llm(#[from] LlmError),

    #[error("MCP error: {0}")]
    Mcp(#[from] McpError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type DemoResult<T> = Result<T, DemoError>;

/// First `limit` characters of `text`
pub fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("héllo wörld", 7), "héllo w");
        assert_eq!(truncate("", 5), "");
    }
}
