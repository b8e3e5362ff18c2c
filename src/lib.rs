//! # Tandem
//!
//! Tandem wires language-model agents to remote capabilities over two
//! protocols and runs them as small state graphs:
//!
//! - **[a2a]**: Agent-to-Agent client (card discovery, JSON-RPC messaging, SSE streaming)
//! - **[mcp]**: Model Context Protocol client whose tools are bridged into [`Tool`]
//! - **[llm]**: chat models, tool binding and prompt templates
//! - **[graph]**: state graph executor with prebuilt tool-calling nodes
//!
//! The [`demos`] module composes them into runnable end-to-end scenarios,
//! configured from the environment through [`DemoConfig`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tandem::{DemoConfig, demos::mcp_graph::run_mcp_graph_demo};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DemoConfig::from_env()?.with_output_dir("transcripts");
//! run_mcp_graph_demo(&config).await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Module aliases for namespaced access
// ============================================================================

pub use tandem_a2a as a2a;
pub use tandem_core as core;
pub use tandem_graph as graph;
pub use tandem_llm as llm;
pub use tandem_mcp as mcp;

pub mod config;
pub mod demos;
pub mod output;

// ============================================================================
// Common types
// ============================================================================

pub use config::{ConfigError, DemoConfig};
pub use demos::{DemoError, DemoResult};
pub use output::{MessageRecord, extract_messages, messages_to_json, save_to_file};
pub use tandem_core::{ChatMessage, Tool, ToolCall, ToolError};
