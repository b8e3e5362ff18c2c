//! # Tandem MCP - Model Context Protocol Client
//!
//! This crate connects to MCP servers (over stdio or any rmcp transport) and
//! exposes their tools as [`tandem_core::Tool`]s.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tandem_core::Tool;
//! use tandem_mcp::{McpClient, McpServerConfig, load_mcp_tools};
//!
//! # async fn example() -> tandem_mcp::McpResult<()> {
//! let config = McpServerConfig::stdio("python", ["servers/tools.py"]);
//! let client = Arc::new(McpClient::connect_stdio("tools", &config).await?);
//!
//! for tool in load_mcp_tools(client).await? {
//!     println!("{}: {}", tool.name(), tool.description());
//! }
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod client;
pub mod config;
pub mod error;

pub use bridge::{BridgedTool, MultiServerMcpClient, load_mcp_tools};
pub use client::{McpClient, ToolOutput};
pub use config::{McpServerConfig, McpServersConfig, McpTransportKind};
pub use error::{McpError, McpResult};
