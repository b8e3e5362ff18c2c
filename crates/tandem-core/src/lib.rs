//! # Tandem Core
//!
//! Shared building blocks for the Tandem crates:
//!
//! - **Messages**: the conversation turns that flow through graphs and
//!   chat models ([`ChatMessage`], [`ToolCall`])
//! - **Tools**: the async [`Tool`] trait that remote MCP tools are bridged into
//!
//! ## Example
//!
//! ```rust
//! use tandem_core::{ChatMessage, ToolCall};
//!
//! let question = ChatMessage::human("Roll 2d6");
//! let answer = ChatMessage::ai_with_tool_calls(
//!     "",
//!     vec![ToolCall::new("call-1", "roll_dice", serde_json::json!({"dice": "2d6"}))],
//! );
//!
//! assert_eq!(question.type_name(), "HumanMessage");
//! assert!(answer.has_tool_calls());
//! ```

pub mod error;
pub mod message;
pub mod tool;

pub use error::{ToolError, ToolResult};
pub use message::{ChatMessage, ToolCall, last_ai, last_human};
pub use tool::{Tool, ToolSpec, find_tool};
