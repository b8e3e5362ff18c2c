//! Conversation messages.
//!
//! A conversation is an ordered list of [`ChatMessage`]s. Graph state bags
//! only ever append to that list; earlier turns are never rewritten.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool invocation requested by a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call identifier, echoed back on the tool result
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// JSON arguments for the tool
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// A single conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    /// Instructions for the model
    System { content: String },

    /// A user turn
    Human { content: String },

    /// A model (or remote agent) turn
    Ai {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },

    /// The result of a tool call
    Tool {
        content: String,
        tool_call_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage::System {
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        ChatMessage::Human {
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        ChatMessage::Ai {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn ai_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        ChatMessage::Ai {
            content: content.into(),
            tool_calls,
        }
    }

    pub fn tool(
        content: impl Into<String>,
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        ChatMessage::Tool {
            content: content.into(),
            tool_call_id: tool_call_id.into(),
            name: Some(name.into()),
        }
    }

    /// Text content of the message
    pub fn content(&self) -> &str {
        match self {
            ChatMessage::System { content }
            | ChatMessage::Human { content }
            | ChatMessage::Ai { content, .. }
            | ChatMessage::Tool { content, .. } => content,
        }
    }

    /// Tool calls requested by this message (empty unless it is an AI turn)
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            ChatMessage::Ai { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls().is_empty()
    }

    pub fn is_human(&self) -> bool {
        matches!(self, ChatMessage::Human { .. })
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, ChatMessage::Ai { .. })
    }

    /// Stable type name used when serializing transcripts
    pub fn type_name(&self) -> &'static str {
        match self {
            ChatMessage::System { .. } => "SystemMessage",
            ChatMessage::Human { .. } => "HumanMessage",
            ChatMessage::Ai { .. } => "AIMessage",
            ChatMessage::Tool { .. } => "ToolMessage",
        }
    }
}

/// The most recent user turn, if any
pub fn last_human(messages: &[ChatMessage]) -> Option<&ChatMessage> {
    messages.iter().rev().find(|m| m.is_human())
}

/// The most recent AI turn, if any
pub fn last_ai(messages: &[ChatMessage]) -> Option<&ChatMessage> {
    messages.iter().rev().find(|m| m.is_ai())
}
