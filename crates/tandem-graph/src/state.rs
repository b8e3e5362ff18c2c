//! Graph state.
//!
//! Nodes never mutate state directly: they return an update which the
//! executor folds in with [`GraphState::apply`].

use serde::{Deserialize, Serialize};
use tandem_core::ChatMessage;

/// State carried between graph nodes
pub trait GraphState: Send + Sync + 'static {
    /// Partial update returned by a node
    type Update: Send + 'static;

    /// Fold a node's update into the state
    fn apply(&mut self, update: Self::Update);
}

/// State types that carry a conversation
pub trait HasMessages {
    fn messages(&self) -> &[ChatMessage];

    /// The newest message, if any
    fn last_message(&self) -> Option<&ChatMessage> {
        self.messages().last()
    }
}

/// Append-only reducer for conversation updates
pub fn add_messages(existing: &mut Vec<ChatMessage>, update: impl IntoIterator<Item = ChatMessage>) {
    existing.extend(update);
}

/// A state bag holding only a conversation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagesState {
    pub messages: Vec<ChatMessage>,
}

impl MessagesState {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// Start a conversation with a single user query
    pub fn from_query(query: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::human(query)])
    }
}

impl GraphState for MessagesState {
    type Update = Vec<ChatMessage>;

    fn apply(&mut self, update: Self::Update) {
        add_messages(&mut self.messages, update);
    }
}

impl HasMessages for MessagesState {
    fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
