//! Plain-text extraction from agent responses.
//!
//! A `send_message` stream mixes task progress (with artifacts arriving in
//! update events) and direct agent messages. [`process_response`] folds such a
//! stream into a [`ResponseSummary`]: the last text seen plus the correlation
//! ids needed for a follow-up.

use futures::{Stream, StreamExt};
use serde_json::Value;
use tracing::debug;

use crate::client::ClientEvent;
use crate::error::A2aResult;
use crate::types::{Part, StructuredPart, UpdateEvent};

/// Content reported when an agent produced no text
pub const NO_RESPONSE_CONTENT: &str = "No response content";

/// Return the text of the first text part.
///
/// Structured `{"kind": "text"}` parts are recognized directly; loose JSON
/// objects count when their `kind` (or legacy `type`) is `"text"` and they
/// carry a string `text` field.
pub fn extract_text_from_parts(parts: &[Part]) -> Option<&str> {
    parts.iter().find_map(|part| match part {
        Part::Structured(StructuredPart::Text(text)) => Some(text.text.as_str()),
        Part::Structured(_) => None,
        Part::Loose(value) => loose_text(value),
    })
}

fn loose_text(value: &Value) -> Option<&str> {
    let object = value.as_object()?;
    let kind = object
        .get("kind")
        .or_else(|| object.get("type"))
        .and_then(Value::as_str)?;
    if kind != "text" {
        return None;
    }
    object.get("text").and_then(Value::as_str)
}

/// Text and correlation ids recovered from one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSummary {
    pub content: String,
    pub task_id: Option<String>,
    pub context_id: Option<String>,
}

impl Default for ResponseSummary {
    fn default() -> Self {
        Self {
            content: NO_RESPONSE_CONTENT.to_string(),
            task_id: None,
            context_id: None,
        }
    }
}

impl ResponseSummary {
    /// Fold one event into the summary; later non-empty text wins
    pub fn apply(&mut self, event: &ClientEvent) {
        let text = match event {
            ClientEvent::Task(task, update) => {
                self.task_id = Some(task.id.clone());
                self.context_id = Some(task.context_id.clone());
                match update {
                    Some(UpdateEvent::Artifact(update)) => {
                        extract_text_from_parts(&update.artifact.parts)
                    }
                    _ => None,
                }
            }
            ClientEvent::Message(message) => extract_text_from_parts(&message.parts),
        };

        if let Some(text) = text.filter(|t| !t.is_empty()) {
            self.content = text.to_string();
        }
    }
}

/// Drain a response stream into a [`ResponseSummary`].
///
/// The first error in the stream aborts processing.
pub async fn process_response<S>(mut stream: S) -> A2aResult<ResponseSummary>
where
    S: Stream<Item = A2aResult<ClientEvent>> + Unpin,
{
    let mut summary = ResponseSummary::default();
    let mut events = 0usize;

    while let Some(event) = stream.next().await {
        summary.apply(&event?);
        events += 1;
    }

    debug!(
        events,
        task_id = summary.task_id.as_deref().unwrap_or("-"),
        "Processed agent response"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::A2aError;
    use crate::types::{Artifact, Message, Task, TaskArtifactUpdateEvent};
    use serde_json::json;

    fn artifact_event(parts: Vec<Part>) -> ClientEvent {
        let mut artifact = Artifact::text("a-1", "");
        artifact.parts = parts;
        ClientEvent::Task(
            Task::new("t-1", "c-1"),
            Some(UpdateEvent::Artifact(TaskArtifactUpdateEvent {
                task_id: "t-1".to_string(),
                context_id: "c-1".to_string(),
                artifact,
                append: None,
                last_chunk: Some(true),
            })),
        )
    }

    #[test]
    fn test_structured_text_part() {
        let parts = vec![Part::text("hello")];
        assert_eq!(extract_text_from_parts(&parts), Some("hello"));
    }

    #[test]
    fn test_skips_non_text_parts() {
        let parts = vec![Part::data(json!({"x": 1})), Part::text("second")];
        assert_eq!(extract_text_from_parts(&parts), Some("second"));
    }

    #[test]
    fn test_loose_text_part() {
        let parts: Vec<Part> =
            serde_json::from_value(json!([{"type": "text", "text": "legacy"}])).unwrap();
        assert!(matches!(parts[0], Part::Loose(_)));
        assert_eq!(extract_text_from_parts(&parts), Some("legacy"));
    }

    #[test]
    fn test_unrecognized_shape() {
        let parts: Vec<Part> = serde_json::from_value(json!([
            {"root": {"payload": "hidden"}},
            {"kind": "text", "text": 42},
            "bare string"
        ]))
        .unwrap();
        assert_eq!(extract_text_from_parts(&parts), None);
        assert_eq!(extract_text_from_parts(&[]), None);
    }

    #[test]
    fn test_message_extracts_like_artifact() {
        let mut from_message = ResponseSummary::default();
        from_message.apply(&ClientEvent::Message(Message::agent("same text")));

        let mut from_artifact = ResponseSummary::default();
        from_artifact.apply(&artifact_event(vec![Part::text("same text")]));

        assert_eq!(from_message.content, from_artifact.content);
        assert_eq!(from_artifact.task_id.as_deref(), Some("t-1"));
        assert_eq!(from_artifact.context_id.as_deref(), Some("c-1"));
    }

    #[test]
    fn test_default_content_kept_without_text() {
        let mut summary = ResponseSummary::default();
        summary.apply(&ClientEvent::Task(Task::new("t-1", "c-1"), None));
        assert_eq!(summary.content, NO_RESPONSE_CONTENT);
        assert_eq!(summary.task_id.as_deref(), Some("t-1"));
    }

    #[test]
    fn test_empty_text_keeps_placeholder() {
        let mut summary = ResponseSummary::default();
        summary.apply(&ClientEvent::Message(Message::agent("")));
        assert_eq!(summary.content, NO_RESPONSE_CONTENT);

        summary.apply(&artifact_event(vec![Part::text("")]));
        assert_eq!(summary.content, NO_RESPONSE_CONTENT);
        assert_eq!(summary.task_id.as_deref(), Some("t-1"));
    }

    #[tokio::test]
    async fn test_trailing_empty_chunk_keeps_answer() {
        let events = vec![
            Ok(artifact_event(vec![Part::text("Observe, orient, decide, act.")])),
            Ok(artifact_event(vec![Part::text("")])),
        ];
        let summary = process_response(futures::stream::iter(events))
            .await
            .unwrap();
        assert_eq!(summary.content, "Observe, orient, decide, act.");
    }

    #[tokio::test]
    async fn test_process_response_later_text_wins() {
        let events = vec![
            Ok(artifact_event(vec![Part::text("first")])),
            Ok(ClientEvent::Message(Message::agent("final"))),
        ];
        let summary = process_response(futures::stream::iter(events))
            .await
            .unwrap();
        assert_eq!(summary.content, "final");
        assert_eq!(summary.context_id.as_deref(), Some("c-1"));
    }

    #[tokio::test]
    async fn test_process_response_aborts_on_error() {
        let events = vec![
            Ok(artifact_event(vec![Part::text("partial")])),
            Err(A2aError::connection_error("reset")),
        ];
        let result = process_response(futures::stream::iter(events)).await;
        assert!(matches!(result, Err(A2aError::ConnectionError { .. })));
    }
}
