//! Transcript helpers: message records and timestamped output files.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tandem_core::ChatMessage;
use tracing::info;

/// Timestamp format appended to saved file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Serializable view of one conversation message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

impl From<&ChatMessage> for MessageRecord {
    fn from(message: &ChatMessage) -> Self {
        Self {
            kind: message.type_name().to_string(),
            content: message.content().to_string(),
        }
    }
}

/// Reduce a conversation to `{type, content}` records
pub fn extract_messages(messages: &[ChatMessage]) -> Vec<MessageRecord> {
    messages.iter().map(MessageRecord::from).collect()
}

/// Pretty-printed JSON array of [`MessageRecord`]s
pub fn messages_to_json(messages: &[ChatMessage]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&extract_messages(messages))
}

/// `<name>_<YYYYmmdd_HHMMSS>.txt`
pub fn output_file_name(name: &str, timestamp: &DateTime<Local>) -> String {
    format!("{}_{}.txt", name, timestamp.format(FILE_TIMESTAMP_FORMAT))
}

/// Write `content` to a timestamped file under `dir`, creating the directory
/// when needed. Returns the written path.
pub fn save_to_file(dir: &Path, content: &str, name: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(output_file_name(name, &Local::now()));
    fs::write(&path, content)?;
    info!(path = %path.display(), "Saved output");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tandem_core::ToolCall;

    #[test]
    fn test_file_name_format() {
        let ts = Local.with_ymd_and_hms(2025, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(output_file_name("dice_roll", &ts), "dice_roll_20250307_090502.txt");
    }

    #[test]
    fn test_records_use_message_class_names() {
        let messages = vec![
            ChatMessage::human("Roll 2d6"),
            ChatMessage::ai_with_tool_calls(
                "",
                vec![ToolCall::new("c1", "dice_roll", serde_json::json!({"notation": "2d6"}))],
            ),
            ChatMessage::tool("Rolled 2d6: total 7", "c1", "dice_roll"),
            ChatMessage::ai("You rolled a 7."),
        ];

        let kinds: Vec<String> = extract_messages(&messages)
            .into_iter()
            .map(|r| r.kind)
            .collect();
        assert_eq!(kinds, ["HumanMessage", "AIMessage", "ToolMessage", "AIMessage"]);
    }

    #[test]
    fn test_json_shape() {
        let json = messages_to_json(&[ChatMessage::human("hi")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!([{"type": "HumanMessage", "content": "hi"}]));
        assert!(json.contains('\n'));
    }
}
