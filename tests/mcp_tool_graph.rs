//! Tool graph demo with a scripted model, local tools and a temp output dir.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::fs;
use std::sync::Arc;
use tandem::core::{ToolCall, ToolResult};
use tandem::demos::mcp_graph::{GRAPH_QUERIES, build_tool_graph, run_queries, run_query};
use tandem::llm::MockChatModel;
use tandem::{ChatMessage, MessageRecord, Tool};
use tempfile::TempDir;

struct DiceTool;

#[async_trait]
impl Tool for DiceTool {
    fn name(&self) -> &str {
        "dice_roll"
    }

    async fn call(&self, arguments: Value) -> ToolResult<String> {
        Ok(format!("Rolled {}: total 9", arguments["notation"].as_str().unwrap_or("?")))
    }
}

struct RateTool;

#[async_trait]
impl Tool for RateTool {
    fn name(&self) -> &str {
        "exchange_rate"
    }

    async fn call(&self, _arguments: Value) -> ToolResult<String> {
        Ok("1 GBP = 1.17 EUR".to_string())
    }
}

fn tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(DiceTool), Arc::new(RateTool)]
}

fn call(id: &str, name: &str, arguments: Value) -> ChatMessage {
    ChatMessage::ai_with_tool_calls("", vec![ToolCall::new(id, name, arguments)])
}

fn read_records(path: &std::path::Path) -> Vec<MessageRecord> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn saves_transcript_for_each_query() {
    let model = Arc::new(
        MockChatModel::new()
            .with_response(call("c1", "dice_roll", json!({"notation": "2d6"})))
            .with_response(ChatMessage::ai("You rolled 9."))
            .with_response(call("c2", "exchange_rate", json!({"from": "GBP", "to": "EUR"})))
            .with_response(ChatMessage::ai("One pound buys 1.17 euros.")),
    );
    let graph = build_tool_graph(model, tools()).unwrap();
    let dir = TempDir::new().unwrap();

    let saved = run_queries(&graph, &GRAPH_QUERIES, dir.path()).await;
    assert_eq!(saved.len(), 2);

    let first_name = saved[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(first_name.starts_with("dice_roll_"));
    assert!(first_name.ends_with(".txt"));

    let records = read_records(&saved[0]);
    let kinds: Vec<&str> = records.iter().map(|r| r.kind.as_str()).collect();
    assert_eq!(kinds, ["HumanMessage", "AIMessage", "ToolMessage", "AIMessage"]);
    assert_eq!(records[0].content, "Roll 2d6");
    assert_eq!(records[2].content, "Rolled 2d6: total 9");

    let records = read_records(&saved[1]);
    assert_eq!(records[2].content, "1 GBP = 1.17 EUR");
    assert_eq!(records[3].content, "One pound buys 1.17 euros.");
}

#[tokio::test]
async fn failed_query_does_not_stop_the_batch() {
    // Only the second query gets a scripted answer
    let model = Arc::new(
        MockChatModel::new()
            .with_error(tandem::llm::LlmError::invalid_response("mock", "rate limited"))
            .with_response(ChatMessage::ai("No tools needed.")),
    );
    let graph = build_tool_graph(model, tools()).unwrap();
    let dir = TempDir::new().unwrap();

    let saved = run_queries(&graph, &GRAPH_QUERIES, dir.path()).await;
    assert_eq!(saved.len(), 1);
    assert!(
        saved[0]
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("exchange_rate_")
    );
}

#[tokio::test]
async fn output_directory_is_created_on_demand() {
    let model = Arc::new(MockChatModel::new().with_response(ChatMessage::ai("Done.")));
    let graph = build_tool_graph(model, tools()).unwrap();
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("runs").join("today");

    let path = run_query(&graph, "Roll 2d6", "dice_roll", &nested).await.unwrap();

    assert!(path.starts_with(&nested));
    assert_eq!(read_records(&path).len(), 2);
}
