//! End-to-end runs of the prebuilt ReAct agent against a scripted model.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tandem_core::{ChatMessage, Tool, ToolCall, ToolError, ToolResult};
use tandem_graph::{GraphError, MessagesState, create_react_agent};
use tandem_llm::MockChatModel;

struct ExchangeRateTool;

#[async_trait]
impl Tool for ExchangeRateTool {
    fn name(&self) -> &str {
        "exchange_rate"
    }

    fn description(&self) -> &str {
        "Look up a currency exchange rate"
    }

    async fn call(&self, arguments: Value) -> ToolResult<String> {
        match (arguments["from"].as_str(), arguments["to"].as_str()) {
            (Some(from), Some(to)) => Ok(format!("1 {} = 7.10 {}", from, to)),
            _ => Err(ToolError::execution("exchange_rate", "missing currency codes")),
        }
    }
}

fn tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(ExchangeRateTool)]
}

fn tool_request(id: &str, name: &str, arguments: Value) -> ChatMessage {
    ChatMessage::ai_with_tool_calls("", vec![ToolCall::new(id, name, arguments)])
}

#[tokio::test]
async fn answers_after_one_tool_round() {
    let model = Arc::new(
        MockChatModel::new()
            .with_response(tool_request(
                "call_1",
                "exchange_rate",
                json!({"from": "USD", "to": "CNY"}),
            ))
            .with_response(ChatMessage::ai("One dollar buys about 7.10 renminbi.")),
    );

    let agent = create_react_agent(model.clone(), tools()).unwrap();
    let state = agent
        .invoke(MessagesState::from_query(
            "What is the exchange rate for dollars to renminbi?",
        ))
        .await
        .unwrap();

    let kinds: Vec<&str> = state.messages.iter().map(|m| m.type_name()).collect();
    assert_eq!(kinds, ["HumanMessage", "AIMessage", "ToolMessage", "AIMessage"]);
    assert_eq!(state.messages[2].content(), "1 USD = 7.10 CNY");
    assert_eq!(
        state.messages[3].content(),
        "One dollar buys about 7.10 renminbi."
    );

    let calls = model.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].tools, vec!["exchange_rate".to_string()]);
    assert_eq!(calls[1].messages.len(), 3);
}

#[tokio::test]
async fn unknown_tool_is_reported_to_the_model() {
    let model = Arc::new(
        MockChatModel::new()
            .with_response(tool_request("call_1", "weather", json!({})))
            .with_response(ChatMessage::ai("I cannot check the weather.")),
    );

    let agent = create_react_agent(model, tools()).unwrap();
    let state = agent
        .invoke(MessagesState::from_query("Is it raining?"))
        .await
        .unwrap();

    assert_eq!(
        state.messages[2].content(),
        "Error: weather is not a valid tool, try one of [exchange_rate]."
    );
    assert_eq!(state.messages.len(), 4);
}

#[tokio::test]
async fn tool_failure_is_reported_to_the_model() {
    let model = Arc::new(
        MockChatModel::new()
            .with_response(tool_request("call_1", "exchange_rate", json!({})))
            .with_response(ChatMessage::ai("Which currencies?")),
    );

    let agent = create_react_agent(model, tools()).unwrap();
    let state = agent
        .invoke(MessagesState::from_query("Rates please"))
        .await
        .unwrap();

    let failure = state.messages[2].content();
    assert!(failure.starts_with("Error: "));
    assert!(failure.contains("missing currency codes"));
    assert!(failure.ends_with("\n Please fix your mistakes."));
}

#[tokio::test]
async fn agent_without_tools_answers_directly() {
    let model = Arc::new(MockChatModel::new().with_response(ChatMessage::ai("Hello!")));

    let agent = create_react_agent(model.clone(), Vec::new()).unwrap();
    let state = agent
        .invoke(MessagesState::from_query("Hi"))
        .await
        .unwrap();

    assert_eq!(state.messages.len(), 2);
    assert!(model.calls()[0].tools.is_empty());
}

#[tokio::test]
async fn endless_tool_loop_hits_recursion_limit() {
    let mut model = MockChatModel::new();
    for i in 0..10 {
        model = model.with_response(tool_request(
            &format!("call_{}", i),
            "exchange_rate",
            json!({"from": "GBP", "to": "EUR"}),
        ));
    }

    let agent = create_react_agent(Arc::new(model), tools())
        .unwrap()
        .with_recursion_limit(4);
    let err = agent
        .invoke(MessagesState::from_query("Loop forever"))
        .await
        .unwrap_err();

    assert!(matches!(err, GraphError::RecursionLimit { limit: 4 }));
}

#[tokio::test]
async fn model_failure_names_the_node() {
    let model = Arc::new(MockChatModel::new());

    let agent = create_react_agent(model, tools()).unwrap();
    let err = agent
        .invoke(MessagesState::from_query("Hi"))
        .await
        .unwrap_err();

    match err {
        GraphError::NodeFailed { node, .. } => assert_eq!(node, "agent"),
        other => panic!("unexpected error: {:?}", other),
    }
}
