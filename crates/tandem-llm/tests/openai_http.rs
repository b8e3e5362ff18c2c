//! OpenAI-compatible client against a mock HTTP server.

use serde_json::json;
use tandem_core::{ChatMessage, ToolSpec};
use tandem_llm::{ChatModel, LlmError, OpenAiChatModel};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn model(server: &MockServer) -> OpenAiChatModel {
    OpenAiChatModel::new("sk-test", "gpt-4.1").with_base_url(format!("{}/v1", server.uri()))
}

#[tokio::test]
async fn returns_assistant_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "gpt-4.1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1,
            "model": "gpt-4.1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Practice the STAR method."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = model(&server)
        .invoke(&[ChatMessage::human("Interview tips?")])
        .await
        .unwrap();

    assert_eq!(reply, ChatMessage::ai("Practice the STAR method."));
}

#[tokio::test]
async fn parses_tool_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "tools": [{"type": "function", "function": {"name": "dice_roll"}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "dice_roll", "arguments": "{\"notation\":\"2d6\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        })))
        .mount(&server)
        .await;

    let tools = vec![ToolSpec {
        name: "dice_roll".to_string(),
        description: "Roll dice".to_string(),
        parameters: json!({"type": "object", "properties": {"notation": {"type": "string"}}}),
    }];

    let reply = model(&server)
        .chat(&[ChatMessage::human("Roll 2d6")], &tools)
        .await
        .unwrap();

    assert_eq!(reply.content(), "");
    let calls = reply.tool_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "call_abc");
    assert_eq!(calls[0].name, "dice_roll");
    assert_eq!(calls[0].arguments, json!({"notation": "2d6"}));
}

#[tokio::test]
async fn surfaces_provider_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let err = model(&server)
        .invoke(&[ChatMessage::human("hi")])
        .await
        .unwrap_err();

    match err {
        LlmError::RequestFailed { status, reason, .. } => {
            assert_eq!(status, 401);
            assert_eq!(reason, "Incorrect API key provided");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn empty_choices_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = model(&server)
        .invoke(&[ChatMessage::human("hi")])
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::InvalidResponse { .. }));
}
