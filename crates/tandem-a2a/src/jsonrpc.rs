//! JSON-RPC 2.0 envelopes used by the A2A JSON-RPC transport.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{A2aError, A2aResult};

pub const JSONRPC_VERSION: &str = "2.0";

/// A2A JSON-RPC method names
pub mod methods {
    pub const MESSAGE_SEND: &str = "message/send";
    pub const MESSAGE_STREAM: &str = "message/stream";
    pub const TASKS_GET: &str = "tasks/get";
    pub const TASKS_CANCEL: &str = "tasks/cancel";
}

/// Outgoing JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<P> {
    pub jsonrpc: &'static str,
    pub id: String,
    pub method: &'static str,
    pub params: P,
}

impl<P: Serialize> JsonRpcRequest<P> {
    /// Create a request with a fresh id
    pub fn new(method: &'static str, params: P) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: Uuid::new_v4().to_string(),
            method,
            params,
        }
    }
}

/// Incoming JSON-RPC response; exactly one of `result` / `error` is set
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Decode the result into `T`, surfacing JSON-RPC errors as [`A2aError::JsonRpc`]
    pub fn into_result<T: DeserializeOwned>(self) -> A2aResult<T> {
        if let Some(error) = self.error {
            return Err(error.into());
        }
        let result = self
            .result
            .ok_or_else(|| A2aError::protocol_error("JSON-RPC response has neither result nor error"))?;
        Ok(serde_json::from_value(result)?)
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Message, MessageSendParams, StreamResult};
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_request_envelope() {
        let params = MessageSendParams {
            message: Message::user("hi"),
            configuration: None,
            metadata: HashMap::new(),
        };
        let request = JsonRpcRequest::new(methods::MESSAGE_SEND, params);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "message/send");
        assert_eq!(value["params"]["message"]["role"], "user");
        assert!(value["id"].is_string());
    }

    #[test]
    fn test_response_result() {
        let response: JsonRpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": "1",
            "result": {
                "kind": "message",
                "messageId": "m-1",
                "role": "agent",
                "parts": [{"kind": "text", "text": "hello"}]
            }
        }))
        .unwrap();

        let result: StreamResult = response.into_result().unwrap();
        assert!(matches!(result, StreamResult::Message(_)));
    }

    #[test]
    fn test_response_error() {
        let response: JsonRpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": "1",
            "error": {"code": -32601, "message": "Method not found"}
        }))
        .unwrap();

        let err = response.into_result::<StreamResult>().unwrap_err();
        assert!(matches!(err, A2aError::JsonRpc { code: -32601, .. }));
    }

    #[test]
    fn test_response_without_result_or_error() {
        let response: JsonRpcResponse =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": "1"})).unwrap();
        let err = response.into_result::<StreamResult>().unwrap_err();
        assert!(matches!(err, A2aError::ProtocolError { .. }));
    }
}
