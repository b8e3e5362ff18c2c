//! A2A Protocol Client
//!
//! This module provides a JSON-RPC client for interacting with A2A-compatible
//! agents.
//!
//! # Overview
//!
//! A client is created from an [`AgentCard`] by a [`ClientFactory`], which
//! negotiates the transport: the agent's interfaces are walked in the agent's
//! preference order (`url`/`preferredTransport` first, then
//! `additionalInterfaces`) and the first one this client supports is used.
//! Only JSON-RPC is implemented.
//!
//! [`A2aClient::send_message`] returns a stream of [`ClientEvent`]s:
//!
//! - `ClientEvent::Task(task, update)` while a task is progressing, where
//!   `task` is the client's aggregated view of the task and `update` is the
//!   status or artifact event that produced it (if any)
//! - `ClientEvent::Message(message)` when the agent answers directly
//!
//! # Connection Behavior
//!
//! | Operation | Default Timeout | Notes |
//! |-----------|-----------------|-------|
//! | Regular requests | 60 seconds | `message/send`, `tasks/get`, `tasks/cancel` |
//! | Streaming requests | 5 minutes | `message/stream` SSE connections |
//!
//! If the agent card advertises streaming and the client config enables it,
//! `message/stream` is used and the response is read as Server-Sent Events;
//! otherwise a single `message/send` call is made. The client does **not**
//! retry failed requests.
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use tandem_a2a::{CardResolver, ClientConfig, ClientFactory, Message};
//!
//! let config = ClientConfig::default();
//! let card = CardResolver::new(config.http.clone(), "http://localhost:10000")?
//!     .get_agent_card()
//!     .await?;
//! let client = ClientFactory::new(config).create(card)?;
//!
//! let mut events = client.send_message(Message::user("What is the OODA loop?")).await?;
//! while let Some(event) = events.next().await {
//!     println!("{:?}", event?);
//! }
//! ```

use crate::error::{A2aError, A2aResult};
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse, methods};
use crate::types::{
    AgentCard, Message, MessageSendParams, StreamResult, Task, TaskIdParams, TaskQueryParams,
    TransportProtocol, UpdateEvent,
};
use futures::Stream;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};
use url::Url;

/// Default timeout for HTTP requests
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for streaming requests
const STREAMING_TIMEOUT: Duration = Duration::from_secs(300);

/// Capacity of the channel between the SSE reader and the consumer
const STREAM_BUFFER: usize = 32;

/// Stream of events produced by [`A2aClient::send_message`]
pub type ClientEventStream = Pin<Box<dyn Stream<Item = A2aResult<ClientEvent>> + Send>>;

/// One item of a `send_message` response
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Task progress: the aggregated task plus the update that changed it
    Task(Task, Option<UpdateEvent>),

    /// A direct (final) message from the agent
    Message(Message),
}

/// Client-side settings shared by every client a factory creates
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// HTTP client used for all requests
    pub http: Client,

    /// Transports this client may use, in the client's preference order
    pub supported_transports: Vec<TransportProtocol>,

    /// Use `message/stream` when the agent supports it
    pub streaming: bool,

    /// Timeout applied to unary requests
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }
}

impl ClientConfig {
    /// Create a config with a fresh HTTP client using the given timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(format!("tandem-a2a/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build configured HTTP client, using defaults");
                Client::new()
            });

        Self {
            timeout,
            ..Self::new(http)
        }
    }

    /// Create a config around an existing HTTP client
    pub fn new(http: Client) -> Self {
        Self {
            http,
            supported_transports: vec![TransportProtocol::JsonRpc],
            streaming: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Restrict the transports the client may use
    pub fn with_supported_transports(mut self, transports: Vec<TransportProtocol>) -> Self {
        self.supported_transports = transports;
        self
    }

    /// Enable or disable streaming
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }
}

/// Creates [`A2aClient`]s from agent cards
#[derive(Debug, Clone)]
pub struct ClientFactory {
    config: ClientConfig,
}

impl ClientFactory {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Negotiate a transport with the agent and build a client for it
    pub fn create(&self, card: impl Into<Arc<AgentCard>>) -> A2aResult<A2aClient> {
        let card = card.into();
        let interfaces = card.interfaces();

        let selected = interfaces
            .iter()
            .find(|i| self.config.supported_transports.contains(&i.transport))
            .ok_or_else(|| A2aError::NoCompatibleTransport {
                offered: interfaces.iter().map(|i| i.transport).collect(),
                supported: self.config.supported_transports.clone(),
            })?;

        if selected.transport != TransportProtocol::JsonRpc {
            return Err(A2aError::NoCompatibleTransport {
                offered: vec![selected.transport],
                supported: vec![TransportProtocol::JsonRpc],
            });
        }

        let endpoint = Url::parse(&selected.url)?;
        let streaming = self.config.streaming && card.capabilities.streaming;

        debug!(
            agent = %card.name,
            endpoint = %endpoint,
            transport = %selected.transport,
            streaming,
            "Created A2A client"
        );

        Ok(A2aClient {
            endpoint,
            http: self.config.http.clone(),
            card,
            streaming,
            timeout: self.config.timeout,
        })
    }
}

/// A2A protocol client bound to one agent endpoint
#[derive(Clone)]
pub struct A2aClient {
    /// JSON-RPC endpoint of the agent
    endpoint: Url,
    /// HTTP client
    http: Client,
    /// Card the client was negotiated from
    card: Arc<AgentCard>,
    /// Whether `message/stream` is used
    streaming: bool,
    /// Timeout for unary requests
    timeout: Duration,
}

impl std::fmt::Debug for A2aClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("A2aClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("agent", &self.card.name)
            .field("streaming", &self.streaming)
            .finish()
    }
}

impl A2aClient {
    /// Get the JSON-RPC endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the agent card the client was created from
    pub fn card(&self) -> &Arc<AgentCard> {
        &self.card
    }

    /// Whether responses are streamed
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    // =========================================================================
    // Messaging
    // =========================================================================

    /// Send a message to the agent
    ///
    /// Creates a new task or continues the one named by `message.task_id` /
    /// `message.context_id`. The returned stream ends when the agent closes
    /// the response.
    pub async fn send_message(&self, message: Message) -> A2aResult<ClientEventStream> {
        let params = MessageSendParams {
            message,
            configuration: None,
            metadata: HashMap::new(),
        };

        if self.streaming {
            self.send_streaming(params).await
        } else {
            let result: StreamResult = self.call(methods::MESSAGE_SEND, params).await?;
            let event = TaskTracker::default().process(result);
            Ok(Box::pin(futures::stream::iter([Ok(event)])))
        }
    }

    async fn send_streaming(&self, params: MessageSendParams) -> A2aResult<ClientEventStream> {
        let request = JsonRpcRequest::new(methods::MESSAGE_STREAM, params);

        debug!(url = %self.endpoint, "Sending message with streaming");

        let response = self
            .http
            .post(self.endpoint.clone())
            .timeout(STREAMING_TIMEOUT)
            .header("Accept", "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                A2aError::connection_error(format!("Failed to send streaming request: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_response(status, response).await);
        }

        let (tx, rx) = tokio::sync::mpsc::channel::<A2aResult<ClientEvent>>(STREAM_BUFFER);

        // Spawn a task to process the SSE stream
        tokio::spawn(async move {
            use futures::StreamExt;

            let mut stream = response.bytes_stream();
            let mut decoder = SseDecoder::default();
            let mut tracker = TaskTracker::default();

            while let Some(chunk_result) = stream.next().await {
                match chunk_result {
                    Ok(chunk) => {
                        decoder.push(&chunk);

                        while let Some(result) = decoder.next_result() {
                            let event = result.map(|r| tracker.process(r));
                            if tx.send(event).await.is_err() {
                                // Receiver dropped
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        let _ = tx
                            .send(Err(A2aError::connection_error(format!(
                                "Stream error: {}",
                                e
                            ))))
                            .await;
                        return;
                    }
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    // =========================================================================
    // Task Management
    // =========================================================================

    /// Get the current state of a task
    pub async fn get_task(&self, task_id: impl Into<String>) -> A2aResult<Task> {
        let params = TaskQueryParams {
            id: task_id.into(),
            history_length: None,
        };

        debug!(task_id = %params.id, "Fetching task");

        self.call(methods::TASKS_GET, params).await
    }

    /// Cancel a running task
    pub async fn cancel_task(&self, task_id: impl Into<String>) -> A2aResult<Task> {
        let params = TaskIdParams { id: task_id.into() };

        debug!(task_id = %params.id, "Cancelling task");

        let task: Task = self.call(methods::TASKS_CANCEL, params).await?;
        info!(task_id = %task.id, state = %task.status.state, "Task cancelled");
        Ok(task)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Make a unary JSON-RPC call
    async fn call<P, T>(&self, method: &'static str, params: P) -> A2aResult<T>
    where
        P: Serialize,
        T: serde::de::DeserializeOwned,
    {
        let request = JsonRpcRequest::new(method, params);

        debug!(url = %self.endpoint, method, "Calling agent");

        let response = self
            .http
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    A2aError::Timeout {
                        timeout_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    A2aError::connection_error(format!("Failed to call {}: {}", method, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_response(status, response).await);
        }

        let rpc: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| A2aError::protocol_error(format!("Failed to parse response: {}", e)))?;

        rpc.into_result()
    }

    /// Handle error responses from the agent
    async fn handle_error_response(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> A2aError {
        let error_text = response.text().await.unwrap_or_default();

        match status {
            StatusCode::NOT_FOUND => A2aError::agent_not_found(self.endpoint.to_string()),
            StatusCode::UNAUTHORIZED => A2aError::AuthenticationRequired,
            StatusCode::FORBIDDEN => A2aError::NotAuthorized { reason: error_text },
            StatusCode::TOO_MANY_REQUESTS => A2aError::RateLimitExceeded {
                retry_after_seconds: 60,
            },
            StatusCode::INTERNAL_SERVER_ERROR => A2aError::internal_error(error_text),
            _ => A2aError::protocol_error(format!("HTTP {}: {}", status, error_text)),
        }
    }
}

// =============================================================================
// Task tracking
// =============================================================================

/// Folds `message/send` / `message/stream` results into [`ClientEvent`]s,
/// keeping an aggregated view of the current task.
#[derive(Debug, Default)]
pub struct TaskTracker {
    task: Option<Task>,
}

impl TaskTracker {
    /// The aggregated task, if any result has mentioned one
    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    /// Apply one result and return the event to surface to the caller
    pub fn process(&mut self, result: StreamResult) -> ClientEvent {
        match result {
            StreamResult::Message(message) => ClientEvent::Message(message),
            StreamResult::Task(task) => {
                self.task = Some(task.clone());
                ClientEvent::Task(task, None)
            }
            StreamResult::StatusUpdate(update) => {
                let task = self.seed(&update.task_id, &update.context_id);
                if let Some(message) = &update.status.message {
                    task.history.push(message.clone());
                }
                task.status = update.status.clone();
                ClientEvent::Task(task.clone(), Some(UpdateEvent::Status(update)))
            }
            StreamResult::ArtifactUpdate(update) => {
                let task = self.seed(&update.task_id, &update.context_id);
                let artifact = &update.artifact;
                match task.artifact_mut(&artifact.artifact_id) {
                    Some(existing) if update.append == Some(true) => {
                        existing.parts.extend(artifact.parts.iter().cloned());
                    }
                    Some(existing) => *existing = artifact.clone(),
                    None => task.artifacts.push(artifact.clone()),
                }
                ClientEvent::Task(task.clone(), Some(UpdateEvent::Artifact(update)))
            }
        }
    }

    /// Current task, or a submitted placeholder when an update arrives first
    fn seed(&mut self, task_id: &str, context_id: &str) -> &mut Task {
        self.task.get_or_insert_with(|| {
            debug!(task_id, "Update received before task, seeding placeholder");
            Task::new(task_id, context_id)
        })
    }
}

// =============================================================================
// SSE decoding
// =============================================================================

/// Incremental Server-Sent Events decoder for `message/stream` responses.
///
/// Bytes are buffered until they form valid UTF-8, so multi-byte characters
/// split across chunks survive. LF, CRLF and bare CR line endings are all
/// accepted, including a CRLF pair split across two chunks.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    buffer: String,
    /// Last character pushed was a CR, so a leading LF belongs to it
    after_cr: bool,
}

impl SseDecoder {
    /// Feed raw bytes from the response body
    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);

        let valid = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(e) => {
                if e.error_len().is_some() {
                    warn!(error = %e, "Invalid UTF-8 in SSE stream, dropping chunk");
                    self.pending.clear();
                    return;
                }
                e.valid_up_to()
            }
        };

        let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
        self.pending.drain(..valid);
        self.push_normalized(&text);
    }

    fn push_normalized(&mut self, text: &str) {
        for c in text.chars() {
            if std::mem::take(&mut self.after_cr) && c == '\n' {
                continue;
            }
            if c == '\r' {
                self.buffer.push('\n');
                self.after_cr = true;
            } else {
                self.buffer.push(c);
            }
        }
    }

    /// Next decoded JSON-RPC result, if a complete event is buffered
    pub fn next_result(&mut self) -> Option<A2aResult<StreamResult>> {
        loop {
            let data = parse_sse_event(&mut self.buffer)?;
            if let Some(data) = data {
                return Some(decode_event_data(&data));
            }
        }
    }
}

/// Remove the next complete event from `buffer`.
///
/// Returns `None` when no complete event is buffered, `Some(None)` for an
/// event without data (comments, keep-alives) and `Some(Some(data))` otherwise.
fn parse_sse_event(buffer: &mut String) -> Option<Option<String>> {
    // SSE events are separated by blank lines
    let event_end = buffer.find("\n\n")?;
    let event_str = buffer[..event_end].to_string();
    buffer.drain(..event_end + 2);

    let mut data = String::new();

    for line in event_str.lines() {
        if line.starts_with(':') {
            continue;
        }
        if let Some(value) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(value.strip_prefix(' ').unwrap_or(value));
        }
    }

    if data.is_empty() {
        Some(None)
    } else {
        Some(Some(data))
    }
}

fn decode_event_data(data: &str) -> A2aResult<StreamResult> {
    let response: JsonRpcResponse = serde_json::from_str(data).map_err(|e| {
        warn!(error = %e, "Failed to parse SSE event");
        A2aError::protocol_error(format!("Failed to parse streaming event: {}", e))
    })?;
    response.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Artifact, TaskArtifactUpdateEvent, TaskState, TaskStatus, TaskStatusUpdateEvent,
    };

    const ARTIFACT_EVENT: &str = r#"{"jsonrpc":"2.0","id":"1","result":{"kind":"artifact-update","taskId":"t-1","contextId":"c-1","artifact":{"artifactId":"a-1","parts":[{"kind":"text","text":"done"}]}}}"#;

    fn card() -> AgentCard {
        AgentCard::new("Test Agent", "http://localhost:10000/")
    }

    #[test]
    fn test_factory_selects_jsonrpc() {
        let client = ClientFactory::new(ClientConfig::default())
            .create(card())
            .unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:10000/");
        assert!(!client.is_streaming());
    }

    #[test]
    fn test_factory_follows_agent_preference() {
        let card = AgentCard::new("Test Agent", "http://localhost:10000/grpc")
            .with_preferred_transport(TransportProtocol::Grpc)
            .with_interface("http://localhost:10000/rpc", TransportProtocol::JsonRpc)
            .with_streaming();

        let client = ClientFactory::new(ClientConfig::default())
            .create(card)
            .unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:10000/rpc");
        assert!(client.is_streaming());
    }

    #[test]
    fn test_factory_rejects_incompatible_card() {
        let card = card().with_preferred_transport(TransportProtocol::Grpc);
        let err = ClientFactory::new(ClientConfig::default())
            .create(card)
            .unwrap_err();
        assert!(matches!(err, A2aError::NoCompatibleTransport { .. }));
    }

    #[test]
    fn test_streaming_disabled_by_config() {
        let config = ClientConfig::default().with_streaming(false);
        let client = ClientFactory::new(config)
            .create(card().with_streaming())
            .unwrap();
        assert!(!client.is_streaming());
    }

    #[test]
    fn test_decoder_complete_event() {
        let mut decoder = SseDecoder::default();
        decoder.push(format!("data: {}\n\n", ARTIFACT_EVENT).as_bytes());

        let result = decoder.next_result().unwrap().unwrap();
        assert!(matches!(result, StreamResult::ArtifactUpdate(_)));
        assert!(decoder.next_result().is_none());
    }

    #[test]
    fn test_decoder_incomplete_event() {
        let mut decoder = SseDecoder::default();
        decoder.push(b"data: {\"jsonrpc\":\"2.0\"");
        assert!(decoder.next_result().is_none());
    }

    #[test]
    fn test_decoder_crlf_split_across_chunks() {
        let mut decoder = SseDecoder::default();
        let event = format!("data: {}\r\n\r\n", ARTIFACT_EVENT);
        let (a, b) = event.as_bytes().split_at(event.len() - 3);
        decoder.push(a);
        assert!(decoder.next_result().is_none());
        decoder.push(b);
        assert!(decoder.next_result().unwrap().is_ok());
    }

    #[test]
    fn test_decoder_bare_cr_separators() {
        let mut decoder = SseDecoder::default();
        decoder.push(format!(": ping\r\rdata: {}\r\r", ARTIFACT_EVENT).as_bytes());
        assert!(decoder.next_result().unwrap().is_ok());
        assert!(decoder.next_result().is_none());
    }

    #[test]
    fn test_config_reports_its_timeout() {
        let config = ClientConfig::with_timeout(Duration::from_secs(15));
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(ClientConfig::default().timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_decoder_skips_keepalive_comments() {
        let mut decoder = SseDecoder::default();
        decoder.push(format!(": ping\n\ndata: {}\n\n", ARTIFACT_EVENT).as_bytes());
        assert!(decoder.next_result().unwrap().is_ok());
    }

    #[test]
    fn test_decoder_multibyte_split() {
        let mut decoder = SseDecoder::default();
        let event = r#"data: {"jsonrpc":"2.0","id":"1","result":{"kind":"message","messageId":"m","role":"agent","parts":[{"kind":"text","text":"café"}]}}"#;
        let full = format!("{}\n\n", event);
        let split = full.find('é').unwrap() + 1;
        decoder.push(&full.as_bytes()[..split]);
        decoder.push(&full.as_bytes()[split..]);

        match decoder.next_result().unwrap().unwrap() {
            StreamResult::Message(m) => assert_eq!(m.parts, vec![crate::types::Part::text("café")]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_decoder_surfaces_jsonrpc_error() {
        let mut decoder = SseDecoder::default();
        decoder.push(b"data: {\"jsonrpc\":\"2.0\",\"id\":\"1\",\"error\":{\"code\":-32603,\"message\":\"boom\"}}\n\n");
        let err = decoder.next_result().unwrap().unwrap_err();
        assert!(matches!(err, A2aError::JsonRpc { code: -32603, .. }));
    }

    #[test]
    fn test_tracker_seeds_task_from_update() {
        let mut tracker = TaskTracker::default();
        let event = tracker.process(StreamResult::StatusUpdate(TaskStatusUpdateEvent {
            task_id: "t-1".to_string(),
            context_id: "c-1".to_string(),
            status: TaskStatus::new(TaskState::Working),
            is_final: false,
        }));

        match event {
            ClientEvent::Task(task, Some(UpdateEvent::Status(_))) => {
                assert_eq!(task.id, "t-1");
                assert_eq!(task.context_id, "c-1");
                assert_eq!(task.status.state, TaskState::Working);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_tracker_appends_artifact_chunks() {
        let mut tracker = TaskTracker::default();
        tracker.process(StreamResult::Task(Task::new("t-1", "c-1")));

        let chunk = |text: &str, append: Option<bool>| {
            StreamResult::ArtifactUpdate(TaskArtifactUpdateEvent {
                task_id: "t-1".to_string(),
                context_id: "c-1".to_string(),
                artifact: Artifact::text("a-1", text),
                append,
                last_chunk: None,
            })
        };

        tracker.process(chunk("Hello", None));
        tracker.process(chunk(", world", Some(true)));

        let task = tracker.task().unwrap();
        assert_eq!(task.artifacts.len(), 1);
        assert_eq!(task.artifacts[0].parts.len(), 2);

        tracker.process(chunk("replaced", None));
        assert_eq!(tracker.task().unwrap().artifacts[0].parts.len(), 1);
    }
}
