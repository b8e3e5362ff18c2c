//! # Tandem A2A - Agent2Agent Protocol Client
//!
//! This crate provides the client side of the A2A (Agent2Agent) protocol
//! used by tandem demos to talk to remote agents over JSON-RPC.
//!
//! ## Features
//!
//! - **Core Types**: Task, Message, Part, Artifact and AgentCard types
//! - **Discovery**: Agent card resolution with legacy path fallback
//! - **Client**: Transport negotiation, `message/send` and SSE `message/stream`
//! - **Extraction**: Folding a response stream into plain text plus correlation ids
//!
//! ## Example: Talking to an Agent
//!
//! ```rust,no_run
//! use tandem_a2a::{CardResolver, ClientConfig, ClientFactory, Message, process_response};
//!
//! # async fn example() -> tandem_a2a::A2aResult<()> {
//! let config = ClientConfig::default();
//! let card = CardResolver::new(config.http.clone(), "http://localhost:10000")?
//!     .get_agent_card()
//!     .await?;
//! let client = ClientFactory::new(config).create(card)?;
//!
//! let first = process_response(client.send_message(Message::user("Hello")).await?).await?;
//!
//! // Continue the same conversation
//! let follow_up = Message::user("Tell me more")
//!     .with_context_id(first.context_id)
//!     .with_task_id(first.task_id);
//! let second = process_response(client.send_message(follow_up).await?).await?;
//! println!("{}", second.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod extract;
pub mod jsonrpc;
pub mod resolver;
pub mod types;

pub use client::{
    A2aClient, ClientConfig, ClientEvent, ClientEventStream, ClientFactory, DEFAULT_TIMEOUT,
    SseDecoder, TaskTracker,
};
pub use error::{A2aError, A2aResult};
pub use extract::{NO_RESPONSE_CONTENT, ResponseSummary, extract_text_from_parts, process_response};
pub use resolver::{AGENT_CARD_WELL_KNOWN_PATH, CardResolver, LEGACY_AGENT_CARD_PATH};
pub use types::{
    AgentCapabilities, AgentCard, AgentInterface, AgentSkill, Artifact, DataPart, FileContent,
    FilePart, Message, MessageSendConfiguration, MessageSendParams, Part, Role, StreamResult,
    StructuredPart, Task, TaskArtifactUpdateEvent, TaskState, TaskStatus, TaskStatusUpdateEvent,
    TextPart, TransportProtocol, UpdateEvent,
};
