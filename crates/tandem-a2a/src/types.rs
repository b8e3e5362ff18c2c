//! A2A Protocol Core Types
//!
//! This module defines the data types of the Agent2Agent (A2A) protocol
//! (v0.3 JSON shapes, camelCase on the wire) needed by a JSON-RPC client.
//!
//! Objects that can appear as a JSON-RPC result are discriminated by their
//! `kind` field (`task`, `message`, `status-update`, `artifact-update`); see
//! [`StreamResult`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Task Types
// ============================================================================

/// A task represents a unit of work performed by a remote agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,

    /// Context the task belongs to; echoed back on follow-up messages
    pub context_id: String,

    /// Current status of the task
    pub status: TaskStatus,

    /// Artifacts produced by the task
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,

    /// Messages exchanged during the task
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Message>,

    /// Additional metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl Task {
    /// Create a new submitted task
    pub fn new(id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            context_id: context_id.into(),
            status: TaskStatus::new(TaskState::Submitted),
            artifacts: Vec::new(),
            history: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.state.is_terminal()
    }

    /// Find an artifact by id
    pub fn artifact_mut(&mut self, artifact_id: &str) -> Option<&mut Artifact> {
        self.artifacts
            .iter_mut()
            .find(|a| a.artifact_id == artifact_id)
    }
}

/// Status of a task at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    /// Lifecycle state
    pub state: TaskState,

    /// Optional agent message accompanying the status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// When the status was recorded (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl TaskStatus {
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            message: None,
            timestamp: Some(Utc::now().to_rfc3339()),
        }
    }
}

/// Task lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    Completed,
    Canceled,
    Failed,
    Rejected,
    AuthRequired,
    Unknown,
}

impl TaskState {
    /// Whether no further updates are expected for the task
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Canceled | TaskState::Failed | TaskState::Rejected
        )
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::Completed => "completed",
            TaskState::Canceled => "canceled",
            TaskState::Failed => "failed",
            TaskState::Rejected => "rejected",
            TaskState::AuthRequired => "auth-required",
            TaskState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// A message exchanged between a client and a remote agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier
    pub message_id: String,

    /// Role of the message sender
    pub role: Role,

    /// Content parts of the message
    pub parts: Vec<Part>,

    /// Context the message belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Task the message continues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// References to related tasks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_task_ids: Vec<String>,

    /// Additional metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl Message {
    /// Create a user message with a single text part and a fresh id
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role(Role::User, text)
    }

    /// Create an agent message with a single text part and a fresh id
    pub fn agent(text: impl Into<String>) -> Self {
        Self::with_role(Role::Agent, text)
    }

    fn with_role(role: Role, text: impl Into<String>) -> Self {
        Self {
            message_id: Uuid::new_v4().simple().to_string(),
            role,
            parts: vec![Part::text(text)],
            context_id: None,
            task_id: None,
            reference_task_ids: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// Attach a context id
    pub fn with_context_id(mut self, context_id: Option<String>) -> Self {
        self.context_id = context_id;
        self
    }

    /// Attach a task id
    pub fn with_task_id(mut self, task_id: Option<String>) -> Self {
        self.task_id = task_id;
        self
    }

    /// Add a part to the message
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from a user (or client agent acting on behalf of a user)
    User,

    /// Message from an agent
    Agent,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Agent => write!(f, "agent"),
        }
    }
}

// ============================================================================
// Part Types
// ============================================================================

/// A content part within a message or artifact.
///
/// Remote agents are not uniform: most send `kind`-tagged parts, but some
/// wrap them or use older shapes. Anything that does not match the tagged
/// form is kept verbatim as [`Part::Loose`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// A well-formed `kind`-tagged part
    Structured(StructuredPart),

    /// Any other JSON shape
    Loose(Value),
}

impl Part {
    /// Create a text part
    pub fn text(content: impl Into<String>) -> Self {
        Part::Structured(StructuredPart::Text(TextPart {
            text: content.into(),
            metadata: HashMap::new(),
        }))
    }

    /// Create a data part
    pub fn data(data: Value) -> Self {
        Part::Structured(StructuredPart::Data(DataPart {
            data,
            metadata: HashMap::new(),
        }))
    }

    /// Create a file part referencing a URI
    pub fn file_uri(uri: impl Into<String>, mime_type: Option<String>) -> Self {
        Part::Structured(StructuredPart::File(FilePart {
            file: FileContent::Uri {
                uri: uri.into(),
                name: None,
                mime_type,
            },
            metadata: HashMap::new(),
        }))
    }
}

/// `kind`-tagged content part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StructuredPart {
    Text(TextPart),
    File(FilePart),
    Data(DataPart),
}

/// Text content part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPart {
    pub text: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

/// File content part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePart {
    pub file: FileContent,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

/// File payload, either inline bytes or a URI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileContent {
    Bytes {
        bytes: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
    Uri {
        uri: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
}

/// Structured data part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPart {
    pub data: Value,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

// ============================================================================
// Artifact Types
// ============================================================================

/// An artifact produced as output from a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Unique identifier for the artifact
    pub artifact_id: String,

    /// Content parts of the artifact
    pub parts: Vec<Part>,

    /// Human-readable name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Description of the artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Additional metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl Artifact {
    /// Create a text artifact
    pub fn text(artifact_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            parts: vec![Part::text(content)],
            name: None,
            description: None,
            metadata: HashMap::new(),
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// ============================================================================
// Agent Card Types
// ============================================================================

/// Agent Card for capability discovery
///
/// The Agent Card is a JSON document that describes an agent's capabilities,
/// skills, and the transports it can be reached over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// Human-readable name of the agent
    pub name: String,

    /// Description of the agent
    #[serde(default)]
    pub description: String,

    /// URL of the preferred transport endpoint
    pub url: String,

    /// Agent version
    #[serde(default)]
    pub version: String,

    /// A2A protocol version the card was written for
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,

    /// Transport available at `url`
    #[serde(default)]
    pub preferred_transport: TransportProtocol,

    /// Further transport endpoints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_interfaces: Vec<AgentInterface>,

    /// Agent capabilities
    #[serde(default)]
    pub capabilities: AgentCapabilities,

    /// Accepted input media types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_input_modes: Vec<String>,

    /// Produced output media types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_output_modes: Vec<String>,

    /// Skills the agent can perform
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<AgentSkill>,
}

fn default_protocol_version() -> String {
    "0.3.0".to_string()
}

impl AgentCard {
    /// Create a new agent card with required fields
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            url: url.into(),
            version: "1.0.0".to_string(),
            protocol_version: default_protocol_version(),
            preferred_transport: TransportProtocol::JsonRpc,
            additional_interfaces: Vec::new(),
            capabilities: AgentCapabilities::default(),
            default_input_modes: vec!["text".to_string()],
            default_output_modes: vec!["text".to_string()],
            skills: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Enable streaming capability
    pub fn with_streaming(mut self) -> Self {
        self.capabilities.streaming = true;
        self
    }

    /// Set the preferred transport
    pub fn with_preferred_transport(mut self, transport: TransportProtocol) -> Self {
        self.preferred_transport = transport;
        self
    }

    /// Add an additional interface
    pub fn with_interface(mut self, url: impl Into<String>, transport: TransportProtocol) -> Self {
        self.additional_interfaces.push(AgentInterface {
            url: url.into(),
            transport,
        });
        self
    }

    /// Add a skill
    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }

    /// All advertised interfaces in server preference order
    pub fn interfaces(&self) -> Vec<AgentInterface> {
        let mut interfaces = vec![AgentInterface {
            url: self.url.clone(),
            transport: self.preferred_transport,
        }];
        for interface in &self.additional_interfaces {
            if !interfaces.contains(interface) {
                interfaces.push(interface.clone());
            }
        }
        interfaces
    }
}

/// Wire transport advertised by an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransportProtocol {
    #[default]
    #[serde(rename = "JSONRPC")]
    JsonRpc,
    #[serde(rename = "GRPC")]
    Grpc,
    #[serde(rename = "HTTP+JSON")]
    HttpJson,
}

impl std::fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportProtocol::JsonRpc => write!(f, "JSONRPC"),
            TransportProtocol::Grpc => write!(f, "GRPC"),
            TransportProtocol::HttpJson => write!(f, "HTTP+JSON"),
        }
    }
}

/// A transport endpoint for the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInterface {
    pub url: String,
    pub transport: TransportProtocol,
}

/// Agent capabilities
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    /// Whether the agent supports streaming responses
    #[serde(default)]
    pub streaming: bool,

    /// Whether the agent supports push notifications
    #[serde(default)]
    pub push_notifications: bool,

    /// Whether the agent records task state transition history
    #[serde(default)]
    pub state_transition_history: bool,
}

/// A skill that the agent can perform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

impl AgentSkill {
    /// Create a new skill
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            examples: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

// ============================================================================
// Streaming Event Types
// ============================================================================

/// Event for task status updates during streaming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusUpdateEvent {
    pub task_id: String,

    pub context_id: String,

    pub status: TaskStatus,

    /// Whether this is the last event of the stream
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

/// Event for artifact updates during streaming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskArtifactUpdateEvent {
    pub task_id: String,

    pub context_id: String,

    pub artifact: Artifact,

    /// Append the parts to an existing artifact with the same id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,

    /// Whether this is the final chunk of the artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_chunk: Option<bool>,
}

/// A task update received alongside the task it applies to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum UpdateEvent {
    #[serde(rename = "status-update")]
    Status(TaskStatusUpdateEvent),

    #[serde(rename = "artifact-update")]
    Artifact(TaskArtifactUpdateEvent),
}

impl UpdateEvent {
    pub fn task_id(&self) -> &str {
        match self {
            UpdateEvent::Status(e) => &e.task_id,
            UpdateEvent::Artifact(e) => &e.task_id,
        }
    }

    pub fn context_id(&self) -> &str {
        match self {
            UpdateEvent::Status(e) => &e.context_id,
            UpdateEvent::Artifact(e) => &e.context_id,
        }
    }
}

/// Any object a `message/send` or `message/stream` call can return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StreamResult {
    #[serde(rename = "task")]
    Task(Task),

    #[serde(rename = "message")]
    Message(Message),

    #[serde(rename = "status-update")]
    StatusUpdate(TaskStatusUpdateEvent),

    #[serde(rename = "artifact-update")]
    ArtifactUpdate(TaskArtifactUpdateEvent),
}

// ============================================================================
// Request Types
// ============================================================================

/// Parameters for `message/send` and `message/stream`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSendParams {
    pub message: Message,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<MessageSendConfiguration>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

/// Per-request delivery preferences
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSendConfiguration {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted_output_modes: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_length: Option<u32>,

    #[serde(default)]
    pub blocking: bool,
}

/// Parameters for `tasks/get`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQueryParams {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_length: Option<u32>,
}

/// Parameters for `tasks/cancel`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskIdParams {
    pub id: String,
}
