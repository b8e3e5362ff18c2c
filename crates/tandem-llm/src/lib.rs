//! # Tandem LLM
//!
//! Chat-model plumbing for Tandem graphs:
//!
//! - **[`ChatModel`]**: async trait producing the next AI turn, optionally with tool calls
//! - **[`OpenAiChatModel`]**: client for OpenAI-compatible `/chat/completions` APIs
//! - **[`init_chat_model`]**: build a model from a `provider:model` identifier
//! - **[`ChatPromptTemplate`]**: role-tagged templates with `{name}` placeholders
//!
//! ## Example
//!
//! ```rust,no_run
//! use tandem_llm::{ChatPromptTemplate, ModelSettings, init_chat_model};
//!
//! # async fn example() -> tandem_llm::LlmResult<()> {
//! let model = init_chat_model(
//!     "openai:gpt-3.5-turbo",
//!     &ModelSettings::new().with_api_key("sk-...").with_temperature(0.3),
//! )?;
//!
//! let prompt = ChatPromptTemplate::from_messages([
//!     ("system", "You are a helpful assistant."),
//!     ("human", "{question}"),
//! ])?;
//!
//! let reply = model
//!     .invoke(&prompt.format_messages([("question", "What is the OODA loop?")])?)
//!     .await?;
//! println!("{}", reply.content());
//! # Ok(())
//! # }
//! ```

pub mod error;
#[cfg(feature = "testing")]
pub mod mock;
pub mod model;
pub mod openai;
pub mod prompt;

pub use error::{LlmError, LlmResult};
#[cfg(feature = "testing")]
pub use mock::{MockChatModel, RecordedCall};
pub use model::{
    BoundModel, ChatModel, DEFAULT_PROVIDER, ModelId, ModelSettings, bind_tools, init_chat_model,
};
pub use openai::{DEFAULT_OPENAI_BASE_URL, OpenAiChatModel};
pub use prompt::{ChatPromptTemplate, PromptRole, PromptTemplate};
