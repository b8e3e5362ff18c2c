//! # Tandem Graph
//!
//! A small state-graph executor for agent workflows.
//!
//! - **[`StateGraph`]**: add nodes, edges and conditional routes, then
//!   [`compile`](StateGraph::compile) into a validated [`CompiledGraph`]
//! - **[`GraphState`]**: nodes return updates that the state folds in; the
//!   conversation in [`MessagesState`] is append-only
//! - **Prebuilt**: [`ToolNode`], [`tools_condition`] and [`create_react_agent`]
//!
//! ## Example
//!
//! ```rust
//! use tandem_core::ChatMessage;
//! use tandem_graph::{END, MessagesState, NodeResult, StateGraph, node_fn};
//!
//! async fn echo(state: MessagesState) -> NodeResult<Vec<ChatMessage>> {
//!     let last = state.messages.last().map(|m| m.content().to_string());
//!     Ok(vec![ChatMessage::ai(last.unwrap_or_default())])
//! }
//!
//! # async fn example() -> tandem_graph::GraphResult<()> {
//! let graph = StateGraph::<MessagesState>::new()
//!     .add_node("echo", node_fn(echo))
//!     .set_entry_point("echo")
//!     .add_edge("echo", END)
//!     .compile()?;
//!
//! let result = graph.invoke(MessagesState::from_query("hello")).await?;
//! assert_eq!(result.messages.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod graph;
pub mod prebuilt;
pub mod state;

pub use error::{BoxError, GraphError, GraphResult, NodeResult};
pub use graph::{
    CompiledGraph, DEFAULT_RECURSION_LIMIT, END, FnNode, Node, START, StateGraph, node_fn,
};
pub use prebuilt::{
    AGENT_NODE, ModelNode, TOOLS_NODE, ToolNode, create_react_agent, tools_condition,
};
pub use state::{GraphState, HasMessages, MessagesState, add_messages};
