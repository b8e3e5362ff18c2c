//! Prebuilt nodes for tool-calling agents.

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tandem_core::{ChatMessage, Tool, ToolCall, find_tool};
use tandem_llm::{BoundModel, ChatModel, bind_tools};
use tracing::{debug, warn};

use crate::error::{GraphResult, NodeResult};
use crate::graph::{CompiledGraph, END, Node, StateGraph};
use crate::state::{GraphState, HasMessages, MessagesState};

/// Conventional name of the tool-executing node
pub const TOOLS_NODE: &str = "tools";

/// Conventional name of the model node in [`create_react_agent`]
pub const AGENT_NODE: &str = "agent";

/// Calls a tool-bound model on the conversation and appends its reply
pub struct ModelNode {
    model: BoundModel,
}

impl ModelNode {
    pub fn new(model: BoundModel) -> Self {
        Self { model }
    }
}

#[async_trait]
impl<S> Node<S> for ModelNode
where
    S: GraphState + HasMessages,
    S::Update: From<Vec<ChatMessage>>,
{
    async fn run(&self, state: &S) -> NodeResult<S::Update> {
        let reply = self.model.invoke(state.messages()).await?;
        debug!(tool_calls = reply.tool_calls().len(), "Model replied");
        Ok(vec![reply].into())
    }
}

/// Executes every tool call of the last AI message.
///
/// Unknown tools and tool failures are reported back to the model as tool
/// messages rather than failing the graph.
pub struct ToolNode {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolNode {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    async fn execute(&self, call: &ToolCall) -> ChatMessage {
        let Some(tool) = find_tool(&self.tools, &call.name) else {
            let available: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
            warn!(tool = %call.name, "Model requested an unknown tool");
            return ChatMessage::tool(
                format!(
                    "Error: {} is not a valid tool, try one of [{}].",
                    call.name,
                    available.join(", ")
                ),
                &call.id,
                &call.name,
            );
        };

        debug!(tool = %call.name, call_id = %call.id, "Executing tool call");

        match tool.call(call.arguments.clone()).await {
            Ok(output) => ChatMessage::tool(output, &call.id, &call.name),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool call failed");
                ChatMessage::tool(
                    format!("Error: {}\n Please fix your mistakes.", e),
                    &call.id,
                    &call.name,
                )
            }
        }
    }
}

#[async_trait]
impl<S> Node<S> for ToolNode
where
    S: GraphState + HasMessages,
    S::Update: From<Vec<ChatMessage>>,
{
    async fn run(&self, state: &S) -> NodeResult<S::Update> {
        let last = state
            .last_message()
            .filter(|m| m.is_ai())
            .ok_or("No AI message found in input")?;

        let results = join_all(last.tool_calls().iter().map(|call| self.execute(call))).await;
        Ok(results.into())
    }
}

/// Route to [`TOOLS_NODE`] when the last AI message requests tools, else to [`END`]
pub fn tools_condition<S: HasMessages>(state: &S) -> String {
    match state.last_message() {
        Some(message) if message.is_ai() && message.has_tool_calls() => TOOLS_NODE.to_string(),
        _ => END.to_string(),
    }
}

/// Build a model ⇄ tools loop that stops once the model answers without
/// requesting tools.
pub fn create_react_agent(
    model: Arc<dyn ChatModel>,
    tools: Vec<Arc<dyn Tool>>,
) -> GraphResult<CompiledGraph<MessagesState>> {
    let bound = bind_tools(model, &tools);

    let graph = StateGraph::<MessagesState>::new()
        .add_node(AGENT_NODE, ModelNode::new(bound))
        .set_entry_point(AGENT_NODE);

    let graph = if tools.is_empty() {
        graph.add_edge(AGENT_NODE, END)
    } else {
        graph
            .add_node(TOOLS_NODE, ToolNode::new(tools))
            .add_conditional_edges(AGENT_NODE, tools_condition)
            .add_edge(TOOLS_NODE, AGENT_NODE)
    };

    graph.compile()
}
