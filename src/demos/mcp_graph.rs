//! Hand-built tool graph over MCP tools.
//!
//! `call_model` and `tools` are wired explicitly instead of using the prebuilt
//! ReAct agent; each query's transcript is saved as JSON.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tandem_core::Tool;
use tandem_graph::{
    CompiledGraph, GraphResult, MessagesState, ModelNode, START, StateGraph, TOOLS_NODE, ToolNode,
    tools_condition,
};
use tandem_llm::{ChatModel, bind_tools, init_chat_model};
use tandem_mcp::{McpServersConfig, MultiServerMcpClient};
use tracing::{error, info};

use super::{DemoResult, MCP_SERVER_NAME};
use crate::config::DemoConfig;
use crate::output::{messages_to_json, save_to_file};

pub const CALL_MODEL_NODE: &str = "call_model";

/// `(query, output name)` pairs run by the demo
pub const GRAPH_QUERIES: [(&str, &str); 2] = [
    ("Roll 2d6", "dice_roll"),
    (
        "What is the exchange rate for British pounds to Euros?",
        "exchange_rate",
    ),
];

/// `START → call_model ⇄ tools`, ending when the model stops calling tools
pub fn build_tool_graph(
    model: Arc<dyn ChatModel>,
    tools: Vec<Arc<dyn Tool>>,
) -> GraphResult<CompiledGraph<MessagesState>> {
    let bound = bind_tools(model, &tools);

    StateGraph::<MessagesState>::new()
        .add_node(CALL_MODEL_NODE, ModelNode::new(bound))
        .add_node(TOOLS_NODE, ToolNode::new(tools))
        .add_edge(START, CALL_MODEL_NODE)
        .add_conditional_edges(CALL_MODEL_NODE, tools_condition)
        .add_edge(TOOLS_NODE, CALL_MODEL_NODE)
        .compile()
}

/// Run one query and save its transcript under `output_dir`
pub async fn run_query(
    graph: &CompiledGraph<MessagesState>,
    query: &str,
    name: &str,
    output_dir: &Path,
) -> DemoResult<PathBuf> {
    let state = graph.invoke(MessagesState::from_query(query)).await?;
    let json = messages_to_json(&state.messages)?;
    Ok(save_to_file(output_dir, &json, name)?)
}

/// Run every query, reporting each outcome; failures do not stop the batch.
///
/// Returns the paths of the transcripts that were saved.
pub async fn run_queries(
    graph: &CompiledGraph<MessagesState>,
    queries: &[(&str, &str)],
    output_dir: &Path,
) -> Vec<PathBuf> {
    let mut saved = Vec::new();

    for (query, name) in queries {
        match run_query(graph, query, name, output_dir).await {
            Ok(path) => {
                println!("✅ Saved {} response", name);
                saved.push(path);
            }
            Err(e) => {
                error!(query = %query, error = %e, "Query failed");
                println!("❌ Error processing '{}': {}", query, e);
            }
        }
    }

    saved
}

/// Connect to the configured MCP server and run [`GRAPH_QUERIES`]
pub async fn run_mcp_graph_demo(config: &DemoConfig) -> DemoResult<()> {
    let model = init_chat_model(&config.agent_model, &config.model_settings())?;

    let servers = McpServersConfig::new().with_server(MCP_SERVER_NAME, config.mcp_server_config()?);
    let client = MultiServerMcpClient::connect(&servers).await?;
    let tools = client.tools().await?;
    info!(tools = tools.len(), "Loaded MCP tools");

    let graph = build_tool_graph(model, tools)?;
    let saved = run_queries(&graph, &GRAPH_QUERIES, &config.output_dir).await;
    info!(saved = saved.len(), "Finished tool graph queries");

    drop(graph);
    client.shutdown().await;
    Ok(())
}
