//! Prebuilt ReAct agent over tools loaded from one stdio MCP server.

use std::sync::Arc;
use tandem_graph::{GraphResult, MessagesState, create_react_agent};
use tandem_llm::init_chat_model;
use tandem_mcp::{McpClient, load_mcp_tools};
use tracing::{info, warn};

use super::{DemoResult, MCP_SERVER_NAME};
use crate::config::DemoConfig;
use crate::output::messages_to_json;

pub const AGENT_QUERY: &str = "What is the exchange rate for dollars to renminbi?";

/// Format the outcome of one agent run the way the demo prints it
pub fn format_agent_outcome(outcome: &GraphResult<MessagesState>) -> String {
    match outcome {
        Ok(state) => match messages_to_json(&state.messages) {
            Ok(json) => format!("✅ Agent Response:\n{}", json),
            Err(e) => format!("❌ Error: {}", e),
        },
        Err(e) => format!("❌ Error: {}", e),
    }
}

pub async fn run_mcp_agent_demo(config: &DemoConfig) -> DemoResult<()> {
    let server = config.mcp_server_config()?;
    let client = Arc::new(McpClient::connect_stdio(MCP_SERVER_NAME, &server).await?);
    let tools = load_mcp_tools(client.clone()).await?;
    info!(tools = tools.len(), server = MCP_SERVER_NAME, "Loaded MCP tools");

    let model = init_chat_model(&config.agent_model, &config.model_settings())?;
    let agent = create_react_agent(model, tools)?;

    let outcome = agent.invoke(MessagesState::from_query(AGENT_QUERY)).await;
    println!("{}", format_agent_outcome(&outcome));

    drop(agent);
    match Arc::try_unwrap(client) {
        Ok(client) => client.shutdown().await?,
        Err(_) => warn!(server = MCP_SERVER_NAME, "MCP client still shared, dropping"),
    }

    Ok(())
}
