//! Bridge adapter exposing MCP server tools as Tandem tools
//!
//! Each tool discovered on a server becomes a [`BridgedTool`] that holds a
//! shared handle to the session and forwards calls to it. Graphs and chat
//! models only see the [`Tool`] trait.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tandem_core::{Tool, ToolError, ToolResult};
use tracing::{debug, info, warn};

use crate::client::McpClient;
use crate::config::McpServersConfig;
use crate::error::McpResult;

/// A tool from an MCP server, adapted to the [`Tool`] trait
pub struct BridgedTool {
    name: String,
    description: String,
    input_schema: Value,
    client: Arc<McpClient>,
}

impl std::fmt::Debug for BridgedTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgedTool")
            .field("name", &self.name)
            .field("server", &self.client.name())
            .finish()
    }
}

impl BridgedTool {
    /// Server the tool lives on
    pub fn server(&self) -> &str {
        self.client.name()
    }
}

#[async_trait]
impl Tool for BridgedTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        self.input_schema.clone()
    }

    async fn call(&self, arguments: Value) -> ToolResult<String> {
        let output = self
            .client
            .call_tool(&self.name, arguments)
            .await
            .map_err(|e| e.into_tool_error(&self.name))?;

        if output.is_error {
            return Err(ToolError::execution(&self.name, output.text));
        }

        Ok(output.text)
    }
}

/// Discover a session's tools and wrap each as a [`BridgedTool`]
pub async fn load_mcp_tools(client: Arc<McpClient>) -> McpResult<Vec<Arc<dyn Tool>>> {
    let tools = client.list_tools().await?;

    let bridged = tools
        .into_iter()
        .map(|info| {
            debug!(server = %client.name(), tool = %info.name, "Bridging MCP tool");
            Arc::new(BridgedTool {
                name: info.name.to_string(),
                description: info.description.as_deref().unwrap_or_default().to_string(),
                input_schema: Value::Object(info.input_schema.as_ref().clone()),
                client: Arc::clone(&client),
            }) as Arc<dyn Tool>
        })
        .collect::<Vec<_>>();

    info!(server = %client.name(), tools = bridged.len(), "Loaded MCP tools");
    Ok(bridged)
}

/// Sessions with several configured servers
#[derive(Debug)]
pub struct MultiServerMcpClient {
    clients: Vec<Arc<McpClient>>,
}

impl MultiServerMcpClient {
    /// Connect to every configured server; the first failure aborts
    pub async fn connect(config: &McpServersConfig) -> McpResult<Self> {
        let mut clients = Vec::with_capacity(config.len());

        for (name, server) in config.iter() {
            let client = McpClient::connect_stdio(name, server).await?;
            clients.push(Arc::new(client));
        }

        Ok(Self { clients })
    }

    /// Wrap already connected sessions
    pub fn from_clients(clients: impl IntoIterator<Item = McpClient>) -> Self {
        Self {
            clients: clients.into_iter().map(Arc::new).collect(),
        }
    }

    /// Union of every server's tools, in server order
    pub async fn tools(&self) -> McpResult<Vec<Arc<dyn Tool>>> {
        let mut tools = Vec::new();
        for client in &self.clients {
            tools.extend(load_mcp_tools(Arc::clone(client)).await?);
        }
        Ok(tools)
    }

    /// Close every session still owned solely by this client
    pub async fn shutdown(self) {
        for client in self.clients {
            match Arc::try_unwrap(client) {
                Ok(client) => {
                    let name = client.name().to_string();
                    if let Err(e) = client.shutdown().await {
                        warn!(server = %name, error = %e, "Failed to close MCP session");
                    }
                }
                Err(shared) => {
                    debug!(
                        server = %shared.name(),
                        "MCP session still referenced by tools, closing on drop"
                    );
                }
            }
        }
    }
}
