//! MCP client session.
//!
//! An [`McpClient`] owns one initialized rmcp client session. Stdio servers
//! are spawned as child processes; any other rmcp client transport can be
//! passed to [`McpClient::connect`].

use rmcp::model::{CallToolRequestParam, ClientInfo, Implementation, RawContent, Tool as ToolInfo};
use rmcp::service::RunningService;
use rmcp::transport::{ConfigureCommandExt, IntoTransport, TokioChildProcess};
use rmcp::{RoleClient, ServiceExt};
use serde_json::{Value, json};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::McpServerConfig;
use crate::error::{McpError, McpResult};

/// Text output of a tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Text contents joined with newlines
    pub text: String,
    /// The server flagged the call as failed
    pub is_error: bool,
}

/// An initialized session with one MCP server
pub struct McpClient {
    name: String,
    service: RunningService<RoleClient, ClientInfo>,
}

impl std::fmt::Debug for McpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpClient").field("name", &self.name).finish()
    }
}

impl McpClient {
    /// Spawn a stdio server and perform the initialize handshake
    pub async fn connect_stdio(name: impl Into<String>, config: &McpServerConfig) -> McpResult<Self> {
        let name = name.into();
        config.validate(&name)?;

        debug!(
            server = %name,
            command = %config.command,
            args = ?config.args,
            "Spawning MCP server"
        );

        let command = Command::new(&config.command).configure(|cmd| {
            cmd.args(&config.args);
            cmd.envs(&config.env);
        });

        let transport = TokioChildProcess::new(command).map_err(|source| McpError::Spawn {
            server: name.clone(),
            source,
        })?;

        Self::connect(name, transport).await
    }

    /// Initialize a session over an arbitrary client transport
    pub async fn connect<T, E, A>(name: impl Into<String>, transport: T) -> McpResult<Self>
    where
        T: IntoTransport<RoleClient, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let name = name.into();

        let service = client_info()
            .serve(transport)
            .await
            .map_err(|e| McpError::ConnectionError(format!("{}: {}", name, e)))?;

        info!(server = %name, "Connected to MCP server");

        Ok(Self { name, service })
    }

    /// Configured server name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// List every tool the server exposes
    pub async fn list_tools(&self) -> McpResult<Vec<ToolInfo>> {
        let tools = self
            .service
            .peer()
            .list_all_tools()
            .await
            .map_err(McpError::from_service_error)?;

        debug!(server = %self.name, count = tools.len(), "Listed MCP tools");
        Ok(tools)
    }

    /// Call a tool with a JSON object of arguments
    pub async fn call_tool(&self, tool: &str, arguments: Value) -> McpResult<ToolOutput> {
        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => Default::default(),
            other => {
                return Err(McpError::InvalidParameters(format!(
                    "arguments for '{}' must be a JSON object, got {}",
                    tool, other
                )));
            }
        };

        let request: CallToolRequestParam =
            serde_json::from_value(json!({ "name": tool, "arguments": arguments }))?;

        debug!(server = %self.name, tool, "Calling MCP tool");

        let result = self
            .service
            .peer()
            .call_tool(request)
            .await
            .map_err(McpError::from_service_error)?;

        let text = result
            .content
            .iter()
            .filter_map(|c| match &c.raw {
                RawContent::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        let is_error = result.is_error.unwrap_or(false);

        if is_error {
            warn!(server = %self.name, tool, error = %text, "MCP tool reported an error");
        }

        Ok(ToolOutput { text, is_error })
    }

    /// Close the session and stop the server
    pub async fn shutdown(self) -> McpResult<()> {
        let name = self.name;
        self.service
            .cancel()
            .await
            .map_err(|e| McpError::ConnectionError(format!("{}: {}", name, e)))?;
        debug!(server = %name, "MCP session closed");
        Ok(())
    }
}

fn client_info() -> ClientInfo {
    ClientInfo {
        meta: None,
        protocol_version: Default::default(),
        capabilities: Default::default(),
        client_info: Implementation {
            name: "tandem-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_nonexistent_command() {
        let config = McpServerConfig::stdio("nonexistent_command_12345", Vec::<String>::new());
        let err = McpClient::connect_stdio("missing", &config).await.unwrap_err();
        assert!(
            matches!(err, McpError::Spawn { .. } | McpError::ConnectionError(_)),
            "unexpected error: {}",
            err
        );
    }

    #[tokio::test]
    async fn test_connect_empty_command() {
        let config = McpServerConfig::stdio("", Vec::<String>::new());
        let err = McpClient::connect_stdio("empty", &config).await.unwrap_err();
        assert!(matches!(err, McpError::InvalidConfig { .. }));
    }
}
