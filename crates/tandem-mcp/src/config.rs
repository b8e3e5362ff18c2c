//! MCP server launch configuration.
//!
//! Mirrors the `{"name": {"command": ..., "args": [...], "transport": "stdio"}}`
//! map used by MCP-aware tooling, so configs can be loaded from JSON.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{McpError, McpResult};

/// How the client talks to a server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McpTransportKind {
    /// Child process over stdin/stdout
    #[default]
    Stdio,
}

/// Launch settings for one MCP server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpServerConfig {
    /// Program to execute
    pub command: String,

    /// Program arguments
    #[serde(default)]
    pub args: Vec<String>,

    /// Extra environment for the child process
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    #[serde(default)]
    pub transport: McpTransportKind,
}

impl McpServerConfig {
    /// Stdio server launched as `command args...`
    pub fn stdio<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            env: HashMap::new(),
            transport: McpTransportKind::Stdio,
        }
    }

    /// Add an environment variable for the child process
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Reject configs that cannot be launched
    pub fn validate(&self, server: &str) -> McpResult<()> {
        if self.command.trim().is_empty() {
            return Err(McpError::InvalidConfig {
                server: server.to_string(),
                reason: "Empty server command".to_string(),
            });
        }
        Ok(())
    }
}

/// Named server configurations, iterated in name order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct McpServersConfig {
    servers: BTreeMap<String, McpServerConfig>,
}

impl McpServersConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a server
    pub fn with_server(mut self, name: impl Into<String>, config: McpServerConfig) -> Self {
        self.servers.insert(name.into(), config);
        self
    }

    /// Parse a JSON server map
    pub fn from_json(json: &str) -> McpResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &McpServerConfig)> {
        self.servers.iter().map(|(name, config)| (name.as_str(), config))
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
