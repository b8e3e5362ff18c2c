//! Demo configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured via `dotenvy`. Every
//! setting has a default except the OpenAI API key and the MCP server path,
//! which are only required by the demos that need them.
//!
//! ## Environment Variables
//!
//! - `OPENAI_API_KEY` - API key for model calls
//! - `OPENAI_BASE_URL` - OpenAI-compatible endpoint (default: `https://api.openai.com/v1`)
//! - `TANDEM_A2A_URL` - Base URL of the remote A2A agent (default: `http://localhost:10000`)
//! - `TANDEM_HTTP_TIMEOUT_SECS` - HTTP timeout for agent and model calls (default: 60)
//! - `MCP_SERVER_PATH` - Script launched as the stdio MCP server
//! - `TANDEM_MCP_COMMAND` - Interpreter used to launch the server (default: `python`)
//! - `TANDEM_AGENT_MODEL` - Model behind the MCP demos (default: `openai:gpt-4.1`)
//! - `TANDEM_ADVICE_MODEL` - Model generating interview advice (default: `gpt-3.5-turbo`)
//! - `TANDEM_OUTPUT_DIR` - Directory for saved transcripts (default: `output`)

use std::{env, path::PathBuf, time::Duration};
use tandem_a2a::ClientConfig;
use tandem_llm::{DEFAULT_OPENAI_BASE_URL, ModelSettings};
use tandem_mcp::McpServerConfig;
use tracing::debug;

pub const DEFAULT_A2A_URL: &str = "http://localhost:10000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MCP_COMMAND: &str = "python";
pub const DEFAULT_AGENT_MODEL: &str = "openai:gpt-4.1";
pub const DEFAULT_ADVICE_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Missing environment variable '{key}'")]
    MissingEnvVar { key: String },
}

/// Settings shared by the demos
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub a2a_url: String,
    pub http_timeout: Duration,
    pub mcp_server_path: Option<PathBuf>,
    pub mcp_command: String,
    pub agent_model: String,
    pub advice_model: String,
    pub output_dir: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            a2a_url: DEFAULT_A2A_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            mcp_server_path: None,
            mcp_command: DEFAULT_MCP_COMMAND.to_string(),
            agent_model: DEFAULT_AGENT_MODEL.to_string(),
            advice_model: DEFAULT_ADVICE_MODEL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl DemoConfig {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => {
                return Err(ConfigError::InvalidEnvVar {
                    key: ".env".to_string(),
                    message: e.to_string(),
                });
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| get_env_string(&lookup, key);

        let http_timeout = get_env_u64(&lookup, "TANDEM_HTTP_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);

        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            a2a_url: get("TANDEM_A2A_URL").unwrap_or(defaults.a2a_url),
            http_timeout,
            mcp_server_path: get("MCP_SERVER_PATH").map(PathBuf::from),
            mcp_command: get("TANDEM_MCP_COMMAND").unwrap_or(defaults.mcp_command),
            agent_model: get("TANDEM_AGENT_MODEL").unwrap_or(defaults.agent_model),
            advice_model: get("TANDEM_ADVICE_MODEL").unwrap_or(defaults.advice_model),
            output_dir: get("TANDEM_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        })
    }

    pub fn with_a2a_url(mut self, url: impl Into<String>) -> Self {
        self.a2a_url = url.into();
        self
    }

    pub fn with_mcp_server_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mcp_server_path = Some(path.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Provider settings for [`tandem_llm::init_chat_model`]
    pub fn model_settings(&self) -> ModelSettings {
        let mut settings = ModelSettings::new()
            .with_base_url(&self.openai_base_url)
            .with_timeout(self.http_timeout);
        if let Some(key) = &self.openai_api_key {
            settings = settings.with_api_key(key);
        }
        settings
    }

    /// HTTP settings for the A2A client
    pub fn a2a_client_config(&self) -> ClientConfig {
        ClientConfig::with_timeout(self.http_timeout)
    }

    /// Launch settings for the local stdio MCP server
    pub fn mcp_server_config(&self) -> Result<McpServerConfig, ConfigError> {
        let path = self
            .mcp_server_path
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar {
                key: "MCP_SERVER_PATH".to_string(),
            })?;

        Ok(McpServerConfig::stdio(
            &self.mcp_command,
            [path.to_string_lossy().into_owned()],
        ))
    }
}

// Environment variable helper functions

fn get_env_string<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|val| !val.trim().is_empty())
}

fn get_env_u64<F>(lookup: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get_env_string(lookup, key) {
        Some(val) => val
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid u64 value '{val}': {e}"),
            }),
        None => Ok(None),
    }
}
