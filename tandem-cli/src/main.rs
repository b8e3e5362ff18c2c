use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tandem::DemoConfig;
use tandem::demos::{interview, mcp_agent, mcp_graph};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tandem", version)]
#[command(about = "Tandem CLI - A2A and MCP agent demos")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a remote A2A agent interview questions and generate advice
    A2a {
        /// Base URL of the A2A agent (overrides TANDEM_A2A_URL)
        #[arg(long)]
        url: Option<String>,
    },
    /// Run the prebuilt ReAct agent over tools from a stdio MCP server
    McpAgent {
        /// MCP server script (overrides MCP_SERVER_PATH)
        #[arg(long)]
        server: Option<PathBuf>,
    },
    /// Run the explicit model/tools graph and save transcripts
    McpGraph {
        /// MCP server script (overrides MCP_SERVER_PATH)
        #[arg(long)]
        server: Option<PathBuf>,
        /// Directory for saved transcripts (overrides TANDEM_OUTPUT_DIR)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn apply_server(config: DemoConfig, server: Option<PathBuf>) -> DemoConfig {
    match server {
        Some(path) => config.with_mcp_server_path(path),
        None => config,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = match DemoConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::A2a { url } => {
            let config = match url {
                Some(url) => config.with_a2a_url(url),
                None => config,
            };
            interview::run_interview_demo(&config).await
        }
        Commands::McpAgent { server } => {
            mcp_agent::run_mcp_agent_demo(&apply_server(config, server)).await
        }
        Commands::McpGraph { server, output } => {
            let mut config = apply_server(config, server);
            if let Some(dir) = output {
                config = config.with_output_dir(dir);
            }
            mcp_graph::run_mcp_graph_demo(&config).await
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Demo failed");
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_graph_overrides() {
        let cli = Cli::try_parse_from([
            "tandem",
            "--log-json",
            "mcp-graph",
            "--server",
            "tools.py",
            "--output",
            "runs",
        ])
        .unwrap();

        assert!(cli.log_json);
        match cli.command {
            Commands::McpGraph { server, output } => {
                assert_eq!(server, Some(PathBuf::from("tools.py")));
                assert_eq!(output, Some(PathBuf::from("runs")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_server_override() {
        let config = apply_server(DemoConfig::default(), Some(PathBuf::from("srv.py")));
        assert_eq!(config.mcp_server_path, Some(PathBuf::from("srv.py")));
        assert_eq!(apply_server(DemoConfig::default(), None).mcp_server_path, None);
    }
}
