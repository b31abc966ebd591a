//! CLI entry point for mcp-bridge.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::mcp::ServerPreset;

/// Drive MCP tool servers from a synchronous command line.
#[derive(Parser, Debug)]
#[command(name = "mcp-bridge", version, about = "Blocking bridge to MCP tool servers")]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. info, mcp_bridge=debug)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a sequence of thoughts through the thinking tools
    Think(ThinkArgs),
    /// List the tools a reference MCP server exposes
    Tools(ToolsArgs),
    /// Show and validate the configuration
    Config,
}

/// Arguments for `mcp-bridge think`.
#[derive(Parser, Debug)]
pub struct ThinkArgs {
    /// Record thoughts in the local step log instead of the MCP server
    #[arg(long)]
    pub local: bool,

    /// Server script to launch instead of the configured server
    #[arg(long, conflicts_with = "local")]
    pub server_script: Option<PathBuf>,

    /// Thoughts to submit, in order (a short demo sequence when omitted)
    pub thoughts: Vec<String>,
}

/// Arguments for `mcp-bridge tools`.
#[derive(Parser, Debug)]
pub struct ToolsArgs {
    /// Server preset: sequential-thinking, filesystem, fetch, git, memory
    pub preset: ServerPreset,

    /// Directory handed to the filesystem and git servers (defaults to cwd)
    #[arg(long)]
    pub workdir: Option<PathBuf>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_think_with_defaults() {
        let cli = Cli::try_parse_from(["mcp-bridge", "think"]).unwrap();
        assert_eq!(cli.log_level, "warn");
        match cli.command {
            Commands::Think(args) => {
                assert!(!args.local);
                assert!(args.server_script.is_none());
                assert!(args.thoughts.is_empty());
            }
            other => panic!("expected Think, got {other:?}"),
        }
    }

    #[test]
    fn parse_think_local_with_thoughts() {
        let cli = Cli::try_parse_from([
            "mcp-bridge",
            "think",
            "--local",
            "Define the problem",
            "Pick an approach",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Commands::Think(args) => {
                assert!(args.local);
                assert_eq!(args.thoughts, vec!["Define the problem", "Pick an approach"]);
            }
            other => panic!("expected Think, got {other:?}"),
        }
    }

    #[test]
    fn parse_think_rejects_local_with_server_script() {
        assert!(Cli::try_parse_from([
            "mcp-bridge",
            "think",
            "--local",
            "--server-script",
            "server.py"
        ])
        .is_err());
    }

    #[test]
    fn parse_tools_preset() {
        let cli =
            Cli::try_parse_from(["mcp-bridge", "tools", "git", "--workdir", "/srv/repo"]).unwrap();
        match cli.command {
            Commands::Tools(args) => {
                assert_eq!(args.preset, ServerPreset::Git);
                assert_eq!(args.workdir, Some(PathBuf::from("/srv/repo")));
            }
            other => panic!("expected Tools, got {other:?}"),
        }
    }

    #[test]
    fn parse_unknown_preset_is_error() {
        assert!(Cli::try_parse_from(["mcp-bridge", "tools", "weather"]).is_err());
    }

    #[test]
    fn parse_config() {
        let cli = Cli::try_parse_from(["mcp-bridge", "config"]).unwrap();
        assert!(matches!(cli.command, Commands::Config));
    }

    #[test]
    fn parse_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["mcp-bridge"]).is_err());
    }
}
