//! mcp-bridge CLI binary entry point.

use mcp_bridge::cli::{commands, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse_args();

    // RUST_LOG wins over --log-level; logs go to stderr so stdout stays clean.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Think(args) => commands::handle_think(args),
        Commands::Tools(args) => commands::handle_tools(args),
        Commands::Config => commands::handle_config(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
