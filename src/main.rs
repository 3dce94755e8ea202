use clap::Parser;
use std::process::ExitCode;

use business_mcp_gateway::cli::{run_commands, Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    run_commands(cli.command.unwrap_or(Commands::Serve)).await
}
