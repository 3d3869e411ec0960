use std::process::ExitCode;

use clap::Parser;
use teamsync::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let success = match cli.command {
        Command::Sync(args) => cli::sync::run(args).await?,
        Command::Validate(args) => cli::validate::run(args).await?,
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
