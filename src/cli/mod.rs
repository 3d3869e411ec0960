//! CLI module for teamsync
//!
//! Provides subcommands:
//! - `sync`: reconcile every team document against the organization
//! - `validate`: parse and validate documents without contacting GitHub

pub mod sync;
pub mod validate;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// teamsync - Declarative GitHub team management
#[derive(Parser)]
#[command(name = "teamsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile teams, members and repository access
    Sync(sync::SyncArgs),

    /// Check team documents without contacting GitHub
    Validate(validate::ValidateArgs),
}

/// Load `.env`, then the layered configuration
fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    Ok(config)
}

fn init_logging(config: &AppConfig) {
    logging::init_logging(&config.logging);
}
