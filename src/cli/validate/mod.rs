//! Validate command - checks team documents without contacting GitHub

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::infrastructure::document::DocumentLoader;

/// Arguments for the validate command
#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Directory holding team documents (overrides config)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}

/// Load and validate every document, printing one line per team
pub async fn run(args: ValidateArgs) -> anyhow::Result<bool> {
    let config = super::load_config()?;
    super::init_logging(&config);

    let dir = args.config_dir.unwrap_or(config.sync.config_dir);
    let teams = DocumentLoader::new(&dir)
        .load()
        .await
        .with_context(|| format!("Invalid team documents in {}", dir.display()))?;

    for team in &teams {
        println!(
            "{}: {} members, {} repository rules",
            team.slug(),
            team.members().len(),
            team.repository_rules().len()
        );
    }
    println!("{} team documents are valid", teams.len());

    Ok(true)
}
