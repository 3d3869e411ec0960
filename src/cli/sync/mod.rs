//! Sync command - reconciles every team document against the organization

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    DomainError, FailurePolicy, RemoteStateClient, SyncReport, TeamDesiredState,
};
use crate::infrastructure::document::DocumentLoader;
use crate::infrastructure::github::GithubClient;
use crate::infrastructure::remote::DryRunClient;
use crate::infrastructure::services::SyncService;

/// Token variable read when none is configured
const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Arguments for the sync command
#[derive(Args, Clone, Debug)]
pub struct SyncArgs {
    /// Directory holding team documents (overrides config)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Organization to reconcile (overrides config)
    #[arg(long)]
    pub org: Option<String>,

    /// Log the changes that would be made without sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Number of teams reconciled at the same time (overrides config)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Exit non-zero when any team fails instead of only when all fail
    #[arg(long)]
    pub fail_on_any: bool,

    /// Print the full report as JSON on stdout
    #[arg(long)]
    pub report_json: bool,
}

/// Run a sync. Returns whether the run succeeded under the failure policy.
pub async fn run(args: SyncArgs) -> anyhow::Result<bool> {
    let mut config = super::load_config()?;
    apply_overrides(&mut config, &args);
    super::init_logging(&config);

    let org = config
        .github
        .org
        .clone()
        .filter(|o| !o.is_empty())
        .ok_or_else(|| {
            DomainError::configuration(
                "No organization configured (use --org or TEAMSYNC__GITHUB__ORG)",
            )
        })?;

    let documents = DocumentLoader::new(&config.sync.config_dir)
        .load()
        .await
        .context("Failed to load team documents")?;

    let client = Arc::new(GithubClient::new(&config.github)?);

    let report = if config.sync.dry_run {
        info!("Dry run: no changes will be sent");
        execute(Arc::new(DryRunClient::new(client)), &org, &config, &documents).await
    } else {
        execute(client, &org, &config, &documents).await
    };

    if args.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(report.is_success(config.sync.failure_policy))
}

fn apply_overrides(config: &mut AppConfig, args: &SyncArgs) {
    if let Some(dir) = &args.config_dir {
        config.sync.config_dir = dir.clone();
    }
    if let Some(org) = &args.org {
        config.github.org = Some(org.clone());
    }
    if let Some(concurrency) = args.concurrency {
        config.sync.max_concurrent_teams = concurrency;
    }
    if args.dry_run {
        config.sync.dry_run = true;
    }
    if args.fail_on_any {
        config.sync.failure_policy = FailurePolicy::AnyFailed;
    }
    if config.github.token.as_deref().is_none_or(str::is_empty) {
        config.github.token = std::env::var(TOKEN_ENV).ok();
    }
}

async fn execute<C: RemoteStateClient>(
    client: Arc<C>,
    org: &str,
    config: &AppConfig,
    documents: &[TeamDesiredState],
) -> SyncReport {
    SyncService::new(client, org)
        .with_max_concurrent_teams(config.sync.max_concurrent_teams)
        .with_dry_run(config.sync.dry_run)
        .run(documents)
        .await
}

fn print_summary(report: &SyncReport) {
    let mode = if report.dry_run { " (dry run)" } else { "" };
    println!("Sync of {}{} [{}]", report.org, mode, report.run_id);

    for team in &report.teams {
        let marker = if team.is_success() { "ok" } else { "FAILED" };
        println!(
            "  {:<6} {} created={} +members={} -members={} +repos={} -repos={}",
            marker,
            team.slug,
            team.created,
            team.members_added,
            team.members_removed,
            team.repositories_granted,
            team.repositories_revoked,
        );
        for diagnostic in &team.diagnostics {
            println!("         ! {}", diagnostic);
        }
        if let Some(error) = &team.error {
            println!("         error: {}", error);
        }
    }

    println!(
        "{} succeeded, {} failed, {} diagnostics",
        report.succeeded(),
        report.failed(),
        report.diagnostics()
    );
}
