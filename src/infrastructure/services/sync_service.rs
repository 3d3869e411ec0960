//! Run orchestration
//!
//! Reconciles each desired-state document in turn: team upsert, then
//! membership, then repository access. A failure aborts only the document
//! it happened in.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use super::membership_reconciler::MembershipReconciler;
use super::repository_access_reconciler::RepositoryAccessReconciler;
use super::team_reconciler::TeamReconciler;
use crate::domain::{RemoteStateClient, SyncReport, TeamDesiredState, TeamSyncOutcome};

/// Runs every document of a sync against one organization
#[derive(Debug)]
pub struct SyncService<C: RemoteStateClient> {
    org: String,
    max_concurrent_teams: usize,
    dry_run: bool,
    teams: TeamReconciler<C>,
    memberships: MembershipReconciler<C>,
    repositories: RepositoryAccessReconciler<C>,
}

impl<C: RemoteStateClient> SyncService<C> {
    pub fn new(client: Arc<C>, org: impl Into<String>) -> Self {
        let org = org.into();
        Self {
            teams: TeamReconciler::new(client.clone(), org.clone()),
            memberships: MembershipReconciler::new(client.clone(), org.clone()),
            repositories: RepositoryAccessReconciler::new(client, org.clone()),
            org,
            max_concurrent_teams: 1,
            dry_run: false,
        }
    }

    /// Number of documents reconciled at the same time; zero is treated as one
    pub fn with_max_concurrent_teams(mut self, max_concurrent_teams: usize) -> Self {
        self.max_concurrent_teams = max_concurrent_teams.max(1);
        self
    }

    /// Mark the report as a dry run. The client decides what is actually sent.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    /// Reconcile all documents. Outcomes are reported in document order
    /// regardless of concurrency.
    pub async fn run(&self, documents: &[TeamDesiredState]) -> SyncReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        info!(
            %run_id,
            org = %self.org,
            teams = documents.len(),
            dry_run = self.dry_run,
            "Starting sync"
        );

        let teams: Vec<TeamSyncOutcome> = stream::iter(documents)
            .map(|team| {
                let span = info_span!("team", %run_id, slug = %team.slug());
                self.sync_team(team).instrument(span)
            })
            .buffered(self.max_concurrent_teams)
            .collect()
            .await;

        let report = SyncReport {
            run_id,
            org: self.org.clone(),
            dry_run: self.dry_run,
            started_at,
            finished_at: Utc::now(),
            teams,
        };

        info!(
            %run_id,
            succeeded = report.succeeded(),
            failed = report.failed(),
            diagnostics = report.diagnostics(),
            "Sync finished"
        );

        report
    }

    /// Reconcile one document. Counts applied before a fatal error stay in
    /// the outcome.
    pub async fn sync_team(&self, team: &TeamDesiredState) -> TeamSyncOutcome {
        let mut outcome = TeamSyncOutcome::new(team.slug());

        let upsert = match self.teams.reconcile(team).await {
            Ok(upsert) => upsert,
            Err(e) => {
                error!(error = %e, "Team upsert failed");
                outcome.fail(e.to_string());
                return outcome;
            }
        };
        outcome.created = upsert.created;

        match self.memberships.reconcile(&upsert.handle, team.members()).await {
            Ok(result) => {
                outcome.members_added = result.added.len();
                outcome.members_removed = result.removed.len();
                outcome.diagnostics.extend(result.diagnostics);
            }
            Err(e) => {
                error!(error = %e, "Membership sync failed");
                outcome.fail(e.to_string());
                return outcome;
            }
        }

        match self
            .repositories
            .reconcile(&upsert.handle, team.repository_rules())
            .await
        {
            Ok(result) => {
                outcome.repositories_granted = result.granted.len();
                outcome.repositories_revoked = result.revoked.len();
                outcome.diagnostics.extend(result.diagnostics);
            }
            Err(e) => {
                error!(error = %e, "Repository access sync failed");
                outcome.fail(e.to_string());
                return outcome;
            }
        }

        info!(
            created = outcome.created,
            mutations = outcome.mutations(),
            diagnostics = outcome.diagnostics.len(),
            "Team in sync"
        );
        outcome
    }
}
