//! Team membership sync

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{
    plan_membership, Diagnostic, DiagnosticKind, DomainError, RemoteStateClient, TeamHandle,
};

/// What a membership pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipResult {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Drives a team's live members toward the desired set
#[derive(Debug)]
pub struct MembershipReconciler<C: RemoteStateClient> {
    client: Arc<C>,
    org: String,
}

impl<C: RemoteStateClient> MembershipReconciler<C> {
    pub fn new(client: Arc<C>, org: impl Into<String>) -> Self {
        Self {
            client,
            org: org.into(),
        }
    }

    /// Fetch live members, then apply every add followed by every remove.
    ///
    /// Only the member listing is fatal. Each add or remove that fails is
    /// recorded as a diagnostic and the remaining identities are still
    /// attempted.
    pub async fn reconcile(
        &self,
        team: &TeamHandle,
        desired: &BTreeSet<String>,
    ) -> Result<MembershipResult, DomainError> {
        let live = self.client.list_team_members(&self.org, team).await?;
        let delta = plan_membership(desired, &live);
        let mut result = MembershipResult::default();

        if delta.is_empty() {
            debug!(team = %team, members = live.len(), "Membership already in sync");
            return Ok(result);
        }

        for identity in &delta.to_add {
            match self.client.add_team_member(&self.org, team, identity).await {
                Ok(()) => {
                    info!(team = %team, member = %identity, "Added member");
                    result.added.push(identity.clone());
                }
                Err(e) => {
                    warn!(team = %team, member = %identity, error = %e, "Failed to add member");
                    result.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::AddMember,
                        identity,
                        e.to_string(),
                    ));
                }
            }
        }

        for identity in &delta.to_remove {
            match self.client.remove_team_member(&self.org, team, identity).await {
                Ok(()) => {
                    info!(team = %team, member = %identity, "Removed member");
                    result.removed.push(identity.clone());
                }
                Err(e) => {
                    warn!(team = %team, member = %identity, error = %e, "Failed to remove member");
                    result.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::RemoveMember,
                        identity,
                        e.to_string(),
                    ));
                }
            }
        }

        Ok(result)
    }
}
