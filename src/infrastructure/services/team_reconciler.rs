//! Team upsert

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{DomainError, RemoteStateClient, TeamAttributes, TeamDesiredState, TeamHandle};

/// Result of upserting a team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamUpsert {
    pub handle: TeamHandle,
    pub created: bool,
}

/// Creates a missing team or overwrites the identity attributes of an
/// existing one
#[derive(Debug)]
pub struct TeamReconciler<C: RemoteStateClient> {
    client: Arc<C>,
    org: String,
}

impl<C: RemoteStateClient> TeamReconciler<C> {
    pub fn new(client: Arc<C>, org: impl Into<String>) -> Self {
        Self {
            client,
            org: org.into(),
        }
    }

    /// Make the remote team's name, description and visibility match the
    /// desired state. Any lookup failure other than not-found is returned.
    pub async fn reconcile(&self, team: &TeamDesiredState) -> Result<TeamUpsert, DomainError> {
        let attributes = TeamAttributes::from(team);

        match self.client.find_team_by_slug(&self.org, team.slug()).await? {
            Some(existing) => {
                let handle = self
                    .client
                    .update_team(&self.org, existing.slug(), &attributes)
                    .await?;
                info!(
                    team = %handle,
                    visibility = %team.visibility(),
                    "Updated team"
                );
                Ok(TeamUpsert {
                    handle,
                    created: false,
                })
            }
            None => {
                let handle = self.client.create_team(&self.org, &attributes).await?;
                info!(
                    team = %handle,
                    visibility = %team.visibility(),
                    "Created team"
                );
                if handle.slug() != team.slug() {
                    warn!(
                        declared = %team.slug(),
                        assigned = %handle.slug(),
                        "Created team slug differs from the declared slug; later runs will not find it"
                    );
                }
                Ok(TeamUpsert {
                    handle,
                    created: true,
                })
            }
        }
    }
}
