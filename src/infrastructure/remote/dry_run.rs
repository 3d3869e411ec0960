//! Dry-run decorator for a remote state client

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::info;

use super::{slugify, RemoteMutation};
use crate::domain::{DomainError, Permission, RemoteStateClient, TeamAttributes, TeamHandle};

/// Id given to teams that would have been created
const PLANNED_TEAM_ID: u64 = 0;

/// Client wrapper that forwards reads and records mutations without sending
/// them.
///
/// A team that would be created gets a placeholder handle; listing members
/// or repositories of that handle returns nothing instead of asking the
/// inner client about a team that does not exist.
#[derive(Debug)]
pub struct DryRunClient<C: RemoteStateClient> {
    inner: Arc<C>,
    planned: RwLock<Vec<RemoteMutation>>,
}

impl<C: RemoteStateClient> DryRunClient<C> {
    pub fn new(inner: Arc<C>) -> Self {
        Self {
            inner,
            planned: RwLock::new(Vec::new()),
        }
    }

    /// Mutations that would have been sent, in call order
    pub fn planned(&self) -> Vec<RemoteMutation> {
        self.planned
            .read()
            .map(|planned| planned.clone())
            .unwrap_or_default()
    }

    fn record(&self, mutation: RemoteMutation) -> Result<(), DomainError> {
        info!(change = %mutation, "Dry run: skipping change");
        self.planned
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?
            .push(mutation);
        Ok(())
    }

    fn is_planned(team: &TeamHandle) -> bool {
        team.id() == PLANNED_TEAM_ID
    }
}

#[async_trait]
impl<C: RemoteStateClient> RemoteStateClient for DryRunClient<C> {
    async fn find_team_by_slug(
        &self,
        org: &str,
        slug: &str,
    ) -> Result<Option<TeamHandle>, DomainError> {
        self.inner.find_team_by_slug(org, slug).await
    }

    async fn create_team(
        &self,
        _org: &str,
        attributes: &TeamAttributes,
    ) -> Result<TeamHandle, DomainError> {
        let slug = slugify(&attributes.name);
        self.record(RemoteMutation::CreateTeam { slug: slug.clone() })?;
        Ok(TeamHandle::new(PLANNED_TEAM_ID, slug))
    }

    async fn update_team(
        &self,
        org: &str,
        slug: &str,
        _attributes: &TeamAttributes,
    ) -> Result<TeamHandle, DomainError> {
        self.record(RemoteMutation::UpdateTeam {
            slug: slug.to_string(),
        })?;
        self.inner
            .find_team_by_slug(org, slug)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", slug)))
    }

    async fn list_team_members(
        &self,
        org: &str,
        team: &TeamHandle,
    ) -> Result<BTreeSet<String>, DomainError> {
        if Self::is_planned(team) {
            return Ok(BTreeSet::new());
        }
        self.inner.list_team_members(org, team).await
    }

    async fn add_team_member(
        &self,
        _org: &str,
        team: &TeamHandle,
        identity: &str,
    ) -> Result<(), DomainError> {
        self.record(RemoteMutation::AddMember {
            team: team.slug().to_string(),
            identity: identity.to_string(),
        })
    }

    async fn remove_team_member(
        &self,
        _org: &str,
        team: &TeamHandle,
        identity: &str,
    ) -> Result<(), DomainError> {
        self.record(RemoteMutation::RemoveMember {
            team: team.slug().to_string(),
            identity: identity.to_string(),
        })
    }

    async fn list_org_repositories(&self, org: &str) -> Result<Vec<String>, DomainError> {
        self.inner.list_org_repositories(org).await
    }

    async fn list_team_repositories(
        &self,
        org: &str,
        team: &TeamHandle,
    ) -> Result<Vec<String>, DomainError> {
        if Self::is_planned(team) {
            return Ok(Vec::new());
        }
        self.inner.list_team_repositories(org, team).await
    }

    async fn grant_team_repository(
        &self,
        _org: &str,
        team: &TeamHandle,
        repository: &str,
        permission: Permission,
    ) -> Result<(), DomainError> {
        self.record(RemoteMutation::GrantRepository {
            team: team.slug().to_string(),
            repository: repository.to_string(),
            permission,
        })
    }

    async fn revoke_team_repository(
        &self,
        _org: &str,
        team: &TeamHandle,
        repository: &str,
    ) -> Result<(), DomainError> {
        self.record(RemoteMutation::RevokeRepository {
            team: team.slug().to_string(),
            repository: repository.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TeamVisibility;
    use crate::infrastructure::remote::InMemoryRemoteState;

    #[tokio::test]
    async fn test_reads_pass_through_and_writes_are_recorded() {
        let remote = Arc::new(
            InMemoryRemoteState::new()
                .with_team("eng", "eng")
                .with_members("eng", &["a"])
                .with_repositories(["api"]),
        );
        let client = DryRunClient::new(remote.clone());

        let handle = client.find_team_by_slug("acme", "eng").await.unwrap().unwrap();
        assert_eq!(
            client.list_team_members("acme", &handle).await.unwrap().len(),
            1
        );

        client.add_team_member("acme", &handle, "b").await.unwrap();
        client
            .grant_team_repository("acme", &handle, "api", Permission::Read)
            .await
            .unwrap();

        assert_eq!(client.planned().len(), 2);
        assert!(remote.mutations().is_empty());
        assert_eq!(remote.members("eng").len(), 1);
    }

    #[tokio::test]
    async fn test_planned_team_lists_nothing() {
        let remote = Arc::new(InMemoryRemoteState::new().with_repositories(["api"]));
        let client = DryRunClient::new(remote.clone());
        let attributes = TeamAttributes {
            name: "new-team".to_string(),
            description: None,
            visibility: TeamVisibility::Open,
        };

        let handle = client.create_team("acme", &attributes).await.unwrap();

        assert_eq!(handle.id(), PLANNED_TEAM_ID);
        assert!(client.list_team_members("acme", &handle).await.unwrap().is_empty());
        assert!(client.list_team_repositories("acme", &handle).await.unwrap().is_empty());
        assert!(remote.team("new-team").is_none());
    }

    #[tokio::test]
    async fn test_planned_team_uses_derived_slug() {
        let remote = Arc::new(InMemoryRemoteState::new());
        let client = DryRunClient::new(remote.clone());
        let attributes = TeamAttributes {
            name: "Platform Team".to_string(),
            description: None,
            visibility: TeamVisibility::Restricted,
        };

        let handle = client.create_team("acme", &attributes).await.unwrap();

        assert_eq!(handle.slug(), "platform-team");
        assert_eq!(
            client.planned(),
            vec![RemoteMutation::CreateTeam {
                slug: "platform-team".to_string()
            }]
        );
    }
}
