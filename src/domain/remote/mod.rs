//! Remote state client trait
//!
//! The remote platform is the only source of truth for live state. Every
//! reconciliation pass reads through this trait; nothing is cached between
//! runs.

use std::collections::BTreeSet;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::error::DomainError;
use crate::domain::repository_access::Permission;
use crate::domain::team::{TeamAttributes, TeamHandle};

/// Operations the reconcilers need from the remote platform
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteStateClient: Send + Sync {
    /// Look up a team by slug; `Ok(None)` when the team does not exist
    async fn find_team_by_slug(
        &self,
        org: &str,
        slug: &str,
    ) -> Result<Option<TeamHandle>, DomainError>;

    /// Create a team
    async fn create_team(
        &self,
        org: &str,
        attributes: &TeamAttributes,
    ) -> Result<TeamHandle, DomainError>;

    /// Overwrite a team's name, description and visibility
    async fn update_team(
        &self,
        org: &str,
        slug: &str,
        attributes: &TeamAttributes,
    ) -> Result<TeamHandle, DomainError>;

    /// List every member login of a team (all pages)
    async fn list_team_members(
        &self,
        org: &str,
        team: &TeamHandle,
    ) -> Result<BTreeSet<String>, DomainError>;

    /// Add a single member
    async fn add_team_member(
        &self,
        org: &str,
        team: &TeamHandle,
        identity: &str,
    ) -> Result<(), DomainError>;

    /// Remove a single member
    async fn remove_team_member(
        &self,
        org: &str,
        team: &TeamHandle,
        identity: &str,
    ) -> Result<(), DomainError>;

    /// List every repository name in the organization (all pages)
    async fn list_org_repositories(&self, org: &str) -> Result<Vec<String>, DomainError>;

    /// List the names of repositories the team currently has a grant on
    async fn list_team_repositories(
        &self,
        org: &str,
        team: &TeamHandle,
    ) -> Result<Vec<String>, DomainError>;

    /// Grant the team a permission on a repository
    async fn grant_team_repository(
        &self,
        org: &str,
        team: &TeamHandle,
        repository: &str,
        permission: Permission,
    ) -> Result<(), DomainError>;

    /// Remove the team's grant on a repository
    async fn revoke_team_repository(
        &self,
        org: &str,
        team: &TeamHandle,
        repository: &str,
    ) -> Result<(), DomainError>;
}
