//! Team repository access sync

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{
    plan_repository_access, Diagnostic, DiagnosticKind, DomainError, RemoteStateClient,
    RepositoryGrant, RepositoryRules, TeamHandle,
};

/// What a repository access pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryAccessResult {
    pub granted: Vec<RepositoryGrant>,
    pub revoked: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Applies ordered repository rules to a team's grants
#[derive(Debug)]
pub struct RepositoryAccessReconciler<C: RemoteStateClient> {
    client: Arc<C>,
    org: String,
}

impl<C: RemoteStateClient> RepositoryAccessReconciler<C> {
    pub fn new(client: Arc<C>, org: impl Into<String>) -> Self {
        Self {
            client,
            org: org.into(),
        }
    }

    /// Grant every matched repository the team cannot yet reach and revoke
    /// grants on repositories no rule matches.
    ///
    /// The org inventory and the team's current grants must both be listed;
    /// either failing is fatal. Individual grants and revocations are
    /// isolated and reported as diagnostics.
    pub async fn reconcile(
        &self,
        team: &TeamHandle,
        rules: &RepositoryRules,
    ) -> Result<RepositoryAccessResult, DomainError> {
        let inventory = self.client.list_org_repositories(&self.org).await?;
        let current = self.client.list_team_repositories(&self.org, team).await?;
        let delta = plan_repository_access(&inventory, &current, rules);
        let mut result = RepositoryAccessResult::default();

        if delta.is_empty() {
            debug!(
                team = %team,
                inventory = inventory.len(),
                granted = current.len(),
                "Repository access already in sync"
            );
            return Ok(result);
        }

        for grant in delta.grants {
            match self
                .client
                .grant_team_repository(&self.org, team, &grant.repository, grant.permission)
                .await
            {
                Ok(()) => {
                    info!(
                        team = %team,
                        repository = %grant.repository,
                        permission = %grant.permission,
                        "Granted repository"
                    );
                    result.granted.push(grant);
                }
                Err(e) => {
                    warn!(
                        team = %team,
                        repository = %grant.repository,
                        error = %e,
                        "Failed to grant repository"
                    );
                    result.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::GrantRepository,
                        grant.repository,
                        e.to_string(),
                    ));
                }
            }
        }

        for repository in delta.revocations {
            match self
                .client
                .revoke_team_repository(&self.org, team, &repository)
                .await
            {
                Ok(()) => {
                    info!(team = %team, repository = %repository, "Revoked repository");
                    result.revoked.push(repository);
                }
                Err(e) => {
                    warn!(
                        team = %team,
                        repository = %repository,
                        error = %e,
                        "Failed to revoke repository"
                    );
                    result.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::RevokeRepository,
                        repository,
                        e.to_string(),
                    ));
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::remote::MockRemoteStateClient;
    use crate::domain::{Permission, RepositoryRule};
    use crate::infrastructure::remote::{FailurePoint, InMemoryRemoteState};

    fn rules(entries: &[(&str, Permission)]) -> RepositoryRules {
        entries
            .iter()
            .map(|(pattern, permission)| RepositoryRule::new(pattern, *permission).unwrap())
            .collect()
    }

    fn handle(remote: &InMemoryRemoteState) -> TeamHandle {
        TeamHandle::new(remote.team("eng").unwrap().id, "eng")
    }

    #[tokio::test]
    async fn test_wildcard_grants_everything() {
        let remote = Arc::new(
            InMemoryRemoteState::new()
                .with_repositories(["x", "y"])
                .with_team("eng", "eng"),
        );
        let team = handle(&remote);
        let reconciler = RepositoryAccessReconciler::new(remote.clone(), "acme");

        let result = reconciler
            .reconcile(&team, &rules(&[("*", Permission::Read)]))
            .await
            .unwrap();

        assert_eq!(
            result.granted,
            vec![
                RepositoryGrant::new("x", Permission::Read),
                RepositoryGrant::new("y", Permission::Read),
            ]
        );
        assert!(result.revoked.is_empty());
        assert_eq!(remote.grants("eng").len(), 2);
    }

    #[tokio::test]
    async fn test_existing_grant_level_is_kept() {
        let remote = Arc::new(
            InMemoryRemoteState::new()
                .with_repositories(["web-app"])
                .with_team("eng", "eng")
                .with_grant("eng", "web-app", Permission::Read),
        );
        let team = handle(&remote);
        let reconciler = RepositoryAccessReconciler::new(remote.clone(), "acme");

        let result = reconciler
            .reconcile(&team, &rules(&[("web-*", Permission::Admin)]))
            .await
            .unwrap();

        assert_eq!(result, RepositoryAccessResult::default());
        assert_eq!(remote.grants("eng")["web-app"], Permission::Read);
        assert!(remote.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_unmatched_grant_is_revoked() {
        let remote = Arc::new(
            InMemoryRemoteState::new()
                .with_repositories(["api", "legacy"])
                .with_team("eng", "eng")
                .with_grant("eng", "legacy", Permission::Write),
        );
        let team = handle(&remote);
        let reconciler = RepositoryAccessReconciler::new(remote.clone(), "acme");

        let result = reconciler
            .reconcile(&team, &rules(&[("api", Permission::Write)]))
            .await
            .unwrap();

        assert_eq!(result.granted, vec![RepositoryGrant::new("api", Permission::Write)]);
        assert_eq!(result.revoked, vec!["legacy"]);
        assert!(!remote.grants("eng").contains_key("legacy"));
    }

    #[tokio::test]
    async fn test_failed_grant_does_not_stop_others() {
        let remote = Arc::new(
            InMemoryRemoteState::new()
                .with_repositories(["a", "b", "stale"])
                .with_team("eng", "eng")
                .with_grant("eng", "stale", Permission::Read)
                .with_failure(FailurePoint::GrantRepository("a".to_string())),
        );
        let team = handle(&remote);
        let reconciler = RepositoryAccessReconciler::new(remote.clone(), "acme");

        let result = reconciler
            .reconcile(
                &team,
                &rules(&[("a", Permission::Read), ("b", Permission::Read)]),
            )
            .await
            .unwrap();

        assert_eq!(result.granted, vec![RepositoryGrant::new("b", Permission::Read)]);
        assert_eq!(result.revoked, vec!["stale"]);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::GrantRepository);
        assert_eq!(result.diagnostics[0].target, "a");
    }

    #[tokio::test]
    async fn test_failed_revoke_is_recorded() {
        let remote = Arc::new(
            InMemoryRemoteState::new()
                .with_repositories(["old"])
                .with_team("eng", "eng")
                .with_grant("eng", "old", Permission::Read)
                .with_failure(FailurePoint::RevokeRepository("old".to_string())),
        );
        let team = handle(&remote);
        let reconciler = RepositoryAccessReconciler::new(remote.clone(), "acme");

        let result = reconciler
            .reconcile(&team, &RepositoryRules::default())
            .await
            .unwrap();

        assert!(result.revoked.is_empty());
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::RevokeRepository);
        assert!(remote.grants("eng").contains_key("old"));
    }

    #[tokio::test]
    async fn test_second_run_makes_no_calls() {
        let remote = Arc::new(
            InMemoryRemoteState::new()
                .with_repositories(["x", "y", "z"])
                .with_team("eng", "eng")
                .with_grant("eng", "z", Permission::Admin),
        );
        let team = handle(&remote);
        let reconciler = RepositoryAccessReconciler::new(remote.clone(), "acme");
        let team_rules = rules(&[("x", Permission::Write), ("y", Permission::Read)]);

        reconciler.reconcile(&team, &team_rules).await.unwrap();
        remote.clear_mutations();

        let result = reconciler.reconcile(&team, &team_rules).await.unwrap();

        assert_eq!(result, RepositoryAccessResult::default());
        assert!(remote.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_inventory_failure_is_fatal() {
        let mut mock = MockRemoteStateClient::new();
        mock.expect_list_org_repositories()
            .returning(|_| Err(DomainError::remote(Some(503), "Unavailable")));
        mock.expect_list_team_repositories().never();
        mock.expect_grant_team_repository().never();
        mock.expect_revoke_team_repository().never();

        let reconciler = RepositoryAccessReconciler::new(Arc::new(mock), "acme");
        let result = reconciler
            .reconcile(&TeamHandle::new(1, "eng"), &rules(&[("*", Permission::Read)]))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Remote {
                status: Some(503),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_team_listing_failure_is_fatal() {
        let remote = Arc::new(
            InMemoryRemoteState::new()
                .with_repositories(["x"])
                .with_team("eng", "eng")
                .with_failure(FailurePoint::ListTeamRepositories("eng".to_string())),
        );
        let team = handle(&remote);
        let reconciler = RepositoryAccessReconciler::new(remote.clone(), "acme");

        let result = reconciler
            .reconcile(&team, &rules(&[("*", Permission::Read)]))
            .await;

        assert!(result.is_err());
        assert!(remote.mutations().is_empty());
    }
}
