//! In-memory remote state

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{slugify, RemoteMutation};
use crate::domain::{DomainError, Permission, RemoteStateClient, TeamAttributes, TeamHandle};

/// A team as stored by the in-memory platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTeam {
    pub id: u64,
    pub slug: String,
    pub attributes: TeamAttributes,
    pub members: BTreeSet<String>,
    pub grants: BTreeMap<String, Permission>,
}

/// A call that should fail instead of touching state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    FindTeam(String),
    CreateTeam(String),
    UpdateTeam(String),
    ListMembers(String),
    AddMember(String),
    RemoveMember(String),
    ListOrgRepositories,
    ListTeamRepositories(String),
    GrantRepository(String),
    RevokeRepository(String),
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    teams: HashMap<String, RemoteTeam>,
    repositories: Vec<String>,
    mutations: Vec<RemoteMutation>,
    failures: HashSet<FailurePoint>,
}

/// In-memory implementation of RemoteStateClient.
///
/// Records every successful mutation so callers can assert on the exact
/// calls made. Organization is ignored; there is only one.
#[derive(Debug, Default)]
pub struct InMemoryRemoteState {
    state: RwLock<State>,
}

impl InMemoryRemoteState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the organization's repository inventory
    pub fn with_repositories<I, S>(self, repositories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut state) = self.state.write() {
            state.repositories = repositories.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Seed an existing team
    pub fn with_team(self, slug: &str, name: &str) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.next_id += 1;
            let team = RemoteTeam {
                id: state.next_id,
                slug: slug.to_string(),
                attributes: TeamAttributes {
                    name: name.to_string(),
                    description: None,
                    visibility: Default::default(),
                },
                members: BTreeSet::new(),
                grants: BTreeMap::new(),
            };
            state.teams.insert(slug.to_string(), team);
        }
        self
    }

    /// Seed members of an existing team
    pub fn with_members(self, slug: &str, members: &[&str]) -> Self {
        if let Ok(mut state) = self.state.write() {
            if let Some(team) = state.teams.get_mut(slug) {
                team.members.extend(members.iter().map(|m| m.to_string()));
            }
        }
        self
    }

    /// Seed a grant of an existing team
    pub fn with_grant(self, slug: &str, repository: &str, permission: Permission) -> Self {
        if let Ok(mut state) = self.state.write() {
            if let Some(team) = state.teams.get_mut(slug) {
                team.grants.insert(repository.to_string(), permission);
            }
        }
        self
    }

    /// Make a call fail with HTTP 502
    pub fn with_failure(self, point: FailurePoint) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.failures.insert(point);
        }
        self
    }

    /// Stop injecting a failure
    pub fn clear_failure(&self, point: &FailurePoint) {
        if let Ok(mut state) = self.state.write() {
            state.failures.remove(point);
        }
    }

    pub fn team(&self, slug: &str) -> Option<RemoteTeam> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.teams.get(slug).cloned())
    }

    pub fn members(&self, slug: &str) -> BTreeSet<String> {
        self.team(slug).map(|t| t.members).unwrap_or_default()
    }

    pub fn grants(&self, slug: &str) -> BTreeMap<String, Permission> {
        self.team(slug).map(|t| t.grants).unwrap_or_default()
    }

    /// Mutations recorded so far, in call order
    pub fn mutations(&self) -> Vec<RemoteMutation> {
        self.state
            .read()
            .map(|state| state.mutations.clone())
            .unwrap_or_default()
    }

    pub fn clear_mutations(&self) {
        if let Ok(mut state) = self.state.write() {
            state.mutations.clear();
        }
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, DomainError> {
        self.state
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, DomainError> {
        self.state
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))
    }
}

fn check(state: &State, point: FailurePoint) -> Result<(), DomainError> {
    if state.failures.contains(&point) {
        return Err(DomainError::remote(
            Some(502),
            format!("Injected failure: {:?}", point),
        ));
    }
    Ok(())
}

fn team_mut<'a>(state: &'a mut State, team: &TeamHandle) -> Result<&'a mut RemoteTeam, DomainError> {
    state
        .teams
        .get_mut(team.slug())
        .ok_or_else(|| DomainError::remote(Some(404), format!("Team '{}' not found", team.slug())))
}

#[async_trait]
impl RemoteStateClient for InMemoryRemoteState {
    async fn find_team_by_slug(
        &self,
        _org: &str,
        slug: &str,
    ) -> Result<Option<TeamHandle>, DomainError> {
        let state = self.read()?;
        check(&state, FailurePoint::FindTeam(slug.to_string()))?;

        Ok(state
            .teams
            .get(slug)
            .map(|team| TeamHandle::new(team.id, team.slug.clone())))
    }

    async fn create_team(
        &self,
        _org: &str,
        attributes: &TeamAttributes,
    ) -> Result<TeamHandle, DomainError> {
        let mut state = self.write()?;
        check(&state, FailurePoint::CreateTeam(attributes.name.clone()))?;

        let slug = slugify(&attributes.name);
        if state.teams.contains_key(&slug) {
            return Err(DomainError::remote(
                Some(422),
                format!("Team '{}' already exists", slug),
            ));
        }

        state.next_id += 1;
        let team = RemoteTeam {
            id: state.next_id,
            slug: slug.clone(),
            attributes: attributes.clone(),
            members: BTreeSet::new(),
            grants: BTreeMap::new(),
        };
        let handle = TeamHandle::new(team.id, slug.clone());
        state.teams.insert(slug.clone(), team);
        state.mutations.push(RemoteMutation::CreateTeam { slug });

        Ok(handle)
    }

    async fn update_team(
        &self,
        _org: &str,
        slug: &str,
        attributes: &TeamAttributes,
    ) -> Result<TeamHandle, DomainError> {
        let mut state = self.write()?;
        check(&state, FailurePoint::UpdateTeam(slug.to_string()))?;

        let team = state
            .teams
            .get_mut(slug)
            .ok_or_else(|| DomainError::remote(Some(404), format!("Team '{}' not found", slug)))?;
        team.attributes = attributes.clone();
        let handle = TeamHandle::new(team.id, team.slug.clone());
        state.mutations.push(RemoteMutation::UpdateTeam {
            slug: slug.to_string(),
        });

        Ok(handle)
    }

    async fn list_team_members(
        &self,
        _org: &str,
        team: &TeamHandle,
    ) -> Result<BTreeSet<String>, DomainError> {
        let mut state = self.write()?;
        check(&state, FailurePoint::ListMembers(team.slug().to_string()))?;

        Ok(team_mut(&mut state, team)?.members.clone())
    }

    async fn add_team_member(
        &self,
        _org: &str,
        team: &TeamHandle,
        identity: &str,
    ) -> Result<(), DomainError> {
        let mut state = self.write()?;
        check(&state, FailurePoint::AddMember(identity.to_string()))?;

        team_mut(&mut state, team)?
            .members
            .insert(identity.to_string());
        state.mutations.push(RemoteMutation::AddMember {
            team: team.slug().to_string(),
            identity: identity.to_string(),
        });

        Ok(())
    }

    async fn remove_team_member(
        &self,
        _org: &str,
        team: &TeamHandle,
        identity: &str,
    ) -> Result<(), DomainError> {
        let mut state = self.write()?;
        check(&state, FailurePoint::RemoveMember(identity.to_string()))?;

        team_mut(&mut state, team)?.members.remove(identity);
        state.mutations.push(RemoteMutation::RemoveMember {
            team: team.slug().to_string(),
            identity: identity.to_string(),
        });

        Ok(())
    }

    async fn list_org_repositories(&self, _org: &str) -> Result<Vec<String>, DomainError> {
        let state = self.read()?;
        check(&state, FailurePoint::ListOrgRepositories)?;

        Ok(state.repositories.clone())
    }

    async fn list_team_repositories(
        &self,
        _org: &str,
        team: &TeamHandle,
    ) -> Result<Vec<String>, DomainError> {
        let mut state = self.write()?;
        check(&state, FailurePoint::ListTeamRepositories(team.slug().to_string()))?;

        Ok(team_mut(&mut state, team)?.grants.keys().cloned().collect())
    }

    async fn grant_team_repository(
        &self,
        _org: &str,
        team: &TeamHandle,
        repository: &str,
        permission: Permission,
    ) -> Result<(), DomainError> {
        let mut state = self.write()?;
        check(&state, FailurePoint::GrantRepository(repository.to_string()))?;

        if !state.repositories.iter().any(|r| r == repository) {
            return Err(DomainError::remote(
                Some(404),
                format!("Repository '{}' not found", repository),
            ));
        }

        team_mut(&mut state, team)?
            .grants
            .insert(repository.to_string(), permission);
        state.mutations.push(RemoteMutation::GrantRepository {
            team: team.slug().to_string(),
            repository: repository.to_string(),
            permission,
        });

        Ok(())
    }

    async fn revoke_team_repository(
        &self,
        _org: &str,
        team: &TeamHandle,
        repository: &str,
    ) -> Result<(), DomainError> {
        let mut state = self.write()?;
        check(&state, FailurePoint::RevokeRepository(repository.to_string()))?;

        team_mut(&mut state, team)?.grants.remove(repository);
        state.mutations.push(RemoteMutation::RevokeRepository {
            team: team.slug().to_string(),
            repository: repository.to_string(),
        });

        Ok(())
    }
}
