//! Repository access delta planning

use std::collections::HashSet;

use serde::Serialize;

use super::permission::Permission;
use super::rule::RepositoryRules;

/// A grant the team should receive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryGrant {
    pub repository: String,
    pub permission: Permission,
}

impl RepositoryGrant {
    pub fn new(repository: impl Into<String>, permission: Permission) -> Self {
        Self {
            repository: repository.into(),
            permission,
        }
    }
}

/// Grants to add and grants to revoke, in inventory order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryAccessDelta {
    pub grants: Vec<RepositoryGrant>,
    pub revocations: Vec<String>,
}

impl RepositoryAccessDelta {
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty() && self.revocations.is_empty()
    }
}

/// Plan the grant changes for every repository in the inventory.
///
/// A repository that resolves to a permission and already has a grant of any
/// level is left alone; the level of an existing grant is never changed.
/// A repository that resolves to nothing loses its grant. Grants on
/// repositories outside the inventory are not considered.
pub fn plan_repository_access(
    inventory: &[String],
    current_grants: &[String],
    rules: &RepositoryRules,
) -> RepositoryAccessDelta {
    let granted: HashSet<&str> = current_grants.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let mut delta = RepositoryAccessDelta::default();

    for repository in inventory {
        if !seen.insert(repository.as_str()) {
            continue;
        }

        let has_grant = granted.contains(repository.as_str());

        match rules.resolve(repository) {
            Some(permission) if !has_grant => {
                delta
                    .grants
                    .push(RepositoryGrant::new(repository.clone(), permission));
            }
            Some(_) => {}
            None if has_grant => delta.revocations.push(repository.clone()),
            None => {}
        }
    }

    delta
}
