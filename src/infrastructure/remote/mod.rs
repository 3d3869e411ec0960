//! Remote state client implementations that do not talk to GitHub directly

mod dry_run;
mod in_memory;

pub use dry_run::DryRunClient;
pub use in_memory::{FailurePoint, InMemoryRemoteState, RemoteTeam};

use serde::Serialize;

use crate::domain::Permission;

/// A mutating call against the remote platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RemoteMutation {
    CreateTeam { slug: String },
    UpdateTeam { slug: String },
    AddMember { team: String, identity: String },
    RemoveMember { team: String, identity: String },
    GrantRepository {
        team: String,
        repository: String,
        permission: Permission,
    },
    RevokeRepository { team: String, repository: String },
}

impl RemoteMutation {
    /// Whether this mutation touches members or repository grants
    pub fn is_item_mutation(&self) -> bool {
        !matches!(self, Self::CreateTeam { .. } | Self::UpdateTeam { .. })
    }
}

impl std::fmt::Display for RemoteMutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateTeam { slug } => write!(f, "create team {}", slug),
            Self::UpdateTeam { slug } => write!(f, "update team {}", slug),
            Self::AddMember { team, identity } => write!(f, "add {} to {}", identity, team),
            Self::RemoveMember { team, identity } => {
                write!(f, "remove {} from {}", identity, team)
            }
            Self::GrantRepository {
                team,
                repository,
                permission,
            } => write!(f, "grant {} {} on {}", team, permission, repository),
            Self::RevokeRepository { team, repository } => {
                write!(f, "revoke {} on {}", team, repository)
            }
        }
    }
}

/// Slug the platform derives from a team name
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Engineering"), "engineering");
        assert_eq!(slugify("Platform  Team!"), "platform-team");
        assert_eq!(slugify("eng"), "eng");
    }
}
