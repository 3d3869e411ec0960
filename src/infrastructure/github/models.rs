//! GitHub REST request and response bodies

use serde::{Deserialize, Serialize};

use crate::domain::{Permission, TeamAttributes, TeamHandle};

#[derive(Debug, Deserialize)]
pub struct TeamResponse {
    pub id: u64,
    pub slug: String,
}

impl From<TeamResponse> for TeamHandle {
    fn from(team: TeamResponse) -> Self {
        TeamHandle::new(team.id, team.slug)
    }
}

#[derive(Debug, Deserialize)]
pub struct MemberResponse {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryResponse {
    pub name: String,
}

/// Body of create and update team requests
#[derive(Debug, Serialize)]
pub struct TeamRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub privacy: &'static str,
}

impl<'a> From<&'a TeamAttributes> for TeamRequest<'a> {
    fn from(attributes: &'a TeamAttributes) -> Self {
        Self {
            name: &attributes.name,
            // an empty description clears the remote one
            description: attributes.description.as_deref().unwrap_or(""),
            privacy: attributes.visibility.as_privacy(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MembershipRequest {
    pub role: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PermissionRequest {
    pub permission: &'static str,
}

impl From<Permission> for PermissionRequest {
    fn from(permission: Permission) -> Self {
        Self {
            permission: permission.as_api_str(),
        }
    }
}
