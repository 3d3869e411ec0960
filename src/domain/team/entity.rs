//! Team desired state and remote handle

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::validation::{
    validate_member, validate_team_name, validate_team_slug, TeamValidationError,
};
use crate::domain::repository_access::RepositoryRules;

/// Visibility of a team within the organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamVisibility {
    /// Visible only to the team's members and organization owners
    #[default]
    Restricted,
    /// Visible to every member of the organization
    Open,
}

impl TeamVisibility {
    /// Name used by the GitHub REST API `privacy` field
    pub fn as_privacy(&self) -> &'static str {
        match self {
            Self::Restricted => "secret",
            Self::Open => "closed",
        }
    }
}

impl std::fmt::Display for TeamVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Restricted => write!(f, "restricted"),
            Self::Open => write!(f, "open"),
        }
    }
}

/// Opaque reference to a team held by the remote platform.
///
/// The numeric id is assigned on creation; the slug is what the REST paths
/// address the team by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamHandle {
    id: u64,
    slug: String,
}

impl TeamHandle {
    pub fn new(id: u64, slug: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl std::fmt::Display for TeamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.slug, self.id)
    }
}

/// Identity attributes written to the remote team on create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAttributes {
    pub name: String,
    pub description: Option<String>,
    pub visibility: TeamVisibility,
}

impl From<&TeamDesiredState> for TeamAttributes {
    fn from(team: &TeamDesiredState) -> Self {
        Self {
            name: team.name.clone(),
            description: team.description.clone(),
            visibility: team.visibility,
        }
    }
}

/// Declared target state for one team
#[derive(Debug, Clone, PartialEq)]
pub struct TeamDesiredState {
    name: String,
    slug: String,
    description: Option<String>,
    visibility: TeamVisibility,
    members: BTreeSet<String>,
    repository_rules: RepositoryRules,
}

impl TeamDesiredState {
    /// Create a new desired state with no members and no repository rules
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Result<Self, TeamValidationError> {
        let name = name.into();
        let slug = slug.into();
        validate_team_name(&name)?;
        validate_team_slug(&slug)?;

        Ok(Self {
            name,
            slug,
            description: None,
            visibility: TeamVisibility::default(),
            members: BTreeSet::new(),
            repository_rules: RepositoryRules::default(),
        })
    }

    /// Set description (builder pattern)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set visibility (builder pattern)
    pub fn with_visibility(mut self, visibility: TeamVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the member identities; duplicates collapse
    pub fn with_members<I, S>(mut self, members: I) -> Result<Self, TeamValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for member in members {
            let member = member.into();
            validate_member(&member)?;
            set.insert(member);
        }
        self.members = set;
        Ok(self)
    }

    /// Set the ordered repository rules
    pub fn with_repository_rules(mut self, rules: RepositoryRules) -> Self {
        self.repository_rules = rules;
        self
    }

    // Getters

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn visibility(&self) -> TeamVisibility {
        self.visibility
    }

    pub fn members(&self) -> &BTreeSet<String> {
        &self.members
    }

    pub fn repository_rules(&self) -> &RepositoryRules {
        &self.repository_rules
    }
}
