//! Repository patterns and ordered permission rules

use super::permission::Permission;
use crate::domain::team::TeamValidationError;

/// Repository name pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryPattern {
    /// `*` - every repository
    Any,
    /// `prefix*` - every repository whose name starts with the prefix
    Prefix(String),
    /// Anything else - the repository with exactly this name
    Exact(String),
}

impl RepositoryPattern {
    pub fn parse(pattern: &str) -> Result<Self, TeamValidationError> {
        if pattern.is_empty() {
            return Err(TeamValidationError::EmptyPattern);
        }

        if pattern == "*" {
            return Ok(Self::Any);
        }

        match pattern.strip_suffix('*') {
            Some(prefix) => Ok(Self::Prefix(prefix.to_string())),
            None => Ok(Self::Exact(pattern.to_string())),
        }
    }

    pub fn matches(&self, repository: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Prefix(prefix) => repository.starts_with(prefix.as_str()),
            Self::Exact(name) => repository == name,
        }
    }
}

impl std::fmt::Display for RepositoryPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::Prefix(prefix) => write!(f, "{}*", prefix),
            Self::Exact(name) => write!(f, "{}", name),
        }
    }
}

/// A single `(pattern, permission)` rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRule {
    pattern: RepositoryPattern,
    permission: Permission,
}

impl RepositoryRule {
    pub fn new(pattern: &str, permission: Permission) -> Result<Self, TeamValidationError> {
        Ok(Self {
            pattern: RepositoryPattern::parse(pattern)?,
            permission,
        })
    }

    pub fn pattern(&self) -> &RepositoryPattern {
        &self.pattern
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }
}

/// Repository rules in declaration order. The first rule whose pattern
/// matches a repository decides its permission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepositoryRules(Vec<RepositoryRule>);

impl RepositoryRules {
    pub fn new(rules: Vec<RepositoryRule>) -> Self {
        Self(rules)
    }

    /// Resolve the permission for a repository, or `None` when no rule matches
    pub fn resolve(&self, repository: &str) -> Option<Permission> {
        self.0
            .iter()
            .find(|rule| rule.pattern.matches(repository))
            .map(|rule| rule.permission)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RepositoryRule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<RepositoryRule> for RepositoryRules {
    fn from_iter<T: IntoIterator<Item = RepositoryRule>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
