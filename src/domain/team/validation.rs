//! Team validation

use thiserror::Error;

/// Errors that can occur during team validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("Team slug cannot be empty")]
    EmptySlug,

    #[error("Team slug cannot exceed {0} characters")]
    SlugTooLong(usize),

    #[error("Team slug can only contain lowercase alphanumeric characters, '-', '_' and '.'")]
    InvalidSlugCharacters,

    #[error("Team name cannot be empty")]
    EmptyName,

    #[error("Team name cannot exceed {0} characters")]
    NameTooLong(usize),

    #[error("Member identity cannot be empty")]
    EmptyMember,

    #[error("Repository pattern cannot be empty")]
    EmptyPattern,
}

const MAX_TEAM_SLUG_LENGTH: usize = 100;
const MAX_TEAM_NAME_LENGTH: usize = 255;

/// Validate a team slug
pub fn validate_team_slug(slug: &str) -> Result<(), TeamValidationError> {
    if slug.is_empty() {
        return Err(TeamValidationError::EmptySlug);
    }

    if slug.len() > MAX_TEAM_SLUG_LENGTH {
        return Err(TeamValidationError::SlugTooLong(MAX_TEAM_SLUG_LENGTH));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'))
    {
        return Err(TeamValidationError::InvalidSlugCharacters);
    }

    Ok(())
}

/// Validate a team display name
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.trim().is_empty() {
        return Err(TeamValidationError::EmptyName);
    }

    if name.len() > MAX_TEAM_NAME_LENGTH {
        return Err(TeamValidationError::NameTooLong(MAX_TEAM_NAME_LENGTH));
    }

    Ok(())
}

/// Validate a member identity. Identities are compared verbatim, so only
/// emptiness is rejected here.
pub fn validate_member(identity: &str) -> Result<(), TeamValidationError> {
    if identity.is_empty() {
        return Err(TeamValidationError::EmptyMember);
    }

    Ok(())
}
