//! Team domain module
//!
//! A team is declared once per document: its identity attributes, its human
//! members, and the ordered rules granting it access to repositories.

mod entity;
mod validation;

pub use entity::{TeamAttributes, TeamDesiredState, TeamHandle, TeamVisibility};
pub use validation::{
    validate_member, validate_team_name, validate_team_slug, TeamValidationError,
};
