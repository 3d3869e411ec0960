//! Desired-state document loading
//!
//! Turns files on disk into validated `TeamDesiredState` values before any
//! remote call is made.

mod loader;
mod model;

pub use loader::{parse_document, DocumentFormat, DocumentLoader};
pub use model::{RuleEntry, RuleList, TeamDocument};
