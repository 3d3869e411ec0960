//! Repository access domain module
//!
//! Ordered `(pattern, permission)` rules decide which repositories of the
//! organization a team may access. The delta planner compares the resolved
//! rules against the team's live grants.

mod delta;
mod permission;
mod rule;

pub use delta::{plan_repository_access, RepositoryAccessDelta, RepositoryGrant};
pub use permission::Permission;
pub use rule::{RepositoryPattern, RepositoryRule, RepositoryRules};
