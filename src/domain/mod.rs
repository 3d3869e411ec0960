//! Domain layer - Desired state, delta planning and the remote client seam

pub mod error;
pub mod membership;
pub mod remote;
pub mod report;
pub mod repository_access;
pub mod team;

pub use error::DomainError;
pub use membership::{plan_membership, MembershipDelta};
pub use remote::RemoteStateClient;
pub use report::{
    Diagnostic, DiagnosticKind, FailurePolicy, SyncReport, TeamSyncOutcome, TeamSyncStatus,
};
pub use repository_access::{
    plan_repository_access, Permission, RepositoryAccessDelta, RepositoryGrant,
    RepositoryPattern, RepositoryRule, RepositoryRules,
};
pub use team::{
    TeamAttributes, TeamDesiredState, TeamHandle, TeamValidationError, TeamVisibility,
};
