//! Reconciliation services
//!
//! One reconciler per concern plus the run orchestrator that chains them.

mod membership_reconciler;
mod repository_access_reconciler;
mod sync_service;
mod team_reconciler;

pub use membership_reconciler::{MembershipReconciler, MembershipResult};
pub use repository_access_reconciler::{RepositoryAccessReconciler, RepositoryAccessResult};
pub use sync_service::SyncService;
pub use team_reconciler::{TeamReconciler, TeamUpsert};
