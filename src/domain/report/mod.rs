//! Run report types
//!
//! A report holds one outcome per document, in document order. Per-item
//! failures are kept as diagnostics on the outcome; a failed outcome carries
//! the error that stopped its reconciliation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a non-fatal diagnostic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    AddMember,
    RemoveMember,
    GrantRepository,
    RevokeRepository,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddMember => write!(f, "add member"),
            Self::RemoveMember => write!(f, "remove member"),
            Self::GrantRepository => write!(f, "grant repository"),
            Self::RevokeRepository => write!(f, "revoke repository"),
        }
    }
}

/// A single failed mutation that did not stop the reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub target: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}' failed: {}", self.kind, self.target, self.message)
    }
}

/// Final status of one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSyncStatus {
    Succeeded,
    Failed,
}

/// Outcome of reconciling one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSyncOutcome {
    pub slug: String,
    pub status: TeamSyncStatus,
    pub created: bool,
    pub members_added: usize,
    pub members_removed: usize,
    pub repositories_granted: usize,
    pub repositories_revoked: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TeamSyncOutcome {
    /// A fresh, successful outcome with nothing applied yet
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            status: TeamSyncStatus::Succeeded,
            created: false,
            members_added: 0,
            members_removed: 0,
            repositories_granted: 0,
            repositories_revoked: 0,
            diagnostics: Vec::new(),
            error: None,
        }
    }

    /// Mark the outcome failed with the error that aborted it
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = TeamSyncStatus::Failed;
        self.error = Some(error.into());
    }

    pub fn is_success(&self) -> bool {
        self.status == TeamSyncStatus::Succeeded
    }

    /// Number of successful remote mutations, excluding the team upsert
    pub fn mutations(&self) -> usize {
        self.members_added + self.members_removed + self.repositories_granted + self.repositories_revoked
    }
}

/// When a run as a whole counts as failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Only when every document failed
    #[default]
    AllFailed,
    /// When any document failed
    AnyFailed,
}

/// Aggregated result of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub org: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub teams: Vec<TeamSyncOutcome>,
}

impl SyncReport {
    pub fn succeeded(&self) -> usize {
        self.teams.iter().filter(|t| t.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.teams.len() - self.succeeded()
    }

    pub fn diagnostics(&self) -> usize {
        self.teams.iter().map(|t| t.diagnostics.len()).sum()
    }

    /// Overall result under the given policy. An empty run succeeds.
    pub fn is_success(&self, policy: FailurePolicy) -> bool {
        if self.teams.is_empty() {
            return true;
        }

        match policy {
            FailurePolicy::AllFailed => self.succeeded() > 0,
            FailurePolicy::AnyFailed => self.failed() == 0,
        }
    }
}
