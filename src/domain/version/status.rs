//! VersionStatus enum and the editorial workflow state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a document version.
///
/// A version starts in `Draft` (by authoring or rollback), moves through
/// review, and terminates in `Published` or `Archived` - or remains in
/// `Draft`/`ChangesRequested` indefinitely if abandoned. Versions are
/// never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    #[default]
    Draft,
    PendingReview,
    ChangesRequested,
    Approved,
    Published,
    Archived,
}

impl VersionStatus {
    /// Returns true while the version is an active line of in-progress
    /// work. A document may hold at most one such version at a time.
    pub fn is_active_work(&self) -> bool {
        matches!(self, VersionStatus::Draft | VersionStatus::PendingReview)
    }

    /// Returns the canonical wire name (snake_case, as persisted).
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionStatus::Draft => "draft",
            VersionStatus::PendingReview => "pending_review",
            VersionStatus::ChangesRequested => "changes_requested",
            VersionStatus::Approved => "approved",
            VersionStatus::Published => "published",
            VersionStatus::Archived => "archived",
        }
    }

    /// Parses the canonical wire name.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(VersionStatus::Draft),
            "pending_review" => Some(VersionStatus::PendingReview),
            "changes_requested" => Some(VersionStatus::ChangesRequested),
            "approved" => Some(VersionStatus::Approved),
            "published" => Some(VersionStatus::Published),
            "archived" => Some(VersionStatus::Archived),
            _ => None,
        }
    }
}

impl StateMachine for VersionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use VersionStatus::*;
        matches!(
            (self, target),
            (Draft, PendingReview)
                | (PendingReview, Approved)
                | (PendingReview, ChangesRequested)
                | (ChangesRequested, PendingReview)
                | (ChangesRequested, Draft)
                | (Approved, Published)
                | (Published, Archived)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use VersionStatus::*;
        match self {
            Draft => vec![PendingReview],
            PendingReview => vec![Approved, ChangesRequested],
            ChangesRequested => vec![PendingReview, Draft],
            Approved => vec![Published],
            Published => vec![Archived],
            Archived => vec![],
        }
    }
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The workflow events that drive version transitions.
///
/// Used in error reporting and audit entries so a rejected transition
/// names the event that was attempted, never a coerced alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowEvent {
    SubmitForReview,
    Approve,
    RequestChanges,
    Resubmit,
    Publish,
    Supersede,
    Rollback,
}

impl WorkflowEvent {
    /// Returns the canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowEvent::SubmitForReview => "submit_for_review",
            WorkflowEvent::Approve => "approve",
            WorkflowEvent::RequestChanges => "request_changes",
            WorkflowEvent::Resubmit => "resubmit",
            WorkflowEvent::Publish => "publish",
            WorkflowEvent::Supersede => "supersede",
            WorkflowEvent::Rollback => "rollback",
        }
    }
}

impl fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
