//! Version domain events.
//!
//! One event per workflow transition. The core only emits; delivery to
//! reviewers and authors belongs to an external notification dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{domain_event, DocumentId, EventId, Timestamp, UserId, VersionId};

// ════════════════════════════════════════════════════════════════════════════
// DraftCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a new draft version is created by authoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftCreated {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the new draft version.
    pub version_id: VersionId,

    /// Document the version belongs to.
    pub document_id: DocumentId,

    /// User who authored the draft.
    pub author_id: UserId,

    /// Position in the document's history.
    pub sequence_number: i64,

    /// When the draft was created.
    pub created_at: Timestamp,
}

domain_event!(
    DraftCreated,
    event_type = "version.draft_created.v1",
    schema_version = 1,
    aggregate_id = version_id,
    aggregate_type = "Version",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// VersionSubmitted
// ════════════════════════════════════════════════════════════════════════════

/// Published when a version enters peer review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionSubmitted {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the submitted version.
    pub version_id: VersionId,

    /// Document the version belongs to.
    pub document_id: DocumentId,

    /// User who submitted the version.
    pub submitted_by: UserId,

    /// Optional submission notes for the reviewer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When the submission occurred.
    pub submitted_at: Timestamp,
}

domain_event!(
    VersionSubmitted,
    event_type = "version.submitted.v1",
    schema_version = 1,
    aggregate_id = version_id,
    aggregate_type = "Version",
    occurred_at = submitted_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// VersionApproved
// ════════════════════════════════════════════════════════════════════════════

/// Published when a reviewer approves a version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionApproved {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the approved version.
    pub version_id: VersionId,

    /// Document the version belongs to.
    pub document_id: DocumentId,

    /// Reviewer who approved.
    pub reviewer_id: UserId,

    /// Optional approval comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    /// When the approval occurred.
    pub approved_at: Timestamp,
}

domain_event!(
    VersionApproved,
    event_type = "version.approved.v1",
    schema_version = 1,
    aggregate_id = version_id,
    aggregate_type = "Version",
    occurred_at = approved_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// VersionChangesRequested
// ════════════════════════════════════════════════════════════════════════════

/// Published when a reviewer sends a version back for changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionChangesRequested {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the version sent back.
    pub version_id: VersionId,

    /// Document the version belongs to.
    pub document_id: DocumentId,

    /// Reviewer who requested changes.
    pub reviewer_id: UserId,

    /// What needs to change.
    pub changes: String,

    /// Opaque structured inline comments, interpreted by the consumer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_comments: Option<JsonValue>,

    /// When the request occurred.
    pub requested_at: Timestamp,
}

domain_event!(
    VersionChangesRequested,
    event_type = "version.changes_requested.v1",
    schema_version = 1,
    aggregate_id = version_id,
    aggregate_type = "Version",
    occurred_at = requested_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// VersionPublished
// ════════════════════════════════════════════════════════════════════════════

/// Published when an approved version goes live.
///
/// If a previously published version was archived as part of the same
/// atomic operation, its id is carried here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionPublished {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the newly published version.
    pub version_id: VersionId,

    /// Document the version belongs to.
    pub document_id: DocumentId,

    /// User who published.
    pub published_by: UserId,

    /// Predecessor that was archived by this publish, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_version_id: Option<VersionId>,

    /// When the publication occurred.
    pub published_at: Timestamp,
}

domain_event!(
    VersionPublished,
    event_type = "version.published.v1",
    schema_version = 1,
    aggregate_id = version_id,
    aggregate_type = "Version",
    occurred_at = published_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// VersionRolledBack
// ════════════════════════════════════════════════════════════════════════════

/// Published when a rollback creates a new draft from an earlier version.
///
/// The target version is untouched; only a new draft pointing at it
/// comes into existence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRolledBack {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the new draft created by the rollback.
    pub version_id: VersionId,

    /// Document the rollback applies to.
    pub document_id: DocumentId,

    /// Version whose content was restored.
    pub target_version_id: VersionId,

    /// User who initiated the rollback.
    pub initiated_by: UserId,

    /// Why the rollback happened.
    pub reason: String,

    /// When the rollback occurred.
    pub rolled_back_at: Timestamp,
}

domain_event!(
    VersionRolledBack,
    event_type = "version.rolled_back.v1",
    schema_version = 1,
    aggregate_id = version_id,
    aggregate_type = "Version",
    occurred_at = rolled_back_at,
    event_id = event_id
);
