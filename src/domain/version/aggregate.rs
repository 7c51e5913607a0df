//! Version aggregate entity.
//!
//! A version is an immutable snapshot of document content plus workflow
//! metadata. Content is write-once: an edit always creates a new version,
//! never mutates an existing one. Status only ever moves through the
//! editorial state machine; no direct external write to status exists.
//!
//! # Ownership
//!
//! Versions reference their document by ID. Documents have no record of
//! their own - a document exists exactly while versions referencing it
//! exist, and is never deleted while any version remains.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{DocumentId, StateMachine, Timestamp, UserId, VersionId};

use super::{VersionError, VersionStatus, WorkflowEvent};

/// Version aggregate - one immutable content snapshot of a document.
///
/// # Invariants
///
/// - `content` is write-once (no setter exists)
/// - `sequence_number` is strictly increasing per document, never reused
/// - reviewer fields are set only by a review decision
/// - publish fields are set only by publication
/// - `status` changes only through the workflow methods below
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    /// Unique identifier for this version.
    id: VersionId,

    /// Document this version belongs to.
    document_id: DocumentId,

    /// Position in the document's history, starting at 1.
    sequence_number: i64,

    /// Opaque content payload. Never mutated after creation.
    content: JsonValue,

    /// Current workflow status.
    status: VersionStatus,

    /// User who authored this version.
    author_id: UserId,

    /// When the version was created.
    created_at: Timestamp,

    /// Reviewer who made the latest review decision, if any.
    reviewer_id: Option<UserId>,

    /// Comments from the latest review decision.
    review_comments: Option<String>,

    /// When the latest review decision was made.
    reviewed_at: Option<Timestamp>,

    /// User who published this version, if published.
    published_by_id: Option<UserId>,

    /// When this version was published.
    published_at: Option<Timestamp>,

    /// Version this one was rolled back from, if created via rollback.
    supersedes_version_id: Option<VersionId>,

    /// When the version last changed status.
    updated_at: Timestamp,
}

impl Version {
    /// Create a new draft version.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn new(
        id: VersionId,
        document_id: DocumentId,
        sequence_number: i64,
        content: JsonValue,
        author_id: UserId,
    ) -> Result<Self, VersionError> {
        if content_is_empty(&content) {
            return Err(VersionError::validation("content", "Content cannot be empty"));
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            document_id,
            sequence_number,
            content,
            status: VersionStatus::Draft,
            author_id,
            created_at: now,
            reviewer_id: None,
            review_comments: None,
            reviewed_at: None,
            published_by_id: None,
            published_at: None,
            supersedes_version_id: None,
            updated_at: now,
        })
    }

    /// Create a new draft by rolling back to an earlier version.
    ///
    /// Copies the target's content and records the target as superseded.
    /// The target itself is never touched.
    pub fn rollback_of(
        id: VersionId,
        target: &Version,
        sequence_number: i64,
        author_id: UserId,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            document_id: target.document_id,
            sequence_number,
            content: target.content.clone(),
            status: VersionStatus::Draft,
            author_id,
            created_at: now,
            reviewer_id: None,
            review_comments: None,
            reviewed_at: None,
            published_by_id: None,
            published_at: None,
            supersedes_version_id: Some(target.id),
            updated_at: now,
        }
    }

    /// Reconstitute a version from persistence (no validation, no events).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: VersionId,
        document_id: DocumentId,
        sequence_number: i64,
        content: JsonValue,
        status: VersionStatus,
        author_id: UserId,
        created_at: Timestamp,
        reviewer_id: Option<UserId>,
        review_comments: Option<String>,
        reviewed_at: Option<Timestamp>,
        published_by_id: Option<UserId>,
        published_at: Option<Timestamp>,
        supersedes_version_id: Option<VersionId>,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            document_id,
            sequence_number,
            content,
            status,
            author_id,
            created_at,
            reviewer_id,
            review_comments,
            reviewed_at,
            published_by_id,
            published_at,
            supersedes_version_id,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &VersionId {
        &self.id
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    pub fn sequence_number(&self) -> i64 {
        self.sequence_number
    }

    pub fn content(&self) -> &JsonValue {
        &self.content
    }

    pub fn status(&self) -> VersionStatus {
        self.status
    }

    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn reviewer_id(&self) -> Option<&UserId> {
        self.reviewer_id.as_ref()
    }

    pub fn review_comments(&self) -> Option<&str> {
        self.review_comments.as_deref()
    }

    pub fn reviewed_at(&self) -> Option<&Timestamp> {
        self.reviewed_at.as_ref()
    }

    pub fn published_by_id(&self) -> Option<&UserId> {
        self.published_by_id.as_ref()
    }

    pub fn published_at(&self) -> Option<&Timestamp> {
        self.published_at.as_ref()
    }

    pub fn supersedes_version_id(&self) -> Option<&VersionId> {
        self.supersedes_version_id.as_ref()
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Workflow transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Submit this version for peer review.
    ///
    /// Allowed from `Draft` (first submission) and from `ChangesRequested`
    /// (resubmission after a review round). Returns the previous status.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if not in `Draft` or `ChangesRequested`
    /// - `ValidationFailed` if content is empty
    pub fn submit_for_review(&mut self) -> Result<VersionStatus, VersionError> {
        let from = self.status;
        if !matches!(
            from,
            VersionStatus::Draft | VersionStatus::ChangesRequested
        ) {
            return Err(VersionError::invalid_transition(
                from,
                WorkflowEvent::SubmitForReview,
            ));
        }
        if content_is_empty(&self.content) {
            return Err(VersionError::validation("content", "Content cannot be empty"));
        }

        self.status = self
            .status
            .transition_to(VersionStatus::PendingReview)
            .map_err(|_| VersionError::invalid_transition(from, WorkflowEvent::SubmitForReview))?;
        self.updated_at = Timestamp::now();
        Ok(from)
    }

    /// Approve this version.
    ///
    /// The self-review check applies for every status, so an author can
    /// never learn anything from the error path about their own version's
    /// reviewability. Returns the previous status.
    ///
    /// # Errors
    ///
    /// - `SelfReview` if the reviewer authored this version
    /// - `InvalidTransition` if not in `PendingReview`
    pub fn approve(
        &mut self,
        reviewer_id: UserId,
        comments: Option<String>,
    ) -> Result<VersionStatus, VersionError> {
        if reviewer_id == self.author_id {
            return Err(VersionError::self_review());
        }

        let from = self.status;
        self.status = self
            .status
            .transition_to(VersionStatus::Approved)
            .map_err(|_| VersionError::invalid_transition(from, WorkflowEvent::Approve))?;
        self.reviewer_id = Some(reviewer_id);
        self.review_comments = comments;
        self.reviewed_at = Some(Timestamp::now());
        self.updated_at = Timestamp::now();
        Ok(from)
    }

    /// Request changes on this version.
    ///
    /// Returns the previous status.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if not in `PendingReview`
    /// - `ValidationFailed` if `changes` is empty
    pub fn request_changes(
        &mut self,
        reviewer_id: UserId,
        changes: String,
    ) -> Result<VersionStatus, VersionError> {
        let from = self.status;
        if from != VersionStatus::PendingReview {
            return Err(VersionError::invalid_transition(
                from,
                WorkflowEvent::RequestChanges,
            ));
        }
        if changes.trim().is_empty() {
            return Err(VersionError::validation(
                "changes",
                "Change request comments cannot be empty",
            ));
        }

        self.status = self
            .status
            .transition_to(VersionStatus::ChangesRequested)
            .map_err(|_| VersionError::invalid_transition(from, WorkflowEvent::RequestChanges))?;
        self.reviewer_id = Some(reviewer_id);
        self.review_comments = Some(changes);
        self.reviewed_at = Some(Timestamp::now());
        self.updated_at = Timestamp::now();
        Ok(from)
    }

    /// Publish this version.
    ///
    /// The caller (service + store) is responsible for atomically
    /// archiving any previously published version of the same document.
    /// Returns the previous status.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if not in `Approved`
    pub fn publish(&mut self, publisher_id: UserId) -> Result<VersionStatus, VersionError> {
        let from = self.status;
        self.status = self
            .status
            .transition_to(VersionStatus::Published)
            .map_err(|_| VersionError::invalid_transition(from, WorkflowEvent::Publish))?;
        self.published_by_id = Some(publisher_id);
        self.published_at = Some(Timestamp::now());
        self.updated_at = Timestamp::now();
        Ok(from)
    }

    /// Archive this version because a newer one was published.
    ///
    /// Triggered only as a side effect of a different version's publish,
    /// never directly by a caller. Returns the previous status.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if not in `Published`
    pub fn supersede(&mut self) -> Result<VersionStatus, VersionError> {
        let from = self.status;
        self.status = self
            .status
            .transition_to(VersionStatus::Archived)
            .map_err(|_| VersionError::invalid_transition(from, WorkflowEvent::Supersede))?;
        self.updated_at = Timestamp::now();
        Ok(from)
    }
}

/// An empty payload carries no publishable content: null, blank string,
/// empty object or empty array.
fn content_is_empty(content: &JsonValue) -> bool {
    match content {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        JsonValue::Object(map) => map.is_empty(),
        JsonValue::Array(items) => items.is_empty(),
        _ => false,
    }
}
