//! Immutable audit trail entries.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{AuditEntryId, DocumentId, Timestamp, UserId, VersionId};
use crate::domain::version::VersionStatus;

/// One immutable entry in the audit trail: who moved which version from
/// where to where, when, and why.
///
/// Entries are append-only; no update or delete operation exists anywhere
/// in the system. `from_status` is `None` for the entry that records a
/// version coming into existence. `document_id` is denormalized so the
/// trail can be read per document without a join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique identifier for this entry.
    id: AuditEntryId,

    /// Version the transition applied to.
    version_id: VersionId,

    /// Document the version belongs to.
    document_id: DocumentId,

    /// Status before the transition; `None` when the version was created.
    from_status: Option<VersionStatus>,

    /// Status after the transition.
    to_status: VersionStatus,

    /// User (or system actor) who caused the transition.
    actor_id: UserId,

    /// When the transition occurred.
    occurred_at: Timestamp,

    /// Free-form comments (review feedback, rollback reason, notes).
    comments: Option<String>,

    /// Opaque structured attachment (e.g. inline review comments).
    /// Stored verbatim and interpreted by the consumer.
    attachment: Option<JsonValue>,
}

impl AuditEntry {
    /// Records a new entry for a transition happening now.
    pub fn record(
        version_id: VersionId,
        document_id: DocumentId,
        from_status: Option<VersionStatus>,
        to_status: VersionStatus,
        actor_id: UserId,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            version_id,
            document_id,
            from_status,
            to_status,
            actor_id,
            occurred_at: Timestamp::now(),
            comments: None,
            attachment: None,
        }
    }

    /// Builder: attach free-form comments.
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    /// Builder: attach an opaque structured payload.
    pub fn with_attachment(mut self, attachment: JsonValue) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Reconstitute an entry from persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: AuditEntryId,
        version_id: VersionId,
        document_id: DocumentId,
        from_status: Option<VersionStatus>,
        to_status: VersionStatus,
        actor_id: UserId,
        occurred_at: Timestamp,
        comments: Option<String>,
        attachment: Option<JsonValue>,
    ) -> Self {
        Self {
            id,
            version_id,
            document_id,
            from_status,
            to_status,
            actor_id,
            occurred_at,
            comments,
            attachment,
        }
    }

    pub fn id(&self) -> &AuditEntryId {
        &self.id
    }

    pub fn version_id(&self) -> &VersionId {
        &self.version_id
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    pub fn from_status(&self) -> Option<VersionStatus> {
        self.from_status
    }

    pub fn to_status(&self) -> VersionStatus {
        self.to_status
    }

    pub fn actor_id(&self) -> &UserId {
        &self.actor_id
    }

    pub fn occurred_at(&self) -> &Timestamp {
        &self.occurred_at
    }

    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn attachment(&self) -> Option<&JsonValue> {
        self.attachment.as_ref()
    }
}
