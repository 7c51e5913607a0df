//! AuditTrail port - the read side of the append-only transition log.
//!
//! The trail answers "who approved this and why" for compliance purposes
//! and is authoritative over the version's own cached reviewer/publisher
//! fields. Entries are written by the version store inside the same
//! atomic operation as the transition they record, so a transition and
//! its audit entry land or fail together; no update or delete operation
//! exists anywhere.

use async_trait::async_trait;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{DocumentId, DomainError, VersionId};

/// Port for reading audit trail entries.
#[async_trait]
pub trait AuditTrail: Send + Sync {
    /// All entries for a version, in chronological order.
    async fn entries_for_version(
        &self,
        version_id: &VersionId,
    ) -> Result<Vec<AuditEntry>, DomainError>;

    /// All entries for a document, in chronological order.
    async fn entries_for_document(
        &self,
        document_id: &DocumentId,
    ) -> Result<Vec<AuditEntry>, DomainError>;
}
