//! VersionStore port - durable persistence of version records.
//!
//! Pure data access, no business rules: the store creates rows, reads
//! them back, and applies conditional updates. The workflow rules live in
//! the domain layer; the store's job beyond persistence is to hold the
//! concurrency and atomicity guarantees the workflow depends on:
//!
//! - every write takes the audit entry recording it, and persists both
//!   in one atomic operation - a transition and its audit entry succeed
//!   or fail together,
//! - `update_guarded` succeeds only while the stored status still equals
//!   the expected status (optimistic concurrency),
//! - `publish` demotes the previously published version and promotes the
//!   new one inside one atomic, per-document-serialized operation.

use async_trait::async_trait;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{DocumentId, DomainError, VersionId};
use crate::domain::version::{Version, VersionStatus};

/// Repository port for Version persistence.
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Persist a brand-new draft version together with its creation
    /// audit entry.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the document already has a version in `Draft` or
    ///   `PendingReview` (a document has a single active line of work),
    ///   or if the sequence number was taken by a concurrent writer
    /// - `DatabaseError` on persistence failure
    async fn create(&self, version: &Version, entry: &AuditEntry) -> Result<(), DomainError>;

    /// Next sequence number for a document (1 for a new document).
    async fn next_sequence_number(&self, document_id: &DocumentId) -> Result<i64, DomainError>;

    /// Find a version by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &VersionId) -> Result<Option<Version>, DomainError>;

    /// Ordered history for a document, newest first.
    ///
    /// The result is a finite snapshot; observing later transitions
    /// requires a full re-query.
    async fn history(&self, document_id: &DocumentId) -> Result<Vec<Version>, DomainError>;

    /// The document's currently published version, if any.
    async fn find_published(&self, document_id: &DocumentId)
        -> Result<Option<Version>, DomainError>;

    /// Conditionally persist a transitioned version together with the
    /// audit entry recording the transition.
    ///
    /// The update applies only while the stored status still equals
    /// `expected_status`; otherwise a concurrent caller won the race and
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the stored status no longer matches
    /// - `DatabaseError` on persistence failure
    async fn update_guarded(
        &self,
        version: &Version,
        expected_status: VersionStatus,
        entry: &AuditEntry,
    ) -> Result<(), DomainError>;

    /// Atomically publish a version, demoting the document's previously
    /// published version (if any) to `Archived` in the same operation.
    ///
    /// This is the only operation that touches two version rows at once;
    /// implementations must serialize it per document. `entry` records
    /// the `Approved -> Published` transition; when a predecessor is
    /// archived, the implementation appends the corresponding
    /// `Published -> Archived` entry itself, attributed to the same
    /// actor. Returns the archived predecessor, if one existed. No
    /// intermediate state (two published versions, or none where one
    /// existed) is ever observable by a concurrent reader.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the version's stored status no longer matches
    ///   `expected_status`
    /// - `DatabaseError` on persistence failure
    async fn publish(
        &self,
        version: &Version,
        expected_status: VersionStatus,
        entry: &AuditEntry,
    ) -> Result<Option<Version>, DomainError>;
}
