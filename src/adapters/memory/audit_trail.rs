//! In-memory implementation of the audit trail.
//!
//! Holds the shared entry log that `InMemoryVersionStore` appends into
//! transactionally with its writes, and implements the `AuditTrail` read
//! port over it.
//!
//! Testing only; panics on poisoned locks like the other memory adapters.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{DocumentId, DomainError, VersionId};
use crate::ports::AuditTrail;

/// In-memory append-only audit log.
pub struct InMemoryAuditTrail {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditTrail {
    /// Creates a new empty trail.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Appends an entry. Called by the in-memory version store while it
    /// holds its own write lock, which is what makes a transition and its
    /// entry land together.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub(crate) fn record(&self, entry: &AuditEntry) {
        self.entries
            .write()
            .expect("InMemoryAuditTrail: lock poisoned")
            .push(entry.clone());
    }

    /// Returns the number of recorded entries (for test assertions).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn entry_count(&self) -> usize {
        self.entries
            .read()
            .expect("InMemoryAuditTrail: lock poisoned")
            .len()
    }
}

impl Default for InMemoryAuditTrail {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditTrail for InMemoryAuditTrail {
    async fn entries_for_version(
        &self,
        version_id: &VersionId,
    ) -> Result<Vec<AuditEntry>, DomainError> {
        let entries = self
            .entries
            .read()
            .expect("InMemoryAuditTrail: lock poisoned");

        let mut matching: Vec<AuditEntry> = entries
            .iter()
            .filter(|e| e.version_id() == version_id)
            .cloned()
            .collect();
        matching.sort_by_key(|e| *e.occurred_at());
        Ok(matching)
    }

    async fn entries_for_document(
        &self,
        document_id: &DocumentId,
    ) -> Result<Vec<AuditEntry>, DomainError> {
        let entries = self
            .entries
            .read()
            .expect("InMemoryAuditTrail: lock poisoned");

        let mut matching: Vec<AuditEntry> = entries
            .iter()
            .filter(|e| e.document_id() == document_id)
            .cloned()
            .collect();
        matching.sort_by_key(|e| *e.occurred_at());
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::version::VersionStatus;

    fn actor() -> UserId {
        UserId::new("reviewer-1").unwrap()
    }

    #[tokio::test]
    async fn record_and_read_by_version() {
        let trail = InMemoryAuditTrail::new();
        let version_id = VersionId::new();
        let document_id = DocumentId::new();

        let entry = AuditEntry::record(
            version_id,
            document_id,
            Some(VersionStatus::Draft),
            VersionStatus::PendingReview,
            actor(),
        );
        trail.record(&entry);

        let entries = trail.entries_for_version(&version_id).await.unwrap();
        assert_eq!(entries, vec![entry]);
    }

    #[tokio::test]
    async fn entries_are_chronological() {
        let trail = InMemoryAuditTrail::new();
        let version_id = VersionId::new();
        let document_id = DocumentId::new();

        let first = AuditEntry::record(
            version_id,
            document_id,
            None,
            VersionStatus::Draft,
            actor(),
        );
        let second = AuditEntry::record(
            version_id,
            document_id,
            Some(VersionStatus::Draft),
            VersionStatus::PendingReview,
            actor(),
        );

        // Record out of order; reads still come back chronological.
        trail.record(&second);
        trail.record(&first);

        let entries = trail.entries_for_version(&version_id).await.unwrap();
        assert!(entries[0].occurred_at() <= entries[1].occurred_at());
    }

    #[tokio::test]
    async fn document_read_spans_versions() {
        let trail = InMemoryAuditTrail::new();
        let document_id = DocumentId::new();

        for _ in 0..3 {
            let entry = AuditEntry::record(
                VersionId::new(),
                document_id,
                None,
                VersionStatus::Draft,
                actor(),
            );
            trail.record(&entry);
        }
        let other = AuditEntry::record(
            VersionId::new(),
            DocumentId::new(),
            None,
            VersionStatus::Draft,
            actor(),
        );
        trail.record(&other);

        let entries = trail.entries_for_document(&document_id).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(trail.entry_count(), 4);
    }
}
