//! In-memory implementation of VersionStore.
//!
//! # Security Note
//!
//! This adapter is for **testing only** and should not be used in
//! production. It uses `.expect()` on lock operations which will panic if
//! locks are poisoned. Production code uses the postgres adapter.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, VersionId};
use crate::domain::version::{Version, VersionStatus};
use crate::ports::VersionStore;

use super::InMemoryAuditTrail;

/// In-memory version store.
///
/// All operations take the single store lock, which makes every method
/// atomic with respect to every other - a superset of the per-document
/// serialization the publish contract requires. Audit entries are
/// appended to the shared trail while the lock is held, so a transition
/// and its entry land together.
pub struct InMemoryVersionStore {
    versions: RwLock<Vec<Version>>,
    audit: Arc<InMemoryAuditTrail>,
}

impl InMemoryVersionStore {
    /// Creates a new empty store appending entries to the given trail.
    pub fn new(audit: Arc<InMemoryAuditTrail>) -> Self {
        Self {
            versions: RwLock::new(Vec::new()),
            audit,
        }
    }

    /// Returns the number of stored versions (for test assertions).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn version_count(&self) -> usize {
        self.versions
            .read()
            .expect("InMemoryVersionStore: lock poisoned")
            .len()
    }
}

#[async_trait]
impl VersionStore for InMemoryVersionStore {
    async fn create(&self, version: &Version, entry: &AuditEntry) -> Result<(), DomainError> {
        let mut versions = self
            .versions
            .write()
            .expect("InMemoryVersionStore: lock poisoned");

        let has_active_work = versions.iter().any(|v| {
            v.document_id() == version.document_id() && v.status().is_active_work()
        });
        if has_active_work {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!(
                    "Document {} already has a version in progress",
                    version.document_id()
                ),
            ));
        }

        let sequence_taken = versions.iter().any(|v| {
            v.document_id() == version.document_id()
                && v.sequence_number() == version.sequence_number()
        });
        if sequence_taken {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!(
                    "Sequence number {} already exists for document {}",
                    version.sequence_number(),
                    version.document_id()
                ),
            ));
        }

        versions.push(version.clone());
        self.audit.record(entry);
        Ok(())
    }

    async fn next_sequence_number(&self, document_id: &DocumentId) -> Result<i64, DomainError> {
        let versions = self
            .versions
            .read()
            .expect("InMemoryVersionStore: lock poisoned");

        let max = versions
            .iter()
            .filter(|v| v.document_id() == document_id)
            .map(Version::sequence_number)
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }

    async fn find_by_id(&self, id: &VersionId) -> Result<Option<Version>, DomainError> {
        let versions = self
            .versions
            .read()
            .expect("InMemoryVersionStore: lock poisoned");
        Ok(versions.iter().find(|v| v.id() == id).cloned())
    }

    async fn history(&self, document_id: &DocumentId) -> Result<Vec<Version>, DomainError> {
        let versions = self
            .versions
            .read()
            .expect("InMemoryVersionStore: lock poisoned");

        let mut history: Vec<Version> = versions
            .iter()
            .filter(|v| v.document_id() == document_id)
            .cloned()
            .collect();
        history.sort_by_key(|v| std::cmp::Reverse(v.sequence_number()));
        Ok(history)
    }

    async fn find_published(
        &self,
        document_id: &DocumentId,
    ) -> Result<Option<Version>, DomainError> {
        let versions = self
            .versions
            .read()
            .expect("InMemoryVersionStore: lock poisoned");

        Ok(versions
            .iter()
            .find(|v| v.document_id() == document_id && v.status() == VersionStatus::Published)
            .cloned())
    }

    async fn update_guarded(
        &self,
        version: &Version,
        expected_status: VersionStatus,
        entry: &AuditEntry,
    ) -> Result<(), DomainError> {
        let mut versions = self
            .versions
            .write()
            .expect("InMemoryVersionStore: lock poisoned");

        let stored = versions
            .iter_mut()
            .find(|v| v.id() == version.id())
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::VersionNotFound,
                    format!("Version not found: {}", version.id()),
                )
            })?;

        if stored.status() != expected_status {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!(
                    "Expected status '{}', found '{}'",
                    expected_status,
                    stored.status()
                ),
            ));
        }

        *stored = version.clone();
        self.audit.record(entry);
        Ok(())
    }

    async fn publish(
        &self,
        version: &Version,
        expected_status: VersionStatus,
        entry: &AuditEntry,
    ) -> Result<Option<Version>, DomainError> {
        // One write lock spans both row updates, so no reader can observe
        // an intermediate state.
        let mut versions = self
            .versions
            .write()
            .expect("InMemoryVersionStore: lock poisoned");

        let stored_status = versions
            .iter()
            .find(|v| v.id() == version.id())
            .map(Version::status)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::VersionNotFound,
                    format!("Version not found: {}", version.id()),
                )
            })?;

        if stored_status != expected_status {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!(
                    "Expected status '{}', found '{}'",
                    expected_status, stored_status
                ),
            ));
        }

        let archived = match versions.iter_mut().find(|v| {
            v.document_id() == version.document_id()
                && v.status() == VersionStatus::Published
                && v.id() != version.id()
        }) {
            Some(previous) => {
                previous
                    .supersede()
                    .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;
                Some(previous.clone())
            }
            None => None,
        };

        if let Some(stored) = versions.iter_mut().find(|v| v.id() == version.id()) {
            *stored = version.clone();
        }

        if let Some(previous) = &archived {
            self.audit.record(
                &AuditEntry::record(
                    *previous.id(),
                    *previous.document_id(),
                    Some(VersionStatus::Published),
                    VersionStatus::Archived,
                    entry.actor_id().clone(),
                )
                .with_comments(format!("Superseded by version {}", version.sequence_number())),
            );
        }
        self.audit.record(entry);

        Ok(archived)
    }
}
