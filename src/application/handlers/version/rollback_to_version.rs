//! RollbackToVersionHandler - Command handler for rolling a document back.

use std::sync::Arc;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{
    CommandMetadata, DocumentId, EventId, SerializableDomainEvent, Timestamp, UserId, VersionId,
};
use crate::domain::version::{Version, VersionError, VersionRolledBack, VersionStatus};
use crate::ports::{EventPublisher, VersionStore};

/// Command to roll a document back to an earlier version.
#[derive(Debug, Clone)]
pub struct RollbackToVersionCommand {
    pub document_id: DocumentId,
    pub target_version_id: VersionId,
    /// Why the rollback happened. Must be non-empty.
    pub reason: String,
    pub user_id: UserId,
}

/// Result of a successful rollback.
#[derive(Debug, Clone)]
pub struct RollbackToVersionResult {
    /// The new draft created by the rollback.
    pub version: Version,
    pub event: VersionRolledBack,
}

/// Handler for rollbacks.
///
/// A rollback is non-destructive: it creates a brand-new draft whose
/// content copies the target and whose `supersedes_version_id` points at
/// it. Neither the target nor the currently published version is touched;
/// going live again still takes the full review-and-publish path.
pub struct RollbackToVersionHandler {
    store: Arc<dyn VersionStore>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RollbackToVersionHandler {
    pub fn new(store: Arc<dyn VersionStore>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: RollbackToVersionCommand,
        metadata: CommandMetadata,
    ) -> Result<RollbackToVersionResult, VersionError> {
        // 1. Validate input
        if cmd.reason.trim().is_empty() {
            return Err(VersionError::validation(
                "reason",
                "Rollback reason cannot be empty",
            ));
        }

        // 2. Load the target; it must belong to the given document
        let target = self
            .store
            .find_by_id(&cmd.target_version_id)
            .await?
            .ok_or(VersionError::NotFound(cmd.target_version_id))?;
        if target.document_id() != &cmd.document_id {
            return Err(VersionError::NotFound(cmd.target_version_id));
        }

        // 3. Build the new draft from the target's content
        let sequence_number = self.store.next_sequence_number(&cmd.document_id).await?;
        let version = Version::rollback_of(
            VersionId::new(),
            &target,
            sequence_number,
            cmd.user_id.clone(),
        );

        // 4. Persist draft + audit entry atomically. The single-active-
        //    draft invariant applies to rollback drafts too, so this
        //    conflicts if the document already has a version in progress.
        let entry = AuditEntry::record(
            *version.id(),
            cmd.document_id,
            None,
            VersionStatus::Draft,
            cmd.user_id.clone(),
        )
        .with_comments(cmd.reason.clone());
        self.store.create(&version, &entry).await?;

        // 5. Publish event
        let event = VersionRolledBack {
            event_id: EventId::new(),
            version_id: *version.id(),
            document_id: cmd.document_id,
            target_version_id: cmd.target_version_id,
            initiated_by: cmd.user_id,
            reason: cmd.reason,
            rolled_back_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(RollbackToVersionResult { version, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryAuditTrail, InMemoryEventBus, InMemoryVersionStore};
    use crate::ports::AuditTrail;
    use serde_json::json;

    fn author() -> UserId {
        UserId::new("author-1").unwrap()
    }

    fn reviewer() -> UserId {
        UserId::new("reviewer-1").unwrap()
    }

    fn editor() -> UserId {
        UserId::new("editor-1").unwrap()
    }

    fn fixtures() -> (
        Arc<InMemoryAuditTrail>,
        Arc<InMemoryVersionStore>,
        Arc<InMemoryEventBus>,
        RollbackToVersionHandler,
    ) {
        let trail = Arc::new(InMemoryAuditTrail::new());
        let store = Arc::new(InMemoryVersionStore::new(Arc::clone(&trail)));
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = RollbackToVersionHandler::new(store.clone(), bus.clone());
        (trail, store, bus, handler)
    }

    /// Seeds a published version for a document.
    async fn seed_published(store: &InMemoryVersionStore, document_id: DocumentId, seq: i64) -> Version {
        let mut version = Version::new(
            VersionId::new(),
            document_id,
            seq,
            json!({"body": format!("published copy {}", seq)}),
            author(),
        )
        .unwrap();
        let entry = AuditEntry::record(
            *version.id(),
            document_id,
            None,
            VersionStatus::Draft,
            author(),
        );
        store.create(&version, &entry).await.unwrap();

        version.submit_for_review().unwrap();
        let entry = AuditEntry::record(
            *version.id(),
            document_id,
            Some(VersionStatus::Draft),
            VersionStatus::PendingReview,
            author(),
        );
        store
            .update_guarded(&version, VersionStatus::Draft, &entry)
            .await
            .unwrap();

        version.approve(reviewer(), None).unwrap();
        let entry = AuditEntry::record(
            *version.id(),
            document_id,
            Some(VersionStatus::PendingReview),
            VersionStatus::Approved,
            reviewer(),
        );
        store
            .update_guarded(&version, VersionStatus::PendingReview, &entry)
            .await
            .unwrap();

        version.publish(reviewer()).unwrap();
        let entry = AuditEntry::record(
            *version.id(),
            document_id,
            Some(VersionStatus::Approved),
            VersionStatus::Published,
            reviewer(),
        );
        store
            .publish(&version, VersionStatus::Approved, &entry)
            .await
            .unwrap();
        version
    }

    fn metadata() -> CommandMetadata {
        CommandMetadata::new(editor()).with_correlation_id("test-correlation")
    }

    #[tokio::test]
    async fn rollback_creates_new_draft_pointing_at_target() {
        let (_trail, store, _bus, handler) = fixtures();
        let document_id = DocumentId::new();
        let target = seed_published(&store, document_id, 1).await;

        let result = handler
            .handle(
                RollbackToVersionCommand {
                    document_id,
                    target_version_id: *target.id(),
                    reason: "v2 broke the layout".to_string(),
                    user_id: editor(),
                },
                metadata(),
            )
            .await
            .unwrap();

        assert_eq!(result.version.status(), VersionStatus::Draft);
        assert_eq!(result.version.content(), target.content());
        assert_eq!(result.version.supersedes_version_id(), Some(target.id()));
        assert_eq!(result.version.sequence_number(), 2);
        assert_eq!(result.version.author_id(), &editor());
    }

    #[tokio::test]
    async fn rollback_never_mutates_target() {
        let (_trail, store, _bus, handler) = fixtures();
        let document_id = DocumentId::new();
        let target = seed_published(&store, document_id, 1).await;
        let target_before = store.find_by_id(target.id()).await.unwrap().unwrap();

        handler
            .handle(
                RollbackToVersionCommand {
                    document_id,
                    target_version_id: *target.id(),
                    reason: "restore old copy".to_string(),
                    user_id: editor(),
                },
                metadata(),
            )
            .await
            .unwrap();

        // Target keeps its content, status, and publish fields.
        let target_after = store.find_by_id(target.id()).await.unwrap().unwrap();
        assert_eq!(target_after, target_before);
        assert_eq!(target_after.status(), VersionStatus::Published);

        // The published pointer is unchanged too.
        let published = store.find_published(&document_id).await.unwrap().unwrap();
        assert_eq!(published.id(), target.id());
    }

    #[tokio::test]
    async fn rollback_records_audit_entry_with_reason() {
        let (trail, store, _bus, handler) = fixtures();
        let document_id = DocumentId::new();
        let target = seed_published(&store, document_id, 1).await;

        let result = handler
            .handle(
                RollbackToVersionCommand {
                    document_id,
                    target_version_id: *target.id(),
                    reason: "bad merge in v3".to_string(),
                    user_id: editor(),
                },
                metadata(),
            )
            .await
            .unwrap();

        let entries = trail
            .entries_for_version(result.version.id())
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].from_status(), None);
        assert_eq!(entries[0].to_status(), VersionStatus::Draft);
        assert_eq!(entries[0].comments(), Some("bad merge in v3"));
        assert_eq!(entries[0].actor_id(), &editor());
    }

    #[tokio::test]
    async fn rollback_rejects_empty_reason() {
        let (_trail, store, bus, handler) = fixtures();
        let document_id = DocumentId::new();
        let target = seed_published(&store, document_id, 1).await;

        let result = handler
            .handle(
                RollbackToVersionCommand {
                    document_id,
                    target_version_id: *target.id(),
                    reason: " ".to_string(),
                    user_id: editor(),
                },
                metadata(),
            )
            .await;

        assert!(matches!(
            result,
            Err(VersionError::ValidationFailed { .. })
        ));
        assert!(bus.published_events().is_empty());
    }

    #[tokio::test]
    async fn rollback_fails_when_target_belongs_to_other_document() {
        let (_trail, store, _bus, handler) = fixtures();
        let document_id = DocumentId::new();
        let foreign_target = seed_published(&store, DocumentId::new(), 1).await;

        let result = handler
            .handle(
                RollbackToVersionCommand {
                    document_id,
                    target_version_id: *foreign_target.id(),
                    reason: "wrong document".to_string(),
                    user_id: editor(),
                },
                metadata(),
            )
            .await;

        assert_eq!(
            result.unwrap_err(),
            VersionError::NotFound(*foreign_target.id())
        );
    }

    #[tokio::test]
    async fn rollback_fails_when_target_missing() {
        let (_trail, _store, _bus, handler) = fixtures();

        let missing = VersionId::new();
        let result = handler
            .handle(
                RollbackToVersionCommand {
                    document_id: DocumentId::new(),
                    target_version_id: missing,
                    reason: "anything".to_string(),
                    user_id: editor(),
                },
                metadata(),
            )
            .await;

        assert_eq!(result.unwrap_err(), VersionError::NotFound(missing));
    }

    #[tokio::test]
    async fn rollback_conflicts_with_active_draft() {
        let (trail, store, _bus, handler) = fixtures();
        let document_id = DocumentId::new();
        let target = seed_published(&store, document_id, 1).await;

        // An in-progress draft occupies the document's single active line
        // of work.
        let draft = Version::new(
            VersionId::new(),
            document_id,
            2,
            json!({"body": "work in progress"}),
            author(),
        )
        .unwrap();
        let entry = AuditEntry::record(
            *draft.id(),
            document_id,
            None,
            VersionStatus::Draft,
            author(),
        );
        store.create(&draft, &entry).await.unwrap();
        let entries_before = trail.entry_count();

        let result = handler
            .handle(
                RollbackToVersionCommand {
                    document_id,
                    target_version_id: *target.id(),
                    reason: "restore".to_string(),
                    user_id: editor(),
                },
                metadata(),
            )
            .await;

        assert!(matches!(result, Err(VersionError::Conflict(_))));
        assert_eq!(trail.entry_count(), entries_before);
    }

    #[tokio::test]
    async fn publishes_rolled_back_event() {
        let (_trail, store, bus, handler) = fixtures();
        let document_id = DocumentId::new();
        let target = seed_published(&store, document_id, 1).await;

        handler
            .handle(
                RollbackToVersionCommand {
                    document_id,
                    target_version_id: *target.id(),
                    reason: "v2 regression".to_string(),
                    user_id: editor(),
                },
                metadata(),
            )
            .await
            .unwrap();

        let events = bus.events_of_type("version.rolled_back.v1");
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].payload["target_version_id"],
            json!(target.id().to_string())
        );
    }
}
