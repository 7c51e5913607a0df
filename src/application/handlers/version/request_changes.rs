//! RequestChangesHandler - Command handler for sending a version back.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{
    CommandMetadata, EventId, SerializableDomainEvent, Timestamp, UserId, VersionId,
};
use crate::domain::version::{Version, VersionChangesRequested, VersionError, VersionStatus};
use crate::ports::{EventPublisher, VersionStore};

/// Command to request changes on a version under review.
#[derive(Debug, Clone)]
pub struct RequestChangesCommand {
    pub version_id: VersionId,
    pub reviewer_id: UserId,
    /// What needs to change. Must be non-empty.
    pub changes: String,
    /// Opaque structured inline comments, stored verbatim on the audit
    /// entry and interpreted by the consumer.
    pub inline_comments: Option<JsonValue>,
}

/// Result of a successful change request.
#[derive(Debug, Clone)]
pub struct RequestChangesResult {
    pub version: Version,
    pub event: VersionChangesRequested,
}

/// Handler for requesting changes.
pub struct RequestChangesHandler {
    store: Arc<dyn VersionStore>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RequestChangesHandler {
    pub fn new(store: Arc<dyn VersionStore>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: RequestChangesCommand,
        metadata: CommandMetadata,
    ) -> Result<RequestChangesResult, VersionError> {
        // 1. Load version
        let mut version = self
            .store
            .find_by_id(&cmd.version_id)
            .await?
            .ok_or(VersionError::NotFound(cmd.version_id))?;

        // 2. Transition (validates status and non-empty comments)
        let previous = version.request_changes(cmd.reviewer_id.clone(), cmd.changes.clone())?;

        // 3. Persist transition + audit entry atomically
        let mut entry = AuditEntry::record(
            cmd.version_id,
            *version.document_id(),
            Some(previous),
            VersionStatus::ChangesRequested,
            cmd.reviewer_id.clone(),
        )
        .with_comments(cmd.changes.clone());
        if let Some(inline) = &cmd.inline_comments {
            entry = entry.with_attachment(inline.clone());
        }
        self.store
            .update_guarded(&version, previous, &entry)
            .await?;

        // 4. Publish event
        let event = VersionChangesRequested {
            event_id: EventId::new(),
            version_id: cmd.version_id,
            document_id: *version.document_id(),
            reviewer_id: cmd.reviewer_id,
            changes: cmd.changes,
            inline_comments: cmd.inline_comments,
            requested_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(RequestChangesResult { version, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryAuditTrail, InMemoryEventBus, InMemoryVersionStore};
    use crate::domain::foundation::DocumentId;
    use crate::ports::AuditTrail;
    use serde_json::json;

    fn author() -> UserId {
        UserId::new("author-1").unwrap()
    }

    fn reviewer() -> UserId {
        UserId::new("reviewer-1").unwrap()
    }

    fn fixtures() -> (
        Arc<InMemoryAuditTrail>,
        Arc<InMemoryVersionStore>,
        Arc<InMemoryEventBus>,
        RequestChangesHandler,
    ) {
        let trail = Arc::new(InMemoryAuditTrail::new());
        let store = Arc::new(InMemoryVersionStore::new(Arc::clone(&trail)));
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = RequestChangesHandler::new(store.clone(), bus.clone());
        (trail, store, bus, handler)
    }

    async fn seed_pending(store: &InMemoryVersionStore) -> Version {
        let mut version = Version::new(
            VersionId::new(),
            DocumentId::new(),
            1,
            json!({"body": "Expense policy"}),
            author(),
        )
        .unwrap();
        let entry = AuditEntry::record(
            *version.id(),
            *version.document_id(),
            None,
            VersionStatus::Draft,
            author(),
        );
        store.create(&version, &entry).await.unwrap();

        version.submit_for_review().unwrap();
        let entry = AuditEntry::record(
            *version.id(),
            *version.document_id(),
            Some(VersionStatus::Draft),
            VersionStatus::PendingReview,
            author(),
        );
        store
            .update_guarded(&version, VersionStatus::Draft, &entry)
            .await
            .unwrap();
        version
    }

    fn metadata() -> CommandMetadata {
        CommandMetadata::new(reviewer()).with_correlation_id("test-correlation")
    }

    #[tokio::test]
    async fn sends_version_back_with_comments() {
        let (_trail, store, _bus, handler) = fixtures();
        let version = seed_pending(&store).await;

        let result = handler
            .handle(
                RequestChangesCommand {
                    version_id: *version.id(),
                    reviewer_id: reviewer(),
                    changes: "fix typo in section 3".to_string(),
                    inline_comments: None,
                },
                metadata(),
            )
            .await
            .unwrap();

        assert_eq!(result.version.status(), VersionStatus::ChangesRequested);
        assert_eq!(
            result.version.review_comments(),
            Some("fix typo in section 3")
        );

        let stored = store.find_by_id(version.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), VersionStatus::ChangesRequested);
    }

    #[tokio::test]
    async fn rejects_empty_changes() {
        let (trail, store, bus, handler) = fixtures();
        let version = seed_pending(&store).await;
        let entries_before = trail.entry_count();

        let result = handler
            .handle(
                RequestChangesCommand {
                    version_id: *version.id(),
                    reviewer_id: reviewer(),
                    changes: "   ".to_string(),
                    inline_comments: None,
                },
                metadata(),
            )
            .await;

        assert!(matches!(
            result,
            Err(VersionError::ValidationFailed { .. })
        ));
        assert_eq!(trail.entry_count(), entries_before);
        assert!(bus.published_events().is_empty());
    }

    #[tokio::test]
    async fn stores_inline_comments_on_audit_entry() {
        let (trail, store, _bus, handler) = fixtures();
        let version = seed_pending(&store).await;
        let inline = json!([{"line": 12, "note": "broken anchor"}]);

        handler
            .handle(
                RequestChangesCommand {
                    version_id: *version.id(),
                    reviewer_id: reviewer(),
                    changes: "see inline notes".to_string(),
                    inline_comments: Some(inline.clone()),
                },
                metadata(),
            )
            .await
            .unwrap();

        let entries = trail.entries_for_version(version.id()).await.unwrap();
        let request = entries.last().unwrap();
        assert_eq!(request.to_status(), VersionStatus::ChangesRequested);
        assert_eq!(request.comments(), Some("see inline notes"));
        assert_eq!(request.attachment(), Some(&inline));
    }

    #[tokio::test]
    async fn publishes_changes_requested_event() {
        let (_trail, store, bus, handler) = fixtures();
        let version = seed_pending(&store).await;

        handler
            .handle(
                RequestChangesCommand {
                    version_id: *version.id(),
                    reviewer_id: reviewer(),
                    changes: "needs sources".to_string(),
                    inline_comments: None,
                },
                metadata(),
            )
            .await
            .unwrap();

        let events = bus.events_of_type("version.changes_requested.v1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payload["changes"], json!("needs sources"));
    }

    #[tokio::test]
    async fn fails_outside_review() {
        let (_trail, store, _bus, handler) = fixtures();

        let version = Version::new(
            VersionId::new(),
            DocumentId::new(),
            1,
            json!({"body": "draft"}),
            author(),
        )
        .unwrap();
        let entry = AuditEntry::record(
            *version.id(),
            *version.document_id(),
            None,
            VersionStatus::Draft,
            author(),
        );
        store.create(&version, &entry).await.unwrap();

        let result = handler
            .handle(
                RequestChangesCommand {
                    version_id: *version.id(),
                    reviewer_id: reviewer(),
                    changes: "not yet".to_string(),
                    inline_comments: None,
                },
                metadata(),
            )
            .await;

        assert!(matches!(
            result,
            Err(VersionError::InvalidTransition {
                from: VersionStatus::Draft,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn fails_when_version_not_found() {
        let (_trail, _store, _bus, handler) = fixtures();

        let missing = VersionId::new();
        let result = handler
            .handle(
                RequestChangesCommand {
                    version_id: missing,
                    reviewer_id: reviewer(),
                    changes: "anything".to_string(),
                    inline_comments: None,
                },
                metadata(),
            )
            .await;

        assert_eq!(result.unwrap_err(), VersionError::NotFound(missing));
    }
}
