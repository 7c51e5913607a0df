//! CreateDraftHandler - Command handler for authoring a new draft version.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{
    CommandMetadata, DocumentId, EventId, SerializableDomainEvent, Timestamp, UserId, VersionId,
};
use crate::domain::version::{DraftCreated, Version, VersionError, VersionStatus};
use crate::ports::{EventPublisher, VersionStore};

/// Command to create a new draft version of a document.
#[derive(Debug, Clone)]
pub struct CreateDraftCommand {
    pub document_id: DocumentId,
    pub content: JsonValue,
    pub author_id: UserId,
}

/// Result of successful draft creation.
#[derive(Debug, Clone)]
pub struct CreateDraftResult {
    pub version: Version,
    pub event: DraftCreated,
}

/// Handler for creating draft versions.
pub struct CreateDraftHandler {
    store: Arc<dyn VersionStore>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateDraftHandler {
    pub fn new(store: Arc<dyn VersionStore>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateDraftCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateDraftResult, VersionError> {
        // 1. Build the draft with the document's next sequence number
        let sequence_number = self.store.next_sequence_number(&cmd.document_id).await?;
        let version = Version::new(
            VersionId::new(),
            cmd.document_id,
            sequence_number,
            cmd.content,
            cmd.author_id.clone(),
        )?;

        // 2. Persist draft + creation audit entry atomically.
        //    The store rejects this with Conflict if the document already
        //    has a version in progress.
        let entry = AuditEntry::record(
            *version.id(),
            cmd.document_id,
            None,
            VersionStatus::Draft,
            cmd.author_id.clone(),
        );
        self.store.create(&version, &entry).await?;

        // 3. Publish event
        let event = DraftCreated {
            event_id: EventId::new(),
            version_id: *version.id(),
            document_id: cmd.document_id,
            author_id: cmd.author_id,
            sequence_number,
            created_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(CreateDraftResult { version, event })
    }
}
