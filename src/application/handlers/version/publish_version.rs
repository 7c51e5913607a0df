//! PublishVersionHandler - Command handler for publishing an approved version.

use std::sync::Arc;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{
    CommandMetadata, EventId, SerializableDomainEvent, Timestamp, UserId, VersionId,
};
use crate::domain::version::{Version, VersionError, VersionPublished, VersionStatus};
use crate::ports::{EventPublisher, VersionStore};

/// Command to publish an approved version.
#[derive(Debug, Clone)]
pub struct PublishVersionCommand {
    pub version_id: VersionId,
    pub publisher_id: UserId,
}

/// Result of a successful publication.
#[derive(Debug, Clone)]
pub struct PublishVersionResult {
    pub version: Version,
    /// The previously published version that this publish archived, if any.
    pub archived_version: Option<Version>,
    pub event: VersionPublished,
}

/// Handler for publishing versions.
///
/// Publication is the only operation that touches two version records at
/// once: within one atomic store operation the document's currently
/// published version (if any) is demoted to `Archived` and this version
/// becomes `Published`. The store serializes the operation per document.
pub struct PublishVersionHandler {
    store: Arc<dyn VersionStore>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl PublishVersionHandler {
    pub fn new(store: Arc<dyn VersionStore>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: PublishVersionCommand,
        metadata: CommandMetadata,
    ) -> Result<PublishVersionResult, VersionError> {
        // 1. Load version
        let mut version = self
            .store
            .find_by_id(&cmd.version_id)
            .await?
            .ok_or(VersionError::NotFound(cmd.version_id))?;

        // 2. Transition (requires Approved)
        let previous = version.publish(cmd.publisher_id.clone())?;

        // 3. Atomically archive the predecessor and promote this version.
        //    The store appends the supersede audit entry for the archived
        //    predecessor in the same operation.
        let entry = AuditEntry::record(
            cmd.version_id,
            *version.document_id(),
            Some(previous),
            VersionStatus::Published,
            cmd.publisher_id.clone(),
        );
        let archived_version = self.store.publish(&version, previous, &entry).await?;

        // 4. Publish event
        let event = VersionPublished {
            event_id: EventId::new(),
            version_id: cmd.version_id,
            document_id: *version.document_id(),
            published_by: cmd.publisher_id,
            archived_version_id: archived_version.as_ref().map(|v| *v.id()),
            published_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(PublishVersionResult {
            version,
            archived_version,
            event,
        })
    }
}
