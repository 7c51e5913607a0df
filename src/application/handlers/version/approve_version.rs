//! ApproveVersionHandler - Command handler for approving a version.

use std::sync::Arc;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{
    CommandMetadata, EventId, SerializableDomainEvent, Timestamp, UserId, VersionId,
};
use crate::domain::version::{Version, VersionApproved, VersionError, VersionStatus};
use crate::ports::{EventPublisher, VersionStore};

/// Command to approve a version under review.
#[derive(Debug, Clone)]
pub struct ApproveVersionCommand {
    pub version_id: VersionId,
    pub reviewer_id: UserId,
    pub comments: Option<String>,
}

/// Result of a successful approval.
#[derive(Debug, Clone)]
pub struct ApproveVersionResult {
    pub version: Version,
    pub event: VersionApproved,
}

/// Handler for approving versions.
pub struct ApproveVersionHandler {
    store: Arc<dyn VersionStore>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ApproveVersionHandler {
    pub fn new(store: Arc<dyn VersionStore>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: ApproveVersionCommand,
        metadata: CommandMetadata,
    ) -> Result<ApproveVersionResult, VersionError> {
        // 1. Load version
        let mut version = self
            .store
            .find_by_id(&cmd.version_id)
            .await?
            .ok_or(VersionError::NotFound(cmd.version_id))?;

        // 2. Transition (self-review policy first, then status)
        let previous = version.approve(cmd.reviewer_id.clone(), cmd.comments.clone())?;

        // 3. Persist transition + audit entry atomically
        let mut entry = AuditEntry::record(
            cmd.version_id,
            *version.document_id(),
            Some(previous),
            VersionStatus::Approved,
            cmd.reviewer_id.clone(),
        );
        if let Some(comments) = &cmd.comments {
            entry = entry.with_comments(comments.clone());
        }
        self.store
            .update_guarded(&version, previous, &entry)
            .await?;

        // 4. Publish event
        let event = VersionApproved {
            event_id: EventId::new(),
            version_id: cmd.version_id,
            document_id: *version.document_id(),
            reviewer_id: cmd.reviewer_id,
            comments: cmd.comments,
            approved_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(ApproveVersionResult { version, event })
    }
}
