//! SubmitForReviewHandler - Command handler for submitting a version for review.

use std::sync::Arc;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{
    CommandMetadata, EventId, SerializableDomainEvent, Timestamp, VersionId,
};
use crate::domain::version::{Version, VersionError, VersionStatus, VersionSubmitted};
use crate::ports::{EventPublisher, VersionStore};

/// Command to submit a version for peer review.
#[derive(Debug, Clone)]
pub struct SubmitForReviewCommand {
    pub version_id: VersionId,
    pub notes: Option<String>,
}

/// Result of a submission.
///
/// `event` is `None` when the call was an idempotent no-op (the version
/// was already in review).
#[derive(Debug, Clone)]
pub struct SubmitForReviewResult {
    pub version: Version,
    pub event: Option<VersionSubmitted>,
}

/// Handler for submitting versions for review.
pub struct SubmitForReviewHandler {
    store: Arc<dyn VersionStore>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SubmitForReviewHandler {
    pub fn new(store: Arc<dyn VersionStore>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitForReviewCommand,
        metadata: CommandMetadata,
    ) -> Result<SubmitForReviewResult, VersionError> {
        // 1. Load version
        let mut version = self
            .store
            .find_by_id(&cmd.version_id)
            .await?
            .ok_or(VersionError::NotFound(cmd.version_id))?;

        // 2. Re-submitting an already pending version is a no-op success,
        //    not a duplicate transition. Retries are caller-driven and
        //    must be idempotent against the current status.
        if version.status() == VersionStatus::PendingReview {
            return Ok(SubmitForReviewResult {
                version,
                event: None,
            });
        }

        // 3. Transition (validates status and non-empty content)
        let previous = version.submit_for_review()?;

        // 4. Persist transition + audit entry atomically, guarded against
        //    concurrent callers
        let mut entry = AuditEntry::record(
            cmd.version_id,
            *version.document_id(),
            Some(previous),
            VersionStatus::PendingReview,
            metadata.user_id.clone(),
        );
        if let Some(notes) = &cmd.notes {
            entry = entry.with_comments(notes.clone());
        }
        self.store
            .update_guarded(&version, previous, &entry)
            .await?;

        // 5. Publish event
        let event = VersionSubmitted {
            event_id: EventId::new(),
            version_id: cmd.version_id,
            document_id: *version.document_id(),
            submitted_by: metadata.user_id.clone(),
            notes: cmd.notes,
            submitted_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        self.event_publisher.publish(envelope).await?;

        Ok(SubmitForReviewResult {
            version,
            event: Some(event),
        })
    }
}
