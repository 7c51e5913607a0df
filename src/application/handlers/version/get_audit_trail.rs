//! GetAuditTrailHandler - Query handler for compliance reads.

use std::sync::Arc;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{DocumentId, VersionId};
use crate::domain::version::VersionError;
use crate::ports::AuditTrail;

/// Query for a document's (or single version's) audit trail.
#[derive(Debug, Clone)]
pub struct GetAuditTrailQuery {
    pub document_id: DocumentId,
    /// When set, narrows the trail to one version.
    pub version_id: Option<VersionId>,
}

/// Handler for reading the audit trail.
///
/// The trail is the authoritative record used to answer "who approved
/// this and why"; the version's own reviewer/publisher fields are only a
/// cache of its latest entries.
pub struct GetAuditTrailHandler {
    audit_trail: Arc<dyn AuditTrail>,
}

impl GetAuditTrailHandler {
    pub fn new(audit_trail: Arc<dyn AuditTrail>) -> Self {
        Self { audit_trail }
    }

    /// Returns entries in chronological order.
    pub async fn handle(
        &self,
        query: GetAuditTrailQuery,
    ) -> Result<Vec<AuditEntry>, VersionError> {
        let entries = match query.version_id {
            Some(version_id) => self.audit_trail.entries_for_version(&version_id).await?,
            None => {
                self.audit_trail
                    .entries_for_document(&query.document_id)
                    .await?
            }
        };
        Ok(entries)
    }
}
