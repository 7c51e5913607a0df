//! HTTP DTOs for the versioning endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::audit::AuditEntry;
use crate::domain::version::{Version, VersionStatus};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a new draft version.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDraftRequest {
    pub content: JsonValue,
}

/// Request to submit a version for review.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitForReviewRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request to approve a version.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveVersionRequest {
    #[serde(default)]
    pub comments: Option<String>,
}

/// Request to send a version back for changes.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestChangesRequest {
    pub changes: String,
    #[serde(default)]
    pub inline_comments: Option<JsonValue>,
}

/// Request to roll a document back to an earlier version.
#[derive(Debug, Clone, Deserialize)]
pub struct RollbackRequest {
    pub target_version_id: String,
    pub reason: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Full version view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct VersionResponse {
    pub id: String,
    pub document_id: String,
    pub sequence_number: i64,
    pub content: JsonValue,
    pub status: VersionStatus,
    pub author_id: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_by_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supersedes_version_id: Option<String>,
    pub updated_at: String,
}

impl From<&Version> for VersionResponse {
    fn from(version: &Version) -> Self {
        Self {
            id: version.id().to_string(),
            document_id: version.document_id().to_string(),
            sequence_number: version.sequence_number(),
            content: version.content().clone(),
            status: version.status(),
            author_id: version.author_id().to_string(),
            created_at: version.created_at().as_datetime().to_rfc3339(),
            reviewer_id: version.reviewer_id().map(ToString::to_string),
            review_comments: version.review_comments().map(ToString::to_string),
            reviewed_at: version
                .reviewed_at()
                .map(|ts| ts.as_datetime().to_rfc3339()),
            published_by_id: version.published_by_id().map(ToString::to_string),
            published_at: version
                .published_at()
                .map(|ts| ts.as_datetime().to_rfc3339()),
            supersedes_version_id: version.supersedes_version_id().map(ToString::to_string),
            updated_at: version.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

/// A document's version history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct VersionHistoryResponse {
    pub document_id: String,
    pub versions: Vec<VersionResponse>,
}

/// One audit trail entry.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntryResponse {
    pub id: String,
    pub version_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_status: Option<VersionStatus>,
    pub to_status: VersionStatus,
    pub actor_id: String,
    pub occurred_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<JsonValue>,
}

impl From<&AuditEntry> for AuditEntryResponse {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            version_id: entry.version_id().to_string(),
            from_status: entry.from_status(),
            to_status: entry.to_status(),
            actor_id: entry.actor_id().to_string(),
            occurred_at: entry.occurred_at().as_datetime().to_rfc3339(),
            comments: entry.comments().map(ToString::to_string),
            attachment: entry.attachment().cloned(),
        }
    }
}

/// A document's audit trail, chronological.
#[derive(Debug, Clone, Serialize)]
pub struct AuditTrailResponse {
    pub document_id: String,
    pub entries: Vec<AuditEntryResponse>,
}

/// Error payload naming the violated rule, so consumers can show
/// "someone already reviewed this" instead of a generic failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DocumentId, UserId, VersionId};
    use serde_json::json;

    #[test]
    fn version_response_omits_unset_review_fields() {
        let version = Version::new(
            VersionId::new(),
            DocumentId::new(),
            1,
            json!({"body": "text"}),
            UserId::new("author-1").unwrap(),
        )
        .unwrap();

        let response = VersionResponse::from(&version);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["status"], json!("draft"));
        assert_eq!(value["sequence_number"], json!(1));
        assert!(value.get("reviewer_id").is_none());
        assert!(value.get("published_at").is_none());
    }

    #[test]
    fn version_response_includes_review_fields_after_decision() {
        let mut version = Version::new(
            VersionId::new(),
            DocumentId::new(),
            1,
            json!({"body": "text"}),
            UserId::new("author-1").unwrap(),
        )
        .unwrap();
        version.submit_for_review().unwrap();
        version
            .approve(UserId::new("reviewer-1").unwrap(), Some("ok".to_string()))
            .unwrap();

        let value = serde_json::to_value(VersionResponse::from(&version)).unwrap();
        assert_eq!(value["status"], json!("approved"));
        assert_eq!(value["reviewer_id"], json!("reviewer-1"));
        assert_eq!(value["review_comments"], json!("ok"));
    }

    #[test]
    fn audit_entry_response_serializes_statuses_as_wire_names() {
        let entry = AuditEntry::record(
            VersionId::new(),
            DocumentId::new(),
            Some(VersionStatus::PendingReview),
            VersionStatus::ChangesRequested,
            UserId::new("reviewer-1").unwrap(),
        );

        let value = serde_json::to_value(AuditEntryResponse::from(&entry)).unwrap();
        assert_eq!(value["from_status"], json!("pending_review"));
        assert_eq!(value["to_status"], json!("changes_requested"));
    }
}
