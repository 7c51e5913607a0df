//! Version-specific error types.

use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, VersionId};

use super::{VersionStatus, WorkflowEvent};

/// Errors surfaced by the versioning workflow.
///
/// Every failure is returned to the caller as a typed value; transitions
/// are never silently coerced to a "closest legal" alternative, and a
/// conflict is never retried by the service itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Version was not found.
    NotFound(VersionId),
    /// Document was not found (no versions reference it), or the
    /// referenced version does not belong to it.
    DocumentNotFound(DocumentId),
    /// The requested workflow event is illegal from the current status.
    InvalidTransition {
        from: VersionStatus,
        event: WorkflowEvent,
    },
    /// Reviewer equals author - a policy violation, not retried.
    SelfReview,
    /// Optimistic concurrency check failed; caller should reload and retry.
    Conflict(String),
    /// Caller-supplied data fails a precondition.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl VersionError {
    pub fn not_found(id: VersionId) -> Self {
        VersionError::NotFound(id)
    }
    pub fn document_not_found(id: DocumentId) -> Self {
        VersionError::DocumentNotFound(id)
    }
    pub fn invalid_transition(from: VersionStatus, event: WorkflowEvent) -> Self {
        VersionError::InvalidTransition { from, event }
    }
    pub fn self_review() -> Self {
        VersionError::SelfReview
    }
    pub fn conflict(message: impl Into<String>) -> Self {
        VersionError::Conflict(message.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        VersionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        VersionError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            VersionError::NotFound(_) => ErrorCode::VersionNotFound,
            VersionError::DocumentNotFound(_) => ErrorCode::DocumentNotFound,
            VersionError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            VersionError::SelfReview => ErrorCode::SelfReview,
            VersionError::Conflict(_) => ErrorCode::Conflict,
            VersionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            VersionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            VersionError::NotFound(id) => format!("Version not found: {}", id),
            VersionError::DocumentNotFound(id) => format!("Document not found: {}", id),
            VersionError::InvalidTransition { from, event } => format!(
                "Cannot {} a version whose status is '{}'",
                event, from
            ),
            VersionError::SelfReview => {
                "Authors cannot review their own version".to_string()
            }
            VersionError::Conflict(msg) => {
                format!("Version was modified by another caller: {}", msg)
            }
            VersionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            VersionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for VersionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for VersionError {}

impl From<DomainError> for VersionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Conflict => VersionError::Conflict(err.message),
            // A row that vanished mid-operation is indistinguishable from a
            // lost optimistic race; the caller reloads either way.
            ErrorCode::VersionNotFound => VersionError::Conflict(err.message),
            ErrorCode::ValidationFailed => VersionError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => VersionError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_names_event_and_status() {
        let err = VersionError::invalid_transition(VersionStatus::Draft, WorkflowEvent::Publish);
        assert_eq!(
            err.message(),
            "Cannot publish a version whose status is 'draft'"
        );
        assert_eq!(err.code(), ErrorCode::InvalidTransition);
    }

    #[test]
    fn self_review_is_a_policy_violation() {
        let err = VersionError::self_review();
        assert_eq!(err.code(), ErrorCode::SelfReview);
        assert!(err.message().contains("own version"));
    }

    #[test]
    fn conflict_from_domain_error_maps_to_conflict() {
        let domain = DomainError::new(ErrorCode::Conflict, "status changed since load");
        let err: VersionError = domain.into();
        assert!(matches!(err, VersionError::Conflict(_)));
    }

    #[test]
    fn store_not_found_maps_to_conflict() {
        let domain = DomainError::new(ErrorCode::VersionNotFound, "row gone");
        let err: VersionError = domain.into();
        assert!(matches!(err, VersionError::Conflict(_)));
    }

    #[test]
    fn validation_from_domain_error_carries_field_detail() {
        let domain = DomainError::validation("content", "cannot be empty");
        let err: VersionError = domain.into();
        match err {
            VersionError::ValidationFailed { field, .. } => assert_eq!(field, "content"),
            other => panic!("expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn database_errors_map_to_infrastructure() {
        let domain = DomainError::new(ErrorCode::DatabaseError, "connection refused");
        let err: VersionError = domain.into();
        assert!(matches!(err, VersionError::Infrastructure(_)));
    }
}
