//! HTTP handlers for the versioning endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::adapters::http::RequireActor;
use crate::application::handlers::version::{
    ApproveVersionCommand, ApproveVersionHandler, CreateDraftCommand, CreateDraftHandler,
    GetAuditTrailHandler, GetAuditTrailQuery, GetVersionHistoryHandler, GetVersionHistoryQuery,
    PublishVersionCommand, PublishVersionHandler, RequestChangesCommand, RequestChangesHandler,
    RollbackToVersionCommand, RollbackToVersionHandler, SubmitForReviewCommand,
    SubmitForReviewHandler,
};
use crate::domain::foundation::{CommandMetadata, DocumentId, UserId, VersionId};
use crate::domain::version::VersionError;

use super::dto::{
    ApproveVersionRequest, AuditTrailResponse, CreateDraftRequest, ErrorResponse,
    RequestChangesRequest, RollbackRequest, SubmitForReviewRequest, VersionHistoryResponse,
    VersionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct VersionHandlers {
    create_draft: Arc<CreateDraftHandler>,
    submit_for_review: Arc<SubmitForReviewHandler>,
    approve_version: Arc<ApproveVersionHandler>,
    request_changes: Arc<RequestChangesHandler>,
    publish_version: Arc<PublishVersionHandler>,
    rollback_to_version: Arc<RollbackToVersionHandler>,
    get_version_history: Arc<GetVersionHistoryHandler>,
    get_audit_trail: Arc<GetAuditTrailHandler>,
}

impl VersionHandlers {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        create_draft: Arc<CreateDraftHandler>,
        submit_for_review: Arc<SubmitForReviewHandler>,
        approve_version: Arc<ApproveVersionHandler>,
        request_changes: Arc<RequestChangesHandler>,
        publish_version: Arc<PublishVersionHandler>,
        rollback_to_version: Arc<RollbackToVersionHandler>,
        get_version_history: Arc<GetVersionHistoryHandler>,
        get_audit_trail: Arc<GetAuditTrailHandler>,
    ) -> Self {
        Self {
            create_draft,
            submit_for_review,
            approve_version,
            request_changes,
            publish_version,
            rollback_to_version,
            get_version_history,
            get_audit_trail,
        }
    }
}

fn http_metadata(actor: &UserId) -> CommandMetadata {
    CommandMetadata::new(actor.clone()).with_source("api")
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /documents/:document_id/versions - Create a new draft version
pub async fn create_draft(
    State(handlers): State<VersionHandlers>,
    RequireActor(actor): RequireActor,
    Path(document_id): Path<String>,
    Json(req): Json<CreateDraftRequest>,
) -> Response {
    let document_id = match parse_document_id(&document_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = CreateDraftCommand {
        document_id,
        content: req.content,
        author_id: actor.clone(),
    };

    match handlers.create_draft.handle(cmd, http_metadata(&actor)).await {
        Ok(result) => {
            let response = VersionResponse::from(&result.version);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_version_error(e),
    }
}

/// GET /documents/:document_id/versions - Version history, newest first
pub async fn get_version_history(
    State(handlers): State<VersionHandlers>,
    Path(document_id): Path<String>,
) -> Response {
    let document_id = match parse_document_id(&document_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = GetVersionHistoryQuery { document_id };

    match handlers.get_version_history.handle(query).await {
        Ok(versions) => {
            let response = VersionHistoryResponse {
                document_id: document_id.to_string(),
                versions: versions.iter().map(VersionResponse::from).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_version_error(e),
    }
}

/// Optional filter for audit trail reads.
#[derive(Debug, Deserialize)]
pub struct AuditTrailParams {
    #[serde(default)]
    pub version_id: Option<String>,
}

/// GET /documents/:document_id/audit - Audit trail, chronological
pub async fn get_audit_trail(
    State(handlers): State<VersionHandlers>,
    Path(document_id): Path<String>,
    Query(params): Query<AuditTrailParams>,
) -> Response {
    let document_id = match parse_document_id(&document_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let version_id = match params.version_id.as_deref().map(parse_version_id) {
        None => None,
        Some(Ok(id)) => Some(id),
        Some(Err(response)) => return response,
    };

    let query = GetAuditTrailQuery {
        document_id,
        version_id,
    };

    match handlers.get_audit_trail.handle(query).await {
        Ok(entries) => {
            let response = AuditTrailResponse {
                document_id: document_id.to_string(),
                entries: entries.iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_version_error(e),
    }
}

/// POST /versions/:version_id/submit - Submit a version for review
pub async fn submit_for_review(
    State(handlers): State<VersionHandlers>,
    RequireActor(actor): RequireActor,
    Path(version_id): Path<String>,
    Json(req): Json<SubmitForReviewRequest>,
) -> Response {
    let version_id = match parse_version_id(&version_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = SubmitForReviewCommand {
        version_id,
        notes: req.notes,
    };

    match handlers
        .submit_for_review
        .handle(cmd, http_metadata(&actor))
        .await
    {
        Ok(result) => {
            let response = VersionResponse::from(&result.version);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_version_error(e),
    }
}

/// POST /versions/:version_id/approve - Approve a version under review
pub async fn approve_version(
    State(handlers): State<VersionHandlers>,
    RequireActor(actor): RequireActor,
    Path(version_id): Path<String>,
    Json(req): Json<ApproveVersionRequest>,
) -> Response {
    let version_id = match parse_version_id(&version_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = ApproveVersionCommand {
        version_id,
        reviewer_id: actor.clone(),
        comments: req.comments,
    };

    match handlers
        .approve_version
        .handle(cmd, http_metadata(&actor))
        .await
    {
        Ok(result) => {
            let response = VersionResponse::from(&result.version);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_version_error(e),
    }
}

/// POST /versions/:version_id/request-changes - Send a version back
pub async fn request_changes(
    State(handlers): State<VersionHandlers>,
    RequireActor(actor): RequireActor,
    Path(version_id): Path<String>,
    Json(req): Json<RequestChangesRequest>,
) -> Response {
    let version_id = match parse_version_id(&version_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = RequestChangesCommand {
        version_id,
        reviewer_id: actor.clone(),
        changes: req.changes,
        inline_comments: req.inline_comments,
    };

    match handlers
        .request_changes
        .handle(cmd, http_metadata(&actor))
        .await
    {
        Ok(result) => {
            let response = VersionResponse::from(&result.version);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_version_error(e),
    }
}

/// POST /versions/:version_id/publish - Publish an approved version
pub async fn publish_version(
    State(handlers): State<VersionHandlers>,
    RequireActor(actor): RequireActor,
    Path(version_id): Path<String>,
) -> Response {
    let version_id = match parse_version_id(&version_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = PublishVersionCommand {
        version_id,
        publisher_id: actor.clone(),
    };

    match handlers
        .publish_version
        .handle(cmd, http_metadata(&actor))
        .await
    {
        Ok(result) => {
            let response = VersionResponse::from(&result.version);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_version_error(e),
    }
}

/// POST /documents/:document_id/rollback - Create a rollback draft
pub async fn rollback_to_version(
    State(handlers): State<VersionHandlers>,
    RequireActor(actor): RequireActor,
    Path(document_id): Path<String>,
    Json(req): Json<RollbackRequest>,
) -> Response {
    let document_id = match parse_document_id(&document_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let target_version_id = match parse_version_id(&req.target_version_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = RollbackToVersionCommand {
        document_id,
        target_version_id,
        reason: req.reason,
        user_id: actor.clone(),
    };

    match handlers
        .rollback_to_version
        .handle(cmd, http_metadata(&actor))
        .await
    {
        Ok(result) => {
            let response = VersionResponse::from(&result.version);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_version_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_document_id(raw: &str) -> Result<DocumentId, Response> {
    raw.parse::<DocumentId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid document ID")),
        )
            .into_response()
    })
}

fn parse_version_id(raw: &str) -> Result<VersionId, Response> {
    raw.parse::<VersionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid version ID")),
        )
            .into_response()
    })
}

fn handle_version_error(error: VersionError) -> Response {
    let status = match &error {
        VersionError::NotFound(_) | VersionError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
        VersionError::InvalidTransition { .. } | VersionError::Conflict(_) => StatusCode::CONFLICT,
        VersionError::SelfReview => StatusCode::FORBIDDEN,
        VersionError::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        VersionError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %error, "versioning operation failed");
    } else {
        tracing::debug!(error = %error, "versioning operation rejected");
    }

    let body = ErrorResponse::new(error.code().to_string(), error.message());
    (status, Json(body)).into_response()
}
