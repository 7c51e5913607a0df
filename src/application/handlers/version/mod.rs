//! Versioning workflow handlers.
//!
//! The public contract of the service: create a draft, submit it for
//! review, approve it or request changes, publish it, roll a document
//! back, and read the history and audit trail.

mod approve_version;
mod create_draft;
mod get_audit_trail;
mod get_version_history;
mod publish_version;
mod request_changes;
mod rollback_to_version;
mod submit_for_review;

pub use approve_version::{ApproveVersionCommand, ApproveVersionHandler, ApproveVersionResult};
pub use create_draft::{CreateDraftCommand, CreateDraftHandler, CreateDraftResult};
pub use get_audit_trail::{GetAuditTrailHandler, GetAuditTrailQuery};
pub use get_version_history::{GetVersionHistoryHandler, GetVersionHistoryQuery};
pub use publish_version::{PublishVersionCommand, PublishVersionHandler, PublishVersionResult};
pub use request_changes::{RequestChangesCommand, RequestChangesHandler, RequestChangesResult};
pub use rollback_to_version::{
    RollbackToVersionCommand, RollbackToVersionHandler, RollbackToVersionResult,
};
pub use submit_for_review::{
    SubmitForReviewCommand, SubmitForReviewHandler, SubmitForReviewResult,
};
