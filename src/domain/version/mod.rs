//! Version domain module.
//!
//! A version is an immutable content snapshot of a document plus its
//! workflow metadata. Versions move through the editorial state machine
//! (draft, peer review, approval, publication, archival); every transition
//! is validated here and recorded by the audit trail.
//!
//! # Events
//!
//! - `DraftCreated` - Published when a new draft version is created
//! - `VersionSubmitted` - Published when a draft enters review
//! - `VersionApproved` - Published when a reviewer approves
//! - `VersionChangesRequested` - Published when a reviewer requests changes
//! - `VersionPublished` - Published when an approved version goes live
//! - `VersionRolledBack` - Published when a rollback draft is created

mod aggregate;
mod errors;
mod events;
mod status;

pub use aggregate::Version;
pub use errors::VersionError;
pub use events::{
    DraftCreated, VersionApproved, VersionChangesRequested, VersionPublished, VersionRolledBack,
    VersionSubmitted,
};
pub use status::{VersionStatus, WorkflowEvent};
