//! Audit trail domain module.
//!
//! The audit trail is the authoritative, append-only record of every
//! workflow transition. The Version's own reviewer/publisher fields are a
//! convenience cache of the trail's latest entries, not the source of truth.

mod entry;

pub use entry::AuditEntry;
