//! Application layer - command and query handlers.
//!
//! Handlers orchestrate the domain, the version store, the audit trail,
//! and the event publisher. Each public workflow operation is one handler
//! and one atomic unit: the store transition and its audit entry land
//! together or not at all, and events are emitted only after the write
//! commits.

pub mod handlers;
