//! HTTP adapters - REST API implementations.
//!
//! A thin surface over the application handlers. State changes are only
//! reachable through the workflow operations exposed here; no other
//! mutation path exists.

mod extract;
pub mod version;

pub use extract::RequireActor;
pub use version::{version_routes, VersionHandlers};
