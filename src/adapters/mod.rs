//! Adapters - Infrastructure implementations of the ports.
//!
//! # Organization
//!
//! - `postgres` - sqlx-backed VersionStore and AuditTrail
//! - `memory` - in-memory VersionStore and AuditTrail for tests
//! - `events` - in-memory event bus for tests and local development
//! - `http` - axum REST surface exposing the workflow operations

pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;

pub use events::InMemoryEventBus;
pub use memory::{InMemoryAuditTrail, InMemoryVersionStore};
pub use postgres::{PostgresAuditTrail, PostgresVersionStore};
