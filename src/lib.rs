//! Redline - Document Versioning & Editorial Review Workflow
//!
//! This crate implements the versioning core of an editorial pipeline:
//! documents move through drafting, peer review, publication and rollback,
//! with every transition persisted as an immutable version record and an
//! append-only audit trail.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
