//! HTTP adapter for the versioning workflow endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::VersionHandlers;
pub use routes::version_routes;
