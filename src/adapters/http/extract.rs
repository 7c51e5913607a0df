//! Actor extraction for axum handlers.
//!
//! Every workflow operation is performed *by someone*; the acting user id
//! arrives in the `x-actor-id` header, placed there by the deployment's
//! authenticating proxy. The extractor is the seam where a full identity
//! provider integration would plug in.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::foundation::UserId;

/// Header carrying the authenticated actor id.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extractor that requires an acting user.
///
/// # Example
///
/// ```ignore
/// async fn submit(RequireActor(actor): RequireActor, ...) -> Response {
///     // actor: UserId
/// }
/// ```
pub struct RequireActor(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for RequireActor
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok());

        match header.and_then(|value| UserId::new(value).ok()) {
            Some(actor) => Ok(RequireActor(actor)),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "UNAUTHORIZED",
                    "message": format!("Missing or empty {} header", ACTOR_HEADER),
                })),
            )
                .into_response()),
        }
    }
}
