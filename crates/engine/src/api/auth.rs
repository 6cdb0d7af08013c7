//! Caller identity for HTTP routes
//!
//! Currently taken from the `X-Player-Id` header as a UUID.
//! Token validation belongs to the gateway in front of this service.

use axum::{extract::FromRequestParts, http::request::Parts, http::StatusCode};
use tapestry_domain::PlayerId;

pub const PLAYER_ID_HEADER: &str = "X-Player-Id";

/// Extractor for the calling player.
///
/// Missing header: 401. Header that is not a UUID: 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAuth(pub PlayerId);

impl<S> FromRequestParts<S> for PlayerAuth
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(PLAYER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Missing X-Player-Id header"))?;

        raw.parse::<PlayerId>()
            .map(PlayerAuth)
            .map_err(|_| (StatusCode::BAD_REQUEST, "X-Player-Id must be a UUID"))
    }
}
