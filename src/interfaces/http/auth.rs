//! Staff-role gate for management endpoints
//!
//! Staff endpoints require the shared token from `[security] staff_token`
//! in the `X-Staff-Token` header. An empty configured token disables the
//! staff surface entirely.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;

use super::common::ApiResponse;

pub const STAFF_TOKEN_HEADER: &str = "x-staff-token";

/// Configured staff token, shared through router state.
#[derive(Clone)]
pub struct StaffToken(pub Arc<str>);

/// Extractor proving the request carries the staff token.
pub struct StaffAuth;

impl<S> FromRequestParts<S> for StaffAuth
where
    S: Send + Sync,
    StaffToken: FromRef<S>,
{
    type Rejection = (StatusCode, Json<ApiResponse<()>>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let StaffToken(expected) = StaffToken::from_ref(state);
        if expected.is_empty() {
            return Err((
                StatusCode::FORBIDDEN,
                Json(ApiResponse::error("Staff endpoints are disabled")),
            ));
        }
        match parts
            .headers
            .get(STAFF_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            Some(token) if token == expected.as_ref() => Ok(StaffAuth),
            Some(_) => Err((
                StatusCode::FORBIDDEN,
                Json(ApiResponse::error("Invalid staff token")),
            )),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Missing X-Staff-Token header")),
            )),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
