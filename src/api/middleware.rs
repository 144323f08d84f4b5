//! CSRF enforcement for state-changing requests

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::server::SharedState;
use crate::csrf::requires_token;
use crate::error::{Error, Result};
use crate::notifications::Toast;

/// Message shown when a request is rejected for a stale or missing token
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please refresh";

/// Reject unsafe requests whose CSRF header does not match the session token.
///
/// A rejection is surfaced to the user as an error toast.
pub async fn require_csrf(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Result<Response> {
    if !state.config.csrf.enabled || !requires_token(req.method()) {
        return Ok(next.run(req).await);
    }

    if state.guard.validate_headers(req.headers()) {
        return Ok(next.run(req).await);
    }

    warn!(
        method = %req.method(),
        path = %req.uri().path(),
        "Rejected request with missing or mismatched CSRF token"
    );
    state
        .notifications
        .enqueue(Toast::error(SESSION_EXPIRED_MESSAGE))
        .await;

    Err(Error::TokenMismatch)
}

/// Whether a request's `Origin` is this shell itself or a configured front end.
///
/// Requests without an `Origin` header (non-browser clients) pass.
pub fn origin_allowed(headers: &HeaderMap, allowed: &[HeaderValue]) -> bool {
    let Some(origin) = headers.get(header::ORIGIN) else {
        return true;
    };
    if allowed.contains(origin) {
        return true;
    }

    let host = headers.get(header::HOST).and_then(|h| h.to_str().ok());
    match (origin.to_str().ok(), host) {
        (Some(origin), Some(host)) => {
            let authority = origin
                .strip_prefix("http://")
                .or_else(|| origin.strip_prefix("https://"));
            authority == Some(host)
        }
        _ => false,
    }
}

/// Refuse cross-origin callers that are not configured in `server.cors_origins`
pub async fn require_allowed_origin(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Result<Response> {
    if origin_allowed(req.headers(), &state.allowed_origins) {
        return Ok(next.run(req).await);
    }

    warn!(
        origin = ?req.headers().get(header::ORIGIN),
        path = %req.uri().path(),
        "Rejected cross-origin request"
    );
    Err(Error::OriginNotAllowed)
}
