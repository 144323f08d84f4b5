//! CSRF session tokens
//!
//! One token per session, created lazily, carried on state-changing
//! requests under the `X-CSRF-Token` header.

pub mod guard;
pub mod storage;
pub mod token;

pub use guard::SessionTokenGuard;
pub use storage::{DisabledStorage, MemoryStorage, SessionStorage};
pub use token::{generate_token, SessionToken, TOKEN_LEN};

use axum::http::{HeaderMap, HeaderName, Method};

/// Header carrying the token on state-changing requests
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Session storage key holding the token
pub const CSRF_STORAGE_KEY: &str = "csrf_token";

/// Extract the CSRF token value from request headers
pub fn csrf_header_value<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Whether requests with this method change state and must carry a token
pub fn requires_token(method: &Method) -> bool {
    !matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}
