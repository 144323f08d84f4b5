//! CSRF token values

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Number of random bytes behind each token
pub const TOKEN_BYTES: usize = 32;

/// Length of the hex-encoded token
pub const TOKEN_LEN: usize = TOKEN_BYTES * 2;

/// A session-scoped CSRF token: 64 lowercase hex characters.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh token from the thread-local CSPRNG.
    ///
    /// Does not persist anything; storing is the guard's job.
    pub fn generate() -> Self {
        let bytes: [u8; TOKEN_BYTES] = rand::random();
        Self(hex::encode(bytes))
    }

    /// Parse a stored or transmitted token, rejecting anything that is not
    /// exactly 64 lowercase hex characters.
    pub fn parse(value: &str) -> Result<Self> {
        if value.len() != TOKEN_LEN {
            return Err(Error::InvalidToken(format!(
                "expected {} characters, got {}",
                TOKEN_LEN,
                value.len()
            )));
        }
        if !value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(Error::InvalidToken(
                "expected lowercase hex characters".to_string(),
            ));
        }
        Ok(Self(value.to_string()))
    }

    /// Get the token string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact, non-constant-time comparison against a candidate value.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"***").finish()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generate a new token without storing it
pub fn generate_token() -> SessionToken {
    SessionToken::generate()
}
