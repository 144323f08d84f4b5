//! Session token lifecycle: lazy issuance, validation, teardown

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

use super::storage::SessionStorage;
use super::token::SessionToken;
use super::CSRF_STORAGE_KEY;
use crate::config::CsrfConfig;
use crate::error::{Error, Result};

struct GuardInner {
    /// `None` outside a storage-capable context
    storage: Option<Arc<dyn SessionStorage>>,
    storage_key: String,
    header_name: HeaderName,
    /// Serializes the read-then-create path in `get_token`
    materialize: Mutex<()>,
}

/// Owns the single CSRF token of one session.
///
/// Every operation degrades to its no-token behaviour when storage is
/// missing or failing: `get_token` returns `None`, `validate_token` returns
/// `false` and `attach_to_request_headers` leaves headers untouched.
#[derive(Clone)]
pub struct SessionTokenGuard {
    inner: Arc<GuardInner>,
}

impl SessionTokenGuard {
    /// Create a guard over `storage` with the default key and header
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self::build(
            Some(storage),
            CSRF_STORAGE_KEY.to_string(),
            HeaderName::from_static("x-csrf-token"),
        )
    }

    /// Create a guard with no session storage (non-interactive context)
    pub fn detached() -> Self {
        Self::build(
            None,
            CSRF_STORAGE_KEY.to_string(),
            HeaderName::from_static("x-csrf-token"),
        )
    }

    /// Create a guard using the configured storage key and header name
    pub fn from_config(
        config: &CsrfConfig,
        storage: Option<Arc<dyn SessionStorage>>,
    ) -> Result<Self> {
        let header_name = HeaderName::from_bytes(config.header_name.as_bytes()).map_err(|e| {
            Error::Config(format!("Invalid CSRF header name '{}': {}", config.header_name, e))
        })?;
        if config.storage_key.is_empty() {
            return Err(Error::Config("CSRF storage key must not be empty".to_string()));
        }
        Ok(Self::build(storage, config.storage_key.clone(), header_name))
    }

    fn build(
        storage: Option<Arc<dyn SessionStorage>>,
        storage_key: String,
        header_name: HeaderName,
    ) -> Self {
        Self {
            inner: Arc::new(GuardInner {
                storage,
                storage_key,
                header_name,
                materialize: Mutex::new(()),
            }),
        }
    }

    /// Produce a fresh random token. Does not store it.
    pub fn generate_token() -> SessionToken {
        SessionToken::generate()
    }

    /// Whether this guard runs inside a storage-capable context
    pub fn has_storage(&self) -> bool {
        self.inner.storage.is_some()
    }

    /// Header carrying the token on outgoing requests
    pub fn header_name(&self) -> &HeaderName {
        &self.inner.header_name
    }

    /// Persist `token`, overwriting any existing value
    pub fn set_token(&self, token: &SessionToken) {
        let _guard = self
            .inner
            .materialize
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Err(e) = self.store(token) {
            warn!("Failed to store CSRF token: {}", e);
        }
    }

    /// Return the session token, creating and storing one on first use.
    ///
    /// Returns `None` when there is no usable session storage.
    pub fn get_token(&self) -> Option<SessionToken> {
        self.inner.storage.as_ref()?;

        let _guard = self
            .inner
            .materialize
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match self.load() {
            Ok(Some(token)) => return Some(token),
            Ok(None) => {}
            Err(e) => {
                warn!("CSRF token unavailable: {}", e);
                return None;
            }
        }

        let token = SessionToken::generate();
        match self.store(&token) {
            Ok(()) => {
                info!("Issued new CSRF token for session");
                Some(token)
            }
            Err(e) => {
                warn!("Failed to store new CSRF token: {}", e);
                None
            }
        }
    }

    /// True iff a token is stored and `candidate` equals it exactly.
    ///
    /// Never creates a token.
    pub fn validate_token(&self, candidate: &str) -> bool {
        match self.load() {
            Ok(Some(token)) => token.matches(candidate),
            Ok(None) => false,
            Err(e) => {
                debug!("CSRF validation without storage: {}", e);
                false
            }
        }
    }

    /// Validate the token carried by an incoming request's headers
    pub fn validate_headers(&self, headers: &HeaderMap) -> bool {
        super::csrf_header_value(headers, self.header_name())
            .map(|candidate| self.validate_token(candidate))
            .unwrap_or(false)
    }

    /// Remove the stored token (logout / session teardown)
    pub fn clear_token(&self) {
        let Some(storage) = self.inner.storage.as_ref() else {
            return;
        };
        let _guard = self
            .inner
            .materialize
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match storage.remove_item(&self.inner.storage_key) {
            Ok(()) => debug!("Cleared CSRF token"),
            Err(e) => warn!("Failed to clear CSRF token: {}", e),
        }
    }

    /// Return `headers` with the session token attached, or unchanged when
    /// no token is available.
    pub fn attach_to_request_headers(&self, mut headers: HeaderMap) -> HeaderMap {
        if let Some(token) = self.get_token() {
            match HeaderValue::from_str(token.as_str()) {
                Ok(value) => {
                    headers.insert(self.inner.header_name.clone(), value);
                }
                Err(e) => warn!("CSRF token is not a valid header value: {}", e),
            }
        }
        headers
    }

    /// Read the stored token. A malformed stored value counts as absent.
    fn load(&self) -> Result<Option<SessionToken>> {
        let storage = self
            .inner
            .storage
            .as_ref()
            .ok_or_else(|| Error::Storage("no session storage in this context".to_string()))?;

        let Some(raw) = storage.get_item(&self.inner.storage_key)? else {
            return Ok(None);
        };

        match SessionToken::parse(&raw) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                warn!("Ignoring malformed stored CSRF token: {}", e);
                Ok(None)
            }
        }
    }

    fn store(&self, token: &SessionToken) -> Result<()> {
        let storage = self
            .inner
            .storage
            .as_ref()
            .ok_or_else(|| Error::Storage("no session storage in this context".to_string()))?;
        storage.set_item(&self.inner.storage_key, token.as_str())
    }
}

impl std::fmt::Debug for SessionTokenGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenGuard")
            .field("has_storage", &self.has_storage())
            .field("storage_key", &self.inner.storage_key)
            .field("header_name", &self.inner.header_name)
            .finish()
    }
}

impl Default for SessionTokenGuard {
    fn default() -> Self {
        Self::new(Arc::new(super::MemoryStorage::new()))
    }
}
