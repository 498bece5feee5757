//! Request and response interceptors
//!
//! Request interceptors run on the built request right before it is sent.
//! Response interceptors only see failures; successful responses are handed
//! back to the caller untouched.

use super::ClientError;
use super::config::SessionConfig;
use crate::session::{Navigator, Notifier, TokenStore};
use reqwest::Request;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use std::sync::Arc;

/// Hook applied to every outgoing request
pub trait RequestInterceptor: Send + Sync {
    /// Inspect or modify the request. Returning an error aborts the call.
    fn on_request(&self, request: &mut Request) -> Result<(), ClientError>;
}

/// Hook applied to every failed call
pub trait ResponseInterceptor: Send + Sync {
    /// Observe a failure. The error is returned to the caller afterwards.
    fn on_error(&self, error: &ClientError);
}

/// Attaches the stored session token as a bearer credential
pub struct BearerAuth {
    store: Arc<dyn TokenStore>,
}

impl BearerAuth {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }
}

impl RequestInterceptor for BearerAuth {
    fn on_request(&self, request: &mut Request) -> Result<(), ClientError> {
        let Some(token) = self.store.token()?.filter(|token| !token.is_empty()) else {
            return Ok(());
        };

        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ClientError::InvalidToken(e.to_string()))?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Tears the session down when the server rejects the credential.
///
/// On a 401 outside the public paths the user is notified, the stored token
/// is removed and the navigator is sent to the login path. Concurrent 401s
/// each run this sequence. Request-stage failures (build, storage, token)
/// reach it as well and are only logged.
pub struct SessionGuard {
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    config: SessionConfig,
}

impl SessionGuard {
    pub fn new(
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        config: SessionConfig,
    ) -> Self {
        Self {
            store,
            navigator,
            notifier,
            config,
        }
    }

    fn expire_session(&self) {
        self.notifier.session_expired(&self.config.expired_message);

        if let Err(e) = self.store.clear_token() {
            error!(error = %e, "Failed to clear session token");
        }

        match self.navigator.navigate(&self.config.login_path) {
            Ok(()) => debug!(path = %self.config.login_path, "Redirected to login"),
            Err(e) => error!(error = %e, "Failed to redirect to login"),
        }
    }
}

impl ResponseInterceptor for SessionGuard {
    fn on_error(&self, error: &ClientError) {
        error!(payload = %error.payload(), "API Error");

        if !error.is_unauthorized() {
            return;
        }

        let current = match self.navigator.current_path() {
            Ok(path) => path,
            Err(e) => {
                error!(error = %e, "Unable to read current location, skipping session teardown");
                return;
            }
        };

        if self.config.is_public_path(&current) {
            debug!(path = %current, "Unauthorized on public path, leaving session untouched");
            return;
        }

        warn!(path = %current, "Session expired");
        self.expire_session();
    }
}
