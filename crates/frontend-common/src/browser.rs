//! Session collaborators backed by browser globals

use tether_http::{Navigator, Notifier, SessionError, TokenStore};
use wasm_bindgen::JsValue;
use web_sys::{Location, Storage};

fn js_error(err: JsValue) -> SessionError {
    SessionError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// Get localStorage
fn local_storage() -> Result<Storage, SessionError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(SessionError::Unavailable("localStorage"))
}

fn location() -> Result<Location, SessionError> {
    web_sys::window()
        .map(|w| w.location())
        .ok_or(SessionError::Unavailable("window"))
}

/// Token store reading the raw token string from `localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorageTokenStore {
    key: String,
}

impl LocalStorageTokenStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn token(&self) -> Result<Option<String>, SessionError> {
        local_storage()?.get_item(&self.key).map_err(js_error)
    }

    fn set_token(&self, token: &str) -> Result<(), SessionError> {
        local_storage()?.set_item(&self.key, token).map_err(js_error)
    }

    fn clear_token(&self) -> Result<(), SessionError> {
        local_storage()?.remove_item(&self.key).map_err(js_error)
    }
}

/// Navigator over `window.location`
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> Result<String, SessionError> {
        location()?.pathname().map_err(js_error)
    }

    fn navigate(&self, path: &str) -> Result<(), SessionError> {
        location()?.set_href(path).map_err(js_error)
    }
}

/// Notifier using a blocking `window.alert`
#[derive(Debug, Default, Clone, Copy)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn session_expired(&self, message: &str) {
        gloo::dialogs::alert(message);
    }
}
