//! Client configuration and initialization

use crate::browser::{AlertNotifier, BrowserNavigator, LocalStorageTokenStore};
use std::cell::RefCell;
use std::sync::Arc;
use tether_http::{ApiClient, ClientConfig, ClientError};
use web_sys::window;

thread_local! {
    /// Shared client for the page
    static API_CLIENT: RefCell<Option<ApiClient>> = const { RefCell::new(None) };
}

/// Origin of the current page, used to resolve relative base URLs
pub fn browser_origin() -> Option<String> {
    window().and_then(|w| w.location().origin().ok())
}

/// Build a client wired to the browser's storage, location and alerts
pub fn create_api_client(config: ClientConfig) -> Result<ApiClient, ClientError> {
    let store = LocalStorageTokenStore::new(config.session.token_key.clone());

    let mut builder = ApiClient::builder()
        .config(config)
        .token_store(Arc::new(store))
        .navigator(Arc::new(BrowserNavigator))
        .notifier(Arc::new(AlertNotifier));

    if let Some(origin) = browser_origin() {
        builder = builder.origin(origin);
    }

    builder.build()
}

/// Get the shared client, creating it from the build-time configuration on first use
pub fn api_client() -> Result<ApiClient, ClientError> {
    API_CLIENT.with(|cell| {
        if let Some(client) = cell.borrow().as_ref() {
            return Ok(client.clone());
        }

        let client = create_api_client(ClientConfig::from_build_env())?;
        *cell.borrow_mut() = Some(client.clone());
        Ok(client)
    })
}
