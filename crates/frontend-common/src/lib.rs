//! Browser bindings for the Tether API client
//!
//! Wires [`tether_http::ApiClient`] to `localStorage`, `window.location` and
//! `window.alert`, and keeps one shared client per page.

pub mod browser;
pub mod client;
pub mod logging;

pub use browser::{AlertNotifier, BrowserNavigator, LocalStorageTokenStore};
pub use client::{api_client, browser_origin, create_api_client};
pub use logging::init_logging;
pub use tether_http::{ApiClient, ClientConfig, ClientError};
