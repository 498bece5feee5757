//! Tether HTTP client
//!
//! A single API client for front-end applications: base URL resolution,
//! bearer token injection, and session expiry handling on `401` responses.
//! Ambient browser state (storage, location, alerts) is reached through the
//! collaborator traits in [`session`], so the client runs the same way in a
//! browser, on a native runtime, and in tests.

#[macro_use]
extern crate tracing;

pub mod client;
pub mod session;

#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;

pub use client::config::{ClientConfig, SessionConfig, resolve_base_url};
pub use client::error::ClientError;
pub use client::interceptor::{BearerAuth, RequestInterceptor, ResponseInterceptor, SessionGuard};
pub use client::{ApiClient, ApiClientBuilder};
pub use session::{
    LogNotifier, MemoryNavigator, MemoryTokenStore, Navigator, Notifier, SessionError, TokenStore,
};
