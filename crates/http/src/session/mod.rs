//! Session collaborators
//!
//! The client never touches browser globals directly. Token persistence,
//! the current location and user-facing notices are reached through these
//! traits so they can be swapped for in-memory versions off the browser.

mod memory;

pub use memory::{LogNotifier, MemoryNavigator, MemoryTokenStore};

use thiserror::Error;

/// Errors raised by session collaborators
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The backing facility (storage, window, ...) is not available
    #[error("{0} is unavailable")]
    Unavailable(&'static str),

    /// The backing facility rejected the operation
    #[error("{0}")]
    Backend(String),

    /// An in-memory collaborator lock was poisoned
    #[error("session state lock poisoned")]
    Poisoned,
}

/// Persistent storage for the session token
pub trait TokenStore: Send + Sync {
    /// Read the current token, `None` when logged out
    fn token(&self) -> Result<Option<String>, SessionError>;

    /// Persist a token (used by login flows)
    fn set_token(&self, token: &str) -> Result<(), SessionError>;

    /// Remove the stored token
    fn clear_token(&self) -> Result<(), SessionError>;
}

/// Access to the application's location
pub trait Navigator: Send + Sync {
    /// Path component of the current location, e.g. `/dashboard`
    fn current_path(&self) -> Result<String, SessionError>;

    /// Navigate to `path`, discarding the current page state
    fn navigate(&self, path: &str) -> Result<(), SessionError>;
}

/// Surfaces session notices to the user
pub trait Notifier: Send + Sync {
    /// Tell the user their session has expired
    fn session_expired(&self, message: &str);
}
