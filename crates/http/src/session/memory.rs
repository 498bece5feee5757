//! In-memory session collaborators for native callers and tests

use super::{Navigator, Notifier, SessionError, TokenStore};
use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, SessionError> {
    mutex.lock().map_err(|_| SessionError::Poisoned)
}

/// Token store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `token`
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(lock(&self.token)?.clone())
    }

    fn set_token(&self, token: &str) -> Result<(), SessionError> {
        *lock(&self.token)? = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<(), SessionError> {
        *lock(&self.token)? = None;
        Ok(())
    }
}

#[derive(Debug)]
struct NavigatorState {
    current: String,
    history: Vec<String>,
}

/// Navigator that tracks location in memory and records every navigation
#[derive(Debug)]
pub struct MemoryNavigator {
    state: Mutex<NavigatorState>,
}

impl MemoryNavigator {
    /// Start at `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(NavigatorState {
                current: path.into(),
                history: Vec::new(),
            }),
        }
    }

    /// Paths navigated to, oldest first
    pub fn history(&self) -> Vec<String> {
        lock(&self.state)
            .map(|state| state.history.clone())
            .unwrap_or_default()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> Result<String, SessionError> {
        Ok(lock(&self.state)?.current.clone())
    }

    fn navigate(&self, path: &str) -> Result<(), SessionError> {
        let mut state = lock(&self.state)?;
        state.current = path.to_string();
        state.history.push(path.to_string());
        Ok(())
    }
}

/// Notifier that only writes a log event
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn session_expired(&self, message: &str) {
        warn!(notice = message, "Session expired");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.token().unwrap(), None);

        store.set_token("abc123").unwrap();
        assert_eq!(store.token().unwrap().as_deref(), Some("abc123"));

        store.clear_token().unwrap();
        assert_eq!(store.token().unwrap(), None);
    }

    #[test]
    fn navigator_records_history() {
        let navigator = MemoryNavigator::new("/dashboard");
        assert_eq!(navigator.current_path().unwrap(), "/dashboard");
        assert!(navigator.history().is_empty());

        navigator.navigate("/login").unwrap();
        assert_eq!(navigator.current_path().unwrap(), "/login");
        assert_eq!(navigator.history(), vec!["/login".to_string()]);
    }

    #[test]
    fn default_navigator_starts_at_root() {
        assert_eq!(MemoryNavigator::default().current_path().unwrap(), "/");
    }
}
