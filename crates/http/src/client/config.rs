//! Client configuration
//!
//! Configuration comes from (lowest to highest precedence) built-in defaults,
//! an optional file, and `TETHER_`-prefixed environment variables. Nested keys
//! use a double underscore, e.g. `TETHER_SESSION__LOGIN_PATH`.

use super::ClientError;
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Base URL used when no override is configured
pub const DEFAULT_BASE_URL: &str = "/api";

/// Prefix for configuration environment variables
pub const ENV_PREFIX: &str = "TETHER";

/// Resolve the API base URL from an optional override.
///
/// A present, non-empty override wins; anything else falls back to
/// [`DEFAULT_BASE_URL`].
pub fn resolve_base_url(override_url: Option<&str>) -> String {
    match override_url {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

/// Client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Override for the API base URL (absolute or relative)
    pub api_base: Option<String>,

    /// Request timeout in seconds, ignored on wasm
    pub timeout_secs: Option<u64>,

    /// Session handling settings
    pub session: SessionConfig,
}

/// Session handling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Storage key holding the bearer token
    pub token_key: String,

    /// Where to send the user when the session expires
    pub login_path: String,

    /// Paths on which a 401 does not trigger session expiry handling
    pub public_paths: Vec<String>,

    /// Notice shown to the user when the session expires
    pub expired_message: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_key: "token".to_string(),
            login_path: "/login".to_string(),
            public_paths: vec!["/login".to_string(), "/signup".to_string()],
            expired_message: "Your session has expired. Please login again.".to_string(),
        }
    }
}

impl SessionConfig {
    /// Whether `path` is one of the public, unguarded paths
    pub fn is_public_path(&self, path: &str) -> bool {
        self.public_paths.iter().any(|public| public == path)
    }
}

impl ClientConfig {
    /// Resolved base URL
    pub fn base_url(&self) -> String {
        resolve_base_url(self.api_base.as_deref())
    }

    /// Load configuration from defaults and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed
    pub fn from_env() -> Result<Self, ClientError> {
        Self::load(None, environment())
    }

    /// Load configuration from file, with environment variables on top
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ClientError> {
        Self::load(Some(path.as_ref()), environment())
    }

    /// Configuration captured when the crate was compiled.
    ///
    /// Browser builds have no process environment at runtime, so the base
    /// URL override is read from `TETHER_API_BASE` at build time instead.
    pub fn from_build_env() -> Self {
        Self {
            api_base: option_env!("TETHER_API_BASE").map(str::to_string),
            ..Self::default()
        }
    }

    fn load(path: Option<&Path>, env: Environment) -> Result<Self, ClientError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings = builder
            .add_source(env)
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| ClientError::Configuration(e.to_string()))
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("session.public_paths")
}
