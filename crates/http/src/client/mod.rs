//! Tether API client

pub mod config;
pub mod error;
pub mod interceptor;

use crate::session::{LogNotifier, MemoryNavigator, Navigator, Notifier, TokenStore};
use self::config::ClientConfig;
use self::error::ClientError;
use self::interceptor::{BearerAuth, RequestInterceptor, ResponseInterceptor, SessionGuard};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("tether-client/", env!("CARGO_PKG_VERSION"));

/// Session-aware API client.
///
/// Cloning is cheap; clones share the underlying connection pool and
/// session collaborators.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    client: Client,
    base_url: String,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl ApiClient {
    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the absolute base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Absolute URL for `path`
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.inner.base_url, path)
    }

    /// Create a request builder for `path` under the base URL.
    ///
    /// Authentication is added when the request is sent, so a token stored
    /// after the builder was created is still picked up.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner.client.request(method, self.url_for(path))
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.request(Method::PUT, path)
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::DELETE, path)
    }

    /// Send a request through the interceptors and return the successful response.
    ///
    /// Non-2xx statuses are errors. Every failure is passed to the response
    /// interceptors before being returned.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let result = match self.prepare(request) {
            Ok(request) => self.dispatch(request).await,
            Err(error) => Err(error),
        };

        result.inspect_err(|error| {
            for interceptor in &self.inner.response_interceptors {
                interceptor.on_error(error);
            }
        })
    }

    /// Whether both handles share the same underlying client
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Execute a request and decode the JSON body
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Execute a request and discard the body
    pub async fn execute_empty(&self, request: RequestBuilder) -> Result<(), ClientError> {
        self.send(request).await.map(|_| ())
    }

    /// Build the request and run the request interceptors
    fn prepare(&self, request: RequestBuilder) -> Result<reqwest::Request, ClientError> {
        let mut request = request.build().map_err(|e| {
            error!(error = %e, "Request error");
            ClientError::Build(e)
        })?;

        for interceptor in &self.inner.request_interceptors {
            interceptor.on_request(&mut request).inspect_err(|e| {
                error!(error = %e, "Request error");
            })?;
        }

        Ok(request)
    }

    async fn dispatch(&self, request: reqwest::Request) -> Result<Response, ClientError> {
        let method = request.method().clone();
        let url = request.url().to_string();

        let response = self.inner.client.execute(request).await?;
        let status = response.status();

        if status.is_success() {
            trace!(%method, %url, status = status.as_u16(), "Request completed");
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    config: ClientConfig,
    origin: Option<String>,
    token_store: Option<Arc<dyn TokenStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    notifier: Option<Arc<dyn Notifier>>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ApiClientBuilder {
    /// Use `config` for base URL, timeout and session settings
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the API base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base = Some(url.into());
        self
    }

    /// Origin a relative base URL is resolved against, e.g. `https://app.example.com`
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Where the session token is read from and cleared
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Location access used for session expiry redirects
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Notifier used to tell the user their session expired
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Add a request interceptor, run after bearer auth
    pub fn request_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.request_interceptors.push(interceptor);
        self
    }

    /// Add a response interceptor, run after the session guard
    pub fn response_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.response_interceptors.push(interceptor);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let token_store = self
            .token_store
            .ok_or_else(|| ClientError::Configuration("token_store is required".into()))?;
        let navigator: Arc<dyn Navigator> = match self.navigator {
            Some(navigator) => navigator,
            None => Arc::new(MemoryNavigator::default()),
        };
        let notifier: Arc<dyn Notifier> = match self.notifier {
            Some(notifier) => notifier,
            None => Arc::new(LogNotifier),
        };

        let base_url = absolute_base_url(&self.config.base_url(), self.origin.as_deref())?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let mut client_builder = ClientBuilder::new().default_headers(default_headers);

        #[cfg(not(target_arch = "wasm32"))]
        {
            let timeout = self
                .timeout
                .or_else(|| self.config.timeout_secs.map(Duration::from_secs));
            if let Some(timeout) = timeout {
                client_builder = client_builder.timeout(timeout);
            }
        }

        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout; // Timeouts not supported on WASM

        client_builder =
            client_builder.user_agent(self.user_agent.unwrap_or_else(|| USER_AGENT.to_string()));

        let client = client_builder.build()?;

        let mut request_interceptors: Vec<Arc<dyn RequestInterceptor>> =
            vec![Arc::new(BearerAuth::new(token_store.clone()))];
        request_interceptors.extend(self.request_interceptors);

        let mut response_interceptors: Vec<Arc<dyn ResponseInterceptor>> =
            vec![Arc::new(SessionGuard::new(
                token_store,
                navigator,
                notifier,
                self.config.session,
            ))];
        response_interceptors.extend(self.response_interceptors);

        debug!(%base_url, "API client configured");

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                client,
                base_url,
                request_interceptors,
                response_interceptors,
            }),
        })
    }
}

/// Whether `url` starts with a scheme followed by `//`, e.g. `HTTPS://`.
/// Schemes match `[a-z][a-z0-9+.-]*` case-insensitively.
fn has_scheme(url: &str) -> bool {
    let Some((scheme, rest)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && rest.starts_with("//")
}

/// Scheme-qualified or protocol-relative (`//host/path`)
fn is_absolute(url: &str) -> bool {
    has_scheme(url) || url.starts_with("//")
}

/// Join a base URL and a request path with exactly one slash between them.
/// Absolute paths bypass the base; protocol-relative ones take its scheme.
fn join_url(base: &str, path: &str) -> String {
    if is_absolute(path) {
        if has_scheme(path) {
            return path.to_string();
        }
        return Url::parse(base)
            .and_then(|base| base.join(path))
            .map_or_else(|_| path.to_string(), String::from);
    }
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Turn a possibly relative base URL into an absolute one using `origin`
fn absolute_base_url(base: &str, origin: Option<&str>) -> Result<String, ClientError> {
    let base = base.trim_end_matches('/');
    if has_scheme(base) {
        Url::parse(base)
            .map_err(|e| ClientError::Configuration(format!("invalid base URL: {e}")))?;
        return Ok(base.to_string());
    }

    let origin = origin.ok_or_else(|| {
        ClientError::Configuration(format!("relative base URL '{base}' requires an origin"))
    })?;
    let origin = Url::parse(origin)
        .map_err(|e| ClientError::Configuration(format!("invalid origin: {e}")))?;

    let path = if base.starts_with('/') {
        base.to_string()
    } else {
        format!("/{base}")
    };
    let joined = origin
        .join(&path)
        .map_err(|e| ClientError::Configuration(format!("invalid base URL: {e}")))?;

    Ok(joined.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_single_slash() {
        assert_eq!(join_url("http://h/api", "/users"), "http://h/api/users");
        assert_eq!(join_url("http://h/api/", "users"), "http://h/api/users");
        assert_eq!(join_url("http://h/api", "users"), "http://h/api/users");
        assert_eq!(join_url("http://h/api", ""), "http://h/api");
    }

    #[test]
    fn absolute_paths_bypass_base() {
        assert_eq!(
            join_url("http://h/api", "https://other.example.com/x"),
            "https://other.example.com/x"
        );
        assert_eq!(
            join_url("http://h/api", "HTTP://Other.example.com/x"),
            "HTTP://Other.example.com/x"
        );
    }

    #[test]
    fn protocol_relative_paths_take_base_scheme() {
        assert_eq!(
            join_url("http://h/api", "//cdn.example.com/x"),
            "http://cdn.example.com/x"
        );
        assert_eq!(
            join_url("https://h/api", "//cdn.example.com/x"),
            "https://cdn.example.com/x"
        );
    }

    #[test]
    fn scheme_detection_is_case_insensitive() {
        assert!(has_scheme("HTTPS://API.EXAMPLE.COM"));
        assert!(has_scheme("git+ssh://host/repo"));
        assert!(!has_scheme("/api"));
        assert!(!has_scheme("localhost:3000/api"));
        assert!(!has_scheme("1http://host"));
        assert!(is_absolute("//cdn.example.com"));
    }

    #[test]
    fn relative_base_uses_origin() {
        assert_eq!(
            absolute_base_url("/api", Some("http://localhost:3000")).unwrap(),
            "http://localhost:3000/api"
        );
        assert_eq!(
            absolute_base_url("api/", Some("http://localhost:3000/some/page")).unwrap(),
            "http://localhost:3000/api"
        );
        assert_eq!(
            absolute_base_url("https://api.example.com/v1/", None).unwrap(),
            "https://api.example.com/v1"
        );
    }

    #[test]
    fn uppercase_scheme_base_is_kept_as_given() {
        assert_eq!(
            absolute_base_url("HTTPS://API.EXAMPLE.COM/v1", Some("http://localhost:3000")).unwrap(),
            "HTTPS://API.EXAMPLE.COM/v1"
        );
    }

    #[test]
    fn protocol_relative_base_uses_origin_scheme() {
        assert_eq!(
            absolute_base_url("//api.example.com/v1", Some("https://app.example.com")).unwrap(),
            "https://api.example.com/v1"
        );
    }

    #[test]
    fn relative_base_without_origin_fails() {
        assert!(matches!(
            absolute_base_url("/api", None),
            Err(ClientError::Configuration(_))
        ));
        assert!(matches!(
            absolute_base_url("/api", Some("not a url")),
            Err(ClientError::Configuration(_))
        ));
    }
}
