//! The HTTP client engine.
//!
//! A [`Client`] pairs connection-level configuration with a pooled
//! transport and an injected [`HttpLogger`]. It is cheap to clone and
//! safe for concurrent use: every call carries its own spec and attempt
//! loop, and only the transport's connection pool is shared.

use std::sync::Arc;

use grapnel_core::{Body, CallResult, HttpLogger, Method, NoopLogger, Result};

use crate::builder::RequestBuilder;
use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::pipeline::{self, CallSpec};
use crate::transport::Transport;

/// State shared by all clones of a [`Client`].
pub(crate) struct Shared {
    pub(crate) transport: Transport,
    pub(crate) config: ClientConfig,
    pub(crate) logger: Arc<dyn HttpLogger>,
}

/// Resilient HTTP client bound to a base endpoint.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use grapnel::{BackoffConfig, Client};
///
/// let client = Client::builder("https://api.example.com")
///     .backoff(BackoffConfig::fixed(3, [503], Duration::from_millis(500)))
///     .build()?;
///
/// let user: Option<User> = client
///     .get::<User, serde_json::Value>("/users/1")
///     .await?
///     .into_value();
/// ```
#[derive(Clone)]
pub struct Client {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client for the given base URL with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// Create a client builder for the given base URL.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            config: ClientConfigBuilder::new(base_url),
            logger: None,
        }
    }

    /// Create a client from a pre-built configuration.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        Self::assemble(config, Arc::new(NoopLogger))
    }

    fn assemble(config: ClientConfig, logger: Arc<dyn HttpLogger>) -> Self {
        let transport = Transport::new(&config);
        Self {
            shared: Arc::new(Shared {
                transport,
                config,
                logger,
            }),
        }
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    pub(crate) fn shared(&self) -> &Shared {
        &self.shared
    }

    /// Start a fluent request bound to this client.
    #[must_use]
    pub fn request(&self) -> RequestBuilder {
        RequestBuilder::bound(self.clone())
    }

    /// Execute a GET request against the given path.
    pub async fn get<T, E>(&self, path: impl Into<String>) -> CallResult<T, E>
    where
        T: serde::de::DeserializeOwned,
        E: serde::de::DeserializeOwned,
    {
        self.one_shot(Method::Get, path, None).await
    }

    /// Execute a DELETE request against the given path.
    pub async fn delete<T, E>(&self, path: impl Into<String>) -> CallResult<T, E>
    where
        T: serde::de::DeserializeOwned,
        E: serde::de::DeserializeOwned,
    {
        self.one_shot(Method::Delete, path, None).await
    }

    /// Execute a POST request with the given body.
    pub async fn post<T, E>(&self, path: impl Into<String>, body: impl Into<Body>) -> CallResult<T, E>
    where
        T: serde::de::DeserializeOwned,
        E: serde::de::DeserializeOwned,
    {
        self.one_shot(Method::Post, path, Some(body.into())).await
    }

    /// Execute a PUT request with the given body.
    pub async fn put<T, E>(&self, path: impl Into<String>, body: impl Into<Body>) -> CallResult<T, E>
    where
        T: serde::de::DeserializeOwned,
        E: serde::de::DeserializeOwned,
    {
        self.one_shot(Method::Put, path, Some(body.into())).await
    }

    /// Execute a PATCH request with the given body.
    pub async fn patch<T, E>(
        &self,
        path: impl Into<String>,
        body: impl Into<Body>,
    ) -> CallResult<T, E>
    where
        T: serde::de::DeserializeOwned,
        E: serde::de::DeserializeOwned,
    {
        self.one_shot(Method::Patch, path, Some(body.into())).await
    }

    /// One-shot spec: no per-call backoff override, so the client's
    /// default backoff (if any) applies.
    async fn one_shot<T, E>(
        &self,
        method: Method,
        path: impl Into<String>,
        body: Option<Body>,
    ) -> CallResult<T, E>
    where
        T: serde::de::DeserializeOwned,
        E: serde::de::DeserializeOwned,
    {
        let spec = CallSpec {
            method: Some(method),
            path: Some(path.into()),
            body,
            ..CallSpec::default()
        };
        pipeline::execute(&self.shared, spec).await
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    config: ClientConfigBuilder,
    logger: Option<Arc<dyn HttpLogger>>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("has_logger", &self.logger.is_some())
            .finish()
    }
}

impl ClientBuilder {
    /// Inject the lifecycle logger. [`NoopLogger`] is used when absent.
    #[must_use]
    pub fn logger(mut self, logger: impl HttpLogger + 'static) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Inject an already-shared lifecycle logger.
    #[must_use]
    pub fn shared_logger(mut self, logger: Arc<dyn HttpLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed.
    pub fn build(self) -> Result<Client> {
        let config = self.config.build()?;
        let logger = self.logger.unwrap_or_else(|| Arc::new(NoopLogger));
        Ok(Client::assemble(config, logger))
    }
}

impl ClientBuilder {
    /// Set whether the executor follows redirects (default `true`).
    #[must_use]
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.config = self.config.follow_redirects(follow);
        self
    }

    /// Set whether 404 responses count as empty successes (default `false`).
    #[must_use]
    pub fn dismiss_404(mut self, dismiss: bool) -> Self {
        self.config = self.config.dismiss_404(dismiss);
        self
    }

    /// Add a header applied to every request.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.default_header(name, value);
        self
    }

    /// Set the default content type (default JSON).
    #[must_use]
    pub fn content_type(mut self, content_type: grapnel_core::ContentType) -> Self {
        self.config = self.config.content_type(content_type);
        self
    }

    /// Set the default backoff policy.
    #[must_use]
    pub fn backoff(mut self, backoff: grapnel_core::BackoffConfig) -> Self {
        self.config = self.config.backoff(backoff);
        self
    }

    /// Set the per-request read timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.pool_idle_per_host(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.pool_idle_timeout(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn client_builder_defaults() {
        let client = Client::new("https://api.example.com").expect("client");
        assert_eq!(client.config().timeout, Duration::from_secs(30));
        assert_eq!(client.config().pool_idle_per_host, 32);
    }

    #[test]
    fn client_builder_overrides() {
        let client = Client::builder("https://api.example.com")
            .timeout(Duration::from_secs(60))
            .pool_idle_per_host(16)
            .dismiss_404(true)
            .build()
            .expect("client");

        assert_eq!(client.config().timeout, Duration::from_secs(60));
        assert_eq!(client.config().pool_idle_per_host, 16);
        assert!(client.config().dismiss_404);
    }

    #[test]
    fn client_is_clone_and_debug() {
        let client = Client::new("https://api.example.com").expect("client");
        let cloned = client.clone();
        let debug = format!("{cloned:?}");
        assert!(debug.contains("Client"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(Client::new("definitely not a url").is_err());
    }
}
