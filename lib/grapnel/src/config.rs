//! Client configuration types.

use std::collections::HashMap;
use std::time::Duration;

use grapnel_core::{BackoffConfig, ContentType, Error, Result};
use url::Url;

/// Connection-level configuration for a [`crate::Client`].
///
/// Created once and reused across many calls; the single source of
/// defaults consulted per request. Request-level settings win on
/// conflict, and a request-level backoff replaces the default wholesale.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL all request paths are resolved against (no trailing slash).
    pub base_url: Url,
    /// Whether the executor follows 3xx redirects. When disabled, the
    /// first redirect response is returned as-is.
    pub follow_redirects: bool,
    /// Treat 404 as a non-error empty success (no decode attempted).
    pub dismiss_404: bool,
    /// Headers applied to every request; request-level headers override
    /// same-named keys.
    pub default_headers: HashMap<String, String>,
    /// Content type used to encode structured bodies unless overridden.
    pub content_type: ContentType,
    /// Default retry/backoff policy. `None` means single attempt.
    pub backoff: Option<BackoffConfig>,
    /// Per-request read timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration builder for the given base URL.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url)
    }
}

/// Builder for [`ClientConfig`]. Unset tunables receive non-zero
/// defaults at build time.
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    base_url: String,
    follow_redirects: Option<bool>,
    dismiss_404: Option<bool>,
    default_headers: HashMap<String, String>,
    content_type: Option<ContentType>,
    backoff: Option<BackoffConfig>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Creates a builder for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            follow_redirects: None,
            dismiss_404: None,
            default_headers: HashMap::new(),
            content_type: None,
            backoff: None,
            timeout: None,
            connect_timeout: None,
            pool_idle_per_host: None,
            pool_idle_timeout: None,
        }
    }

    /// Set whether the executor follows redirects (default `true`).
    #[must_use]
    pub const fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = Some(follow);
        self
    }

    /// Set whether 404 responses count as empty successes (default `false`).
    #[must_use]
    pub const fn dismiss_404(mut self, dismiss: bool) -> Self {
        self.dismiss_404 = Some(dismiss);
        self
    }

    /// Add a header applied to every request.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Add multiple default headers.
    #[must_use]
    pub fn default_headers(
        mut self,
        headers: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.default_headers.extend(headers);
        self
    }

    /// Set the default content type (default JSON).
    #[must_use]
    pub const fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Set the default backoff policy.
    #[must_use]
    pub fn backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Set the per-request read timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Build the configuration, normalizing the base URL and applying
    /// defaults for unset tunables.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed.
    pub fn build(self) -> Result<ClientConfig> {
        let base_url = Url::parse(self.base_url.trim_end_matches('/')).map_err(Error::InvalidUrl)?;

        Ok(ClientConfig {
            base_url,
            follow_redirects: self.follow_redirects.unwrap_or(true),
            dismiss_404: self.dismiss_404.unwrap_or(false),
            default_headers: self.default_headers,
            content_type: self.content_type.unwrap_or(ContentType::Json),
            backoff: self.backoff,
            timeout: self.timeout.unwrap_or(Duration::from_secs(30)),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(10)),
            pool_idle_per_host: self.pool_idle_per_host.unwrap_or(32),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(Duration::from_secs(90)),
        })
    }
}
