//! Error types for grapnel.

use derive_more::{Display, Error, From};

/// Main error type for grapnel operations.
///
/// Only [`Error::Http`] is ever eligible for retry, gated by the
/// configured retryable status set. Transport errors (`Connection`,
/// `Tls`, `Timeout`) surface immediately: connectivity failures need
/// capability above this layer, not a blind re-send.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Missing or inconsistent request configuration (no client, method, or
    /// path on a builder). Raised before any network activity.
    #[display("configuration error: {_0}")]
    #[from(skip)]
    Configuration(#[error(not(source))] String),

    /// Request body could not be serialized for the chosen content type.
    #[display("encode error ({content_type}): {message}")]
    #[from(skip)]
    Encode {
        /// Content type the body was encoded for.
        content_type: String,
        /// Error message.
        message: String,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Response body could not be parsed into the requested target shape.
    #[display("decode error ({content_type}): {message}")]
    #[from(skip)]
    Decode {
        /// Declared content type the body was decoded as.
        content_type: String,
        /// Error message, including the value path for JSON bodies.
        message: String,
    },

    /// Classified HTTP failure (non-2xx, non-dismissed-404 status).
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Raw response body, if available.
        #[error(not(source))]
        body: Option<bytes::Bytes>,
    },

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an encode error for the given content type.
    #[must_use]
    pub fn encode(content_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encode {
            content_type: content_type.into(),
            message: message.into(),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create a decode error for the given declared content type.
    #[must_use]
    pub fn decode(content_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            content_type: content_type.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error from status code and message.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an HTTP error with the raw response body attached.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: bytes::Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if no HTTP response was ever received.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Tls(_) | Self::Timeout)
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns the raw response body if this is an HTTP error with a body.
    #[must_use]
    pub fn body(&self) -> Option<&bytes::Bytes> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::http(503, "Service Unavailable");
        assert_eq!(err.to_string(), "HTTP error 503: Service Unavailable");

        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = Error::connection("connection refused");
        assert_eq!(err.to_string(), "connection error: connection refused");

        let err = Error::configuration("method is not set");
        assert_eq!(err.to_string(), "configuration error: method is not set");

        let err = Error::decode("application/json", "missing field `city` at address");
        assert_eq!(
            err.to_string(),
            "decode error (application/json): missing field `city` at address"
        );
    }

    #[test]
    fn error_status() {
        let err = Error::http(404, "Not Found");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = Error::http(500, "Internal Server Error");
        assert!(err.is_server_error());

        assert_eq!(Error::Timeout.status(), None);
    }

    #[test]
    fn error_is_transport() {
        assert!(Error::Timeout.is_transport());
        assert!(Error::connection("refused").is_transport());
        assert!(Error::tls("bad certificate").is_transport());
        assert!(!Error::http(503, "unavailable").is_transport());
        assert!(!Error::configuration("no path").is_transport());
    }

    #[test]
    fn error_body() {
        let body = bytes::Bytes::from(r#"{"error":"boom"}"#);
        let err = Error::http_with_body(500, "Internal Server Error", body.clone());
        assert_eq!(err.body(), Some(&body));

        assert!(Error::http(500, "Internal Server Error").body().is_none());
        assert!(Error::Timeout.body().is_none());
    }
}
