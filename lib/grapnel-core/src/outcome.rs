//! Terminal call outcomes.
//!
//! Every executed call resolves to a [`CallResult`]: a [`Reply`] carrying
//! the status and an optionally decoded success value, or a [`CallError`]
//! carrying the status (0 when no HTTP response was ever received), an
//! optionally decoded error payload, and the underlying [`Error`].
//! Success and error payloads are mutually exclusive by construction.

use crate::{Error, Result, codec};

/// Successful terminal response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    status: u16,
    value: Option<T>,
}

impl<T> Reply<T> {
    /// Creates a reply with a decoded success value.
    #[must_use]
    pub const fn new(status: u16, value: Option<T>) -> Self {
        Self { status, value }
    }

    /// Creates an empty reply (dismissed 404 or bodyless 2xx).
    #[must_use]
    pub const fn empty(status: u16) -> Self {
        Self {
            status,
            value: None,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Decoded success value, if a body was present.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Consume into the decoded success value.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        self.value
    }
}

/// Failed terminal response.
///
/// `status` is `0` only when the call never produced an HTTP status
/// (configuration, encoding, or transport failure). For classified HTTP
/// failures, `decoded` holds the error payload parsed into `E` when the
/// body allowed it; the raw body stays reachable through
/// [`CallError::source`].
#[derive(Debug)]
pub struct CallError<E> {
    status: u16,
    decoded: Option<E>,
    source: Error,
}

impl<E> CallError<E> {
    /// Creates a call error from its parts.
    #[must_use]
    pub const fn new(status: u16, decoded: Option<E>, source: Error) -> Self {
        Self {
            status,
            decoded,
            source,
        }
    }

    /// Wraps a failure that happened before any HTTP response existed.
    #[must_use]
    pub const fn before_response(source: Error) -> Self {
        Self {
            status: 0,
            decoded: None,
            source,
        }
    }

    /// HTTP status code, `0` when no response was received.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Decoded error payload, when the error body parsed into `E`.
    #[must_use]
    pub const fn decoded(&self) -> Option<&E> {
        self.decoded.as_ref()
    }

    /// The underlying error.
    #[must_use]
    pub const fn source(&self) -> &Error {
        &self.source
    }

    /// Consume into (status, decoded payload, source error).
    #[must_use]
    pub fn into_parts(self) -> (u16, Option<E>, Error) {
        (self.status, self.decoded, self.source)
    }

    /// Re-decode the raw error body as JSON into another shape.
    ///
    /// Returns `None` when there is no HTTP error body to decode.
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.source.body().map(|body| codec::from_json(body))
    }
}

impl<E> std::fmt::Display for CallError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.status == 0 {
            write!(f, "call failed before a response was received: {}", self.source)
        } else {
            write!(f, "call failed with status {}: {}", self.status, self.source)
        }
    }
}

impl<E: std::fmt::Debug> std::error::Error for CallError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl<E> From<Error> for CallError<E> {
    fn from(source: Error) -> Self {
        let status = source.status().unwrap_or(0);
        Self {
            status,
            decoded: None,
            source,
        }
    }
}

/// Result of one executed call.
///
/// `E` defaults to [`serde_json::Value`] for callers that do not model
/// the error body shape.
pub type CallResult<T, E = serde_json::Value> = std::result::Result<Reply<T>, CallError<E>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_accessors() {
        let reply = Reply::new(200, Some(42));
        assert_eq!(reply.status(), 200);
        assert_eq!(reply.value(), Some(&42));
        assert_eq!(reply.into_value(), Some(42));

        let empty: Reply<u32> = Reply::empty(404);
        assert_eq!(empty.status(), 404);
        assert!(empty.value().is_none());
    }

    #[test]
    fn call_error_display() {
        let err: CallError<serde_json::Value> =
            CallError::before_response(Error::connection("refused"));
        assert_eq!(err.status(), 0);
        assert_eq!(
            err.to_string(),
            "call failed before a response was received: connection error: refused"
        );

        let err: CallError<serde_json::Value> =
            CallError::new(503, None, Error::http(503, "Service Unavailable"));
        assert_eq!(
            err.to_string(),
            "call failed with status 503: HTTP error 503: Service Unavailable"
        );
    }

    #[test]
    fn call_error_from_error_carries_status() {
        let err: CallError<serde_json::Value> = Error::http(418, "teapot").into();
        assert_eq!(err.status(), 418);

        let err: CallError<serde_json::Value> = Error::Timeout.into();
        assert_eq!(err.status(), 0);
    }

    #[test]
    fn call_error_decode_body() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct ApiError {
            code: String,
        }

        let body = bytes::Bytes::from(r#"{"code":"E42"}"#);
        let err: CallError<serde_json::Value> =
            CallError::new(500, None, Error::http_with_body(500, "boom", body));

        let decoded: ApiError = err
            .decode_body()
            .expect("has body")
            .expect("decodes");
        assert_eq!(decoded.code, "E42");

        let err: CallError<serde_json::Value> = CallError::before_response(Error::Timeout);
        assert!(err.decode_body::<ApiError>().is_none());
    }
}
