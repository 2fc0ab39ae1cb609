//! Fluent per-request builder.
//!
//! A [`RequestBuilder`] accumulates per-call overrides and delegates to
//! the client's retry pipeline on [`RequestBuilder::send`]. Mutators do
//! no validation; `send` fails fast with a configuration error (and zero
//! network calls) when the client, method, or path is unset.

use grapnel_core::{BackoffConfig, Body, CallError, CallResult, ContentType, Error, Method};

use crate::client::Client;
use crate::pipeline::{self, CallSpec};

/// Fluent accumulator of per-call request configuration.
///
/// Usually obtained from [`Client::request`], which binds the client;
/// a detached builder can be bound later with
/// [`RequestBuilder::client`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
    client: Option<Client>,
    spec: CallSpec,
}

impl RequestBuilder {
    /// Creates an unbound builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bound(client: Client) -> Self {
        Self {
            client: Some(client),
            spec: CallSpec::default(),
        }
    }

    /// Bind the client that will execute this request.
    #[must_use]
    pub fn client(mut self, client: &Client) -> Self {
        self.client = Some(client.clone());
        self
    }

    /// Set the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.spec.method = Some(method);
        self
    }

    /// Set the request path, resolved against the client's base URL.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.spec.path = Some(path.into());
        self
    }

    /// Append a query parameter. Pairs are serialized unescaped in
    /// insertion order; pre-encode values that require it.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.query.push((name.into(), value.into()));
        self
    }

    /// Set a request header, overriding a same-named client default.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.headers.insert(name.into(), value.into());
        self
    }

    /// Set the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.spec.body = Some(body.into());
        self
    }

    /// Set a structured body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the value cannot be captured as a
    /// structured payload.
    pub fn structured<T: serde::Serialize>(mut self, value: &T) -> Result<Self, Error> {
        self.spec.body = Some(Body::structured(value)?);
        Ok(self)
    }

    /// Override the content type used to encode a structured body for
    /// this call only.
    #[must_use]
    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.spec.content_type = Some(content_type);
        self
    }

    /// Override the backoff policy for this call. Replaces the client's
    /// default wholesale; there is no field-by-field merge.
    #[must_use]
    pub fn backoff(mut self, backoff: BackoffConfig) -> Self {
        self.spec.backoff = Some(backoff);
        self
    }

    /// Execute the request through the retry pipeline, decoding the
    /// success body into `T` and a classified error body into `E`.
    pub async fn send<T, E>(self) -> CallResult<T, E>
    where
        T: serde::de::DeserializeOwned,
        E: serde::de::DeserializeOwned,
    {
        let Some(client) = self.client else {
            return Err(CallError::before_response(Error::configuration(
                "client is not set",
            )));
        };
        pipeline::execute(client.shared(), self.spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutators_accumulate() {
        let builder = RequestBuilder::new()
            .method(Method::Post)
            .path("/users")
            .query("page", "1")
            .header("Accept", "application/json")
            .body("payload");

        assert_eq!(builder.spec.method, Some(Method::Post));
        assert_eq!(builder.spec.path.as_deref(), Some("/users"));
        assert_eq!(builder.spec.query, vec![("page".to_owned(), "1".to_owned())]);
        assert_eq!(
            builder.spec.headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
        assert!(matches!(builder.spec.body, Some(Body::Text(_))));
    }

    #[tokio::test]
    async fn send_without_client_is_a_configuration_error() {
        let result: CallResult<serde_json::Value> = RequestBuilder::new()
            .method(Method::Get)
            .path("/ping")
            .send()
            .await;

        let err = result.expect_err("should fail");
        assert_eq!(err.status(), 0);
        assert!(matches!(err.source(), Error::Configuration(_)));
    }
}
