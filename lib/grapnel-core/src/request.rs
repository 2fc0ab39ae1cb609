//! Assembled wire request.
//!
//! A [`Request`] is the fully resolved form a transport executes: method,
//! absolute URL, merged headers, and the already-encoded body. Path/query
//! assembly, header merging, and body encoding happen upstream in the
//! retry pipeline; redirects rebuild this type hop by hop.

use std::collections::HashMap;

use bytes::Bytes;

use crate::Method;

/// A wire-ready HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
}

impl Request {
    /// Creates a request with no headers or body.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Creates a request from pre-merged parts.
    #[must_use]
    pub fn from_parts(
        method: Method,
        url: url::Url,
        headers: HashMap<String, String>,
        body: Option<Bytes>,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Absolute request URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Merged request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Encoded request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, HashMap<String, String>, Option<Bytes>) {
        (self.method, self.url, self.headers, self.body)
    }
}
