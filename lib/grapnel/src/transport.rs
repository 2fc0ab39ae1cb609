//! Transport executor built on hyper-util.
//!
//! Performs buffered round trips with wall-clock timing over a pooled
//! connection with TLS. A returned [`Response`] means the round trip
//! completed with an HTTP status; an [`Error`] means no status was ever
//! produced (DNS, connect, TLS, timeout) and nothing further is decoded.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};

use grapnel_core::{Error, Request, Response, Result};

use crate::config::ClientConfig;
use crate::connector::https_connector;
use crate::redirect::{self, MAX_REDIRECTS};

/// Pooled HTTP transport.
#[derive(Clone)]
pub(crate) struct Transport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    timeout: Duration,
    follow_redirects: bool,
}

impl Transport {
    pub(crate) fn new(config: &ClientConfig) -> Self {
        let connector = https_connector(config.connect_timeout);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self {
            inner,
            timeout: config.timeout,
            follow_redirects: config.follow_redirects,
        }
    }

    /// Execute one request, following redirects per the client's policy,
    /// and measure elapsed wall-clock time.
    pub(crate) async fn execute(&self, request: Request) -> Result<(Response, Duration)> {
        let start = Instant::now();

        let mut current = request;
        let mut hops = 0;
        let response = loop {
            let response = self.round_trip(current.clone()).await?;

            if !self.follow_redirects || !redirect::is_redirect(response.status()) {
                break response;
            }
            if hops >= MAX_REDIRECTS {
                return Err(Error::connection(format!(
                    "too many redirects (exceeded max of {MAX_REDIRECTS})"
                )));
            }

            current = redirect::follow_up(current, &response)?;
            hops += 1;
        };

        Ok((response, start.elapsed()))
    }

    async fn round_trip(&self, request: Request) -> Result<Response> {
        let hyper_request = build_hyper_request(request)?;

        let response = tokio::time::timeout(self.timeout, self.inner.request(hyper_request))
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(map_hyper_error)?;

        let status = response.status().as_u16();
        let headers = extract_headers(response.headers());

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::connection(e.to_string()))?
            .to_bytes();

        Ok(Response::new(status, headers, body))
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("timeout", &self.timeout)
            .field("follow_redirects", &self.follow_redirects)
            .finish_non_exhaustive()
    }
}

/// Build a hyper request from a wire request.
fn build_hyper_request(request: Request) -> Result<http::Request<Full<Bytes>>> {
    let (method, url, headers, body) = request.into_parts();

    let mut builder = http::Request::builder()
        .method(http::Method::from(method))
        .uri(url.as_str());

    for (name, value) in &headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let body = body.map_or_else(Full::default, Full::new);
    builder
        .body(body)
        .map_err(|e| Error::configuration(e.to_string()))
}

/// Extract response headers as a `HashMap`.
fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect()
}

#[allow(clippy::needless_pass_by_value)]
fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
    let msg = err.to_string();

    if err.is_connect() {
        return Error::connection(msg);
    }

    if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
        return Error::tls(msg);
    }

    Error::connection(msg)
}

#[cfg(test)]
mod tests {
    use grapnel_core::Method;

    use super::*;

    #[test]
    fn builds_hyper_request_with_headers_and_body() {
        let url = url::Url::parse("https://api.example.com/users").expect("url");
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_owned(), "application/json".to_owned());
        let request = Request::from_parts(
            Method::Post,
            url,
            headers,
            Some(Bytes::from_static(b"{}")),
        );

        let hyper_request = build_hyper_request(request).expect("build");
        assert_eq!(hyper_request.method(), http::Method::POST);
        assert_eq!(hyper_request.uri(), "https://api.example.com/users");
        assert_eq!(
            hyper_request
                .headers()
                .get("Content-Type")
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }

    #[test]
    fn extracts_string_headers() {
        let mut headers = http::HeaderMap::new();
        headers.insert("content-type", "text/plain".parse().expect("value"));
        let extracted = extract_headers(&headers);
        assert_eq!(
            extracted.get("content-type").map(String::as_str),
            Some("text/plain")
        );
    }
}
