//! The request-execution pipeline.
//!
//! Orchestrates codec, transport, backoff policy, and logger into one
//! call contract: encode once, then `Sending → {Succeeded, Retrying,
//! Failed}` until a terminal state. Each retry re-sends the identical
//! request; decode targets are only populated on the attempt that
//! terminates the loop. The pipeline blocks the caller for transport I/O
//! and backoff sleeps; concurrent calls share nothing but the pooled
//! transport.

use std::collections::HashMap;
use std::time::Instant;

use bytes::Bytes;
use grapnel_core::{
    BackoffConfig, Body, CallError, CallResult, ContentType, Error, Method, Reply, Request,
    Result, codec, masked_headers,
};
use url::Url;

use crate::client::Shared;

/// Per-call overrides accumulated by the builder or a verb shortcut,
/// consumed exactly once by [`execute`].
#[derive(Debug, Default)]
pub(crate) struct CallSpec {
    pub(crate) method: Option<Method>,
    pub(crate) path: Option<String>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Option<Body>,
    pub(crate) content_type: Option<ContentType>,
    pub(crate) backoff: Option<BackoffConfig>,
}

/// Run one call through the retry pipeline.
pub(crate) async fn execute<T, E>(shared: &Shared, spec: CallSpec) -> CallResult<T, E>
where
    T: serde::de::DeserializeOwned,
    E: serde::de::DeserializeOwned,
{
    let config = &shared.config;
    let logger = shared.logger.as_ref();

    // Fail fast, before any network activity.
    let method = spec
        .method
        .ok_or_else(|| CallError::before_response(Error::configuration("method is not set")))?;
    let path = spec
        .path
        .ok_or_else(|| CallError::before_response(Error::configuration("path is not set")))?;

    let content_type = spec.content_type.unwrap_or(config.content_type);
    let encoded = match &spec.body {
        Some(body) => {
            Some(codec::encode(body, content_type).map_err(CallError::before_response)?)
        }
        None => None,
    };

    let url = assemble_url(&config.base_url, &path, &spec.query)
        .map_err(CallError::before_response)?;

    // Merge order: client defaults, request headers, computed Content-Type.
    let mut headers = config.default_headers.clone();
    headers.extend(spec.headers);
    let body = encoded.map(|(bytes, wire)| {
        headers.insert("Content-Type".to_owned(), wire.as_str().to_owned());
        bytes
    });

    let request = Request::from_parts(method, url, headers, body);
    let masked = masked_headers(request.headers());

    // A request-level backoff replaces the client default wholesale.
    let backoff = spec.backoff.or_else(|| config.backoff.clone());

    let mut retries: u32 = 0;
    loop {
        logger.on_request(
            method,
            request.url().as_str(),
            &masked,
            request.body().map(Bytes::as_ref),
        );

        let attempt_start = Instant::now();
        let (response, elapsed) = match shared.transport.execute(request.clone()).await {
            Ok(outcome) => outcome,
            Err(err) => {
                // Transport failures never retry: no status to classify,
                // and connectivity recovery belongs above this layer.
                logger.on_failure(0, &[], attempt_start.elapsed(), &err);
                return Err(CallError::before_response(err));
            }
        };

        let status = response.status();

        if response.is_success() {
            let value = if response.body().is_empty() {
                None
            } else {
                match codec::decode::<T>(response.body(), response.content_type()) {
                    Ok(value) => Some(value),
                    Err(err) => {
                        logger.on_failure(status, response.body(), elapsed, &err);
                        return Err(CallError::new(status, None, err));
                    }
                }
            };
            logger.on_success(status, response.body(), elapsed);
            return Ok(Reply::new(status, value));
        }

        if status == 404 && config.dismiss_404 {
            logger.on_success(status, response.body(), elapsed);
            return Ok(Reply::empty(status));
        }

        let err = Error::http_with_body(status, status_message(status), response.body().clone());

        if let Some(policy) = &backoff
            && policy.retries(status)
            && retries < policy.max_retries
        {
            retries += 1;
            logger.on_retry(status, &err, retries, policy.max_retries);
            tokio::time::sleep(policy.delay_for(retries)).await;
            continue;
        }

        // Terminal failure: decode the error target when the body allows
        // it; the raw body stays reachable through the error either way.
        let decoded = if response.body().is_empty() {
            None
        } else {
            codec::decode::<E>(response.body(), response.content_type()).ok()
        };
        logger.on_failure(status, response.body(), elapsed, &err);
        return Err(CallError::new(status, decoded, err));
    }
}

/// Join base URL, path, and query into the absolute request URL.
///
/// Query pairs are serialized as unescaped `key=value` joins; callers
/// pre-encode values that require it (preserved wire behavior).
fn assemble_url(base: &Url, path: &str, query: &[(String, String)]) -> Result<Url> {
    let mut target = String::with_capacity(base.as_str().len() + path.len());
    target.push_str(base.as_str().trim_end_matches('/'));
    if !path.starts_with('/') {
        target.push('/');
    }
    target.push_str(path);

    if !query.is_empty() {
        let joined = query
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        target.push('?');
        target.push_str(&joined);
    }

    Url::parse(&target).map_err(Error::InvalidUrl)
}

fn status_message(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("unrecognized status")
}
