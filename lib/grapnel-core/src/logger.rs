//! Call lifecycle observation.
//!
//! [`HttpLogger`] is a capability the client consumes, never implements:
//! the pipeline notifies it before each send, on the terminal outcome,
//! and before each retry sleep. The default [`NoopLogger`] keeps the
//! pipeline free of `Option` checks.
//!
//! Header maps passed to [`HttpLogger::on_request`] are pre-masked by the
//! pipeline via [`masked_headers`], so implementations never see
//! sensitive values.

use std::collections::HashMap;
use std::time::Duration;

use crate::{Error, Method};

/// Fixed replacement for masked header values. The header name stays
/// visible; the value never does.
pub const REDACTED: &str = "*****";

/// Observer for request lifecycle events.
pub trait HttpLogger: Send + Sync {
    /// Called before each send attempt with the masked header map.
    fn on_request(
        &self,
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&[u8]>,
    );

    /// Called once on a successful terminal response.
    fn on_success(&self, status: u16, body: &[u8], elapsed: Duration);

    /// Called once on a failed terminal response. `status` is `0` when no
    /// HTTP response was received.
    fn on_failure(&self, status: u16, body: &[u8], elapsed: Duration, error: &Error);

    /// Called before each retry sleep with the previous attempt's status
    /// and error, the 1-based retry index, and the retry budget.
    fn on_retry(&self, status: u16, error: &Error, attempt: u32, max_retries: u32);
}

/// Logger that ignores every event. Used when no logger is injected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl HttpLogger for NoopLogger {
    fn on_request(
        &self,
        _method: Method,
        _url: &str,
        _headers: &HashMap<String, String>,
        _body: Option<&[u8]>,
    ) {
    }

    fn on_success(&self, _status: u16, _body: &[u8], _elapsed: Duration) {}

    fn on_failure(&self, _status: u16, _body: &[u8], _elapsed: Duration, _error: &Error) {}

    fn on_retry(&self, _status: u16, _error: &Error, _attempt: u32, _max_retries: u32) {}
}

/// Returns `true` for header names whose values must never be logged.
///
/// Matches case-insensitively: `Authorization`, `Cookie`, `Set-Cookie`,
/// `Proxy-Authorization`, and any name containing `api-key`/`apikey`.
#[must_use]
pub fn is_sensitive_header(name: &str) -> bool {
    const EXACT: [&str; 4] = ["authorization", "cookie", "set-cookie", "proxy-authorization"];

    let lower = name.to_ascii_lowercase();
    EXACT.contains(&lower.as_str()) || lower.contains("api-key") || lower.contains("apikey")
}

/// Copy a header map with sensitive values replaced by [`REDACTED`].
#[must_use]
pub fn masked_headers(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if is_sensitive_header(name) {
                REDACTED.to_owned()
            } else {
                value.clone()
            };
            (name.clone(), value)
        })
        .collect()
}
