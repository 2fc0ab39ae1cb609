//! `tracing`-backed lifecycle logger.

use std::collections::HashMap;
use std::time::Duration;

use grapnel_core::{Error, HttpLogger, Method};
use tracing::{debug, info, warn};

/// [`HttpLogger`] that emits `tracing` events.
///
/// Header maps arrive pre-masked from the pipeline; bodies are logged at
/// debug level only.
///
/// # Example
///
/// ```ignore
/// let client = Client::builder("https://api.example.com")
///     .logger(TracingLogger::default())
///     .build()?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    /// Create a new tracing logger.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    // Saturating conversion to u64 (truncates after ~584 million years)
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

impl HttpLogger for TracingLogger {
    fn on_request(
        &self,
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&[u8]>,
    ) {
        debug!(
            %method,
            url,
            ?headers,
            body_len = body.map_or(0, <[u8]>::len),
            "sending request"
        );
    }

    fn on_success(&self, status: u16, body: &[u8], elapsed: Duration) {
        info!(
            status,
            elapsed_ms = elapsed_ms(elapsed),
            body_len = body.len(),
            "request completed"
        );
    }

    fn on_failure(&self, status: u16, body: &[u8], elapsed: Duration, error: &Error) {
        warn!(
            status,
            elapsed_ms = elapsed_ms(elapsed),
            body_len = body.len(),
            error = %error,
            "request failed"
        );
    }

    fn on_retry(&self, status: u16, error: &Error, attempt: u32, max_retries: u32) {
        warn!(
            status,
            error = %error,
            attempt,
            max_retries,
            "retrying request"
        );
    }
}
