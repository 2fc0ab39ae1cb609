//! Resilient HTTP client engine.
//!
//! Given a base endpoint and declarative per-request configuration,
//! grapnel executes HTTP calls, applies a configurable retry/backoff
//! strategy on transient failures, negotiates request/response body
//! encoding by content type, and reports lifecycle events to an injected
//! logger.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use grapnel::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let client = Client::builder("https://api.example.com")
//!     .backoff(BackoffConfig::fixed(3, [503], Duration::from_millis(500)))
//!     .dismiss_404(true)
//!     .build()?;
//!
//! let reply = client.get::<User, serde_json::Value>("/users/42").await?;
//! if let Some(user) = reply.into_value() {
//!     println!("{}", user.name);
//! }
//! ```

mod builder;
mod client;
mod config;
mod connector;
mod logging;
mod pipeline;
mod redirect;
pub mod prelude;
mod transport;

pub use builder::RequestBuilder;
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use logging::TracingLogger;
pub use redirect::MAX_REDIRECTS;

// Re-export core types
pub use grapnel_core::{
    BackoffConfig, BackoffMode, Body, CallError, CallResult, ContentType, Error, HttpLogger,
    Method, NoopLogger, REDACTED, Reply, Request, Response, Result, decode, encode, from_json,
    is_sensitive_header, masked_headers,
};

// Re-export http types for status codes and headers
pub use grapnel_core::{StatusCode, header};
