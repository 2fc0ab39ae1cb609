//! Core types for the grapnel resilient HTTP client.
//!
//! This crate provides the transport-agnostic pieces of the engine:
//! - [`Method`] - HTTP method enum
//! - [`Body`] and [`ContentType`] - request payloads and encoding tags
//! - [`codec`] - content-type dispatched encode/decode
//! - [`BackoffConfig`] / [`BackoffMode`] - retry/backoff policy
//! - [`Request`] and [`Response`] - wire-level request/response types
//! - [`Reply`], [`CallError`], [`CallResult`] - terminal call outcomes
//! - [`Error`] and [`Result`] - error handling
//! - [`HttpLogger`] - consumed lifecycle-observation capability

mod backoff;
mod body;
pub mod codec;
mod error;
mod logger;
mod method;
mod outcome;
pub mod prelude;
mod request;
mod response;

pub use backoff::{BackoffConfig, BackoffMode};
pub use body::{Body, ContentType};
pub use codec::{decode, encode, from_json};
pub use error::{Error, Result};
pub use logger::{HttpLogger, NoopLogger, REDACTED, is_sensitive_header, masked_headers};
pub use method::Method;
pub use outcome::{CallError, CallResult, Reply};
pub use request::Request;
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
