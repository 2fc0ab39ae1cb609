//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use grapnel::prelude::*;
//! ```

pub use crate::{
    BackoffConfig, BackoffMode, Body, CallError, CallResult, Client, ClientConfig, ContentType,
    Error, HttpLogger, Method, NoopLogger, Reply, RequestBuilder, Response, Result, StatusCode,
    TracingLogger, header,
};
pub use serde::{Deserialize, Serialize};
