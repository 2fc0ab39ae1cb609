//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use grapnel_core::prelude::*;
//! ```

pub use crate::{
    BackoffConfig, BackoffMode, Body, CallError, CallResult, ContentType, Error, HttpLogger,
    Method, NoopLogger, Reply, Request, Response, Result, decode, encode, from_json,
};
