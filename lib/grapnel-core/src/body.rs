//! Request body representation.
//!
//! [`Body`] is a closed sum over the three payload shapes the engine
//! knows how to put on the wire: raw text, raw bytes, and structured
//! data. Raw variants are sent verbatim; structured data is encoded by
//! [`crate::codec`] according to the effective content type.

use bytes::Bytes;

use crate::{Error, Result};

/// Content type tag driving body encoding and decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// XML content type (`application/xml`).
    Xml,
    /// Plain text content type (`text/plain`).
    PlainText,
    /// Binary content type (`application/octet-stream`).
    OctetStream,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::PlainText => "text/plain",
            Self::OctetStream => "application/octet-stream",
        }
    }

    /// Parse a `Content-Type` header value, stripping parameters such as
    /// `charset`. Returns `None` for MIME types the codec has no direct
    /// dispatch for (callers fall back to JSON).
    #[must_use]
    pub fn parse(header: &str) -> Option<Self> {
        let essence = header.split(';').next().unwrap_or(header).trim();
        if essence.eq_ignore_ascii_case("application/json") {
            Some(Self::Json)
        } else if essence.eq_ignore_ascii_case("application/xml")
            || essence.eq_ignore_ascii_case("text/xml")
        {
            Some(Self::Xml)
        } else if essence.eq_ignore_ascii_case("text/plain") {
            Some(Self::PlainText)
        } else if essence.eq_ignore_ascii_case("application/octet-stream") {
            Some(Self::OctetStream)
        } else {
            None
        }
    }

    /// Extract the `charset` parameter from a `Content-Type` header value.
    #[must_use]
    pub fn charset(header: &str) -> Option<&str> {
        header.split(';').skip(1).find_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches('"'))
        })
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request body payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Raw text, sent verbatim as `text/plain`.
    Text(String),
    /// Raw bytes, sent verbatim as `application/octet-stream`.
    Bytes(Bytes),
    /// Structured data, encoded per the effective content type.
    Structured(serde_json::Value),
}

impl Body {
    /// Capture any serializable value as a structured body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the value cannot be represented as a
    /// structured payload (e.g. a map with non-string keys).
    pub fn structured<T: serde::Serialize>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Self::Structured)
            .map_err(|e| Error::encode("structured", e.to_string()))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }
}
