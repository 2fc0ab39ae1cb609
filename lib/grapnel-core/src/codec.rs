//! Content-type dispatched body encoding and decoding.
//!
//! Encoding is decided by the request configuration; decoding is decided
//! by the *response's* declared content type. The two sides are
//! deliberately independent, so a JSON-configured client still parses an
//! XML or plain-text response correctly.
//!
//! Anything the codec has no direct dispatch for falls back to JSON on
//! both sides.

use bytes::Bytes;
use serde::de::IntoDeserializer;
use serde::de::value::{SeqDeserializer, StrDeserializer};

use crate::{Body, ContentType, Error, Result};

/// Encode a request body for the effective content type.
///
/// Raw bodies bypass the configured content type entirely: text is sent
/// verbatim as `text/plain`, bytes as `application/octet-stream`. The
/// returned [`ContentType`] is the wire type to declare in the
/// `Content-Type` header, which may differ from the requested one.
///
/// # Errors
///
/// Returns [`Error::Encode`] if a structured body cannot be serialized.
pub fn encode(body: &Body, content_type: ContentType) -> Result<(Bytes, ContentType)> {
    match body {
        Body::Text(text) => Ok((Bytes::from(text.clone()), ContentType::PlainText)),
        Body::Bytes(bytes) => Ok((bytes.clone(), ContentType::OctetStream)),
        Body::Structured(value) => match content_type {
            ContentType::Json => encode_json(value),
            ContentType::Xml => Ok((Bytes::from(to_xml(value)), ContentType::Xml)),
            ContentType::PlainText => {
                // Best-effort string conversion for structured data.
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Ok((Bytes::from(text), ContentType::PlainText))
            }
            // No native encoding for binary: fall back to JSON and correct
            // the wire type so the declared header matches the payload.
            ContentType::OctetStream => encode_json(value),
        },
    }
}

fn encode_json(value: &serde_json::Value) -> Result<(Bytes, ContentType)> {
    serde_json::to_vec(value)
        .map(|buf| (Bytes::from(buf), ContentType::Json))
        .map_err(|e| Error::encode(ContentType::Json.as_str(), e.to_string()))
}

/// Decode a response body into `T`, dispatching on the response's
/// declared content type (parameters such as `charset` stripped).
///
/// - JSON, and any unknown or missing content type, decode as JSON.
/// - XML decodes charset-aware, so non-UTF8-labelled XML still parses.
/// - `text/plain` feeds the raw text to string-shaped targets directly,
///   falling back to JSON for anything else.
/// - `application/octet-stream` feeds the raw bytes to byte-sequence
///   targets directly, falling back to JSON for anything else.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the body cannot be parsed into `T`.
pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8], declared: Option<&str>) -> Result<T> {
    match declared.and_then(ContentType::parse) {
        None | Some(ContentType::Json) => from_json(bytes),
        Some(ContentType::Xml) => from_xml(bytes, declared.and_then(ContentType::charset)),
        Some(ContentType::PlainText) => {
            let text = String::from_utf8_lossy(bytes);
            let deserializer: StrDeserializer<'_, serde::de::value::Error> =
                text.as_ref().into_deserializer();
            T::deserialize(deserializer).or_else(|_| from_json(bytes))
        }
        Some(ContentType::OctetStream) => {
            let deserializer: SeqDeserializer<_, serde::de::value::Error> =
                SeqDeserializer::new(bytes.iter().copied());
            T::deserialize(deserializer).or_else(|_| from_json(bytes))
        }
    }
}

/// Deserialize JSON bytes with path-aware error messages.
///
/// # Errors
///
/// Returns [`Error::Decode`] with the path to the offending field
/// (e.g. `user.address.city`) when deserialization fails.
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        let path = e.path().to_string();
        let message = if path.is_empty() || path == "." {
            e.inner().to_string()
        } else {
            format!("{} at '{path}'", e.inner())
        };
        Error::decode(ContentType::Json.as_str(), message)
    })
}

fn from_xml<T: serde::de::DeserializeOwned>(bytes: &[u8], charset: Option<&str>) -> Result<T> {
    let text = match charset.and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes())) {
        Some(encoding) => {
            let (decoded, _, _) = encoding.decode(bytes);
            decoded.into_owned()
        }
        None => String::from_utf8_lossy(bytes).into_owned(),
    };
    quick_xml::de::from_str(&text).map_err(|e| Error::decode(ContentType::Xml.as_str(), e.to_string()))
}

/// Render a structured value as an XML document.
///
/// Objects nest as elements, arrays repeat the enclosing tag, scalars
/// become text content. quick-xml's serde serializer rejects untyped
/// maps, so the emitter walks the value directly.
fn to_xml(value: &serde_json::Value) -> String {
    let mut out = String::new();
    write_element(&mut out, "root", value);
    out
}

fn write_element(out: &mut String, tag: &str, value: &serde_json::Value) {
    use std::fmt::Write as _;

    match value {
        serde_json::Value::Null => {
            let _ = write!(out, "<{tag}/>");
        }
        serde_json::Value::Bool(b) => {
            let _ = write!(out, "<{tag}>{b}</{tag}>");
        }
        serde_json::Value::Number(n) => {
            let _ = write!(out, "<{tag}>{n}</{tag}>");
        }
        serde_json::Value::String(s) => {
            let _ = write!(out, "<{tag}>{}</{tag}>", quick_xml::escape::escape(s));
        }
        serde_json::Value::Array(items) => {
            for item in items {
                write_element(out, tag, item);
            }
        }
        serde_json::Value::Object(fields) => {
            let _ = write!(out, "<{tag}>");
            for (name, field) in fields {
                write_element(out, name, field);
            }
            let _ = write!(out, "</{tag}>");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct User {
        name: String,
        age: u32,
    }

    fn sample_user() -> User {
        User {
            name: "Alice".to_owned(),
            age: 30,
        }
    }

    #[test]
    fn encode_text_body_verbatim() {
        let body = Body::from("plain payload");
        let (bytes, wire) = encode(&body, ContentType::Json).expect("encode");
        assert_eq!(bytes.as_ref(), b"plain payload");
        assert_eq!(wire, ContentType::PlainText);
    }

    #[test]
    fn encode_bytes_body_verbatim() {
        let body = Body::from(vec![0u8, 1, 2]);
        let (bytes, wire) = encode(&body, ContentType::Json).expect("encode");
        assert_eq!(bytes.as_ref(), &[0, 1, 2]);
        assert_eq!(wire, ContentType::OctetStream);
    }

    #[test]
    fn json_round_trip() {
        let body = Body::structured(&sample_user()).expect("structured");
        let (bytes, wire) = encode(&body, ContentType::Json).expect("encode");
        assert_eq!(wire, ContentType::Json);

        let decoded: User = decode(&bytes, Some("application/json")).expect("decode");
        assert_eq!(decoded, sample_user());
    }

    #[test]
    fn xml_round_trip() {
        let body = Body::structured(&sample_user()).expect("structured");
        let (bytes, wire) = encode(&body, ContentType::Xml).expect("encode");
        assert_eq!(wire, ContentType::Xml);
        assert_eq!(
            bytes.as_ref(),
            b"<root><age>30</age><name>Alice</name></root>"
        );

        let decoded: User = decode(&bytes, Some("application/xml")).expect("decode");
        assert_eq!(decoded, sample_user());
    }

    #[test]
    fn xml_escapes_text_content() {
        let body = Body::Structured(serde_json::json!({ "note": "a < b & c" }));
        let (bytes, _) = encode(&body, ContentType::Xml).expect("encode");
        assert_eq!(
            bytes.as_ref(),
            b"<root><note>a &lt; b &amp; c</note></root>"
        );
    }

    #[test]
    fn structured_plain_text_best_effort() {
        let body = Body::Structured(serde_json::json!("just text"));
        let (bytes, wire) = encode(&body, ContentType::PlainText).expect("encode");
        assert_eq!(bytes.as_ref(), b"just text");
        assert_eq!(wire, ContentType::PlainText);

        let body = Body::Structured(serde_json::json!({ "k": 1 }));
        let (bytes, _) = encode(&body, ContentType::PlainText).expect("encode");
        assert_eq!(bytes.as_ref(), br#"{"k":1}"#);
    }

    #[test]
    fn structured_octet_stream_falls_back_to_json() {
        let body = Body::structured(&sample_user()).expect("structured");
        let (_, wire) = encode(&body, ContentType::OctetStream).expect("encode");
        // Wire type corrected so sender and declared header stay consistent.
        assert_eq!(wire, ContentType::Json);
    }

    #[test]
    fn decode_plain_text_into_string() {
        let text: String = decode(b"hello there", Some("text/plain")).expect("decode");
        assert_eq!(text, "hello there");
    }

    #[test]
    fn decode_plain_text_into_struct_falls_back_to_json() {
        let user: User =
            decode(br#"{"name":"Alice","age":30}"#, Some("text/plain")).expect("decode");
        assert_eq!(user, sample_user());
    }

    #[test]
    fn decode_octet_stream_into_bytes() {
        let raw: Vec<u8> = decode(&[9u8, 8, 7], Some("application/octet-stream")).expect("decode");
        assert_eq!(raw, vec![9, 8, 7]);
    }

    #[test]
    fn decode_unknown_content_type_falls_back_to_json() {
        let user: User =
            decode(br#"{"name":"Alice","age":30}"#, Some("application/vnd.acme+json"))
                .expect("decode");
        assert_eq!(user, sample_user());

        let user: User = decode(br#"{"name":"Alice","age":30}"#, None).expect("decode");
        assert_eq!(user, sample_user());
    }

    #[test]
    fn decode_xml_with_latin1_charset() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Place {
            city: String,
        }

        // "Orléans" with an ISO-8859-1 encoded é (0xE9).
        let raw = b"<place><city>Orl\xe9ans</city></place>";
        let place: Place =
            decode(raw, Some("application/xml; charset=ISO-8859-1")).expect("decode");
        assert_eq!(place.city, "Orl\u{e9}ans");
    }

    #[test]
    fn decode_failure_surfaces_error() {
        let result: Result<User> = decode(b"not json", Some("application/json"));
        let err = result.expect_err("should fail");
        assert!(err.to_string().contains("decode error"));
    }

    #[test]
    fn from_json_missing_field_error_includes_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Address {
            #[allow(dead_code)]
            city: String,
        }

        #[derive(Debug, serde::Deserialize)]
        struct Profile {
            #[allow(dead_code)]
            address: Address,
        }

        let result: Result<Profile> = from_json(br#"{"address":{}}"#);
        let err = result.expect_err("should fail");
        let msg = err.to_string();
        assert!(msg.contains("address"), "expected path in error: {msg}");
        assert!(msg.contains("city"), "expected field in error: {msg}");
    }
}
