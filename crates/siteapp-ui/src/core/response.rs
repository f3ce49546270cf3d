//! Interpretation of settled responses.
//!
//! Two shapes reach the wrapper: a decoded body from a transport-level success
//! (which may still carry an application-level `"status": "error"` marker), and a
//! [`TransportFailure`] describing a non-2xx or network failure.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Status marker value that turns a transport success into an application error.
pub const ERROR_STATUS: &str = "error";

const HTML_CONTENT_TYPE_PATTERN: &str = r"^text/html";
const HTML_DOCUMENT_PATTERN: &str = r"^(<!DOCTYPE[\w\W]*>)?\s*<html";

static HTML_CONTENT_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(HTML_CONTENT_TYPE_PATTERN).expect("content-type pattern compiles"));
static HTML_DOCUMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(HTML_DOCUMENT_PATTERN).expect("document pattern compiles"));

/// Application-level reading of a successful response body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BodyStatus<'a> {
    /// Body carries no error marker.
    Ok,
    /// Body reported `"status": "error"`, with its `message` when present.
    Error(Option<&'a str>),
}

impl<'a> BodyStatus<'a> {
    /// Inspect the `status` and `message` fields of `body`.
    #[must_use]
    pub fn of(body: &'a Value) -> Self {
        match body.get("status").and_then(Value::as_str) {
            Some(ERROR_STATUS) => Self::Error(body.get("message").and_then(Value::as_str)),
            _ => Self::Ok,
        }
    }

    /// Whether the body signals an application-level failure.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Transport-level failure handed to error callbacks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportFailure {
    /// HTTP status code; `0` when no response was received.
    pub status: u16,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
    /// Raw response text.
    pub text: String,
    /// Transport-supplied description (network error, abort, decode failure).
    pub reason: Option<String>,
}

impl TransportFailure {
    /// Failure with a status code and raw body.
    #[must_use]
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
            ..Self::default()
        }
    }

    /// Failure where no HTTP response was received.
    #[must_use]
    pub fn network(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Append a response header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup returning the first match.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The `Content-Type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Whether the body looks like a rendered HTML error page.
    #[must_use]
    pub fn is_html_document(&self) -> bool {
        looks_like_html_document(self.content_type(), &self.text)
    }
}

/// Decode a successful response body, keeping non-JSON text as a string value.
#[must_use]
pub fn decode_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Parse a raw `name: value` header block (CRLF separated).
#[must_use]
pub fn parse_header_block(raw: &str) -> Vec<(String, String)> {
    raw.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

/// Loose HTML sniff: an HTML content type plus a body opening with an optional
/// doctype and an `<html` tag.
///
/// This is a heuristic; documents that omit the `<html>` tag are not recognised.
#[must_use]
pub fn looks_like_html_document(content_type: Option<&str>, body: &str) -> bool {
    content_type.is_some_and(|value| HTML_CONTENT_TYPE.is_match(value))
        && HTML_DOCUMENT.is_match(body)
}
