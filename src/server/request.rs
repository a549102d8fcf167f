use crate::dispatcher::HeaderVec;
use crate::router::ParamVec;
use may_minihttp::Request;
use serde_json::Value;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, warn};

/// Request body after JSON decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// No bytes, or only whitespace
    Empty,
    Json(Value),
    /// Bytes that are not valid JSON; carries the parser message
    Malformed(String),
}

impl Body {
    /// Decode raw request bytes.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Body::Empty;
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => Body::Json(value),
            Err(err) => Body::Malformed(err.to_string()),
        }
    }
}

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    /// HTTP method as sent (GET, POST, etc.)
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers (lowercase names)
    pub headers: HeaderVec,
    pub query_params: ParamVec,
    pub body: Body,
}

impl ParsedRequest {
    /// Build from already-extracted parts; `raw_path` may carry a query string.
    #[must_use]
    pub fn from_parts(method: &str, raw_path: &str, headers: HeaderVec, body: &[u8]) -> Self {
        let (path, query) = match raw_path.split_once('?') {
            Some((path, query)) => (path, query),
            None => (raw_path, ""),
        };
        let path = if path.is_empty() { "/" } else { path };
        Self {
            method: method.to_string(),
            path: path.to_string(),
            headers,
            query_params: parse_query_params(query),
            body: Body::decode(body),
        }
    }

    /// Get a header by name (case-insensitive)
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Parse a URL query string (without the leading `?`), percent-decoding names
/// and values.
#[must_use]
pub fn parse_query_params(query: &str) -> ParamVec {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
        .collect()
}

/// Extract method, path, headers and body from a `may_minihttp::Request`.
///
/// Headers are collected first since reading the body consumes the request.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase().as_str()),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();

    let mut body = Vec::new();
    if let Err(err) = req.body().read_to_end(&mut body) {
        warn!(error = %err, method = %method, path = %raw_path, "Failed to read request body");
        body.clear();
    }

    debug!(
        method = %method,
        path = %raw_path,
        header_count = headers.len(),
        body_size_bytes = body.len(),
        "HTTP request parsed"
    );

    ParsedRequest::from_parts(&method, &raw_path, headers, &body)
}
