use crate::dispatcher::HandlerResponse;
use may_minihttp::Response;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use tracing::{error, warn};

/// Upper bound on distinct interned header lines.
const MAX_INTERNED_HEADERS: usize = 256;

pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Render a header name in canonical `Title-Case`.
fn canonical_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// `Response::header` only takes `&'static str`; response headers come from a
/// small fixed set, so each distinct line is leaked once and reused.
fn intern_header_line(line: String) -> Option<&'static str> {
    static LINES: OnceLock<Mutex<HashMap<String, &'static str>>> = OnceLock::new();
    let mut lines = LINES
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .ok()?;
    if let Some(interned) = lines.get(&line) {
        return Some(*interned);
    }
    if lines.len() >= MAX_INTERNED_HEADERS {
        return None;
    }
    let interned: &'static str = Box::leak(line.clone().into_boxed_str());
    lines.insert(line, interned);
    Some(interned)
}

/// Serialize a [`HandlerResponse`] onto the wire.
pub fn write_handler_response(res: &mut Response, resp: &HandlerResponse) {
    res.status_code(usize::from(resp.status), status_reason(resp.status));

    for (name, value) in &resp.headers {
        let line = format!("{}: {}", canonical_name(name), value);
        match intern_header_line(line) {
            Some(line) => {
                res.header(line);
            }
            None => warn!(header = %name, "Dropping response header: interner full"),
        }
    }

    if let Some(body) = &resp.body {
        match serde_json::to_vec(body) {
            Ok(bytes) => {
                res.body_vec(bytes);
            }
            Err(err) => {
                error!(error = %err, "Failed to serialize response body");
                res.status_code(500, status_reason(500));
                res.body_vec(br#"{"error":"Internal Server Error"}"#.to_vec());
            }
        }
    }
}
