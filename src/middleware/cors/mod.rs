mod error;

pub use error::CorsConfigError;

use std::time::Duration;

use http::Method;
use tracing::debug;

use crate::dispatcher::{HandlerRequest, HandlerResponse, HeaderVec};
use crate::middleware::Middleware;

/// Headers a preflight response allows, wider than the per-response default.
const PREFLIGHT_ALLOW_HEADERS: &str =
    "X-Requested-With, X-HTTP-Method-Override, Content-Type, Cache-Control, Accept";
/// Methods advertised in the preflight `Allow` header.
const PREFLIGHT_ALLOW: &str = "HEAD,GET,PUT,POST,DELETE,OPTIONS";

/// CORS (Cross-Origin Resource Sharing) middleware
///
/// Answers every `OPTIONS` request as a preflight and decorates every other
/// response, whether it came from a handler, the not-found fallback or an
/// error path.
///
/// # CORS Flow
///
/// 1. **Preflight (OPTIONS)**: `200` with an empty body, `Allow` and the wide
///    `Access-Control-Allow-Headers`; no handler is invoked
/// 2. **Actual Request**: the handler runs, `after()` adds the CORS headers
#[derive(Debug, Clone)]
pub struct CorsMiddleware {
    allowed_origin: String,
    allowed_headers: Vec<String>,
    allowed_methods: Vec<Method>,
}

impl CorsMiddleware {
    /// Create a CORS middleware with explicit configuration
    pub fn new(
        allowed_origin: String,
        allowed_headers: Vec<String>,
        allowed_methods: Vec<Method>,
    ) -> Self {
        Self {
            allowed_origin,
            allowed_headers,
            allowed_methods,
        }
    }

    /// Default policy with a different `Access-Control-Allow-Origin`.
    ///
    /// # Errors
    ///
    /// Returns [`CorsConfigError`] unless `origin` is `*` or an
    /// `http(s)://host[:port]` origin without path, query or fragment.
    pub fn with_origin(origin: &str) -> Result<Self, CorsConfigError> {
        let origin = origin.trim();
        if origin.is_empty() {
            return Err(CorsConfigError::EmptyOrigin);
        }
        if origin != "*" {
            let invalid = || CorsConfigError::InvalidOriginFormat {
                origin: origin.to_string(),
            };
            let parsed = url::Url::parse(origin).map_err(|_| invalid())?;
            let has_extra = (parsed.path() != "/" && !parsed.path().is_empty())
                || parsed.query().is_some()
                || parsed.fragment().is_some()
                || origin.ends_with('/');
            if !matches!(parsed.scheme(), "http" | "https")
                || parsed.host_str().is_none()
                || has_extra
            {
                return Err(invalid());
            }
        }
        Ok(Self {
            allowed_origin: origin.to_string(),
            ..Self::default()
        })
    }

    fn methods_header(&self) -> String {
        self.allowed_methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Permissive policy: any origin, the API's five verbs, `Content-Type`.
impl Default for CorsMiddleware {
    fn default() -> Self {
        Self {
            allowed_origin: "*".into(),
            allowed_headers: vec!["Content-Type".into()],
            allowed_methods: vec![
                Method::OPTIONS,
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
            ],
        }
    }
}

impl Middleware for CorsMiddleware {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        if req.method != Method::OPTIONS {
            return None;
        }
        debug!(request_id = %req.request_id, path = %req.path, "CORS preflight");
        let mut resp = HandlerResponse::new(200, HeaderVec::new(), None);
        resp.set_header("Allow", PREFLIGHT_ALLOW.to_string());
        resp.set_header(
            "Access-Control-Allow-Headers",
            PREFLIGHT_ALLOW_HEADERS.to_string(),
        );
        Some(resp)
    }

    /// Adds `Access-Control-Allow-Origin`, `-Methods` and, unless the
    /// preflight already set a wider one, `-Headers`.
    fn after(&self, _req: &HandlerRequest, res: &mut HandlerResponse, _latency: Duration) {
        res.set_header("Access-Control-Allow-Origin", self.allowed_origin.clone());
        res.set_header("Access-Control-Allow-Methods", self.methods_header());
        if res.get_header("Access-Control-Allow-Headers").is_none() {
            res.set_header(
                "Access-Control-Allow-Headers",
                self.allowed_headers.join(", "),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::RequestId;
    use crate::router::ParamVec;

    fn request(method: Method) -> HandlerRequest {
        let (req, _rx) = HandlerRequest::new(
            RequestId::new(),
            method,
            "/items",
            None,
            ParamVec::new(),
            HeaderVec::new(),
            None,
        );
        req
    }

    #[test]
    fn test_preflight_short_circuits() {
        let cors = CorsMiddleware::default();
        let req = request(Method::OPTIONS);
        let mut resp = cors.before(&req).unwrap();
        cors.after(&req, &mut resp, Duration::ZERO);
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, None);
        assert_eq!(resp.get_header("allow"), Some(PREFLIGHT_ALLOW));
        assert_eq!(
            resp.get_header("access-control-allow-headers"),
            Some(PREFLIGHT_ALLOW_HEADERS)
        );
        assert_eq!(resp.get_header("access-control-allow-origin"), Some("*"));
    }

    #[test]
    fn test_regular_response_is_decorated() {
        let cors = CorsMiddleware::default();
        let req = request(Method::GET);
        assert!(cors.before(&req).is_none());
        let mut resp = HandlerResponse::error(404, "Item not found");
        cors.after(&req, &mut resp, Duration::ZERO);
        assert_eq!(resp.get_header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(
            resp.get_header("Access-Control-Allow-Methods"),
            Some("OPTIONS,GET,POST,PUT,DELETE")
        );
        assert_eq!(
            resp.get_header("Access-Control-Allow-Headers"),
            Some("Content-Type")
        );
    }

    #[test]
    fn test_with_origin_validation() {
        assert!(CorsMiddleware::with_origin("*").is_ok());
        assert!(CorsMiddleware::with_origin("https://example.com").is_ok());
        assert!(CorsMiddleware::with_origin("http://localhost:3000").is_ok());
        assert_eq!(
            CorsMiddleware::with_origin("").unwrap_err(),
            CorsConfigError::EmptyOrigin
        );
        for bad in ["example.com", "ftp://example.com", "https://example.com/path"] {
            assert!(
                matches!(
                    CorsMiddleware::with_origin(bad),
                    Err(CorsConfigError::InvalidOriginFormat { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }
}
