use std::fmt;

/// CORS configuration error
///
/// Returned by [`CorsMiddleware::with_origin`](super::CorsMiddleware::with_origin)
/// when the configured origin cannot be sent as `Access-Control-Allow-Origin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsConfigError {
    /// The origin string does not match `scheme://host[:port]` and is not `*`
    InvalidOriginFormat {
        /// The invalid origin string
        origin: String,
    },
    /// An empty origin was configured
    EmptyOrigin,
}

impl fmt::Display for CorsConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorsConfigError::InvalidOriginFormat { origin } => {
                write!(
                    f,
                    "CORS configuration error: Invalid origin format '{origin}'. \
                    Expected '*' or scheme://host[:port] (e.g., https://example.com)"
                )
            }
            CorsConfigError::EmptyOrigin => {
                write!(f, "CORS configuration error: origin must not be empty")
            }
        }
    }
}

impl std::error::Error for CorsConfigError {}
