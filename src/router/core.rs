//! Router core: compiles path patterns and matches requests against them.

use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum number of path/query parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the request path.
///
/// Param names come from the static route table, so they are `Arc<str>` and
/// cheap to clone; values are per-request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A single entry of the routing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMeta {
    pub method: Method,
    /// Path with `{name}` placeholders, e.g. `/items/{id}`
    pub path_pattern: String,
    /// Name the dispatcher uses to find the handler coroutine
    pub handler_name: String,
}

impl RouteMeta {
    pub fn new(method: Method, path_pattern: &str, handler_name: &str) -> Self {
        Self {
            method,
            path_pattern: path_pattern.to_string(),
            handler_name: handler_name.to_string(),
        }
    }
}

/// Result of successfully matching a request path to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Path parameters extracted from the URL (e.g., `{id}` → `("id", "123")`)
    pub path_params: ParamVec,
    pub handler_name: String,
}

impl RouteMatch {
    /// Get a path parameter by name; the last occurrence wins.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    regex: Regex,
    meta: RouteMeta,
    param_names: Vec<Arc<str>>,
}

/// Router to match HTTP requests to handler names.
///
/// Routes are tested longest pattern first so `/items/{id}` never shadows a
/// more specific literal path of the same method.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<CompiledRoute>,
}

impl Router {
    /// Build the routing table.
    ///
    /// # Errors
    ///
    /// Returns an error when a path pattern does not compile to a valid regex.
    pub fn new(routes: Vec<RouteMeta>) -> Result<Self, regex::Error> {
        let mut routes = routes;
        routes.sort_by_key(|r| std::cmp::Reverse(r.path_pattern.len()));

        let routes = routes
            .into_iter()
            .map(|meta| {
                let (regex, param_names) = Self::path_to_regex(&meta.path_pattern)?;
                Ok(CompiledRoute {
                    regex,
                    meta,
                    param_names,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        info!(routes_count = routes.len(), "Routing table loaded");
        Ok(Self { routes })
    }

    /// Find the route for `method` and `path` (query string already removed).
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        for compiled in &self.routes {
            if compiled.meta.method != *method {
                continue;
            }
            if let Some(captures) = compiled.regex.captures(path) {
                let mut path_params = ParamVec::new();
                for (i, name) in compiled.param_names.iter().enumerate() {
                    if let Some(val) = captures.get(i + 1) {
                        path_params.push((Arc::clone(name), val.as_str().to_string()));
                    }
                }
                debug!(
                    method = %method,
                    path = %path,
                    handler_name = %compiled.meta.handler_name,
                    "Route matched"
                );
                return Some(RouteMatch {
                    path_params,
                    handler_name: compiled.meta.handler_name.clone(),
                });
            }
        }
        debug!(method = %method, path = %path, "No route matched");
        None
    }

    pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<Arc<str>>), regex::Error> {
        if path == "/" {
            return Ok((Regex::new(r"^/$")?, Vec::new()));
        }

        let mut pattern = String::with_capacity(path.len() + 5);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(path.matches('{').count());

        for segment in path.split('/') {
            if segment.starts_with('{') && segment.ends_with('}') {
                let param_name = segment.trim_start_matches('{').trim_end_matches('}');
                pattern.push_str("/([^/]+)");
                param_names.push(Arc::from(param_name));
            } else if !segment.is_empty() {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }

        // Tolerate a single trailing slash, as `/items/` is common from clients.
        pattern.push_str("/?$");
        Ok((Regex::new(&pattern)?, param_names))
    }
}
