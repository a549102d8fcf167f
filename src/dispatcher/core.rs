//! Dispatcher core: handler coroutines, request/response envelopes and the
//! middleware chain.

use crate::ids::RequestId;
use crate::middleware::Middleware;
use crate::router::{ParamVec, RouteMatch};
use crate::runtime_config::RuntimeConfig;
use http::Method;
use may::coroutine;
use may::sync::mpsc;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage; names are lowercase.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request data passed to a handler coroutine
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Name of the handler that should process this request; empty when no
    /// route matched
    pub handler_name: String,
    pub path_params: ParamVec,
    pub query_params: ParamVec,
    pub headers: HeaderVec,
    /// Request body, present only when it was well-formed JSON
    pub body: Option<Value>,
    /// Parser message when the body was sent but is not valid JSON
    pub body_error: Option<String>,
    /// Channel for sending the response back to the dispatcher
    pub reply_tx: mpsc::Sender<HandlerResponse>,
}

impl HandlerRequest {
    /// Build a request along with the receiver its reply arrives on.
    #[must_use]
    pub fn new(
        request_id: RequestId,
        method: Method,
        path: &str,
        route_match: Option<RouteMatch>,
        query_params: ParamVec,
        headers: HeaderVec,
        body: Option<Value>,
    ) -> (Self, mpsc::Receiver<HandlerResponse>) {
        let (reply_tx, reply_rx) = mpsc::channel();
        let (handler_name, path_params) = match route_match {
            Some(m) => (m.handler_name, m.path_params),
            None => (String::new(), ParamVec::new()),
        };
        let request = Self {
            request_id,
            method,
            path: path.to_string(),
            handler_name,
            path_params,
            query_params,
            headers,
            body,
            body_error: None,
            reply_tx,
        };
        (request, reply_rx)
    }

    /// Get a path parameter by name; the last occurrence wins.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name; `?limit=10&limit=20` yields `20`.
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn is_routed(&self) -> bool {
        !self.handler_name.is_empty()
    }
}

/// Response data sent back from a handler coroutine
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: u16,
    pub headers: HeaderVec,
    /// JSON body; `None` means the response has no body at all
    pub body: Option<Value>,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Option<Value>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with a `content-type` header
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body: Some(body),
        }
    }

    /// Response without a body, e.g. `204 No Content`
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self::new(status, HeaderVec::new(), None)
    }

    /// Create an error response: `{"error": message}`
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// Type alias for a channel sender that dispatches requests to a handler
pub type HandlerSender = mpsc::Sender<HandlerRequest>;

/// Dispatcher that routes requests to registered handler coroutines
///
/// Maintains a registry of handler names to their channel senders and the
/// ordered middleware chain applied around every request.
#[derive(Clone, Default)]
pub struct Dispatcher {
    pub handlers: HashMap<String, HandlerSender>,
    pub middlewares: Vec<Arc<dyn Middleware>>,
    stack_size: Option<usize>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher whose handler coroutines use the configured stack size
    #[must_use]
    pub fn with_runtime(config: RuntimeConfig) -> Self {
        Self {
            stack_size: Some(config.stack_size),
            ..Self::default()
        }
    }

    /// Add middleware; it runs in the order added.
    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    /// Register a handler function under `name`.
    ///
    /// Spawns a coroutine that serves requests from a channel. Each call to
    /// `handler_fn` is wrapped in `catch_unwind`; a panic becomes a `500`
    /// response and the coroutine keeps serving.
    ///
    /// Registering the same name twice replaces the old handler; dropping its
    /// sender closes the channel and the old coroutine exits.
    ///
    /// # Safety
    ///
    /// Calls `may::coroutine::Builder::spawn()`, which is unsafe in the `may`
    /// runtime. The handler must not block the coroutine on thread-local
    /// state.
    pub unsafe fn register_handler<F>(&mut self, name: &str, handler_fn: F)
    where
        F: Fn(&HandlerRequest) -> HandlerResponse + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<HandlerRequest>();
        let name = name.to_string();
        let handler_name_for_logging = name.clone();
        let stack_size = self
            .stack_size
            .unwrap_or_else(|| RuntimeConfig::from_env().stack_size);

        // SAFETY: the closure owns everything it touches and replies only
        // through the per-request channel.
        let spawn_result = unsafe {
            coroutine::Builder::new()
                .name(name.clone())
                .stack_size(stack_size)
                .spawn(move || {
                    debug!(
                        handler_name = %handler_name_for_logging,
                        stack_size,
                        "Handler coroutine start"
                    );

                    for req in rx.iter() {
                        let execution_start = Instant::now();
                        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                            handler_fn(&req)
                        }));
                        let response = match outcome {
                            Ok(response) => {
                                debug!(
                                    request_id = %req.request_id,
                                    handler_name = %req.handler_name,
                                    status = response.status,
                                    execution_time_ms = execution_start.elapsed().as_millis() as u64,
                                    "Handler execution complete"
                                );
                                response
                            }
                            Err(panic) => {
                                let panic_message = panic
                                    .downcast_ref::<&str>()
                                    .map(|s| (*s).to_string())
                                    .or_else(|| panic.downcast_ref::<String>().cloned())
                                    .unwrap_or_else(|| "unknown panic".to_string());
                                error!(
                                    request_id = %req.request_id,
                                    handler_name = %req.handler_name,
                                    panic_message = %panic_message,
                                    "Handler panicked"
                                );
                                HandlerResponse::error(500, "Internal Server Error")
                            }
                        };
                        if req.reply_tx.send(response).is_err() {
                            warn!(
                                request_id = %req.request_id,
                                handler_name = %req.handler_name,
                                "Reply channel closed before response was sent"
                            );
                        }
                    }

                    debug!(handler_name = %handler_name_for_logging, "Handler coroutine exit");
                })
        };

        if let Err(e) = spawn_result {
            error!(
                handler_name = %name,
                error = %e,
                stack_size,
                "Failed to spawn handler coroutine"
            );
            return;
        }

        if self.handlers.insert(name.clone(), tx).is_some() {
            warn!(handler_name = %name, "Replaced existing handler");
        }
        info!(
            handler_name = %name,
            total_handlers = self.handlers.len(),
            "Handler registered"
        );
    }

    /// Run every middleware's `before` hook; the first early response wins,
    /// later hooks still observe the request.
    #[must_use]
    pub fn before(&self, request: &HandlerRequest) -> Option<HandlerResponse> {
        let mut early_resp: Option<HandlerResponse> = None;
        for (idx, mw) in self.middlewares.iter().enumerate() {
            let resp = mw.before(request);
            if early_resp.is_none() && resp.is_some() {
                debug!(
                    request_id = %request.request_id,
                    middleware_idx = idx,
                    "Middleware returned early response"
                );
                early_resp = resp;
            }
        }
        early_resp
    }

    /// Run every middleware's `after` hook over the outgoing response.
    pub fn after(&self, request: &HandlerRequest, resp: &mut HandlerResponse, latency: Duration) {
        for mw in &self.middlewares {
            mw.after(request, resp, latency);
        }
    }

    /// Send a routed request to its handler coroutine and wait for the reply.
    ///
    /// A missing handler yields `500`; a handler whose channel is gone yields
    /// `503`.
    #[must_use]
    pub fn dispatch(
        &self,
        request: HandlerRequest,
        reply_rx: &mpsc::Receiver<HandlerResponse>,
    ) -> HandlerResponse {
        let request_id = request.request_id;
        let handler_name = request.handler_name.clone();

        let Some(tx) = self.handlers.get(&handler_name) else {
            let available_handlers: Vec<&String> = self.handlers.keys().collect();
            error!(
                request_id = %request_id,
                handler_name = %handler_name,
                available_handlers = ?available_handlers,
                "Handler not registered"
            );
            return HandlerResponse::error(500, "Internal Server Error");
        };

        debug!(
            request_id = %request_id,
            handler_name = %handler_name,
            method = %request.method,
            path = %request.path,
            "Request dispatched to handler"
        );

        if let Err(e) = tx.send(request) {
            error!(
                request_id = %request_id,
                handler_name = %handler_name,
                error = %e,
                "Failed to send request to handler"
            );
            return HandlerResponse::error(503, "Service Unavailable");
        }

        match reply_rx.recv() {
            Ok(response) => response,
            Err(e) => {
                error!(
                    request_id = %request_id,
                    handler_name = %handler_name,
                    error = %e,
                    "Handler channel closed - handler may have crashed"
                );
                HandlerResponse::error(503, "Service Unavailable")
            }
        }
    }
}
