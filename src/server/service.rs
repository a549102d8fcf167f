use super::request::{parse_request, Body, ParsedRequest};
use super::response::write_handler_response;
use crate::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
use crate::ids::RequestId;
use crate::router::Router;
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// The HTTP service: routes, dispatches and decorates every request.
///
/// Cloned once per connection by `may_minihttp`; the router and dispatcher
/// are shared.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<Router>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppService {
    pub fn new(router: Arc<Router>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { router, dispatcher }
    }

    /// Produce the response for one parsed request.
    ///
    /// Order: middleware `before` (CORS preflight), unmatched route → `404`,
    /// then the handler. A body that is not valid JSON travels on the request
    /// as `body_error`; only handlers that read a body reject it. Every
    /// outcome passes through middleware `after`.
    pub fn handle(&self, parsed: ParsedRequest) -> HandlerResponse {
        let start = Instant::now();
        let request_id = RequestId::from_header_or_new(parsed.get_header("x-request-id"));
        let ParsedRequest {
            method,
            path,
            headers,
            query_params,
            body,
        } = parsed;

        let Ok(method) = Method::from_bytes(method.as_bytes()) else {
            warn!(request_id = %request_id, method = %method, "Unparsable request method");
            return HandlerResponse::error(400, "Bad Request");
        };

        let route_match = self.router.route(&method, &path);
        let (json_body, body_error) = match body {
            Body::Empty => (None, None),
            Body::Json(value) => (Some(value), None),
            Body::Malformed(message) => (None, Some(message)),
        };
        let (mut request, reply_rx) = HandlerRequest::new(
            request_id,
            method,
            &path,
            route_match,
            query_params,
            headers,
            json_body,
        );
        request.body_error = body_error;

        let mut resp = if let Some(early) = self.dispatcher.before(&request) {
            early
        } else if !request.is_routed() {
            HandlerResponse::json(
                404,
                json!({
                    "error": "Not Found",
                    "method": request.method.as_str(),
                    "path": request.path,
                }),
            )
        } else {
            self.dispatcher.dispatch(request.clone(), &reply_rx)
        };

        self.dispatcher.after(&request, &mut resp, start.elapsed());
        resp
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let resp = self.handle(parse_request(req));
        write_handler_response(res, &resp);
        Ok(())
    }
}
