//! HTTP front end: request parsing, the [`AppService`] pipeline and the
//! coroutine server wrapper.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_request, Body, ParsedRequest};
pub use service::AppService;
