use crate::dispatcher::{HandlerRequest, HandlerResponse};
use serde_json::json;

pub const WELCOME_MESSAGE: &str = "Welcome to the Interview API";

/// `GET /`
pub fn welcome(_req: &HandlerRequest) -> HandlerResponse {
    HandlerResponse::json(200, json!({ "message": WELCOME_MESSAGE }))
}

/// `GET /health`
pub fn health(_req: &HandlerRequest) -> HandlerResponse {
    HandlerResponse::json(200, json!({ "status": "ok" }))
}
