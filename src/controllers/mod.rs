//! Request handlers. Each takes the typed view of a [`HandlerRequest`] and
//! the store, and returns the full [`HandlerResponse`].
//!
//! [`HandlerRequest`]: crate::dispatcher::HandlerRequest

pub mod items;
pub mod root;

use crate::dispatcher::HandlerResponse;
use crate::store::StoreError;
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// Serialize `value` as the JSON body of a `status` response.
pub(crate) fn json_response<T: Serialize>(status: u16, value: &T) -> HandlerResponse {
    match serde_json::to_value(value) {
        Ok(body) => HandlerResponse::json(status, body),
        Err(err) => {
            error!(error = %err, "Failed to serialize response");
            HandlerResponse::error(500, "Internal Server Error")
        }
    }
}

pub(crate) fn not_found() -> HandlerResponse {
    HandlerResponse::error(404, "Item not found")
}

impl From<StoreError> for HandlerResponse {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => not_found(),
            StoreError::Validation(errors) => {
                HandlerResponse::json(422, json!({ "error": errors.into_messages() }))
            }
            StoreError::Database(_) | StoreError::Unavailable => {
                error!(error = %err, "Store operation failed");
                HandlerResponse::error(500, "Internal Server Error")
            }
        }
    }
}
