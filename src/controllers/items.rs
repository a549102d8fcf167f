use super::{json_response, not_found};
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::domain::ItemChanges;
use crate::store::ItemStore;
use crate::typed::{parse_id, ItemParams, ListQuery};
use std::convert::TryFrom;
use tracing::info;

/// `GET /items`
pub fn list(req: &HandlerRequest, store: &dyn ItemStore) -> HandlerResponse {
    let query = match ListQuery::try_from(req) {
        Ok(query) => query,
        Err(err) => return err.into_response(),
    };
    match store.list(query.into()) {
        Ok(items) => json_response(200, &items),
        Err(err) => err.into(),
    }
}

/// `GET /items/{id}`
pub fn show(req: &HandlerRequest, store: &dyn ItemStore) -> HandlerResponse {
    let Some(id) = parse_id(req) else {
        return not_found();
    };
    match store.find_by_id(id) {
        Ok(Some(item)) => json_response(200, &item),
        Ok(None) => not_found(),
        Err(err) => err.into(),
    }
}

/// `POST /items`
pub fn create(req: &HandlerRequest, store: &dyn ItemStore) -> HandlerResponse {
    let params = match ItemParams::try_from(req) {
        Ok(params) => params,
        Err(err) => return err.into_response(),
    };
    match store.create(&ItemChanges::from(params)) {
        Ok(item) => {
            info!(request_id = %req.request_id, id = item.id, "Item created");
            json_response(201, &item)
        }
        Err(err) => err.into(),
    }
}

/// `PUT /items/{id}`
///
/// An unknown id is reported as `404` even when the body is missing or
/// invalid.
pub fn update(req: &HandlerRequest, store: &dyn ItemStore) -> HandlerResponse {
    let Some(id) = parse_id(req) else {
        return not_found();
    };
    let params = match ItemParams::try_from(req) {
        Ok(params) => params,
        Err(err) => {
            return match store.find_by_id(id) {
                Ok(Some(_)) => err.into_response(),
                Ok(None) => not_found(),
                Err(store_err) => store_err.into(),
            };
        }
    };
    match store.update(id, &ItemChanges::from(params)) {
        Ok(item) => {
            info!(request_id = %req.request_id, id, "Item updated");
            json_response(200, &item)
        }
        Err(err) => err.into(),
    }
}

/// `DELETE /items/{id}`
pub fn destroy(req: &HandlerRequest, store: &dyn ItemStore) -> HandlerResponse {
    let Some(id) = parse_id(req) else {
        return not_found();
    };
    match store.destroy(id) {
        Ok(()) => {
            info!(request_id = %req.request_id, id, "Item deleted");
            HandlerResponse::empty(204)
        }
        Err(err) => err.into(),
    }
}
