use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::domain::ItemChanges;
use crate::store::Page;
use serde::Deserialize;
use serde_json::json;
use std::convert::TryFrom;
use std::fmt;

/// Why a request could not be converted into its typed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// POST/PUT without a JSON body
    MissingBody,
    /// A body that is not valid JSON; carries the parser message
    MalformedJson(String),
    /// Well-formed JSON that does not fit the expected shape
    InvalidData(String),
    /// A query parameter that is not a non-negative integer
    InvalidQuery { name: &'static str, value: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::MissingBody => write!(f, "Request body required"),
            RequestError::MalformedJson(msg) => write!(f, "Invalid JSON body: {msg}"),
            RequestError::InvalidData(msg) => write!(f, "Invalid request data: {msg}"),
            RequestError::InvalidQuery { name, value } => {
                write!(f, "{name} must be a non-negative integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    /// The `400` response for this error.
    #[must_use]
    pub fn into_response(self) -> HandlerResponse {
        match self {
            RequestError::MissingBody => HandlerResponse::error(400, "Request body required"),
            RequestError::MalformedJson(message) => HandlerResponse::json(
                400,
                json!({ "error": "Invalid JSON body", "message": message }),
            ),
            RequestError::InvalidData(message) => HandlerResponse::json(
                400,
                json!({ "error": "Invalid request data", "message": message }),
            ),
            err @ RequestError::InvalidQuery { .. } => HandlerResponse::json(
                400,
                json!({ "error": "Invalid query parameter", "message": err.to_string() }),
            ),
        }
    }
}

/// Body of `POST /items` and `PUT /items/{id}`.
///
/// Both fields are optional on the wire; a missing `name` is a validation
/// failure (422), not a decoding failure. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<ItemParams> for ItemChanges {
    fn from(params: ItemParams) -> Self {
        ItemChanges {
            name: params.name,
            description: params.description,
        }
    }
}

impl TryFrom<&HandlerRequest> for ItemParams {
    type Error = RequestError;

    fn try_from(req: &HandlerRequest) -> Result<Self, Self::Error> {
        if let Some(message) = &req.body_error {
            return Err(RequestError::MalformedJson(message.clone()));
        }
        let body = req.body.as_ref().ok_or(RequestError::MissingBody)?;
        ItemParams::deserialize(body).map_err(|e| RequestError::InvalidData(e.to_string()))
    }
}

/// Query of `GET /items`: `?skip=N&limit=M`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub skip: u64,
    pub limit: Option<u64>,
}

impl From<ListQuery> for Page {
    fn from(query: ListQuery) -> Self {
        Page::new(query.skip, query.limit)
    }
}

fn query_u64(req: &HandlerRequest, name: &'static str) -> Result<Option<u64>, RequestError> {
    req.get_query_param(name)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|_| RequestError::InvalidQuery {
                    name,
                    value: value.to_string(),
                })
        })
        .transpose()
}

impl TryFrom<&HandlerRequest> for ListQuery {
    type Error = RequestError;

    fn try_from(req: &HandlerRequest) -> Result<Self, Self::Error> {
        Ok(ListQuery {
            skip: query_u64(req, "skip")?.unwrap_or(0),
            limit: query_u64(req, "limit")?,
        })
    }
}

/// The `{id}` path parameter as a primary key. `None` when it is absent or
/// not an integer, which handlers answer with `404`.
#[must_use]
pub fn parse_id(req: &HandlerRequest) -> Option<i64> {
    req.get_path_param("id")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::HeaderVec;
    use crate::ids::RequestId;
    use crate::router::{ParamVec, RouteMeta, Router};
    use http::Method;
    use serde_json::Value;
    use std::sync::Arc;

    fn request(path: &str, query: &[(&str, &str)], body: Option<Value>) -> HandlerRequest {
        let router = Router::new(vec![RouteMeta::new(Method::GET, "/items/{id}", "get_item")])
            .unwrap();
        let query_params: ParamVec = query
            .iter()
            .map(|(k, v)| (Arc::from(*k), (*v).to_string()))
            .collect();
        let (req, _rx) = HandlerRequest::new(
            RequestId::new(),
            Method::GET,
            path,
            router.route(&Method::GET, path),
            query_params,
            HeaderVec::new(),
            body,
        );
        req
    }

    #[test]
    fn test_item_params_from_body() {
        let req = request("/items", &[], Some(json!({"name": "a", "extra": 1})));
        let params = ItemParams::try_from(&req).unwrap();
        assert_eq!(params.name.as_deref(), Some("a"));
        assert_eq!(params.description, None);
    }

    #[test]
    fn test_item_params_errors() {
        let missing = request("/items", &[], None);
        assert_eq!(
            ItemParams::try_from(&missing).unwrap_err(),
            RequestError::MissingBody
        );
        let wrong = request("/items", &[], Some(json!({"name": 5})));
        assert!(matches!(
            ItemParams::try_from(&wrong),
            Err(RequestError::InvalidData(_))
        ));
        let array = request("/items", &[], Some(json!([1, 2])));
        assert!(ItemParams::try_from(&array).is_err());
    }

    #[test]
    fn test_malformed_body_is_reported_before_missing_body() {
        let mut req = request("/items", &[], None);
        req.body_error = Some("expected value at line 1 column 2".to_string());
        let err = ItemParams::try_from(&req).unwrap_err();
        assert!(matches!(err, RequestError::MalformedJson(_)));
        let resp = err.into_response();
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body.as_ref().unwrap()["error"], "Invalid JSON body");
    }

    #[test]
    fn test_list_query() {
        let req = request("/items", &[("skip", "2"), ("limit", "3")], None);
        assert_eq!(
            ListQuery::try_from(&req).unwrap(),
            ListQuery {
                skip: 2,
                limit: Some(3)
            }
        );
        let bad = request("/items", &[("limit", "-1")], None);
        let err = ListQuery::try_from(&bad).unwrap_err();
        assert_eq!(err.clone().into_response().status, 400);
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(&request("/items/17", &[], None)), Some(17));
        assert_eq!(parse_id(&request("/items/abc", &[], None)), None);
        assert_eq!(parse_id(&request("/items", &[], None)), None);
    }
}
