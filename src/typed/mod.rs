//! # Typed Module
//!
//! Typed request data for the item handlers.
//!
//! Handlers never read raw JSON or query strings. Each endpoint's input is a
//! struct built with `TryFrom<&HandlerRequest>`, and a conversion failure
//! carries the `400` response it maps to:
//!
//! ```rust
//! use interview_api::typed::ListQuery;
//! use interview_api::typed::RequestError;
//!
//! let err = RequestError::InvalidQuery { name: "limit", value: "ten".into() };
//! assert_eq!(err.into_response().status, 400);
//! let query = ListQuery::default();
//! assert_eq!(query.skip, 0);
//! ```

mod core;

pub use core::{parse_id, ItemParams, ListQuery, RequestError};
