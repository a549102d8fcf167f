//! # Router Module
//!
//! Path matching and route resolution.
//!
//! Path patterns such as `/items/{id}` are compiled into anchored regexes at
//! startup. Each request is matched by method and path, yielding the handler
//! name and the extracted path parameters:
//!
//! ```rust
//! use http::Method;
//! use interview_api::router::{RouteMeta, Router};
//!
//! let router = Router::new(vec![RouteMeta::new(Method::GET, "/items/{id}", "get_item")]).unwrap();
//! let matched = router.route(&Method::GET, "/items/7").unwrap();
//! assert_eq!(matched.handler_name, "get_item");
//! assert_eq!(matched.get_path_param("id"), Some("7"));
//! ```

mod core;

pub use core::{ParamVec, RouteMatch, RouteMeta, Router, MAX_INLINE_PARAMS};
