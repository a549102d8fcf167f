//! # Interview API
//!
//! A small JSON CRUD service over a single SQLite table of **items**, served
//! by a coroutine HTTP server.
//!
//! ## Architecture
//!
//! - **[`domain`]** - The [`Item`](domain::Item) record and its validation rules
//! - **[`store`]** - The [`ItemStore`](store::ItemStore) trait and its SQLite backend
//! - **[`router`]** - Regex path matching from `METHOD /path/{param}` to handler names
//! - **[`dispatcher`]** - Handler coroutines, panic recovery and the middleware chain
//! - **[`middleware`]** - CORS decoration and request logging
//! - **[`typed`]** - Typed request bodies and query parameters
//! - **[`controllers`]** - One function per endpoint
//! - **[`registry`]** - Wires routes, handlers and middleware into an [`AppService`](server::AppService)
//! - **[`server`]** - Request parsing, response writing and the `may_minihttp` server
//! - **[`config`]**, **[`logging`]**, **[`runtime_config`]**, **[`cli`]** - Process setup
//!
//! ## Request Flow
//!
//! ```text
//! TCP ─▶ may_minihttp ─▶ AppService::call
//!                          ├─ parse_request        (headers, query, JSON body)
//!                          ├─ Router::route        (handler name + {id})
//!                          ├─ Dispatcher::before   (OPTIONS → preflight 200)
//!                          ├─ 404 fallback         (no route)
//!                          ├─ Dispatcher::dispatch ─▶ handler coroutine ─▶ ItemStore
//!                          └─ Dispatcher::after    (CORS headers, access log)
//! ```
//!
//! ## Endpoints
//!
//! | request             | success                       | failure                          |
//! |---------------------|-------------------------------|----------------------------------|
//! | `GET /`             | `200 {"message": ...}`        |                                  |
//! | `GET /health`       | `200 {"status":"ok"}`         |                                  |
//! | `GET /items`        | `200 [item, ...]`             | `400` bad `skip`/`limit`         |
//! | `GET /items/{id}`   | `200 item`                    | `404`                            |
//! | `POST /items`       | `201 item`                    | `400` body, `422` validation     |
//! | `PUT /items/{id}`   | `200 item`                    | `404`, `400` body, `422`         |
//! | `DELETE /items/{id}`| `204`                         | `404`                            |
//! | `OPTIONS *`         | `200` preflight               |                                  |

pub mod cli;
pub mod config;
pub mod controllers;
pub mod dispatcher;
pub mod domain;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod registry;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod store;
pub mod typed;
