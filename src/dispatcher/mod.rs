//! # Dispatcher Module
//!
//! Coroutine-based request handler dispatch.
//!
//! ## Overview
//!
//! - Each named handler runs in its own `may` coroutine
//! - Requests are sent to handlers over MPSC channels and the reply comes back
//!   on a per-request channel
//! - Handler panics are caught and turned into `500` responses
//! - The ordered middleware chain wraps every response, routed or not
//! - Stack size comes from `INTERVIEW_API_STACK_SIZE` (see
//!   [`RuntimeConfig`](crate::runtime_config::RuntimeConfig))
//!
//! ## Request Flow
//!
//! 1. The server builds a [`HandlerRequest`] from the parsed request and the
//!    route match
//! 2. [`Dispatcher::before`] gives middleware a chance to answer early
//!    (CORS preflight)
//! 3. [`Dispatcher::dispatch`] sends the request to the handler coroutine
//!    and waits for the [`HandlerResponse`]
//! 4. [`Dispatcher::after`] decorates the response

mod core;

pub use core::{
    Dispatcher, HandlerRequest, HandlerResponse, HandlerSender, HeaderVec, MAX_INLINE_HEADERS,
};
