//! Handler registry: the route table and the handler coroutines behind it.

use crate::controllers::{items, root};
use crate::dispatcher::Dispatcher;
use crate::middleware::{CorsMiddleware, TracingMiddleware};
use crate::router::{RouteMeta, Router};
use crate::runtime_config::RuntimeConfig;
use crate::server::AppService;
use crate::store::ItemStore;
use http::Method;
use std::sync::Arc;

/// Every route the service answers, by handler name.
#[must_use]
pub fn routes() -> Vec<RouteMeta> {
    vec![
        RouteMeta::new(Method::GET, "/", "welcome"),
        RouteMeta::new(Method::GET, "/health", "health"),
        RouteMeta::new(Method::GET, "/items", "list_items"),
        RouteMeta::new(Method::POST, "/items", "create_item"),
        RouteMeta::new(Method::GET, "/items/{id}", "get_item"),
        RouteMeta::new(Method::PUT, "/items/{id}", "update_item"),
        RouteMeta::new(Method::DELETE, "/items/{id}", "delete_item"),
    ]
}

/// Register one handler coroutine per route.
///
/// # Safety
///
/// Spawns `may` coroutines; see [`Dispatcher::register_handler`].
pub unsafe fn register_all(dispatcher: &mut Dispatcher, store: Arc<dyn ItemStore>) {
    dispatcher.register_handler("welcome", root::welcome);
    dispatcher.register_handler("health", root::health);

    let s = Arc::clone(&store);
    dispatcher.register_handler("list_items", move |req| items::list(req, s.as_ref()));
    let s = Arc::clone(&store);
    dispatcher.register_handler("create_item", move |req| items::create(req, s.as_ref()));
    let s = Arc::clone(&store);
    dispatcher.register_handler("get_item", move |req| items::show(req, s.as_ref()));
    let s = Arc::clone(&store);
    dispatcher.register_handler("update_item", move |req| items::update(req, s.as_ref()));
    dispatcher.register_handler("delete_item", move |req| items::destroy(req, store.as_ref()));
}

/// Build the complete service: routes, handlers and middleware chain.
///
/// # Errors
///
/// Fails if a route pattern does not compile.
pub fn build_service(
    store: Arc<dyn ItemStore>,
    cors: CorsMiddleware,
    runtime: RuntimeConfig,
) -> Result<AppService, regex::Error> {
    let router = Router::new(routes())?;
    let mut dispatcher = Dispatcher::with_runtime(runtime);
    // SAFETY: called once during startup, before the server accepts requests.
    unsafe {
        register_all(&mut dispatcher, store);
    }
    dispatcher.add_middleware(Arc::new(TracingMiddleware));
    dispatcher.add_middleware(Arc::new(cors));
    Ok(AppService::new(Arc::new(router), Arc::new(dispatcher)))
}
