//! Route definitions for the URL shortener API
//!
//! This module wires the handlers into an Axum router together with the
//! shared application state.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::{
    create_short_url, redirect_missing_id, redirect_url, route_not_found, RedirectHandler,
    ShortenHandler,
};
use crate::middleware::panic_response;
use crate::store::Store;

/// Application state shared across all request handlers
///
/// Both handlers hold the same store; neither keeps per-request state.
#[derive(Clone)]
pub struct AppState {
    pub shorten: Arc<ShortenHandler>,
    pub redirect: Arc<RedirectHandler>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, base_url: impl Into<String>) -> Self {
        Self {
            shorten: Arc::new(ShortenHandler::new(store.clone(), base_url)),
            redirect: Arc::new(RedirectHandler::new(store)),
        }
    }
}

/// Creates the Axum router
///
/// # Route Definitions
///
/// - `POST /shorten` - Creates a short URL
/// - `POST /api/urls` - Same as `/shorten`
/// - `GET /{short_id}` - Redirects to the original URL
/// - `GET /` - Rejected with 400, no short ID given
///
/// Unmatched paths get a JSON 404.
///
/// # Example Usage
///
/// ```no_run
/// # use std::sync::Arc;
/// # use shortlink::database::RedbStore;
/// # use shortlink::route::{create_app, AppState};
/// let store = RedbStore::open("data.db").unwrap();
/// let app = create_app(AppState::new(Arc::new(store), "https://short.ly/"));
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/shorten", post(create_short_url))
        .route("/api/urls", post(create_short_url))
        .route("/", get(redirect_missing_id))
        .route("/{short_id}", get(redirect_url))
        .fallback(route_not_found)
        .with_state(state)
        // Panics inside a handler become a JSON 500 instead of a dropped connection
        .layer(CatchPanicLayer::custom(panic_response))
}
