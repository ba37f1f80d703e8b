//! Admin HTTP API.
//!
//! # Routes
//! - `GET /logspec` → `{"spec": "<normalized spec>"}`
//! - `PUT /logspec` with `{"spec": "..."}` → 204, or 400 `{"error": "..."}`
//! - `GET /loggers` → `[{"name": "...", "level": "..."}]`
//! - `GET /loggers/{name}` → `{"name": "...", "level": "..."}`
//!
//! All routes require a bearer token when `api_key` is set.

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::facility::Logging;

/// State shared by the admin handlers.
#[derive(Clone, Debug)]
pub struct AdminState {
    pub logging: Logging,
    pub api_key: Option<Arc<str>>,
}

impl AdminState {
    pub fn new(logging: Logging, api_key: Option<&str>) -> Self {
        Self {
            logging,
            api_key: api_key.map(Arc::from),
        }
    }
}

pub fn router(state: AdminState) -> Router {
    Router::new()
        .route("/logspec", get(get_spec).put(put_spec))
        .route("/loggers", get(get_loggers))
        .route("/loggers/{name}", get(get_logger))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
