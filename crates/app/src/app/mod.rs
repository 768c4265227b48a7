//! HTTP application wiring (axum router).
//!
//! Every route goes through `async_handler`, so success values are wrapped
//! in response envelopes and failures flow through the central dispatcher.

use std::sync::Arc;

use apikit_crypto::AuthKeys;
use axum::{
    Extension, Router,
    routing::{get, post},
};

use apikit_response::async_handler;

pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(keys: Arc<AuthKeys>) -> Router {
    Router::new()
        .route("/object", get(async_handler(routes::object)))
        .route("/string", get(async_handler(routes::string)))
        .route("/invalid-value", get(async_handler(routes::invalid_value)))
        .route("/invalid-api", get(async_handler(routes::invalid_api)))
        .route(
            "/validation-error",
            get(async_handler(routes::validation_error)),
        )
        .route(
            "/throw-invalid-value-error",
            get(async_handler(routes::throw_invalid_value_error)),
        )
        .route("/server-error", get(async_handler(routes::server_error)))
        .route(
            "/unauthenticated-error",
            get(async_handler(routes::unauthenticated_error)),
        )
        .route("/users", post(async_handler(routes::create_user)))
        .route("/auth/token", post(async_handler(routes::issue_token)))
        .route("/auth/me", get(async_handler(routes::whoami)))
        .layer(Extension(keys))
}
