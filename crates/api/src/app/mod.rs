//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: directory, token service, gate and verifier, built once
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use rolegate_auth::AuthError;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: ApiConfig) -> Result<Router, AuthError> {
    let services = Arc::new(services::build_services(&config)?);
    let auth_state = middleware::AuthState {
        tokens: services.tokens.clone(),
    };

    // Protected routes: a valid bearer token is required before any handler runs.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    let api = routes::public_router().merge(protected);

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", api)
        .fallback(routes::system::not_found)
        .layer(ServiceBuilder::new().layer(Extension(services))))
}
