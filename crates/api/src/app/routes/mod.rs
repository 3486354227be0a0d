use axum::{
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod modules;
pub mod roles;
pub mod system;
pub mod users;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new().route("/auth/signin", post(auth::signin))
}

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/auth/me", get(auth::me))
        .nest("/users", users::router())
        .nest("/roles", roles::router())
        .nest("/modules", modules::router())
}
