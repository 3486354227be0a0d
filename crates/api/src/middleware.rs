use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use rolegate_auth::{AuthError, TokenService};

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
}

/// Reject requests without a valid bearer token; otherwise attach the principal.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(token) => token,
        Err(err) => return errors::auth_error_to_response(err),
    };

    let principal = match state.tokens.validate(token) {
        Ok(principal) => principal,
        Err(err) => {
            warn!(reason = %err, "bearer token rejected");
            return errors::auth_error_to_response(AuthError::TokenInvalid(err));
        }
    };

    req.extensions_mut().insert(PrincipalContext::new(principal));

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::Unauthorized)?;

    let header = header.to_str().map_err(|_| AuthError::Unauthorized)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::Unauthorized)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    Ok(token)
}
